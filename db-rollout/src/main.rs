use db_rollout::{
    config::RolloutConfig,
    init_tracing,
    scanner::{Scanner, TriggerStatus},
};
use envconfig::Envconfig;
use kube::Client;
use tracing::{error, info, warn};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    // Ensure rustls uses the aws-lc-rs provider explicitly.
    // This avoids runtime errors when no default provider is set.
    if let Err(e) = rustls::crypto::CryptoProvider::install_default(
        rustls::crypto::aws_lc_rs::default_provider(),
    ) {
        // It's fine if a compatible provider was already installed.
        tracing::debug!(
            ?e,
            "CryptoProvider already installed or incompatible; proceeding"
        );
    }

    let cfg = RolloutConfig::init_from_env()?;
    info!(?cfg, "Starting rollout scan");

    let client = Client::try_default().await?;
    let outcomes = Scanner::new(client, cfg).run().await?;

    let mut failed = 0usize;
    for outcome in &outcomes {
        let ns = outcome.namespace.as_str();
        let pod = outcome.pod.as_str();
        let deployment = outcome.deployment.as_deref().unwrap_or("-");
        match &outcome.trigger {
            TriggerStatus::Triggered => {
                info!(ns, pod, deployment, "restart triggered")
            }
            TriggerStatus::Coalesced => {
                info!(ns, pod, deployment, "deployment already restarted this pass")
            }
            TriggerStatus::Skipped => {
                warn!(ns, pod, "ownership unresolved, skipped")
            }
            TriggerStatus::Failed(e) => {
                failed += 1;
                error!(ns, pod, deployment, error = %e, "restart failed")
            }
        }
    }
    info!(matched = outcomes.len(), failed, "scan complete");

    if failed > 0 {
        anyhow::bail!("{failed} of {} restart targets failed", outcomes.len());
    }
    Ok(())
}
