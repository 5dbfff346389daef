mod resolve;
mod selector;
mod trigger;


pub use resolve::{Owner, Resolution, resolve_owner};
pub use selector::is_target;
pub use trigger::trigger_restart;

use std::collections::HashSet;
use std::sync::Arc;

use kube::{Client, ResourceExt};
use tracing::{info, instrument, warn};

use crate::cluster::{KubeWorkloadProvider, WorkloadProvider};
use crate::config::RolloutConfig;
use crate::errors::{ScanError, TriggerError};

/// Terminal state of the trigger stage for one matching pod.
#[derive(Debug)]
pub enum TriggerStatus {
    /// The owning deployment's pod template was stamped.
    Triggered,
    /// A pod earlier in the pass already restarted the same deployment.
    Coalesced,
    /// Ownership did not resolve to a deployment; nothing to restart.
    Skipped,
    /// The restart mutation failed.
    Failed(TriggerError),
}

impl TriggerStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, TriggerStatus::Failed(_))
    }
}

/// One record per matching pod, in listing order. Non-matching pods are
/// silently skipped and produce no record.
#[derive(Debug)]
pub struct ScanOutcome {
    pub pod: String,
    pub namespace: String,
    pub deployment: Option<String>,
    pub trigger: TriggerStatus,
    /// Owner lookups that failed while resolving this pod.
    pub lookup_errors: Vec<String>,
}

pub struct Scanner {
    provider: Arc<dyn WorkloadProvider>,
    cfg: RolloutConfig,
}

impl Scanner {
    pub fn new(client: Client, cfg: RolloutConfig) -> Self {
        Self {
            provider: Arc::new(KubeWorkloadProvider::new(client)),
            cfg,
        }
    }

    pub fn with_provider<P: WorkloadProvider>(
        provider: P,
        cfg: RolloutConfig,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            cfg,
        }
    }

    /// Run one pass over the cluster.
    ///
    /// Only a failed pod listing is fatal. Every matching pod yields exactly
    /// one outcome; a resolve or trigger failure is recorded there and never
    /// stops the pass. Each resolved deployment is restarted at most once
    /// per pass: later pods mapping to the same `(namespace, deployment)`
    /// key coalesce onto the earlier restart.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<Vec<ScanOutcome>, ScanError> {
        let pods = self
            .provider
            .list_pods()
            .await
            .map_err(ScanError::ListInstances)?;
        info!(total = pods.len(), "listed pods cluster-wide");

        let mut outcomes = Vec::new();
        let mut triggered: HashSet<(String, String)> = HashSet::new();

        for pod in &pods {
            if !is_target(&self.cfg.marker_token, pod) {
                continue;
            }
            let name = pod.name_any();
            let ns = pod.namespace().unwrap_or_else(|| "default".to_string());
            info!(%ns, pod = %name, "matched stateful workload");

            let resolution =
                resolve_owner(self.provider.as_ref(), pod, &ns).await;
            for err in &resolution.lookup_errors {
                warn!(%ns, pod = %name, error = %err, "owner lookup failed");
            }

            let (deployment, trigger) = match resolution.owner {
                Owner::Deployment(dep) => {
                    let key = (ns.clone(), dep.clone());
                    if triggered.contains(&key) {
                        (Some(dep), TriggerStatus::Coalesced)
                    } else {
                        match trigger_restart(
                            self.provider.as_ref(),
                            &ns,
                            &dep,
                            &self.cfg,
                        )
                        .await
                        {
                            Ok(()) => {
                                triggered.insert(key);
                                (Some(dep), TriggerStatus::Triggered)
                            }
                            Err(e) => (Some(dep), TriggerStatus::Failed(e)),
                        }
                    }
                }
                Owner::Unresolved => (None, TriggerStatus::Skipped),
            };

            outcomes.push(ScanOutcome {
                pod: name,
                namespace: ns,
                deployment,
                trigger,
                lookup_errors: resolution.lookup_errors,
            });
        }

        Ok(outcomes)
    }
}
