use std::collections::BTreeMap;

use chrono::Utc;
use k8s_openapi::api::apps::v1::Deployment;
use tracing::{debug, warn};

use crate::cluster::WorkloadProvider;
use crate::config::RolloutConfig;
use crate::errors::TriggerError;

/// Stamp the restart-marker annotation on a deployment's pod template so the
/// control plane rolls its pods. Unrelated template annotations are left
/// untouched; repeated calls only overwrite the marker value.
///
/// The mutation is a full read-modify-write rather than a blind patch: the
/// object is fetched, mutated and replaced carrying its resourceVersion, so
/// a concurrent edit surfaces as a 409 instead of being clobbered. On 409
/// the whole cycle re-runs up to `cfg.conflict_retries` extra times before
/// the conflict is surfaced to the caller.
pub async fn trigger_restart(
    provider: &dyn WorkloadProvider,
    namespace: &str,
    name: &str,
    cfg: &RolloutConfig,
) -> Result<(), TriggerError> {
    let mut attempts_left = cfg.conflict_retries;
    loop {
        match restart_once(provider, namespace, name, &cfg.restart_annotation)
            .await
        {
            Err(TriggerError::Conflict { .. }) if attempts_left > 0 => {
                attempts_left -= 1;
                warn!(
                    %namespace,
                    deployment = %name,
                    attempts_left,
                    "conflicting write, retrying"
                );
            }
            other => return other,
        }
    }
}

async fn restart_once(
    provider: &dyn WorkloadProvider,
    namespace: &str,
    name: &str,
    annotation: &str,
) -> Result<(), TriggerError> {
    let mut deployment = provider
        .get_deployment(namespace, name)
        .await
        .map_err(|e| classify(e, namespace, name))?;

    template_annotations(&mut deployment)
        .insert(annotation.to_string(), Utc::now().to_rfc3339());

    provider
        .replace_deployment(namespace, name, &deployment)
        .await
        .map_err(|e| classify(e, namespace, name))?;
    debug!(%namespace, deployment = %name, "restart annotation stamped");
    Ok(())
}

/// Pod-template annotation map, created empty when absent.
fn template_annotations(
    deployment: &mut Deployment,
) -> &mut BTreeMap<String, String> {
    deployment
        .spec
        .get_or_insert_default()
        .template
        .metadata
        .get_or_insert_default()
        .annotations
        .get_or_insert_default()
}

fn classify(err: kube::Error, namespace: &str, name: &str) -> TriggerError {
    match err {
        kube::Error::Api(ae) if ae.code == 404 => TriggerError::NotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        kube::Error::Api(ae) if ae.code == 409 => TriggerError::Conflict {
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        other => TriggerError::Api(other),
    }
}
