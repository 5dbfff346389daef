use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use tracing::debug;

use crate::cluster::WorkloadProvider;

const DEPLOYMENT_KIND: &str = "Deployment";
const REPLICA_SET_KIND: &str = "ReplicaSet";

/// Top-level owner of a pod, as far as its recorded references lead.
/// `Unresolved` is a normal terminal state, not a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    Deployment(String),
    Unresolved,
}

#[derive(Debug)]
pub struct Resolution {
    pub owner: Owner,
    /// Owner lookups that failed along the way. Non-empty lookup errors can
    /// accompany either outcome: a later reference may still have resolved.
    pub lookup_errors: Vec<String>,
}

/// Walk a pod's owner references to the owning deployment.
///
/// References are scanned in listed order and the first Deployment-kind
/// entry wins. The recorded order carries no controller-flag guarantee, so
/// the tie-break has to be deterministic rather than significance-driven.
/// A ReplicaSet-kind entry costs one fetch, followed by a one-level scan of
/// that object's own references; there is no deeper recursion. A failed
/// fetch is recorded and the remaining references are still examined.
pub async fn resolve_owner(
    provider: &dyn WorkloadProvider,
    pod: &Pod,
    namespace: &str,
) -> Resolution {
    let mut lookup_errors = Vec::new();
    let refs = pod.metadata.owner_references.as_deref().unwrap_or(&[]);

    // Names already fetched within this resolution; a pod listing the same
    // ReplicaSet twice must not cost a second fetch.
    let mut fetched: Vec<&str> = Vec::new();

    for owner_ref in refs {
        match owner_ref.kind.as_str() {
            DEPLOYMENT_KIND => {
                return Resolution {
                    owner: Owner::Deployment(owner_ref.name.clone()),
                    lookup_errors,
                };
            }
            REPLICA_SET_KIND => {
                if fetched.contains(&owner_ref.name.as_str()) {
                    continue;
                }
                fetched.push(&owner_ref.name);
                match provider
                    .get_replica_set(namespace, &owner_ref.name)
                    .await
                {
                    Ok(rs) => {
                        if let Some(name) = deployment_of(
                            rs.metadata.owner_references.as_deref(),
                        ) {
                            return Resolution {
                                owner: Owner::Deployment(name),
                                lookup_errors,
                            };
                        }
                        debug!(
                            replica_set = %owner_ref.name,
                            "replica set has no deployment owner"
                        );
                    }
                    Err(e) => {
                        lookup_errors.push(format!(
                            "replicaset {}/{}: {}",
                            namespace, owner_ref.name, e
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    Resolution {
        owner: Owner::Unresolved,
        lookup_errors,
    }
}

fn deployment_of(refs: Option<&[OwnerReference]>) -> Option<String> {
    refs.unwrap_or(&[])
        .iter()
        .find(|r| r.kind == DEPLOYMENT_KIND)
        .map(|r| r.name.clone())
}
