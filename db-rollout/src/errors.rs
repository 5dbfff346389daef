use thiserror::Error;

/// Failures that abort a whole pass. Only the initial pod listing qualifies;
/// without it there is no work to do.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to list pods: {0}")]
    ListInstances(#[source] kube::Error),
}

/// Per-deployment restart failures. Recorded in the pod's outcome; never
/// fatal to the pass.
#[derive(Error, Debug)]
pub enum TriggerError {
    #[error("deployment {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    #[error("conflicting write on deployment {namespace}/{name}")]
    Conflict { namespace: String, name: String },

    #[error("api error: {0}")]
    Api(#[source] kube::Error),
}
