use envconfig::Envconfig;

#[derive(Envconfig, Clone, Debug)]
pub struct RolloutConfig {
    /// Substring that marks a pod as a stateful workload to restart.
    /// Matching is case-sensitive and anchored nowhere.
    /// Env: DBR_MARKER_TOKEN
    #[envconfig(from = "DBR_MARKER_TOKEN", default = "database")]
    pub marker_token: String,

    /// Pod-template annotation key stamped to force a rollout.
    /// Env: DBR_RESTART_ANNOTATION
    #[envconfig(
        from = "DBR_RESTART_ANNOTATION",
        default = "kubectl.kubernetes.io/restartedAt"
    )]
    pub restart_annotation: String,

    /// Extra read-modify-write attempts after a conflicting write (409).
    /// 0 keeps the update single-shot.
    /// Env: DBR_CONFLICT_RETRIES
    #[envconfig(from = "DBR_CONFLICT_RETRIES", default = "2")]
    pub conflict_retries: u32,
}
