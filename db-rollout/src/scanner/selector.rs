use k8s_openapi::api::core::v1::Pod;

/// Naming-convention predicate for stateful workloads: case-sensitive
/// substring match of the marker token anywhere in the pod name.
pub fn is_target(marker: &str, pod: &Pod) -> bool {
    pod.metadata
        .name
        .as_deref()
        .map(|name| name.contains(marker))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pod(name: &str) -> Pod {
        serde_json::from_value(json!({ "metadata": { "name": name } }))
            .unwrap()
    }

    #[test]
    fn matches_substring_anywhere() {
        assert!(is_target("database", &pod("database-primary-0")));
        assert!(is_target("database", &pod("core-database")));
        assert!(is_target("database", &pod("my-database-replica-1")));
    }

    #[test]
    fn rejects_non_matching_names() {
        assert!(!is_target("database", &pod("frontend-1")));
        assert!(!is_target("database", &pod("data-base")));
    }

    #[test]
    fn match_is_case_sensitive() {
        assert!(!is_target("database", &pod("Database-primary")));
    }

    #[test]
    fn marker_token_is_configurable() {
        assert!(is_target("postgres", &pod("postgres-main-0")));
        assert!(!is_target("postgres", &pod("database-primary-0")));
    }

    #[test]
    fn nameless_pod_never_matches() {
        let p: Pod = serde_json::from_value(json!({ "metadata": {} })).unwrap();
        assert!(!is_target("database", &p));
    }
}
