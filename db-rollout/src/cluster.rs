use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet};
use k8s_openapi::api::core::v1::Pod;
use kube::Client;
use kube::api::{Api, ListParams, PostParams};

/// Page size for the cluster-wide pod listing.
const LIST_PAGE_LIMIT: u32 = 500;

/// Narrow seam over the control-plane API. Everything the scanner needs from
/// the cluster goes through this trait, so tests can substitute an in-memory
/// implementation.
#[async_trait]
pub trait WorkloadProvider: Send + Sync + 'static {
    /// List pods across all namespaces at a single point in time.
    async fn list_pods(&self) -> Result<Vec<Pod>, kube::Error>;

    async fn get_replica_set(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ReplicaSet, kube::Error>;

    async fn get_deployment(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Deployment, kube::Error>;

    /// Replace a deployment with a mutated copy of a previously fetched
    /// state. The object carries its resourceVersion, so a concurrent edit
    /// surfaces as a 409 from the API server.
    async fn replace_deployment(
        &self,
        namespace: &str,
        name: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, kube::Error>;
}

pub struct KubeWorkloadProvider {
    client: Client,
}

impl KubeWorkloadProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WorkloadProvider for KubeWorkloadProvider {
    async fn list_pods(&self) -> Result<Vec<Pod>, kube::Error> {
        let api: Api<Pod> = Api::all(self.client.clone());
        let mut pods = Vec::new();
        let mut lp = ListParams::default().limit(LIST_PAGE_LIMIT);
        loop {
            let page = api.list(&lp).await?;
            pods.extend(page.items);
            match page.metadata.continue_ {
                Some(token) if !token.is_empty() => {
                    lp = lp.continue_token(&token);
                }
                _ => break,
            }
        }
        Ok(pods)
    }

    async fn get_replica_set(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ReplicaSet, kube::Error> {
        let api: Api<ReplicaSet> =
            Api::namespaced(self.client.clone(), namespace);
        api.get(name).await
    }

    async fn get_deployment(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Deployment, kube::Error> {
        let api: Api<Deployment> =
            Api::namespaced(self.client.clone(), namespace);
        api.get(name).await
    }

    async fn replace_deployment(
        &self,
        namespace: &str,
        name: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, kube::Error> {
        let api: Api<Deployment> =
            Api::namespaced(self.client.clone(), namespace);
        api.replace(name, &PostParams::default(), deployment).await
    }
}
