// Read-only access to the cluster control plane
pub mod events;
pub mod pods;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Event, Pod};
use kube::{
    api::{ListParams, LogParams},
    Api, Client,
};
use tracing::{debug, info};

use crate::error::{DiscoveryError, EventFetchError, LogFetchError};
use crate::types::{PodPhase, TargetSelector, WorkloadRef};

pub use events::render_events;
pub use pods::{choose_target, parse_pod_phase};

/// Queries the pipeline needs from the control plane. None of them mutate cluster state.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    async fn select_target(&self, selector: &TargetSelector) -> Result<WorkloadRef, DiscoveryError>;

    async fn fetch_logs(&self, target: &WorkloadRef) -> Result<String, LogFetchError>;

    async fn fetch_events(&self, namespace: &str) -> Result<String, EventFetchError>;

    async fn fetch_status(&self, target: &WorkloadRef) -> Result<PodPhase, DiscoveryError>;
}

pub struct KubeClusterClient {
    client: Client,
    namespace: String,
    container: Option<String>,
}

impl KubeClusterClient {
    pub fn new(client: Client, namespace: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
            container: None,
        }
    }

    /// Container whose logs are read; the pod's only container when unset.
    pub fn with_container(mut self, container: Option<String>) -> Self {
        self.container = container;
        self
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, DiscoveryError> {
        match self.pods(namespace).get(name).await {
            Ok(pod) => Ok(pod),
            Err(kube::Error::Api(ae)) if ae.code == 404 => Err(DiscoveryError::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
            Err(source) => Err(DiscoveryError::Query {
                namespace: namespace.to_string(),
                source,
            }),
        }
    }
}

#[async_trait]
impl ClusterClient for KubeClusterClient {
    async fn select_target(&self, selector: &TargetSelector) -> Result<WorkloadRef, DiscoveryError> {
        let target = match selector {
            TargetSelector::Named(name) => {
                let pod = self.get_pod(&self.namespace, name).await?;
                let name = pod.metadata.name.unwrap_or_else(|| name.clone());
                WorkloadRef::new(name, self.namespace.clone())?
            }
            TargetSelector::Labels(labels) => {
                let lp = ListParams::default().labels(labels);
                let pods = self.pods(&self.namespace).list(&lp).await.map_err(|source| {
                    DiscoveryError::Query {
                        namespace: self.namespace.clone(),
                        source,
                    }
                })?;
                debug!("{} pods match {}", pods.items.len(), labels);
                choose_target(&pods.items, &self.namespace, selector)?
            }
            TargetSelector::MostRecentlyScheduled => {
                let pods = self
                    .pods(&self.namespace)
                    .list(&ListParams::default())
                    .await
                    .map_err(|source| DiscoveryError::Query {
                        namespace: self.namespace.clone(),
                        source,
                    })?;
                debug!("{} pods listed in {}", pods.items.len(), self.namespace);
                choose_target(&pods.items, &self.namespace, selector)?
            }
        };
        info!("selected target {} ({})", target, selector);
        Ok(target)
    }

    async fn fetch_logs(&self, target: &WorkloadRef) -> Result<String, LogFetchError> {
        let lp = LogParams {
            container: self.container.clone(),
            ..Default::default()
        };
        let logs = self
            .pods(target.namespace())
            .logs(target.name(), &lp)
            .await
            .map_err(|source| LogFetchError::Query {
                namespace: target.namespace().to_string(),
                pod: target.name().to_string(),
                source,
            })?;
        debug!("read {} bytes of logs from {}", logs.len(), target);
        Ok(logs)
    }

    async fn fetch_events(&self, namespace: &str) -> Result<String, EventFetchError> {
        let api: Api<Event> = Api::namespaced(self.client.clone(), namespace);
        let events = api
            .list(&ListParams::default())
            .await
            .map_err(|source| EventFetchError::Query {
                namespace: namespace.to_string(),
                source,
            })?;
        debug!("listed {} events in {}", events.items.len(), namespace);
        Ok(render_events(&events.items, namespace))
    }

    async fn fetch_status(&self, target: &WorkloadRef) -> Result<PodPhase, DiscoveryError> {
        let pod = self.get_pod(target.namespace(), target.name()).await?;
        parse_pod_phase(&pod)
    }
}
