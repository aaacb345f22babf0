use cacheflow_cloud::fake::FakeCacheClient;
use cacheflow_cloud::{ApiError, CacheClusterRecord};
use std::sync::{Arc, Mutex};

/// Remote cache cluster as the simulated provider sees it
#[derive(Debug, Clone)]
pub struct RemoteCluster {
    pub id: String,
    pub status: String,
    pub node_type: String,
    pub nodes: i32,
}

/// A provider whose state survives across ticks
#[derive(Clone, Default)]
pub struct SimulatedProvider {
    pub remote: Arc<Mutex<Option<RemoteCluster>>>,
}

impl SimulatedProvider {
    pub fn new() -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        Self::default()
    }

    /// Move the remote cluster to `status`, as the provider would over time
    pub fn settle(&self, status: &str) {
        if let Some(cluster) = self.remote.lock().unwrap().as_mut() {
            cluster.status = status.to_string();
        }
    }

    /// Forget the remote cluster, as if deletion finished
    pub fn vanish(&self) {
        self.remote.lock().unwrap().take();
    }

    pub fn snapshot(&self) -> Option<RemoteCluster> {
        self.remote.lock().unwrap().clone()
    }

    pub fn client(&self) -> FakeCacheClient {
        let describe = self.remote.clone();
        let create = self.remote.clone();
        let modify = self.remote.clone();
        let delete = self.remote.clone();

        FakeCacheClient::new()
            .on_describe(move |input| match describe.lock().unwrap().as_ref() {
                Some(c) if c.id == input.cache_cluster_id => Ok(vec![
                    CacheClusterRecord::new(c.id.clone())
                        .with_status(c.status.clone())
                        .with_nodes(c.node_type.clone(), c.nodes),
                ]),
                _ => Err(ApiError::NotFound(input.cache_cluster_id.clone())),
            })
            .on_create(move |input| {
                let mut remote = create.lock().unwrap();
                if remote.is_some() {
                    return Err(ApiError::service(
                        "CacheClusterAlreadyExists",
                        "cache cluster already exists",
                    ));
                }
                *remote = Some(RemoteCluster {
                    id: input.cache_cluster_id.clone(),
                    status: "creating".to_string(),
                    node_type: input.cache_node_type.clone(),
                    nodes: input.num_cache_nodes,
                });
                Ok(())
            })
            .on_modify(move |input| match modify.lock().unwrap().as_mut() {
                Some(c) if c.status == "available" => {
                    c.status = "modifying".to_string();
                    c.node_type = input.cache_node_type.clone();
                    c.nodes = input.num_cache_nodes;
                    Ok(())
                }
                Some(_) => Err(ApiError::service(
                    "InvalidCacheClusterState",
                    "cache cluster is not available",
                )),
                None => Err(ApiError::NotFound(input.cache_cluster_id.clone())),
            })
            .on_delete(move |input| match delete.lock().unwrap().as_mut() {
                Some(c) => {
                    c.status = "deleting".to_string();
                    Ok(())
                }
                None => Err(ApiError::NotFound(input.cache_cluster_id.clone())),
            })
    }
}
