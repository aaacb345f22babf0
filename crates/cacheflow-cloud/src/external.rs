//! Lifecycle operations against a remote cache cluster
//!
//! [`ExternalClient`] is what the scheduler drives on every tick: observe the
//! remote resource, then create, update or delete it. Each operation issues at
//! most one remote call and never retries.

use crate::condition::Condition;
use crate::context::CallContext;
use crate::error::{Error, Result};
use crate::provider::{
    CacheClient, CacheClusterRecord, CreateCacheClusterInput, DeleteCacheClusterInput,
    DescribeCacheClustersInput, ModifyCacheClusterInput,
};
use crate::resource::CacheCluster;
use crate::state::{CacheClusterObservation, ClusterStatus, is_up_to_date};
use tracing::{debug, info, warn};

/// Result of observing the remote resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalObservation {
    pub resource_exists: bool,
    pub resource_up_to_date: bool,
}

impl ExternalObservation {
    /// The remote resource does not exist (yet)
    pub fn absent() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalCreation {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalUpdate {}

/// Client bound to one resource's account/region for a single tick
pub struct ExternalClient<C> {
    client: C,
    ctx: CallContext,
}

impl<C: CacheClient> ExternalClient<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            ctx: CallContext::background(),
        }
    }

    pub fn with_context(mut self, ctx: CallContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn context(&self) -> &CallContext {
        &self.ctx
    }

    /// Describe the remote cache cluster and record what was found.
    ///
    /// A not-found answer means the cluster has not been created yet and is
    /// not an error. Any other failure leaves `cr` untouched.
    pub async fn observe(&self, cr: &mut CacheCluster) -> Result<ExternalObservation> {
        let name = cr.external_name().to_string();
        debug!(cache_cluster = %name, "Describing cache cluster");

        let input = DescribeCacheClustersInput {
            cache_cluster_id: name.clone(),
        };
        let records = match self
            .ctx
            .run(self.client.describe_cache_clusters(input))
            .await
        {
            Ok(records) => records,
            Err(e) if e.is_not_found() => {
                debug!(cache_cluster = %name, "Cache cluster does not exist");
                return Ok(ExternalObservation::absent());
            }
            Err(e) => {
                warn!(cache_cluster = %name, error = %e, "Describe failed");
                return Err(Error::Describe(e));
            }
        };

        let Some(record) = select_record(&records, &name) else {
            debug!(cache_cluster = %name, "Describe returned no cache clusters");
            return Ok(ExternalObservation::absent());
        };

        let observation = CacheClusterObservation::from(record);
        match observation.cache_cluster_status {
            ClusterStatus::Creating => {
                cr.status.conditions.set(Condition::creating());
            }
            ClusterStatus::Available => {
                cr.status.conditions.set(Condition::available());
            }
            _ => {}
        }

        let up_to_date = is_up_to_date(cr.params(), &observation);
        debug!(
            cache_cluster = %name,
            status = %observation.cache_cluster_status,
            up_to_date,
            "Observed cache cluster"
        );
        cr.status.at_provider = observation;

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: up_to_date,
        })
    }

    /// Request creation of the cache cluster.
    ///
    /// The resource is marked Creating before the call is made and stays so
    /// when the call fails; the next observe decides what actually happened.
    pub async fn create(&self, cr: &mut CacheCluster) -> Result<ExternalCreation> {
        cr.status.conditions.set(Condition::creating());

        let params = cr.params();
        let input = CreateCacheClusterInput {
            cache_cluster_id: cr.external_name().to_string(),
            cache_node_type: params.cache_node_type.clone(),
            num_cache_nodes: params.num_cache_nodes,
            engine: params.engine.clone(),
            engine_version: params.engine_version.clone(),
        };
        info!(
            cache_cluster = %input.cache_cluster_id,
            node_type = %input.cache_node_type,
            nodes = input.num_cache_nodes,
            "Creating cache cluster"
        );

        self.ctx
            .run(self.client.create_cache_cluster(input))
            .await
            .map_err(|e| {
                warn!(cache_cluster = %cr.external_name(), error = %e, "Create failed");
                Error::Create(e)
            })?;

        Ok(ExternalCreation::default())
    }

    /// Modify the cache cluster to match the desired parameters.
    ///
    /// Only a cluster last observed as available is modified; otherwise this
    /// returns without calling the provider and a later tick tries again.
    pub async fn update(&self, cr: &mut CacheCluster) -> Result<ExternalUpdate> {
        let status = &cr.status.at_provider.cache_cluster_status;
        if !status.is_available() {
            debug!(
                cache_cluster = %cr.external_name(),
                status = %status,
                "Cache cluster is not available, skipping modify"
            );
            return Ok(ExternalUpdate::default());
        }

        let params = cr.params();
        let input = ModifyCacheClusterInput {
            cache_cluster_id: cr.external_name().to_string(),
            cache_node_type: params.cache_node_type.clone(),
            num_cache_nodes: params.num_cache_nodes,
            apply_immediately: true,
        };
        info!(
            cache_cluster = %input.cache_cluster_id,
            node_type = %input.cache_node_type,
            nodes = input.num_cache_nodes,
            "Modifying cache cluster"
        );

        self.ctx
            .run(self.client.modify_cache_cluster(input))
            .await
            .map_err(|e| {
                warn!(cache_cluster = %cr.external_name(), error = %e, "Modify failed");
                Error::Modify(e)
            })?;

        Ok(ExternalUpdate::default())
    }

    /// Request deletion of the cache cluster.
    ///
    /// The resource is marked Deleting before the call and stays so on failure.
    pub async fn delete(&self, cr: &mut CacheCluster) -> Result<()> {
        cr.status.conditions.set(Condition::deleting());

        let input = DeleteCacheClusterInput {
            cache_cluster_id: cr.external_name().to_string(),
        };
        info!(cache_cluster = %input.cache_cluster_id, "Deleting cache cluster");

        self.ctx
            .run(self.client.delete_cache_cluster(input))
            .await
            .map_err(|e| {
                warn!(cache_cluster = %cr.external_name(), error = %e, "Delete failed");
                Error::Delete(e)
            })
    }
}

/// Prefer the record whose id matches, otherwise take the first one.
fn select_record<'a>(records: &'a [CacheClusterRecord], name: &str) -> Option<&'a CacheClusterRecord> {
    records
        .iter()
        .find(|r| r.cache_cluster_id.as_deref() == Some(name))
        .or_else(|| records.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{ConditionReason, ConditionSet, ConditionType};
    use crate::error::ApiError;
    use crate::fake::{FakeCacheClient, FakeCall};
    use crate::resource::CacheClusterParameters;

    const EXTERNAL_NAME: &str = "somecluster";
    const NODE_TYPE: &str = "t2.small";

    fn boom() -> ApiError {
        ApiError::Transport("boom".to_string())
    }

    fn cluster(nodes: i32) -> CacheCluster {
        CacheCluster::new("redis-cache", CacheClusterParameters::new(NODE_TYPE, nodes))
            .with_external_name(EXTERNAL_NAME)
    }

    fn available(cr: CacheCluster) -> CacheCluster {
        cr.with_observation(CacheClusterObservation::default().with_status(ClusterStatus::Available))
    }

    fn conditions(list: impl IntoIterator<Item = Condition>) -> ConditionSet {
        list.into_iter().collect()
    }

    #[tokio::test]
    async fn test_observe_creating() {
        let fake = FakeCacheClient::new().on_describe(|_| {
            Ok(vec![CacheClusterRecord::default().with_status("creating")])
        });
        let external = ExternalClient::new(fake);
        let mut cr = cluster(2);

        let obs = external.observe(&mut cr).await.unwrap();

        assert_eq!(
            obs,
            ExternalObservation {
                resource_exists: true,
                resource_up_to_date: false
            }
        );
        assert!(cr.conditions().equivalent(&conditions([Condition::creating()])));
        assert_eq!(
            cr.status.at_provider.cache_cluster_status,
            ClusterStatus::Creating
        );
    }

    #[tokio::test]
    async fn test_observe_up_to_date() {
        let fake = FakeCacheClient::new().on_describe(|input| {
            assert_eq!(input.cache_cluster_id, EXTERNAL_NAME);
            Ok(vec![
                CacheClusterRecord::new(EXTERNAL_NAME)
                    .with_status("available")
                    .with_nodes(NODE_TYPE, 2),
            ])
        });
        let external = ExternalClient::new(fake);
        let mut cr = cluster(2);

        let obs = external.observe(&mut cr).await.unwrap();

        assert!(obs.resource_exists);
        assert!(obs.resource_up_to_date);
        assert!(cr.conditions().equivalent(&conditions([Condition::available()])));
        assert_eq!(
            cr.status.at_provider.cache_cluster_id.as_deref(),
            Some(EXTERNAL_NAME)
        );
    }

    #[tokio::test]
    async fn test_observe_available_with_drift() {
        let fake = FakeCacheClient::new().on_describe(|_| {
            Ok(vec![
                CacheClusterRecord::new(EXTERNAL_NAME)
                    .with_status("available")
                    .with_nodes(NODE_TYPE, 2),
            ])
        });
        let external = ExternalClient::new(fake);
        let mut cr = cluster(3);

        let obs = external.observe(&mut cr).await.unwrap();

        assert!(obs.resource_exists);
        assert!(!obs.resource_up_to_date);
        assert_eq!(
            cr.conditions().reason(ConditionType::Ready),
            Some(ConditionReason::Available)
        );
    }

    #[tokio::test]
    async fn test_observe_other_status_leaves_conditions() {
        let fake = FakeCacheClient::new().on_describe(|_| {
            Ok(vec![
                CacheClusterRecord::new(EXTERNAL_NAME)
                    .with_status("modifying")
                    .with_nodes(NODE_TYPE, 2),
            ])
        });
        let external = ExternalClient::new(fake);
        let mut cr = cluster(2);
        cr.status.conditions.set(Condition::available());

        let obs = external.observe(&mut cr).await.unwrap();

        assert!(obs.resource_exists);
        assert!(!obs.resource_up_to_date);
        assert!(cr.conditions().equivalent(&conditions([Condition::available()])));
        assert_eq!(
            cr.status.at_provider.cache_cluster_status,
            ClusterStatus::Modifying
        );
    }

    #[tokio::test]
    async fn test_observe_not_found() {
        let fake = FakeCacheClient::new()
            .on_describe(|input| Err(ApiError::NotFound(input.cache_cluster_id.clone())));
        let external = ExternalClient::new(fake);
        let mut cr = cluster(2);

        let obs = external.observe(&mut cr).await.unwrap();

        assert_eq!(obs, ExternalObservation::absent());
        assert!(cr.conditions().is_empty());
        assert_eq!(cr.status.at_provider, CacheClusterObservation::default());
    }

    #[tokio::test]
    async fn test_observe_empty_list_is_absent() {
        let fake = FakeCacheClient::new().on_describe(|_| Ok(Vec::new()));
        let external = ExternalClient::new(fake);
        let mut cr = cluster(2);

        let obs = external.observe(&mut cr).await.unwrap();
        assert!(!obs.resource_exists);
        assert!(!obs.resource_up_to_date);
    }

    #[tokio::test]
    async fn test_observe_describe_fail_leaves_resource() {
        let fake = FakeCacheClient::new().on_describe(|_| Err(boom()));
        let external = ExternalClient::new(fake);
        let mut cr = available(cluster(2));
        cr.status.conditions.set(Condition::available());
        let before = cr.clone();

        let err = external.observe(&mut cr).await.unwrap_err();

        assert_eq!(err, Error::Describe(boom()));
        assert!(cr.conditions().equivalent(before.conditions()));
        assert_eq!(cr.status.at_provider, before.status.at_provider);
    }

    #[tokio::test]
    async fn test_observe_prefers_matching_record() {
        let fake = FakeCacheClient::new().on_describe(|_| {
            Ok(vec![
                CacheClusterRecord::new("other").with_status("deleting"),
                CacheClusterRecord::new(EXTERNAL_NAME)
                    .with_status("available")
                    .with_nodes(NODE_TYPE, 2),
            ])
        });
        let external = ExternalClient::new(fake);
        let mut cr = cluster(2);

        let obs = external.observe(&mut cr).await.unwrap();
        assert!(obs.resource_up_to_date);
    }

    #[tokio::test]
    async fn test_create_successful() {
        let fake = FakeCacheClient::new().on_create(|_| Ok(()));
        let external = ExternalClient::new(fake);
        let mut cr = cluster(2);

        let created = external.create(&mut cr).await.unwrap();

        assert_eq!(created, ExternalCreation::default());
        assert!(cr.conditions().equivalent(&conditions([Condition::creating()])));
        assert_eq!(
            external.client().calls(),
            vec![FakeCall::Create(CreateCacheClusterInput {
                cache_cluster_id: EXTERNAL_NAME.to_string(),
                cache_node_type: NODE_TYPE.to_string(),
                num_cache_nodes: 2,
                engine: None,
                engine_version: None,
            })]
        );
    }

    #[tokio::test]
    async fn test_create_fail_still_creating() {
        let fake = FakeCacheClient::new().on_create(|_| Err(boom()));
        let external = ExternalClient::new(fake);
        let mut cr = cluster(2);

        let err = external.create(&mut cr).await.unwrap_err();

        assert_eq!(err, Error::Create(boom()));
        assert!(cr.conditions().equivalent(&conditions([Condition::creating()])));
    }

    #[tokio::test]
    async fn test_create_passes_engine() {
        let fake = FakeCacheClient::new().on_create(|input| {
            assert_eq!(input.engine.as_deref(), Some("redis"));
            assert_eq!(input.engine_version.as_deref(), Some("7.1"));
            Ok(())
        });
        let external = ExternalClient::new(fake);
        let mut cr = CacheCluster::new(
            "redis-cache",
            CacheClusterParameters::new(NODE_TYPE, 1)
                .with_engine("redis")
                .with_engine_version("7.1"),
        );

        external.create(&mut cr).await.unwrap();
        assert_eq!(external.client().call_count(), 1);
    }

    #[tokio::test]
    async fn test_update_successful() {
        let fake = FakeCacheClient::new().on_modify(|input| {
            assert_eq!(input.num_cache_nodes, 3);
            assert!(input.apply_immediately);
            Ok(())
        });
        let external = ExternalClient::new(fake);
        let mut cr = available(cluster(3));

        let updated = external.update(&mut cr).await.unwrap();

        assert_eq!(updated, ExternalUpdate::default());
        assert_eq!(external.client().call_count(), 1);
        assert!(cr.conditions().is_empty());
    }

    #[tokio::test]
    async fn test_update_modify_failed() {
        let fake = FakeCacheClient::new().on_modify(|_| Err(boom()));
        let external = ExternalClient::new(fake);
        let mut cr = available(cluster(3));

        let err = external.update(&mut cr).await.unwrap_err();

        assert_eq!(err, Error::Modify(boom()));
        assert_eq!(external.client().call_count(), 1);
        assert!(cr.conditions().is_empty());
    }

    #[tokio::test]
    async fn test_update_skipped_unless_available() {
        for status in [
            ClusterStatus::Absent,
            ClusterStatus::Creating,
            ClusterStatus::Modifying,
            ClusterStatus::Deleting,
        ] {
            let fake = FakeCacheClient::new().on_modify(|_| Err(boom()));
            let external = ExternalClient::new(fake);
            let mut cr = cluster(3)
                .with_observation(CacheClusterObservation::default().with_status(status.clone()));

            let updated = external.update(&mut cr).await;

            assert_eq!(updated, Ok(ExternalUpdate::default()), "status {status}");
            assert_eq!(external.client().call_count(), 0);
            assert!(cr.conditions().is_empty());
        }
    }

    #[tokio::test]
    async fn test_delete_successful() {
        let fake = FakeCacheClient::new().on_delete(|_| Ok(()));
        let external = ExternalClient::new(fake);
        let mut cr = cluster(2);
        cr.status.conditions.set(Condition::deleting());

        external.delete(&mut cr).await.unwrap();

        assert!(cr.conditions().equivalent(&conditions([Condition::deleting()])));
        assert_eq!(
            external.client().calls(),
            vec![FakeCall::Delete(DeleteCacheClusterInput {
                cache_cluster_id: EXTERNAL_NAME.to_string()
            })]
        );
    }

    #[tokio::test]
    async fn test_delete_failed_still_deleting() {
        let fake = FakeCacheClient::new().on_delete(|_| Err(boom()));
        let external = ExternalClient::new(fake);
        let mut cr = cluster(2);
        cr.status.conditions.set(Condition::available());

        let err = external.delete(&mut cr).await.unwrap_err();

        assert_eq!(err, Error::Delete(boom()));
        assert!(cr.conditions().equivalent(&conditions([Condition::deleting()])));
    }

    #[tokio::test]
    async fn test_cancelled_context_aborts_call() {
        let (ctx, handle) = CallContext::with_cancel();
        handle.cancel();
        let fake = FakeCacheClient::new().stalled();
        let external = ExternalClient::new(fake).with_context(ctx);
        let mut cr = cluster(2);

        let err = external.observe(&mut cr).await.unwrap_err();

        assert_eq!(err, Error::Describe(ApiError::Cancelled));
        assert!(err.is_cancelled());
        assert_eq!(external.client().call_count(), 0);
    }
}
