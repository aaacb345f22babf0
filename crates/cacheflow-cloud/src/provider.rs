//! Cache provider trait definitions

use crate::context::CallContext;
use crate::error::{ApiError, ConnectError};
use crate::external::ExternalClient;
use crate::resource::CacheCluster;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Remote cache API abstraction
///
/// Each provider (AWS ElastiCache, in-memory fake, ...) implements this trait.
/// Implementations issue exactly one remote request per call and never retry.
#[async_trait]
pub trait CacheClient: Send + Sync {
    /// Describe cache clusters matching the request
    async fn describe_cache_clusters(
        &self,
        input: DescribeCacheClustersInput,
    ) -> Result<Vec<CacheClusterRecord>, ApiError>;

    async fn create_cache_cluster(&self, input: CreateCacheClusterInput) -> Result<(), ApiError>;

    async fn modify_cache_cluster(&self, input: ModifyCacheClusterInput) -> Result<(), ApiError>;

    async fn delete_cache_cluster(&self, input: DeleteCacheClusterInput) -> Result<(), ApiError>;
}

#[async_trait]
impl<T: CacheClient + ?Sized> CacheClient for Arc<T> {
    async fn describe_cache_clusters(
        &self,
        input: DescribeCacheClustersInput,
    ) -> Result<Vec<CacheClusterRecord>, ApiError> {
        (**self).describe_cache_clusters(input).await
    }

    async fn create_cache_cluster(&self, input: CreateCacheClusterInput) -> Result<(), ApiError> {
        (**self).create_cache_cluster(input).await
    }

    async fn modify_cache_cluster(&self, input: ModifyCacheClusterInput) -> Result<(), ApiError> {
        (**self).modify_cache_cluster(input).await
    }

    async fn delete_cache_cluster(&self, input: DeleteCacheClusterInput) -> Result<(), ApiError> {
        (**self).delete_cache_cluster(input).await
    }
}

/// Builds a client bound to the account and region a resource targets.
#[async_trait]
pub trait Connector: Send + Sync {
    type Client: CacheClient;

    /// Construct the client for one reconciliation tick.
    ///
    /// No remote call is made when this fails.
    async fn connect(
        &self,
        cr: &CacheCluster,
        ctx: CallContext,
    ) -> Result<ExternalClient<Self::Client>, ConnectError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescribeCacheClustersInput {
    pub cache_cluster_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCacheClusterInput {
    pub cache_cluster_id: String,
    pub cache_node_type: String,
    pub num_cache_nodes: i32,
    pub engine: Option<String>,
    pub engine_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyCacheClusterInput {
    pub cache_cluster_id: String,
    pub cache_node_type: String,
    pub num_cache_nodes: i32,
    pub apply_immediately: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteCacheClusterInput {
    pub cache_cluster_id: String,
}

/// A cache cluster as reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheClusterRecord {
    pub cache_cluster_id: Option<String>,
    pub cache_cluster_status: Option<String>,
    pub cache_node_type: Option<String>,
    pub num_cache_nodes: Option<i32>,
    pub engine_version: Option<String>,
}

impl CacheClusterRecord {
    pub fn new(cache_cluster_id: impl Into<String>) -> Self {
        Self {
            cache_cluster_id: Some(cache_cluster_id.into()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.cache_cluster_status = Some(status.into());
        self
    }

    pub fn with_nodes(mut self, node_type: impl Into<String>, count: i32) -> Self {
        self.cache_node_type = Some(node_type.into());
        self.num_cache_nodes = Some(count);
        self
    }

    pub fn with_engine_version(mut self, version: impl Into<String>) -> Self {
        self.engine_version = Some(version.into());
        self
    }
}
