//! ElastiCache implementation of the remote cache API

use crate::error::api_error;
use async_trait::async_trait;
use aws_sdk_elasticache::operation::delete_cache_cluster::DeleteCacheClusterError;
use aws_sdk_elasticache::operation::describe_cache_clusters::DescribeCacheClustersError;
use aws_sdk_elasticache::operation::modify_cache_cluster::ModifyCacheClusterError;
use aws_sdk_elasticache::types::CacheCluster as SdkCacheCluster;
use cacheflow_cloud::{
    ApiError, CacheClient, CacheClusterRecord, CreateCacheClusterInput, DeleteCacheClusterInput,
    DescribeCacheClustersInput, ModifyCacheClusterInput,
};

/// AWS ElastiCache client
#[derive(Debug, Clone)]
pub struct ElastiCacheClient {
    inner: aws_sdk_elasticache::Client,
}

impl ElastiCacheClient {
    pub fn new(inner: aws_sdk_elasticache::Client) -> Self {
        Self { inner }
    }

    pub fn from_conf(config: &aws_config::SdkConfig) -> Self {
        Self::new(aws_sdk_elasticache::Client::new(config))
    }
}

#[async_trait]
impl CacheClient for ElastiCacheClient {
    async fn describe_cache_clusters(
        &self,
        input: DescribeCacheClustersInput,
    ) -> Result<Vec<CacheClusterRecord>, ApiError> {
        tracing::debug!("DescribeCacheClusters {}", input.cache_cluster_id);

        let output = self
            .inner
            .describe_cache_clusters()
            .cache_cluster_id(input.cache_cluster_id)
            .send()
            .await
            .map_err(|e| api_error(e, DescribeCacheClustersError::is_cache_cluster_not_found_fault))?;

        Ok(output.cache_clusters().iter().map(to_record).collect())
    }

    async fn create_cache_cluster(&self, input: CreateCacheClusterInput) -> Result<(), ApiError> {
        tracing::debug!("CreateCacheCluster {}", input.cache_cluster_id);

        self.inner
            .create_cache_cluster()
            .cache_cluster_id(input.cache_cluster_id)
            .cache_node_type(input.cache_node_type)
            .num_cache_nodes(input.num_cache_nodes)
            .set_engine(input.engine)
            .set_engine_version(input.engine_version)
            .send()
            .await
            .map_err(|e| api_error(e, |_| false))?;

        Ok(())
    }

    async fn modify_cache_cluster(&self, input: ModifyCacheClusterInput) -> Result<(), ApiError> {
        tracing::debug!("ModifyCacheCluster {}", input.cache_cluster_id);

        self.inner
            .modify_cache_cluster()
            .cache_cluster_id(input.cache_cluster_id)
            .cache_node_type(input.cache_node_type)
            .num_cache_nodes(input.num_cache_nodes)
            .apply_immediately(input.apply_immediately)
            .send()
            .await
            .map_err(|e| api_error(e, ModifyCacheClusterError::is_cache_cluster_not_found_fault))?;

        Ok(())
    }

    async fn delete_cache_cluster(&self, input: DeleteCacheClusterInput) -> Result<(), ApiError> {
        tracing::debug!("DeleteCacheCluster {}", input.cache_cluster_id);

        self.inner
            .delete_cache_cluster()
            .cache_cluster_id(input.cache_cluster_id)
            .send()
            .await
            .map_err(|e| api_error(e, DeleteCacheClusterError::is_cache_cluster_not_found_fault))?;

        Ok(())
    }
}

fn to_record(cluster: &SdkCacheCluster) -> CacheClusterRecord {
    CacheClusterRecord {
        cache_cluster_id: cluster.cache_cluster_id().map(str::to_string),
        cache_cluster_status: cluster.cache_cluster_status().map(str::to_string),
        cache_node_type: cluster.cache_node_type().map(str::to_string),
        num_cache_nodes: cluster.num_cache_nodes(),
        engine_version: cluster.engine_version().map(str::to_string),
    }
}
