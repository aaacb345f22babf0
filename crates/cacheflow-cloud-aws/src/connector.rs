//! AWS connector
//!
//! Resolves the region and profile for a cache cluster and binds an
//! [`ElastiCacheClient`] to them for one reconciliation tick.

use crate::client::ElastiCacheClient;
use crate::config::AwsConfig;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_elasticache::config::Region;
use cacheflow_cloud::{CacheCluster, CallContext, ConnectError, Connector, ExternalClient};

/// Builds ElastiCache clients from the default AWS provider chain
#[derive(Debug, Clone, Default)]
pub struct AwsConnector {
    config: AwsConfig,
}

impl AwsConnector {
    pub fn new(config: AwsConfig) -> Self {
        Self { config }
    }

    /// Connector configured from `CACHEFLOW_*` environment variables
    pub fn from_env() -> Result<Self, ConnectError> {
        Ok(Self::new(AwsConfig::from_env()?))
    }

    pub fn config(&self) -> &AwsConfig {
        &self.config
    }

    async fn load_sdk_config(&self, cr: &CacheCluster) -> aws_config::SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = self.config.region_for(cr) {
            loader = loader.region(Region::new(region.to_string()));
        }
        if let Some(profile) = self.config.profile_for(cr) {
            loader = loader.profile_name(profile);
        }
        if let Some(url) = &self.config.endpoint_url {
            loader = loader.endpoint_url(url);
        }

        loader.load().await
    }
}

#[async_trait]
impl Connector for AwsConnector {
    type Client = ElastiCacheClient;

    async fn connect(
        &self,
        cr: &CacheCluster,
        ctx: CallContext,
    ) -> Result<ExternalClient<ElastiCacheClient>, ConnectError> {
        let sdk_config = self.load_sdk_config(cr).await;

        let Some(region) = sdk_config.region() else {
            return Err(ConnectError::MissingRegion(cr.metadata.name.clone()));
        };

        tracing::debug!(
            cache_cluster = %cr.external_name(),
            region = %region,
            "Connected to ElastiCache"
        );

        let client = ElastiCacheClient::from_conf(&sdk_config);
        let ctx = ctx.with_call_timeout(self.config.call_timeout());
        Ok(ExternalClient::new(client).with_context(ctx))
    }
}
