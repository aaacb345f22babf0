//! AWS provider configuration

use cacheflow_cloud::{CacheCluster, ConnectError};
use serde::Deserialize;
use std::time::Duration;

pub const ENV_REGION: &str = "CACHEFLOW_AWS_REGION";
pub const ENV_PROFILE: &str = "CACHEFLOW_AWS_PROFILE";
pub const ENV_ENDPOINT_URL: &str = "CACHEFLOW_AWS_ENDPOINT_URL";
pub const ENV_CALL_TIMEOUT: &str = "CACHEFLOW_CALL_TIMEOUT_SECS";

/// Defaults applied when a resource does not name its own region/profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsConfig {
    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub profile: Option<String>,

    /// Override the ElastiCache endpoint (local emulators)
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Timeout applied to each remote call, capped by any caller deadline
    #[serde(default)]
    pub call_timeout_secs: Option<u64>,
}

impl AwsConfig {
    /// Create AwsConfig from environment variables
    pub fn from_env() -> Result<Self, ConnectError> {
        let call_timeout_secs = match env_var(ENV_CALL_TIMEOUT) {
            Some(raw) => Some(parse_timeout(&raw)?),
            None => None,
        };

        Ok(Self {
            region: env_var(ENV_REGION),
            profile: env_var(ENV_PROFILE),
            endpoint_url: env_var(ENV_ENDPOINT_URL),
            call_timeout_secs,
        })
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Sub-second remainders round up to the next whole second
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        self.call_timeout_secs = Some(secs);
        self
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Region for `cr`: the resource's own region wins over the default
    pub fn region_for<'a>(&'a self, cr: &'a CacheCluster) -> Option<&'a str> {
        cr.spec
            .provider
            .region
            .as_deref()
            .or(self.region.as_deref())
    }

    pub fn profile_for<'a>(&'a self, cr: &'a CacheCluster) -> Option<&'a str> {
        cr.spec
            .provider
            .profile
            .as_deref()
            .or(self.profile.as_deref())
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_timeout(raw: &str) -> Result<u64, ConnectError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConnectError::InvalidConfig(format!(
            "{} must be a positive number of seconds, got {:?}",
            ENV_CALL_TIMEOUT, raw
        ))),
    }
}
