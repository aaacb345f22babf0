//! Managed cache cluster resource
//!
//! The local record the scheduler hands to each reconciliation tick: the
//! desired parameters in `spec`, and the observation plus conditions written
//! back into `status`.

use crate::condition::ConditionSet;
use crate::state::CacheClusterObservation;
use serde::{Deserialize, Serialize};

/// Desired parameters of a cache cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheClusterParameters {
    /// Compute and memory capacity of the nodes (e.g. "cache.t2.small")
    pub cache_node_type: String,

    /// Number of cache nodes, at least 1
    pub num_cache_nodes: i32,

    /// Cache engine, only used on creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,

    /// Engine version, only used on creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_version: Option<String>,
}

impl CacheClusterParameters {
    pub fn new(cache_node_type: impl Into<String>, num_cache_nodes: i32) -> Self {
        Self {
            cache_node_type: cache_node_type.into(),
            num_cache_nodes,
            engine: None,
            engine_version: None,
        }
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    pub fn with_engine_version(mut self, version: impl Into<String>) -> Self {
        self.engine_version = Some(version.into());
        self
    }
}

/// Account and region the resource lives in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Named credentials profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,

    /// Name of the remote resource, set once by whoever adopts it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_name: Option<String>,

    /// Deletion has been requested for this resource
    #[serde(default)]
    pub deletion_requested: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheClusterSpec {
    #[serde(default)]
    pub provider: ProviderRef,

    pub for_provider: CacheClusterParameters,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheClusterStatus {
    #[serde(default)]
    pub conditions: ConditionSet,

    #[serde(default)]
    pub at_provider: CacheClusterObservation,
}

/// A cache cluster managed on behalf of a local desired-state record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheCluster {
    pub metadata: ObjectMeta,
    pub spec: CacheClusterSpec,
    #[serde(default)]
    pub status: CacheClusterStatus,
}

impl CacheCluster {
    pub fn new(name: impl Into<String>, params: CacheClusterParameters) -> Self {
        Self {
            metadata: ObjectMeta {
                name: name.into(),
                ..Default::default()
            },
            spec: CacheClusterSpec {
                provider: ProviderRef::default(),
                for_provider: params,
            },
            status: CacheClusterStatus::default(),
        }
    }

    pub fn with_external_name(mut self, external_name: impl Into<String>) -> Self {
        self.metadata.external_name = Some(external_name.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.spec.provider.region = Some(region.into());
        self
    }

    pub fn with_observation(mut self, observation: CacheClusterObservation) -> Self {
        self.status.at_provider = observation;
        self
    }

    /// Identifier of the remote cache cluster.
    ///
    /// Falls back to the resource name when no external name was recorded.
    pub fn external_name(&self) -> &str {
        self.metadata
            .external_name
            .as_deref()
            .unwrap_or(&self.metadata.name)
    }

    pub fn params(&self) -> &CacheClusterParameters {
        &self.spec.for_provider
    }

    pub fn conditions(&self) -> &ConditionSet {
        &self.status.conditions
    }

    pub fn mark_for_deletion(&mut self) {
        self.metadata.deletion_requested = true;
    }
}
