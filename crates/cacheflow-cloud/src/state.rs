//! Observed state of remote cache clusters
//!
//! Maps provider records into the normalized [`CacheClusterObservation`] and
//! decides whether the observed state already satisfies the desired one.

use crate::provider::CacheClusterRecord;
use crate::resource::CacheClusterParameters;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status token reported by the provider.
///
/// Only `available` and `creating` drive decisions; any other token is kept
/// verbatim so it can be surfaced to users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClusterStatus {
    Creating,
    Available,
    Modifying,
    Deleting,
    /// No status observed yet
    #[default]
    Absent,
    Other(String),
}

impl ClusterStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ClusterStatus::Creating => "creating",
            ClusterStatus::Available => "available",
            ClusterStatus::Modifying => "modifying",
            ClusterStatus::Deleting => "deleting",
            ClusterStatus::Absent => "",
            ClusterStatus::Other(s) => s,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ClusterStatus::Available)
    }
}

impl From<&str> for ClusterStatus {
    fn from(s: &str) -> Self {
        match s {
            "creating" => ClusterStatus::Creating,
            "available" => ClusterStatus::Available,
            "modifying" => ClusterStatus::Modifying,
            "deleting" => ClusterStatus::Deleting,
            "" => ClusterStatus::Absent,
            other => ClusterStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for ClusterStatus {
    fn from(s: String) -> Self {
        ClusterStatus::from(s.as_str())
    }
}

impl From<ClusterStatus> for String {
    fn from(status: ClusterStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last-known remote snapshot of a cache cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheClusterObservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_cluster_id: Option<String>,

    pub cache_cluster_status: ClusterStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_node_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_cache_nodes: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_version: Option<String>,
}

impl CacheClusterObservation {
    pub fn with_status(mut self, status: ClusterStatus) -> Self {
        self.cache_cluster_status = status;
        self
    }
}

impl From<&CacheClusterRecord> for CacheClusterObservation {
    fn from(record: &CacheClusterRecord) -> Self {
        Self {
            cache_cluster_id: record.cache_cluster_id.clone(),
            cache_cluster_status: record
                .cache_cluster_status
                .as_deref()
                .map(ClusterStatus::from)
                .unwrap_or_default(),
            cache_node_type: record.cache_node_type.clone(),
            num_cache_nodes: record.num_cache_nodes,
            engine_version: record.engine_version.clone(),
        }
    }
}

/// Whether no mutating call is needed for `observed` to satisfy `desired`.
pub fn is_up_to_date(desired: &CacheClusterParameters, observed: &CacheClusterObservation) -> bool {
    observed.cache_cluster_status.is_available()
        && observed.cache_node_type.as_deref() == Some(desired.cache_node_type.as_str())
        && observed.num_cache_nodes == Some(desired.num_cache_nodes)
}
