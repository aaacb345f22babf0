//! CacheFlow Cloud
//!
//! This crate provides the provider-independent lifecycle reconciler for
//! managed cache clusters. Given the desired parameters of a cluster and the
//! last observed remote state, it decides whether the remote cluster must be
//! created, modified or deleted, and records the outcome as an observation
//! plus status conditions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              reconciliation scheduler            │
//! │            (requeue, backoff, storage)           │
//! └─────────────────┬───────────────────────────────┘
//!                   │ one tick
//! ┌─────────────────▼───────────────────────────────┐
//! │               cacheflow-cloud                    │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  Reconciler → Connector → ExternalClient │   │
//! │  │  observe / create / update / delete      │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │  Conditions  │  │  Observation │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────┬───────────────────────┘
//!         │ trait CacheClient
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │ aws elasticache│ │  fake (tests) │
//! └───────────────┘ └───────────────┘
//! ```

pub mod action;
pub mod condition;
pub mod context;
pub mod error;
pub mod external;
pub mod fake;
pub mod provider;
pub mod reconciler;
pub mod resource;
pub mod state;

// Re-exports
pub use action::{ActionType, ReconcileOutcome};
pub use condition::{Condition, ConditionReason, ConditionSet, ConditionStatus, ConditionType};
pub use context::{CallContext, CancelHandle};
pub use error::{ApiError, ConnectError, Error, Operation, Result};
pub use external::{ExternalClient, ExternalCreation, ExternalObservation, ExternalUpdate};
pub use provider::{
    CacheClient, CacheClusterRecord, Connector, CreateCacheClusterInput, DeleteCacheClusterInput,
    DescribeCacheClustersInput, ModifyCacheClusterInput,
};
pub use reconciler::Reconciler;
pub use resource::{
    CacheCluster, CacheClusterParameters, CacheClusterSpec, CacheClusterStatus, ObjectMeta,
    ProviderRef,
};
pub use state::{CacheClusterObservation, ClusterStatus, is_up_to_date};
