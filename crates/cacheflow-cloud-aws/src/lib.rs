//! AWS ElastiCache provider for CacheFlow
//!
//! This crate implements the `CacheClient` and `Connector` traits of
//! `cacheflow-cloud` on top of the AWS SDK, so the lifecycle reconciler can
//! manage ElastiCache cache clusters.
//!
//! # Requirements
//!
//! - Credentials from the default AWS provider chain (env, profile, IMDS...)
//! - A region, either on the resource, via `CACHEFLOW_AWS_REGION`, or from the
//!   AWS provider chain
//!
//! # Example
//!
//! ```ignore
//! use cacheflow_cloud::{CacheCluster, CacheClusterParameters, CallContext, Reconciler};
//! use cacheflow_cloud_aws::AwsConnector;
//!
//! let reconciler = Reconciler::new(AwsConnector::from_env()?);
//! let mut cr = CacheCluster::new("sessions", CacheClusterParameters::new("cache.t3.micro", 2))
//!     .with_region("us-west-2");
//!
//! let outcome = reconciler.reconcile(&mut cr, CallContext::background()).await?;
//! ```

pub mod client;
pub mod config;
pub mod connector;
mod error;

pub use client::ElastiCacheClient;
pub use config::AwsConfig;
pub use connector::AwsConnector;
