//! In-memory cache provider for tests
//!
//! [`FakeCacheClient`] answers each remote call with a programmable handler
//! and records every call it receives. [`FakeConnector`] hands out clients
//! sharing one fake so a test can inspect the calls afterwards.

use crate::context::CallContext;
use crate::error::{ApiError, ConnectError};
use crate::external::ExternalClient;
use crate::provider::{
    CacheClient, CacheClusterRecord, Connector, CreateCacheClusterInput, DeleteCacheClusterInput,
    DescribeCacheClustersInput, ModifyCacheClusterInput,
};
use crate::resource::CacheCluster;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

type Handler<I, O> = Box<dyn Fn(&I) -> Result<O, ApiError> + Send + Sync>;

/// A remote call received by [`FakeCacheClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCall {
    Describe(DescribeCacheClustersInput),
    Create(CreateCacheClusterInput),
    Modify(ModifyCacheClusterInput),
    Delete(DeleteCacheClusterInput),
}

#[derive(Default)]
pub struct FakeCacheClient {
    describe: Option<Handler<DescribeCacheClustersInput, Vec<CacheClusterRecord>>>,
    create: Option<Handler<CreateCacheClusterInput, ()>>,
    modify: Option<Handler<ModifyCacheClusterInput, ()>>,
    delete: Option<Handler<DeleteCacheClusterInput, ()>>,
    stalled: bool,
    calls: Mutex<Vec<FakeCall>>,
}

impl FakeCacheClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_describe<F>(mut self, f: F) -> Self
    where
        F: Fn(&DescribeCacheClustersInput) -> Result<Vec<CacheClusterRecord>, ApiError>
            + Send
            + Sync
            + 'static,
    {
        self.describe = Some(Box::new(f));
        self
    }

    pub fn on_create<F>(mut self, f: F) -> Self
    where
        F: Fn(&CreateCacheClusterInput) -> Result<(), ApiError> + Send + Sync + 'static,
    {
        self.create = Some(Box::new(f));
        self
    }

    pub fn on_modify<F>(mut self, f: F) -> Self
    where
        F: Fn(&ModifyCacheClusterInput) -> Result<(), ApiError> + Send + Sync + 'static,
    {
        self.modify = Some(Box::new(f));
        self
    }

    pub fn on_delete<F>(mut self, f: F) -> Self
    where
        F: Fn(&DeleteCacheClusterInput) -> Result<(), ApiError> + Send + Sync + 'static,
    {
        self.delete = Some(Box::new(f));
        self
    }

    /// Never answer; calls only end through the caller's context
    pub fn stalled(mut self) -> Self {
        self.stalled = true;
        self
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    async fn answer<I, O>(
        &self,
        call: FakeCall,
        handler: &Option<Handler<I, O>>,
        input: &I,
    ) -> Result<O, ApiError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.stalled {
            std::future::pending::<()>().await;
        }
        match handler {
            Some(f) => f(input),
            None => Err(ApiError::service(
                "NotImplemented",
                "no handler programmed for this call",
            )),
        }
    }
}

#[async_trait]
impl CacheClient for FakeCacheClient {
    async fn describe_cache_clusters(
        &self,
        input: DescribeCacheClustersInput,
    ) -> Result<Vec<CacheClusterRecord>, ApiError> {
        self.answer(FakeCall::Describe(input.clone()), &self.describe, &input)
            .await
    }

    async fn create_cache_cluster(&self, input: CreateCacheClusterInput) -> Result<(), ApiError> {
        self.answer(FakeCall::Create(input.clone()), &self.create, &input)
            .await
    }

    async fn modify_cache_cluster(&self, input: ModifyCacheClusterInput) -> Result<(), ApiError> {
        self.answer(FakeCall::Modify(input.clone()), &self.modify, &input)
            .await
    }

    async fn delete_cache_cluster(&self, input: DeleteCacheClusterInput) -> Result<(), ApiError> {
        self.answer(FakeCall::Delete(input.clone()), &self.delete, &input)
            .await
    }
}

/// Connector handing out clients that share one [`FakeCacheClient`]
#[derive(Clone)]
pub struct FakeConnector {
    client: Arc<FakeCacheClient>,
    error: Option<ConnectError>,
}

impl FakeConnector {
    pub fn new(client: FakeCacheClient) -> Self {
        Self {
            client: Arc::new(client),
            error: None,
        }
    }

    /// Fail every connect with `error`
    pub fn failing(error: ConnectError) -> Self {
        Self {
            client: Arc::new(FakeCacheClient::new()),
            error: Some(error),
        }
    }

    pub fn client(&self) -> &FakeCacheClient {
        &self.client
    }
}

#[async_trait]
impl Connector for FakeConnector {
    type Client = Arc<FakeCacheClient>;

    async fn connect(
        &self,
        _cr: &CacheCluster,
        ctx: CallContext,
    ) -> Result<ExternalClient<Self::Client>, ConnectError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        Ok(ExternalClient::new(self.client.clone()).with_context(ctx))
    }
}
