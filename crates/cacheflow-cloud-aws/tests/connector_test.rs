use cacheflow_cloud::{
    CacheCluster, CacheClusterParameters, CallContext, ConnectError, Connector, Error, Reconciler,
};
use cacheflow_cloud_aws::{AwsConfig, AwsConnector};
use std::time::Duration;
use tokio_test::assert_ok;

fn cluster() -> CacheCluster {
    CacheCluster::new("sessions", CacheClusterParameters::new("cache.t3.micro", 1))
        .with_region("us-west-2")
}

#[tokio::test]
async fn test_cancelled_tick_never_reaches_elasticache() {
    // unroutable endpoint: any request that escapes would hang or fail
    let connector = AwsConnector::new(AwsConfig::default().with_endpoint_url("http://127.0.0.1:9"));
    let reconciler = Reconciler::new(connector);
    let mut cr = cluster();

    let (ctx, handle) = CallContext::with_cancel();
    handle.cancel();

    let err = reconciler.reconcile(&mut cr, ctx).await.unwrap_err();
    assert!(matches!(err, Error::Describe(_)));
    assert!(err.is_cancelled());
}

#[tokio::test]
async fn test_connector_applies_configured_call_timeout() {
    let connector = AwsConnector::new(
        AwsConfig::default()
            .with_endpoint_url("http://127.0.0.1:9")
            .with_call_timeout(Duration::from_secs(2)),
    );

    let external = assert_ok!(connector.connect(&cluster(), CallContext::background()).await);
    assert_eq!(external.context().call_timeout(), Some(Duration::from_secs(2)));
}

#[test]
fn test_missing_region_error_names_resource() {
    let err = Error::from(ConnectError::MissingRegion("sessions".to_string()));
    assert_eq!(
        err.to_string(),
        "cannot connect to cache provider: No region configured for cache cluster sessions"
    );
}
