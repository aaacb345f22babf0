//! Classification of ElastiCache SDK errors

use aws_sdk_elasticache::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use cacheflow_cloud::ApiError;

const THROTTLING_CODES: &[&str] = &["Throttling", "ThrottlingException", "RequestLimitExceeded"];

/// Convert an SDK error into the provider-independent [`ApiError`].
///
/// `is_not_found` recognizes the operation's "cache cluster not found" fault.
pub(crate) fn api_error<E, R>(err: SdkError<E, R>, is_not_found: impl Fn(&E) -> bool) -> ApiError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    match &err {
        SdkError::ServiceError(ctx) => {
            let e = ctx.err();
            if is_not_found(e) {
                return ApiError::NotFound(
                    e.message().unwrap_or("cache cluster not found").to_string(),
                );
            }
            from_code(e.code(), e.message())
        }
        _ => ApiError::Transport(DisplayErrorContext(&err).to_string()),
    }
}

/// Map a service error code and message
pub(crate) fn from_code(code: Option<&str>, message: Option<&str>) -> ApiError {
    let message = message.unwrap_or_default().to_string();
    match code {
        Some("CacheClusterNotFound") => ApiError::NotFound(message),
        Some(code) if THROTTLING_CODES.contains(&code) => ApiError::Throttled(message),
        Some(code) => ApiError::service(code, message),
        None => ApiError::service("Unknown", message),
    }
}
