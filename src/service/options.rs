//! Caller-facing configuration surface and its validated form

use crate::error::ServiceError;
use crate::protocol::{DeliveryMode, HttpMethod};
use crate::registry::UrlRegistry;
use log::error;

use super::adapter::ServiceResponse;

/// Callback receiving the result of a successful invocation
pub type SuccessCallback<T> = Box<dyn Fn(ServiceResponse<T>) + Send + Sync>;

/// Callback receiving the error of a failed invocation
pub type FailureCallback = Box<dyn Fn(ServiceError) + Send + Sync>;

/// Options common to every service invocation
///
/// All fields are optional except `on_success`; missing values fall back to
/// defaults during validation. Service-specific parameters live on the
/// service adapter, not here.
pub struct ServiceOptions<T> {
    /// Access key for the platform, used to resolve default endpoints.
    /// Required unless `server_url` is supplied.
    pub access_key: Option<String>,
    /// Explicit service endpoint; takes precedence over the access key and
    /// silences the default-endpoint lookup. Query parameters are stripped.
    pub server_url: Option<String>,
    /// Delivery mechanism, `"CALLBACK"` (default) or `"DIRECT"`
    pub delivery_mode: Option<String>,
    /// Intermediary URL prefixed to the endpoint to work around cross-origin
    /// restrictions; honored in direct mode only
    pub proxy_url: Option<String>,
    /// Fixed reply-correlation suffix for the callback mechanism; a unique
    /// suffix is generated per request when absent
    pub callback_suffix: Option<String>,
    /// HTTP verb for direct exchanges, `"GET"` (default) or `"POST"`.
    /// The callback mechanism always uses GET.
    pub http_method: Option<String>,
    /// Reply deadline in milliseconds, `0` (default) disables the timeout
    pub timeout_ms: u64,
    /// Skips response analysis and delivers the untouched transport payload
    pub raw_response: bool,
    /// Injects a changing token into the query string to defeat caches
    pub no_cache: bool,
    /// Endpoint lookup used when no `server_url` is supplied; defaults to
    /// the seeded platform registry
    pub url_registry: Option<UrlRegistry>,
    /// Callback invoked with the service result; mandatory
    pub on_success: Option<SuccessCallback<T>>,
    /// Callback invoked with the failure; defaults to a logging handler
    pub on_failure: Option<FailureCallback>,
}

impl<T> Default for ServiceOptions<T> {
    fn default() -> Self {
        ServiceOptions {
            access_key: None,
            server_url: None,
            delivery_mode: None,
            proxy_url: None,
            callback_suffix: None,
            http_method: None,
            timeout_ms: 0,
            raw_response: false,
            no_cache: false,
            url_registry: None,
            on_success: None,
            on_failure: None,
        }
    }
}

/// Validated configuration shared by the pipeline and the service adapter
///
/// Built once at invoker construction and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Access key for the platform
    pub access_key: Option<String>,
    /// Resolved service endpoint without query parameters; may still be
    /// undetermined when neither the caller nor the registry supplied one
    pub server_url: Option<String>,
    /// Delivery mechanism
    pub delivery_mode: DeliveryMode,
    /// Intermediary URL for cross-origin workarounds
    pub proxy_url: Option<String>,
    /// Fixed reply-correlation suffix
    pub callback_suffix: Option<String>,
    /// HTTP verb, forced to GET by the callback mechanism
    pub http_method: HttpMethod,
    /// Reply deadline in milliseconds, `0` disables the timeout
    pub timeout_ms: u64,
    /// Skips response analysis when set
    pub raw_response: bool,
    /// Injects a cache-busting token when set
    pub no_cache: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            access_key: None,
            server_url: None,
            delivery_mode: DeliveryMode::Callback,
            proxy_url: None,
            callback_suffix: None,
            http_method: HttpMethod::Get,
            timeout_ms: 0,
            raw_response: false,
            no_cache: false,
        }
    }
}

/// Failure handler used when the caller supplies none
///
/// Soft failures (a successful exchange without a usable payload) are logged
/// without a status, everything else with the status the service reported.
pub(super) fn default_failure_handler(failure: ServiceError) {
    match failure.status() {
        Some(status) if status != 200 => {
            error!("service call failed ({}): {}", status, failure)
        }
        _ => error!("service call failed: {}", failure),
    }
}
