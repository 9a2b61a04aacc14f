//! Extension contract plugged into the invocation pipeline
//!
//! Each concrete service supplies a [`ServiceAdapter`] implementation that
//! encodes its parameters into a wire-ready request and decodes the raw
//! transport payload into its result type. The pipeline itself never learns
//! anything about service-specific formats.

use super::options::ServiceConfig;
use crate::error::ServiceError;
use crate::messages;
use crate::protocol::RawResponse;
use log::error;

/// Per-service strategy supplying the request encoder and response decoder
///
/// The default method bodies report an unimplemented extension point as a
/// failure instead of panicking, which keeps the bare pipeline usable (e.g.
/// in tests) without any concrete service plugged in.
pub trait ServiceAdapter: Send + Sync {
    /// Result type produced by [`analyze_response`](ServiceAdapter::analyze_response)
    type Output;

    /// Name under which the service is registered for default-endpoint lookup
    fn name(&self) -> &'static str;

    /// Encodes the service parameters into a wire-ready payload
    ///
    /// Service-specific validation failures are reported as client errors.
    fn build_request(&self, config: &ServiceConfig) -> Result<String, ServiceError> {
        let _ = config;
        error!("service '{}' does not implement build_request", self.name());
        Err(ServiceError::Client(messages::get(
            "IMPL_MISSING",
            &["build_request"],
        )))
    }

    /// Decodes the transport payload into the service result
    ///
    /// Implementations have to detect and reject an empty or unusable
    /// payload themselves.
    fn analyze_response(&self, raw: RawResponse) -> Result<Self::Output, ServiceError> {
        let _ = raw;
        error!(
            "service '{}' does not implement analyze_response",
            self.name()
        );
        Err(ServiceError::Client(messages::get(
            "IMPL_MISSING",
            &["analyze_response"],
        )))
    }
}

/// Value delivered to the success callback of an invocation
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResponse<T> {
    /// Result decoded by the service adapter
    Parsed(T),
    /// Untouched transport payload, delivered when the caller opted out of
    /// parsing
    Raw(RawResponse),
}
