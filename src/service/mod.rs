//! Generic service-invocation engine
//!
//! A [`ServiceInvoker`] couples a validated configuration with a
//! per-service [`ServiceAdapter`] and drives the request/response cycle:
//! the adapter builds the wire payload, the transport delivers it, the
//! adapter decodes the reply and the outcome is handed to exactly one of
//! the two configured callbacks.

use crate::error::ServiceError;
use crate::helpers;
use crate::messages;
use crate::protocol::{DeliveryMode, HttpMethod, Protocol, SendOptions};
use log::trace;

mod adapter;
mod options;

pub use adapter::{ServiceAdapter, ServiceResponse};
pub use options::{FailureCallback, ServiceConfig, ServiceOptions, SuccessCallback};

/// Drives one request/response cycle per [`call`](ServiceInvoker::call)
///
/// Construction validates the configuration once; every failure after that
/// point is reported through the failure callback, never raised directly.
pub struct ServiceInvoker<A: ServiceAdapter> {
    adapter: A,
    config: ServiceConfig,
    protocol: Protocol,
    on_success: SuccessCallback<A::Output>,
    on_failure: FailureCallback,
}

impl<A: ServiceAdapter> ServiceInvoker<A> {
    /// Creates an invoker delivering requests over a real HTTP transport
    ///
    /// Fails synchronously when the options are unusable: neither access key
    /// nor endpoint present, no success callback, or an unsupported HTTP
    /// method or delivery mode.
    pub fn new(adapter: A, options: ServiceOptions<A::Output>) -> Result<Self, ServiceError> {
        Self::with_protocol(adapter, options, Protocol::new())
    }

    /// Creates an invoker delivering requests over a custom transport
    pub fn with_protocol(
        adapter: A,
        options: ServiceOptions<A::Output>,
        protocol: Protocol,
    ) -> Result<Self, ServiceError> {
        let ServiceOptions {
            access_key,
            server_url,
            delivery_mode,
            proxy_url,
            callback_suffix,
            http_method,
            timeout_ms,
            raw_response,
            no_cache,
            url_registry,
            on_success,
            on_failure,
        } = options;

        let on_success = on_success.ok_or_else(|| {
            ServiceError::Client(messages::get("PARAM_MISSING", &["on_success"]))
        })?;
        let on_failure =
            on_failure.unwrap_or_else(|| Box::new(options::default_failure_handler));

        if access_key.is_none() && server_url.is_none() {
            return Err(ServiceError::Client(messages::get(
                "PARAM_MISSING",
                &["access_key", "server_url"],
            )));
        }

        let http_method = match http_method.as_deref() {
            Some(raw) => HttpMethod::parse(raw)?,
            None => HttpMethod::Get,
        };
        let delivery_mode = match delivery_mode.as_deref() {
            Some(raw) => DeliveryMode::parse(raw)?,
            None => DeliveryMode::Callback,
        };

        // The callback mechanism has no body-carrying form.
        let http_method = match delivery_mode {
            DeliveryMode::Callback => HttpMethod::Get,
            DeliveryMode::Direct => http_method,
        };

        // An explicit endpoint wins; otherwise the registry may know a
        // default for this service. Some services only determine their
        // endpoint later, so an unresolved URL is not an error yet.
        let server_url = match (server_url, &access_key) {
            (Some(url), _) => Some(url),
            (None, Some(key)) => {
                let registry = url_registry.unwrap_or_default();
                let resolved = registry.resolve(adapter.name(), key);
                if resolved.is_none() {
                    trace!("no default endpoint registered for '{}'", adapter.name());
                }
                resolved
            }
            (None, None) => None,
        };
        let server_url = server_url.map(|url| helpers::strip_query(&url));

        let config = ServiceConfig {
            access_key,
            server_url,
            delivery_mode,
            proxy_url,
            callback_suffix,
            http_method,
            timeout_ms,
            raw_response,
            no_cache,
        };

        Ok(ServiceInvoker {
            adapter,
            config,
            protocol,
            on_success,
            on_failure,
        })
    }

    /// Returns the validated configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Executes one build → send → analyze cycle
    ///
    /// The outcome is delivered to exactly one of the two callbacks, exactly
    /// once, whatever stage it originates from.
    pub async fn call(&self) {
        trace!("invoking service '{}'", self.adapter.name());

        match self.run().await {
            Ok(response) => (self.on_success)(response),
            Err(failure) => {
                trace!("service '{}' failed: {}", self.adapter.name(), failure);
                (self.on_failure)(failure)
            }
        }
    }

    /// Linear pipeline over per-call state; any stage short-circuits
    async fn run(&self) -> Result<ServiceResponse<A::Output>, ServiceError> {
        let request = self.adapter.build_request(&self.config)?;

        let url = self.config.server_url.as_deref().ok_or_else(|| {
            ServiceError::Client(messages::get("URL_MISSING", &[]))
        })?;

        let raw = self
            .protocol
            .send(SendOptions {
                url,
                method: self.config.http_method,
                delivery_mode: self.config.delivery_mode,
                data: (!request.is_empty()).then(|| request.as_str()),
                proxy_url: self.config.proxy_url.as_deref(),
                timeout_ms: self.config.timeout_ms,
                no_cache: self.config.no_cache,
                callback_suffix: self.config.callback_suffix.as_deref(),
            })
            .await?;

        if self.config.raw_response {
            return Ok(ServiceResponse::Raw(raw));
        }

        let result = self.adapter.analyze_response(raw)?;
        Ok(ServiceResponse::Parsed(result))
    }
}
