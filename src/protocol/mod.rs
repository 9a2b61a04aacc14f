//! Delivery of prepared requests over the two supported mechanisms
//!
//! The transport layer hides everything mechanism-specific from the service
//! invoker: proxy rewriting, cache-busting, reply-correlation naming, the
//! timeout race and the unwrapping of encapsulated replies. Whatever happens
//! on the wire, the invoker either receives a [`RawResponse`] or a
//! [`ServiceError`].

use crate::error::ServiceError;
use crate::helpers;
use crate::messages;
use envelope::Envelope;
use fetch::{Fetch, FetchedResponse, HyperFetch};
use hyper::{Body, Request};
use log::{debug, trace};
use serde_json::Value;
use std::time::Duration;

pub mod envelope;
pub mod fetch;
#[cfg(test)]
pub(crate) mod mock;

/// HTTP verbs supported by the direct delivery mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Parameters travel in the query string
    Get,
    /// The payload travels as the request body
    Post,
}

impl HttpMethod {
    /// Parses a caller-supplied method, normalizing casing
    ///
    /// Verbs that exist in HTTP but are meaningless for service invocation
    /// (PUT, DELETE, HEAD, OPTIONS) are rejected explicitly, everything else
    /// is reported as unknown.
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        match raw.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" | "DELETE" | "HEAD" | "OPTIONS" => Err(ServiceError::Client(
                messages::get("PARAM_NOT_SUPPORT", &["http_method"]),
            )),
            _ => Err(ServiceError::Client(messages::get(
                "PARAM_UNKNOWN",
                &["http_method"],
            ))),
        }
    }

    fn as_hyper(&self) -> hyper::Method {
        match self {
            HttpMethod::Get => hyper::Method::GET,
            HttpMethod::Post => hyper::Method::POST,
        }
    }
}

/// Mechanism used to deliver a request and correlate its reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Cross-origin-safe delivery via a named reply function; always GET and
    /// the reply is a JSON value, optionally wrapped in a status envelope
    Callback,
    /// Conventional request/response exchange; the reply body is passed on
    /// unexamined
    Direct,
}

impl DeliveryMode {
    /// Parses a caller-supplied delivery mode, normalizing casing
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        match raw.to_uppercase().as_str() {
            "CALLBACK" => Ok(DeliveryMode::Callback),
            "DIRECT" => Ok(DeliveryMode::Direct),
            _ => Err(ServiceError::Client(messages::get(
                "PARAM_UNKNOWN",
                &["delivery_mode"],
            ))),
        }
    }
}

/// Payload handed back by the transport, shape depending on the delivery mode
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    /// Body delivered verbatim (direct exchange, or the markup payload
    /// unwrapped from a callback envelope)
    Text(String),
    /// JSON value delivered by the callback mechanism without an envelope
    Json(Value),
}

impl RawResponse {
    /// Reports whether there is anything to analyze at all
    pub fn is_empty(&self) -> bool {
        match self {
            RawResponse::Text(text) => text.trim().is_empty(),
            RawResponse::Json(value) => value.is_null(),
        }
    }
}

/// Parameters of a single delivery
#[derive(Debug)]
pub struct SendOptions<'a> {
    /// Target service endpoint (without query parameters)
    pub url: &'a str,
    /// HTTP verb, only honored by the direct mechanism
    pub method: HttpMethod,
    /// Mechanism used to deliver the request
    pub delivery_mode: DeliveryMode,
    /// Wire-ready request payload
    pub data: Option<&'a str>,
    /// Intermediary URL prefixed to the target for cross-origin workarounds
    pub proxy_url: Option<&'a str>,
    /// Reply deadline in milliseconds, `0` disables the timeout
    pub timeout_ms: u64,
    /// Injects a changing token into the query string when set
    pub no_cache: bool,
    /// Fixed reply-correlation suffix for the callback mechanism
    pub callback_suffix: Option<&'a str>,
}

/// Transport protocol delivering requests over the configured mechanism
pub struct Protocol {
    fetcher: Box<dyn Fetch>,
}

impl Default for Protocol {
    fn default() -> Self {
        Protocol::new()
    }
}

impl Protocol {
    /// Creates a transport backed by a real HTTP client
    pub fn new() -> Self {
        Protocol::with_fetcher(Box::new(HyperFetch::new()))
    }

    /// Creates a transport backed by a custom exchange executor
    pub fn with_fetcher(fetcher: Box<dyn Fetch>) -> Self {
        Protocol { fetcher }
    }

    /// Delivers a request and returns the normalized reply payload
    ///
    /// The timeout only cancels the wait, not the underlying exchange; a
    /// late reply is dropped and never reaches the caller.
    pub async fn send(&self, options: SendOptions<'_>) -> Result<RawResponse, ServiceError> {
        trace!("sending request to {}", options.url);

        let (request, correlation) = prepare(&options)?;
        let exchange = self.fetcher.fetch(request);

        let fetched = if options.timeout_ms > 0 {
            match tokio::time::timeout(Duration::from_millis(options.timeout_ms), exchange).await {
                Ok(outcome) => outcome?,
                Err(_) => return Err(ServiceError::Timeout(options.timeout_ms)),
            }
        } else {
            exchange.await?
        };

        debug!("received reply with status {}", fetched.status);

        if !(200..300).contains(&fetched.status) {
            return Err(ServiceError::Server {
                status: fetched.status,
                message: reply_error_message(&fetched),
            });
        }

        match options.delivery_mode {
            DeliveryMode::Direct => Ok(RawResponse::Text(fetched.body)),
            DeliveryMode::Callback => unwrap_callback_reply(&fetched.body, &correlation),
        }
    }
}

/// Builds the outgoing request and the reply-correlation name
fn prepare(options: &SendOptions<'_>) -> Result<(Request<Body>, String), ServiceError> {
    let mut query = options.data.unwrap_or_default().to_string();
    let mut correlation = String::new();

    if options.no_cache {
        let (key, value) = helpers::cache_buster();
        query = helpers::append_parameter(&query, &format!("{}={}", key, value));
    }

    // The correlation parameter only exists in callback mode where the
    // request always travels in the query string.
    if options.delivery_mode == DeliveryMode::Callback {
        correlation = helpers::callback_name(options.callback_suffix);
        query = helpers::append_parameter(&query, &format!("callback={}", correlation));
    }

    let method = match options.delivery_mode {
        DeliveryMode::Callback => HttpMethod::Get,
        DeliveryMode::Direct => options.method,
    };

    let (url, body) = match (method, options.proxy_url) {
        // GET folds the payload into the query string in every case
        (HttpMethod::Get, None) => (helpers::append_query(options.url, &query), String::new()),
        (HttpMethod::Get, Some(proxy)) => {
            // Proxying is only configured in direct mode; the target URL
            // including its query travels encoded as the proxy parameter.
            let target = helpers::append_query(options.url, &query);
            (format!("{}{}", proxy, helpers::encode_proxy_target(&target)), String::new())
        }
        (HttpMethod::Post, None) => (
            helpers::append_query(options.url, query_without_data(&query, options.data)),
            options.data.unwrap_or_default().to_string(),
        ),
        (HttpMethod::Post, Some(proxy)) => {
            // The payload stays in the body, but transport-injected
            // parameters still belong to the encoded target.
            let target =
                helpers::append_query(options.url, query_without_data(&query, options.data));
            (
                format!("{}{}", proxy, helpers::encode_proxy_target(&target)),
                options.data.unwrap_or_default().to_string(),
            )
        }
    };

    trace!("prepared {} exchange with {}", method_name(method), url);

    let request = Request::builder()
        .method(method.as_hyper())
        .uri(url.as_str())
        .body(Body::from(body))
        .map_err(|e| ServiceError::Client(format!("invalid service URL '{}': {}", url, e)))?;

    Ok((request, correlation))
}

/// Extracts the query-string additions (cache buster) for a POST exchange
///
/// In POST mode the payload travels as the body, so only the additional
/// parameters injected by the transport itself belong into the query string.
fn query_without_data<'a>(query: &'a str, data: Option<&str>) -> &'a str {
    match data {
        Some(data) if !data.is_empty() => query
            .strip_prefix(data)
            .map(|rest| rest.trim_start_matches('&'))
            .unwrap_or(query),
        _ => query,
    }
}

fn method_name(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Get => "GET",
        HttpMethod::Post => "POST",
    }
}

/// Derives a human-readable message from a non-success reply
fn reply_error_message(fetched: &FetchedResponse) -> String {
    let trimmed = fetched.body.trim();

    if trimmed.is_empty() {
        format!("service reported status {}", fetched.status)
    } else {
        trimmed.to_string()
    }
}

/// Normalizes a callback-mode reply into the payload it carries
///
/// The reply may arrive wrapped in the correlation function. After JSON
/// parsing, an envelope is unwrapped (failing on non-success statuses) and
/// an empty payload is rejected before it can reach any analyzer.
fn unwrap_callback_reply(body: &str, correlation: &str) -> Result<RawResponse, ServiceError> {
    let stripped = strip_callback_wrapper(body, correlation);

    let value: Value = serde_json::from_str(stripped)
        .map_err(|e| ServiceError::Transport(format!("malformed callback reply: {}", e)))?;

    if value.is_null() {
        return Err(ServiceError::EmptyResponse(messages::get(
            "SERVICE_RESPONSE_EMPTY",
            &[],
        )));
    }

    if !Envelope::is_present(&value) {
        return Ok(RawResponse::Json(value));
    }

    let envelope: Envelope = serde_json::from_value(value)
        .map_err(|e| ServiceError::Transport(format!("malformed reply envelope: {}", e)))?;

    if envelope.http.status != 200 {
        return Err(ServiceError::Server {
            status: envelope.http.status,
            message: envelope.http.error.unwrap_or_default(),
        });
    }

    match envelope.xml {
        Some(payload) if !payload.trim().is_empty() => Ok(RawResponse::Text(payload)),
        _ => Err(ServiceError::EmptyResponse(messages::get(
            "SERVICE_RESPONSE_EMPTY",
            &[],
        ))),
    }
}

/// Removes the correlation-function wrapper from a reply body, if present
///
/// The wrapped call may carry a trailing statement terminator
/// (`name({...});`), which is dropped along with the parentheses.
fn strip_callback_wrapper<'a>(body: &'a str, correlation: &str) -> &'a str {
    let trimmed = body.trim();

    if correlation.is_empty() || !trimmed.starts_with(correlation) {
        return trimmed;
    }

    let inner = trimmed[correlation.len()..].trim();
    let inner = match inner.strip_suffix(';') {
        Some(rest) => rest.trim_end(),
        None => inner,
    };

    match (inner.strip_prefix('('), inner.ends_with(')')) {
        (Some(wrapped), true) => wrapped[..wrapped.len() - 1].trim(),
        _ => trimmed,
    }
}
