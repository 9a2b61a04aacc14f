//! Raw HTTP exchange underlying both delivery mechanisms

use crate::error::ServiceError;
use async_trait::async_trait;
use hyper::client::HttpConnector;
use hyper::{body, Body, Client, Request};
use std::sync::Arc;

/// Status and body of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResponse {
    /// HTTP status code of the reply
    pub status: u16,
    /// Reply body decoded as text
    pub body: String,
}

/// Executor for a single HTTP exchange
///
/// The transport layer only needs "send this request, give me status and
/// body". Hiding that behind a trait keeps the delivery-mode logic testable
/// against an in-process implementation.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Performs one exchange and collects the reply
    async fn fetch(&self, request: Request<Body>) -> Result<FetchedResponse, ServiceError>;
}

/// [`Fetch`] implementation backed by a [`hyper::Client`]
pub struct HyperFetch {
    client: Client<HttpConnector>,
}

impl HyperFetch {
    /// Creates a new instance with a dedicated connection pool
    pub fn new() -> Self {
        HyperFetch {
            client: Client::new(),
        }
    }
}

impl Default for HyperFetch {
    fn default() -> Self {
        HyperFetch::new()
    }
}

#[async_trait]
impl Fetch for HyperFetch {
    async fn fetch(&self, request: Request<Body>) -> Result<FetchedResponse, ServiceError> {
        let response = self.client.request(request).await?;
        let status = response.status().as_u16();

        let bytes = body::to_bytes(response.into_body()).await?;
        let body = String::from_utf8(bytes.to_vec())
            .map_err(|e| ServiceError::Transport(format!("reply is not valid UTF-8: {}", e)))?;

        Ok(FetchedResponse { status, body })
    }
}

#[async_trait]
impl<F: Fetch> Fetch for Arc<F> {
    async fn fetch(&self, request: Request<Body>) -> Result<FetchedResponse, ServiceError> {
        self.as_ref().fetch(request).await
    }
}
