//! In-process [`Fetch`] implementation for exercising the transport layer

use super::fetch::{Fetch, FetchedResponse};
use crate::error::ServiceError;
use async_trait::async_trait;
use hyper::{body, Body, Request};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Request captured by the mock for later inspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub uri: String,
    pub body: String,
}

/// Mock exchange executor replaying queued replies
///
/// Replies are handed out in FIFO order; running out of queued replies is
/// a test bug and panics.
#[derive(Default)]
pub struct MockFetch {
    replies: Mutex<VecDeque<Result<FetchedResponse, ServiceError>>>,
    recorded: Mutex<Vec<RecordedRequest>>,
    delay: Option<Duration>,
}

impl MockFetch {
    /// Creates a mock which answers every request after the given delay
    pub fn delayed(delay: Duration) -> Self {
        MockFetch {
            delay: Some(delay),
            ..MockFetch::default()
        }
    }

    /// Queues a successful reply
    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.replies.lock().unwrap().push_back(Ok(FetchedResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    /// Queues a failed exchange
    pub fn fail(&self, error: ServiceError) -> &Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Returns all requests seen so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().unwrap().clone()
    }

    /// Returns the only request seen so far
    pub fn single_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

#[async_trait]
impl Fetch for MockFetch {
    async fn fetch(&self, request: Request<Body>) -> Result<FetchedResponse, ServiceError> {
        let method = request.method().to_string();
        let uri = request.uri().to_string();
        let bytes = body::to_bytes(request.into_body()).await?;
        let body = String::from_utf8(bytes.to_vec()).unwrap_or_default();

        self.recorded
            .lock()
            .unwrap()
            .push(RecordedRequest { method, uri, body });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("no reply queued for request")
    }
}
