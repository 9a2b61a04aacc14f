//! Reply wrapper used by the callback delivery mechanism
//!
//! The callback channel has no native status concept, so services smuggle an
//! HTTP-like status through the reply itself:
//!
//! ```json
//! { "http": { "status": 200, "error": null }, "xml": "<reply/>" }
//! { "http": { "status": 400, "error": "reason" }, "xml": null }
//! ```
//!
//! Replies without the `http` member are treated as bare payloads.

use serde::Deserialize;
use serde_json::Value;

/// Status block smuggled through the callback channel
#[derive(Debug, Deserialize)]
pub struct EnvelopeStatus {
    /// HTTP-like status code of the service reply
    pub status: u16,
    /// Error description, populated for non-success statuses
    #[serde(default)]
    pub error: Option<String>,
}

/// Encapsulated reply carrying a status block next to the actual payload
#[derive(Debug, Deserialize)]
pub struct Envelope {
    /// Status smuggled through the status-less callback channel
    pub http: EnvelopeStatus,
    /// Encapsulated payload, absent when the service reported an error
    #[serde(default)]
    pub xml: Option<String>,
}

impl Envelope {
    /// Detects whether a reply value carries the envelope shape
    pub fn is_present(value: &Value) -> bool {
        value.get("http").is_some()
    }
}
