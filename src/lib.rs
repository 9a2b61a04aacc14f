//! Client access library for the Géoportail geospatial web services
//!
//! The platform exposes a family of heterogeneous services (feature query,
//! geocoding, elevation, autoconfiguration, ...) that differ in wire format,
//! encoding and response envelope. This crate unifies how a program talks to
//! them: a generic invocation engine drives the build → send → analyze →
//! deliver cycle while per-service logic plugs in through the
//! [`ServiceAdapter`](service::ServiceAdapter) extension contract.
//!
//! Submodules split the responsibilities: [`error`] defines the uniform
//! failure value, [`protocol`] delivers prepared requests over the two
//! supported mechanisms, [`service`] hosts the invocation engine and its
//! configuration surface, and [`services`] contains the concrete adapters.
//!
//! ```no_run
//! use geoaccess::service::{ServiceInvoker, ServiceOptions};
//! use geoaccess::services::wfs::{Wfs, WfsOptions};
//!
//! # async fn example() -> Result<(), geoaccess::error::ServiceError> {
//! let adapter = Wfs::new(WfsOptions {
//!     type_names: "BDTOPO:bati_indifferencie".to_string(),
//!     ..WfsOptions::default()
//! })?;
//!
//! let options = ServiceOptions {
//!     access_key: Some("CLEF".to_string()),
//!     delivery_mode: Some("DIRECT".to_string()),
//!     on_success: Some(Box::new(|features| println!("{:?}", features))),
//!     on_failure: Some(Box::new(|failure| eprintln!("{}", failure))),
//!     ..ServiceOptions::default()
//! };
//!
//! ServiceInvoker::new(adapter, options)?.call().await;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod error;
pub mod helpers;
pub mod messages;
pub mod protocol;
pub mod registry;
pub mod service;
pub mod services;

pub use error::{ErrorKind, ServiceError};
pub use protocol::{DeliveryMode, HttpMethod, Protocol, RawResponse};
pub use registry::UrlRegistry;
pub use service::{ServiceAdapter, ServiceConfig, ServiceInvoker, ServiceOptions, ServiceResponse};
