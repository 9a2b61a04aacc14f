//! Feature query service (WFS `GetFeature`)
//!
//! Encodes the feature query as a key/value-pair request and decodes the
//! JSON feature collection the service replies with. Requesting another
//! output format is possible but is best combined with raw-response mode
//! since only JSON replies are decoded here.

use crate::error::ServiceError;
use crate::helpers;
use crate::messages;
use crate::protocol::RawResponse;
use crate::service::{ServiceAdapter, ServiceConfig};
use serde_json::Value;

/// Rectangular spatial filter, axis order as expected by the service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Western bound
    pub left: f64,
    /// Southern bound
    pub bottom: f64,
    /// Eastern bound
    pub right: f64,
    /// Northern bound
    pub top: f64,
}

impl BoundingBox {
    /// Rejects non-finite coordinates, which would serialize into an
    /// unusable filter
    fn validate(&self) -> Result<(), ServiceError> {
        let coordinates = [
            ("bbox.left", self.left),
            ("bbox.bottom", self.bottom),
            ("bbox.right", self.right),
            ("bbox.top", self.top),
        ];

        for (name, value) in coordinates {
            if !value.is_finite() {
                return Err(ServiceError::Client(messages::get(
                    "PARAM_MISSING",
                    &[name],
                )));
            }
        }

        Ok(())
    }

    fn serialize(&self) -> String {
        format!("{},{},{},{}", self.left, self.bottom, self.right, self.top)
    }
}

/// Parameters specific to the feature query service
#[derive(Debug, Clone, Default)]
pub struct WfsOptions {
    /// Requested feature type(s); mandatory
    pub type_names: String,
    /// Restricts the query to a single feature
    pub feature_id: Option<String>,
    /// Reply format requested from the service, defaults to `"json"`
    pub output_format: Option<String>,
    /// Restricts the reply to the given property
    pub property_name: Option<String>,
    /// Property the reply is sorted by
    pub sort_by: Option<String>,
    /// Maximum number of features to return
    pub count: Option<u32>,
    /// Index of the first feature to return
    pub start_index: Option<u32>,
    /// Coordinate reference system of filter and reply
    pub srs_name: Option<String>,
    /// Spatial filter
    pub bbox: Option<BoundingBox>,
}

/// Adapter invoking the feature query service
#[derive(Debug)]
pub struct Wfs {
    options: WfsOptions,
}

impl Wfs {
    /// Validates the service parameters and creates the adapter
    pub fn new(options: WfsOptions) -> Result<Self, ServiceError> {
        if options.type_names.trim().is_empty() {
            return Err(ServiceError::Client(messages::get(
                "PARAM_MISSING",
                &["type_names"],
            )));
        }

        Ok(Wfs { options })
    }
}

impl ServiceAdapter for Wfs {
    type Output = Value;

    fn name(&self) -> &'static str {
        "wfs"
    }

    fn build_request(&self, _config: &ServiceConfig) -> Result<String, ServiceError> {
        if let Some(bbox) = &self.options.bbox {
            bbox.validate()?;
        }

        let output_format = self
            .options
            .output_format
            .clone()
            .unwrap_or_else(|| "json".to_string());

        Ok(helpers::normalize_parameters(&[
            ("service", Some("WFS".to_string())),
            ("version", Some("2.0.0".to_string())),
            ("request", Some("GetFeature".to_string())),
            ("outputFormat", Some(output_format)),
            ("typeNames", Some(self.options.type_names.clone())),
            ("featureID", self.options.feature_id.clone()),
            ("BBOX", self.options.bbox.map(|bbox| bbox.serialize())),
            ("srsName", self.options.srs_name.clone()),
            ("propertyName", self.options.property_name.clone()),
            ("sortBy", self.options.sort_by.clone()),
            ("count", self.options.count.map(|count| count.to_string())),
            (
                "startIndex",
                self.options.start_index.map(|index| index.to_string()),
            ),
        ]))
    }

    fn analyze_response(&self, raw: RawResponse) -> Result<Value, ServiceError> {
        if raw.is_empty() {
            return Err(ServiceError::EmptyResponse(messages::get(
                "SERVICE_RESPONSE_EMPTY",
                &[],
            )));
        }

        match raw {
            RawResponse::Json(value) => Ok(value),
            RawResponse::Text(text) => serde_json::from_str(&text).map_err(|e| {
                ServiceError::EmptyResponse(messages::get(
                    "SERVICE_RESPONSE_ANALYSE",
                    &[&e.to_string()],
                ))
            }),
        }
    }
}
