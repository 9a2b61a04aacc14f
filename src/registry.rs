//! Default endpoint lookup for the platform services
//!
//! Services that are not given an explicit `server_url` resolve their
//! endpoint from a [`UrlRegistry`] at construction time. The default registry
//! is seeded with the well-known platform endpoints; callers may supply their
//! own table to redirect services to an equivalent deployment.

use std::collections::HashMap;

/// Placeholder substituted with the access key during resolution
const KEY_PLACEHOLDER: &str = "{key}";

/// Lookup table resolving a service name to its default endpoint template
#[derive(Debug, Clone)]
pub struct UrlRegistry {
    entries: HashMap<String, String>,
}

impl Default for UrlRegistry {
    fn default() -> Self {
        let mut registry = UrlRegistry::empty();

        registry.insert("autoconf", "http://wxs.ign.fr/{key}/autoconf");
        registry.insert("geocode", "http://wxs.ign.fr/{key}/geoportail/ols");
        registry.insert("elevation", "http://wxs.ign.fr/{key}/alti/rest/elevation.json");
        registry.insert("wfs", "http://wxs.ign.fr/{key}/geoportail/wfs");

        registry
    }
}

impl UrlRegistry {
    /// Creates a registry without any entries
    pub fn empty() -> Self {
        UrlRegistry {
            entries: HashMap::new(),
        }
    }

    /// Registers (or replaces) the endpoint template for a service
    ///
    /// The template may contain the literal `{key}` which is replaced with
    /// the access key during [`resolve`](UrlRegistry::resolve).
    pub fn insert(&mut self, service: &str, template: &str) {
        self.entries.insert(service.to_string(), template.to_string());
    }

    /// Resolves the default endpoint of a service for a given access key
    ///
    /// Returns `None` when no default is registered, in which case the
    /// endpoint remains undetermined and has to be provided by the caller.
    pub fn resolve(&self, service: &str, access_key: &str) -> Option<String> {
        self.entries
            .get(service)
            .map(|template| template.replace(KEY_PLACEHOLDER, access_key))
    }
}
