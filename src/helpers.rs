//! Various small helper functions for URL and query-string handling

use uuid::Uuid;

/// Removes any query string from a service URL
///
/// Caller-supplied URLs may carry leftover key/value pairs (e.g. `callback`
/// or `output`) which would interfere with the parameters added by the
/// transport layer, so everything after the first `?` is dropped.
pub fn strip_query(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => base.to_string(),
        None => url.to_string(),
    }
}

/// Serializes key/value pairs into a percent-encoded query string
///
/// Pairs with an absent value are skipped entirely, which allows callers to
/// assemble the full parameter set of a service without filtering optionals
/// themselves.
pub fn normalize_parameters(params: &[(&str, Option<String>)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());

    for (key, value) in params {
        if let Some(value) = value {
            serializer.append_pair(key, value);
        }
    }

    serializer.finish()
}

/// Appends an encoded query string to a URL which may already carry one
pub fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        url.to_string()
    } else if url.contains('?') {
        format!("{}&{}", url, query)
    } else {
        format!("{}?{}", url, query)
    }
}

/// Joins an additional parameter onto an existing query-string fragment
pub fn append_parameter(query: &str, parameter: &str) -> String {
    if query.is_empty() {
        parameter.to_string()
    } else {
        format!("{}&{}", query, parameter)
    }
}

/// Percent-encodes a complete URL so it can travel as a proxy parameter
pub fn encode_proxy_target(url: &str) -> String {
    url::form_urlencoded::byte_serialize(url.as_bytes()).collect()
}

/// Returns the cache-busting query parameter
///
/// The value changes with every invocation so intermediary caches can not
/// satisfy the request from a stale entry.
pub fn cache_buster() -> (&'static str, String) {
    ("t", chrono::Utc::now().timestamp_millis().to_string())
}

/// Builds the reply-correlation function name for the callback delivery mode
///
/// When no suffix is supplied a unique one is generated per request. A fixed
/// suffix is useful for replies that are already wrapped in a function with a
/// known name.
pub fn callback_name(suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) => format!("callback{}", suffix),
        None => format!("callback{}", Uuid::new_v4().to_simple()),
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strip_query_strings() {
        assert_eq!(
            strip_query("http://localhost/service?callback=x&output=json"),
            "http://localhost/service"
        );
        assert_eq!(strip_query("http://localhost/service"), "http://localhost/service");
    }

    #[test]
    fn skip_absent_parameters() {
        let query = normalize_parameters(&[
            ("service", Some("WFS".to_string())),
            ("count", None),
            ("version", Some("2.0.0".to_string())),
        ]);

        assert_eq!(query, "service=WFS&version=2.0.0");
    }

    #[test]
    fn encode_parameter_values() {
        let query = normalize_parameters(&[("typeNames", Some("ns:layer name".to_string()))]);
        assert_eq!(query, "typeNames=ns%3Alayer+name");
    }

    #[test]
    fn append_to_bare_and_parameterized_urls() {
        assert_eq!(append_query("http://host/a", "k=v"), "http://host/a?k=v");
        assert_eq!(append_query("http://host/a?x=1", "k=v"), "http://host/a?x=1&k=v");
        assert_eq!(append_query("http://host/a", ""), "http://host/a");
    }

    #[test]
    fn join_query_fragments() {
        assert_eq!(append_parameter("", "t=1"), "t=1");
        assert_eq!(append_parameter("k=v", "t=1"), "k=v&t=1");
    }

    #[test]
    fn encode_proxy_targets() {
        assert_eq!(
            encode_proxy_target("http://host/a?k=v"),
            "http%3A%2F%2Fhost%2Fa%3Fk%3Dv"
        );
    }

    #[test]
    fn generate_unique_callback_names() {
        let first = callback_name(None);
        let second = callback_name(None);

        assert!(first.starts_with("callback"));
        assert_ne!(first, second);
    }

    #[test]
    fn honor_the_callback_suffix() {
        assert_eq!(callback_name(Some("_2")), "callback_2");
    }
}
