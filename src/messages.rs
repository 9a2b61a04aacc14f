//! Human-readable message catalog for validation and pipeline errors
//!
//! Messages are looked up by a stable key with positional values substituted
//! into the `%var%` placeholder. Only validation and error reporting consume
//! this catalog, it never influences behaviour.

/// Resolves a message by key, substituting `vars` into the template
///
/// Unknown keys resolve to a generic message instead of failing so that
/// error reporting itself can not error out.
pub fn get(key: &str, vars: &[&str]) -> String {
    let template = match key {
        "PARAM_MISSING" => "missing mandatory parameter(s): %var%",
        "PARAM_NOT_SUPPORT" => "value for parameter '%var%' is not supported",
        "PARAM_UNKNOWN" => "value for parameter '%var%' is unknown",
        "URL_MISSING" => {
            "no service endpoint could be determined, provide 'server_url' or register a default URL"
        }
        "IMPL_MISSING" => "the service does not implement '%var%'",
        "SERVICE_RESPONSE_EMPTY" => "the service response is empty",
        "SERVICE_RESPONSE_ANALYSE" => "unable to analyze the service response: %var%",
        _ => "unexpected error",
    };

    template.replace("%var%", &vars.join(", "))
}
