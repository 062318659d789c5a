//! Language code helpers
//!
//! Callers send language codes in several shapes ("it", "IT", "it-IT",
//! "en_US", or a full Accept-Language header). These helpers reduce them
//! to the primary subtag used as the template table key.

/// Normalize a language code to its lower-cased primary subtag
/// Accepts: "it", "it-IT", "it_IT", "EN", "en-US,en;q=0.9", etc.
pub fn normalize_language(code: &str) -> String {
    let code = code.trim().to_lowercase();

    code.split(['-', '_', ',', ';'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Extract the preferred language from an Accept-Language header value
pub fn extract_language_from_header(header_value: Option<&str>) -> Option<String> {
    header_value
        .map(normalize_language)
        .filter(|lang| !lang.is_empty() && lang != "*")
}
