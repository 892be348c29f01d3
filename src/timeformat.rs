// std imports
use std::borrow::Cow;
use std::collections::HashMap;

// third-party imports
use once_cell::sync::Lazy;

// ---

static TIME_FORMATS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("kitchen", "%-I:%M%p"),
        ("kitchen.s", "%-I:%M:%S%p"),
        ("kitchen.ms", "%-I:%M:%S%.3f%p"),
        ("kitchen.us", "%-I:%M:%S%.6f%p"),
        ("kitchen.ns", "%-I:%M:%S%.9f%p"),
        ("rfc822", "%d %b %Y %H:%M %z"),
        ("rfc822.s", "%d %b %Y %H:%M:%S %z"),
        ("rfc822.ms", "%d %b %Y %H:%M:%S%.3f %z"),
        ("rfc822.us", "%d %b %Y %H:%M:%S%.6f %z"),
        ("rfc822.ns", "%d %b %Y %H:%M:%S%.9f %z"),
        ("rfc1123", "%a, %d %b %Y %H:%M %z"),
        ("rfc1123.s", "%a, %d %b %Y %H:%M:%S %z"),
        ("rfc1123.ms", "%a, %d %b %Y %H:%M:%S%.3f %z"),
        ("rfc1123.us", "%a, %d %b %Y %H:%M:%S%.6f %z"),
        ("rfc1123.ns", "%a, %d %b %Y %H:%M:%S%.9f %z"),
        ("rfc3339", "%Y-%m-%dT%H:%M%:z"),
        ("rfc3339.s", "%Y-%m-%dT%H:%M:%S%:z"),
        ("rfc3339.ms", "%Y-%m-%dT%H:%M:%S%.3f%:z"),
        ("rfc3339.us", "%Y-%m-%dT%H:%M:%S%.6f%:z"),
        ("rfc3339.ns", "%Y-%m-%dT%H:%M:%S%.9f%:z"),
        ("iso8601", "%Y-%m-%dT%H:%M%:z"),
        ("iso8601.s", "%Y-%m-%dT%H:%M:%S%:z"),
        ("iso8601.ms", "%Y-%m-%dT%H:%M:%S%.3f%:z"),
        ("iso8601.us", "%Y-%m-%dT%H:%M:%S%.6f%:z"),
        ("iso8601.ns", "%Y-%m-%dT%H:%M:%S%.9f%:z"),
    ])
});

/// Resolves a symbolic time format alias to its chrono layout string.
///
/// The lookup is case-insensitive and treats the Unicode micro sign as the
/// letter `u`, so `RFC3339.µs` and `rfc3339.us` name the same layout.
/// Unrecognized names pass through unchanged, letting callers supply a raw
/// layout directly.
pub fn expand_time_format(name: &str) -> Cow<'_, str> {
    let key = name.to_lowercase().replace('µ', "u");
    match TIME_FORMATS.get(key.as_str()) {
        Some(layout) => Cow::Borrowed(*layout),
        None => Cow::Borrowed(name),
    }
}

// ---

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(expand_time_format("kitchen"), "%-I:%M%p");
        assert_eq!(expand_time_format("rfc3339.s"), "%Y-%m-%dT%H:%M:%S%:z");
        assert_eq!(expand_time_format("iso8601.ms"), "%Y-%m-%dT%H:%M:%S%.3f%:z");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(expand_time_format("RFC1123.MS"), "%a, %d %b %Y %H:%M:%S%.3f %z");
        assert_eq!(expand_time_format("Kitchen.NS"), "%-I:%M:%S%.9f%p");
    }

    #[test]
    fn test_micro_sign() {
        assert_eq!(expand_time_format("rfc3339.µs"), "%Y-%m-%dT%H:%M:%S%.6f%:z");
        assert_eq!(expand_time_format("RFC822.µS"), "%d %b %Y %H:%M:%S%.6f %z");
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(expand_time_format("%H:%M:%S"), "%H:%M:%S");
        assert_eq!(expand_time_format("unknown"), "unknown");
        assert_eq!(expand_time_format(""), "");
    }
}
