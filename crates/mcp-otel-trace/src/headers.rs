//! Parsing of OTLP exporter headers from environment configuration.

use std::collections::HashMap;

use tracing::warn;

/// Parse a comma-separated `key=value` header string.
///
/// Malformed segments are skipped with a warning rather than aborting the
/// parse; header trouble must never keep the telemetry pipeline from
/// starting. A missing `authorization` key is warned about because most
/// collectors will reject unauthenticated exports, but the parsed map is
/// returned either way.
pub fn parse_otlp_headers(raw: Option<&str>) -> HashMap<String, String> {
    let mut headers = HashMap::new();

    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return headers,
    };

    for segment in raw.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            // Trailing or doubled commas.
            continue;
        }

        let Some((key, value)) = segment.split_once('=') else {
            warn!(segment, "skipping malformed header segment, expected key=value");
            continue;
        };

        let key = key.trim();
        let value = value.trim();
        if key.is_empty() {
            warn!(segment, "skipping header segment with empty key");
            continue;
        }

        // Last occurrence of a key wins.
        headers.insert(key.to_string(), value.to_string());
    }

    if !headers.keys().any(|k| k.eq_ignore_ascii_case("authorization")) {
        warn!("no authorization header configured, the collector may reject exports");
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_pairs() {
        let headers = parse_otlp_headers(Some("A=1,B=2"));
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["A"], "1");
        assert_eq!(headers["B"], "2");
    }

    #[test]
    fn test_absent_or_blank_input() {
        assert!(parse_otlp_headers(None).is_empty());
        assert!(parse_otlp_headers(Some("")).is_empty());
        assert!(parse_otlp_headers(Some("   ")).is_empty());
    }

    #[test]
    fn test_empty_segments_skipped() {
        let headers = parse_otlp_headers(Some("A=1,,B=2,"));
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["A"], "1");
        assert_eq!(headers["B"], "2");
    }

    #[test]
    fn test_segment_without_equals_skipped() {
        let headers = parse_otlp_headers(Some("A=1,BAD,B=2"));
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["A"], "1");
        assert_eq!(headers["B"], "2");
    }

    #[test]
    fn test_empty_key_skipped() {
        let headers = parse_otlp_headers(Some("=1,B=2"));
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["B"], "2");
    }

    #[test]
    fn test_last_occurrence_wins() {
        let headers = parse_otlp_headers(Some("A=1,A=2"));
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["A"], "2");
    }

    #[test]
    fn test_whitespace_trimmed() {
        let headers = parse_otlp_headers(Some("  Authorization = Api-Token abc , B = 2 "));
        assert_eq!(headers["Authorization"], "Api-Token abc");
        assert_eq!(headers["B"], "2");
    }

    #[test]
    fn test_empty_value_kept() {
        let headers = parse_otlp_headers(Some("A="));
        assert_eq!(headers["A"], "");
    }

    #[test]
    fn test_value_may_contain_equals() {
        let headers = parse_otlp_headers(Some("Authorization=Basic dXNlcjpwYXNz=="));
        assert_eq!(headers["Authorization"], "Basic dXNlcjpwYXNz==");
    }
}
