// Utility functions for parsing

use std::ops::Range;

use crate::error::{Error, Result};

/// Scans a header value and reports every position of `sep` that is not
/// inside a quoted string or an angle-bracketed URI.
///
/// Backslash escapes inside quoted strings are skipped so an embedded `\"`
/// does not end the quoted section early.
pub fn separator_positions(input: &str, sep: u8) -> Vec<usize> {
    let bytes = input.as_bytes();
    let mut positions = Vec::new();
    let mut in_quotes = false;
    let mut angle_depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if in_quotes {
            match c {
                b'\\' => i += 1,
                b'"' => in_quotes = false,
                _ => {}
            }
        } else {
            match c {
                b'"' => in_quotes = true,
                b'<' => angle_depth += 1,
                b'>' => angle_depth = angle_depth.saturating_sub(1),
                _ if c == sep && angle_depth == 0 => positions.push(i),
                _ => {}
            }
        }
        i += 1;
    }

    positions
}

/// Splits on `sep` outside quotes and angle brackets, returning the byte
/// range of each segment. An input with N separators yields N + 1 ranges.
pub fn split_ranges(input: &str, sep: u8) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for pos in separator_positions(input, sep) {
        ranges.push(start..pos);
        start = pos + 1;
    }
    ranges.push(start..input.len());
    ranges
}

/// Finds the closing quote of a quoted string that starts at `input[0]`.
pub fn closing_quote(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    if bytes.first() != Some(&b'"') {
        return None;
    }
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Escapes `"` and `\` so that `text` can sit between double quotes.
pub fn escape_quoted(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Decodes URI percent-encoding (%HH).
pub fn unescape_uri_component(input: &[u8]) -> Result<String> {
    let mut unescaped: Vec<u8> = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        if input[i] == b'%' {
            let (Some(h1), Some(h2)) = (input.get(i + 1), input.get(i + 2)) else {
                return Err(Error::InvalidUri(
                    "Incomplete escape sequence at end of input".to_string(),
                ));
            };
            match (hex_val(*h1), hex_val(*h2)) {
                (Some(v1), Some(v2)) => unescaped.push((v1 << 4) | v2),
                _ => {
                    return Err(Error::InvalidUri(format!(
                        "Invalid hex sequence: %{}{}",
                        *h1 as char, *h2 as char
                    )))
                }
            }
            i += 3;
        } else {
            unescaped.push(input[i]);
            i += 1;
        }
    }

    String::from_utf8(unescaped)
        .map_err(|e| Error::InvalidUri(format!("UTF-8 error after URI unescaping: {}", e)))
}

// Helper to convert a hex character (byte) to its value (0-15)
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_positions_skip_quotes_and_brackets() {
        let value = r#""Bell, Alexander" <sip:a@b;x=1,y>, <sip:c@d>"#;
        assert_eq!(separator_positions(value, b','), vec![33]);

        let value = r#""a\",b" <sip:x@y>;p"#;
        assert_eq!(separator_positions(value, b','), Vec::<usize>::new());
        assert_eq!(separator_positions(value, b';'), vec![17]);
    }

    #[test]
    fn test_split_ranges_keeps_empty_segments() {
        let value = "a;;b;";
        let parts: Vec<&str> = split_ranges(value, b';').into_iter().map(|r| &value[r]).collect();
        assert_eq!(parts, vec!["a", "", "b", ""]);
    }

    #[test]
    fn test_escape_quoted() {
        assert_eq!(escape_quoted("Watson, Thomas"), "Watson, Thomas");
        assert_eq!(escape_quoted(r#"Bob"x"#), r#"Bob\"x"#);
        assert_eq!(escape_quoted(r"a\b"), r"a\\b");
    }

    #[test]
    fn test_closing_quote() {
        assert_eq!(closing_quote(r#""Joe" <sip:j@x>"#), Some(4));
        assert_eq!(closing_quote(r#""J\"oe" <sip:j@x>"#), Some(6));
        assert_eq!(closing_quote(r#""Mr. J. User <sip:j@x>"#), None);
        assert_eq!(closing_quote("Joe"), None);
    }

    #[test]
    fn test_unescape_uri_component() {
        assert_eq!(unescape_uri_component(b"simple").unwrap(), "simple");
        assert_eq!(unescape_uri_component(b"a%20b%20c").unwrap(), "a b c");
        assert_eq!(unescape_uri_component(b"%c3%a9").unwrap(), "é");
        assert_eq!(unescape_uri_component(b"user%40example.net").unwrap(), "user@example.net");
    }

    #[test]
    fn test_unescape_uri_component_invalid() {
        assert!(unescape_uri_component(b"%").is_err());
        assert!(unescape_uri_component(b"%2").is_err());
        assert!(unescape_uri_component(b"%G0").is_err());
        assert!(unescape_uri_component(b"%C0%80").is_err());
    }
}
