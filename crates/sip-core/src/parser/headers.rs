//! Grammar dispatch from a canonical header name to its typed parser.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::types::headers::{HeaderName, TypedHeader};

/// Parses `value` with the grammar registered for `name`.
///
/// Names without a typed grammar yield [`TypedHeader::Other`] and never fail.
pub fn parse_typed(name: &HeaderName, value: &str) -> Result<TypedHeader> {
    let header = match name {
        HeaderName::To => TypedHeader::To(value.parse()?),
        HeaderName::From => TypedHeader::From(value.parse()?),
        HeaderName::Via => TypedHeader::Via(value.parse()?),
        HeaderName::CSeq => TypedHeader::CSeq(value.parse()?),
        HeaderName::CallId => TypedHeader::CallId(value.parse()?),
        HeaderName::Contact => TypedHeader::Contact(value.parse()?),
        HeaderName::ContentLength => TypedHeader::ContentLength(value.parse()?),
        HeaderName::ContentType => TypedHeader::ContentType(value.parse()?),
        HeaderName::MaxForwards => TypedHeader::MaxForwards(value.parse()?),
        HeaderName::Expires => TypedHeader::Expires(value.parse()?),
        HeaderName::RetryAfter => TypedHeader::RetryAfter(value.parse()?),
        HeaderName::Accept => TypedHeader::Accept(value.parse()?),
        HeaderName::Warning => TypedHeader::Warning(value.parse()?),
        HeaderName::Other(_) => TypedHeader::Other(name.clone(), value.to_string()),
    };
    Ok(header)
}

/// Parses a single `Name: value` header line.
///
/// Unlike message assembly this is strict: a value that fails its grammar
/// is an error rather than an opaque header.
///
/// ```rust
/// use sipline_sip_core::parser::parse_header_line;
///
/// let header = parse_header_line("v: SIP/2.0/UDP 192.0.2.5").unwrap();
/// assert_eq!(header.to_string(), "Via: SIP/2.0/UDP 192.0.2.5");
/// ```
pub fn parse_header_line(line: &str) -> Result<TypedHeader> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| Error::Lexical {
            line: 1,
            reason: format!("missing colon in header line '{}'", line),
        })?;
    let name = HeaderName::from_str(name.trim_end_matches([' ', '\t']))?;
    parse_typed(&name, value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_name() {
        let header = parse_typed(&HeaderName::MaxForwards, "70").unwrap();
        assert!(matches!(header, TypedHeader::MaxForwards(_)));

        let header = parse_typed(&HeaderName::Other("Subject".into()), "lunch?").unwrap();
        assert_eq!(header.to_string(), "Subject: lunch?");
    }

    #[test]
    fn test_compact_names() {
        let header = parse_header_line("i: 3848276298220188511@atlanta.example.com").unwrap();
        assert_eq!(header.name(), HeaderName::CallId);
        assert_eq!(header.to_string(), "Call-ID: 3848276298220188511@atlanta.example.com");

        let header = parse_header_line("l: 0").unwrap();
        assert_eq!(header.to_string(), "Content-Length: 0");
    }

    #[test]
    fn test_grammar_failure_is_error() {
        assert!(parse_header_line("CSeq: OPTIONS").is_err());
        assert!(parse_header_line("CSeq 1 OPTIONS").is_err());
    }
}
