use std::str::FromStr;

use nom::{
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{digit1, space0, space1},
    combinator::{all_consuming, map_res, opt, rest},
    sequence::{preceded, tuple},
};

use crate::error::{Error, Result};
use crate::parser::whitespace::ParseResult;
use crate::types::status::StatusCode;
use crate::types::version::{sip_version, Version};

/// Status-Code = 3DIGIT, relaxed to any run of digits so that out-of-range
/// codes survive and can be reported instead of rejected
fn status_code(input: &[u8]) -> ParseResult<StatusCode> {
    map_res(digit1, |code: &[u8]| -> Result<StatusCode> {
        StatusCode::from_str(std::str::from_utf8(code)?)
    })(input)
}

/// Reason-Phrase = *(reserved / unreserved / escaped / UTF8-NONASCII / UTF8-CONT / SP / HTAB)
fn reason_phrase(input: &[u8]) -> ParseResult<&[u8]> {
    preceded(space1, rest)(input)
}

// Status-Line = SIP-Version SP Status-Code SP Reason-Phrase
fn status_line(input: &[u8]) -> ParseResult<(Version, StatusCode, Option<&[u8]>)> {
    all_consuming(tuple((
        sip_version,
        preceded(space1, status_code),
        opt(reason_phrase),
    )))(input)
}

/// Parser for a SIP Status-Line (RFC 3261 Section 7.2), without its CRLF.
///
/// A missing reason phrase is accepted; surrounding whitespace is dropped.
pub fn parse_status_line(line: &str) -> Result<(Version, StatusCode, String)> {
    let line = line.trim_end();
    match status_line(line.as_bytes()) {
        Ok((_, (version, status, reason))) => {
            let reason = reason.map(String::from_utf8_lossy).unwrap_or_default();
            Ok((version, status, reason.trim().to_string()))
        }
        Err(_) => {
            let version_token = tuple((
                tag_no_case::<_, _, nom::error::Error<&[u8]>>(b"SIP/"),
                take_while1(|c: u8| c != b' ' && c != b'\t'),
                space0,
            ))(line.as_bytes());
            match version_token {
                Ok((_, (_, v, _))) if sip_version_fails(v) => {
                    Err(Error::InvalidVersion(line.to_string()))
                }
                _ => Err(Error::InvalidStartLine(line.to_string())),
            }
        }
    }
}

fn sip_version_fails(after_prefix: &[u8]) -> bool {
    let mut candidate = b"SIP/".to_vec();
    candidate.extend_from_slice(after_prefix);
    let failed = all_consuming(sip_version)(candidate.as_slice()).is_err();
    failed
}

/// True when a start line has the shape of a Status-Line
pub fn is_status_line(line: &str) -> bool {
    tag_no_case::<_, _, nom::error::Error<&[u8]>>(b"SIP/")(line.as_bytes()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_line() {
        let (version, status, reason) = parse_status_line("SIP/2.0 200 OK").unwrap();
        assert_eq!(version, Version::SIP_2_0);
        assert_eq!(status.as_u16(), Some(200));
        assert_eq!(reason, "OK");

        let (_, status, reason) = parse_status_line("SIP/2.0 404 Not Found").unwrap();
        assert_eq!(status.as_u16(), Some(404));
        assert_eq!(reason, "Not Found");
    }

    #[test]
    fn test_empty_and_utf8_reason() {
        let (_, _, reason) = parse_status_line("SIP/2.0 501 ").unwrap();
        assert_eq!(reason, "");
        let (_, _, reason) = parse_status_line("SIP/2.0 200").unwrap();
        assert_eq!(reason, "");
        let (_, _, reason) = parse_status_line("SIP/2.0 200 OK 👍 UTF-8 français").unwrap();
        assert_eq!(reason, "OK 👍 UTF-8 français");
    }

    #[test]
    fn test_out_of_range_code_survives() {
        let (_, status, reason) = parse_status_line("SIP/2.0 4294967301 better not break the receiver").unwrap();
        assert!(!status.is_valid());
        assert_eq!(status.to_string(), "4294967301");
        assert_eq!(reason, "better not break the receiver");
    }

    #[test]
    fn test_invalid_status_lines() {
        assert!(matches!(parse_status_line("HTTP/1.1 200 OK"), Err(Error::InvalidStartLine(_))));
        assert!(matches!(parse_status_line("SIP/2.0 ABC OK"), Err(Error::InvalidStartLine(_))));
        assert!(matches!(parse_status_line("SIP/2.0200 OK"), Err(Error::InvalidStartLine(_))));
        assert!(matches!(parse_status_line("SIP/x.0 200 OK"), Err(Error::InvalidVersion(_))));
        assert!(is_status_line("sip/2.0 200 OK"));
        assert!(!is_status_line("INVITE sip:a@b SIP/2.0"));
    }
}
