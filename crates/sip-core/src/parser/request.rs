use std::str::FromStr;

use nom::{character::complete::space1, combinator::map_res, sequence::terminated};

use crate::error::{Error, Result};
use crate::parser::separators::token;
use crate::parser::whitespace::ParseResult;
use crate::types::method::Method;
use crate::types::sip_request::RequestUri;
use crate::types::version::Version;

/// Method = INVITEm / ACKm / OPTIONSm / BYEm / CANCELm / REGISTERm / extension-method
fn method(input: &[u8]) -> ParseResult<Method> {
    map_res(token, |m: &[u8]| -> Result<Method> {
        Method::from_str(std::str::from_utf8(m)?)
    })(input)
}

/// Parser for a SIP Request-Line (RFC 3261 Section 7.1)
///
/// Request-Line = Method SP Request-URI SP SIP-Version
///
/// The method is the first token and the version the last one. Everything
/// between them is the Request-URI, kept verbatim even when it is not a
/// valid URI or contains whitespace, so the line can be reproduced.
pub fn parse_request_line(line: &str) -> Result<(Method, RequestUri, Version)> {
    let line = line.trim_end();
    let (after_method, method) = terminated(method, space1)(line.as_bytes())
        .map_err(|_| Error::InvalidStartLine(line.to_string()))?;

    // Both halves are valid UTF-8: the split points are ASCII spaces.
    let after_method = &line[line.len() - after_method.len()..];
    let (uri, version) = after_method
        .rsplit_once(|c: char| c == ' ' || c == '\t')
        .ok_or_else(|| Error::InvalidStartLine(line.to_string()))?;
    let uri = uri.trim();
    if uri.is_empty() {
        return Err(Error::InvalidStartLine(line.to_string()));
    }

    let version = match Version::from_str(version) {
        Ok(version) => version,
        Err(err) if looks_like_version(version) => return Err(err),
        Err(_) => return Err(Error::InvalidStartLine(line.to_string())),
    };

    Ok((method, RequestUri::parse(uri), version))
}

fn looks_like_version(s: &str) -> bool {
    s.as_bytes()
        .get(..4)
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case(b"SIP/"))
}
