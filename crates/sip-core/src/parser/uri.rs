//! URI grammar (RFC 3261 Section 19.1 and 25.1).
//!
//! SIP and SIPS URIs are decomposed into their parts. Any other scheme
//! (`tel`, `mailto`, `urn`, ...) is kept as an opaque string after the
//! scheme so that it serializes back exactly as received.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::{self, FromStr};

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::digit1,
    combinator::{all_consuming, map_res, opt},
    sequence::{delimited, preceded, tuple},
};

use super::separators::colon;
use super::whitespace::ParseResult;
use crate::error::{Error, Result};
use crate::types::param::Params;
use crate::types::uri::{Host, Scheme, Uri};

fn is_hostname_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'-' | b'.' | b'_')
}

fn ipv6_reference(input: &[u8]) -> ParseResult<Host> {
    map_res(
        delimited(
            tag(b"["),
            take_while1(|c: u8| c.is_ascii_hexdigit() || c == b':' || c == b'.'),
            tag(b"]"),
        ),
        |addr: &[u8]| -> Result<Host> {
            let addr = Ipv6Addr::from_str(str::from_utf8(addr)?)
                .map_err(|e| Error::InvalidUri(e.to_string()))?;
            Ok(Host::Address(IpAddr::V6(addr)))
        },
    )(input)
}

fn hostname_or_ipv4(input: &[u8]) -> ParseResult<Host> {
    map_res(take_while1(is_hostname_char), |name: &[u8]| -> Result<Host> {
        let name = str::from_utf8(name)?;
        Ok(match Ipv4Addr::from_str(name) {
            Ok(addr) => Host::Address(IpAddr::V4(addr)),
            Err(_) => Host::Domain(name.to_string()),
        })
    })(input)
}

/// host = hostname / IPv4address / IPv6reference
pub fn host(input: &[u8]) -> ParseResult<Host> {
    alt((ipv6_reference, hostname_or_ipv4))(input)
}

/// port = 1*DIGIT
pub fn port(input: &[u8]) -> ParseResult<u16> {
    map_res(digit1, |digits: &[u8]| -> Result<u16> {
        str::from_utf8(digits)?
            .parse::<u16>()
            .map_err(|e| Error::InvalidUri(format!("port: {}", e)))
    })(input)
}

/// hostport = host [ ":" port ]
pub fn hostport(input: &[u8]) -> ParseResult<(Host, Option<u16>)> {
    tuple((host, opt(preceded(colon, port))))(input)
}

fn is_scheme(s: &str) -> bool {
    let mut bytes = s.bytes();
    matches!(bytes.next(), Some(c) if c.is_ascii_alphabetic())
        && bytes.all(|c| c.is_ascii_alphanumeric() || matches!(c, b'+' | b'-' | b'.'))
}

/// Parse an absolute URI.
pub fn parse_uri(input: &str) -> Result<Uri> {
    let input = input.trim();
    let (scheme, rest) = input
        .split_once(':')
        .ok_or_else(|| Error::InvalidUri(format!("missing scheme in '{}'", input)))?;
    if !is_scheme(scheme) {
        return Err(Error::InvalidUri(format!("invalid scheme '{}'", scheme)));
    }

    let scheme = Scheme::from(scheme);
    match scheme {
        Scheme::Sip | Scheme::Sips => parse_sip_uri(scheme, rest),
        _ => {
            if rest.is_empty() || rest.chars().any(char::is_whitespace) {
                return Err(Error::InvalidUri(format!("invalid {} URI '{}'", scheme, input)));
            }
            Ok(Uri::opaque(scheme, rest))
        }
    }
}

fn parse_sip_uri(scheme: Scheme, rest: &str) -> Result<Uri> {
    let (before_headers, headers) = match rest.split_once('?') {
        Some((before, headers)) => (before, Some(headers.to_string())),
        None => (rest, None),
    };

    let (userinfo, hostpart) = match before_headers.rfind('@') {
        Some(at) => (Some(&before_headers[..at]), &before_headers[at + 1..]),
        None => (None, before_headers),
    };

    let (user, password) = match userinfo {
        Some(info) if info.is_empty() => {
            return Err(Error::InvalidUri("empty user part".to_string()))
        }
        Some(info) => match info.split_once(':') {
            Some((user, password)) => (Some(user.to_string()), Some(password.to_string())),
            None => (Some(info.to_string()), None),
        },
        None => (None, None),
    };

    let (hostport_text, params_text) = match hostpart.find(';') {
        Some(semi) => hostpart.split_at(semi),
        None => (hostpart, ""),
    };

    let (_, (host, port)) = all_consuming(hostport)(hostport_text.trim().as_bytes())
        .map_err(|_| Error::InvalidUri(format!("invalid host in '{}'", hostport_text)))?;

    let params = Params::parse(params_text)
        .ok_or_else(|| Error::InvalidUri(format!("invalid parameters '{}'", params_text)))?;

    Ok(Uri {
        scheme,
        user,
        password,
        host,
        port,
        params,
        headers,
        opaque: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostport() {
        let (rem, (h, p)) = hostport(b"192.0.2.59:5050;branch=x").unwrap();
        assert_eq!(rem, b";branch=x");
        assert_eq!(h, Host::Address("192.0.2.59".parse().unwrap()));
        assert_eq!(p, Some(5050));

        let (_, (h, p)) = hostport(b"[2001:db8::10]:5070").unwrap();
        assert_eq!(h.to_string(), "[2001:db8::10]");
        assert_eq!(p, Some(5070));

        let (_, (h, p)) = hostport(b"host-of-the-hour.example.com").unwrap();
        assert_eq!(h, Host::Domain("host-of-the-hour.example.com".into()));
        assert_eq!(p, None);
    }

    #[test]
    fn test_port_overflow_rejected() {
        assert!(all_consuming(hostport)(b"example.com:70000").is_err());
    }

    #[test]
    fn test_parse_full_sip_uri() {
        let uri = parse_uri("sips:alice:secret@example.com:5061;transport=tcp;lr?subject=hi").unwrap();
        assert_eq!(uri.scheme, Scheme::Sips);
        assert_eq!(uri.user.as_deref(), Some("alice"));
        assert_eq!(uri.password.as_deref(), Some("secret"));
        assert_eq!(uri.port, Some(5061));
        assert_eq!(uri.params.get("transport"), Some("tcp"));
        assert!(uri.params.contains("lr"));
        assert_eq!(uri.headers.as_deref(), Some("subject=hi"));
    }

    #[test]
    fn test_user_with_escaped_at() {
        let uri = parse_uri("sip:user;par=u%40example.net@example.com").unwrap();
        assert_eq!(uri.user.as_deref(), Some("user;par=u%40example.net"));
        assert_eq!(uri.host, Host::Domain("example.com".into()));
    }

    #[test]
    fn test_opaque_schemes() {
        let uri = parse_uri("tel:+1-212-555-0101;phone-context=example.com").unwrap();
        assert_eq!(uri.scheme, Scheme::Tel);
        assert_eq!(uri.to_string(), "tel:+1-212-555-0101;phone-context=example.com");

        let uri = parse_uri("urn:service:sos").unwrap();
        assert_eq!(uri.scheme, Scheme::Custom("urn".into()));
    }

    #[test]
    fn test_invalid_uris() {
        assert!(parse_uri("example.com").is_err());
        assert!(parse_uri("sip:").is_err());
        assert!(parse_uri("sip:@example.com").is_err());
        assert!(parse_uri("sip:user@exa mple.com").is_err());
        assert!(parse_uri("1sip:user@example.com").is_err());
    }
}
