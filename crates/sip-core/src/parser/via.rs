//! Via grammar (RFC 3261 Section 20.42)
//!
//! ```text
//! Via           = ( "Via" / "v" ) HCOLON via-parm *(COMMA via-parm)
//! via-parm      = sent-protocol LWS sent-by *( SEMI via-params )
//! sent-protocol = protocol-name SLASH protocol-version SLASH transport
//! ```
//!
//! Entries are read left to right. The first comma-separated segment that
//! is not a well-formed via-parm ends the list; it and everything after it
//! are kept verbatim as a trailer, so stray separators survive a round trip.

use std::str;

use nom::{
    combinator::map,
    sequence::{preceded, tuple},
};

use super::separators::{slash, token};
use super::uri::hostport;
use super::utils::separator_positions;
use super::whitespace::{lws, owsp, ParseResult};
use crate::error::{Error, Result};
use crate::types::param::Params;
use crate::types::via::{SentProtocol, Via, ViaEntry};

fn sent_protocol(input: &[u8]) -> ParseResult<SentProtocol> {
    map(
        tuple((token, slash, token, slash, token)),
        |(name, _, version, _, transport): (&[u8], _, &[u8], _, &[u8])| SentProtocol {
            name: String::from_utf8_lossy(name).to_uppercase(),
            version: String::from_utf8_lossy(version).into_owned(),
            transport: String::from_utf8_lossy(transport).to_uppercase(),
        },
    )(input)
}

/// Parses one via-parm, or `None` when the segment is not one.
pub fn parse_via_entry(segment: &str) -> Option<ViaEntry> {
    let (rest, (protocol, (host, port))) =
        tuple((preceded(owsp, sent_protocol), preceded(lws, hostport)))(segment.as_bytes())
            .ok()?;
    let params = Params::parse(str::from_utf8(rest).ok()?)?;
    Some(ViaEntry {
        protocol,
        host,
        port,
        params,
    })
}

pub fn parse_via(input: &str) -> Result<Via> {
    let input = input.trim();
    let mut bounds = separator_positions(input, b',');
    bounds.push(input.len());

    let mut entries = Vec::new();
    let mut start = 0;
    for end in bounds {
        match parse_via_entry(&input[start..end]) {
            Some(entry) => entries.push(entry),
            None if entries.is_empty() => {
                return Err(Error::grammar(
                    "Via",
                    format!("invalid via-parm '{}'", &input[start..end]),
                ))
            }
            None => return Ok(Via::with_trailer(entries, &input[start - 1..])),
        }
        start = end + 1;
    }

    Ok(Via::with_trailer(entries, ""))
}
