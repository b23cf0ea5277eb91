//! name-addr / addr-spec grammar shared by To, From and Contact.
//!
//! ```text
//! name-addr    = [ display-name ] LAQUOT addr-spec RAQUOT
//! display-name = *(token LWS) / quoted-string
//! ```
//!
//! Parsing is deliberately forgiving about the malformations RFC 4475
//! catalogues: display names without quotes, an opening quote that is never
//! closed, whitespace inside the angle brackets and parameters attached to a
//! bare addr-spec. When no angle brackets are present, everything after the
//! first `;` is a header parameter, never a URI parameter.

use crate::error::{Error, Result};
use crate::parser::utils::{closing_quote, escape_quoted, separator_positions};
use crate::types::address::Address;
use crate::types::param::Params;

use super::uri::parse_uri;

pub fn parse_address(header: &str, input: &str) -> Result<Address> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::grammar(header, "empty address"));
    }

    let (display_name, rest) = if input.starts_with('"') {
        match closing_quote(input) {
            Some(end) => (Some(input[1..end].to_string()), &input[end + 1..]),
            None => {
                // Unbalanced quote: the display name runs up to the URI
                let lt = input
                    .find('<')
                    .ok_or_else(|| Error::grammar(header, "unterminated quoted display name"))?;
                (Some(input[1..lt].trim().to_string()), &input[lt..])
            }
        }
    } else {
        match input.find('<') {
            Some(lt) => {
                // Stored in quoted form, so stray quotes need escaping
                let name = input[..lt].trim();
                ((!name.is_empty()).then(|| escape_quoted(name)), &input[lt..])
            }
            None => (None, input),
        }
    };

    let rest = rest.trim_start();
    if let Some(bracketed) = rest.strip_prefix('<') {
        let gt = bracketed
            .find('>')
            .ok_or_else(|| Error::grammar(header, "missing '>'"))?;
        let uri = parse_uri(bracketed[..gt].trim())
            .map_err(|e| Error::grammar(header, e.to_string()))?;
        let params_text = &bracketed[gt + 1..];
        let params = Params::parse(params_text)
            .ok_or_else(|| Error::grammar(header, format!("unexpected '{}'", params_text.trim())))?;
        return Ok(Address {
            display_name,
            uri,
            params,
        });
    }

    if display_name.is_some() {
        return Err(Error::grammar(header, "display name without '<' URI"));
    }

    let (uri_text, params_text) = match separator_positions(rest, b';').first() {
        Some(&semi) => rest.split_at(semi),
        None => (rest, ""),
    };
    let uri = parse_uri(uri_text).map_err(|e| Error::grammar(header, e.to_string()))?;
    let params = Params::parse(params_text)
        .ok_or_else(|| Error::grammar(header, "invalid parameters"))?;

    Ok(Address {
        display_name: None,
        uri,
        params,
    })
}

/// Splits a comma-separated address list (Contact) into its members.
pub fn parse_address_list(header: &str, input: &str) -> Result<Vec<Address>> {
    let mut addresses = Vec::new();
    let mut start = 0;
    let mut positions = separator_positions(input, b',');
    positions.push(input.len());
    for end in positions {
        addresses.push(parse_address(header, &input[start..end])?);
        start = end + 1;
    }
    Ok(addresses)
}
