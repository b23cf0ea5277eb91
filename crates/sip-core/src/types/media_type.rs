use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::separators::is_token;
use crate::parser::utils::separator_positions;
use crate::types::param::Params;

/// `type "/" subtype *(SEMI m-parameter)` as used by Content-Type and Accept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaType {
    pub typ: String,
    pub subtype: String,
    pub params: Params,
}

impl MediaType {
    pub fn new(typ: &str, subtype: &str) -> Self {
        MediaType {
            typ: typ.to_string(),
            subtype: subtype.to_string(),
            params: Params::new(),
        }
    }

    /// Case-insensitive `type/subtype` comparison
    pub fn is(&self, typ: &str, subtype: &str) -> bool {
        self.typ.eq_ignore_ascii_case(typ) && self.subtype.eq_ignore_ascii_case(subtype)
    }

    pub(crate) fn parse(header: &str, s: &str) -> Result<Self> {
        let s = s.trim();
        let (essence, params_text) = match separator_positions(s, b';').first() {
            Some(&semi) => s.split_at(semi),
            None => (s, ""),
        };
        let (typ, subtype) = essence
            .split_once('/')
            .map(|(t, st)| (t.trim(), st.trim()))
            .filter(|(t, st)| is_token(t) && is_token(st))
            .ok_or_else(|| Error::grammar(header, format!("invalid media type '{}'", essence)))?;
        let params = Params::parse(params_text)
            .ok_or_else(|| Error::grammar(header, "invalid media parameters"))?;
        Ok(MediaType {
            typ: typ.to_string(),
            subtype: subtype.to_string(),
            params,
        })
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}{}", self.typ, self.subtype, self.params)
    }
}

/// Content-Type header (RFC 3261 Section 20.15)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentType(pub MediaType);

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MediaType::parse("Content-Type", s).map(ContentType)
    }
}
