use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::utils::split_ranges;
use crate::types::media_type::MediaType;

/// Accept header (RFC 3261 Section 20.1). An empty value is legal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accept(pub Vec<MediaType>);

impl Accept {
    pub fn accepts(&self, typ: &str, subtype: &str) -> bool {
        self.0.iter().any(|m| {
            (m.typ == "*" || m.typ.eq_ignore_ascii_case(typ))
                && (m.subtype == "*" || m.subtype.eq_ignore_ascii_case(subtype))
        })
    }
}

impl fmt::Display for Accept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, media) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", media)?;
        }
        Ok(())
    }
}

impl FromStr for Accept {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Ok(Accept::default());
        }
        split_ranges(s, b',')
            .into_iter()
            .map(|range| MediaType::parse("Accept", &s[range]))
            .collect::<Result<Vec<_>>>()
            .map(Accept)
    }
}
