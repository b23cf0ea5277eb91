use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use nom::{character::complete::digit1, combinator::all_consuming};
use serde::{Deserialize, Serialize};

/// A numeric header field that remembers how it was written.
///
/// SIP numeric fields are parsed into a `u64`, but values that overflow,
/// are negative or contain garbage are never coerced. They keep their
/// literal text with `value() == None`, serialize back byte for byte and
/// leave the decision to reject the message to the layer above.
///
/// # Examples
///
/// ```rust
/// use sipline_sip_core::types::Numeric;
///
/// let n = Numeric::new("70");
/// assert_eq!(n.value(), Some(70));
///
/// let huge = Numeric::new("36893488147419103232");
/// assert!(!huge.is_valid());
/// assert_eq!(huge.to_string(), "36893488147419103232");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Numeric {
    raw: String,
    value: Option<u64>,
}

impl Numeric {
    /// Parse a literal. Surrounding whitespace is dropped, nothing else is.
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();
        let value = all_consuming(digit1::<&str, nom::error::Error<&str>>)(raw)
            .ok()
            .and_then(|(_, digits)| digits.parse::<u64>().ok());
        Numeric {
            raw: raw.to_string(),
            value,
        }
    }

    pub fn from_u64(value: u64) -> Self {
        Numeric {
            raw: value.to_string(),
            value: Some(value),
        }
    }

    /// The parsed value, `None` when the literal is out of range or malformed
    pub fn value(&self) -> Option<u64> {
        self.value
    }

    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl FromStr for Numeric {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Numeric::new(s))
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<u64> for Numeric {
    fn from(value: u64) -> Self {
        Numeric::from_u64(value)
    }
}
