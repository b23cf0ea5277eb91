//! From header (RFC 3261 Section 20.20)

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::address::Address;

/// Initiator of the request. A UAC always adds a `tag` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct From(pub Address);

impl From {
    pub fn new(address: Address) -> Self {
        Self(address)
    }

    pub fn address(&self) -> &Address {
        &self.0
    }

    pub fn tag(&self) -> Option<&str> {
        self.0.tag()
    }
}

impl fmt::Display for From {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for From {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Address::parse("From", s).map(From)
    }
}

impl Deref for From {
    type Target = Address;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_with_quoted_comma() {
        let from: From = r#""Bell, Alexander" <sip:a.g.bell@example.com>;tag=433423"#
            .parse()
            .unwrap();
        assert_eq!(from.display_name.as_deref(), Some("Bell, Alexander"));
        assert_eq!(from.tag(), Some("433423"));
    }
}
