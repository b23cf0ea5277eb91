//! To header (RFC 3261 Section 20.39)
//!
//! The logical recipient of a request. The `tag` parameter is added by the
//! UAS and, together with the From tag and Call-ID, identifies a dialog.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::address::Address;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct To(pub Address);

impl To {
    pub fn new(address: Address) -> Self {
        Self(address)
    }

    pub fn address(&self) -> &Address {
        &self.0
    }

    pub fn tag(&self) -> Option<&str> {
        self.0.tag()
    }

    pub fn with_tag(self, tag: &str) -> Self {
        Self(self.0.with_tag(tag))
    }
}

impl fmt::Display for To {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for To {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Address::parse("To", s).map(To)
    }
}

impl Deref for To {
    type Target = Address;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_tag() {
        let to: To = "sip:user@example.com;tag=3xfe-9921883-z9f".parse().unwrap();
        assert_eq!(to.tag(), Some("3xfe-9921883-z9f"));
        assert_eq!(to.to_string(), "<sip:user@example.com>;tag=3xfe-9921883-z9f");
    }

    #[test]
    fn test_with_tag_replaces_existing() {
        let to: To = "<sip:user@example.edu>;tag=1".parse().unwrap();
        assert_eq!(to.with_tag("902jndnke3").tag(), Some("902jndnke3"));
    }
}
