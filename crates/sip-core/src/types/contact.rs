//! Contact header (RFC 3261 Section 20.10)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::address::parse_address_list;
use crate::types::address::Address;

/// Either the REGISTER wildcard `*` or one or more addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contact {
    Wildcard,
    Addresses(Vec<Address>),
}

impl Contact {
    pub fn addresses(&self) -> &[Address] {
        match self {
            Contact::Wildcard => &[],
            Contact::Addresses(addresses) => addresses,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Contact::Wildcard)
    }

    /// Per-contact `expires` parameter of the first address
    pub fn expires(&self) -> Option<&str> {
        self.addresses().first().and_then(|a| a.params.get("expires"))
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contact::Wildcard => f.write_str("*"),
            Contact::Addresses(addresses) => {
                for (i, address) in addresses.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", address)?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for Contact {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim() == "*" {
            return Ok(Contact::Wildcard);
        }
        parse_address_list("Contact", s).map(Contact::Addresses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard() {
        let contact: Contact = " * ".parse().unwrap();
        assert!(contact.is_wildcard());
        assert_eq!(contact.to_string(), "*");
        assert!(contact.addresses().is_empty());
    }

    #[test]
    fn test_folded_expires_param() {
        // Value as produced by the lexer after unfolding a continuation line
        let contact: Contact = "<sip:user@host129.example.com> ;expires=280297596632815"
            .parse()
            .unwrap();
        assert_eq!(contact.expires(), Some("280297596632815"));
        assert_eq!(
            contact.to_string(),
            "<sip:user@host129.example.com>;expires=280297596632815"
        );
    }

    #[test]
    fn test_multiple_contacts() {
        let contact: Contact = "<sip:a@example.com>;q=0.5,sip:b@example.com".parse().unwrap();
        assert_eq!(contact.addresses().len(), 2);
        assert_eq!(contact.to_string(), "<sip:a@example.com>;q=0.5, <sip:b@example.com>");
    }
}
