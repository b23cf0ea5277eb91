use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Call-ID header value: an opaque `word [ "@" word ]` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(pub String);

impl CallId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CallId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(Error::grammar("Call-ID", format!("invalid identifier '{}'", s)));
        }
        Ok(CallId(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_id() {
        let id: CallId = "ltgtruri.1@192.0.2.5".parse().unwrap();
        assert_eq!(id.as_str(), "ltgtruri.1@192.0.2.5");
        assert!("".parse::<CallId>().is_err());
        assert!("a b".parse::<CallId>().is_err());
    }
}
