//! CSeq header (RFC 3261 Section 20.16)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::method::Method;
use crate::types::numeric::Numeric;

/// Sequence number and method of a request.
///
/// The sequence number is kept as a [`Numeric`] so values beyond 2**32
/// (RFC 4475 uses 36893488147419103232) survive unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CSeq {
    pub seq: Numeric,
    pub method: Method,
}

impl CSeq {
    pub fn new(seq: u64, method: Method) -> Self {
        CSeq {
            seq: Numeric::from_u64(seq),
            method,
        }
    }

    /// Sequence number, when it is a valid 32-bit value
    pub fn sequence(&self) -> Option<u32> {
        self.seq.value().and_then(|v| u32::try_from(v).ok())
    }
}

impl fmt::Display for CSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.seq, self.method)
    }
}

impl FromStr for CSeq {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(seq), Some(method), None) => {
                if !seq.bytes().all(|c| c.is_ascii_digit()) {
                    return Err(Error::grammar("CSeq", format!("'{}' is not a number", seq)));
                }
                Ok(CSeq {
                    seq: Numeric::new(seq),
                    method: method.parse()?,
                })
            }
            _ => Err(Error::grammar("CSeq", "expected '<number> <method>'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let cseq: CSeq = "8 INVITE".parse().unwrap();
        assert_eq!(cseq.sequence(), Some(8));
        assert_eq!(cseq.method, Method::Invite);
    }

    #[test]
    fn test_oversized_sequence_is_retained() {
        let cseq: CSeq = "36893488147419103232 REGISTER".parse().unwrap();
        assert!(!cseq.seq.is_valid());
        assert_eq!(cseq.sequence(), None);
        assert_eq!(cseq.to_string(), "36893488147419103232 REGISTER");
    }

    #[test]
    fn test_invalid() {
        assert!("INVITE".parse::<CSeq>().is_err());
        assert!("1 INVITE extra".parse::<CSeq>().is_err());
        assert!("-1 INVITE".parse::<CSeq>().is_err());
    }
}
