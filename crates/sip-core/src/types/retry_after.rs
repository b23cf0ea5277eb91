use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::utils::separator_positions;
use crate::types::numeric::Numeric;
use crate::types::param::Params;

/// Retry-After header (RFC 3261 Section 20.33)
///
/// ```text
/// Retry-After = "Retry-After" HCOLON delta-seconds [ comment ] *( SEMI retry-param )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryAfter {
    pub delay: Numeric,
    /// Comment including its parentheses
    pub comment: Option<String>,
    pub params: Params,
}

impl RetryAfter {
    pub fn new(seconds: u64) -> Self {
        RetryAfter {
            delay: Numeric::from_u64(seconds),
            comment: None,
            params: Params::new(),
        }
    }

    pub fn duration(&self) -> Option<u64> {
        self.params.get("duration").and_then(|d| d.parse().ok())
    }
}

impl fmt::Display for RetryAfter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.delay)?;
        if let Some(comment) = &self.comment {
            write!(f, " {}", comment)?;
        }
        write!(f, "{}", self.params)
    }
}

impl FromStr for RetryAfter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        if digits_end == 0 {
            return Err(Error::grammar("Retry-After", format!("'{}' is not a number", s)));
        }
        let delay = Numeric::new(&s[..digits_end]);
        let mut rest = s[digits_end..].trim_start();

        let mut comment = None;
        if rest.starts_with('(') {
            let close = rest
                .find(')')
                .ok_or_else(|| Error::grammar("Retry-After", "unterminated comment"))?;
            comment = Some(rest[..=close].to_string());
            rest = rest[close + 1..].trim_start();
        }

        if !rest.is_empty() && separator_positions(rest, b';').first() != Some(&0) {
            return Err(Error::grammar("Retry-After", format!("unexpected '{}'", rest)));
        }
        let params = Params::parse(rest)
            .ok_or_else(|| Error::grammar("Retry-After", "invalid parameters"))?;

        Ok(RetryAfter {
            delay,
            comment,
            params,
        })
    }
}
