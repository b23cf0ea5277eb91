use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::utils::{closing_quote, separator_positions};
use crate::types::numeric::Numeric;

/// One `warn-code SP warn-agent SP warn-text` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningValue {
    /// Nominally three digits; longer codes are kept with `is_valid() == false`
    pub code: Numeric,
    pub agent: String,
    /// Quoted text including the quotes
    pub text: String,
}

impl WarningValue {
    /// warn-code is 3DIGIT
    pub fn is_valid_code(&self) -> bool {
        self.code.raw().len() == 3 && self.code.is_valid()
    }
}

impl fmt::Display for WarningValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.code, self.agent, self.text)
    }
}

impl FromStr for WarningValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (code, rest) = s
            .split_once(char::is_whitespace)
            .ok_or_else(|| Error::grammar("Warning", "missing warn-agent"))?;
        if code.is_empty() || !code.bytes().all(|c| c.is_ascii_digit()) {
            return Err(Error::grammar("Warning", format!("invalid warn-code '{}'", code)));
        }
        let (agent, text) = rest
            .trim_start()
            .split_once(char::is_whitespace)
            .ok_or_else(|| Error::grammar("Warning", "missing warn-text"))?;
        let text = text.trim();
        if text.is_empty() || closing_quote(text) != Some(text.len() - 1) {
            return Err(Error::grammar("Warning", "warn-text must be a quoted string"));
        }
        Ok(WarningValue {
            code: Numeric::new(code),
            agent: agent.to_string(),
            text: text.to_string(),
        })
    }
}

/// Warning header (RFC 3261 Section 20.43)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning(pub Vec<WarningValue>);

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

impl FromStr for Warning {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut values = Vec::new();
        let mut start = 0;
        let mut bounds = separator_positions(s, b',');
        bounds.push(s.len());
        for end in bounds {
            values.push(s[start..end].parse()?);
            start = end + 1;
        }
        Ok(Warning(values))
    }
}
