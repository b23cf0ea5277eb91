use std::fmt;
use std::str::FromStr;

use nom::{
    bytes::complete::tag_no_case,
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res},
    sequence::{preceded, separated_pair},
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::whitespace::ParseResult;

/// SIP-Version = "SIP" "/" 1*DIGIT "." 1*DIGIT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub const SIP_2_0: Version = Version { major: 2, minor: 0 };

    pub fn new(major: u32, minor: u32) -> Self {
        Version { major, minor }
    }

    /// Only SIP/2.0 is understood; other versions still parse
    pub fn is_supported(&self) -> bool {
        *self == Version::SIP_2_0
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::SIP_2_0
    }
}

fn number(input: &[u8]) -> ParseResult<u32> {
    map_res(digit1, |d: &[u8]| -> Result<u32> {
        std::str::from_utf8(d)?
            .parse::<u32>()
            .map_err(|e| Error::InvalidVersion(e.to_string()))
    })(input)
}

pub(crate) fn sip_version(input: &[u8]) -> ParseResult<Version> {
    let (rest, (major, minor)) =
        preceded(tag_no_case(b"SIP/"), separated_pair(number, char('.'), number))(input)?;
    Ok((rest, Version { major, minor }))
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SIP/{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        all_consuming(sip_version)(s.as_bytes())
            .map(|(_, version)| version)
            .map_err(|_| Error::InvalidVersion(s.to_string()))
    }
}
