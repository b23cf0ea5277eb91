//! Headers whose value is a single number: Content-Length, Max-Forwards
//! and Expires.
//!
//! Parsing never fails. An out-of-range or malformed literal is kept as
//! written with `is_valid() == false`, and the message assembler reports
//! it as a diagnostic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::numeric::Numeric;

macro_rules! numeric_header {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Numeric);

        impl $name {
            pub fn new(value: u64) -> Self {
                Self(Numeric::from_u64(value))
            }

            pub fn value(&self) -> Option<u64> {
                self.0.value()
            }

            pub fn is_valid(&self) -> bool {
                self.0.is_valid()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Ok(Self(Numeric::new(s)))
            }
        }
    };
}

numeric_header! {
    /// Content-Length: body size in octets
    ContentLength
}

numeric_header! {
    /// Max-Forwards: remaining hop count
    MaxForwards
}

numeric_header! {
    /// Expires: lifetime in seconds
    Expires
}

impl ContentLength {
    /// Usable as a body delimiter
    pub fn length(&self) -> Option<usize> {
        self.value().and_then(|v| usize::try_from(v).ok())
    }
}

impl MaxForwards {
    /// Hop count when it fits the 0-255 range used on the wire
    pub fn hops(&self) -> Option<u8> {
        self.value().and_then(|v| u8::try_from(v).ok())
    }

    /// True when the literal is a number but outside 0-255
    pub fn is_out_of_range(&self) -> bool {
        self.is_valid() && self.hops().is_none()
    }
}
