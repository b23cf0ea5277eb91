//! # SIP URI
//!
//! SIP URIs (RFC 3261 Section 19.1) have the general form
//!
//! ```text
//! sip:user:password@host:port;uri-parameters?headers
//! ```
//!
//! `sip` and `sips` URIs are decomposed into their components. Every other
//! scheme is carried opaquely: the text after the colon is stored verbatim
//! in `opaque` and written back untouched.
//!
//! ```rust
//! use sipline_sip_core::prelude::*;
//! use std::str::FromStr;
//!
//! let uri = Uri::from_str("sip:alice@example.com:5060;transport=udp").unwrap();
//! assert_eq!(uri.scheme, Scheme::Sip);
//! assert_eq!(uri.user.as_deref(), Some("alice"));
//! assert_eq!(uri.port, Some(5060));
//! assert_eq!(uri.params.get("transport"), Some("udp"));
//!
//! let uri = Uri::sip("example.com").with_user("bob").with_port(5070);
//! assert_eq!(uri.to_string(), "sip:bob@example.com:5070");
//! ```

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::uri::parse_uri;
use crate::parser::utils::unescape_uri_component;
use crate::types::param::{Param, Params};

/// URI scheme
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scheme {
    /// SIP URI (non-secure)
    Sip,
    /// SIPS URI (secure SIP)
    Sips,
    /// TEL URI (telephone number)
    Tel,
    /// Any other scheme, lowercased
    Custom(String),
}

impl Scheme {
    pub fn as_str(&self) -> &str {
        match self {
            Scheme::Sip => "sip",
            Scheme::Sips => "sips",
            Scheme::Tel => "tel",
            Scheme::Custom(scheme) => scheme,
        }
    }
}

impl From<&str> for Scheme {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "sip" => Scheme::Sip,
            "sips" => Scheme::Sips,
            "tel" => Scheme::Tel,
            other => Scheme::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host part of a URI or Via sent-by
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Host {
    /// Domain name, kept as written
    Domain(String),
    /// IPv4 or IPv6 address
    Address(IpAddr),
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::Domain(domain) => f.write_str(domain),
            Host::Address(IpAddr::V4(addr)) => write!(f, "{}", addr),
            Host::Address(IpAddr::V6(addr)) => write!(f, "[{}]", addr),
        }
    }
}

impl From<&str> for Host {
    fn from(s: &str) -> Self {
        match s.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>() {
            Ok(addr) => Host::Address(addr),
            Err(_) => Host::Domain(s.to_string()),
        }
    }
}

/// A parsed URI
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uri {
    pub scheme: Scheme,
    /// User part, still percent-encoded
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Host,
    pub port: Option<u16>,
    /// URI parameters (`;transport=udp;lr`)
    pub params: Params,
    /// Header part after `?`, verbatim
    pub headers: Option<String>,
    /// Everything after `scheme:` for non-SIP schemes
    pub opaque: Option<String>,
}

impl Uri {
    pub fn new(scheme: Scheme, host: impl Into<Host>) -> Self {
        Uri {
            scheme,
            user: None,
            password: None,
            host: host.into(),
            port: None,
            params: Params::new(),
            headers: None,
            opaque: None,
        }
    }

    pub fn sip(host: &str) -> Self {
        Uri::new(Scheme::Sip, host)
    }

    pub fn sips(host: &str) -> Self {
        Uri::new(Scheme::Sips, host)
    }

    /// A URI whose scheme-specific part is not decomposed
    pub fn opaque(scheme: Scheme, rest: &str) -> Self {
        Uri {
            opaque: Some(rest.to_string()),
            ..Uri::new(scheme, Host::Domain(String::new()))
        }
    }

    pub fn with_user(mut self, user: &str) -> Self {
        self.user = Some(user.to_string());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn is_opaque(&self) -> bool {
        self.opaque.is_some()
    }

    /// User part with percent-escapes decoded
    pub fn decoded_user(&self) -> Result<Option<String>> {
        self.user
            .as_deref()
            .map(|user| unescape_uri_component(user.as_bytes()))
            .transpose()
    }

    /// Value of the `transport` URI parameter
    pub fn transport(&self) -> Option<&str> {
        self.params.get("transport")
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;
        if let Some(opaque) = &self.opaque {
            return f.write_str(opaque);
        }
        if let Some(user) = &self.user {
            f.write_str(user)?;
            if let Some(password) = &self.password {
                write!(f, ":{}", password)?;
            }
            f.write_str("@")?;
        }
        write!(f, "{}", self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        write!(f, "{}", self.params)?;
        if let Some(headers) = &self.headers {
            write!(f, "?{}", headers)?;
        }
        Ok(())
    }
}

impl FromStr for Uri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_uri(s)
    }
}
