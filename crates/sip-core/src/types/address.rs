use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::parser::address::parse_address;
use crate::parser::utils::escape_quoted;
use crate::types::param::Params;
use crate::types::uri::Uri;

/// Display name, URI and header parameters as used by To, From and Contact.
///
/// The display name is stored in quoted-string form without its surrounding
/// quotes: escapes inside a quoted name are kept as received, and `"` or `\`
/// in an unquoted name are escaped. On output the URI is always wrapped in angle
/// brackets and a display name is always quoted, so a value such as
/// `sip:a@b;tag=1` or `Mr. J. User <sip:..>` reparses unambiguously.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub display_name: Option<String>,
    pub uri: Uri,
    pub params: Params,
}

impl Address {
    pub fn new(uri: Uri) -> Self {
        Address {
            display_name: None,
            uri,
            params: Params::new(),
        }
    }

    /// Sets the display name from plain text
    pub fn with_display_name(mut self, name: &str) -> Self {
        self.display_name = Some(escape_quoted(name));
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.params.set("tag", Some(tag));
        self
    }

    pub fn tag(&self) -> Option<&str> {
        self.params.get("tag")
    }

    pub(crate) fn parse(header: &str, value: &str) -> Result<Self> {
        parse_address(header, value)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.display_name {
            write!(f, "\"{}\" ", name)?;
        }
        write!(f, "<{}>{}", self.uri, self.params)
    }
}
