//! Commonly used types and functions.
//!
//! ```rust
//! use sipline_sip_core::prelude::*;
//! ```

pub use crate::error::{Error, Result};
pub use crate::parser::{parse_header_line, parse_message, parse_message_with_framing, parse_stream, Framing};
pub use crate::types::{
    Accept, Address, CSeq, CallId, Contact, ContentLength, ContentType, Diagnostic, Expires,
    FromHeader, HeaderAccess, HeaderName, Host, MaxForwards, MediaType, Message, Method, Numeric,
    Param, Params, Request, RequestUri, Response, RetryAfter, Scheme, SentProtocol, StatusCode, To,
    TypedHeader, Uri, Version, Via, ViaEntry, Warning, WarningValue, BRANCH_MAGIC_COOKIE,
};
