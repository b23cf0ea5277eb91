//! # sipline-sip-core
//!
//! Tolerant SIP message parsing and serialization following RFC 3261, built to
//! survive the RFC 4475 torture tests.
//!
//! Malformed but salvageable input still produces a [`Message`]. Header values
//! that fail their grammar are kept verbatim and reported as
//! [`Diagnostic`]s, out-of-range numbers keep their literal text, and
//! serialization always recomputes Content-Length from the body.
//!
//! ```rust
//! use sipline_sip_core::prelude::*;
//!
//! let raw = b"SIP/2.0 200 OK\r\n\
//!             Via: SIP/2.0/UDP 192.0.2.4;branch=z9hG4bKnashds8\r\n\
//!             To: Bob <sip:bob@biloxi.com>;tag=a6c85cf\r\n\
//!             From: Alice <sip:alice@atlanta.com>;tag=1928301774\r\n\
//!             Call-ID: a84b4c76e66710\r\n\
//!             CSeq: 314159 INVITE\r\n\
//!             Content-Length: 0\r\n\
//!             \r\n";
//!
//! let message = parse_message(raw).unwrap();
//! let response = message.as_response().unwrap();
//! assert_eq!(response.status().as_u16(), Some(200));
//! assert_eq!(message.to_header().and_then(|to| to.tag()), Some("a6c85cf"));
//! assert_eq!(
//!     message.headers_named(&HeaderName::To).next().unwrap().to_string(),
//!     "To: \"Bob\" <sip:bob@biloxi.com>;tag=a6c85cf"
//! );
//! ```

pub mod error;
pub mod parser;
pub mod prelude;
pub mod types;

pub use error::{Error, Result};
pub use parser::{parse_message, parse_message_with_framing, parse_stream, Framing};
pub use types::{Diagnostic, HeaderAccess, Message, Request, Response};
