//! SIP message parsing.
//!
//! Parsing runs in three stages: [`lexer`] splits the head into lines,
//! [`headers`] dispatches every value to its grammar, and [`message`]
//! assembles the result and applies the body length policy.

pub mod address;
pub mod headers;
pub mod lexer;
pub mod message;
pub mod request;
pub mod response;
pub mod separators;
pub mod uri;
pub mod utils;
pub mod via;
pub mod whitespace;

pub use headers::{parse_header_line, parse_typed};
pub use lexer::{tokenize, Lexed, RawHeader};
pub use message::{assemble, parse_message, parse_message_with_framing, parse_stream, Framing};
pub use whitespace::ParseResult;
