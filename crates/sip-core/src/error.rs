use std::str::Utf8Error;
use thiserror::Error;

/// A type alias for handling `Result`s with `Error` values
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while tokenizing, parsing or assembling SIP messages.
///
/// Only structurally unsalvageable input surfaces as an `Error`. Header values
/// that fail their grammar are kept as opaque headers and reported through
/// [`crate::types::Diagnostic`] instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The header block could not be split into name/value lines
    #[error("Lexical error on line {line}: {reason}")]
    Lexical {
        /// 1-based line number within the message head
        line: usize,
        /// What went wrong
        reason: String,
    },

    /// The first line is neither a Request-Line nor a Status-Line
    #[error("Invalid start line: {0}")]
    InvalidStartLine(String),

    /// The SIP-Version does not match `SIP/<digits>.<digits>`
    #[error("Invalid SIP version: {0}")]
    InvalidVersion(String),

    /// A header value does not satisfy its grammar
    #[error("Invalid {header} header: {reason}")]
    Grammar {
        /// Canonical header name
        header: String,
        /// What went wrong
        reason: String,
    },

    /// Content-Length announces more body bytes than are available
    #[error("Incomplete message: expected {expected} body bytes, {available} available")]
    IncompleteMessage {
        /// Declared body length
        expected: usize,
        /// Bytes present after the blank line
        available: usize,
    },

    /// The blank line terminating the header block has not arrived yet
    #[error("Incomplete message: header block is not terminated")]
    IncompleteHeaders,

    /// A stream transport cannot delimit the message without a valid Content-Length
    #[error("Content-Length is required to delimit a message on a stream transport")]
    MissingContentLength,

    /// URI could not be parsed
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    /// Header block is not valid UTF-8
    #[error("Invalid UTF-8 in message head: {0}")]
    Utf8(String),
}

impl Error {
    /// Build a grammar error for the given header
    pub fn grammar(header: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Grammar {
            header: header.into(),
            reason: reason.into(),
        }
    }

    /// True when the caller should wait for more bytes and retry.
    ///
    /// Stream transports use this to keep buffering instead of dropping
    /// the connection.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Error::IncompleteMessage { .. } | Error::IncompleteHeaders)
    }
}

impl From<Utf8Error> for Error {
    fn from(err: Utf8Error) -> Self {
        Error::Utf8(err.to_string())
    }
}
