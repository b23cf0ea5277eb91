//! Message assembly: start line classification, typed header parsing with
//! diagnostics, and the body length policy.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::parser::headers::parse_typed;
use crate::parser::lexer::{tokenize, RawHeader};
use crate::parser::request::parse_request_line;
use crate::parser::response::{is_status_line, parse_status_line};
use crate::types::diagnostic::Diagnostic;
use crate::types::headers::{HeaderAccess, HeaderName, TypedHeader};
use crate::types::message::Message;
use crate::types::sip_request::Request;
use crate::types::sip_response::Response;

/// How the transport delimits messages.
///
/// Datagram transports hand over exactly one message, so the body may run
/// to the end of the buffer. Stream transports need Content-Length to know
/// where the next message starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Framing {
    #[default]
    Datagram,
    Stream,
}

/// Parses one message received as a datagram
///
/// ```rust
/// use sipline_sip_core::prelude::*;
///
/// let raw = b"OPTIONS sip:example.com SIP/2.0\r\n\
///             Via: SIP/2.0/UDP 192.0.2.1;branch=z9hG4bK776asdhds\r\n\
///             To: <sip:example.com>\r\n\
///             From: <sip:alice@example.org>;tag=1928301774\r\n\
///             Call-ID: a84b4c76e66710\r\n\
///             CSeq: 63104 OPTIONS\r\n\
///             \r\n";
///
/// let message = parse_message(raw).unwrap();
/// assert!(message.is_request());
/// assert!(message.validate().is_ok());
/// assert!(message.diagnostics().is_empty());
/// ```
pub fn parse_message(input: &[u8]) -> Result<Message> {
    parse_message_with_framing(input, Framing::Datagram)
}

/// Parses one message under the given framing policy
pub fn parse_message_with_framing(input: &[u8], framing: Framing) -> Result<Message> {
    parse_framed(input, framing).map(|(message, _)| message)
}

/// Parses the first message of a stream buffer.
///
/// Returns the message and the number of bytes it occupied. An error for
/// which [`Error::is_incomplete`] holds means the buffer should be kept and
/// retried once more bytes arrive.
pub fn parse_stream(input: &[u8]) -> Result<(Message, usize)> {
    parse_framed(input, Framing::Stream)
}

fn parse_framed(input: &[u8], framing: Framing) -> Result<(Message, usize)> {
    let lexed = tokenize(input)?;
    if !lexed.terminated && framing == Framing::Stream {
        return Err(Error::IncompleteHeaders);
    }

    let message = assemble(
        lexed.start_line,
        lexed.headers,
        &input[lexed.body_offset..],
        framing,
    )?;
    let consumed = lexed.body_offset + message.body().len();
    Ok((message, consumed))
}

/// Builds a [`Message`] from a tokenized head and the bytes after it.
///
/// Only an unusable start line or an undeterminable body length fails.
/// Everything else that is wrong with the message is recorded in
/// [`Message::diagnostics`].
pub fn assemble(
    start_line: &str,
    raw_headers: Vec<RawHeader>,
    body: &[u8],
    framing: Framing,
) -> Result<Message> {
    let mut diagnostics = Vec::new();

    let mut message: Message = if is_status_line(start_line) {
        let (version, status, reason) = parse_status_line(start_line)?;
        if !version.is_supported() {
            diagnostics.push(Diagnostic::UnsupportedVersion(version));
        }
        if !status.is_valid() {
            diagnostics.push(Diagnostic::OutOfRange {
                field: "Status-Code".to_string(),
                value: status.to_string(),
            });
        }
        Response::from_parts(version, status, reason).into()
    } else {
        let (method, uri, version) = parse_request_line(start_line)?;
        if !version.is_supported() {
            diagnostics.push(Diagnostic::UnsupportedVersion(version));
        }
        Request::from_parts(method, uri, version).into()
    };

    for raw in raw_headers {
        let header = match parse_typed(&raw.name, &raw.value) {
            Ok(header) => {
                if let Some(value) = header.out_of_range_value() {
                    debug!(header = %raw.name, %value, "out-of-range value kept verbatim");
                    diagnostics.push(Diagnostic::OutOfRange {
                        field: raw.name.to_string(),
                        value,
                    });
                }
                header
            }
            Err(err) => {
                warn!(header = %raw.name, error = %err, "header kept unparsed");
                diagnostics.push(Diagnostic::Grammar {
                    header: raw.name.clone(),
                    reason: err.to_string(),
                });
                TypedHeader::Unparsed(raw.name, raw.value)
            }
        };
        match &mut message {
            Message::Request(request) => request.push_header(header),
            Message::Response(response) => response.push_header(header),
        }
    }

    check_header_counts(&message, &mut diagnostics);

    // The request method wins; the CSeq method it replaced is reported
    if let Message::Request(request) = &mut message {
        if let Some(cseq) = request.align_cseq_method() {
            debug!(%cseq, method = %request.method(), "CSeq method rewritten");
            diagnostics.push(Diagnostic::CSeqMethodMismatch {
                request: request.method().clone(),
                cseq,
            });
        }
    }

    let body = delimit_body(&message, body, framing, &mut diagnostics)?;

    debug!(
        start_line,
        headers = message.headers().len(),
        body = body.len(),
        diagnostics = diagnostics.len(),
        "assembled message"
    );

    match &mut message {
        Message::Request(request) => {
            request.set_body(body);
            request.set_diagnostics(diagnostics);
        }
        Message::Response(response) => {
            response.set_body(body);
            response.set_diagnostics(diagnostics);
        }
    }
    Ok(message)
}

fn check_header_counts(message: &Message, diagnostics: &mut Vec<Diagnostic>) {
    for name in HeaderName::required() {
        if !message.has_header(&name) {
            diagnostics.push(Diagnostic::MissingHeader(name));
        }
    }

    let mut seen: Vec<HeaderName> = Vec::new();
    for header in message.headers() {
        let name = header.name();
        if !name.is_singleton() {
            continue;
        }
        if seen.contains(&name) {
            if !diagnostics.contains(&Diagnostic::DuplicateHeader(name.clone())) {
                diagnostics.push(Diagnostic::DuplicateHeader(name));
            }
        } else {
            seen.push(name);
        }
    }
}

/// Applies the Content-Length policy for the framing in use
fn delimit_body(
    message: &Message,
    available: &[u8],
    framing: Framing,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Bytes> {
    let declared = message.content_length();
    match (declared.and_then(|cl| cl.length()), framing) {
        (Some(expected), _) if expected > available.len() => Err(Error::IncompleteMessage {
            expected,
            available: available.len(),
        }),
        (Some(expected), _) => Ok(Bytes::copy_from_slice(&available[..expected])),
        (None, Framing::Stream) => Err(Error::MissingContentLength),
        (None, Framing::Datagram) => {
            if let Some(cl) = declared {
                warn!(value = %cl, "Content-Length unusable, taking rest of datagram");
                diagnostics.push(Diagnostic::ContentLengthIgnored(cl.to_string()));
            }
            Ok(Bytes::copy_from_slice(available))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Method;

    const OPTIONS: &[u8] = b"OPTIONS sip:example.com SIP/2.0\r\n\
        Via: SIP/2.0/UDP 192.0.2.1;branch=z9hG4bK776asdhds\r\n\
        To: <sip:example.com>\r\n\
        From: <sip:alice@example.org>;tag=1928301774\r\n\
        Call-ID: a84b4c76e66710\r\n\
        CSeq: 63104 OPTIONS\r\n";

    fn with_tail(tail: &[u8]) -> Vec<u8> {
        let mut raw = OPTIONS.to_vec();
        raw.extend_from_slice(tail);
        raw
    }

    #[test]
    fn test_body_delimited_by_content_length() {
        let raw = with_tail(b"Content-Length: 5\r\n\r\nhelloEXTRA");
        let message = parse_message(&raw).unwrap();
        assert_eq!(message.body().as_ref(), b"hello");

        let (_, consumed) = parse_stream(&raw).unwrap();
        assert_eq!(consumed, raw.len() - "EXTRA".len());
    }

    #[test]
    fn test_short_body_is_incomplete() {
        let raw = with_tail(b"Content-Length: 9999\r\n\r\nshort");
        for framing in [Framing::Datagram, Framing::Stream] {
            let err = parse_message_with_framing(&raw, framing).unwrap_err();
            assert!(err.is_incomplete());
            assert_eq!(
                err,
                Error::IncompleteMessage {
                    expected: 9999,
                    available: 5
                }
            );
        }
    }

    #[test]
    fn test_missing_content_length() {
        let raw = with_tail(b"\r\nbody");
        let message = parse_message(&raw).unwrap();
        assert_eq!(message.body().as_ref(), b"body");
        assert!(message.diagnostics().is_empty());

        assert_eq!(parse_stream(&raw).unwrap_err(), Error::MissingContentLength);
    }

    #[test]
    fn test_invalid_content_length() {
        let raw = with_tail(b"Content-Length: -999\r\n\r\nbody");
        let message = parse_message(&raw).unwrap();
        assert_eq!(message.body().as_ref(), b"body");
        assert!(message
            .diagnostics()
            .contains(&Diagnostic::ContentLengthIgnored("-999".into())));
        assert!(matches!(
            parse_stream(&raw),
            Err(Error::MissingContentLength)
        ));
    }

    #[test]
    fn test_unterminated_head() {
        let raw = with_tail(b"Max-Forwards: 70\r\n");
        assert_eq!(parse_stream(&raw).unwrap_err(), Error::IncompleteHeaders);
        let message = parse_message(&raw).unwrap();
        assert!(message.body().is_empty());
        assert!(message.max_forwards().is_some());
    }

    #[test]
    fn test_grammar_failures_are_diagnostics() {
        let raw = with_tail(b"Expires: 0 0l@company.com\r\nCSeq: 1 INVITE\r\nContent-Length: 0\r\n\r\n");
        let message = parse_message(&raw).unwrap();
        let diagnostics = message.diagnostics();
        assert!(diagnostics.contains(&Diagnostic::DuplicateHeader(HeaderName::CSeq)));
        assert!(diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::OutOfRange { field, .. } if field == "Expires")));
        assert!(message.validate().is_err());
    }

    #[test]
    fn test_missing_headers_and_mismatch_are_flagged() {
        let raw = b"INVITE sip:bob@example.com SIP/2.0\r\nCSeq: 1 BYE\r\nContent-Length: 0\r\n\r\n";
        let message = parse_message(raw).unwrap();
        let diagnostics = message.diagnostics();
        assert!(diagnostics.contains(&Diagnostic::MissingHeader(HeaderName::Via)));
        assert!(diagnostics.contains(&Diagnostic::CSeqMethodMismatch {
            request: Method::Invite,
            cseq: Method::Bye
        }));
        assert_eq!(message.cseq().map(|c| &c.method), Some(&Method::Invite));
    }

    #[test]
    fn test_response_classification() {
        let raw = b"SIP/2.0 180 Ringing\r\nCSeq: 1 INVITE\r\n\r\n";
        let message = parse_message(raw).unwrap();
        let response = message.as_response().unwrap();
        assert_eq!(response.status().as_u16(), Some(180));
        assert_eq!(response.reason(), "Ringing");
        assert_eq!(message.method(), Some(&Method::Invite));
    }

    #[test]
    fn test_unusable_start_line() {
        assert!(matches!(
            parse_message(b"garbage\r\n\r\n"),
            Err(Error::InvalidStartLine(_))
        ));
    }
}
