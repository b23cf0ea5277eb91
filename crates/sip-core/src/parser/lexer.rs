//! Splits a raw message into its start line, header lines and body offset.
//!
//! The lexer knows nothing about header grammars. It unfolds continuation
//! lines, maps header names (including compact forms) to [`HeaderName`] and
//! records where every header came from. Values are handed on untouched
//! apart from outer whitespace, so quoted strings, escapes and surplus
//! separators all reach the grammar parsers as written.

use std::ops::Range;
use std::str::FromStr;

use tracing::trace;

use crate::error::{Error, Result};
use crate::parser::whitespace::is_wsp;
use crate::types::headers::HeaderName;

/// One unfolded header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeader {
    pub name: HeaderName,
    /// Value with folding collapsed and outer whitespace removed
    pub value: String,
    /// Byte range of the header, continuation lines included
    pub span: Range<usize>,
}

/// Result of tokenizing one message head
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexed<'a> {
    pub start_line: &'a str,
    pub headers: Vec<RawHeader>,
    /// Offset of the first body byte
    pub body_offset: usize,
    /// False when the input ended before the blank line
    pub terminated: bool,
}

/// A line of the head without its line terminator
struct Line<'a> {
    text: &'a str,
    start: usize,
    end: usize,
}

/// Locates the blank line ending the head.
///
/// Returns the end of the head and the offset of the body. CRLF is the
/// terminator on the wire; a bare LF is tolerated.
fn find_head_end(input: &[u8], from: usize) -> Option<(usize, usize)> {
    let mut pos = from;
    while pos < input.len() {
        let line_end = match input[pos..].iter().position(|&c| c == b'\n') {
            Some(i) => pos + i,
            None => return None,
        };
        let content_end = if line_end > pos && input[line_end - 1] == b'\r' {
            line_end - 1
        } else {
            line_end
        };
        if content_end == pos && pos > from {
            return Some((pos, line_end + 1));
        }
        pos = line_end + 1;
    }
    None
}

fn split_lines(head: &str, base: usize) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for piece in head.split_inclusive('\n') {
        let text = piece.trim_end_matches('\n').trim_end_matches('\r');
        lines.push(Line {
            text,
            start: base + start,
            end: base + start + piece.len(),
        });
        start += piece.len();
    }
    lines
}

/// Tokenizes a message head.
///
/// Leading empty lines are skipped. When no blank line is found the whole
/// remaining input is treated as the head and `terminated` is false; the
/// framing policy decides whether that is acceptable.
pub fn tokenize(input: &[u8]) -> Result<Lexed<'_>> {
    let skip = input
        .iter()
        .take_while(|&&c| c == b'\r' || c == b'\n')
        .count();
    if skip == input.len() {
        return Err(Error::Lexical {
            line: 1,
            reason: "empty message".to_string(),
        });
    }

    let (head_end, body_offset, terminated) = match find_head_end(input, skip) {
        Some((head_end, body_offset)) => (head_end, body_offset, true),
        None => (input.len(), input.len(), false),
    };

    let head = std::str::from_utf8(&input[skip..head_end])?;
    let mut lines = split_lines(head, skip).into_iter();

    let start_line = match lines.next() {
        Some(line) if !line.text.trim().is_empty() => line.text,
        _ => {
            return Err(Error::Lexical {
                line: 1,
                reason: "missing start line".to_string(),
            })
        }
    };

    let mut headers: Vec<RawHeader> = Vec::new();
    for (index, line) in lines.enumerate() {
        let number = index + 2;
        if line.text.is_empty() {
            continue;
        }

        if line.text.bytes().next().map_or(false, is_wsp) {
            let previous = headers.last_mut().ok_or_else(|| Error::Lexical {
                line: number,
                reason: "continuation line before any header".to_string(),
            })?;
            let folded = line.text.trim();
            if !folded.is_empty() {
                let mut value = previous.value.trim_end().to_string();
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str(folded);
                previous.value = value;
            }
            previous.span.end = line.end;
            continue;
        }

        let colon = line.text.find(':').ok_or_else(|| Error::Lexical {
            line: number,
            reason: format!("missing colon in header line '{}'", line.text),
        })?;
        let written = line.text[..colon].trim_end_matches([' ', '\t']);
        let name = HeaderName::from_str(written).map_err(|_| Error::Lexical {
            line: number,
            reason: format!("invalid header name '{}'", written),
        })?;

        headers.push(RawHeader {
            name,
            value: line.text[colon + 1..].trim().to_string(),
            span: line.start..line.end,
        });
    }

    trace!(
        headers = headers.len(),
        body_offset,
        terminated,
        "tokenized message head"
    );

    Ok(Lexed {
        start_line,
        headers,
        body_offset,
        terminated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        let raw = b"OPTIONS sip:example.com SIP/2.0\r\nCall-ID: abc\r\nl: 4\r\n\r\nbody";
        let lexed = tokenize(raw).unwrap();
        assert_eq!(lexed.start_line, "OPTIONS sip:example.com SIP/2.0");
        assert!(lexed.terminated);
        assert_eq!(lexed.headers.len(), 2);
        assert_eq!(lexed.headers[0].name, HeaderName::CallId);
        assert_eq!(lexed.headers[1].name, HeaderName::ContentLength);
        assert_eq!(lexed.headers[1].value, "4");
        assert_eq!(&raw[lexed.body_offset..], b"body");
        assert_eq!(&raw[lexed.headers[0].span.clone()], b"Call-ID: abc\r\n");
    }

    #[test]
    fn test_folding_collapses_whitespace() {
        let raw = b"INVITE sip:a@b SIP/2.0\r\nSubject: I know you're there,\r\n         pick up the phone\r\n   \r\n\tand talk to me!\r\n\r\n";
        let lexed = tokenize(raw).unwrap();
        assert_eq!(lexed.headers.len(), 1);
        assert_eq!(
            lexed.headers[0].value,
            "I know you're there, pick up the phone and talk to me!"
        );
    }

    #[test]
    fn test_leading_crlf_skipped() {
        let lexed = tokenize(b"\r\n\r\nSIP/2.0 200 OK\r\n\r\n").unwrap();
        assert_eq!(lexed.start_line, "SIP/2.0 200 OK");
        assert!(lexed.headers.is_empty());
    }

    #[test]
    fn test_colon_inside_value_and_spaces_before_colon() {
        let lexed = tokenize(b"SIP/2.0 200 OK\r\nTo    : <sip:a@b:5060>\r\n\r\n").unwrap();
        assert_eq!(lexed.headers[0].name, HeaderName::To);
        assert_eq!(lexed.headers[0].value, "<sip:a@b:5060>");
    }

    #[test]
    fn test_missing_colon_is_lexical() {
        let err = tokenize(b"SIP/2.0 200 OK\r\nCall-ID: x\r\nCSeq 1 OPTIONS\r\n\r\n").unwrap_err();
        assert!(matches!(err, Error::Lexical { line: 3, .. }));
    }

    #[test]
    fn test_continuation_without_header() {
        let err = tokenize(b"SIP/2.0 200 OK\r\n  folded\r\n\r\n").unwrap_err();
        assert!(matches!(err, Error::Lexical { line: 2, .. }));
    }

    #[test]
    fn test_unterminated_head() {
        let lexed = tokenize(b"SIP/2.0 200 OK\r\nCall-ID: x\r\n").unwrap();
        assert!(!lexed.terminated);
        assert_eq!(lexed.headers.len(), 1);
    }

    #[test]
    fn test_empty_value_passes_through() {
        let lexed = tokenize(b"SIP/2.0 200 OK\r\nAccept:\r\n\r\n").unwrap();
        assert_eq!(lexed.headers[0].name, HeaderName::Accept);
        assert_eq!(lexed.headers[0].value, "");
    }
}
