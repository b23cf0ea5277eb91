use nom::{
    bytes::complete::{tag, take_while1},
    combinator::recognize,
    sequence::tuple,
};

use super::whitespace::{sws, ParseResult};

/// token = 1*(alphanum / "-" / "." / "!" / "%" / "*" / "_" / "+" / "`" / "'" / "~")
pub fn is_token_char(c: u8) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, b'-' | b'.' | b'!' | b'%' | b'*' | b'_' | b'+' | b'`' | b'\'' | b'~')
}

pub fn token(input: &[u8]) -> ParseResult<&[u8]> {
    take_while1(is_token_char)(input)
}

/// True when the whole string is a single token
pub fn is_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_token_char)
}

// Separator wrappers with SWS

pub fn slash(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(tuple((sws, tag(b"/"), sws)))(input)
}

pub fn colon(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(tuple((sws, tag(b":"), sws)))(input)
}
