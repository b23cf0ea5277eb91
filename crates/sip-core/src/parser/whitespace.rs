use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    combinator::{opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

// Type alias for parser result
pub type ParseResult<'a, O> = IResult<&'a [u8], O>;

pub(crate) fn is_wsp(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

/// Parses a single whitespace character (SP or HTAB)
pub fn wsp(input: &[u8]) -> ParseResult<&[u8]> {
    alt((tag(b" "), tag(b"\t")))(input)
}

/// Parses optional whitespace (0 or more SP or HTAB)
pub fn owsp(input: &[u8]) -> ParseResult<&[u8]> {
    take_while(is_wsp)(input)
}

/// Parses CRLF (accepts \r\n or just \n)
pub fn crlf(input: &[u8]) -> ParseResult<&[u8]> {
    alt((tag(b"\r\n"), tag(b"\n")))(input)
}

/// LWS = [*WSP CRLF] 1*WSP
///
/// Folded lines are normally unfolded by the lexer before a header value
/// reaches its grammar, but header-level entry points accept them too.
pub fn lws(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(pair(opt(tuple((owsp, crlf))), take_while1(is_wsp)))(input)
}

/// SWS = [LWS]
pub fn sws(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(opt(lws))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wsp() {
        assert_eq!(wsp(b" rest"), Ok((&b"rest"[..], &b" "[..])));
        assert_eq!(wsp(b"\trest"), Ok((&b"rest"[..], &b"\t"[..])));
        assert!(wsp(b"").is_err());
        assert!(wsp(b"a").is_err());
    }

    #[test]
    fn test_owsp() {
        assert_eq!(owsp(b""), Ok((&b""[..], &b""[..])));
        assert_eq!(owsp(b" \t \trest"), Ok((&b"rest"[..], &b" \t \t"[..])));
        assert_eq!(owsp(b"rest"), Ok((&b"rest"[..], &b""[..])));
    }

    #[test]
    fn test_crlf() {
        assert_eq!(crlf(b"\r\nrest"), Ok((&b"rest"[..], &b"\r\n"[..])));
        assert_eq!(crlf(b"\nrest"), Ok((&b"rest"[..], &b"\n"[..])));
        assert!(crlf(b"\r").is_err());
    }

    #[test]
    fn test_lws_folding() {
        assert_eq!(lws(b"\r\n rest"), Ok((&b"rest"[..], &b"\r\n "[..])));
        assert_eq!(lws(b"  \t \r\n \t  rest"), Ok((&b"rest"[..], &b"  \t \r\n \t  "[..])));
        // CRLF without continuation whitespace ends the header
        assert!(lws(b"\r\nrest").is_err());
    }

    #[test]
    fn test_sws() {
        assert_eq!(sws(b""), Ok((&b""[..], &b""[..])));
        assert_eq!(sws(b"  x"), Ok((&b"x"[..], &b"  "[..])));
        assert_eq!(sws(b"x"), Ok((&b"x"[..], &b""[..])));
    }
}
