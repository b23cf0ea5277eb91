// Header-level parsing: every typed header reproduces its own wire form

use std::str::FromStr;

use sipline_sip_core::prelude::*;

/// Header lines lifted from the RFC 4475 messages, already in canonical form
const CANONICAL_LINES: &[&str] = &[
    "To: <sip:j.user@example.com>",
    "From: <sip:caller@example.net>;tag=134161461246",
    "Max-Forwards: 7",
    "Call-ID: badinv01.0ha0isndaksdjasdf3234nas",
    "CSeq: 8 INVITE",
    "Content-Length: 152",
    "Content-Type: application/sdp",
    "Contact: <sip:caller@hungry.example.net>",
    "Via: SIP/2.0/UDP host5.example.com;branch=z9hG4bK-39234-23523",
    "Content-Length: 9999",
    "Max-Forwards: 254",
    "CSeq: 0 INVITE",
    "Via: SIP/2.0/UDP 192.0.2.53;branch=z9hG4bKkdjuw",
    "Via: SIP/2.0/TCP host129.example.com;branch=z9hG4bK342sdfoi3",
    "Via: SIP/2.0/TCP host129.example.com;branch=z9hG4bKzzxdiwo34sw;received=192.0.2.129",
    "Via: SIP/2.0/UDP 192.0.2.59:5050;branch=z9hG4bKkdjuw39234",
    "Via: SIP/2.0/UDP 192.0.2.5",
    "To: <sip:user@example.com>;tag=3xfe-9921883-z9f",
    "CSeq: 2130706432 INVITE",
    "Accept: application/sdp",
    "CSeq: 238923 OPTIONS",
    "Call-ID: regbadct.k345asrl3fdbv@10.0.0.1",
    "CSeq: 1 REGISTER",
    "Via: SIP/2.0/UDP 135.180.130.133:5060;branch=z9hG4bKkdjuw",
    "From: \"Bell, Alexander\" <sip:a.g.bell@example.com>;tag=433423",
    "From: \"A. Bell\" <sip:a.g.bell@example.com>;tag=qweoiqpe",
    "To: \"T. Watson\" <sip:t.watson@example.org>",
    "To: <sip:user@example.edu>;tag=902jndnke3",
    "Contact: <sip:user@host105.example.com>",
    "Retry-After: 949302838503028349304023988",
    "Warning: 1812 overture \"In Progress\"",
    "Expires: 3600",
    "Contact: *",
];

#[test]
fn test_canonical_lines_round_trip() {
    for line in CANONICAL_LINES {
        let header = parse_header_line(line)
            .unwrap_or_else(|e| panic!("failed to parse '{}': {}", line, e));
        assert!(
            !matches!(header, TypedHeader::Other(..)),
            "'{}' should have a typed grammar",
            line
        );
        assert_eq!(&header.to_string(), line);
    }
}

#[test]
fn test_compact_and_mixed_case_names_normalize() {
    let cases = [
        ("v: SIP/2.0/UDP 192.0.2.5", "Via: SIP/2.0/UDP 192.0.2.5"),
        ("i: abc@host", "Call-ID: abc@host"),
        ("m: <sip:a@b>", "Contact: <sip:a@b>"),
        ("l: 0", "Content-Length: 0"),
        ("c: application/sdp", "Content-Type: application/sdp"),
        ("f: sip:a@b;tag=1", "From: <sip:a@b>;tag=1"),
        ("t: sip:a@b", "To: <sip:a@b>"),
        ("max-forwards: 70", "Max-Forwards: 70"),
        ("CALL-ID: xyz", "Call-ID: xyz"),
    ];
    for (input, expected) in cases {
        assert_eq!(parse_header_line(input).unwrap().to_string(), expected);
    }
}

#[test]
fn test_unknown_headers_pass_through() {
    let header = parse_header_line("Date: Fri, 01 Jan 2010 16:00:00 EST").unwrap();
    assert_eq!(header.name(), HeaderName::Other("Date".to_string()));
    assert_eq!(header.to_string(), "Date: Fri, 01 Jan 2010 16:00:00 EST");

    // Unknown compact letters are kept as written
    let header = parse_header_line("k: 100rel").unwrap();
    assert_eq!(header.to_string(), "k: 100rel");
}

#[test]
fn test_parse_cseq() {
    let cseq = CSeq::from_str("314159 INVITE").unwrap();
    assert_eq!(cseq.sequence(), Some(314159));
    assert_eq!(cseq.method, Method::Invite);

    let cseq = CSeq::from_str("36893488147419103232 REGISTER").unwrap();
    assert_eq!(cseq.sequence(), None);
    assert_eq!(cseq.to_string(), "36893488147419103232 REGISTER");

    assert!(CSeq::from_str("INVITE").is_err());
    assert!(CSeq::from_str("1 INVITE extra").is_err());
    assert!(CSeq::from_str("x1 INVITE").is_err());
}

#[test]
fn test_parse_via_list() {
    let via = Via::from_str(
        "SIP/2.0/UDP first.example.com:4000;branch=z9hG4bKa7c6a8dlze.1, SIP/2.0/TCP 192.0.2.2;rport",
    )
    .unwrap();
    assert_eq!(via.entries().len(), 2);
    assert_eq!(via.branch(), Some("z9hG4bKa7c6a8dlze.1"));
    assert_eq!(via.entries()[1].transport(), "TCP");
    assert_eq!(via.entries()[1].rport(), Some(None));

    let via = Via::from_str("SIP/2.0/UDP 192.0.2.15;;,;,,").unwrap();
    assert_eq!(via.entries().len(), 1);
    assert_eq!(via.to_string(), "SIP/2.0/UDP 192.0.2.15;;,;,,");

    assert!(Via::from_str("192.0.2.15").is_err());
}

#[test]
fn test_parse_addresses() {
    let to = To::from_str("\"Mr. J. User <sip:j.user@example.com>").unwrap();
    assert_eq!(to.to_string(), "\"Mr. J. User\" <sip:j.user@example.com>");

    let from = FromHeader::from_str("sip:caller@example.net;tag=93942939o2").unwrap();
    assert_eq!(from.tag(), Some("93942939o2"));
    assert!(from.uri.params.is_empty());

    let contact = Contact::from_str("<sip:a@b>;expires=60, \"Two\" <sip:c@d>").unwrap();
    assert_eq!(contact.addresses().len(), 2);
    assert_eq!(contact.expires(), Some("60"));
    assert!(Contact::from_str("*").unwrap().is_wildcard());

    assert!(To::from_str("Bob").is_err());
}

#[test]
fn test_parse_content_type_and_accept() {
    let ct = ContentType::from_str("multipart/mixed;boundary=unique-boundary-1").unwrap();
    assert!(ct.0.is("multipart", "mixed"));
    assert_eq!(ct.0.params.get("boundary"), Some("unique-boundary-1"));

    let accept = Accept::from_str("application/sdp, text/*").unwrap();
    assert!(accept.accepts("text", "plain"));
    assert!(!accept.accepts("image", "png"));

    assert!(Accept::from_str("").unwrap().0.is_empty());
    assert!(ContentType::from_str("application/").is_err());
}

#[test]
fn test_scalar_headers_keep_literals() {
    let mf = MaxForwards::from_str("300").unwrap();
    assert_eq!(mf.hops(), None);
    assert_eq!(mf.to_string(), "300");

    let cl = ContentLength::from_str("-999").unwrap();
    assert_eq!(cl.length(), None);
    assert_eq!(cl.to_string(), "-999");

    let ra = RetryAfter::from_str("120 (I'm in a meeting);duration=60").unwrap();
    assert_eq!(ra.duration(), Some(60));
    assert_eq!(ra.to_string(), "120 (I'm in a meeting);duration=60");
}
