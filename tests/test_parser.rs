use hebottpd::http::parser::{
    MAX_HEADER_COUNT, MAX_LINE_LENGTH, ParseError, parse_header_line, parse_request_line, read_request,
};
use hebottpd::http::request::Method;

#[tokio::test]
async fn test_parse_simple_get_request() {
    let mut req: &[u8] = b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let parsed = read_request(&mut req).await.unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.path, "/index.html");
    assert_eq!(parsed.minor_version, 1);
    assert_eq!(parsed.header("Host"), Some("example.com"));
    assert!(parsed.body.is_none());
}

#[tokio::test]
async fn test_parse_http10_minor_version() {
    let mut req: &[u8] = b"GET / HTTP/1.0\r\n\r\n";
    let parsed = read_request(&mut req).await.unwrap();

    assert_eq!(parsed.minor_version, 0);
}

#[tokio::test]
async fn test_parse_headers_keep_arrival_order() {
    let mut req: &[u8] =
        b"GET /path HTTP/1.1\r\nHost: example.com\r\nUser-Agent: test-client\r\nAccept: */*\r\n\r\n";
    let parsed = read_request(&mut req).await.unwrap();

    let names: Vec<&str> = parsed.headers.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["Host", "User-Agent", "Accept"]);
    assert_eq!(parsed.header("Accept"), Some("*/*"));
}

#[tokio::test]
async fn test_parse_header_values_strip_leading_whitespace() {
    let mut req: &[u8] = b"GET / HTTP/1.1\r\nX-A:plain\r\nX-B: \t spaced\r\nX-C:\t\ttabbed \r\n\r\n";
    let parsed = read_request(&mut req).await.unwrap();

    assert_eq!(parsed.headers.len(), 3);
    assert_eq!(parsed.header("X-A"), Some("plain"));
    assert_eq!(parsed.header("X-B"), Some("spaced"));
    assert_eq!(parsed.header("X-C"), Some("tabbed "));
}

#[tokio::test]
async fn test_parse_stops_at_blank_line() {
    let mut req: &[u8] = b"GET / HTTP/1.1\r\nHost: a\r\n\r\nleftover body";
    let parsed = read_request(&mut req).await.unwrap();

    assert_eq!(parsed.headers.len(), 1);
    assert_eq!(req, b"leftover body");
}

#[tokio::test]
async fn test_parse_accepts_bare_newlines() {
    let mut req: &[u8] = b"GET /a HTTP/1.1\nHost: example.com\n\n";
    let parsed = read_request(&mut req).await.unwrap();

    assert_eq!(parsed.path, "/a");
    assert_eq!(parsed.header("Host"), Some("example.com"));
}

#[tokio::test]
async fn test_parse_end_of_stream_ends_headers() {
    let mut req: &[u8] = b"GET / HTTP/1.1\r\nHost: example.com\r\n";
    let parsed = read_request(&mut req).await.unwrap();

    assert_eq!(parsed.headers.len(), 1);
}

#[tokio::test]
async fn test_parse_empty_stream_is_truncated() {
    let mut req: &[u8] = b"";
    let result = read_request(&mut req).await;

    assert!(matches!(result, Err(ParseError::TruncatedRequest)));
}

#[tokio::test]
async fn test_parse_unterminated_request_line_is_truncated() {
    let mut req: &[u8] = b"GET / HTTP/1.1";
    let result = read_request(&mut req).await;

    assert!(matches!(result, Err(ParseError::TruncatedRequest)));
}

#[tokio::test]
async fn test_parse_unterminated_header_line_is_truncated() {
    let mut req: &[u8] = b"GET / HTTP/1.1\r\nHost: exa";
    let result = read_request(&mut req).await;

    assert!(matches!(result, Err(ParseError::TruncatedRequest)));
}

#[tokio::test]
async fn test_parse_missing_version_token() {
    let mut req: &[u8] = b"GET /index.html\r\n\r\n";
    let result = read_request(&mut req).await;

    assert!(matches!(result, Err(ParseError::MalformedRequestLine)));
}

#[tokio::test]
async fn test_parse_malformed_header() {
    let mut req: &[u8] = b"GET / HTTP/1.1\r\nBrokenHeader\r\n\r\n";
    let result = read_request(&mut req).await;

    assert!(matches!(result, Err(ParseError::MalformedHeaderLine)));
}

#[tokio::test]
async fn test_parse_http2_is_unsupported() {
    let mut req: &[u8] = b"GET /x HTTP/2.0\r\n";
    let result = read_request(&mut req).await;

    assert!(matches!(result, Err(ParseError::UnsupportedProtocol)));
}

#[tokio::test]
async fn test_parse_overlong_line() {
    let line = format!("GET /{} HTTP/1.1\r\n\r\n", "a".repeat(MAX_LINE_LENGTH));
    let mut req = line.as_bytes();
    let result = read_request(&mut req).await;

    assert!(matches!(result, Err(ParseError::LineTooLong)));
}

#[tokio::test]
async fn test_parse_header_count_limit() {
    let mut at_limit = String::from("GET / HTTP/1.1\r\n");
    for i in 0..MAX_HEADER_COUNT {
        at_limit.push_str(&format!("X-H{}: {}\r\n", i, "v".repeat(100)));
    }
    let over_limit = format!("{}X-Extra: 1\r\n\r\n", at_limit);
    at_limit.push_str("\r\n");

    let mut req = at_limit.as_bytes();
    let parsed = read_request(&mut req).await.unwrap();
    assert_eq!(parsed.headers.len(), MAX_HEADER_COUNT);

    let mut req = over_limit.as_bytes();
    let result = read_request(&mut req).await;
    assert!(matches!(result, Err(ParseError::TooManyHeaders)));
}

#[tokio::test]
async fn test_parse_header_flood_stops_early() {
    let mut flood = String::from("GET / HTTP/1.1\r\n");
    for i in 0..20_000 {
        flood.push_str(&format!("X-H{}: {}\r\n", i, "v".repeat(100)));
    }
    flood.push_str("\r\n");

    let mut req = flood.as_bytes();
    let result = read_request(&mut req).await;

    assert!(matches!(result, Err(ParseError::TooManyHeaders)));
    // reading stopped right after the first rejected line
    assert!(req.len() > flood.len() / 2);
}

#[test]
fn test_request_line_various_methods() {
    let methods = vec![
        ("GET", Method::GET),
        ("POST", Method::POST),
        ("PUT", Method::PUT),
        ("DELETE", Method::DELETE),
        ("HEAD", Method::HEAD),
        ("OPTIONS", Method::OPTIONS),
        ("PATCH", Method::PATCH),
        ("BREW", Method::Other("BREW".to_string())),
    ];

    for (token, expected) in methods {
        for minor in 0..=9u8 {
            let line = format!("{} /some/path HTTP/1.{}", token, minor);
            let parsed = parse_request_line(&line).unwrap();
            assert_eq!(parsed.method, expected);
            assert_eq!(parsed.path, "/some/path");
            assert_eq!(parsed.minor_version, minor);
        }
    }
}

#[test]
fn test_request_line_token_count() {
    assert!(matches!(parse_request_line(""), Err(ParseError::MalformedRequestLine)));
    assert!(matches!(parse_request_line("GET"), Err(ParseError::MalformedRequestLine)));
    assert!(matches!(
        parse_request_line("GET / HTTP/1.1 extra"),
        Err(ParseError::MalformedRequestLine)
    ));
}

#[test]
fn test_request_line_rejects_other_versions() {
    for version in ["HTTP/1.", "HTTP/1.x", "HTTP/1.11", "HTTP/0.9", "HTTPS/1.1", "http/1.1"] {
        let line = format!("GET / {}", version);
        assert!(
            matches!(parse_request_line(&line), Err(ParseError::UnsupportedProtocol)),
            "{} should be rejected",
            version
        );
    }
}

#[test]
fn test_header_line_splits_at_first_colon() {
    let field = parse_header_line(b"Host: localhost:18080").unwrap();

    assert_eq!(field.name, "Host");
    assert_eq!(field.value, "localhost:18080");
}

#[test]
fn test_header_line_empty_value() {
    let field = parse_header_line(b"X-Empty:").unwrap();

    assert_eq!(field.name, "X-Empty");
    assert_eq!(field.value, "");
}

#[test]
fn test_header_line_rejects_invalid_utf8() {
    let result = parse_header_line(b"X-Bin: \xff\xfe");

    assert!(matches!(result, Err(ParseError::MalformedHeaderLine)));
}
