use std::fmt;
use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::http::request::{HeaderField, Method, Request};

/// Longest request or header line accepted, terminator excluded.
pub const MAX_LINE_LENGTH: usize = 8192;

/// Most header lines accepted in one request.
pub const MAX_HEADER_COUNT: usize = 100;

#[derive(Debug)]
pub enum ParseError {
    /// The stream ended before a complete line arrived.
    TruncatedRequest,
    /// The request line does not have exactly three tokens.
    MalformedRequestLine,
    /// A header line has no `:` separator.
    MalformedHeaderLine,
    /// The version token is not `HTTP/1.<digit>`.
    UnsupportedProtocol,
    /// A line exceeded [`MAX_LINE_LENGTH`].
    LineTooLong,
    /// The header section has more than [`MAX_HEADER_COUNT`] lines.
    TooManyHeaders,
    Io(io::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::TruncatedRequest => f.write_str("request truncated before end of line"),
            ParseError::MalformedRequestLine => f.write_str("malformed request line"),
            ParseError::MalformedHeaderLine => f.write_str("malformed header line"),
            ParseError::UnsupportedProtocol => f.write_str("unsupported protocol version"),
            ParseError::LineTooLong => write!(f, "line longer than {} bytes", MAX_LINE_LENGTH),
            ParseError::TooManyHeaders => write!(f, "more than {} header lines", MAX_HEADER_COUNT),
            ParseError::Io(e) => write!(f, "read failed: {}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        ParseError::Io(e)
    }
}

/// The three tokens of `METHOD SP PATH SP HTTP/1.<n>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    pub path: String,
    pub minor_version: u8,
}

/// Reads one request (request line and header section) from `reader`.
///
/// The body is never read. Reading stops at the blank line that ends the
/// header section, or at end of stream if it falls on a line boundary.
pub async fn read_request<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let line = read_line(reader)
        .await?
        .ok_or(ParseError::TruncatedRequest)?;
    let line = std::str::from_utf8(&line).map_err(|_| ParseError::MalformedRequestLine)?;
    let RequestLine {
        method,
        path,
        minor_version,
    } = parse_request_line(line)?;

    let mut headers = Vec::new();
    while let Some(line) = read_line(reader).await? {
        if line.is_empty() {
            break;
        }
        if headers.len() == MAX_HEADER_COUNT {
            return Err(ParseError::TooManyHeaders);
        }
        headers.push(parse_header_line(&line)?);
    }

    Ok(Request {
        method,
        path,
        minor_version,
        headers,
        body: None,
    })
}

pub fn parse_request_line(line: &str) -> Result<RequestLine, ParseError> {
    let mut parts = line.split_whitespace();

    let method = parts.next().ok_or(ParseError::MalformedRequestLine)?;
    let path = parts.next().ok_or(ParseError::MalformedRequestLine)?;
    let version = parts.next().ok_or(ParseError::MalformedRequestLine)?;

    if parts.next().is_some() {
        return Err(ParseError::MalformedRequestLine);
    }

    let minor_version = parse_version(version).ok_or(ParseError::UnsupportedProtocol)?;

    Ok(RequestLine {
        method: Method::parse(method),
        path: path.to_string(),
        minor_version,
    })
}

/// Splits `Name: Value` at the first colon. Leading spaces and tabs are
/// dropped from the value.
pub fn parse_header_line(line: &[u8]) -> Result<HeaderField, ParseError> {
    let line = std::str::from_utf8(line).map_err(|_| ParseError::MalformedHeaderLine)?;
    let (name, value) = line
        .split_once(':')
        .ok_or(ParseError::MalformedHeaderLine)?;

    Ok(HeaderField::new(name, value.trim_start_matches([' ', '\t'])))
}

/// Accepts exactly `HTTP/1.` followed by a single digit.
fn parse_version(token: &str) -> Option<u8> {
    match token.strip_prefix("HTTP/1.")?.as_bytes() {
        [d] if d.is_ascii_digit() => Some(d - b'0'),
        _ => None,
    }
}

/// Reads one `\n`-terminated line and strips the terminator (and a
/// preceding `\r`). Returns `None` on end of stream at a line boundary.
async fn read_line<R>(reader: &mut R) -> Result<Option<Vec<u8>>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    let n = (&mut *reader)
        .take(MAX_LINE_LENGTH as u64 + 2)
        .read_until(b'\n', &mut line)
        .await?;

    if n == 0 {
        return Ok(None);
    }

    if line.last() != Some(&b'\n') {
        return Err(if line.len() > MAX_LINE_LENGTH {
            ParseError::LineTooLong
        } else {
            ParseError::TruncatedRequest
        });
    }

    line.pop();
    if line.last() == Some(&b'\r') {
        line.pop();
    }

    if line.len() > MAX_LINE_LENGTH {
        return Err(ParseError::LineTooLong);
    }

    Ok(Some(line))
}
