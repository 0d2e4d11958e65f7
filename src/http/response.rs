use std::time::SystemTime;

use tokio::fs::File;

use crate::http::request::HeaderField;

/// HTTP status codes produced by the server.
///
/// - `Ok` (200): the requested file is served
/// - `NotFound` (404): nothing servable at that path
/// - `MethodNotAllowed` (405): any method other than GET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use hebottpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
        }
    }
}

/// Where the response bytes come from.
#[derive(Debug)]
pub enum Body {
    /// In-memory bytes.
    Bytes(Vec<u8>),
    /// An open file streamed to the client, with its byte length.
    File { file: File, len: u64 },
}

impl Body {
    pub fn len(&self) -> u64 {
        match self {
            Body::Bytes(b) => b.len() as u64,
            Body::File { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A complete HTTP response ready to be sent to a client.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    /// The `<n>` echoed in the `HTTP/1.<n>` status line
    pub minor_version: u8,
    /// Header fields in the order they are written
    pub headers: Vec<HeaderField>,
    pub body: Body,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// `build` adds `Date`, `Server` (when set), `Connection: close` and
/// `Content-Length` unless a header of that name was supplied.
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .minor_version(1)
///     .server("hebottpd/1.0")
///     .body(Body::Bytes(b"hi".to_vec()))
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    minor_version: u8,
    server: Option<String>,
    headers: Vec<HeaderField>,
    body: Body,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            minor_version: 1,
            server: None,
            headers: Vec::new(),
            body: Body::Bytes(Vec::new()),
        }
    }

    pub fn minor_version(mut self, minor_version: u8) -> Self {
        self.minor_version = minor_version;
        self
    }

    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Adds or replaces a header (names compare case-insensitively).
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let field = HeaderField::new(name, value);
        self.headers
            .retain(|h| !h.name.eq_ignore_ascii_case(&field.name));
        self.headers.push(field);
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Response {
        let mut headers = Vec::with_capacity(self.headers.len() + 4);

        let mut standard = vec![HeaderField::new(
            "Date",
            httpdate::fmt_http_date(SystemTime::now()),
        )];
        if let Some(server) = self.server {
            standard.push(HeaderField::new("Server", server));
        }
        standard.push(HeaderField::new("Connection", "close"));
        standard.push(HeaderField::new("Content-Length", self.body.len().to_string()));

        for field in standard {
            if !self
                .headers
                .iter()
                .any(|h| h.name.eq_ignore_ascii_case(&field.name))
            {
                headers.push(field);
            }
        }
        headers.extend(self.headers);

        Response {
            status: self.status,
            minor_version: self.minor_version,
            headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Looks up a header by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}
