//! Request parsing from a raw byte stream.
//!
//! # Responsibilities
//! - Read the request line (bounded length) and split it into method, target, version
//! - Accept only HTTP/1.0 and HTTP/1.1, GET and POST
//! - Read header lines into a case-insensitive map until the blank line
//! - For POST, read exactly `Content-Length` body bytes
//!
//! # Design Decisions
//! - Version is checked before method, so `DELETE / HTTP/2.0` reports the version
//! - Lines are decoded lossily; a stray non-UTF-8 byte never aborts a request
//! - A missing or non-numeric `Content-Length` means an empty body

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::http::response::Status;
use crate::security::limits::RequestLimits;

/// Errors produced while reading a request.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Socket-level failure (reset, short read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the connection before sending anything.
    #[error("connection closed before request line")]
    Closed,

    #[error("request line longer than {0} bytes")]
    RequestLineTooLong(usize),

    #[error("header line longer than {0} bytes")]
    HeaderLineTooLong(usize),

    #[error("more than {0} header lines")]
    TooManyHeaders(usize),

    #[error("body of {len} bytes exceeds limit of {limit}")]
    BodyTooLarge { len: usize, limit: usize },

    #[error("malformed request line '{0}'")]
    MalformedRequestLine(String),

    #[error("unsupported version '{0}'")]
    UnsupportedVersion(String),

    #[error("unsupported method '{0}'")]
    UnsupportedMethod(String),
}

/// How a protocol error is reported back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub status: Status,
    pub message: &'static str,
    pub cause: String,
}

impl ParseError {
    /// The error response for this failure, or `None` when the connection
    /// should just be dropped.
    pub fn rejection(&self) -> Option<Rejection> {
        let (status, message, cause) = match self {
            ParseError::Io(_) | ParseError::Closed => return None,
            ParseError::MalformedRequestLine(line) => (
                Status::BAD_REQUEST,
                "TinyChat did not recognize the request",
                line.clone(),
            ),
            ParseError::UnsupportedVersion(version) => (
                Status::NOT_IMPLEMENTED,
                "TinyChat does not implement that version",
                version.clone(),
            ),
            ParseError::UnsupportedMethod(method) => (
                Status::NOT_IMPLEMENTED,
                "TinyChat does not implement that method",
                method.clone(),
            ),
            ParseError::RequestLineTooLong(_) => (
                Status::URI_TOO_LONG,
                "TinyChat could not read the request line",
                self.to_string(),
            ),
            ParseError::HeaderLineTooLong(_) | ParseError::TooManyHeaders(_) => (
                Status::HEADER_FIELDS_TOO_LARGE,
                "TinyChat could not read the request headers",
                self.to_string(),
            ),
            ParseError::BodyTooLarge { .. } => (
                Status::PAYLOAD_TOO_LARGE,
                "TinyChat will not read that body",
                self.to_string(),
            ),
        };
        Some(Rejection { status, message, cause })
    }

    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::Io(_) => "io",
            ParseError::Closed => "closed",
            ParseError::RequestLineTooLong(_) => "request_line_too_long",
            ParseError::HeaderLineTooLong(_) => "header_line_too_long",
            ParseError::TooManyHeaders(_) => "too_many_headers",
            ParseError::BodyTooLarge { .. } => "body_too_large",
            ParseError::MalformedRequestLine(_) => "malformed_request_line",
            ParseError::UnsupportedVersion(_) => "unsupported_version",
            ParseError::UnsupportedMethod(_) => "unsupported_method",
        }
    }
}

/// Supported request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Case-insensitive match against `GET` / `POST`.
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("GET") {
            Some(Method::Get)
        } else if token.eq_ignore_ascii_case("POST") {
            Some(Method::Post)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported protocol versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Http10,
    Http11,
}

impl Version {
    /// Case-insensitive match against `HTTP/1.0` / `HTTP/1.1`.
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("HTTP/1.0") {
            Some(Version::Http10)
        } else if token.eq_ignore_ascii_case("HTTP/1.1") {
            Some(Version::Http11)
        } else {
            None
        }
    }
}

/// The first line of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    pub target: String,
    pub version: Version,
}

impl RequestLine {
    /// Split on whitespace into exactly three tokens, then validate version and method.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [method, target, version] = tokens.as_slice() else {
            return Err(ParseError::MalformedRequestLine(line.to_string()));
        };

        let version = Version::parse(version)
            .ok_or_else(|| ParseError::UnsupportedVersion(version.to_string()))?;
        let method =
            Method::parse(method).ok_or_else(|| ParseError::UnsupportedMethod(method.to_string()))?;

        Ok(Self {
            method,
            target: target.to_string(),
            version,
        })
    }
}

/// Case-insensitive header map scoped to one request.
///
/// A repeated header name keeps the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Split `Name: value` on the first colon, trimming both sides.
    /// Returns false (and stores nothing) when the line has no colon.
    pub fn insert_line(&mut self, line: &str) -> bool {
        match line.split_once(':') {
            Some((name, value)) => {
                self.insert(name.trim(), value.trim());
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Declared body length; absent or non-numeric means zero.
    pub fn content_length(&self) -> usize {
        self.get("Content-Length")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }
}

/// A fully read request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub target: String,
    pub version: Version,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Request {
    /// Target without its query component.
    pub fn path(&self) -> &str {
        self.target
            .split_once('?')
            .map_or(self.target.as_str(), |(path, _)| path)
    }

    /// The part of the target after `?`, if any.
    pub fn query_string(&self) -> Option<&str> {
        self.target.split_once('?').map(|(_, query)| query)
    }
}

enum LineRead {
    Line(String),
    TooLong,
    Eof,
}

/// Read one line of at most `max` bytes (terminator included), without the trailing CRLF.
async fn read_bounded_line<R>(reader: &mut R, max: usize) -> std::io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(if buf.is_empty() {
                LineRead::Eof
            } else {
                LineRead::Line(finish_line(buf))
            });
        }

        let (chunk, done) = match available.iter().position(|&b| b == b'\n') {
            Some(i) => (&available[..=i], true),
            None => (available, false),
        };
        if buf.len() + chunk.len() > max {
            return Ok(LineRead::TooLong);
        }
        buf.extend_from_slice(chunk);
        let used = chunk.len();
        reader.consume(used);

        if done {
            return Ok(LineRead::Line(finish_line(buf)));
        }
    }
}

fn finish_line(mut buf: Vec<u8>) -> String {
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Read header lines until the blank line (or EOF).
pub async fn read_headers<R>(reader: &mut R, limits: &RequestLimits) -> Result<HeaderMap, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut headers = HeaderMap::new();
    let mut lines = 0;
    loop {
        match read_bounded_line(reader, limits.max_line_length).await? {
            LineRead::Eof => break,
            LineRead::TooLong => return Err(ParseError::HeaderLineTooLong(limits.max_line_length)),
            LineRead::Line(line) if line.is_empty() => break,
            LineRead::Line(line) => {
                lines += 1;
                if lines > limits.max_headers {
                    return Err(ParseError::TooManyHeaders(limits.max_headers));
                }
                if !headers.insert_line(&line) {
                    tracing::trace!(line = %line, "Ignoring header line without colon");
                }
            }
        }
    }
    Ok(headers)
}

/// Read exactly the declared `Content-Length` bytes.
pub async fn read_body<R>(
    reader: &mut R,
    headers: &HeaderMap,
    limits: &RequestLimits,
) -> Result<Vec<u8>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let len = headers.content_length();
    if !limits.allows_body(len) {
        return Err(ParseError::BodyTooLarge {
            len,
            limit: limits.max_body_size,
        });
    }
    let mut body = vec![0; len];
    reader.read_exact(&mut body).await?;
    Ok(body)
}

/// Read a complete request: request line, headers and, for POST, the body.
pub async fn read_request<R>(reader: &mut R, limits: &RequestLimits) -> Result<Request, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let line = match read_bounded_line(reader, limits.max_line_length).await? {
        LineRead::Eof => return Err(ParseError::Closed),
        LineRead::TooLong => return Err(ParseError::RequestLineTooLong(limits.max_line_length)),
        LineRead::Line(line) => line,
    };
    tracing::debug!(request_line = %line, "Request received");

    let RequestLine {
        method,
        target,
        version,
    } = RequestLine::parse(&line)?;

    let headers = read_headers(reader, limits).await?;
    let body = match method {
        Method::Post => read_body(reader, &headers, limits).await?,
        Method::Get => Vec::new(),
    };

    Ok(Request {
        method,
        target,
        version,
        headers,
        body,
    })
}
