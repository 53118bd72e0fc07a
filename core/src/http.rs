//! HTTP request and response types passed across the transport seam.
//!
//! # Design
//! Requests are plain data: the client builds an `HttpRequest`, rewrites its
//! target against the base URL, and hands it to a `Transport`. Responses carry
//! a status, headers and a body reader that is consumed exactly once.
//!
//! Header names are compared case-insensitively; `set_header` replaces every
//! existing value for a name.

use std::fmt;
use std::io::{self, Read};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `target` is either a path with an optional query (`/users/1?full=true`)
/// or an absolute URL. When the client has a base URL, only the path and
/// query of the target survive resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Replace all values of `name` with a single `value`.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// First value of `name`, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A response whose body has not been read yet.
///
/// Returned by `Transport::send` and `Client::dispatch`. Dropping the
/// response closes the body.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: ResponseBody,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Single-use response body stream.
pub struct ResponseBody {
    reader: Box<dyn Read + Send>,
}

impl ResponseBody {
    pub fn new(reader: impl Read + Send + 'static) -> Self {
        Self {
            reader: Box::new(reader),
        }
    }

    /// In-memory body, mostly useful for fake transports.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(io::Cursor::new(bytes.into()))
    }

    pub fn empty() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// Read the remaining body into memory.
    pub fn read_to_end(mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.reader.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Read and throw away the remaining body so the connection can be reused.
    pub fn drain(mut self) -> io::Result<u64> {
        io::copy(&mut self.reader, &mut io::sink())
    }
}

impl Read for ResponseBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseBody").finish_non_exhaustive()
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_header_replaces_case_insensitively() {
        let mut req = HttpRequest::new(HttpMethod::Get, "/users")
            .with_header("content-type", "text/plain")
            .with_header("X-Trace", "1");
        req.set_header("Content-Type", "application/json");

        assert_eq!(req.headers.len(), 2);
        assert_eq!(req.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(req.header("x-trace"), Some("1"));
    }

    #[test]
    fn missing_header_is_none() {
        let req = HttpRequest::new(HttpMethod::Delete, "/users/1");
        assert!(req.header("Accept").is_none());
        assert!(req.body.is_none());
    }

    #[test]
    fn method_display_matches_wire_name() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }

    #[test]
    fn success_range_is_inclusive_of_200_and_299() {
        let response = |status| HttpResponse {
            status,
            headers: Vec::new(),
            body: ResponseBody::empty(),
        };
        assert!(!response(199).is_success());
        assert!(response(200).is_success());
        assert!(response(299).is_success());
        assert!(!response(300).is_success());
    }

    #[test]
    fn body_reads_once_to_end() {
        let body = ResponseBody::from_bytes("hello");
        assert_eq!(body.read_to_end().unwrap(), b"hello");
        assert_eq!(ResponseBody::from_bytes("abc").drain().unwrap(), 3);
    }
}
