use crate::buffer::{Buffer, Error};
use core::fmt::Write;

/// `User-Agent` header name.
pub const HEADER_USER_AGENT: &str = "User-Agent";
/// `Host` header name.
pub const HEADER_HOST: &str = "Host";
/// `Accept` header name.
pub const HEADER_ACCEPT: &str = "Accept";
/// `Content-Type` header name.
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
/// `Accept-Encoding` header name.
pub const HEADER_ACCEPT_ENCODING: &str = "Accept-Encoding";
/// `Content-Length` header name.
pub const HEADER_CONTENT_LENGTH: &str = "Content-Length";

/// User agent sent by [`HttpRequest::create_post_request`].
pub const DEFAULT_USER_AGENT: &str = "iotclient/1.0";
/// Content type of URL-encoded form bodies.
pub const CONTENT_FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// HTTP request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `HEAD`
    Head,
}

impl Method {
    /// The method token as it appears on the request line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }
}

/// HTTP protocol versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// `HTTP/1.0`
    Http10,
    /// `HTTP/1.1`
    Http11,
}

impl Version {
    /// The version token as it appears on the request line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Version::Http10 => "HTTP/1.0",
            Version::Http11 => "HTTP/1.1",
        }
    }
}

/// Parameters of a complete request built by [`HttpRequest::create`].
///
/// Headers are emitted in a fixed order: `User-Agent`, `Host`, `Accept`,
/// `Content-Type` (if any), `Accept-Encoding: identity`, and `Content-Length`
/// when the body is non-empty.
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    /// Request method.
    pub method: Method,
    /// Absolute path, e.g. `/auth`.
    pub path: &'a str,
    /// Protocol version.
    pub version: Version,
    /// Host header value. Taken as raw bytes since it is often sliced out of
    /// a larger URL rather than held as its own string.
    pub host: &'a [u8],
    /// User agent header value.
    pub user_agent: &'a str,
    /// Optional content type header value.
    pub content_type: Option<&'a str>,
    /// Optional request body.
    pub body: Option<&'a [u8]>,
}

/// An HTTP request materialized straight into caller storage.
///
/// There is no structured representation: the buffer *is* the request. Each
/// step appends to the buffer and returns the number of bytes written; a step
/// that fails leaves the buffer exactly as it was before the call.
///
/// ```rust
/// use iotsuite::network::application::http::{HttpRequest, Method, Version};
///
/// let mut storage = [0u8; 128];
/// let mut request = HttpRequest::new(&mut storage).unwrap();
/// request.init_request_line(Method::Post, "/auth", Version::Http10).unwrap();
/// request.append_header("Host", "example.com").unwrap();
/// request.append_body(Some(b"a=1")).unwrap();
///
/// assert_eq!(
///     request.as_bytes(),
///     b"POST /auth HTTP/1.0\r\nHost: example.com\r\n\r\na=1"
/// );
/// ```
#[derive(Debug)]
pub struct HttpRequest<'a> {
    buf: Buffer<'a>,
}

impl<'a> HttpRequest<'a> {
    /// Create a request writer over `storage`.
    pub fn new(storage: &'a mut [u8]) -> Result<Self, Error> {
        Ok(Self {
            buf: Buffer::new(storage)?,
        })
    }

    /// Wrap an existing buffer.
    pub fn from_buffer(buf: Buffer<'a>) -> Self {
        Self { buf }
    }

    /// The request bytes built so far.
    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    /// Number of request bytes built so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Release the underlying buffer.
    pub fn into_buffer(self) -> Buffer<'a> {
        self.buf
    }

    /// Start a new request: reset the buffer and write
    /// `METHOD SP PATH SP VERSION CRLF`.
    ///
    /// # Errors
    ///
    /// * [`Error::NullArgument`] if `path` is empty
    /// * [`Error::BufferOverflow`] if the line does not fit; the buffer is left empty
    pub fn init_request_line(
        &mut self,
        method: Method,
        path: &str,
        version: Version,
    ) -> Result<usize, Error> {
        if path.is_empty() {
            return Err(Error::NullArgument);
        }
        self.buf.reset();
        self.buf.transaction(|b| {
            write!(b, "{} {} {}\r\n", method.as_str(), path, version.as_str())
                .map_err(|_| Error::BufferOverflow)
        })
    }

    /// Append a `Name: Value CRLF` header line.
    ///
    /// Headers are written in call order; duplicates are not merged.
    pub fn append_header(&mut self, name: &str, value: &str) -> Result<usize, Error> {
        self.append_header_n(name, value.as_bytes(), value.len())
    }

    /// Append a header whose value is the first `value_len` bytes of `value`.
    ///
    /// # Errors
    ///
    /// * [`Error::NullArgument`] if `name` is empty
    /// * [`Error::InvalidParameter`] if `value_len` exceeds `value`
    /// * [`Error::BufferOverflow`] if the line does not fit; nothing is committed
    pub fn append_header_n(
        &mut self,
        name: &str,
        value: &[u8],
        value_len: usize,
    ) -> Result<usize, Error> {
        if name.is_empty() {
            return Err(Error::NullArgument);
        }
        let value = value.get(..value_len).ok_or(Error::InvalidParameter)?;
        self.buf.transaction(|b| {
            b.append_str(name)?;
            b.append(b": ")?;
            b.append(value)?;
            b.append(b"\r\n")?;
            Ok(())
        })
    }

    /// Terminate the header block with a blank line and append `body`.
    ///
    /// A missing body is the same as an empty one.
    pub fn append_body(&mut self, body: Option<&[u8]>) -> Result<usize, Error> {
        let body = body.unwrap_or_default();
        self.buf.transaction(|b| {
            b.append(b"\r\n")?;
            b.append(body)?;
            Ok(())
        })
    }

    /// Build a complete request in one call.
    ///
    /// Returns the total request length. Building starts from an empty buffer,
    /// so on failure the buffer is left empty rather than holding half a request.
    ///
    /// # Errors
    ///
    /// * [`Error::NullArgument`] if `path`, `host` or `user_agent` is empty
    /// * [`Error::BufferOverflow`] if the request does not fit
    pub fn create(&mut self, request: &Request<'_>) -> Result<usize, Error> {
        if request.host.is_empty() || request.user_agent.is_empty() {
            return Err(Error::NullArgument);
        }

        let result = self.write_request(request);
        if result.is_err() {
            self.buf.reset();
        }
        result
    }

    fn write_request(&mut self, request: &Request<'_>) -> Result<usize, Error> {
        self.init_request_line(request.method, request.path, request.version)?;
        self.append_header(HEADER_USER_AGENT, request.user_agent)?;
        self.append_header_n(HEADER_HOST, request.host, request.host.len())?;
        self.append_header(HEADER_ACCEPT, "*/*")?;
        if let Some(content_type) = request.content_type {
            self.append_header(HEADER_CONTENT_TYPE, content_type)?;
        }
        // identity only: the device never decompresses
        self.append_header(HEADER_ACCEPT_ENCODING, "identity")?;

        let body = request.body.unwrap_or_default();
        if !body.is_empty() {
            let mut len_str: heapless::String<20> = heapless::String::new();
            write!(len_str, "{}", body.len()).map_err(|_| Error::BufferOverflow)?;
            self.append_header(HEADER_CONTENT_LENGTH, &len_str)?;
        }
        self.append_body(Some(body))?;
        Ok(self.buf.len())
    }

    /// Build a `POST` of a URL-encoded form, as sent to the device
    /// authentication endpoint.
    ///
    /// Uses `HTTP/1.0`, [`DEFAULT_USER_AGENT`] and [`CONTENT_FORM_URLENCODED`].
    pub fn create_post_request(
        &mut self,
        path: &str,
        host: &[u8],
        body: Option<&[u8]>,
    ) -> Result<usize, Error> {
        self.create(&Request {
            method: Method::Post,
            path,
            version: Version::Http10,
            host,
            user_agent: DEFAULT_USER_AGENT,
            content_type: Some(CONTENT_FORM_URLENCODED),
            body,
        })
    }
}
