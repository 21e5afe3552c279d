use iotsuite::buffer::{Buffer, Error};
use iotsuite::network::application::http::{Client, HttpRequest, Method, Request, Version};
use iotsuite::network::error::Error as NetworkError;
use iotsuite::network::prelude::*;

/// Accepts at most `chunk` bytes per write, like a socket with a small send window.
#[derive(Debug, Default)]
struct MockConnection {
    written: Vec<u8>,
    chunk: usize,
    flushed: bool,
    broken: bool,
}

impl Read for MockConnection {
    type Error = NetworkError;
    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }
}

impl Write for MockConnection {
    type Error = NetworkError;
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.broken {
            return Err(NetworkError::WriteError);
        }
        let n = buf.len().min(self.chunk);
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushed = true;
        Ok(())
    }
}

impl Close for MockConnection {
    type Error = NetworkError;
    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Connection for MockConnection {}

#[test]
fn test_sequential_request_layout() {
    let mut storage = [0u8; 128];
    let mut request = HttpRequest::new(&mut storage).unwrap();

    assert_eq!(
        request.init_request_line(Method::Post, "/auth", Version::Http10),
        Ok(21)
    );
    assert_eq!(request.append_header("Host", "example.com"), Ok(19));
    assert_eq!(request.append_body(Some(b"a=1")), Ok(5));
    assert_eq!(
        request.as_bytes(),
        b"POST /auth HTTP/1.0\r\nHost: example.com\r\n\r\na=1"
    );
}

#[test]
fn test_missing_body_is_empty_body() {
    let mut storage = [0u8; 64];
    let mut request = HttpRequest::new(&mut storage).unwrap();
    request
        .init_request_line(Method::Get, "/status", Version::Http11)
        .unwrap();
    assert_eq!(request.append_body(None), Ok(2));
    assert_eq!(request.as_bytes(), b"GET /status HTTP/1.1\r\n\r\n");
}

#[test]
fn test_headers_keep_call_order_and_duplicates() {
    let mut storage = [0u8; 128];
    let mut request = HttpRequest::new(&mut storage).unwrap();
    request
        .init_request_line(Method::Get, "/", Version::Http11)
        .unwrap();
    request.append_header("X-B", "2").unwrap();
    request.append_header("X-A", "1").unwrap();
    request.append_header("X-B", "3").unwrap();
    request.append_body(None).unwrap();
    assert_eq!(
        request.as_bytes(),
        b"GET / HTTP/1.1\r\nX-B: 2\r\nX-A: 1\r\nX-B: 3\r\n\r\n"
    );
}

#[test]
fn test_header_overflow_leaves_offset() {
    let mut storage = [0u8; 5];
    let mut request = HttpRequest::new(&mut storage).unwrap();
    assert_eq!(
        request.append_header("X", "0123456789"),
        Err(Error::BufferOverflow)
    );
    assert_eq!(request.len(), 0);
}

#[test]
fn test_failed_step_keeps_earlier_steps() {
    let mut storage = [0u8; 32];
    let mut request = HttpRequest::new(&mut storage).unwrap();
    request
        .init_request_line(Method::Get, "/", Version::Http10)
        .unwrap();
    let before = request.len();
    assert_eq!(
        request.append_header("X-Long", "this value will not fit at all"),
        Err(Error::BufferOverflow)
    );
    assert_eq!(request.len(), before);
    assert_eq!(request.append_body(Some(b"this body is too long to fit")), Err(Error::BufferOverflow));
    assert_eq!(request.as_bytes(), b"GET / HTTP/1.0\r\n");
}

#[test]
fn test_init_resets_previous_request() {
    let mut storage = [0u8; 64];
    let mut request = HttpRequest::new(&mut storage).unwrap();
    request
        .init_request_line(Method::Get, "/one", Version::Http10)
        .unwrap();
    request.append_header("A", "1").unwrap();
    request
        .init_request_line(Method::Delete, "/two", Version::Http11)
        .unwrap();
    assert_eq!(request.as_bytes(), b"DELETE /two HTTP/1.1\r\n");
}

#[test]
fn test_request_line_overflow_leaves_request_empty() {
    let mut storage = [0u8; 24];
    let mut request = HttpRequest::new(&mut storage).unwrap();
    request
        .init_request_line(Method::Get, "/", Version::Http10)
        .unwrap();
    request.append_header("A", "1").unwrap();
    assert_eq!(
        request.init_request_line(Method::Get, "/a/path/that/is/too/long", Version::Http10),
        Err(Error::BufferOverflow)
    );
    assert!(request.is_empty());
}

#[test]
fn test_argument_checks() {
    let mut storage = [0u8; 64];
    let mut request = HttpRequest::new(&mut storage).unwrap();
    assert_eq!(
        request.init_request_line(Method::Get, "", Version::Http10),
        Err(Error::NullArgument)
    );
    assert_eq!(request.append_header("", "v"), Err(Error::NullArgument));
    assert_eq!(
        request.append_header_n("Host", b"abc", 4),
        Err(Error::InvalidParameter)
    );
}

#[test]
fn test_length_bounded_header() {
    let url_host = b"example.com:8080/path";
    let mut storage = [0u8; 64];
    let mut request = HttpRequest::new(&mut storage).unwrap();
    request
        .init_request_line(Method::Get, "/", Version::Http10)
        .unwrap();
    request.append_header_n("Host", url_host, 11).unwrap();
    assert!(request.as_bytes().ends_with(b"Host: example.com\r\n"));
}

#[test]
fn test_composite_request_without_body() {
    let mut storage = [0u8; 256];
    let mut request = HttpRequest::new(&mut storage).unwrap();
    let n = request
        .create(&Request {
            method: Method::Get,
            path: "/time",
            version: Version::Http11,
            host: b"example.com",
            user_agent: "iotclient/1.0",
            content_type: None,
            body: None,
        })
        .unwrap();
    let expected: &[u8] = b"GET /time HTTP/1.1\r\n\
User-Agent: iotclient/1.0\r\n\
Host: example.com\r\n\
Accept: */*\r\n\
Accept-Encoding: identity\r\n\
\r\n";
    assert_eq!(request.as_bytes(), expected);
    assert_eq!(n, expected.len());
}

#[test]
fn test_empty_body_has_no_content_length() {
    let mut storage = [0u8; 256];
    let mut request = HttpRequest::new(&mut storage).unwrap();
    request
        .create(&Request {
            method: Method::Post,
            path: "/x",
            version: Version::Http10,
            host: b"h",
            user_agent: "ua",
            content_type: Some("text/plain"),
            body: Some(b""),
        })
        .unwrap();
    assert!(!request.as_bytes().windows(14).any(|w| w == b"Content-Length"));
    assert!(request.as_bytes().ends_with(b"Accept-Encoding: identity\r\n\r\n"));
}

#[test]
fn test_post_request_layout() {
    let mut storage = [0u8; 256];
    let mut request = HttpRequest::new(&mut storage).unwrap();
    request
        .create_post_request("/auth", b"example.com", Some(b"a=1"))
        .unwrap();
    let expected: &[u8] = b"POST /auth HTTP/1.0\r\n\
User-Agent: iotclient/1.0\r\n\
Host: example.com\r\n\
Accept: */*\r\n\
Content-Type: application/x-www-form-urlencoded\r\n\
Accept-Encoding: identity\r\n\
Content-Length: 3\r\n\
\r\n\
a=1";
    assert_eq!(request.as_bytes(), expected);
}

#[test]
fn test_composite_overflow_leaves_request_empty() {
    let mut storage = [0u8; 64];
    let mut request = HttpRequest::new(&mut storage).unwrap();
    assert_eq!(
        request.create_post_request("/auth", b"example.com", Some(b"a=1")),
        Err(Error::BufferOverflow)
    );
    assert!(request.is_empty());
}

#[test]
fn test_composite_requires_host() {
    let mut storage = [0u8; 256];
    let mut request = HttpRequest::new(&mut storage).unwrap();
    assert_eq!(
        request.create_post_request("/auth", b"", None),
        Err(Error::NullArgument)
    );
}

#[test]
fn test_request_over_partial_buffer() {
    let mut storage = [0u8; 64];
    let buf = Buffer::with_capacity(&mut storage, 16).unwrap();
    let mut request = HttpRequest::from_buffer(buf);
    assert_eq!(
        request.init_request_line(Method::Get, "/", Version::Http10),
        Ok(16)
    );
    assert_eq!(request.append_body(None), Err(Error::BufferOverflow));
    assert_eq!(request.into_buffer().remaining(), 0);
}

#[test]
fn test_client_sends_in_chunks() {
    let mut storage = [0u8; 256];
    let mut request = HttpRequest::new(&mut storage).unwrap();
    request
        .create_post_request("/auth", b"example.com", Some(b"a=1"))
        .unwrap();

    let mut client = Client::new(MockConnection {
        chunk: 7,
        ..Default::default()
    });
    assert_eq!(client.send(&request), Ok(request.len()));
    let connection = client.into_inner();
    assert_eq!(connection.written, request.as_bytes());
    assert!(connection.flushed);
}

#[test]
fn test_client_errors() {
    let mut storage = [0u8; 64];
    let mut request = HttpRequest::new(&mut storage).unwrap();

    let mut client = Client::new(MockConnection {
        chunk: 64,
        ..Default::default()
    });
    assert_eq!(client.send(&request), Err(NetworkError::ProtocolError));

    request
        .init_request_line(Method::Get, "/", Version::Http10)
        .unwrap();
    client.connection_mut().broken = true;
    assert_eq!(client.send(&request), Err(NetworkError::WriteError));

    let mut stalled = Client::new(MockConnection::default());
    assert_eq!(stalled.send(&request), Err(NetworkError::WriteError));
}

#[cfg(feature = "async")]
mod async_tests {
    use super::*;
    use futures::executor::block_on;
    use iotsuite::network::application::http::AsyncClient;
    use iotsuite::network::{AsyncClose, AsyncConnection, AsyncRead, AsyncWrite};

    impl AsyncRead for MockConnection {
        type Error = NetworkError;
        async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            Read::read(self, buf)
        }
    }

    impl AsyncWrite for MockConnection {
        type Error = NetworkError;
        async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            Write::write(self, buf)
        }
        async fn flush(&mut self) -> Result<(), Self::Error> {
            Write::flush(self)
        }
    }

    impl AsyncClose for MockConnection {
        type Error = NetworkError;
        async fn close(self) -> Result<(), Self::Error> {
            Close::close(self)
        }
    }

    impl AsyncConnection for MockConnection {}

    #[test]
    fn test_async_send() {
        let mut storage = [0u8; 256];
        let mut request = HttpRequest::new(&mut storage).unwrap();
        request
            .create_post_request("/auth", b"example.com", Some(b"a=1"))
            .unwrap();

        block_on(async {
            let mut client = AsyncClient::new(MockConnection {
                chunk: 5,
                ..Default::default()
            });
            assert_eq!(client.send(&request).await, Ok(request.len()));
            let connection = client.into_inner();
            assert_eq!(connection.written, request.as_bytes());
        });
    }
}
