//! HTTP/1.x request construction for embedded systems.
//!
//! Requests are written sequentially into caller-owned storage through a
//! bounded [`Buffer`](crate::buffer::Buffer): request line, header lines,
//! then the blank line and body. No heap allocation takes place and a step
//! that runs out of space leaves the request as it was before that step.
//!
//! # Usage
//!
//! ```rust
//! use iotsuite::network::application::http::HttpRequest;
//!
//! let mut storage = [0u8; 256];
//! let mut request = HttpRequest::new(&mut storage).unwrap();
//! request
//!     .create_post_request("/device/auth", b"auth.example.com", Some(b"a=1"))
//!     .unwrap();
//!
//! assert!(request.as_bytes().starts_with(b"POST /device/auth HTTP/1.0\r\n"));
//! assert!(request.as_bytes().ends_with(b"Content-Length: 3\r\n\r\na=1"));
//! ```
//!
//! The finished bytes are handed to a transport with [`Client`].

/// Request builder.
pub mod request;

/// Delivery of built requests over a [`Connection`](crate::network::Connection).
pub mod client;

pub use client::Client;
#[cfg(feature = "async")]
pub use client::AsyncClient;
pub use request::{HttpRequest, Method, Request, Version};
