//! # iotsuite - device-side request signing for embedded IoT clients
//!
//! Builds the messages an IoT device sends to authenticate with its cloud and
//! opens the device's publish/subscribe session, under strict memory limits:
//! no heap allocation, caller-owned storage, and no write ever past the end
//! of a buffer.
//!
//! ## Components
//!
//! - **[`buffer`]**: fixed-capacity append-only [`Buffer`](buffer::Buffer) all builders write through
//! - **[`encoding`]**: percent-encoding and URL-encoded `key=value` fields
//! - **[`network::application::http`]**: sequential HTTP request builder and delivery client
//! - **[`auth`]**: canonical-string HMAC-SHA256 signer and signed auth form builder
//! - **[`network::application::mqtt`]**: MQTT 3.1.1 transport client
//! - **[`session`]**: device configuration and the session wrapper over a transport
//!
//! ## Data flow
//!
//! ```text
//! SigningInput ─▶ compute_signature ─▶ create_auth_request_form ─▶ HttpRequest ─▶ Connection
//! ```
//!
//! ## Example
//!
//! ```rust
//! use iotsuite::auth::{create_auth_request, SigningInput};
//! use iotsuite::network::application::http::HttpRequest;
//!
//! let input = SigningInput {
//!     secret: b"s3cr3t",
//!     client_id: "dev01",
//!     device_name: "sensor-a",
//!     product_id: "PRODX",
//!     expire: 3600,
//!     nonce: 42,
//!     timestamp: 1_000_000_000,
//! };
//!
//! let mut request_storage = [0u8; 512];
//! let mut form_storage = [0u8; 256];
//! let mut request = HttpRequest::new(&mut request_storage).unwrap();
//! create_auth_request(&mut request, &mut form_storage, b"auth.example.com", "/device/auth", &input)
//!     .unwrap();
//!
//! assert!(request.as_bytes().starts_with(b"POST /device/auth HTTP/1.0\r\n"));
//! ```
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `async`: Async transport traits and [`AsyncClient`](network::application::http::AsyncClient)
//! - `defmt`: defmt formatting for error types and log output

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Bounded write buffer over caller-owned storage.
pub mod buffer;

/// Percent-encoding and URL-encoded form fields.
pub mod encoding;

/// Device authentication signatures and signed request forms.
pub mod auth;

/// Transport traits and application protocols (HTTP, MQTT).
pub mod network;

/// Device configuration and publish/subscribe session wrapper.
pub mod session;
