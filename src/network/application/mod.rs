//! # Application Layer Network Protocols
//!
//! - **[`http`]**: HTTP/1.x request construction into bounded buffers, and delivery
//! - **[`mqtt`]**: MQTT 3.1.1 client used as the session transport
//!
//! ## Design Principles
//!
//! - **Connection Agnostic**: Work with any type implementing [`Connection`](crate::network::Connection)
//! - **No-std Compatible**: No heap allocation; fixed-size buffers only
//! - **Fail Cleanly**: A failed write never leaves a half-built message behind

/// HTTP request builder and delivery client.
pub mod http;

/// MQTT client implementation.
pub mod mqtt;
