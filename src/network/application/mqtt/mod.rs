//! MQTT 3.1.1 protocol implementation for embedded systems.
//!
//! This is the publish/subscribe transport used by the
//! [`session`](crate::session) wrapper. It runs over any
//! [`Connection`](crate::network::Connection) and keeps all packet
//! assembly in fixed-size `heapless` buffers.
//!
//! # Key Features
//!
//! - CONNECT with client id, user name, password, keep-alive and clean session
//! - PUBLISH at QoS 0, 1 and 2, with retained flag
//! - SUBSCRIBE with a handler per topic filter (`+` and `#` wildcards)
//! - UNSUBSCRIBE and DISCONNECT
//! - Non-blocking [`Client::yield_now`] that drains and dispatches inbound messages
//!
//! # Usage
//!
//! ```rust,no_run
//! use iotsuite::network::application::mqtt::{Client, Message, Options, PublishPacket, QoS, PROTOCOL_LEVEL};
//! # use iotsuite::network::Connection;
//! # struct MockConnection;
//! # impl Connection for MockConnection {}
//! # impl iotsuite::network::Read for MockConnection {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl iotsuite::network::Write for MockConnection {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl iotsuite::network::Close for MockConnection {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//!
//! fn on_command(packet: &PublishPacket) {
//!     let _ = packet.payload.len();
//! }
//!
//! # fn run() -> Result<(), iotsuite::network::error::Error> {
//! let mut client = Client::new(MockConnection);
//! client.connect(&Options {
//!     client_id: "iot_device_123",
//!     username: None,
//!     password: None,
//!     keep_alive_seconds: 60,
//!     clean_session: true,
//!     protocol_level: PROTOCOL_LEVEL,
//! })?;
//! client.subscribe("commands/+", QoS::AtMostOnce, on_command)?;
//! client.publish("status", &Message { payload: b"online", qos: QoS::AtMostOnce, retained: false })?;
//! client.yield_now()?;
//! # Ok(())
//! # }
//! ```

/// MQTT client implementation and supporting types.
pub mod client;

pub use client::{
    Client, MAX_PAYLOAD_LEN, MAX_SUBSCRIPTIONS, MAX_TOPIC_LEN, Message, MessageHandler, Options,
    PROTOCOL_LEVEL, PublishPacket, QoS, topic_matches,
};
