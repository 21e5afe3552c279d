//! # Device session
//!
//! A thin wrapper that opens a publish/subscribe session from a
//! [`DeviceConfig`] and forwards the session operations to a [`Transport`].
//! It holds no protocol state of its own.
//!
//! The result of the transport's connect is returned to the caller as is: a
//! refused or failed connect is an error, never a quiet success.
//!
//! ```rust,no_run
//! use iotsuite::network::application::mqtt::{Client, Message, PublishPacket, QoS};
//! use iotsuite::session::{DeviceConfig, Session};
//! # use iotsuite::network::Connection;
//! # struct TcpConnection;
//! # impl Connection for TcpConnection {}
//! # impl iotsuite::network::Read for TcpConnection {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl iotsuite::network::Write for TcpConnection {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl iotsuite::network::Close for TcpConnection {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//!
//! fn on_control(_packet: &PublishPacket) {}
//!
//! # fn run(config: &DeviceConfig<'_>) -> Result<(), iotsuite::network::error::Error> {
//! let mut session = Session::connect(Client::new(TcpConnection), config)?;
//! session.subscribe("PRODX/sensor-a/control", QoS::AtLeastOnce, on_control)?;
//! session.publish(
//!     "PRODX/sensor-a/update",
//!     &Message { payload: br#"{"temp":21}"#, qos: QoS::AtMostOnce, retained: false },
//! )?;
//! loop {
//!     session.yield_now()?;
//! }
//! # }
//! ```

/// Device configuration.
pub mod config;

pub use config::{ConfigError, DEFAULT_KEEP_ALIVE_SECONDS, DeviceConfig, DeviceInfo};

use crate::network::Connection;
use crate::network::application::mqtt::{self, Message, MessageHandler, Options, QoS};
use crate::network::error::Error as NetworkError;

/// Publish/subscribe operations a session needs from its transport.
pub trait Transport {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open the session.
    fn connect(&mut self, options: &Options<'_>) -> Result<(), Self::Error>;
    /// Whether the session is open.
    fn is_connected(&self) -> bool;
    /// Publish `message` on `topic`.
    fn publish(&mut self, topic: &str, message: &Message<'_>) -> Result<(), Self::Error>;
    /// Subscribe to `topic_filter`, routing matches to `handler`.
    fn subscribe(
        &mut self,
        topic_filter: &str,
        qos: QoS,
        handler: MessageHandler,
    ) -> Result<(), Self::Error>;
    /// Cancel a subscription.
    fn unsubscribe(&mut self, topic_filter: &str) -> Result<(), Self::Error>;
    /// Close the session.
    fn disconnect(&mut self) -> Result<(), Self::Error>;
    /// Process pending inbound traffic; returns the number of messages delivered.
    fn yield_now(&mut self) -> Result<usize, Self::Error>;
    /// Keep an idle session alive.
    fn ping(&mut self) -> Result<(), Self::Error>;
}

impl<C: Connection> Transport for mqtt::Client<C> {
    type Error = NetworkError;

    fn connect(&mut self, options: &Options<'_>) -> Result<(), Self::Error> {
        mqtt::Client::connect(self, options)
    }

    fn is_connected(&self) -> bool {
        mqtt::Client::is_connected(self)
    }

    fn publish(&mut self, topic: &str, message: &Message<'_>) -> Result<(), Self::Error> {
        mqtt::Client::publish(self, topic, message)
    }

    fn subscribe(
        &mut self,
        topic_filter: &str,
        qos: QoS,
        handler: MessageHandler,
    ) -> Result<(), Self::Error> {
        mqtt::Client::subscribe(self, topic_filter, qos, handler)
    }

    fn unsubscribe(&mut self, topic_filter: &str) -> Result<(), Self::Error> {
        mqtt::Client::unsubscribe(self, topic_filter)
    }

    fn disconnect(&mut self) -> Result<(), Self::Error> {
        mqtt::Client::disconnect(self)
    }

    fn yield_now(&mut self) -> Result<usize, Self::Error> {
        mqtt::Client::yield_now(self)
    }

    fn ping(&mut self) -> Result<(), Self::Error> {
        mqtt::Client::ping(self)
    }
}

/// An open device session over transport `T`.
#[derive(Debug)]
pub struct Session<T: Transport> {
    transport: T,
}

impl<T: Transport> Session<T> {
    /// Connect `transport` with the parameters derived from `config`.
    ///
    /// # Errors
    ///
    /// Whatever the transport's connect reports.
    pub fn connect(mut transport: T, config: &DeviceConfig<'_>) -> Result<Self, T::Error> {
        match transport.connect(&config.connect_options()) {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("mqtt client connect {}:{} success", config.host, config.port);
                Ok(Self { transport })
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::error!(
                    "mqtt client connect {}:{} failed: {}",
                    config.host,
                    config.port,
                    defmt::Debug2Format(&e)
                );
                Err(e)
            }
        }
    }

    /// Whether the transport reports the session as open.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Publish `message` on `topic`.
    pub fn publish(&mut self, topic: &str, message: &Message<'_>) -> Result<(), T::Error> {
        self.transport.publish(topic, message)
    }

    /// Subscribe to `topic_filter`.
    pub fn subscribe(
        &mut self,
        topic_filter: &str,
        qos: QoS,
        handler: MessageHandler,
    ) -> Result<(), T::Error> {
        self.transport.subscribe(topic_filter, qos, handler)
    }

    /// Cancel a subscription.
    pub fn unsubscribe(&mut self, topic_filter: &str) -> Result<(), T::Error> {
        self.transport.unsubscribe(topic_filter)
    }

    /// Close the session.
    pub fn disconnect(&mut self) -> Result<(), T::Error> {
        self.transport.disconnect()
    }

    /// Deliver pending inbound messages to their handlers.
    pub fn yield_now(&mut self) -> Result<usize, T::Error> {
        self.transport.yield_now()
    }

    /// Send a keep-alive ping. Call at least once per keep-alive interval
    /// when the session is otherwise idle.
    pub fn ping(&mut self) -> Result<(), T::Error> {
        self.transport.ping()
    }

    /// Get the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give the transport back.
    pub fn into_inner(self) -> T {
        self.transport
    }
}
