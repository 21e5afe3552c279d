//! An MQTT client implementation based on the MQTT 3.1.1 specification.
use crate::network::error::Error;
use crate::network::Connection;
use heapless::{String, Vec};

// MQTT Control Packet types - these are the fixed header packet type values
/// MQTT CONNECT packet type identifier.
const CONNECT: u8 = 0x10;
/// MQTT CONNACK packet type identifier.
const CONNACK: u8 = 0x20;
/// MQTT PUBLISH packet type identifier.
const PUBLISH: u8 = 0x30;
/// MQTT PUBACK packet type identifier.
const PUBACK: u8 = 0x40;
/// MQTT PUBREC packet type identifier.
const PUBREC: u8 = 0x50;
/// MQTT PUBREL packet type identifier (with its mandatory flags).
const PUBREL: u8 = 0x62;
/// MQTT PUBCOMP packet type identifier.
const PUBCOMP: u8 = 0x70;
/// MQTT SUBSCRIBE packet type identifier.
const SUBSCRIBE: u8 = 0x82;
/// MQTT SUBACK packet type identifier.
const SUBACK: u8 = 0x90;
/// MQTT UNSUBSCRIBE packet type identifier.
const UNSUBSCRIBE: u8 = 0xA2;
/// MQTT UNSUBACK packet type identifier.
const UNSUBACK: u8 = 0xB0;
/// MQTT DISCONNECT packet type identifier.
const DISCONNECT: u8 = 0xE0;
/// MQTT PINGREQ packet type identifier.
const PINGREQ: u8 = 0xC0;
/// MQTT PINGRESP packet type identifier.
const PINGRESP: u8 = 0xD0;

// Protocol constants defined by MQTT 3.1.1 specification
/// MQTT protocol name for the CONNECT variable header.
const PROTOCOL_NAME: &[u8] = b"MQTT";
/// MQTT protocol level for version 3.1.1.
pub const PROTOCOL_LEVEL: u8 = 4;

/// Longest topic name or filter the client handles.
pub const MAX_TOPIC_LEN: usize = 256;
/// Largest publish payload the client handles.
pub const MAX_PAYLOAD_LEN: usize = 1024;
/// Number of topic filters that can have a handler at once.
pub const MAX_SUBSCRIPTIONS: usize = 8;

/// Topic length prefix, packet identifier, topic and payload.
const PACKET_CAPACITY: usize = 4 + MAX_TOPIC_LEN + MAX_PAYLOAD_LEN;

/// An incoming MQTT publish message.
///
/// This structure represents a message received from the MQTT broker when
/// subscribed to one or more topics.
///
/// ```rust
/// use iotsuite::network::application::mqtt::{PublishPacket, QoS};
/// use heapless::{String, Vec};
///
/// let packet = PublishPacket {
///     topic: String::try_from("sensors/temperature").unwrap(),
///     payload: Vec::from_slice(b"23.5").unwrap(),
///     qos: QoS::AtMostOnce,
///     retained: false,
/// };
///
/// assert_eq!(packet.topic.as_str(), "sensors/temperature");
/// assert_eq!(&packet.payload[..], b"23.5");
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PublishPacket {
    /// The topic on which the message was published.
    pub topic: String<MAX_TOPIC_LEN>,
    /// The message payload data.
    pub payload: Vec<u8, MAX_PAYLOAD_LEN>,
    /// Delivery guarantee the message arrived with.
    pub qos: QoS,
    /// Whether the broker delivered this as a retained message.
    pub retained: bool,
}

/// An outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message<'a> {
    /// The message payload.
    pub payload: &'a [u8],
    /// Delivery guarantee to request.
    pub qos: QoS,
    /// Ask the broker to keep this as the topic's retained message.
    pub retained: bool,
}

/// Callback invoked for each incoming message matching a subscription.
pub type MessageHandler = fn(&PublishPacket);

/// Quality of Service levels for MQTT messages.
///
/// ```rust
/// use iotsuite::network::application::mqtt::QoS;
///
/// assert_eq!(QoS::AtMostOnce as u8, 0);
/// assert_eq!(QoS::AtLeastOnce as u8, 1);
/// assert_eq!(QoS::ExactlyOnce as u8, 2);
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum QoS {
    /// **QoS 0**: At most once delivery.
    AtMostOnce = 0,
    /// **QoS 1**: At least once delivery.
    AtLeastOnce = 1,
    /// **QoS 2**: Exactly once delivery.
    ExactlyOnce = 2,
}

impl QoS {
    fn from_bits(bits: u8) -> Result<Self, Error> {
        match bits {
            0 => Ok(QoS::AtMostOnce),
            1 => Ok(QoS::AtLeastOnce),
            2 => Ok(QoS::ExactlyOnce),
            _ => Err(Error::ProtocolError),
        }
    }
}

/// Configuration options for MQTT client connection.
///
/// ```rust
/// use iotsuite::network::application::mqtt::{Options, PROTOCOL_LEVEL};
///
/// let options = Options {
///     client_id: "my_iot_device",
///     username: Some("product;device"),
///     password: Some("token"),
///     keep_alive_seconds: 60,
///     clean_session: true,
///     protocol_level: PROTOCOL_LEVEL,
/// };
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Options<'a> {
    /// The client identifier, must be unique within the broker.
    pub client_id: &'a str,
    /// Optional user name.
    pub username: Option<&'a str>,
    /// Optional password. MQTT 3.1.1 only allows it together with a user name.
    pub password: Option<&'a str>,
    /// The keep-alive time interval in seconds. A value of 0 disables keep-alive.
    pub keep_alive_seconds: u16,
    /// Whether to start a clean session.
    ///
    /// - `true`: The broker will discard any previous session state and start fresh
    /// - `false`: The broker will resume the previous session if one exists
    pub clean_session: bool,
    /// Protocol level sent in CONNECT. Only [`PROTOCOL_LEVEL`] is supported.
    pub protocol_level: u8,
}

#[derive(Debug, Clone)]
struct Subscription {
    filter: String<MAX_TOPIC_LEN>,
    handler: MessageHandler,
}

/// An MQTT 3.1.1 client for publish-subscribe messaging.
///
/// The client is created unconnected over any [`Connection`]; call
/// [`connect`](Client::connect) to perform the handshake.
#[derive(Debug)]
pub struct Client<C: Connection> {
    connection: C,
    is_connected: bool,
    next_packet_id: u16,
    ping_outstanding: bool,
    subscriptions: Vec<Subscription, MAX_SUBSCRIPTIONS>,
}

impl<C: Connection> Client<C> {
    /// Wrap a connection to an MQTT broker.
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            is_connected: false,
            next_packet_id: 1,
            ping_outstanding: false,
            subscriptions: Vec::new(),
        }
    }

    /// Establish an MQTT session with the broker.
    ///
    /// Sends a CONNECT packet and waits for the CONNACK response.
    ///
    /// # Errors
    ///
    /// * [`Error::ProtocolError`] - Unsupported protocol level, password without
    ///   user name, or an invalid CONNACK
    /// * [`Error::BufferOverflow`] - Credentials too long for the packet buffer
    /// * [`Error::WriteError`] / [`Error::ReadError`] - Transport failure
    /// * [`Error::ConnectionClosed`] - Connection closed during handshake
    /// * [`Error::ConnectionRefused`] - Broker refused the connection
    pub fn connect(&mut self, options: &Options<'_>) -> Result<(), Error> {
        if options.protocol_level != PROTOCOL_LEVEL {
            return Err(Error::ProtocolError);
        }
        if options.password.is_some() && options.username.is_none() {
            return Err(Error::ProtocolError);
        }

        let mut connect_flags = 0u8;
        if options.clean_session {
            connect_flags |= 0x02;
        }
        if options.username.is_some() {
            connect_flags |= 0x80;
        }
        if options.password.is_some() {
            connect_flags |= 0x40;
        }

        let mut packet: Vec<u8, 512> = Vec::new();
        // --- Variable Header ---
        push_bytes(&mut packet, PROTOCOL_NAME)?;
        push_raw(&mut packet, &[options.protocol_level, connect_flags])?;
        push_raw(&mut packet, &options.keep_alive_seconds.to_be_bytes())?;
        // --- Payload ---
        push_bytes(&mut packet, options.client_id.as_bytes())?;
        if let Some(username) = options.username {
            push_bytes(&mut packet, username.as_bytes())?;
        }
        if let Some(password) = options.password {
            push_bytes(&mut packet, password.as_bytes())?;
        }

        self.send_packet(CONNECT, &packet)?;

        let mut connack = [0u8; 4];
        self.read_exact(&mut connack)?;
        if connack[0] != CONNACK || connack[1] != 2 {
            return Err(Error::ProtocolError);
        }

        // Check connection acknowledgement status
        match connack[3] {
            0 => {
                self.is_connected = true;
                self.ping_outstanding = false;
                Ok(())
            }
            1..=5 => {
                #[cfg(feature = "defmt")]
                defmt::warn!("mqtt broker refused connection, code {}", connack[3]);
                Err(Error::ConnectionRefused)
            }
            _ => Err(Error::ProtocolError),
        }
    }

    /// Whether the CONNECT handshake succeeded and no DISCONNECT was sent since.
    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    /// Publish a message to a topic.
    ///
    /// QoS 1 and 2 messages block until the broker's acknowledgement
    /// (PUBACK, or the PUBREC/PUBREL/PUBCOMP exchange) completes.
    ///
    /// # Errors
    ///
    /// * [`Error::NotOpen`] - Not connected
    /// * [`Error::BufferOverflow`] - Topic or payload too large
    /// * [`Error::ProtocolError`] - Unexpected acknowledgement
    pub fn publish(&mut self, topic: &str, message: &Message<'_>) -> Result<(), Error> {
        self.ensure_connected()?;
        if topic.is_empty() || topic.len() > MAX_TOPIC_LEN {
            return Err(Error::ProtocolError);
        }

        let mut packet: Vec<u8, PACKET_CAPACITY> = Vec::new();
        push_bytes(&mut packet, topic.as_bytes())?;
        let packet_id = match message.qos {
            QoS::AtMostOnce => None,
            _ => {
                let id = self.take_packet_id();
                push_raw(&mut packet, &id.to_be_bytes())?;
                Some(id)
            }
        };
        push_raw(&mut packet, message.payload)?;

        let mut header = PUBLISH | ((message.qos as u8) << 1);
        if message.retained {
            header |= 0x01;
        }
        self.send_packet(header, &packet)?;

        match (message.qos, packet_id) {
            (QoS::AtLeastOnce, Some(id)) => self.expect_ack(PUBACK, id),
            (QoS::ExactlyOnce, Some(id)) => {
                self.expect_ack(PUBREC, id)?;
                self.send_packet(PUBREL, &id.to_be_bytes())?;
                self.expect_ack(PUBCOMP, id)
            }
            _ => Ok(()),
        }
    }

    /// Subscribe to a topic filter and route matching messages to `handler`.
    ///
    /// Subscribing again to the same filter replaces its handler.
    ///
    /// # Errors
    ///
    /// * [`Error::NotOpen`] - Not connected
    /// * [`Error::BufferOverflow`] - Handler table full or filter too long
    /// * [`Error::ConnectionRefused`] - Broker rejected the subscription
    /// * [`Error::ProtocolError`] - Invalid SUBACK packet
    pub fn subscribe(
        &mut self,
        topic_filter: &str,
        qos: QoS,
        handler: MessageHandler,
    ) -> Result<(), Error> {
        self.ensure_connected()?;
        let filter = String::try_from(topic_filter).map_err(|_| Error::BufferOverflow)?;
        let existing = self
            .subscriptions
            .iter()
            .position(|s| s.filter.as_str() == topic_filter);
        if existing.is_none() && self.subscriptions.is_full() {
            return Err(Error::BufferOverflow);
        }

        let packet_id = self.take_packet_id();
        let mut packet: Vec<u8, PACKET_CAPACITY> = Vec::new();
        push_raw(&mut packet, &packet_id.to_be_bytes())?;
        push_bytes(&mut packet, topic_filter.as_bytes())?;
        push_raw(&mut packet, &[qos as u8])?;
        self.send_packet(SUBSCRIBE, &packet)?;

        let mut suback = [0u8; 5];
        self.read_exact(&mut suback)?;
        if suback[0] != SUBACK || suback[1] != 3 {
            return Err(Error::ProtocolError);
        }
        if u16::from_be_bytes([suback[2], suback[3]]) != packet_id {
            return Err(Error::ProtocolError);
        }
        if suback[4] == 0x80 {
            return Err(Error::ConnectionRefused);
        }

        match existing {
            Some(i) => self.subscriptions[i].handler = handler,
            None => self
                .subscriptions
                .push(Subscription { filter, handler })
                .map_err(|_| Error::BufferOverflow)?,
        }
        Ok(())
    }

    /// Cancel a subscription and drop its handler.
    pub fn unsubscribe(&mut self, topic_filter: &str) -> Result<(), Error> {
        self.ensure_connected()?;

        let packet_id = self.take_packet_id();
        let mut packet: Vec<u8, PACKET_CAPACITY> = Vec::new();
        push_raw(&mut packet, &packet_id.to_be_bytes())?;
        push_bytes(&mut packet, topic_filter.as_bytes())?;
        self.send_packet(UNSUBSCRIBE, &packet)?;
        self.expect_ack(UNSUBACK, packet_id)?;

        self.subscriptions.retain(|s| s.filter.as_str() != topic_filter);
        Ok(())
    }

    /// Send DISCONNECT. The client is considered disconnected even if the
    /// write fails.
    pub fn disconnect(&mut self) -> Result<(), Error> {
        self.ensure_connected()?;
        self.is_connected = false;
        self.send_packet(DISCONNECT, &[])
    }

    /// Send PINGREQ to keep the session alive.
    ///
    /// The broker drops a client that stays silent for 1.5 times the
    /// keep-alive interval, so call this at least once per interval when
    /// nothing else is being sent. The PINGRESP is consumed by
    /// [`poll`](Client::poll) and [`yield_now`](Client::yield_now).
    ///
    /// # Errors
    ///
    /// * [`Error::NotOpen`] - Not connected
    /// * [`Error::Timeout`] - The previous PINGREQ was never answered
    pub fn ping(&mut self) -> Result<(), Error> {
        self.ensure_connected()?;
        if self.ping_outstanding {
            return Err(Error::Timeout);
        }
        self.send_packet(PINGREQ, &[])?;
        self.ping_outstanding = true;
        Ok(())
    }

    /// Receive the next incoming PUBLISH, if one is pending.
    ///
    /// Acknowledgements required by the message's QoS are sent before it is
    /// returned. Non-PUBLISH packets are consumed and skipped.
    ///
    /// # Non-blocking Behavior
    ///
    /// Returns `Ok(None)` as soon as the connection reports no data.
    ///
    /// A packet larger than the client's buffers is read off the connection
    /// and dropped with [`Error::BufferOverflow`]; the next call continues with
    /// the packet after it.
    pub fn poll(&mut self) -> Result<Option<PublishPacket>, Error> {
        let mut body: Vec<u8, PACKET_CAPACITY> = Vec::new();
        loop {
            let Some(header) = self.read_packet(&mut body)? else {
                return Ok(None);
            };

            match header & 0xF0 {
                PUBLISH => return self.accept_publish(header, &body).map(Some),
                // second half of an inbound QoS 2 exchange
                0x60 if body.len() >= 2 => self.send_packet(PUBCOMP, &body[..2])?,
                PINGRESP => self.ping_outstanding = false,
                _ => {}
            }
        }
    }

    /// Deliver every pending incoming message to the handlers whose filter
    /// matches its topic. Returns the number of messages received.
    pub fn yield_now(&mut self) -> Result<usize, Error> {
        let mut received = 0;
        while let Some(packet) = self.poll()? {
            received += 1;
            for subscription in &self.subscriptions {
                if topic_matches(&subscription.filter, &packet.topic) {
                    (subscription.handler)(&packet);
                }
            }
        }
        Ok(received)
    }

    /// Get the underlying connection
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Get a mutable reference to the underlying connection
    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    fn ensure_connected(&self) -> Result<(), Error> {
        if self.is_connected {
            Ok(())
        } else {
            Err(Error::NotOpen)
        }
    }

    fn take_packet_id(&mut self) -> u16 {
        let id = self.next_packet_id;
        // packet identifiers are non-zero
        self.next_packet_id = self.next_packet_id.checked_add(1).unwrap_or(1);
        id
    }

    fn accept_publish(&mut self, header: u8, body: &[u8]) -> Result<PublishPacket, Error> {
        let qos = QoS::from_bits((header >> 1) & 0x03)?;
        let topic_len = u16::from_be_bytes([
            *body.first().ok_or(Error::ProtocolError)?,
            *body.get(1).ok_or(Error::ProtocolError)?,
        ]) as usize;
        let topic_bytes = body.get(2..2 + topic_len).ok_or(Error::ProtocolError)?;
        let topic = core::str::from_utf8(topic_bytes).map_err(|_| Error::ProtocolError)?;

        let mut payload_start = 2 + topic_len;
        if qos != QoS::AtMostOnce {
            let id = body
                .get(payload_start..payload_start + 2)
                .ok_or(Error::ProtocolError)?;
            let ack = if qos == QoS::AtLeastOnce { PUBACK } else { PUBREC };
            self.send_packet(ack, id)?;
            payload_start += 2;
        }

        Ok(PublishPacket {
            topic: String::try_from(topic).map_err(|_| Error::BufferOverflow)?,
            payload: Vec::from_slice(&body[payload_start..]).map_err(|_| Error::BufferOverflow)?,
            qos,
            retained: header & 0x01 != 0,
        })
    }

    /// Read one packet into `body`, returning its fixed header byte, or `None`
    /// if no data is pending.
    fn read_packet<const N: usize>(&mut self, body: &mut Vec<u8, N>) -> Result<Option<u8>, Error> {
        let mut header = [0u8; 1];
        match self.connection.read(&mut header) {
            Ok(0) => return Ok(None),
            Ok(_) => {}
            Err(_) => return Err(Error::ReadError),
        }

        let mut remaining_len = 0usize;
        let mut multiplier = 1usize;
        for i in 0..4 {
            let mut byte = [0u8; 1];
            self.read_exact(&mut byte)?;
            remaining_len += (byte[0] & 0x7F) as usize * multiplier;
            if byte[0] & 0x80 == 0 {
                break;
            }
            if i == 3 {
                return Err(Error::ProtocolError);
            }
            multiplier *= 128;
        }

        body.clear();
        if body.resize(remaining_len, 0).is_err() {
            // drop the body so the next read starts on a packet boundary
            self.discard(remaining_len)?;
            return Err(Error::BufferOverflow);
        }
        self.read_exact(body)?;
        Ok(Some(header[0]))
    }

    /// Read a 4-byte acknowledgement of type `kind` for `packet_id`.
    fn expect_ack(&mut self, kind: u8, packet_id: u16) -> Result<(), Error> {
        let mut ack = [0u8; 4];
        self.read_exact(&mut ack)?;
        if ack[0] != kind || ack[1] != 2 || u16::from_be_bytes([ack[2], ack[3]]) != packet_id {
            return Err(Error::ProtocolError);
        }
        Ok(())
    }

    fn send_packet(&mut self, header: u8, body: &[u8]) -> Result<(), Error> {
        let mut fixed_header: Vec<u8, 5> = Vec::new();
        fixed_header.push(header).map_err(|_| Error::BufferOverflow)?;
        encode_remaining_length(&mut fixed_header, body.len())?;

        self.write_all(&fixed_header)?;
        self.write_all(body)?;
        self.connection.flush().map_err(|_| Error::WriteError)
    }

    fn write_all(&mut self, mut bytes: &[u8]) -> Result<(), Error> {
        while !bytes.is_empty() {
            match self.connection.write(bytes) {
                Ok(0) => return Err(Error::WriteError),
                Ok(n) => bytes = &bytes[n..],
                Err(_) => return Err(Error::WriteError),
            }
        }
        Ok(())
    }

    fn discard(&mut self, mut len: usize) -> Result<(), Error> {
        let mut scratch = [0u8; 64];
        while len > 0 {
            let n = len.min(scratch.len());
            self.read_exact(&mut scratch[..n])?;
            len -= n;
        }
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        let mut total_read = 0;
        while total_read < buf.len() {
            match self.connection.read(&mut buf[total_read..]) {
                Ok(0) => return Err(Error::ConnectionClosed),
                Ok(n) => total_read += n,
                Err(_) => return Err(Error::ReadError),
            }
        }
        Ok(())
    }
}

/// Whether `topic` matches `filter`, honouring the `+` (one level) and `#`
/// (all remaining levels) wildcards.
///
/// Topics starting with `$` are not matched by a leading wildcard.
///
/// ```rust
/// use iotsuite::network::application::mqtt::topic_matches;
///
/// assert!(topic_matches("sensors/+/temperature", "sensors/room1/temperature"));
/// assert!(topic_matches("sensors/#", "sensors"));
/// assert!(!topic_matches("sensors/+", "sensors/room1/humidity"));
/// assert!(!topic_matches("#", "$SYS/uptime"));
/// ```
pub fn topic_matches(filter: &str, topic: &str) -> bool {
    if topic.starts_with('$') && (filter.starts_with('+') || filter.starts_with('#')) {
        return false;
    }

    let mut filter_levels = filter.split('/');
    let mut topic_levels = topic.split('/');
    loop {
        match (filter_levels.next(), topic_levels.next()) {
            (Some("#"), _) => return true,
            (Some("+"), Some(_)) => {}
            (Some(f), Some(t)) if f == t => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// Append a length-prefixed byte string.
fn push_bytes<const N: usize>(packet: &mut Vec<u8, N>, bytes: &[u8]) -> Result<(), Error> {
    let len = u16::try_from(bytes.len()).map_err(|_| Error::BufferOverflow)?;
    push_raw(packet, &len.to_be_bytes())?;
    push_raw(packet, bytes)
}

fn push_raw<const N: usize>(packet: &mut Vec<u8, N>, bytes: &[u8]) -> Result<(), Error> {
    packet
        .extend_from_slice(bytes)
        .map_err(|_| Error::BufferOverflow)
}

/// Encode the remaining length field for an MQTT packet.
///
/// The encoding uses up to 4 bytes where each byte encodes 7 bits of the length
/// value. The most significant bit indicates if another byte follows.
fn encode_remaining_length(buf: &mut Vec<u8, 5>, mut len: usize) -> Result<(), Error> {
    loop {
        let mut byte = (len % 128) as u8;
        len /= 128;
        if len > 0 {
            byte |= 0x80;
        }
        buf.push(byte).map_err(|_| Error::BufferOverflow)?;
        if len == 0 {
            break;
        }
    }
    Ok(())
}
