use crate::auth::SigningInput;
use crate::buffer;
use crate::network::application::mqtt::{Options, PROTOCOL_LEVEL};
use serde::Deserialize;

/// Keep-alive used when the configuration does not set one.
pub const DEFAULT_KEEP_ALIVE_SECONDS: u16 = 60;

fn default_keep_alive() -> u16 {
    DEFAULT_KEEP_ALIVE_SECONDS
}

fn default_clean_session() -> bool {
    true
}

/// Errors loading a device configuration.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConfigError {
    /// The document is not valid JSON for a [`DeviceConfig`].
    Malformed,
    /// The host or one of the device identifiers is empty.
    MissingIdentity,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::Malformed => f.write_str("malformed device configuration"),
            ConfigError::MissingIdentity => f.write_str("device configuration lacks an identity field"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ConfigError::Malformed => defmt::write!(f, "Malformed"),
            ConfigError::MissingIdentity => defmt::write!(f, "MissingIdentity"),
        }
    }
}

/// Identity and credentials of one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DeviceInfo<'a> {
    /// Product the device belongs to.
    pub product_id: &'a str,
    /// Device name within the product.
    pub device_name: &'a str,
    /// MQTT client identifier.
    pub client_id: &'a str,
    /// MQTT user name.
    #[serde(default, borrow)]
    pub username: Option<&'a str>,
    /// MQTT password, usually a token obtained with a signed auth request.
    #[serde(default, borrow)]
    pub password: Option<&'a str>,
    /// Shared secret used to sign authentication requests.
    #[serde(default, borrow)]
    pub secret: Option<&'a str>,
}

impl<'a> DeviceInfo<'a> {
    /// Signing input for an authentication request made at `timestamp`.
    ///
    /// # Errors
    ///
    /// [`buffer::Error::NullArgument`] if the device has no secret.
    pub fn signing_input(
        &self,
        expire: i64,
        nonce: i64,
        timestamp: i64,
    ) -> Result<SigningInput<'a>, buffer::Error> {
        let secret = self.secret.ok_or(buffer::Error::NullArgument)?;
        Ok(SigningInput {
            secret: secret.as_bytes(),
            client_id: self.client_id,
            device_name: self.device_name,
            product_id: self.product_id,
            expire,
            nonce,
            timestamp,
        })
    }
}

/// Everything needed to open a device session.
///
/// ```rust
/// use iotsuite::session::DeviceConfig;
///
/// let config = DeviceConfig::from_json(r#"{
///     "host": "mqtt.example.com",
///     "port": 1883,
///     "device_info": {
///         "product_id": "PRODX",
///         "device_name": "sensor-a",
///         "client_id": "PRODX-sensor-a",
///         "username": "PRODX;sensor-a"
///     }
/// }"#).unwrap();
///
/// assert_eq!(config.keep_alive_interval, 60);
/// assert!(config.clean_session);
/// assert_eq!(config.connect_options().client_id, "PRODX-sensor-a");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DeviceConfig<'a> {
    /// Broker host name.
    pub host: &'a str,
    /// Broker port.
    pub port: u16,
    /// Keep-alive interval in seconds.
    #[serde(default = "default_keep_alive")]
    pub keep_alive_interval: u16,
    /// Whether the broker should discard previous session state.
    #[serde(default = "default_clean_session")]
    pub clean_session: bool,
    /// Device identity and credentials.
    #[serde(borrow)]
    pub device_info: DeviceInfo<'a>,
}

impl<'a> DeviceConfig<'a> {
    /// Parse a configuration from JSON, borrowing its strings from `json`.
    pub fn from_json(json: &'a str) -> Result<Self, ConfigError> {
        let (config, _) = serde_json_core::from_str::<DeviceConfig<'a>>(json)
            .map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the host and device identity are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let info = &self.device_info;
        if self.host.is_empty()
            || info.product_id.is_empty()
            || info.device_name.is_empty()
            || info.client_id.is_empty()
        {
            return Err(ConfigError::MissingIdentity);
        }
        Ok(())
    }

    /// Transport connect parameters for this device: protocol level 4 and
    /// no will message.
    pub fn connect_options(&self) -> Options<'a> {
        Options {
            client_id: self.device_info.client_id,
            username: self.device_info.username,
            password: self.device_info.password,
            keep_alive_seconds: self.keep_alive_interval,
            clean_session: self.clean_session,
            protocol_level: PROTOCOL_LEVEL,
        }
    }
}
