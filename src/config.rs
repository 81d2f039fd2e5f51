//! Bridge configuration, built by the host or loaded from JSON

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::ResultExt as _;

/// Method channel name the UI layer talks to
pub const DEFAULT_CHANNEL: &str = "com.hospi_id_scan.nfc";

/// How long a session waits for a tag before giving up
pub const DEFAULT_SESSION_TIMEOUT_MS: u64 = 60_000;

/// Language tag written into text records
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(default)]
pub struct BridgeConfig {
    pub channel: String,

    /// `None` waits for a tag until the session is dismissed
    pub session_timeout_ms: Option<u64>,

    pub text_decoding: TextDecoding,

    pub language: String,

    pub messages: NotificationMessages,
}

/// How text is pulled out of the records read from a tag
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "snake_case")]
pub enum TextDecoding {
    /// Read the status byte and the real language code length
    #[default]
    Parsed,

    /// Strip a fixed 3 byte prefix from every payload, compatible with older readers
    FixedPrefix,
}

/// Strings shown to the user through the platform's notifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(default)]
pub struct NotificationMessages {
    pub nfc_unsupported: String,
    pub enable_nfc: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(String),

    #[error("invalid language code: {0}")]
    InvalidLanguage(String),

    #[error("session timeout must be greater than zero")]
    ZeroTimeout,

    #[error("channel name is empty")]
    EmptyChannel,
}

type Error = ConfigError;
type Result<T, E = Error> = std::result::Result<T, E>;

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            session_timeout_ms: Some(DEFAULT_SESSION_TIMEOUT_MS),
            text_decoding: TextDecoding::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            messages: NotificationMessages::default(),
        }
    }
}

impl Default for NotificationMessages {
    fn default() -> Self {
        Self {
            nfc_unsupported: "NFC not supported".to_string(),
            enable_nfc: "Please enable NFC".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Parse and validate, missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err_str(ConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err_str(ConfigError::Json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.channel.trim().is_empty() {
            return Err(ConfigError::EmptyChannel);
        }

        if self.session_timeout_ms == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }

        nfc_ndef::TextPayload::new(&self.language, "")
            .map_err_str(ConfigError::InvalidLanguage)?;

        Ok(())
    }

    pub fn session_timeout(&self) -> Option<Duration> {
        self.session_timeout_ms.map(Duration::from_millis)
    }
}

mod ffi {
    use super::*;

    #[uniffi::export]
    fn default_bridge_config() -> BridgeConfig {
        BridgeConfig::default()
    }

    #[uniffi::export]
    fn bridge_config_from_json(json: String) -> Result<BridgeConfig, ConfigError> {
        BridgeConfig::from_json(&json)
    }
}
