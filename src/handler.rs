//! The three tag operations
//!
//! Each handler takes the operation and the tag of one detection event and
//! produces exactly one [`Outcome`]. Failures never escape as errors, they are
//! rendered into the outcome's message.

use nfc_ndef::NdefMessage;
use tracing::{debug, warn};

use crate::{
    config::{BridgeConfig, TextDecoding},
    error::{NfcError, Result},
    operation::Operation,
    outcome::Outcome,
    tag::{Ndef, NdefFormatable, TagTransport},
    util::ResultExt as _,
};

pub const WRITE_SUCCESS: &str = "Write success";
pub const ERASE_SUCCESS: &str = "erase succeeded";
pub const ERASE_REFORMATTED: &str = "erase succeeded, tag reformatted";

const READ_NOT_SUPPORTED: &str = "NDEF not supported on this tag";
const WRITE_NOT_SUPPORTED: &str = "NDEF formatable not supported";
const ERASE_NOT_SUPPORTED: &str = "erase not supported on this tag";

/// The part of the bridge config the handlers need
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub text_decoding: TextDecoding,
    pub language: String,
}

impl From<&BridgeConfig> for HandlerConfig {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            text_decoding: config.text_decoding,
            language: config.language.clone(),
        }
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self::from(&BridgeConfig::default())
    }
}

pub fn perform(operation: &Operation, tag: &dyn TagTransport, config: &HandlerConfig) -> Outcome {
    debug!("performing {operation} on {tag:?}");

    let result = match operation {
        Operation::Read => read(tag, config),
        Operation::Write { text } => write(tag, text, config),
        Operation::Erase => erase(tag),
    };

    match result {
        Ok(payload) => Outcome::success(payload),
        Err(error) => {
            warn!("{operation} failed: {error}");
            Outcome::failure(operation.failure_message(&error))
        }
    }
}

fn read(tag: &dyn TagTransport, config: &HandlerConfig) -> Result<String> {
    let ndef = Ndef::get(tag)
        .ok_or_else(|| NfcError::UnsupportedTagFormat(READ_NOT_SUPPORTED.to_string()))?;

    let connection = ndef.connect()?;

    let Some(message) = connection.cached_message()? else {
        return Err(NfcError::Io("no NDEF message on tag".to_string()));
    };

    let text = match config.text_decoding {
        TextDecoding::Parsed => message.text_content().map_err_str(NfcError::Io)?,
        TextDecoding::FixedPrefix => message.legacy_text_content(),
    };

    connection.close()?;
    Ok(text)
}

fn write(tag: &dyn TagTransport, text: &str, config: &HandlerConfig) -> Result<String> {
    let message = NdefMessage::text(&config.language, text).map_err_str(NfcError::Io)?;

    if let Some(ndef) = Ndef::get(tag) {
        let connection = ndef.connect()?;

        if !connection.is_writable() || connection.max_size() < message.byte_len() {
            debug!(
                "tag rejected, writable: {}, capacity: {}, needed: {}",
                connection.is_writable(),
                connection.max_size(),
                message.byte_len()
            );

            connection.close()?;
            return Err(NfcError::CapacityExceeded);
        }

        connection.write(&message)?;
        connection.close()?;

        return Ok(WRITE_SUCCESS.to_string());
    }

    let formatable = NdefFormatable::get(tag)
        .ok_or_else(|| NfcError::UnsupportedTagFormat(WRITE_NOT_SUPPORTED.to_string()))?;

    let connection = formatable.connect()?;
    connection.format(&message)?;
    connection.close()?;

    Ok(WRITE_SUCCESS.to_string())
}

fn erase(tag: &dyn TagTransport) -> Result<String> {
    let empty = NdefMessage::empty();

    if let Some(ndef) = Ndef::get(tag) {
        let connection = ndef.connect()?;
        connection.write(&empty)?;
        connection.close()?;

        return Ok(ERASE_SUCCESS.to_string());
    }

    let formatable = NdefFormatable::get(tag)
        .ok_or_else(|| NfcError::UnsupportedTagFormat(ERASE_NOT_SUPPORTED.to_string()))?;

    let connection = formatable.connect()?;
    connection.format(&empty)?;
    connection.close()?;

    Ok(ERASE_REFORMATTED.to_string())
}
