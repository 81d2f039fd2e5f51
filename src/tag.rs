//! Tag technologies as seen from rust
//!
//! The host hands over one [`TagTransport`] per detected tag. [`Ndef`] and
//! [`NdefFormatable`] wrap it the way the platform exposes them, and every
//! connection is a guard that closes the technology exactly once.

use nfc_ndef::NdefMessage;
use tracing::warn;

use crate::{error::NfcError, util::ResultExt as _};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, derive_more::Display, uniffi::Enum)]
pub enum TagTechnology {
    Ndef,
    NdefFormatable,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
pub enum TagIoError {
    #[error("tag was lost")]
    TagLost,

    #[error("{0}")]
    Io(String),

    #[error("format failed: {0}")]
    Format(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for TagIoError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Unexpected(error.reason)
    }
}

/// One physically present tag, valid for a single detection event
#[uniffi::export(callback_interface)]
pub trait TagTransport: Send + Sync + std::fmt::Debug + 'static {
    fn technologies(&self) -> Vec<TagTechnology>;

    fn connect(&self, technology: TagTechnology) -> Result<(), TagIoError>;

    fn close(&self, technology: TagTechnology) -> Result<(), TagIoError>;

    /// Raw NDEF message read when the tag was discovered, `None` if it holds none
    fn cached_ndef_message(&self) -> Result<Option<Vec<u8>>, TagIoError>;

    fn is_writable(&self) -> bool;

    /// Largest NDEF message, in bytes, the tag can store
    fn max_size(&self) -> u32;

    fn write_ndef_message(&self, message: Vec<u8>) -> Result<(), TagIoError>;

    fn format(&self, message: Vec<u8>) -> Result<(), TagIoError>;
}

type Result<T, E = NfcError> = std::result::Result<T, E>;

/// Open connection to one technology, closed on drop if not closed explicitly
#[derive(Debug)]
struct Connection<'a> {
    tag: &'a dyn TagTransport,
    technology: TagTechnology,
    closed: bool,
}

impl<'a> Connection<'a> {
    fn open(tag: &'a dyn TagTransport, technology: TagTechnology) -> Result<Self> {
        tag.connect(technology).map_err_str(NfcError::Io)?;

        Ok(Self {
            tag,
            technology,
            closed: false,
        })
    }

    fn close(mut self) -> Result<()> {
        self.closed = true;
        self.tag.close(self.technology).map_err_str(NfcError::Io)
    }
}

impl Drop for Connection<'_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }

        if let Err(error) = self.tag.close(self.technology) {
            warn!("failed to close {} connection: {error}", self.technology);
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Ndef<'a> {
    tag: &'a dyn TagTransport,
}

impl<'a> Ndef<'a> {
    /// `None` if the tag does not expose NDEF
    pub fn get(tag: &'a dyn TagTransport) -> Option<Self> {
        let supported = tag.technologies().contains(&TagTechnology::Ndef);
        supported.then_some(Self { tag })
    }

    pub fn connect(&self) -> Result<NdefConnection<'a>> {
        let connection = Connection::open(self.tag, TagTechnology::Ndef)?;
        Ok(NdefConnection(connection))
    }
}

#[derive(Debug)]
pub struct NdefConnection<'a>(Connection<'a>);

impl NdefConnection<'_> {
    pub fn cached_message(&self) -> Result<Option<NdefMessage>> {
        let Some(bytes) = self.0.tag.cached_ndef_message().map_err_str(NfcError::Io)? else {
            return Ok(None);
        };

        let message = NdefMessage::parse(&bytes).map_err_str(NfcError::Io)?;
        Ok(Some(message))
    }

    pub fn is_writable(&self) -> bool {
        self.0.tag.is_writable()
    }

    pub fn max_size(&self) -> usize {
        self.0.tag.max_size() as usize
    }

    pub fn write(&self, message: &NdefMessage) -> Result<()> {
        self.0
            .tag
            .write_ndef_message(message.to_bytes())
            .map_err_str(NfcError::Io)
    }

    pub fn close(self) -> Result<()> {
        self.0.close()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NdefFormatable<'a> {
    tag: &'a dyn TagTransport,
}

impl<'a> NdefFormatable<'a> {
    pub fn get(tag: &'a dyn TagTransport) -> Option<Self> {
        let supported = tag.technologies().contains(&TagTechnology::NdefFormatable);
        supported.then_some(Self { tag })
    }

    pub fn connect(&self) -> Result<FormatableConnection<'a>> {
        let connection = Connection::open(self.tag, TagTechnology::NdefFormatable)?;
        Ok(FormatableConnection(connection))
    }
}

#[derive(Debug)]
pub struct FormatableConnection<'a>(Connection<'a>);

impl FormatableConnection<'_> {
    /// Initialize the tag for NDEF and store `message` on it
    pub fn format(&self, message: &NdefMessage) -> Result<()> {
        self.0.tag.format(message.to_bytes()).map_err_str(NfcError::Io)
    }

    pub fn close(self) -> Result<()> {
        self.0.close()
    }
}
