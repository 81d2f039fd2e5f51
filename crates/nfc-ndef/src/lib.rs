//! NDEF (NFC Data Exchange Format) records and messages: model, encoder and parser

pub mod encoder;
pub mod header;
pub mod message;
pub mod ndef_type;
pub mod parser;
pub mod payload;
pub mod record;

pub use message::NdefMessage;
pub use ndef_type::NdefType;
pub use payload::{NdefPayload, TextPayload, TextPayloadFormat};
pub use record::NdefRecord;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NdefError {
    #[error("unable to parse NDEF data: {0}")]
    Parse(String),

    #[error("message has no records")]
    NoRecords,

    #[error("record type is {0} bytes, at most 255 allowed")]
    TypeTooLong(usize),

    #[error("record id is {0} bytes, at most 255 allowed")]
    IdTooLong(usize),

    #[error("record payload of {0} bytes is too large")]
    PayloadTooLarge(usize),

    #[error("invalid language code {0:?}")]
    InvalidLanguageCode(String),
}

pub type Error = NdefError;
pub type Result<T, E = Error> = std::result::Result<T, E>;
