use crate::ndef_type::NdefType;

pub const MESSAGE_BEGIN: u8 = 0x80;
pub const MESSAGE_END: u8 = 0x40;
pub const CHUNKED: u8 = 0x20;
pub const SHORT_RECORD: u8 = 0x10;
pub const ID_LENGTH_PRESENT: u8 = 0x08;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefHeader {
    pub message_begin: bool,
    pub message_end: bool,
    pub chunked: bool,
    pub short_record: bool,
    pub has_id_length: bool,
    pub type_name_format: NdefType,
    pub type_length: u8,
    pub payload_length: u32,
    pub id_length: Option<u8>,
}

impl NdefHeader {
    /// The flags + TNF byte that starts every record on the wire
    pub fn flags_byte(&self) -> u8 {
        let mut byte = self.type_name_format.bits();

        if self.message_begin {
            byte |= MESSAGE_BEGIN;
        }

        if self.message_end {
            byte |= MESSAGE_END;
        }

        if self.chunked {
            byte |= CHUNKED;
        }

        if self.short_record {
            byte |= SHORT_RECORD;
        }

        if self.has_id_length {
            byte |= ID_LENGTH_PRESENT;
        }

        byte
    }
}
