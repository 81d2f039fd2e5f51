use crate::{
    Error, Result,
    header::NdefHeader,
    ndef_type::NdefType,
    parser,
    payload::{self, NdefPayload, TextPayload},
};

/// Well known record type for text records
pub const TEXT_TYPE: &[u8] = b"T";

/// Well known record type for URI records
pub const URI_TYPE: &[u8] = b"U";

/// Number of bytes the legacy reader strips from every record payload,
/// the status byte plus a two letter language code
pub const LEGACY_TEXT_PREFIX_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefRecord {
    pub header: NdefHeader,
    pub type_: Vec<u8>,
    pub id: Option<Vec<u8>>,
    pub payload: Vec<u8>,
}

impl NdefRecord {
    pub fn new(
        type_name_format: NdefType,
        type_: Vec<u8>,
        id: Option<Vec<u8>>,
        payload: Vec<u8>,
    ) -> Result<Self> {
        let type_length = u8::try_from(type_.len()).map_err(|_| Error::TypeTooLong(type_.len()))?;

        let id_length = match &id {
            Some(id) => Some(u8::try_from(id.len()).map_err(|_| Error::IdTooLong(id.len()))?),
            None => None,
        };

        let payload_length =
            u32::try_from(payload.len()).map_err(|_| Error::PayloadTooLarge(payload.len()))?;

        let header = NdefHeader {
            message_begin: false,
            message_end: false,
            chunked: false,
            short_record: payload_length <= u8::MAX as u32,
            has_id_length: id_length.is_some(),
            type_name_format,
            type_length,
            payload_length,
            id_length,
        };

        Ok(Self {
            header,
            type_,
            id,
            payload,
        })
    }

    /// A record with no type, id or payload
    pub fn empty() -> Self {
        let header = NdefHeader {
            message_begin: false,
            message_end: false,
            chunked: false,
            short_record: true,
            has_id_length: false,
            type_name_format: NdefType::Empty,
            type_length: 0,
            payload_length: 0,
            id_length: None,
        };

        Self {
            header,
            type_: Vec::new(),
            id: None,
            payload: Vec::new(),
        }
    }

    /// A well known UTF-8 text record
    pub fn text(language: &str, text: &str) -> Result<Self> {
        let payload = TextPayload::new(language, text)?.to_bytes();
        Self::new(NdefType::WellKnown, TEXT_TYPE.to_vec(), None, payload)
    }

    pub fn type_name_format(&self) -> NdefType {
        self.header.type_name_format
    }

    pub fn is_text(&self) -> bool {
        self.type_name_format() == NdefType::WellKnown && self.type_ == TEXT_TYPE
    }

    pub fn is_uri(&self) -> bool {
        self.type_name_format() == NdefType::WellKnown && self.type_ == URI_TYPE
    }

    /// Interpret the payload based on the record type
    pub fn decode_payload(&self) -> Result<NdefPayload> {
        if self.is_text() {
            let text = parser::parse_text_payload(&self.payload)?;
            return Ok(NdefPayload::Text(text));
        }

        if self.is_uri() {
            return Ok(NdefPayload::Uri(payload::expand_uri(&self.payload)));
        }

        Ok(NdefPayload::Data(self.payload.clone()))
    }

    /// Human readable text for this record
    ///
    /// Text records honour the status byte and language code length, URI records
    /// are expanded and everything else is read as lossy UTF-8
    pub fn text_content(&self) -> Result<String> {
        if self.type_name_format() == NdefType::Empty {
            return Ok(String::new());
        }

        // no status byte, nothing to read
        if self.is_text() && self.payload.is_empty() {
            return Ok(String::new());
        }

        let text = match self.decode_payload()? {
            NdefPayload::Text(text) => text.text,
            NdefPayload::Uri(uri) => uri,
            NdefPayload::Data(data) => String::from_utf8_lossy(&data).to_string(),
        };

        Ok(text)
    }

    /// Text the way the legacy reader produced it: payload minus a fixed
    /// 3 byte prefix, as lossy UTF-8
    ///
    /// Only correct for UTF-8 text records with a two letter language code
    pub fn legacy_text_content(&self) -> String {
        let text = self.payload.get(LEGACY_TEXT_PREFIX_LEN..).unwrap_or_default();
        String::from_utf8_lossy(text).to_string()
    }
}
