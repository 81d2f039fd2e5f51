use crate::{Error, Result, encoder, parser, record::NdefRecord};

/// An NDEF message, one or more records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefMessage {
    records: Vec<NdefRecord>,
}

impl NdefMessage {
    pub fn new(records: Vec<NdefRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::NoRecords);
        }

        Ok(Self { records })
    }

    /// Message holding a single empty record, what an erased tag contains
    pub fn empty() -> Self {
        Self {
            records: vec![NdefRecord::empty()],
        }
    }

    /// Single text record message
    pub fn text(language: &str, text: &str) -> Result<Self> {
        let record = NdefRecord::text(language, text)?;
        Ok(Self {
            records: vec![record],
        })
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::NoRecords);
        }

        let mut stream = parser::stream::new(bytes);
        let records = parser::parse_ndef_records(&mut stream)
            .map_err(|error| Error::Parse(format!("invalid message: {error}")))?;

        Self::new(records)
    }

    pub fn records(&self) -> &[NdefRecord] {
        &self.records
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        encoder::encode_records(&self.records)
    }

    /// Serialized size in bytes, what gets compared against tag capacity
    pub fn byte_len(&self) -> usize {
        encoder::encoded_len(&self.records)
    }

    /// Text of every record, joined by newlines
    pub fn text_content(&self) -> Result<String> {
        let texts = self
            .records
            .iter()
            .map(NdefRecord::text_content)
            .collect::<Result<Vec<String>>>()?;

        Ok(texts.join("\n"))
    }

    /// Same as [`Self::text_content`] but stripping a fixed 3 byte prefix
    pub fn legacy_text_content(&self) -> String {
        self.records
            .iter()
            .map(NdefRecord::legacy_text_content)
            .collect::<Vec<String>>()
            .join("\n")
    }
}
