use crate::{Error, Result};

/// Status byte flag marking a UTF-16 encoded text record
pub const UTF16_FLAG: u8 = 0x80;

/// Language code length lives in the low 6 bits of the status byte
pub const LANGUAGE_LENGTH_MASK: u8 = 0x3F;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NdefPayload {
    Text(TextPayload),
    Uri(String),
    Data(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPayload {
    pub format: TextPayloadFormat,
    pub language: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPayloadFormat {
    Utf8,
    Utf16,
}

impl TextPayload {
    /// UTF-8 text payload, the only format this crate writes
    pub fn new(language: &str, text: &str) -> Result<Self> {
        if language.is_empty()
            || !language.is_ascii()
            || language.len() > LANGUAGE_LENGTH_MASK as usize
        {
            return Err(Error::InvalidLanguageCode(language.to_string()));
        }

        Ok(Self {
            format: TextPayloadFormat::Utf8,
            language: language.to_string(),
            text: text.to_string(),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let language = self.language.as_bytes();
        let mut status = language.len() as u8 & LANGUAGE_LENGTH_MASK;

        let text = match self.format {
            TextPayloadFormat::Utf8 => self.text.as_bytes().to_vec(),
            TextPayloadFormat::Utf16 => {
                status |= UTF16_FLAG;
                self.text.encode_utf16().flat_map(u16::to_be_bytes).collect()
            }
        };

        let mut bytes = Vec::with_capacity(1 + language.len() + text.len());
        bytes.push(status);
        bytes.extend_from_slice(language);
        bytes.extend_from_slice(&text);
        bytes
    }
}

/// Expand a URI record payload using its one byte identifier code
pub fn expand_uri(payload: &[u8]) -> String {
    let Some((code, rest)) = payload.split_first() else {
        return String::new();
    };

    let prefix = URI_PREFIXES.get(*code as usize).copied().unwrap_or_default();
    format!("{prefix}{}", String::from_utf8_lossy(rest))
}

/// URI identifier codes from the NFC Forum URI record type definition
pub const URI_PREFIXES: &[&str] = &[
    "",                           // 0x00 - no prepending
    "http://www.",                // 0x01
    "https://www.",               // 0x02
    "http://",                    // 0x03
    "https://",                   // 0x04
    "tel:",                       // 0x05
    "mailto:",                    // 0x06
    "ftp://anonymous:anonymous@", // 0x07
    "ftp://ftp.",                 // 0x08
    "ftps://",                    // 0x09
    "sftp://",                    // 0x0A
    "smb://",                     // 0x0B
    "nfs://",                     // 0x0C
    "ftp://",                     // 0x0D
    "dav://",                     // 0x0E
    "news:",                      // 0x0F
    "telnet://",                  // 0x10
    "imap:",                      // 0x11
    "rtsp://",                    // 0x12
    "urn:",                       // 0x13
    "pop:",                       // 0x14
    "sip:",                       // 0x15
    "sips:",                      // 0x16
    "tftp:",                      // 0x17
    "btspp://",                   // 0x18
    "btl2cap://",                 // 0x19
    "btgoep://",                  // 0x1A
    "tcpobex://",                 // 0x1B
    "irdaobex://",                // 0x1C
    "file://",                    // 0x1D
    "urn:epc:id:",                // 0x1E
    "urn:epc:tag:",               // 0x1F
    "urn:epc:pat:",               // 0x20
    "urn:epc:raw:",               // 0x21
    "urn:epc:",                   // 0x22
    "urn:nfc:",                   // 0x23
];
