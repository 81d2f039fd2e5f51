/// Error code for every tag failure reported to the UI
pub const NFC_ERROR: &str = "NFC_ERROR";

/// Error code when a request arrives while another one is still pending
pub const NFC_BUSY: &str = "NFC_BUSY";

/// Terminal result of one operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum Outcome {
    Success { payload: String },
    Failure { code: String, message: String },
}

impl Outcome {
    pub fn success(payload: impl Into<String>) -> Self {
        Self::Success {
            payload: payload.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            code: NFC_ERROR.to_string(),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
