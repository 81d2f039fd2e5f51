/// Everything that can end an NFC request without a payload
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NfcError {
    #[error("NFC not supported")]
    CapabilityUnavailable,

    /// Not fatal, the user is sent to the NFC settings and the session keeps listening
    #[error("NFC is disabled")]
    CapabilityDisabled,

    #[error("{0}")]
    UnsupportedTagFormat(String),

    #[error("Tag not writable or too small")]
    CapacityExceeded,

    #[error("{0}")]
    Io(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("another NFC request is already in progress")]
    Busy,

    #[error("cancelled")]
    Cancelled,

    #[error("timed out waiting for tag")]
    TimedOut,
}

pub type Error = NfcError;
pub type Result<T, E = Error> = std::result::Result<T, E>;
