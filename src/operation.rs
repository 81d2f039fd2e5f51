use std::{collections::HashMap, str::FromStr as _};

use crate::error::{Error, Result};

/// Argument carrying the text for `writeTag`
pub const TEXT_ARG: &str = "text";

/// Method names accepted over the bridge channel
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::Display,
    strum::EnumIter,
)]
pub enum BridgeMethod {
    #[strum(serialize = "readTag")]
    ReadTag,

    #[strum(serialize = "writeTag")]
    WriteTag,

    #[strum(serialize = "eraseTag")]
    EraseTag,
}

/// The one thing a tag session does once a tag shows up
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display, uniffi::Enum)]
pub enum Operation {
    #[display("read")]
    Read,

    #[display("write")]
    Write { text: String },

    #[display("erase")]
    Erase,
}

impl Operation {
    /// Build the operation for a bridge method call, a missing `text` is written as ""
    pub fn from_method_call(method: &str, args: &HashMap<String, String>) -> Result<Self> {
        let method = BridgeMethod::from_str(method)
            .map_err(|_| Error::UnknownOperation(method.to_string()))?;

        let operation = match method {
            BridgeMethod::ReadTag => Self::Read,
            BridgeMethod::WriteTag => Self::Write {
                text: args.get(TEXT_ARG).cloned().unwrap_or_default(),
            },
            BridgeMethod::EraseTag => Self::Erase,
        };

        Ok(operation)
    }

    /// Prefix for I/O failures, "Read error: ..."
    pub fn error_prefix(&self) -> &'static str {
        match self {
            Self::Read => "Read error",
            Self::Write { .. } => "Write error",
            Self::Erase => "Erase error",
        }
    }

    /// Message the UI sees when this operation fails with `error`
    pub fn failure_message(&self, error: &Error) -> String {
        match error {
            Error::Io(details) => format!("{}: {details}", self.error_prefix()),
            other => other.to_string(),
        }
    }
}
