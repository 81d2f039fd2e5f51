pub mod bridge;
pub mod config;
pub mod error;
pub mod handler;
pub mod operation;
pub mod outcome;
pub mod platform;
pub mod session;
pub mod tag;

pub(crate) mod logging;
pub(crate) mod util;

#[cfg(test)]
pub(crate) mod test_support;

pub use bridge::{BridgeReconcileMessage, BridgeReconciler, NfcBridge, init_runtime};
pub use config::{BridgeConfig, TextDecoding};
pub use operation::Operation;
pub use outcome::{NFC_BUSY, NFC_ERROR, Outcome};
pub use session::{SessionState, TagSession};

uniffi::setup_scaffolding!();
