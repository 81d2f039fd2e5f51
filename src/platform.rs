//! Interfaces the host platform implements

use std::sync::Arc;

use crate::session::TagSession;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum NfcAvailability {
    /// No NFC hardware on the device
    Unsupported,

    /// Hardware present but switched off in the system settings
    Disabled,

    Enabled,
}

#[uniffi::export(callback_interface)]
pub trait NfcPlatform: Send + Sync + std::fmt::Debug + 'static {
    fn availability(&self) -> NfcAvailability;

    /// Show a short status message to the user (toast)
    fn notify(&self, message: String);

    /// Deep link into the system NFC settings, best effort
    fn open_nfc_settings(&self);

    /// Route tag discoveries to the foreground session
    ///
    /// Called with the session's state locked, must not call back into it
    fn enable_tag_detection(&self);

    fn disable_tag_detection(&self);
}

/// Hosts the UI context a session lives in (an activity on Android)
#[uniffi::export(callback_interface)]
pub trait SessionHost: Send + Sync + std::fmt::Debug + 'static {
    /// Start the hosting context, the host forwards its lifecycle and tag events to `session`
    fn present(&self, session: Arc<TagSession>);

    /// End the hosting context for the session with `session_id`
    fn dismiss(&self, session_id: u64);
}

/// Reply handle for one method call, resolved exactly once
#[uniffi::export(callback_interface)]
pub trait MethodResult: Send + Sync + std::fmt::Debug + 'static {
    fn success(&self, payload: String);

    fn error(&self, code: String, message: String);

    fn not_implemented(&self);
}
