//! One foreground NFC listening session
//!
//! `Init -> Listening -> Processing -> Done`. The host presents the session,
//! forwards its foreground lifecycle (`activate` / `deactivate`) and the tag
//! discovered while it is in front. The session accepts exactly one tag,
//! produces exactly one [`Outcome`] and then asks the host to dismiss it.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    config::NotificationMessages,
    error::NfcError,
    handler::{self, HandlerConfig},
    operation::Operation,
    outcome::Outcome,
    platform::{NfcAvailability, NfcPlatform, SessionHost},
    tag::TagTransport,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, derive_more::Display, derive_more::From)]
#[display("request-{_0}")]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, derive_more::Display, uniffi::Enum)]
pub enum SessionState {
    Init,
    Listening,
    Processing,
    Done,
}

/// Progress reported to whoever started the session
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    Listening,
    TagDetected,
}

/// Receives session progress and the one terminal outcome
pub trait SessionObserver: Send + Sync + std::fmt::Debug {
    fn session_event(&self, id: RequestId, event: SessionEvent);
    fn session_finished(&self, id: RequestId, outcome: Outcome);
}

#[derive(Debug)]
pub(crate) struct SessionContext {
    pub platform: Arc<Box<dyn NfcPlatform>>,
    pub host: Arc<Box<dyn SessionHost>>,
    pub observer: Weak<dyn SessionObserver>,
    pub handler_config: HandlerConfig,
    pub messages: NotificationMessages,
}

#[derive(Debug, uniffi::Object)]
pub struct TagSession {
    id: RequestId,
    operation: Operation,
    inner: Mutex<SessionInner>,
    context: SessionContext,
}

#[derive(Debug)]
struct SessionInner {
    state: SessionState,

    /// Hosting context is in the foreground
    active: bool,

    /// Tag detection currently enabled on the platform
    detecting: bool,

    outcome: Option<Outcome>,
}

#[uniffi::export]
impl TagSession {
    #[uniffi::method]
    pub fn id(&self) -> u64 {
        self.id.value()
    }

    #[uniffi::method]
    pub fn operation(&self) -> Operation {
        self.operation.clone()
    }

    #[uniffi::method]
    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// The terminal outcome, once the session is done
    #[uniffi::method]
    pub fn outcome(&self) -> Option<Outcome> {
        self.inner.lock().outcome.clone()
    }

    /// Hosting context came to the foreground
    #[uniffi::method]
    pub fn activate(&self) {
        let mut inner = self.inner.lock();
        inner.active = true;
        self.enable_detection(&mut inner);
    }

    /// Hosting context left the foreground
    #[uniffi::method]
    pub fn deactivate(&self) {
        let mut inner = self.inner.lock();
        inner.active = false;
        self.disable_detection(&mut inner);
    }

    /// A tag was discovered while this session was in front
    #[uniffi::method]
    pub fn tag_detected(&self, tag: Box<dyn TagTransport>) {
        {
            let mut inner = self.inner.lock();
            if inner.state != SessionState::Listening {
                warn!("{}: ignoring tag while {}", self.id, inner.state);
                return;
            }

            inner.state = SessionState::Processing;
        }

        info!("{}: tag detected, running {}", self.id, self.operation);
        self.notify_observer(SessionEvent::TagDetected);

        let outcome = handler::perform(&self.operation, tag.as_ref(), &self.context.handler_config);
        drop(tag);

        self.finish_from(&[SessionState::Processing], outcome);
    }

    /// The user closed the hosting context before a tag showed up
    #[uniffi::method]
    pub fn dismiss(&self) {
        let outcome = Outcome::failure(NfcError::Cancelled.to_string());
        if !self.finish_from(&[SessionState::Init, SessionState::Listening], outcome) {
            debug!("{}: dismiss ignored", self.id);
        }
    }
}

impl TagSession {
    pub(crate) fn new(id: RequestId, operation: Operation, context: SessionContext) -> Arc<Self> {
        let inner = SessionInner {
            state: SessionState::Init,
            active: false,
            detecting: false,
            outcome: None,
        };

        Arc::new(Self {
            id,
            operation,
            inner: Mutex::new(inner),
            context,
        })
    }

    /// Check NFC availability and start listening
    pub(crate) fn start(&self) {
        let platform = &self.context.platform;

        match platform.availability() {
            NfcAvailability::Unsupported => {
                warn!("{}: NFC not supported on this device", self.id);
                platform.notify(self.context.messages.nfc_unsupported.clone());

                let outcome = Outcome::failure(NfcError::CapabilityUnavailable.to_string());
                self.finish_from(&[SessionState::Init], outcome);
                return;
            }

            NfcAvailability::Disabled => {
                info!("{}: {}, opening settings", self.id, NfcError::CapabilityDisabled);
                platform.notify(self.context.messages.enable_nfc.clone());
                platform.open_nfc_settings();
            }

            NfcAvailability::Enabled => {}
        }

        {
            let mut inner = self.inner.lock();
            if inner.state != SessionState::Init {
                return;
            }

            inner.state = SessionState::Listening;
        }

        debug!("{}: listening for {}", self.id, self.operation);
        self.notify_observer(SessionEvent::Listening);

        let mut inner = self.inner.lock();
        self.enable_detection(&mut inner);
    }

    /// No tag arrived in time
    pub(crate) fn expire(&self) {
        let outcome = Outcome::failure(NfcError::TimedOut.to_string());
        if self.finish_from(&[SessionState::Init, SessionState::Listening], outcome) {
            info!("{}: timed out waiting for tag", self.id);
        }
    }

    /// Platform detection is only toggled with the state lock held
    fn enable_detection(&self, inner: &mut SessionInner) {
        if inner.state != SessionState::Listening || !inner.active || inner.detecting {
            return;
        }

        debug!("{}: enabling tag detection", self.id);
        inner.detecting = true;
        self.context.platform.enable_tag_detection();
    }

    fn disable_detection(&self, inner: &mut SessionInner) {
        if !std::mem::take(&mut inner.detecting) {
            return;
        }

        debug!("{}: disabling tag detection", self.id);
        self.context.platform.disable_tag_detection();
    }

    /// Move to `Done` if currently in one of `allowed`, returns false otherwise
    fn finish_from(&self, allowed: &[SessionState], outcome: Outcome) -> bool {
        {
            let mut inner = self.inner.lock();
            if !allowed.contains(&inner.state) {
                return false;
            }

            inner.state = SessionState::Done;
            inner.outcome = Some(outcome.clone());
            self.disable_detection(&mut inner);
        }

        debug!("{}: done, success: {}", self.id, outcome.is_success());
        self.context.host.dismiss(self.id.value());

        match self.context.observer.upgrade() {
            Some(observer) => observer.session_finished(self.id, outcome),
            None => warn!("{}: finished after the bridge was dropped", self.id),
        }

        true
    }

    fn notify_observer(&self, event: SessionEvent) {
        if let Some(observer) = self.context.observer.upgrade() {
            observer.session_event(self.id, event);
        }
    }
}
