//! Method-call bridge between the UI layer and tag sessions

use std::{
    collections::HashMap,
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
};

use flume::{Receiver, Sender, TrySendError};
use nfc_tokio::AbortableTask;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
    config::BridgeConfig,
    error::NfcError,
    handler::HandlerConfig,
    operation::Operation,
    outcome::{NFC_BUSY, Outcome},
    platform::{MethodResult, NfcPlatform, SessionHost},
    session::{RequestId, SessionContext, SessionEvent, SessionObserver, TagSession},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum BridgeReconcileMessage {
    SessionStarted { session_id: u64, operation: Operation },
    Listening { session_id: u64 },
    TagDetected { session_id: u64 },
    Resolved { session_id: u64, outcome: Outcome },
    Rejected { method: String, reason: String },
}

#[uniffi::export(callback_interface)]
pub trait BridgeReconciler: Send + Sync + std::fmt::Debug + 'static {
    /// Tells the frontend about session progress
    fn reconcile(&self, message: BridgeReconcileMessage);
}

#[derive(Debug, uniffi::Object)]
pub struct NfcBridge {
    inner: Arc<BridgeInner>,
}

#[derive(Debug)]
struct BridgeInner {
    config: BridgeConfig,
    platform: Arc<Box<dyn NfcPlatform>>,
    host: Arc<Box<dyn SessionHost>>,
    pending: Mutex<Option<PendingRequest>>,
    next_id: AtomicU64,
    reconciler: Sender<BridgeReconcileMessage>,
    reconcile_receiver: Arc<Receiver<BridgeReconcileMessage>>,
}

/// The one caller waiting on a session
#[derive(Debug)]
struct PendingRequest {
    id: RequestId,
    result: Box<dyn MethodResult>,
    session: Arc<TagSession>,

    /// Dropping aborts the timer
    _timeout: Option<AbortableTask<()>>,
}

/// Hand the host's tokio runtime to the bridge, call once on start
///
/// Without it session timeouts run on a small runtime owned by the bridge
#[uniffi::export(async_runtime = "tokio")]
pub async fn init_runtime() {
    nfc_tokio::init();
}

#[uniffi::export]
impl NfcBridge {
    #[uniffi::constructor(default(config = None))]
    pub fn new(
        platform: Box<dyn NfcPlatform>,
        host: Box<dyn SessionHost>,
        config: Option<BridgeConfig>,
    ) -> Self {
        crate::logging::init();

        let config = match config {
            Some(config) => match config.validate() {
                Ok(()) => config,
                Err(error) => {
                    error!("invalid bridge config, using defaults: {error}");
                    BridgeConfig::default()
                }
            },
            None => BridgeConfig::default(),
        };

        info!("nfc bridge ready on channel {}", config.channel);
        let (sender, receiver) = flume::bounded(1000);

        let inner = BridgeInner {
            config,
            platform: Arc::new(platform),
            host: Arc::new(host),
            pending: Mutex::new(None),
            next_id: AtomicU64::new(1),
            reconciler: sender,
            reconcile_receiver: Arc::new(receiver),
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Handle a method call from the UI, `result` is resolved exactly once
    #[uniffi::method]
    pub fn submit(
        &self,
        method: String,
        args: HashMap<String, String>,
        result: Box<dyn MethodResult>,
    ) {
        let operation = match Operation::from_method_call(&method, &args) {
            Ok(operation) => operation,
            Err(error) => {
                debug!("{error}, replying not implemented");
                result.not_implemented();
                return;
            }
        };

        Arc::clone(&self.inner).start(method, operation, result);
    }

    /// End the in-flight session as cancelled, if there is one
    #[uniffi::method]
    pub fn cancel(&self) {
        match self.inner.pending_session() {
            Some(session) => session.dismiss(),
            None => debug!("cancel with nothing pending"),
        }
    }

    #[uniffi::method]
    pub fn has_pending(&self) -> bool {
        self.inner.pending.lock().is_some()
    }

    /// The session the pending request is waiting on
    #[uniffi::method]
    pub fn pending_session(&self) -> Option<Arc<TagSession>> {
        self.inner.pending_session()
    }

    #[uniffi::method]
    pub fn config(&self) -> BridgeConfig {
        self.inner.config.clone()
    }

    #[uniffi::method]
    pub fn listen_for_updates(&self, reconciler: Box<dyn BridgeReconciler>) {
        let reconcile_receiver = self.inner.reconcile_receiver.clone();

        std::thread::spawn(move || {
            while let Ok(message) = reconcile_receiver.recv() {
                // call the reconcile method on the frontend
                reconciler.reconcile(message);
            }
        });
    }
}

impl BridgeInner {
    fn start(self: Arc<Self>, method: String, operation: Operation, result: Box<dyn MethodResult>) {
        let mut pending = self.pending.lock();

        if let Some(existing) = pending.as_ref() {
            warn!("{method} rejected, {} still pending", existing.id);
            drop(pending);

            let reason = NfcError::Busy.to_string();
            self.send(BridgeReconcileMessage::Rejected {
                method,
                reason: reason.clone(),
            });

            result.error(NFC_BUSY.to_string(), reason);
            return;
        }

        let id = RequestId::from(self.next_id.fetch_add(1, Ordering::Relaxed));

        let weak_self = Arc::downgrade(&self);
        let observer: Weak<dyn SessionObserver> = weak_self;
        let context = SessionContext {
            platform: self.platform.clone(),
            host: self.host.clone(),
            observer,
            handler_config: HandlerConfig::from(&self.config),
            messages: self.config.messages.clone(),
        };

        let session = TagSession::new(id, operation.clone(), context);
        let timeout = self.schedule_timeout(id);

        *pending = Some(PendingRequest {
            id,
            result,
            session: session.clone(),
            _timeout: timeout,
        });

        drop(pending);

        info!("{id}: starting {operation} session");
        self.send(BridgeReconcileMessage::SessionStarted {
            session_id: id.value(),
            operation,
        });

        self.host.present(session.clone());
        session.start();
    }

    fn schedule_timeout(self: &Arc<Self>, id: RequestId) -> Option<AbortableTask<()>> {
        let timeout = self.config.session_timeout()?;
        let weak = Arc::downgrade(self);

        let task = AbortableTask::try_spawn_after(timeout, async move {
            if let Some(bridge) = weak.upgrade() {
                bridge.expire(id);
            }
        });

        if task.is_none() {
            error!("{id}: no tokio runtime available, session will not time out");
        }

        task
    }

    fn expire(&self, id: RequestId) {
        let session = {
            let pending = self.pending.lock();
            match pending.as_ref() {
                Some(request) if request.id == id => request.session.clone(),
                _ => return,
            }
        };

        session.expire();
    }

    fn pending_session(&self) -> Option<Arc<TagSession>> {
        let pending = self.pending.lock();
        pending.as_ref().map(|request| request.session.clone())
    }

    fn resolve(&self, id: RequestId, outcome: Outcome) {
        let request = {
            let mut pending = self.pending.lock();
            match pending.as_ref() {
                Some(request) if request.id == id => pending.take(),
                _ => None,
            }
        };

        let Some(request) = request else {
            warn!("{id}: stale completion ignored");
            return;
        };

        debug!("{id}: resolving, success: {}", outcome.is_success());

        match outcome.clone() {
            Outcome::Success { payload } => request.result.success(payload),
            Outcome::Failure { code, message } => request.result.error(code, message),
        }

        self.send(BridgeReconcileMessage::Resolved {
            session_id: id.value(),
            outcome,
        });
    }

    fn send(&self, message: BridgeReconcileMessage) {
        match self.reconciler.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(message)) => {
                debug!("reconcile channel full, dropping {message:?}")
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

impl SessionObserver for BridgeInner {
    fn session_event(&self, id: RequestId, event: SessionEvent) {
        let session_id = id.value();

        let message = match event {
            SessionEvent::Listening => BridgeReconcileMessage::Listening { session_id },
            SessionEvent::TagDetected => BridgeReconcileMessage::TagDetected { session_id },
        };

        self.send(message);
    }

    fn session_finished(&self, id: RequestId, outcome: Outcome) {
        self.resolve(id, outcome);
    }
}
