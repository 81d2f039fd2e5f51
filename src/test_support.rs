//! In-memory doubles for the host side of the bridge

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use nfc_ndef::NdefMessage;
use parking_lot::Mutex;

use crate::{
    bridge::{BridgeReconcileMessage, BridgeReconciler},
    outcome::Outcome,
    platform::{MethodResult, NfcAvailability, NfcPlatform, SessionHost},
    session::{RequestId, SessionEvent, SessionObserver, TagSession},
    tag::{TagIoError, TagTechnology, TagTransport},
};

/// Capacity a blank tag reports once formatted
const FORMATTED_CAPACITY: u32 = 137;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FailPoint {
    Connect,
    ReadCache,
    Write,
    Format,
    Close,
}

#[derive(Debug)]
struct TagState {
    technologies: Vec<TagTechnology>,
    content: Option<Vec<u8>>,
    writable: bool,
    max_size: u32,
    connected: Option<TagTechnology>,
    fail_on: Option<FailPoint>,
    opens: usize,
    closes: usize,
    writes: usize,
    formats: usize,
}

/// A tag held to the reader, clones share the same tag
#[derive(Debug, Clone)]
pub struct SimulatedTag(Arc<Mutex<TagState>>);

impl SimulatedTag {
    fn with_technologies(technologies: Vec<TagTechnology>, max_size: u32) -> Self {
        let state = TagState {
            technologies,
            content: None,
            writable: true,
            max_size,
            connected: None,
            fail_on: None,
            opens: 0,
            closes: 0,
            writes: 0,
            formats: 0,
        };

        Self(Arc::new(Mutex::new(state)))
    }

    /// NDEF formatted tag with no message on it
    pub fn ndef(max_size: u32) -> Self {
        Self::with_technologies(vec![TagTechnology::Ndef], max_size)
    }

    /// Blank tag that becomes NDEF once formatted
    pub fn formatable() -> Self {
        Self::with_technologies(vec![TagTechnology::NdefFormatable], 0)
    }

    pub fn unsupported() -> Self {
        Self::with_technologies(Vec::new(), 0)
    }

    pub fn with_content(self, content: Vec<u8>) -> Self {
        self.0.lock().content = Some(content);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        let message = NdefMessage::text("en", text).expect("valid text record");
        self.with_content(message.to_bytes())
    }

    pub fn read_only(self) -> Self {
        self.0.lock().writable = false;
        self
    }

    pub fn fail_on(self, fail_point: FailPoint) -> Self {
        self.0.lock().fail_on = Some(fail_point);
        self
    }

    pub fn content(&self) -> Option<Vec<u8>> {
        self.0.lock().content.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.0.lock().connected.is_some()
    }

    pub fn opens(&self) -> usize {
        self.0.lock().opens
    }

    pub fn closes(&self) -> usize {
        self.0.lock().closes
    }

    pub fn writes(&self) -> usize {
        self.0.lock().writes
    }

    pub fn formats(&self) -> usize {
        self.0.lock().formats
    }

    #[track_caller]
    pub fn assert_balanced(&self) {
        let state = self.0.lock();
        assert_eq!(state.opens, state.closes, "open and close counts differ");
        assert!(state.connected.is_none(), "tag left connected");
    }
}

impl TagState {
    fn check(&self, fail_point: FailPoint) -> Result<(), TagIoError> {
        match self.fail_on {
            Some(fail) if fail == fail_point => Err(TagIoError::TagLost),
            _ => Ok(()),
        }
    }

    fn require(&self, technology: TagTechnology) -> Result<(), TagIoError> {
        if self.connected == Some(technology) {
            return Ok(());
        }

        Err(TagIoError::Io(format!("{technology} not connected")))
    }
}

impl TagTransport for SimulatedTag {
    fn technologies(&self) -> Vec<TagTechnology> {
        self.0.lock().technologies.clone()
    }

    fn connect(&self, technology: TagTechnology) -> Result<(), TagIoError> {
        let mut state = self.0.lock();
        state.check(FailPoint::Connect)?;

        if !state.technologies.contains(&technology) {
            return Err(TagIoError::Io(format!("{technology} not available")));
        }

        if state.connected.is_some() {
            return Err(TagIoError::Io("already connected".to_string()));
        }

        state.connected = Some(technology);
        state.opens += 1;
        Ok(())
    }

    fn close(&self, technology: TagTechnology) -> Result<(), TagIoError> {
        let mut state = self.0.lock();
        state.require(technology)?;

        state.connected = None;
        state.closes += 1;
        state.check(FailPoint::Close)
    }

    fn cached_ndef_message(&self) -> Result<Option<Vec<u8>>, TagIoError> {
        let state = self.0.lock();
        state.require(TagTechnology::Ndef)?;
        state.check(FailPoint::ReadCache)?;

        Ok(state.content.clone())
    }

    fn is_writable(&self) -> bool {
        self.0.lock().writable
    }

    fn max_size(&self) -> u32 {
        self.0.lock().max_size
    }

    fn write_ndef_message(&self, message: Vec<u8>) -> Result<(), TagIoError> {
        let mut state = self.0.lock();
        state.require(TagTechnology::Ndef)?;
        state.check(FailPoint::Write)?;

        if !state.writable || message.len() > state.max_size as usize {
            return Err(TagIoError::Io("write rejected by tag".to_string()));
        }

        state.content = Some(message);
        state.writes += 1;
        Ok(())
    }

    fn format(&self, message: Vec<u8>) -> Result<(), TagIoError> {
        let mut state = self.0.lock();
        state.require(TagTechnology::NdefFormatable)?;

        if state.fail_on == Some(FailPoint::Format) {
            return Err(TagIoError::Format(TagIoError::TagLost.to_string()));
        }

        // the open connection stays on the formatable technology until closed
        state.technologies = vec![TagTechnology::Ndef];
        state.max_size = FORMATTED_CAPACITY;
        state.content = Some(message);
        state.formats += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct PlatformState {
    notifications: Vec<String>,
    settings_opened: usize,
    enable_calls: usize,
    disable_calls: usize,
    detecting: bool,
}

#[derive(Debug, Clone)]
pub struct RecordingPlatform {
    availability: NfcAvailability,
    state: Arc<Mutex<PlatformState>>,
}

impl RecordingPlatform {
    pub fn new(availability: NfcAvailability) -> Self {
        Self {
            availability,
            state: Arc::default(),
        }
    }

    pub fn notifications(&self) -> Vec<String> {
        self.state.lock().notifications.clone()
    }

    pub fn settings_opened(&self) -> usize {
        self.state.lock().settings_opened
    }

    pub fn enable_calls(&self) -> usize {
        self.state.lock().enable_calls
    }

    pub fn disable_calls(&self) -> usize {
        self.state.lock().disable_calls
    }

    pub fn detecting(&self) -> bool {
        self.state.lock().detecting
    }
}

impl NfcPlatform for RecordingPlatform {
    fn availability(&self) -> NfcAvailability {
        self.availability
    }

    fn notify(&self, message: String) {
        self.state.lock().notifications.push(message);
    }

    fn open_nfc_settings(&self) {
        self.state.lock().settings_opened += 1;
    }

    fn enable_tag_detection(&self) {
        let mut state = self.state.lock();
        assert!(!state.detecting, "tag detection enabled twice");

        state.enable_calls += 1;
        state.detecting = true;
    }

    fn disable_tag_detection(&self) {
        let mut state = self.state.lock();
        state.disable_calls += 1;
        state.detecting = false;
    }
}

#[derive(Debug, Default)]
struct HostState {
    presented: Vec<Arc<TagSession>>,
    dismissed: Vec<u64>,
}

/// Host that records sessions, optionally bringing each one to the foreground
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    auto_activate: bool,
    state: Arc<Mutex<HostState>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_activating() -> Self {
        Self {
            auto_activate: true,
            ..Self::default()
        }
    }

    pub fn last_presented(&self) -> Option<Arc<TagSession>> {
        self.state.lock().presented.last().cloned()
    }

    pub fn presented_count(&self) -> usize {
        self.state.lock().presented.len()
    }

    pub fn dismissed(&self) -> Vec<u64> {
        self.state.lock().dismissed.clone()
    }
}

impl SessionHost for RecordingHost {
    fn present(&self, session: Arc<TagSession>) {
        self.state.lock().presented.push(session.clone());

        if self.auto_activate {
            session.activate();
        }
    }

    fn dismiss(&self, session_id: u64) {
        self.state.lock().dismissed.push(session_id);
    }
}

#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<SessionEvent>>,
    finished: Mutex<Vec<(RequestId, Outcome)>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().clone()
    }

    pub fn finished(&self) -> Vec<(RequestId, Outcome)> {
        self.finished.lock().clone()
    }
}

impl SessionObserver for RecordingObserver {
    fn session_event(&self, _id: RequestId, event: SessionEvent) {
        self.events.lock().push(event);
    }

    fn session_finished(&self, id: RequestId, outcome: Outcome) {
        self.finished.lock().push((id, outcome));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Success(String),
    Error { code: String, message: String },
    NotImplemented,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingResult(Arc<Mutex<Vec<Resolution>>>);

impl RecordingResult {
    pub fn resolutions(&self) -> Vec<Resolution> {
        self.0.lock().clone()
    }

    /// The only resolution, panics if there were none or several
    #[track_caller]
    pub fn single(&self) -> Resolution {
        let resolutions = self.resolutions();
        assert_eq!(resolutions.len(), 1, "expected one resolution: {resolutions:?}");
        resolutions[0].clone()
    }
}

impl MethodResult for RecordingResult {
    fn success(&self, payload: String) {
        self.0.lock().push(Resolution::Success(payload));
    }

    fn error(&self, code: String, message: String) {
        self.0.lock().push(Resolution::Error { code, message });
    }

    fn not_implemented(&self) {
        self.0.lock().push(Resolution::NotImplemented);
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingReconciler(Arc<Mutex<Vec<BridgeReconcileMessage>>>);

impl RecordingReconciler {
    /// Wait until `count` messages arrived or `timeout` passed
    pub fn wait_for(&self, count: usize, timeout: Duration) -> Vec<BridgeReconcileMessage> {
        let started = Instant::now();

        while self.0.lock().len() < count && started.elapsed() < timeout {
            std::thread::sleep(Duration::from_millis(5));
        }

        self.0.lock().clone()
    }
}

impl BridgeReconciler for RecordingReconciler {
    fn reconcile(&self, message: BridgeReconcileMessage) {
        self.0.lock().push(message);
    }
}
