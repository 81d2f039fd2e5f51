//! Global tokio handle for the bridge
//!
//! The host sets it once from inside its runtime with [`init`], or hands one
//! over with [`init_with`]. When neither happened, [`handle`] builds a small
//! runtime of its own on first use.

mod abortable_task;
pub mod task;

use std::sync::OnceLock;
use tokio::runtime::{Builder, Handle, Runtime};

pub use abortable_task::AbortableTask;

pub(crate) static TOKIO: OnceLock<Handle> = OnceLock::new();

static FALLBACK: OnceLock<Option<Runtime>> = OnceLock::new();

/// Capture the current runtime, must be called from inside one
pub fn init() {
    if is_tokio_initialized() {
        return;
    }

    let _ = TOKIO.set(Handle::current());
}

/// Use an explicit handle, for hosts that own their runtime
pub fn init_with(handle: Handle) {
    if TOKIO.set(handle).is_err() {
        tracing::debug!("tokio runtime already initialized");
    }
}

pub fn is_tokio_initialized() -> bool {
    TOKIO.get().is_some()
}

/// The host's runtime if one was set, otherwise the fallback runtime
pub fn handle() -> Option<Handle> {
    if let Some(handle) = TOKIO.get() {
        return Some(handle.clone());
    }

    let fallback = FALLBACK.get_or_init(|| {
        tracing::info!("no tokio runtime set by the host, starting fallback runtime");

        Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("nfc-tokio")
            .enable_time()
            .build()
            .inspect_err(|error| tracing::error!("unable to build fallback runtime: {error}"))
            .ok()
    });

    fallback.as_ref().map(|runtime| runtime.handle().clone())
}
