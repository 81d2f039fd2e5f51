use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _};

static INIT: Once = Once::new();

/// Default filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "nfc_bridge=debug,nfc_ndef=info";

/// Install the global subscriber, safe to call more than once
pub fn init() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true));

        // the host may have installed its own
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            return;
        }

        if let Err(error) = tracing_log::LogTracer::init() {
            tracing::debug!("log records are not forwarded: {error}");
        }
    });
}
