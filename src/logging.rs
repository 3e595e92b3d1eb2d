use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::formatter::TickFormatter;

static SUBSCRIBER_INIT: std::sync::Once = std::sync::Once::new();

/// Configure and initialize logging. Safe to call more than once.
pub fn setup_logging() {
    SUBSCRIBER_INIT.call_once(|| {
        // RUST_LOG overrides; default to info for this crate and warn elsewhere
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,{name}=info", name = env!("CARGO_CRATE_NAME"))));

        let subscriber = FmtSubscriber::builder()
            .with_target(true)
            .with_ansi(cfg!(not(windows)))
            .event_format(TickFormatter)
            .with_env_filter(filter)
            .finish()
            .with(ErrorLayer::default());

        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Could not set the global tracing subscriber: {e}");
        }
    });
}
