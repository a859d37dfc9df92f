//! Subscriber setup for applications embedding the client.
//!
//! The crate itself only emits `tracing` events and spans; nothing is printed
//! unless the application installs a subscriber. This module offers the one
//! most callers want.

use std::io;

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{EbayError, Result};

/// Log format configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format for development.
    #[default]
    Pretty,
    /// JSON format for log aggregation.
    Json,
}

impl LogFormat {
    /// Parses a format name; anything but `json` selects [`LogFormat::Pretty`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("json") { Self::Json } else { Self::Pretty }
    }

    /// Determines log format from the `LOG_FORMAT` environment variable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_name(&std::env::var("LOG_FORMAT").unwrap_or_default())
    }
}

/// Installs a global subscriber writing to stderr.
///
/// Filtering follows `RUST_LOG` (default: `info`). Span close events are
/// logged, so each call's `request_id` span reports its duration.
///
/// # Errors
///
/// Returns [`EbayError::ConfigError`] if a global subscriber is already set.
///
/// # Examples
///
/// ```no_run
/// use ebay_xml_client::observability::{LogFormat, init_observability};
///
/// init_observability(LogFormat::from_env())?;
/// # Ok::<(), ebay_xml_client::EbayError>(())
/// ```
pub fn init_observability(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Pretty => subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogFormat::Json => subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(io::stderr),
            )
            .try_init(),
    };

    installed.map_err(|e| EbayError::ConfigError(format!("cannot install subscriber: {e}")))
}
