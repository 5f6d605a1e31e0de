//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "RIPPLE_LOG";

/// Initialize the Ripple tracing/logging system.
///
/// Reads `RIPPLE_LOG` for per-subsystem log levels, e.g.
/// `RIPPLE_LOG=ripple_analysis::call_graph=debug,ripple_analysis::dependency=info`.
///
/// Falls back to `ripple=info` if `RIPPLE_LOG` is unset or invalid.
/// Calling it more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new("ripple=info"));

        // A host application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
