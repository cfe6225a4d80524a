//! Subscriber setup for the `solidago` binary and for tests.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "SOLIDAGO_LOG";

/// Phase boundaries only: trust, voting rights, per-criterion status.
pub const DEFAULT_FILTER: &str = "solidago=info";

static INIT: Once = Once::new();

/// Installs a stderr subscriber filtered by `SOLIDAGO_LOG`.
///
/// Every crate logs under its own target, so one phase can be inspected
/// without the others, e.g. `SOLIDAGO_LOG=solidago=info,solidago_learning=debug`
/// shows each user's GBT solve. Thread ids identify the rayon worker that
/// handled a criterion.
///
/// Only the first call has an effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}
