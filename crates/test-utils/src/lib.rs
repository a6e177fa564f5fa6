pub mod builders;

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Route resolver and loader events into the test harness output.
///
/// Reads the same `FLOWDAG_LOG` variable as the binary, as a full filter
/// directive (`FLOWDAG_LOG=flowdag::dag=debug`). Defaults to `warn` so the
/// repeated-dependency warnings stay visible on failing tests.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("FLOWDAG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .compact()
            .try_init()
            .ok();
    });
}
