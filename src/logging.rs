//! Logger setup, shared by the CLI and by integration tests that want
//! readable output when run with `--nocapture`.

use std::env;

use log::LevelFilter;

/// Initializes the process-wide logger.
///
/// Reads `RUST_LOG` to pick the level filter; defaults to `Info` when the
/// variable is unset or unparsable. Timestamps are disabled since the
/// simulation's own log lines already carry enough context (component
/// name, order id) to read a trace without them.
pub fn init_logger() {
    let _ = env_logger::builder()
        .filter(
            None,
            env::var("RUST_LOG")
                .unwrap_or_default()
                .parse::<LevelFilter>()
                .unwrap_or(LevelFilter::Info),
        )
        .format_timestamp(None)
        .is_test(cfg!(test))
        .try_init();
}
