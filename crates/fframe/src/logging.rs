//! Tracing subscriber setup.
//!
//! The join engine logs through `tracing`; nothing is printed until a
//! subscriber is installed. Filtering follows `RUST_LOG` (e.g.
//! `RUST_LOG=fframe_join=debug`) and defaults to `warn`.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy()
}

/// Install a global formatting subscriber.
///
/// Returns `false` if another global subscriber was already installed.
pub fn init() -> bool {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter())
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).is_ok()
}

/// Like [`init`], but writes through the test harness capture. Safe to call
/// from every test.
pub fn init_for_tests() {
    let subscriber = FmtSubscriber::builder()
        .with_test_writer()
        .with_env_filter(env_filter())
        .with_file(true)
        .with_line_number(true)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init_for_tests();
        init_for_tests();
        assert!(!init(), "case=second_global_subscriber");
    }
}
