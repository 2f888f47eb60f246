//! Tracing setup for embedders and test runs.
//!
//! The subscriber is only installed when `RUST_LOG` is set, so normal
//! library use pays nothing. All output goes to stderr so it never
//! interferes with whatever the host writes to stdout.

use once_cell::sync::OnceCell;

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Install the global tracing subscriber, at most once per process.
///
/// Does nothing when `RUST_LOG` is unset. Safe to call from every test;
/// repeat calls are no-ops.
pub fn init_tracing() {
    INSTALLED.get_or_init(|| {
        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    });
}
