//! Opt-in tracing setup.
//!
//! The library itself only emits `tracing` events; nothing is printed
//! unless the host application installs a subscriber. [`init`] wires up a
//! formatted subscriber filtered by `RUST_LOG` for binaries and ad-hoc
//! experiments that do not bring their own.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install a formatted `tracing` subscriber honoring `RUST_LOG`.
///
/// Defaults to `warn,hebg=info` when `RUST_LOG` is unset or invalid.
/// Returns whether this call installed the subscriber; if one is already
/// installed (by an earlier call or by the host), it is left in place.
pub fn init() -> bool {
    init_with_directives("warn,hebg=info")
}

/// Like [`init`], with explicit fallback filter directives.
pub fn init_with_directives(directives: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()
        .is_ok()
}
