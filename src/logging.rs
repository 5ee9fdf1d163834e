//! Diagnostic logging.
//!
//! User-facing output goes to stdout with `println!`; diagnostics go
//! through `tracing` to stderr so they never mix with listings or HTML.
//! `RUST_LOG` overrides the default level.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber. Call once near the start of `main`.
///
/// `verbose` raises the default level from `info` to `debug` for this crate.
/// A second call is a no-op.
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "portal_dash=debug,portal=debug,info"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);

    let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_noop() {
        init_tracing(false);
        init_tracing(true);
        tracing::debug!("still usable");
    }
}
