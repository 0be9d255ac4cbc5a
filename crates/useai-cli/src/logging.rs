//! Tracing setup for the binary

use std::io;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` when verbose.
pub(crate) fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_target(false);

    // A second init (tests) keeps the first subscriber
    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}
