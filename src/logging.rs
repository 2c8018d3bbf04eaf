//! Tracing subscriber setup for the `move-txn` binary.

use tracing_subscriber::EnvFilter;

/// Install a stderr fmt subscriber. `RUST_LOG` wins when set; otherwise the
/// level is `info`, or `debug` for this workspace's crates with `verbose`.
/// Safe to call more than once; later calls are no-ops.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "info,move_txn=debug,move_txn_core=debug,move_txn_transport=debug,move_txn_tools=debug"
    } else {
        "info"
    }
}
