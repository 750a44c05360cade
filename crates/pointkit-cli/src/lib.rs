//! # pointkit-cli
//!
//! Thin binary drivers around the `pointkit-core` kernels: each binary
//! reads one kernel's wire format from stdin, runs the kernel, and
//! writes the wire format back to stdout. All three binaries share the
//! same logging setup and the same error-to-exit-code dispatch (§7, §10.2).

use std::io;

use pointkit_core::KernelError;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

/// Initialize the stderr logging subscriber. `RUST_LOG` controls
/// verbosity; the default is warnings and errors only, so a quiet
/// invocation produces no stderr noise on success.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Run `kernel`, which is responsible for writing its own success output
/// to stdout, and turn any `KernelError` it returns into the
/// write-empty-result / exit-code behavior from §7.
///
/// Returns the process exit code; callers pass it to `std::process::exit`.
pub fn run(kernel: impl FnOnce() -> Result<(), KernelError>) -> i32 {
    match kernel() {
        Ok(()) => 0,
        Err(err) => {
            let outcome = err.outcome();
            if outcome.write_empty_result {
                if let Err(write_err) = pointkit_core::framing::write_empty_result(&mut io::stdout()) {
                    error!(%write_err, "failed to write best-effort empty result");
                }
            }
            if outcome.exit_code == 0 {
                warn!(%err, "validation rejected input");
            } else {
                error!(%err, "kernel failed");
            }
            outcome.exit_code
        }
    }
}
