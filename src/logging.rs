//! Logger bootstrap shared by the demo binary and tests.
use env_logger::{Builder, Env};

/// Filter applied when `RUST_LOG` is unset.
const QUIET_FILTER: &str = "info";
/// Verbose filter: mover decisions at `debug`, everything else at `info`.
const VERBOSE_FILTER: &str = "info,gridstep=debug";

/// Filter directives used when `RUST_LOG` is unset.
///
/// Verbose output is limited to this crate so engine chatter stays quiet.
#[must_use]
pub const fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        QUIET_FILTER
    }
}

/// Installs an env_logger with millisecond timestamps.
///
/// `RUST_LOG` wins when set. When `verbose` is on, every accepted, ignored
/// and blocked intent is logged. Repeated calls keep the first logger.
pub fn init(verbose: bool) {
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter(verbose)));
    builder.format_timestamp_millis();

    if builder.try_init().is_err() {
        log::debug!("logger already installed");
    }
}
