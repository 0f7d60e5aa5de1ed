//! Tracing subscriber setup shared by the binaries.

use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{CommonError, CommonResult};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` (e.g. "info", "debug") is
/// used as the filter directive.
pub fn init_tracing(level: &str, json: bool) -> CommonResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = fmt().with_env_filter(filter).with_target(true).with_level(true);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| CommonError::Logging(e.to_string()))
}
