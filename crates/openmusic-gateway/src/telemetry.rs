use tracing_subscriber::EnvFilter;

use crate::cli::LogFormatArg;

/// Installs the global subscriber. `RUST_LOG` overrides the default `info`
/// filter. Later calls are no-ops.
pub fn init(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let _ = match format {
        LogFormatArg::Text => builder.try_init(),
        LogFormatArg::Json => builder.json().with_target(false).try_init(),
    };
}
