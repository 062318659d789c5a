use std::path::Path;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Level used before the configuration (and its `logging.level`) is known
const BOOTSTRAP_LEVEL: &str = "info";

/// Run `f` under a console subscriber, so that messages emitted while the
/// configuration is loaded are not dropped. `RUST_LOG` is honoured.
pub fn with_bootstrap_logging<T>(f: impl FnOnce() -> T) -> T {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(BOOTSTRAP_LEVEL));
    tracing::subscriber::with_default(bootstrap_subscriber(filter, std::io::stderr), f)
}

pub(crate) fn bootstrap_subscriber<W>(
    filter: EnvFilter,
    make_writer: W,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    fmt().with_env_filter(filter).with_writer(make_writer).finish()
}

/// Console logging, plus a daily-rolling file when `logging.file` is set.
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter).with(fmt::layer());

    match &config.file {
        Some(file) => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .map(|name| name.to_os_string())
                .unwrap_or_else(|| "lens-relay.log".into());

            let appender = tracing_appender::rolling::daily(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry.with(fmt::layer().with_ansi(false).with_writer(writer)).init();
            Some(guard)
        },
        None => {
            registry.init();
            None
        },
    }
}
