use crate::error::ConfigError;
use crate::settings::LoggingSettings;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const LOG_FILE_PREFIX: &str = "journal.log";

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `logging.level` when it is set. Output goes to stderr so it
/// never mixes with reports printed on stdout, or to a daily rolling file when
/// `logging.directory` is configured.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.to_ascii_lowercase()));
    let builder = FmtSubscriber::builder().with_env_filter(filter);

    let installed = match (&settings.directory, settings.json) {
        (Some(dir), true) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            tracing::subscriber::set_global_default(builder.json().with_writer(appender).finish())
        }
        (Some(dir), false) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            tracing::subscriber::set_global_default(
                builder.with_ansi(false).with_writer(appender).finish(),
            )
        }
        (None, true) => tracing::subscriber::set_global_default(
            builder.json().with_writer(std::io::stderr).finish(),
        ),
        (None, false) => tracing::subscriber::set_global_default(
            builder.with_writer(std::io::stderr).finish(),
        ),
    };

    installed.map_err(|e| ConfigError::Logging(e.to_string()))
}
