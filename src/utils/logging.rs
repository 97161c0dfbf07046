use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

/// Log files are named `hourtrack.<date>` inside the `logs` directory.
pub const LOG_FILE_PREFIX: &str = "hourtrack";
const LOG_DIR: &str = "logs";
const KEPT_LOG_FILES: usize = 5;
const DEFAULT_LEVEL: &str = "info";

/// Where logs are written and how much of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub dir: PathBuf,
    /// Either a bare level for this crate or a full filter such as `hourtrack=debug,tokio=warn`.
    pub filter: String,
    /// Events at or above this level are echoed to stderr as well.
    pub echo: Option<LevelFilter>,
}

impl LogSettings {
    /// An explicit `log_level` wins over `RUST_LOG`, which wins over `info`. Only an explicit
    /// level echoes to stderr, stdout stays reserved for command output.
    pub fn new(
        application_data_path: &Path,
        log_level: Option<LevelFilter>,
        rust_log: Option<String>,
    ) -> Self {
        let filter = match (log_level, rust_log) {
            (Some(level), _) => level.to_string(),
            (None, Some(env)) if !env.trim().is_empty() => env,
            _ => DEFAULT_LEVEL.to_owned(),
        };
        Self {
            dir: application_data_path.join(LOG_DIR),
            filter,
            echo: log_level,
        }
    }

    fn directive(&self) -> String {
        if self.filter.contains('=') {
            self.filter.clone()
        } else {
            format!("{}={}", env!("CARGO_CRATE_NAME"), self.filter)
        }
    }
}

pub fn enable_logging(settings: &LogSettings) -> Result<()> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(KEPT_LOG_FILES)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(&settings.dir)?;

    let echo = settings.echo;
    let stderr =
        std::io::stderr.with_filter(move |meta| echo.is_some_and(|level| level >= *meta.level()));

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(settings.directive()))
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(false)
        .with_writer(stderr.and(appender))
        .pretty()
        .init();
    Ok(())
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});
