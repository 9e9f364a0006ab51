use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Starts logging to daily-rotated files under `logs/` (5 kept), echoing
/// everything to stdout and warnings to stderr. `RUST_LOG` overrides
/// `base_level`. The returned guard flushes the file writer on drop and must
/// stay alive for the lifetime of the program.
pub fn setup_logging(base_level: &str) -> anyhow::Result<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(base_level))?;

    std::fs::create_dir_all("logs")?;
    let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .filename_prefix("skydome")
        .filename_suffix("log")
        .max_log_files(5)
        .build("logs")?;
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_writer = std::io::stdout.and(std::io::stderr.with_min_level(Level::WARN));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_ansi(true)
        .with_writer(console_writer);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
