//! Tracing subscriber setup

use std::path::Path;
use std::time::Duration;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::schema::LoggingConfig;

/// Prefix of the rolling log files, `mom.log.YYYY-MM-DD`
const LOG_FILE_PREFIX: &str = "mom.log";

/// Initialize the logging system
///
/// `RUST_LOG` and `LOG_FORMAT` take precedence over the config values. The
/// returned guard flushes the file writer on drop and must be kept alive.
pub fn init_logging(config: &LoggingConfig) -> WorkerGuard {
    let filter = build_filter(config);

    let format_str = std::env::var("LOG_FORMAT").unwrap_or_else(|_| config.format.clone());
    let is_json = format_str.eq_ignore_ascii_case("json");

    let file_appender = tracing_appender::rolling::daily(&config.dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let stdout_layer = fmt_layer(std::io::stdout, is_json, true);
    let file_layer = fmt_layer(non_blocking, is_json, false);

    // try_init so a second call (e.g. from tests) does not panic
    if Registry::default()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Global tracing subscriber already set; keeping the existing one");
    }

    if let Err(e) = cleanup_old_logs(&config.dir, config.retention_days) {
        eprintln!("Failed to clean up old logs: {}", e);
    }

    guard
}

/// Build one fmt layer; the format is chosen at runtime, so it is boxed
fn fmt_layer<S, W>(writer: W, is_json: bool, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    if is_json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

/// Build the level filter from `RUST_LOG` or the config, plus module overrides
fn build_filter(config: &LoggingConfig) -> EnvFilter {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    for (module, level) in &config.overrides {
        match format!("{}={}", module, level).parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(_) => eprintln!("Invalid log directive: {}={}", module, level),
        }
    }

    filter
}

/// Remove rolled log files older than `days` days
fn cleanup_old_logs(dir: &str, days: u64) -> std::io::Result<usize> {
    let path = Path::new(dir);
    if !path.exists() {
        return Ok(0);
    }

    let now = std::time::SystemTime::now();
    // Saturate so huge retention values mean "keep everything".
    let threshold = Duration::from_secs(days.saturating_mul(24 * 3600));
    let mut removed = 0;

    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let is_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX));
        if !is_log {
            continue;
        }

        let age = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok());
        if age.is_some_and(|age| age > threshold) {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => eprintln!("Failed to remove old log file {:?}: {}", path, e),
            }
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cleanup_missing_dir_is_noop() {
        let removed = cleanup_old_logs("/nonexistent/mom-logs", 7).unwrap();
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_cleanup_keeps_recent_and_foreign_files() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("mom.log.2026-01-01"), "recent").unwrap();
        std::fs::write(temp_dir.path().join("other.txt"), "keep").unwrap();

        let dir = temp_dir.path().to_str().unwrap();
        let removed = cleanup_old_logs(dir, 1).unwrap();

        assert_eq!(removed, 0);
        assert!(temp_dir.path().join("mom.log.2026-01-01").exists());
        assert!(temp_dir.path().join("other.txt").exists());
    }

    #[test]
    fn test_cleanup_with_huge_retention_keeps_files() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("mom.log.2026-01-01"), "old").unwrap();

        let dir = temp_dir.path().to_str().unwrap();
        let removed = cleanup_old_logs(dir, u64::MAX / 1000).unwrap();

        assert_eq!(removed, 0);
        assert!(temp_dir.path().join("mom.log.2026-01-01").exists());
    }

    #[test]
    fn test_fmt_layer_builds_text_and_json() {
        for is_json in [false, true] {
            let subscriber = Registry::default().with(fmt_layer(std::io::sink, is_json, false));
            tracing::subscriber::with_default(subscriber, || {
                tracing::info!(topic = "t", "published");
            });
        }
    }

    #[test]
    fn test_build_filter_skips_invalid_overrides() {
        let mut config = LoggingConfig::default();
        config
            .overrides
            .insert("mom_core::bus".to_string(), "debug".to_string());
        config
            .overrides
            .insert("bad module".to_string(), "=".to_string());

        let filter = build_filter(&config);
        assert!(filter.to_string().contains("mom_core::bus=debug"));
    }
}
