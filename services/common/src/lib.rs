//! Runtime plumbing shared by the Resplend services: tracing setup, typed
//! environment lookups, listener binding and shutdown handling.

use std::{
    env, fs, io,
    net::SocketAddr,
    panic,
    path::{Path, PathBuf},
    str::FromStr,
    thread,
    time::{Duration, SystemTime},
};
use tokio::net::TcpListener;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

const DEFAULT_LOG_DIR: &str = "/var/log/resplend";
const DEFAULT_LOG_FILTER: &str = "info";

/// Keeps the non-blocking file writer alive; drop it only at process exit.
pub struct TracingGuards {
    file_guard: Option<WorkerGuard>,
}

impl TracingGuards {
    pub fn file_logging(&self) -> bool {
        self.file_guard.is_some()
    }
}

/// Installs the global subscriber: stdout always, plus a daily rolling file
/// under `LOG_DIR/<service_name>` when that directory is writable.
pub fn init_tracing(service_name: &str) -> TracingGuards {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let log_root = env_opt("LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
        .join(service_name);
    let stdout_layer = fmt::layer().with_writer(io::stdout);

    let file_writer = open_log_file(&log_root, service_name);
    let guards = match file_writer {
        Some((writer, guard)) => {
            let subscriber = Registry::default()
                .with(filter)
                .with(stdout_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer));
            let _ = tracing::subscriber::set_global_default(subscriber);
            TracingGuards {
                file_guard: Some(guard),
            }
        }
        None => {
            let subscriber = Registry::default().with(filter).with(stdout_layer);
            let _ = tracing::subscriber::set_global_default(subscriber);
            TracingGuards { file_guard: None }
        }
    };

    if guards.file_logging() {
        let retention_days = env_or("LOG_RETENTION_DAYS", 14u64);
        let cleanup_interval = env_or("LOG_CLEANUP_INTERVAL_MINUTES", 360u64);
        spawn_log_cleanup(log_root.clone(), retention_days, cleanup_interval);
        tracing::debug!(dir = %log_root.display(), "file logging enabled");
    } else {
        tracing::debug!(dir = %log_root.display(), "file logging disabled");
    }

    guards
}

fn open_log_file(
    log_root: &Path,
    service_name: &str,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    fs::create_dir_all(log_root).ok()?;
    // The rolling appender panics when it cannot open its first file.
    let appender = panic::catch_unwind(|| {
        tracing_appender::rolling::daily(log_root, format!("{service_name}.log"))
    })
    .ok()?;
    Some(tracing_appender::non_blocking(appender))
}

/// Parses `key` from the environment, falling back to `default` when the
/// variable is missing or does not parse.
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env_opt(key)
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or(default)
}

/// Returns the trimmed value of `key`, treating blank values as unset.
pub fn env_opt(key: &str) -> Option<String> {
    non_blank(env::var(key).ok())
}

/// Normalizes an optional raw setting: trims it and drops it when empty.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn spawn_log_cleanup(log_root: PathBuf, retention_days: u64, cleanup_interval_minutes: u64) {
    if retention_days == 0 || cleanup_interval_minutes == 0 {
        return;
    }

    let retention = Duration::from_secs(retention_days * 24 * 60 * 60);
    let interval = Duration::from_secs(cleanup_interval_minutes * 60);

    thread::spawn(move || loop {
        if let Some(cutoff) = SystemTime::now().checked_sub(retention) {
            let removed = remove_logs_older_than(&log_root, cutoff);
            if removed > 0 {
                tracing::info!(removed, "expired log files removed");
            }
        }
        thread::sleep(interval);
    });
}

fn remove_logs_older_than(root: &Path, cutoff: SystemTime) -> usize {
    let Ok(entries) = fs::read_dir(root) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            removed += remove_logs_older_than(&path, cutoff);
            continue;
        }
        let modified = fs::metadata(&path).and_then(|metadata| metadata.modified());
        match modified {
            Ok(modified) if modified < cutoff => {
                if fs::remove_file(&path).is_ok() {
                    removed += 1;
                }
            }
            _ => {}
        }
    }
    removed
}

/// Binds on all interfaces so the service is reachable inside containers.
pub async fn bind_listener(port: u16) -> io::Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    Ok(listener)
}

/// Resolves on ctrl-c, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "sigterm handler unavailable");
                ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
    }

    tracing::info!("shutdown signal received");
}
