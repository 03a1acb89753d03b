// Write log entries to JSON lines files with automatic size/time based rotation.
// Each entry appends a single ND-JSON line. When the current file exceeds the
// configured size or max age, a new file with a timestamp suffix is created.

use crate::domain::{LogEntry, ProviderAttributes};
use crate::engine::LogContext;
use crate::error::LoggingError;
use crate::port::{LoggingProvider, ProviderFuture};
use chrono::{DateTime, Duration as ChronoDuration, Local};
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

const PATH_ATTRIBUTE: &str = "path";
const MAX_SIZE_ATTRIBUTE: &str = "maxSizeMb";
const MAX_AGE_ATTRIBUTE: &str = "maxAgeHours";

const DEFAULT_MAX_SIZE_MB: u64 = 10; // 10 MB
const DEFAULT_MAX_AGE_HOURS: i64 = 12; // 12 h

/// Current file handle and its creation time
struct Inner {
    file: File,
    created_at: DateTime<Local>,
}

pub struct JsonFileProvider {
    directory: PathBuf,
    base_name: String,
    inner: Mutex<Option<Inner>>,
    max_size_bytes: u64,
    max_age: ChronoDuration,
}

impl Default for JsonFileProvider {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            base_name: "logs".to_string(),
            inner: Mutex::new(None),
            max_size_bytes: DEFAULT_MAX_SIZE_MB * 1024 * 1024,
            max_age: ChronoDuration::hours(DEFAULT_MAX_AGE_HOURS),
        }
    }
}

impl JsonFileProvider {
    /// Split `file_path` into the rotation directory and file stem.
    fn set_path(&mut self, file_path: &str) {
        let path = Path::new(file_path);
        self.directory = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();
        self.base_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "logs".to_string());
    }

    async fn open_new_log_file(dir: &Path, base_name: &str) -> std::io::Result<File> {
        tokio::fs::create_dir_all(dir).await?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S_%3f");
        let filename = format!("{base_name}_{timestamp}.json");

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(filename))
            .await
    }

    async fn rotate_if_needed(&self, inner: &mut Inner) -> std::io::Result<()> {
        let metadata = inner.file.metadata().await?;
        let need_rotate_size = metadata.len() >= self.max_size_bytes;
        let need_rotate_time = Local::now() - inner.created_at >= self.max_age;

        if need_rotate_size || need_rotate_time {
            inner.file.flush().await?;
            inner.file.sync_data().await?;

            inner.file = Self::open_new_log_file(&self.directory, &self.base_name).await?;
            inner.created_at = Local::now();
        }

        Ok(())
    }

    async fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut guard = self.inner.lock().await;
        let current = match guard.take() {
            Some(inner) => inner,
            None => Inner {
                file: Self::open_new_log_file(&self.directory, &self.base_name).await?,
                created_at: Local::now(),
            },
        };
        let inner = guard.insert(current);

        inner.file.write_all(line.as_bytes()).await?;
        inner.file.write_all(b"\n").await?;
        inner.file.flush().await?;

        self.rotate_if_needed(inner).await?;
        inner.file.sync_data().await
    }

    pub async fn export(&self, entry: &LogEntry) -> Result<(), LoggingError> {
        let json = serde_json::to_string(entry)
            .map_err(|e| LoggingError::Transport(format!("Failed to serialize entry: {e}")))?;
        self.write_line(&json).await.map_err(|e| {
            LoggingError::Transport(format!(
                "Failed to write entry to {}: {e}",
                self.directory.display()
            ))
        })
    }
}

impl LoggingProvider for JsonFileProvider {
    fn default_description(&self) -> &'static str {
        "JSON lines file logging provider"
    }

    fn initialize(
        &mut self,
        name: &str,
        attributes: &mut ProviderAttributes,
    ) -> Result<(), LoggingError> {
        let path = attributes.take_required(PATH_ATTRIBUTE, name)?;
        self.set_path(&path);

        let max_size_mb: u64 = attributes.take_parsed(MAX_SIZE_ATTRIBUTE, name, DEFAULT_MAX_SIZE_MB)?;
        let max_age_hours: i64 =
            attributes.take_parsed(MAX_AGE_ATTRIBUTE, name, DEFAULT_MAX_AGE_HOURS)?;
        if max_size_mb == 0 || max_age_hours <= 0 {
            return Err(LoggingError::Configuration(format!(
                "Attributes '{MAX_SIZE_ATTRIBUTE}' and '{MAX_AGE_ATTRIBUTE}' of provider '{name}' must be positive."
            )));
        }

        let out_of_range = |key: &str| {
            LoggingError::Configuration(format!(
                "Attribute '{key}' of provider '{name}' is out of range."
            ))
        };
        self.max_size_bytes = max_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| out_of_range(MAX_SIZE_ATTRIBUTE))?;
        self.max_age =
            ChronoDuration::try_hours(max_age_hours).ok_or_else(|| out_of_range(MAX_AGE_ATTRIBUTE))?;
        Ok(())
    }

    fn log<'a>(&'a self, entry: &'a LogEntry, _ctx: LogContext<'a>) -> ProviderFuture<'a> {
        Box::pin(async move {
            self.export(entry).await?;
            Ok(None)
        })
    }
}
