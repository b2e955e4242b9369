use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::PathBuf,
    sync::Mutex,
};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    config::{env_u64, non_empty},
    errors::Error,
    Result,
};

/// Where the log file lives and how it rotates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogSettings {
    pub file: PathBuf,
    /// Rotate once the file would exceed this size. `0` disables rotation.
    pub max_bytes: u64,
    pub backup_count: usize,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("logger.log"),
            max_bytes: 50_000_000,
            backup_count: 5,
        }
    }
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_lookup(get: &impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            file: get("LOG_FILE")
                .and_then(non_empty)
                .map(PathBuf::from)
                .unwrap_or(defaults.file),
            max_bytes: env_u64(get, "LOG_MAX_BYTES").unwrap_or(defaults.max_bytes),
            backup_count: env_u64(get, "LOG_BACKUP_COUNT")
                .map(|n| n as usize)
                .unwrap_or(defaults.backup_count),
        }
    }
}

/// Initialize tracing: stderr plus a size-rotated log file.
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn init(service_name: &str, settings: &LogSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("info,hwb_core=info,{service_name}=info"))
    });

    let file = RotatingFile::open(
        settings.file.clone(),
        settings.max_bytes,
        settings.backup_count,
    )?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(true)
                .with_writer(io::stderr),
        )
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| Error::External(format!("logging init failed: {e}")))?;

    Ok(())
}

/// Append-only log file that rolls over to `file.1 .. file.N` by size.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backup_count: usize,
    file: File,
    written: u64,
}

impl RotatingFile {
    pub fn open(path: PathBuf, max_bytes: u64, backup_count: usize) -> io::Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes,
            backup_count,
            file,
            written,
        })
    }

    fn backup_path(&self, n: usize) -> PathBuf {
        let mut s = self.path.clone().into_os_string();
        s.push(format!(".{n}"));
        PathBuf::from(s)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.backup_count > 0 {
            for n in (1..self.backup_count).rev() {
                let from = self.backup_path(n);
                if from.exists() {
                    fs::rename(&from, self.backup_path(n + 1))?;
                }
            }
            fs::rename(&self.path, self.backup_path(1))?;
        }
        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.max_bytes > 0 && self.written > 0 && self.written + buf.len() as u64 > self.max_bytes
        {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
