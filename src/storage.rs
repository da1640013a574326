//! Storage layer for tb
//!
//! All state lives in a single per-user data directory:
//!
//! ```text
//! <data-dir>/
//!   tb.toml         # configuration
//!   boards.json     # boards -> lists -> tasks, all users
//!   users.json      # registered users
//!   codes.jsonl     # issued login codes
//!   session         # id of the signed-in user
//! ```
//!
//! The directory defaults to the platform data dir and can be overridden
//! with `--data-dir` or `TB_DATA_DIR`. Registry files are rewritten
//! atomically (temp + rename) while holding an advisory lock, so concurrent
//! invocations never observe partial writes.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "TB_DATA_DIR";

const CONFIG_FILE: &str = "tb.toml";
const BOARDS_FILE: &str = "boards.json";
const USERS_FILE: &str = "users.json";
const CODES_FILE: &str = "codes.jsonl";
const SESSION_FILE: &str = "session";

/// Storage manager for tb state
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    /// Create a storage manager rooted at the given directory
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Resolve the data directory: explicit flag, then `TB_DATA_DIR`,
    /// then the platform data directory.
    pub fn resolve(flag: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = flag {
            return Ok(Self::new(dir));
        }

        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                return Ok(Self::new(PathBuf::from(trimmed)));
            }
        }

        let dirs = ProjectDirs::from("", "", "tb").ok_or_else(|| {
            Error::OperationFailed("could not determine a data directory".to_string())
        })?;
        Ok(Self::new(dirs.data_dir().to_path_buf()))
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    /// Path to the data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path to the configuration file
    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    /// Path to the board graph
    pub fn boards_file(&self) -> PathBuf {
        self.data_dir.join(BOARDS_FILE)
    }

    /// Path to the user registry
    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join(USERS_FILE)
    }

    /// Path to the login codes file (JSONL format)
    pub fn codes_file(&self) -> PathBuf {
        self.data_dir.join(CODES_FILE)
    }

    /// Path to the session file
    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Create the data directory and touch the codes file
    pub fn init_all(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;

        let codes_file = self.codes_file();
        if !codes_file.exists() {
            File::create(&codes_file)?;
        }

        Ok(())
    }

    /// Check if storage has been initialized
    ///
    /// The codes file doubles as the init marker: a directory that merely
    /// exists (a fresh tempdir, the platform default) does not count.
    pub fn is_initialized(&self) -> bool {
        self.data_dir.exists() && self.codes_file().exists()
    }

    /// Error with a `tb init` hint unless the data directory exists
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(Error::NotInitialized(self.data_dir.clone()))
        }
    }

    // =========================================================================
    // File I/O helpers
    // =========================================================================

    /// Write JSON data atomically (write to temp, then rename)
    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        lock::write_atomic(path, json.as_bytes())
    }

    /// Read JSON data from a file
    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        let data: T = serde_json::from_str(&content)?;
        Ok(data)
    }

    /// Read JSON data, falling back to a default when the file is absent
    pub fn read_json_or_default<T>(&self, path: &Path) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        if !path.exists() {
            return Ok(T::default());
        }
        self.read_json(path)
    }

    /// Read all records from a JSONL file
    pub fn read_jsonl<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: T = serde_json::from_str(&line)?;
            records.push(record);
        }

        Ok(records)
    }

    /// Save all records to a JSONL file (overwrites, atomic)
    pub fn save_jsonl<T: Serialize>(&self, path: &Path, records: &[T]) -> Result<()> {
        let mut buf = Vec::new();
        for record in records {
            serde_json::to_writer(&mut buf, record)?;
            writeln!(buf)?;
        }
        lock::write_atomic(path, &buf)
    }

    /// Locked read-mutate-write over a JSON registry file
    ///
    /// The mutator runs while an advisory lock on `<file>.lock` is held; the
    /// registry is rewritten atomically before the lock is released.
    pub fn update_json<T, R, F>(&self, path: &Path, f: F) -> Result<R>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T) -> Result<R>,
    {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let lock_path = registry_lock_path(path);
        let _lock = FileLock::acquire(&lock_path, DEFAULT_LOCK_TIMEOUT_MS)?;

        let mut registry: T = self.read_json_or_default(path)?;
        let result = f(&mut registry)?;

        let json = serde_json::to_string_pretty(&registry)?;
        lock::write_atomic(path, json.as_bytes())?;
        tracing::debug!(path = %path.display(), "registry updated");

        Ok(result)
    }

    // =========================================================================
    // Session persistence
    // =========================================================================

    /// Read the id of the signed-in user, if any
    pub fn read_session(&self) -> Option<String> {
        let path = self.session_file();
        fs::read_to_string(&path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Persist the id of the signed-in user
    pub fn write_session(&self, user_id: &str) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        lock::write_atomic(&self.session_file(), user_id.as_bytes())
    }

    /// Remove the session; returns whether one existed
    pub fn clear_session(&self) -> Result<bool> {
        let path = self.session_file();
        if path.exists() {
            fs::remove_file(&path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

fn registry_lock_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.lock", path.display()))
}
