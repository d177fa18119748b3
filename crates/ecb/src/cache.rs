//! Day-scoped storage for the raw daily rate document.
//!
//! The ECB publishes one table per working day, so a document fetched today
//! stays valid until the date changes. Entries are keyed by that date.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::sync::Cache;
use thiserror::Error;
use tracing::{debug, info};

/// Prefix of every cache file name.
const FILE_PREFIX: &str = "mc_data_";

/// Suffix of every cache file name.
const FILE_SUFFIX: &str = ".txt";

/// Date layout between the prefix and the suffix.
const DATE_LAYOUT: &str = "%Y%m%d";

/// Days kept by the in-memory cache.
const DEFAULT_MEMORY_CAPACITY: u64 = 7;

/// Time-to-live of an in-memory entry (one day).
const DEFAULT_MEMORY_TTL_SECS: u64 = 24 * 60 * 60;

/// Errors raised by a cache backend.
#[derive(Debug, Error)]
pub enum CacheError {
    /// An entry exists but could not be read.
    #[error("couldn't read cache file {}: {source}", path.display())]
    Read {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An entry could not be stored.
    #[error("couldn't write cache file {}: {source}", path.display())]
    Write {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An entry could not be removed.
    #[error("cache deletion error for {}: {source}", path.display())]
    Delete {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Storage for the raw rate document of a given day.
pub trait RateCache {
    /// Returns the document stored for `day`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Read`] if the backend fails for a reason other
    /// than the entry being absent.
    fn get(&self, day: NaiveDate) -> Result<Option<Vec<u8>>, CacheError>;

    /// Stores the document for `day`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Write`] if the backend fails.
    fn put(&self, day: NaiveDate, data: &[u8]) -> Result<(), CacheError>;

    /// Removes every stored document, whatever its day.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Delete`] on the first entry that cannot be removed.
    fn clear(&self) -> Result<(), CacheError>;
}

impl<C: RateCache + ?Sized> RateCache for Box<C> {
    fn get(&self, day: NaiveDate) -> Result<Option<Vec<u8>>, CacheError> {
        (**self).get(day)
    }

    fn put(&self, day: NaiveDate, data: &[u8]) -> Result<(), CacheError> {
        (**self).put(day, data)
    }

    fn clear(&self) -> Result<(), CacheError> {
        (**self).clear()
    }
}

/// One file per day, named `mc_data_YYYYMMDD.txt`, in a directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Creates a cache rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory holding the cache files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file used for `day`.
    #[must_use]
    pub fn path_for(&self, day: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{FILE_PREFIX}{}{FILE_SUFFIX}", day.format(DATE_LAYOUT)))
    }
}

fn is_cache_file(name: &str) -> bool {
    name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX)
}

impl RateCache for FileCache {
    fn get(&self, day: NaiveDate) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.path_for(day);
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::Read { path, source }),
        }
    }

    fn put(&self, day: NaiveDate, data: &[u8]) -> Result<(), CacheError> {
        let path = self.path_for(day);

        fs::create_dir_all(&self.dir).map_err(|source| CacheError::Write {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, data).map_err(|source| CacheError::Write {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), bytes = data.len(), "Cached daily rates");
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                return Err(CacheError::Delete {
                    path: self.dir.clone(),
                    source,
                });
            }
        };

        let mut removed = 0usize;
        for entry in entries {
            let entry = entry.map_err(|source| CacheError::Delete {
                path: self.dir.clone(),
                source,
            })?;

            let name = entry.file_name();
            if !name.to_str().is_some_and(is_cache_file) {
                continue;
            }

            let path = entry.path();
            fs::remove_file(&path).map_err(|source| CacheError::Delete { path, source })?;
            removed += 1;
        }

        info!(dir = %self.dir.display(), removed, "Cleared rate cache");
        Ok(())
    }
}

/// In-process cache backed by Moka, for long-running hosts.
#[derive(Clone)]
pub struct MemoryCache {
    cache: Cache<NaiveDate, Arc<Vec<u8>>>,
}

impl MemoryCache {
    /// Creates a cache keeping a week of documents for one day each.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_MEMORY_CAPACITY, DEFAULT_MEMORY_TTL_SECS)
    }

    /// Creates a cache with a custom capacity (in days) and time-to-live.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

impl RateCache for MemoryCache {
    fn get(&self, day: NaiveDate) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.cache.get(&day).map(|data| data.to_vec()))
    }

    fn put(&self, day: NaiveDate, data: &[u8]) -> Result<(), CacheError> {
        self.cache.insert(day, Arc::new(data.to_vec()));
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.cache.invalidate_all();
        Ok(())
    }
}

/// A cache that stores nothing; every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl RateCache for NoCache {
    fn get(&self, _day: NaiveDate) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    fn put(&self, _day: NaiveDate, _data: &[u8]) -> Result<(), CacheError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
