//! Cross-process directory lock.
//!
//! A [`DirectoryLock`] holds an exclusive advisory lock on a sentinel file
//! (`session.lock`) inside a data directory. Only one holder, in any
//! process, can own the lock at a time. The lock and the open file handle
//! are released together when the value is dropped.
//!
//! Acquisition never blocks and never retries: contention is reported
//! immediately as [`LockError::LockHeld`], which callers can tell apart from
//! [`LockError::Io`] (permissions, disk full, a file where the directory
//! should be, ...).

use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, trace};

use crate::error::{LockError, LockResult};

/// Exclusive lock over a data directory, released on drop.
#[derive(Debug)]
pub struct DirectoryLock {
    directory: PathBuf,
    lock_file_path: PathBuf,
    /// `None` once the lock has been released.
    file: Option<File>,
}

impl DirectoryLock {
    /// Name of the sentinel file created inside the locked directory.
    pub const LOCK_FILE_NAME: &'static str = "session.lock";

    /// Diagnostic marker written into the sentinel file.
    const MARKER: &'static str = "☃";

    /// Acquire the lock on `directory`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::LockHeld`] if another holder owns the lock, or
    /// [`LockError::Io`] if the directory or sentinel file cannot be created,
    /// opened, or written.
    pub fn acquire(directory: impl AsRef<Path>) -> LockResult<Self> {
        let directory = directory.as_ref().to_path_buf();
        let lock_file_path = directory.join(Self::LOCK_FILE_NAME);

        std::fs::create_dir_all(&directory).map_err(|source| LockError::Io {
            path: directory.clone(),
            source,
        })?;

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&lock_file_path)
            .map_err(|source| LockError::Io {
                path: lock_file_path.clone(),
                source,
            })?;

        if let Err(e) = file.try_lock_exclusive() {
            if is_contended(&e) {
                debug!(directory = %directory.display(), "Directory lock is held elsewhere");
                return Err(LockError::LockHeld { path: directory });
            }
            return Err(LockError::Io {
                path: lock_file_path,
                source: e,
            });
        }

        // From here on `lock` owns the handle, so an error below still
        // releases the OS lock through `Drop`.
        let mut lock = Self {
            directory,
            lock_file_path,
            file: Some(file),
        };
        lock.write_marker().map_err(|source| LockError::Io {
            path: lock.lock_file_path.clone(),
            source,
        })?;

        debug!(directory = %lock.directory.display(), "Acquired directory lock");
        Ok(lock)
    }

    /// Check whether `directory` is currently locked by another holder.
    ///
    /// Performs a transient acquisition that is released before returning,
    /// so checking never leaves a lock behind.
    ///
    /// # Errors
    ///
    /// Propagates [`LockError::Io`] from the check; contention is reported as
    /// `Ok(true)`.
    pub fn is_locked(directory: impl AsRef<Path>) -> LockResult<bool> {
        match Self::acquire(directory) {
            Ok(lock) => {
                lock.release();
                Ok(false)
            },
            Err(LockError::LockHeld { .. }) => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// The locked directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.directory
    }

    /// Full path of the sentinel file.
    #[must_use]
    pub fn lock_file_path(&self) -> &Path {
        &self.lock_file_path
    }

    /// Release the lock now instead of waiting for the value to drop.
    pub fn release(mut self) {
        self.unlock();
    }

    fn write_marker(&mut self) -> io::Result<()> {
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(Self::MARKER.as_bytes())?;
        file.flush()
    }

    fn unlock(&mut self) {
        if let Some(file) = self.file.take() {
            // Name the trait explicitly: newer std has an inherent `File::unlock`.
            let _ = <File as FileExt>::unlock(&file);
            trace!(directory = %self.directory.display(), "Released directory lock");
        }
    }
}

impl Drop for DirectoryLock {
    fn drop(&mut self) {
        self.unlock();
    }
}

/// Whether a failed `try_lock_exclusive` means "someone else holds it".
fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || (err.raw_os_error().is_some()
            && err.raw_os_error() == fs2::lock_contended_error().raw_os_error())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn acquire_creates_directory_and_sentinel() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("world");

        let lock = DirectoryLock::acquire(&dir).unwrap();

        assert!(dir.is_dir());
        assert!(lock.lock_file_path().is_file());
        assert_eq!(lock.path(), dir.as_path());
        assert_eq!(
            lock.lock_file_path(),
            dir.join(DirectoryLock::LOCK_FILE_NAME).as_path()
        );
    }

    #[test]
    fn sentinel_contains_marker() {
        let tmp = TempDir::new().unwrap();
        let lock = DirectoryLock::acquire(tmp.path()).unwrap();

        let content = std::fs::read_to_string(lock.lock_file_path()).unwrap();
        assert_eq!(content, "☃");
    }

    #[test]
    fn stale_sentinel_content_is_replaced() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(DirectoryLock::LOCK_FILE_NAME),
            "left over from a crashed run",
        )
        .unwrap();

        let lock = DirectoryLock::acquire(tmp.path()).unwrap();
        let content = std::fs::read_to_string(lock.lock_file_path()).unwrap();
        assert_eq!(content, "☃");
    }

    #[test]
    fn second_acquire_reports_lock_held() {
        let tmp = TempDir::new().unwrap();
        let _first = DirectoryLock::acquire(tmp.path()).unwrap();

        let err = DirectoryLock::acquire(tmp.path()).unwrap_err();
        assert!(err.is_lock_held(), "expected LockHeld, got {err:?}");
        match err {
            LockError::LockHeld { path } => assert_eq!(path, tmp.path()),
            LockError::Io { .. } => panic!("contention must not surface as I/O"),
        }
    }

    #[test]
    fn drop_releases_lock() {
        let tmp = TempDir::new().unwrap();
        {
            let _lock = DirectoryLock::acquire(tmp.path()).unwrap();
        }
        assert!(DirectoryLock::acquire(tmp.path()).is_ok());
    }

    #[test]
    fn explicit_release_unlocks() {
        let tmp = TempDir::new().unwrap();
        let lock = DirectoryLock::acquire(tmp.path()).unwrap();
        lock.release();
        assert!(!DirectoryLock::is_locked(tmp.path()).unwrap());
    }

    #[test]
    fn is_locked_false_on_free_directory() {
        let tmp = TempDir::new().unwrap();
        assert!(!DirectoryLock::is_locked(tmp.path()).unwrap());
    }

    #[test]
    fn is_locked_true_while_held() {
        let tmp = TempDir::new().unwrap();
        let _lock = DirectoryLock::acquire(tmp.path()).unwrap();
        assert!(DirectoryLock::is_locked(tmp.path()).unwrap());
    }

    #[test]
    fn is_locked_leaves_no_residual_lock() {
        let tmp = TempDir::new().unwrap();
        assert!(!DirectoryLock::is_locked(tmp.path()).unwrap());
        assert!(!DirectoryLock::is_locked(tmp.path()).unwrap());

        let lock = DirectoryLock::acquire(tmp.path());
        assert!(lock.is_ok());
    }

    #[test]
    fn file_in_place_of_directory_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let err = DirectoryLock::acquire(&blocker).unwrap_err();
        assert!(matches!(err, LockError::Io { .. }), "got {err:?}");
        assert!(!err.is_lock_held());

        assert!(matches!(
            DirectoryLock::is_locked(&blocker),
            Err(LockError::Io { .. })
        ));
    }

    #[test]
    fn contention_across_threads() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().to_path_buf();
        let _lock = DirectoryLock::acquire(&dir).unwrap();

        let held = std::thread::spawn(move || DirectoryLock::is_locked(&dir).unwrap())
            .join()
            .unwrap();
        assert!(held);
    }
}
