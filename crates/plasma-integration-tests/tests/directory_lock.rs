//! End-to-end behaviour of the data directory lock.

use std::sync::{Arc, Barrier};
use std::thread;

use plasma_core::{DirectoryLock, LockError};
use tempfile::TempDir;

#[test]
fn acquire_check_release_reacquire() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("fresh");

    let first = DirectoryLock::acquire(&dir).unwrap();
    assert!(dir.is_dir());
    assert!(dir.join(DirectoryLock::LOCK_FILE_NAME).is_file());

    assert!(DirectoryLock::is_locked(&dir).unwrap());
    let err = DirectoryLock::acquire(&dir).unwrap_err();
    assert!(matches!(err, LockError::LockHeld { .. }));

    drop(first);

    assert!(!DirectoryLock::is_locked(&dir).unwrap());
    let second = DirectoryLock::acquire(&dir).unwrap();
    assert_eq!(second.path(), dir.as_path());
}

#[test]
fn checking_leaves_no_residual_lock() {
    let tmp = TempDir::new().unwrap();

    for _ in 0..3 {
        assert!(!DirectoryLock::is_locked(tmp.path()).unwrap());
    }
    DirectoryLock::acquire(tmp.path()).unwrap().release();
}

#[test]
fn exactly_one_of_many_threads_wins() {
    let tmp = TempDir::new().unwrap();
    let dir = Arc::new(tmp.path().join("contended"));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let dir = Arc::clone(&dir);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let result = DirectoryLock::acquire(dir.as_path());
                // Hold the lock until every thread has tried.
                barrier.wait();
                result.map(drop)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    let held = results
        .iter()
        .filter(|r| matches!(r, Err(LockError::LockHeld { .. })))
        .count();

    assert_eq!(winners, 1);
    assert_eq!(held, 7);
}

#[test]
fn unusable_directory_is_io_not_lock_held() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("plain-file");
    std::fs::write(&file, b"").unwrap();

    let err = DirectoryLock::acquire(&file).unwrap_err();
    assert!(matches!(err, LockError::Io { .. }));
    assert!(!err.is_lock_held());
}
