//! Test utilities for the land registry crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and when the `test-support` feature is enabled.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use cap_std::{ambient_authority, fs::Dir};
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use tempfile::TempDir;

use crate::domain::ports::Notifier;

/// Clock pinned to a fixed instant that tests may move forward.
pub struct FixtureClock(Mutex<DateTime<Utc>>);

impl FixtureClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_millis(&self, millis: i64) {
        *self.lock() += TimeDelta::milliseconds(millis);
    }

    fn lock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock()
    }
}

/// One notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success { title: String, body: String },
    Error { title: String, body: String },
}

/// Notifier that keeps every message for later assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier(Mutex<Vec<Notice>>);

impl RecordingNotifier {
    /// Everything notified so far, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn push(&self, notice: Notice) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, title: &str, body: &str) {
        self.push(Notice::Success {
            title: title.to_owned(),
            body: body.to_owned(),
        });
    }

    fn error(&self, title: &str, body: &str) {
        self.push(Notice::Error {
            title: title.to_owned(),
            body: body.to_owned(),
        });
    }
}

/// Scratch directory for document and session fixtures.
///
/// # Examples
///
/// ```rust
/// use land_registry::test_support::Scratch;
///
/// let scratch = Scratch::new()?;
/// let path = scratch.write("deed.pdf", b"%PDF-1.7")?;
/// assert_eq!(scratch.read("deed.pdf")?, b"%PDF-1.7");
/// assert!(path.ends_with("deed.pdf"));
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Scratch {
    root: TempDir,
}

impl Scratch {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            root: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Write `contents` to `name` inside the scratch directory.
    pub fn write(&self, name: &str, contents: &[u8]) -> io::Result<PathBuf> {
        self.dir()?.write(name, contents)?;
        Ok(self.root.path().join(name))
    }

    pub fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        self.dir()?.read(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.dir().is_ok_and(|dir| dir.exists(name))
    }

    fn dir(&self) -> io::Result<Dir> {
        Dir::open_ambient_dir(self.root.path(), ambient_authority())
    }
}
