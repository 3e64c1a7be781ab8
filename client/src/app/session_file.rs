//! Session token persistence between CLI invocations.
//!
//! The file holds the bare access token. It is written after every command
//! that may change the session and removed once the session ends.

use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use land_registry::outbound::supabase::SessionToken;

pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn directory(&self) -> io::Result<(Dir, &Path)> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let name = self.path.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "session file must name a file")
        })?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        Ok((directory, Path::new(name)))
    }

    /// Build a session from the stored token. A missing or blank file yields
    /// an empty session.
    pub fn load(&self) -> io::Result<SessionToken> {
        let (directory, name) = match self.directory() {
            Ok(found) => found,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(SessionToken::default());
            }
            Err(error) => return Err(error),
        };
        let token = match directory.read_to_string(name) {
            Ok(token) => token,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(SessionToken::default());
            }
            Err(error) => return Err(error),
        };
        let token = token.trim();
        if token.is_empty() {
            return Ok(SessionToken::default());
        }
        debug!(path = %self.path.display(), "restored session");
        Ok(SessionToken::with_token(token))
    }

    /// Write the current token, or remove the file when there is none.
    pub fn store(&self, session: &SessionToken) -> io::Result<()> {
        let (directory, name) = self.directory()?;
        match session.get() {
            Some(token) => directory.write(name, token.as_bytes()),
            None => match directory.remove_file(name) {
                Ok(()) => Ok(()),
                Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(error) => Err(error),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for session persistence.

    use super::*;
    use land_registry::test_support::Scratch;
    use rstest::rstest;

    #[rstest]
    fn missing_files_load_an_empty_session() {
        let scratch = Scratch::new().expect("scratch dir");
        let file = SessionFile::new(scratch.path().join("session"));

        assert!(!file.load().expect("load").is_set());
    }

    #[rstest]
    fn stored_tokens_are_restored() {
        let scratch = Scratch::new().expect("scratch dir");
        let file = SessionFile::new(scratch.path().join("session"));

        file.store(&SessionToken::with_token("access-token"))
            .expect("store");
        let restored = file.load().expect("load");

        assert_eq!(restored.get().as_deref().map(String::as_str), Some("access-token"));
    }

    #[rstest]
    fn ended_sessions_remove_the_file() {
        let scratch = Scratch::new().expect("scratch dir");
        scratch.write("session", b"stale-token\n").expect("seed");
        let file = SessionFile::new(scratch.path().join("session"));

        file.store(&SessionToken::default()).expect("store");

        assert!(!scratch.exists("session"));
        file.store(&SessionToken::default())
            .expect("removing twice is fine");
    }
}
