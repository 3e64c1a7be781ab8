//! Driven port for user-visible notifications.

/// Fire-and-forget notification sink. The most recent call wins on any
/// visual surface; nothing is queued.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Report a completed action.
    fn success(&self, title: &str, body: &str);

    /// Report a failed action.
    fn error(&self, title: &str, body: &str);
}
