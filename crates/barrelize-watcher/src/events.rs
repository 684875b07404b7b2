//! Change notifications emitted by the watcher.

use std::time::Instant;

use camino::Utf8PathBuf;
use notify_debouncer_mini::DebouncedEventKind;

/// Something changed at `path` under a watched root.
///
/// Creation, removal and modification are not told apart; generation only
/// needs to know that a scope may have changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    /// Absolute path of the changed file or directory.
    pub path: Utf8PathBuf,

    /// `true` if the path was still changing when the debounce window closed.
    pub continuous: bool,

    /// When the debouncer delivered the event.
    pub received_at: Instant,
}

impl FileEvent {
    /// Creates a settled event stamped now.
    #[must_use]
    pub fn new(path: Utf8PathBuf) -> Self {
        Self::with_kind(path, DebouncedEventKind::Any)
    }

    /// Creates an event from a debouncer event kind.
    #[must_use]
    pub fn with_kind(path: Utf8PathBuf, kind: DebouncedEventKind) -> Self {
        Self {
            path,
            continuous: matches!(kind, DebouncedEventKind::AnyContinuous),
            received_at: Instant::now(),
        }
    }

    /// The last component of the path.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settled_event() {
        let before = Instant::now();
        let event = FileEvent::new(Utf8PathBuf::from("/project/src/user.ts"));
        assert_eq!(event.file_name(), Some("user.ts"));
        assert!(!event.continuous);
        assert!(event.received_at >= before);
    }

    #[test]
    fn test_continuous_event() {
        let event = FileEvent::with_kind(Utf8PathBuf::from("/project/src"), DebouncedEventKind::AnyContinuous);
        assert!(event.continuous);
        assert_eq!(event.file_name(), Some("src"));
    }
}
