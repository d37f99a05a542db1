use std::collections::HashMap;

use crate::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
    Running,
    Finished,
    Error,
}

impl ProgressStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ProgressStatus::Finished | ProgressStatus::Error)
    }
}

/// Last-known status for one progress key as pushed by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub video_id: String,
    pub status: ProgressStatus,
    pub percent: f64,
    pub message: Option<String>,
    pub download_url: Option<String>,
}

/// Progress keyed by `video_id` exactly as received.
///
/// Keys live in the backend's namespace, which is not necessarily the entry
/// key namespace; [`ProgressBoard::lookup`] bridges the two at read time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressBoard {
    events: HashMap<String, ProgressEvent>,
}

impl ProgressBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins. Entries are never removed.
    pub fn apply(&mut self, event: ProgressEvent) {
        self.events.insert(event.video_id.clone(), event);
    }

    pub fn get(&self, video_id: &str) -> Option<&ProgressEvent> {
        self.events.get(video_id)
    }

    /// Probe `url`, then the entry key, then `webpage_url`.
    pub fn lookup(&self, entry: &Entry) -> Option<&ProgressEvent> {
        entry.progress_probe_keys().find_map(|key| self.events.get(key))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntryFields;

    fn event(video_id: &str, status: ProgressStatus, percent: f64) -> ProgressEvent {
        ProgressEvent {
            video_id: video_id.to_string(),
            status,
            percent,
            message: None,
            download_url: None,
        }
    }

    fn sample_entry() -> Entry {
        Entry::from_fields(
            EntryFields {
                id: Some("a1".to_string()),
                url: Some("https://x/a1".to_string()),
                webpage_url: Some("https://x/watch?v=a1".to_string()),
                ..EntryFields::default()
            },
            0,
        )
    }

    #[test]
    fn lookup_matches_any_probe_key() {
        let entry = sample_entry();
        for key in ["https://x/a1", "a1", "https://x/watch?v=a1"] {
            let mut board = ProgressBoard::new();
            board.apply(event(key, ProgressStatus::Running, 40.0));
            let found = board.lookup(&entry).expect("progress for entry");
            assert_eq!(found.percent, 40.0);
        }
    }

    #[test]
    fn lookup_prefers_url_over_key() {
        let entry = sample_entry();
        let mut board = ProgressBoard::new();
        board.apply(event("a1", ProgressStatus::Running, 10.0));
        board.apply(event("https://x/a1", ProgressStatus::Running, 70.0));
        assert_eq!(board.lookup(&entry).map(|e| e.percent), Some(70.0));
    }

    #[test]
    fn later_events_overwrite_earlier_ones() {
        let mut board = ProgressBoard::new();
        board.apply(event("k", ProgressStatus::Running, 10.0));
        board.apply(event("k", ProgressStatus::Running, 55.0));
        assert_eq!(board.len(), 1);
        assert_eq!(board.get("k").map(|e| e.percent), Some(55.0));
    }

    #[test]
    fn percent_is_not_clamped_or_monotonic() {
        let mut board = ProgressBoard::new();
        board.apply(event("k", ProgressStatus::Running, 80.0));
        board.apply(event("k", ProgressStatus::Running, 30.0));
        assert_eq!(board.get("k").map(|e| e.percent), Some(30.0));
    }

    #[test]
    fn terminal_states() {
        assert!(!ProgressStatus::Running.is_terminal());
        assert!(ProgressStatus::Finished.is_terminal());
        assert!(ProgressStatus::Error.is_terminal());
    }
}
