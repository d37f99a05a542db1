use std::collections::BTreeSet;

use thiserror::Error;

use crate::{Entry, EntryKey};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("invalid selection count {input:?}: expected a positive integer")]
    InvalidCount { input: String },
}

/// Set of entry keys the user intends to download.
///
/// Every operation takes the live entry list so membership is always derived
/// from the current playlist.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    keys: BTreeSet<EntryKey>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all_of(entries: &[Entry]) -> Self {
        Self {
            keys: entries.iter().map(|entry| entry.key().clone()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &EntryKey) -> bool {
        self.keys.contains(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &EntryKey> {
        self.keys.iter()
    }

    /// Flip membership of `key`. Keys not present in `entries` are ignored.
    /// Returns whether the selection changed.
    pub fn toggle(&mut self, entries: &[Entry], key: &EntryKey) -> bool {
        if !entries.iter().any(|entry| entry.key() == key) {
            return false;
        }
        if !self.keys.remove(key) {
            self.keys.insert(key.clone());
        }
        true
    }

    pub fn select_all(&mut self, entries: &[Entry]) {
        *self = Self::all_of(entries);
    }

    pub fn deselect_all(&mut self) {
        self.keys.clear();
    }

    /// Selection size equal to the entry count reads as "all selected".
    pub fn is_all_selected(&self, entries: &[Entry]) -> bool {
        self.keys.len() == entries.len()
    }

    pub fn toggle_all(&mut self, entries: &[Entry]) {
        if self.is_all_selected(entries) {
            self.deselect_all();
        } else {
            self.select_all(entries);
        }
    }

    /// Replace the selection with the first `n` entries, `n` parsed from raw
    /// user input. Invalid or non-positive input leaves the selection as is.
    pub fn select_first_n(&mut self, entries: &[Entry], raw: &str) -> Result<usize, SelectionError> {
        let n = parse_count(raw)?;
        let limit = n.min(entries.len());
        self.keys = entries[..limit]
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        Ok(limit)
    }
}

/// Read a count the way a lenient integer prompt does: surrounding whitespace
/// and an optional sign, then the leading run of digits. Anything after the
/// digits is ignored ("2.5" is 2). Counts beyond `usize` saturate.
fn parse_count(raw: &str) -> Result<usize, SelectionError> {
    let invalid = || SelectionError::InvalidCount {
        input: raw.to_string(),
    };
    let text = raw.trim();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];
    if digits.is_empty() {
        return Err(invalid());
    }

    let value = digits.bytes().fold(0usize, |acc, digit| {
        acc.saturating_mul(10)
            .saturating_add(usize::from(digit - b'0'))
    });
    if negative || value == 0 {
        return Err(invalid());
    }
    Ok(value)
}
