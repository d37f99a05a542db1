use std::fmt;

/// Canonical identifier of a playlist entry.
///
/// Resolved once per entry by [`resolve_entry_key`] and reused for selection
/// membership, download-URL lookup and progress probing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryKey(String);

impl EntryKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Entry fields as delivered by the backend, before key resolution.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntryFields {
    pub id: Option<String>,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<f64>,
    pub url: Option<String>,
    pub webpage_url: Option<String>,
}

/// Playlist as delivered by the backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchedPlaylist {
    pub title: Option<String>,
    pub entries: Vec<EntryFields>,
}

/// Resolve the canonical key: `id`, then `url`, then `webpage_url`, then a
/// positional tag. Empty strings count as missing.
pub fn resolve_entry_key(fields: &EntryFields, index: usize) -> EntryKey {
    non_empty(&fields.id)
        .or_else(|| non_empty(&fields.url))
        .or_else(|| non_empty(&fields.webpage_url))
        .map(EntryKey::new)
        .unwrap_or_else(|| EntryKey(format!("vid-{index}")))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    key: EntryKey,
    title: Option<String>,
    thumbnail: Option<String>,
    duration: Option<f64>,
    url: Option<String>,
    webpage_url: Option<String>,
}

impl Entry {
    pub fn from_fields(fields: EntryFields, index: usize) -> Self {
        let key = resolve_entry_key(&fields, index);
        let keep = |value: Option<String>| value.filter(|v| !v.is_empty());
        Self {
            key,
            title: keep(fields.title),
            thumbnail: keep(fields.thumbnail),
            duration: fields.duration,
            url: keep(fields.url),
            webpage_url: keep(fields.webpage_url),
        }
    }

    pub fn key(&self) -> &EntryKey {
        &self.key
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail.as_deref()
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn webpage_url(&self) -> Option<&str> {
        self.webpage_url.as_deref()
    }

    /// URL submitted for download: `webpage_url`, falling back to `url`.
    pub fn download_url(&self) -> Option<&str> {
        self.webpage_url().or_else(|| self.url())
    }

    /// Keys under which the backend may report progress for this entry, in
    /// probe order.
    pub fn progress_probe_keys(&self) -> impl Iterator<Item = &str> {
        [self.url(), Some(self.key.as_str()), self.webpage_url()]
            .into_iter()
            .flatten()
    }
}

/// An ordered, immutable list of resolved entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Playlist {
    title: Option<String>,
    entries: Vec<Entry>,
}

impl Playlist {
    pub fn from_fetched(fetched: FetchedPlaylist) -> Self {
        let entries = fetched
            .entries
            .into_iter()
            .enumerate()
            .map(|(index, fields)| Entry::from_fields(fields, index))
            .collect();
        Self {
            title: fetched.title.filter(|t| !t.is_empty()),
            entries,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
