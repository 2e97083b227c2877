use dalil_core::{Coordinates, Language, ServiceEntry, SortMode};

/// Whether the entries on screen have been confirmed by the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Rendered from the local snapshot.
    Stale,
    /// Rendered from a successful fetch in this session.
    Fresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    LoadingFromCache,
    Fetching,
    Ready(Freshness),
    FetchFailed,
}

/// The single mutable session state. Only [`crate::SyncController`]
/// mutates it; entries are always replaced wholesale.
#[derive(Debug, Default)]
pub struct DirectoryState {
    entries: Vec<ServiceEntry>,
    language: Language,
    user_location: Option<Coordinates>,
    search_text: String,
    category: Option<String>,
    sort: SortMode,
}

impl DirectoryState {
    pub(crate) fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[ServiceEntry] {
        &self.entries
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn user_location(&self) -> Option<Coordinates> {
        self.user_location
    }

    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub(crate) fn replace_entries(&mut self, entries: Vec<ServiceEntry>) {
        self.entries = entries;
    }

    pub(crate) fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Returns `false` if a location was already set this session.
    pub(crate) fn set_user_location(&mut self, location: Coordinates) -> bool {
        if self.user_location.is_some() {
            return false;
        }
        self.user_location = Some(location);
        true
    }

    pub(crate) fn set_search_text(&mut self, text: String) {
        self.search_text = text;
    }

    pub(crate) fn set_category(&mut self, category: Option<String>) {
        self.category = category.filter(|c| !c.is_empty());
    }

    pub(crate) fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
    }
}
