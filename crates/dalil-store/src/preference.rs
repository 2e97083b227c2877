use dalil_core::Language;

use crate::backend::KeyValueStore;

pub const LANGUAGE_KEY: &str = "language";

/// Persisted language preference. Best-effort in both directions.
#[derive(Debug, Clone)]
pub struct PreferenceStore<S> {
    backend: S,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// The stored language, or the default when nothing usable is stored.
    pub fn load(&self) -> Language {
        match self.backend.get(LANGUAGE_KEY) {
            Ok(Some(token)) => Language::from_token(&token).unwrap_or_else(|| {
                tracing::debug!(token = %token, "ignoring unknown language token");
                Language::default()
            }),
            Ok(None) => Language::default(),
            Err(e) => {
                tracing::warn!(error = %e, "language preference unreadable");
                Language::default()
            }
        }
    }

    pub fn save(&self, language: Language) {
        if let Err(e) = self.backend.set(LANGUAGE_KEY, language.as_token()) {
            tracing::warn!(error = %e, "failed to persist language preference");
        }
    }
}
