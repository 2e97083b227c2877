use serde::{Deserialize, Serialize};

/// Active display language. `Primary` is the directory's native language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Primary,
    Secondary,
}

impl Language {
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Language::Primary => Language::Secondary,
            Language::Secondary => Language::Primary,
        }
    }

    #[must_use]
    pub fn as_token(self) -> &'static str {
        match self {
            Language::Primary => "primary",
            Language::Secondary => "secondary",
        }
    }

    /// Parses a persisted token; unknown tokens yield `None`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "primary" => Some(Language::Primary),
            "secondary" => Some(Language::Secondary),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_both_ways() {
        assert_eq!(Language::Primary.toggle(), Language::Secondary);
        assert_eq!(Language::Secondary.toggle(), Language::Primary);
    }

    #[test]
    fn token_parsing() {
        assert_eq!(Language::from_token("secondary\n"), Some(Language::Secondary));
        assert_eq!(Language::from_token("primary"), Some(Language::Primary));
        assert_eq!(Language::from_token("ar"), None);
    }
}
