//! Ingestion and filtering of directory entries.
//!
//! Queries re-scan the full entry list every time. Directories hold tens to
//! low hundreds of listings, so there is no incremental index to maintain.

use crate::entry::{Coordinates, RawEntry, ServiceEntry};
use crate::geo::distance_km;
use crate::normalize::normalize;

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Dataset order.
    #[default]
    Original,
    /// Nearest first when a user location is known; unmeasured entries last.
    Distance,
}

/// A query match with its optional distance from the user.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry<'a> {
    pub entry: &'a ServiceEntry,
    pub distance_km: Option<f64>,
}

/// Ingests raw records, computing each entry's search token.
#[must_use]
pub fn build(raw_entries: Vec<RawEntry>) -> Vec<ServiceEntry> {
    raw_entries
        .into_iter()
        .map(|raw| {
            let token = search_token(&raw);
            ServiceEntry::from_raw(raw, token)
        })
        .collect()
}

/// Normalized `name category description phone`, absent fields skipped.
fn search_token(raw: &RawEntry) -> String {
    [&raw.name, &raw.category, &raw.description, &raw.phone]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .map(normalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Entries matching every search term and the category, in dataset order.
///
/// Terms are the whitespace-separated words of the normalized search text;
/// each must occur somewhere in the entry's search token. `category` is an
/// exact, case-sensitive comparison; `None` or `""` means all categories.
#[must_use]
pub fn query<'a>(
    entries: &'a [ServiceEntry],
    search_text: &str,
    category: Option<&str>,
) -> Vec<&'a ServiceEntry> {
    let normalized = normalize(search_text);
    let terms: Vec<&str> = normalized.split_whitespace().collect();
    let category = category.filter(|c| !c.is_empty());

    entries
        .iter()
        .filter(|entry| category.is_none_or(|c| entry.category.as_deref() == Some(c)))
        .filter(|entry| terms.iter().all(|t| entry.search_token.contains(t)))
        .collect()
}

/// Attaches distances and applies `sort`.
///
/// Distance never filters: entries without coordinates, or every entry when
/// `user_location` is `None`, keep `distance_km: None`.
#[must_use]
pub fn rank<'a>(
    matches: Vec<&'a ServiceEntry>,
    user_location: Option<Coordinates>,
    sort: SortMode,
) -> Vec<RankedEntry<'a>> {
    let mut ranked: Vec<RankedEntry<'a>> = matches
        .into_iter()
        .map(|entry| RankedEntry {
            entry,
            distance_km: user_location
                .zip(entry.location)
                .map(|(user, here)| distance_km(user, here)),
        })
        .collect();

    if sort == SortMode::Distance && user_location.is_some() {
        // stable: ties and unmeasured entries keep dataset order
        ranked.sort_by(|a, b| match (a.distance_km, b.distance_km) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }
    ranked
}

/// Distinct non-empty categories in order of first appearance.
#[must_use]
pub fn categories(entries: &[ServiceEntry]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for category in entries.iter().filter_map(|e| e.category.as_deref()) {
        if !category.is_empty() && !seen.contains(&category) {
            seen.push(category);
        }
    }
    seen
}

#[cfg(test)]
#[path = "index_test.rs"]
mod tests;
