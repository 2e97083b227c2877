//! Directory entry types: the wire record and the ingested listing.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Returns `None` unless both values are finite and in range.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some(Self { lat, lng })
    }

    /// Parses `"lat,lng"` as typed on a command line.
    #[must_use]
    pub fn parse_pair(s: &str) -> Option<Self> {
        let (lat, lng) = s.split_once(',')?;
        Self::new(lat.trim().parse().ok()?, lng.trim().parse().ok()?)
    }
}

/// One listing as delivered by the remote endpoint.
///
/// Every field is optional. Spreadsheet-backed endpoints emit phone numbers
/// as JSON numbers and coordinates as strings, so both shapes are accepted;
/// blank strings read as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub whatsapp: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub lng: Option<f64>,
}

/// An ingested directory listing with its precomputed search token.
///
/// Built only through [`crate::index::build`]; the token is never
/// recomputed after ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceEntry {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub image: Option<String>,
    pub location: Option<Coordinates>,
    pub(crate) search_token: String,
}

impl ServiceEntry {
    pub(crate) fn from_raw(raw: RawEntry, search_token: String) -> Self {
        let location = match (raw.lat, raw.lng) {
            (Some(lat), Some(lng)) => Coordinates::new(lat, lng),
            _ => None,
        };
        Self {
            name: raw.name.unwrap_or_default(),
            category: raw.category,
            description: raw.description,
            phone: raw.phone,
            whatsapp: raw.whatsapp,
            image: raw.image,
            location,
            search_token,
        }
    }

    #[must_use]
    pub fn search_token(&self) -> &str {
        &self.search_token
    }

    /// Image URL if it uses an `http`/`https` scheme.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        let url = self.image.as_deref()?.trim();
        let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
        (lower.starts_with("https://") || lower.starts_with("http://")).then_some(url)
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}
