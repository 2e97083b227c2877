use crate::entry::{Coordinates, ServiceEntry};
use crate::phone::{dial_number, to_whatsapp};

/// Per-entry contact features. A `None` field means the feature is disabled
/// for this entry; the entry itself is still shown.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryActions {
    pub dial: Option<String>,
    pub whatsapp: Option<String>,
    pub map: Option<Coordinates>,
}

impl EntryActions {
    #[must_use]
    pub fn for_entry(entry: &ServiceEntry, country_code: &str) -> Self {
        Self {
            dial: entry.phone.as_deref().and_then(dial_number),
            whatsapp: entry
                .whatsapp
                .as_deref()
                .and_then(|raw| to_whatsapp(raw, country_code)),
            map: entry.location,
        }
    }
}
