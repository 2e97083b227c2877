//! Plain-text rendering of directory views.

use std::fmt::Write as _;

use dalil_core::Language;
use dalil_sync::{Freshness, RenderView, Renderer, ResultItem, ViewBody};

/// Shown in place of a missing or non-http image.
pub(crate) const FALLBACK_IMAGE: &str = "https://placehold.co/600x338?text=No+Image";

struct Labels {
    loading: &'static str,
    network_error: &'static str,
    no_results: &'static str,
    call: &'static str,
    whatsapp: &'static str,
    map: &'static str,
    unavailable: &'static str,
    all_categories: &'static str,
    stale: &'static str,
    km: &'static str,
}

const PRIMARY: Labels = Labels {
    loading: "جارٍ التحميل...",
    network_error: "تعذّر تحميل الدليل، تحقق من الاتصال بالشبكة",
    no_results: "لا توجد نتائج، جرّب كلمة مختلفة",
    call: "اتصال",
    whatsapp: "واتساب",
    map: "الخريطة",
    unavailable: "غير متوفر",
    all_categories: "الكل",
    stale: "من النسخة المحفوظة",
    km: "كم",
};

const SECONDARY: Labels = Labels {
    loading: "Loading...",
    network_error: "Could not load the directory. Check your connection.",
    no_results: "No results. Try a different word.",
    call: "Call",
    whatsapp: "WhatsApp",
    map: "Map",
    unavailable: "unavailable",
    all_categories: "All",
    stale: "from saved copy",
    km: "km",
};

fn labels(language: Language) -> &'static Labels {
    match language {
        Language::Primary => &PRIMARY,
        Language::Secondary => &SECONDARY,
    }
}

/// Keeps only the latest frame, formatted; the CLI prints it once the
/// session has settled.
#[derive(Debug, Default)]
pub(crate) struct TerminalRenderer {
    output: String,
    frames: usize,
}

impl TerminalRenderer {
    pub(crate) fn output(&self) -> &str {
        &self.output
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, view: &RenderView<'_>) {
        self.frames += 1;
        self.output = format_view(view);
        tracing::trace!(frame = self.frames, "view rendered");
    }
}

pub(crate) fn format_view(view: &RenderView<'_>) -> String {
    let l = labels(view.language);
    let mut out = String::new();

    out.push_str(&facet_line(view, l));
    if view.freshness == Some(Freshness::Stale) {
        let _ = write!(out, " ({})", l.stale);
    }
    out.push('\n');

    match &view.body {
        ViewBody::Loading => {
            let _ = writeln!(out, "{}", l.loading);
        }
        ViewBody::NetworkError => {
            let _ = writeln!(out, "{}", l.network_error);
        }
        ViewBody::NoResults => {
            let _ = writeln!(out, "{}", l.no_results);
        }
        ViewBody::Results(items) => {
            for item in items {
                format_item(&mut out, item, l);
            }
        }
    }
    out
}

/// "All" followed by every category, the active one in brackets.
fn facet_line(view: &RenderView<'_>, l: &Labels) -> String {
    let selected = view.selected_category;
    let mut facets = vec![(l.all_categories, selected.is_none())];
    facets.extend(view.categories.iter().map(|c| (*c, selected == Some(*c))));
    if let Some(c) = selected.filter(|c| !view.categories.contains(c)) {
        facets.push((c, true));
    }
    facets
        .into_iter()
        .map(|(name, active)| {
            if active {
                format!("[{name}]")
            } else {
                name.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn format_item(out: &mut String, item: &ResultItem<'_>, l: &Labels) {
    let entry = item.entry;
    out.push('\n');
    let _ = write!(out, "{}", entry.name);
    if let Some(category) = &entry.category {
        let _ = write!(out, " · {category}");
    }
    if let Some(km) = item.distance_km {
        let _ = write!(out, " · {km:.1} {}", l.km);
    }
    out.push('\n');

    if let Some(description) = &entry.description {
        let _ = writeln!(out, "  {description}");
    }
    let _ = writeln!(out, "  {}", entry.image_url().unwrap_or(FALLBACK_IMAGE));

    let call = item
        .actions
        .dial
        .as_deref()
        .map_or_else(|| l.unavailable.to_owned(), |n| format!("tel:{n}"));
    let whatsapp = item
        .actions
        .whatsapp
        .as_deref()
        .map_or_else(|| l.unavailable.to_owned(), |n| format!("https://wa.me/{n}"));
    let _ = writeln!(out, "  {}: {call}", l.call);
    let _ = writeln!(out, "  {}: {whatsapp}", l.whatsapp);
    if let Some(at) = item.actions.map {
        let _ = writeln!(
            out,
            "  {}: https://www.google.com/maps?q={},{}",
            l.map, at.lat, at.lng
        );
    }
}
