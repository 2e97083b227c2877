use dalil_core::{EntryActions, Language, ServiceEntry};

use crate::state::Freshness;

/// One visible result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultItem<'a> {
    pub entry: &'a ServiceEntry,
    pub distance_km: Option<f64>,
    pub actions: EntryActions,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewBody<'a> {
    /// Nothing cached and the fetch has not finished.
    Loading,
    /// Fetch failed with nothing on screen. The only user-visible error.
    NetworkError,
    /// Data is loaded but the current filters match nothing.
    NoResults,
    Results(Vec<ResultItem<'a>>),
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderView<'a> {
    pub language: Language,
    pub freshness: Option<Freshness>,
    /// Facet values for the category control; "all" is implied.
    pub categories: Vec<&'a str>,
    pub selected_category: Option<&'a str>,
    pub body: ViewBody<'a>,
}

/// Draws frames. Implementations must not hold on to the view.
pub trait Renderer {
    fn render(&mut self, view: &RenderView<'_>);
}
