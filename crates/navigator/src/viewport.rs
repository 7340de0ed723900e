use shared::domain::{SectionBounds, SectionId};
use url::Url;

pub trait Viewport: Send + Sync {
    fn scroll_offset(&self) -> f64;

    /// Relative to the viewport top. `None` when the section is not mounted.
    fn section_bounds(&self, section: SectionId) -> Option<SectionBounds>;

    fn location(&self) -> Url;

    /// Swap the current history entry's URL. Must not reload the page or
    /// push a new entry.
    fn replace_location(&self, location: Url);

    fn smooth_scroll_to(&self, top: f64);
}
