use std::sync::{Mutex, MutexGuard, PoisonError};

use shared::{
    content::SECTION_ORDER,
    domain::{SectionBounds, SectionId},
};
use url::Url;

use crate::viewport::Viewport;

struct LayoutInner {
    leading_inset: f64,
    sections: Vec<(SectionId, f64)>,
    scroll_offset: f64,
    location: Url,
    scroll_commands: Vec<f64>,
}

/// Sections stacked top to bottom with fixed heights. Scroll commands land
/// instantly.
pub struct StackedLayout {
    inner: Mutex<LayoutInner>,
}

impl StackedLayout {
    pub fn new(location: Url, sections: impl IntoIterator<Item = (SectionId, f64)>) -> Self {
        Self {
            inner: Mutex::new(LayoutInner {
                leading_inset: 0.0,
                sections: sections.into_iter().collect(),
                scroll_offset: 0.0,
                location,
                scroll_commands: Vec::new(),
            }),
        }
    }

    pub fn uniform(location: Url, section_height: f64) -> Self {
        Self::new(
            location,
            SECTION_ORDER.into_iter().map(|section| (section, section_height)),
        )
    }

    fn lock(&self) -> MutexGuard<'_, LayoutInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Space above the first section, e.g. an expanded mobile menu pushing
    /// content down.
    pub fn set_leading_inset(&self, inset: f64) {
        self.lock().leading_inset = inset;
    }

    pub fn scroll_by_user(&self, offset: f64) {
        self.lock().scroll_offset = offset.max(0.0);
    }

    pub fn absolute_top(&self, section: SectionId) -> Option<f64> {
        let inner = self.lock();
        absolute_extent(&inner, section).map(|(top, _)| top)
    }

    pub fn document_height(&self) -> f64 {
        let inner = self.lock();
        inner.leading_inset + inner.sections.iter().map(|(_, h)| h).sum::<f64>()
    }

    pub fn scroll_commands(&self) -> Vec<f64> {
        self.lock().scroll_commands.clone()
    }
}

fn absolute_extent(inner: &LayoutInner, section: SectionId) -> Option<(f64, f64)> {
    let mut top = inner.leading_inset;
    for (id, height) in &inner.sections {
        if *id == section {
            return Some((top, top + height));
        }
        top += height;
    }
    None
}

impl Viewport for StackedLayout {
    fn scroll_offset(&self) -> f64 {
        self.lock().scroll_offset
    }

    fn section_bounds(&self, section: SectionId) -> Option<SectionBounds> {
        let inner = self.lock();
        absolute_extent(&inner, section).map(|(top, bottom)| {
            SectionBounds::new(top - inner.scroll_offset, bottom - inner.scroll_offset)
        })
    }

    fn location(&self) -> Url {
        self.lock().location.clone()
    }

    fn replace_location(&self, location: Url) {
        self.lock().location = location;
    }

    fn smooth_scroll_to(&self, top: f64) {
        let mut inner = self.lock();
        inner.scroll_commands.push(top);
        inner.scroll_offset = top.max(0.0);
    }
}
