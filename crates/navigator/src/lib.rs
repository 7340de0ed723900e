use std::{sync::Arc, time::Duration};

use shared::{
    content::{first_section, SECTION_ORDER},
    domain::{SectionBounds, SectionId},
};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

pub mod layout;
pub mod viewport;

pub use layout::StackedLayout;
pub use viewport::Viewport;

/// Scroll offset past which the navigation bar shows its backdrop.
pub const SCROLLED_THRESHOLD: f64 = 50.0;
/// Viewport y-coordinate a section must span to count as active.
pub const DETECTION_LINE: f64 = 100.0;
/// Height kept clear above a navigation target for the fixed navigation bar.
pub const NAV_BAR_OFFSET: f64 = 30.0;
/// Wait between a navigation click and measuring the target, so the menu
/// collapse has reflowed the page first.
pub const SETTLE_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    pub active_section: SectionId,
    pub menu_open: bool,
    pub scrolled: bool,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            active_section: first_section(),
            menu_open: false,
            scrolled: false,
        }
    }
}

impl NavigationState {
    pub fn is_current(&self, section: SectionId) -> bool {
        self.active_section == section
    }

    pub fn menu_button_label(&self) -> &'static str {
        if self.menu_open {
            "Close menu"
        } else {
            "Open menu"
        }
    }
}

/// First section, in the order given, whose bounds span the detection line.
/// Unmounted sections never match.
pub fn select_active_section<I>(geometry: I) -> Option<SectionId>
where
    I: IntoIterator<Item = (SectionId, Option<SectionBounds>)>,
{
    geometry
        .into_iter()
        .find(|(_, bounds)| bounds.is_some_and(|b| b.spans(DETECTION_LINE)))
        .map(|(section, _)| section)
}

pub struct Navigator<V> {
    viewport: Arc<V>,
    state: watch::Sender<NavigationState>,
    settle_delay: Duration,
}

impl<V: Viewport + 'static> Navigator<V> {
    pub fn new(viewport: Arc<V>) -> Self {
        let (state, _) = watch::channel(NavigationState::default());
        Self {
            viewport,
            state,
            settle_delay: SETTLE_DELAY,
        }
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn state(&self) -> NavigationState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<NavigationState> {
        self.state.subscribe()
    }

    /// Keeps the previous active section when nothing spans the line.
    pub fn on_scroll(&self) {
        let scrolled = self.viewport.scroll_offset() > SCROLLED_THRESHOLD;
        let detected = select_active_section(
            SECTION_ORDER
                .into_iter()
                .map(|section| (section, self.viewport.section_bounds(section))),
        );

        self.state.send_if_modified(|state| {
            let before = *state;
            state.scrolled = scrolled;
            if let Some(section) = detected {
                state.active_section = section;
            }
            if before.active_section != state.active_section {
                debug!(
                    from = %before.active_section,
                    to = %state.active_section,
                    "active section changed"
                );
            }
            before != *state
        });
    }

    pub fn toggle_menu(&self) {
        self.state.send_modify(|state| state.menu_open = !state.menu_open);
    }

    /// The active section is not touched here; it follows from the scroll.
    /// The returned handle resolves once the deferred scroll is issued.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime; the deferred scroll is
    /// spawned on it.
    pub fn on_navigate(&self, target: SectionId) -> JoinHandle<()> {
        self.state.send_if_modified(|state| {
            let was_open = state.menu_open;
            state.menu_open = false;
            was_open
        });

        let mut location = self.viewport.location();
        location.set_fragment(Some(target.as_str()));
        self.viewport.replace_location(location);
        info!(section = %target, "navigating to section");

        let viewport = Arc::clone(&self.viewport);
        let settle_delay = self.settle_delay;
        tokio::spawn(async move {
            tokio::time::sleep(settle_delay).await;
            scroll_to_section(viewport.as_ref(), target);
        })
    }

    /// Bursts of events are coalesced; only the latest layout is evaluated.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount(self: &Arc<Self>, events: &ScrollEvents) -> ScrollListener {
        let navigator = Arc::clone(self);
        let mut ticks = events.subscribe();
        let task = tokio::spawn(async move {
            while ticks.changed().await.is_ok() {
                navigator.on_scroll();
            }
            debug!("scroll event source closed");
        });
        ScrollListener { task }
    }
}

fn scroll_to_section<V: Viewport + ?Sized>(viewport: &V, target: SectionId) {
    let Some(bounds) = viewport.section_bounds(target) else {
        warn!(section = %target, "navigation target is not mounted");
        return;
    };
    let top = (viewport.scroll_offset() + bounds.top - NAV_BAR_OFFSET).max(0.0);
    debug!(section = %target, top, "issuing smooth scroll");
    viewport.smooth_scroll_to(top);
}

pub struct ScrollEvents {
    tx: watch::Sender<u64>,
}

impl Default for ScrollEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollEvents {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self { tx }
    }

    pub fn emit(&self) {
        self.tx.send_modify(|seq| *seq = seq.wrapping_add(1));
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

/// Deregisters on drop.
pub struct ScrollListener {
    task: JoinHandle<()>,
}

impl ScrollListener {
    pub fn unmount(self) {}
}

impl Drop for ScrollListener {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
