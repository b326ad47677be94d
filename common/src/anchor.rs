use std::rc::Rc;

use tracing::{debug, trace};

use crate::{
    config::ScrollConfig,
    page::{Disposition, Page},
};

/// The element id an in-page `href` points at, or `None` for a bare `#` or an empty link.
pub fn fragment_target(href: &str) -> Option<&str> {
    match href.strip_prefix('#') {
        Some(id) if !id.is_empty() => Some(id),
        _ => None,
    }
}

// in-page anchors
//
// an anchor is only taken over when it names an element that actually exists; anything else is
// left to the browser.  the scroll stops short of the target by the navbar's height plus a margin
// so the fixed header never covers it
pub struct ScrollNavigator<P: Page> {
    page: Rc<P>,
    anchors: Vec<P::Node>,
    navbar_selector: String,
    margin: f64,
}

impl<P: Page> ScrollNavigator<P> {
    pub fn init(page: Rc<P>, config: &ScrollConfig) -> Option<Self> {
        let anchors = page.query_all(&config.anchor_selector);
        if anchors.is_empty() {
            debug!("no in-page anchors, skipping smooth scrolling");
            return None;
        }
        debug!("attached smooth scrolling to {} anchors", anchors.len());

        Some(ScrollNavigator {
            page,
            anchors,
            navbar_selector: config.navbar_selector.clone(),
            margin: config.margin,
        })
    }

    pub fn anchors(&self) -> &[P::Node] {
        &self.anchors
    }

    pub fn on_anchor_click(&self, anchor: &P::Node) -> Disposition {
        let href = self.page.attribute(anchor, "href").unwrap_or_default();

        let Some(target) = fragment_target(&href).and_then(|id| self.page.by_id(id)) else {
            trace!("anchor {href:?} has no target, leaving navigation alone");
            return Disposition::Default;
        };

        let navbar_height = self
            .page
            .query(&self.navbar_selector)
            .map(|navbar| self.page.offset_height(&navbar))
            .unwrap_or(0.0);
        let top = self.page.offset_top(&target) - navbar_height - self.margin;

        self.page.smooth_scroll_to(top);
        Disposition::Intercepted
    }
}
