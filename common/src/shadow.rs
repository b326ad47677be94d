use std::rc::Rc;

use tracing::debug;

use crate::{config::ShadowConfig, page::Page};

// navbar shadow
//
// runs on every scroll event; there is no hysteresis, an offset hovering around the threshold
// flips the shadow back and forth
pub struct NavbarShadow<P: Page> {
    page: Rc<P>,
    navbar: P::Node,
    threshold: f64,
    raised: String,
    resting: String,
}

pub fn is_raised(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

impl<P: Page> NavbarShadow<P> {
    pub fn init(page: Rc<P>, config: &ShadowConfig) -> Option<Self> {
        let Some(navbar) = page.query(&config.navbar_selector) else {
            debug!("no navbar, skipping scroll shadow");
            return None;
        };

        Some(NavbarShadow {
            page,
            navbar,
            threshold: config.threshold,
            raised: config.raised.clone(),
            resting: config.resting.clone(),
        })
    }

    pub fn on_scroll(&self) -> bool {
        let raised = is_raised(self.page.scroll_y(), self.threshold);
        let shadow = if raised { &self.raised } else { &self.resting };

        self.page.set_style(&self.navbar, "box-shadow", shadow);
        raised
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakePage;

    #[test]
    fn shadow_follows_the_threshold() {
        let page = Rc::new(FakePage::new());
        let navbar = page.spawn(&page.body(), "nav.navbar");
        let config = ShadowConfig::default();
        let shadow = NavbarShadow::init(page.clone(), &config).unwrap();

        page.set_scroll_y(10.0);
        assert!(!shadow.on_scroll());
        assert_eq!(page.style(&navbar, "box-shadow"), Some(config.resting.clone()));

        page.set_scroll_y(10.5);
        assert!(shadow.on_scroll());
        assert_eq!(page.style(&navbar, "box-shadow"), Some(config.raised.clone()));

        page.set_scroll_y(0.0);
        assert!(!shadow.on_scroll());
        assert_eq!(page.style(&navbar, "box-shadow"), Some(config.resting));
    }
}
