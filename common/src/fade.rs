use std::rc::Rc;

use tracing::debug;

use crate::{
    config::FadeConfig,
    page::{Page, Watcher},
};

#[derive(Clone, Debug, PartialEq)]
pub struct WatchOptions {
    pub threshold: f64,
    pub root_margin: String,
}

// fade-in cards
//
// cards start transparent and pushed down, and settle once a tenth of them is on screen.  they
// stay observed afterwards; later notifications write the same end state again
pub struct FadeInObserver<P: Page> {
    page: Rc<P>,
    cards: Vec<P::Node>,
    options: WatchOptions,
    hidden_transform: String,
    visible_transform: String,
    transition: String,
}

impl<P: Page> FadeInObserver<P> {
    pub fn init(page: Rc<P>, config: &FadeConfig) -> Option<Self> {
        let cards = page.query_all(&config.selector);
        if cards.is_empty() {
            debug!("no cards to fade in");
            return None;
        }

        Some(FadeInObserver {
            page,
            cards,
            options: WatchOptions {
                threshold: config.threshold,
                root_margin: config.root_margin.clone(),
            },
            hidden_transform: config.hidden_transform.clone(),
            visible_transform: config.visible_transform.clone(),
            transition: config.transition.clone(),
        })
    }

    pub fn options(&self) -> &WatchOptions {
        &self.options
    }

    pub fn attach<W: Watcher<P::Node>>(&self, watcher: &W) {
        for card in &self.cards {
            self.page.set_style(card, "opacity", "0");
            self.page.set_style(card, "transform", &self.hidden_transform);
            self.page.set_style(card, "transition", &self.transition);
            watcher.observe(card);
        }
        debug!("watching {} cards for fade-in", self.cards.len());
    }

    pub fn on_visible(&self, card: &P::Node) {
        self.page.set_style(card, "opacity", "1");
        self.page.set_style(card, "transform", &self.visible_transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakePage, FakeWatcher};

    #[test]
    fn cards_start_hidden_and_settle_when_visible() {
        let page = Rc::new(FakePage::new());
        let grid = page.spawn(&page.body(), "div.grid");
        let product = page.spawn(&grid, "div.product-card");
        let info = page.spawn(&grid, "div.info-card");
        let plain = page.spawn(&grid, "div.card");
        let watcher = FakeWatcher::new();

        let fade = FadeInObserver::init(page.clone(), &FadeConfig::default()).unwrap();
        fade.attach(&watcher);

        assert_eq!(watcher.observed(), vec![product, info]);
        assert!(!watcher.is_observed(&plain));
        assert_eq!(page.style(&product, "opacity").as_deref(), Some("0"));
        assert_eq!(
            page.style(&product, "transform").as_deref(),
            Some("translateY(30px)")
        );

        fade.on_visible(&product);
        fade.on_visible(&product);

        assert_eq!(page.style(&product, "opacity").as_deref(), Some("1"));
        assert_eq!(
            page.style(&product, "transform").as_deref(),
            Some("translateY(0)")
        );
        assert_eq!(page.style(&info, "opacity").as_deref(), Some("0"));
        assert!(watcher.is_observed(&product));
    }

    #[test]
    fn options_carry_threshold_and_margin() {
        let page = Rc::new(FakePage::new());
        page.spawn(&page.body(), "div.value-card");

        let fade = FadeInObserver::init(page, &FadeConfig::default()).unwrap();

        assert_eq!(fade.options().threshold, 0.1);
        assert_eq!(fade.options().root_margin, "0px 0px -50px 0px");
    }
}
