use std::rc::Rc;

use tracing::debug;

use crate::{
    config::LazyConfig,
    page::{Page, Watcher},
};

// deferred images
//
// the real source sits in a data attribute until the image scrolls into view, then it is copied
// over once and the image stops being watched.  a failed load is not retried
pub struct LazyImageLoader<P: Page> {
    page: Rc<P>,
    images: Vec<P::Node>,
    source_attribute: String,
}

impl<P: Page> LazyImageLoader<P> {
    pub fn init(page: Rc<P>, config: &LazyConfig) -> Option<Self> {
        let images = page.query_all(&config.selector);
        if images.is_empty() {
            debug!("no deferred images");
            return None;
        }

        Some(LazyImageLoader {
            page,
            images,
            source_attribute: config.source_attribute.clone(),
        })
    }

    pub fn attach<W: Watcher<P::Node>>(&self, watcher: &W) {
        for image in &self.images {
            watcher.observe(image);
        }
        debug!("watching {} deferred images", self.images.len());
    }

    // returns whether a source was swapped in
    pub fn on_visible<W: Watcher<P::Node>>(&self, image: &P::Node, watcher: &W) -> bool {
        let Some(source) = self.page.attribute(image, &self.source_attribute) else {
            return false;
        };

        self.page.set_attribute(image, "src", &source);
        self.page.remove_attribute(image, &self.source_attribute);
        watcher.unobserve(image);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakePage, FakeWatcher};

    #[test]
    fn visible_image_gets_its_source_once() {
        let page = Rc::new(FakePage::new());
        let image = page.spawn(&page.body(), "img[data-src=/img/warehouse.jpg]");
        let eager = page.spawn(&page.body(), "img[src=/img/logo.svg]");
        let watcher = FakeWatcher::new();

        let loader = LazyImageLoader::init(page.clone(), &LazyConfig::default()).unwrap();
        loader.attach(&watcher);
        assert_eq!(watcher.observed(), vec![image]);
        assert!(!watcher.is_observed(&eager));

        assert!(loader.on_visible(&image, &watcher));
        assert_eq!(page.attribute(&image, "src").as_deref(), Some("/img/warehouse.jpg"));
        assert_eq!(page.attribute(&image, "data-src"), None);
        assert!(!watcher.is_observed(&image));

        assert!(!loader.on_visible(&image, &watcher));
    }

    #[test]
    fn no_deferred_images_skips_the_loader() {
        let page = Rc::new(FakePage::new());
        page.spawn(&page.body(), "img[src=/img/logo.svg]");

        assert!(LazyImageLoader::init(page, &LazyConfig::default()).is_none());
    }
}
