use std::rc::Rc;

use tracing::debug;

use crate::{config::MenuConfig, page::Page};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuState {
    Open,
    Closed,
}

// mobile navigation
//
// the open flag lives in the DOM as the open class on both the panel and its toggle; it is never
// cached here so that markup which starts open is handled too
pub struct MenuController<P: Page> {
    page: Rc<P>,
    toggle: P::Node,
    panel: P::Node,
    links: Vec<P::Node>,
    open_class: String,
}

impl<P: Page> MenuController<P> {
    pub fn init(page: Rc<P>, config: &MenuConfig) -> Option<Self> {
        let (Some(toggle), Some(panel)) = (page.by_id(&config.toggle_id), page.by_id(&config.panel_id))
        else {
            debug!("menu toggle or panel missing, skipping mobile menu");
            return None;
        };

        let links = page.query_within(&panel, &config.link_selector);
        debug!("attached mobile menu with {} links", links.len());

        Some(MenuController {
            page,
            toggle,
            panel,
            links,
            open_class: config.open_class.clone(),
        })
    }

    pub fn toggle(&self) -> &P::Node {
        &self.toggle
    }

    pub fn links(&self) -> &[P::Node] {
        &self.links
    }

    pub fn state(&self) -> MenuState {
        if self.page.has_class(&self.panel, &self.open_class) {
            MenuState::Open
        } else {
            MenuState::Closed
        }
    }

    pub fn on_toggle_click(&self) -> MenuState {
        self.page.toggle_class(&self.panel, &self.open_class);
        self.page.toggle_class(&self.toggle, &self.open_class);
        self.state()
    }

    pub fn on_link_click(&self) {
        self.close();
    }

    // every click on the document lands here, including the ones that already hit the toggle
    pub fn on_document_click(&self, target: &P::Node) {
        if !self.page.contains(&self.panel, target) && !self.page.contains(&self.toggle, target) {
            self.close();
        }
    }

    fn close(&self) {
        self.page.remove_class(&self.panel, &self.open_class);
        self.page.remove_class(&self.toggle, &self.open_class);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeNode, FakePage};

    fn menu_page() -> (Rc<FakePage>, FakeNode, FakeNode, FakeNode, FakeNode) {
        let page = Rc::new(FakePage::new());
        let navbar = page.spawn(&page.body(), "nav.navbar");
        let toggle = page.spawn(&navbar, "button#mobileMenuToggle");
        let bars = page.spawn(&toggle, "span.bar");
        let panel = page.spawn(&navbar, "ul#navMenu.nav-menu");
        let item = page.spawn(&panel, "li");
        let link = page.spawn(&item, "a[href=about.html]");
        (page, toggle, bars, panel, link)
    }

    #[test]
    fn toggling_twice_restores_state() {
        let (page, _, _, _, _) = menu_page();
        let menu = MenuController::init(page, &MenuConfig::default()).unwrap();

        assert_eq!(menu.state(), MenuState::Closed);
        assert_eq!(menu.on_toggle_click(), MenuState::Open);
        assert_eq!(menu.on_toggle_click(), MenuState::Closed);
    }

    #[test]
    fn open_class_is_mirrored_on_toggle() {
        let (page, toggle, _, panel, _) = menu_page();
        let menu = MenuController::init(page.clone(), &MenuConfig::default()).unwrap();

        menu.on_toggle_click();

        assert!(page.has_class(&panel, "active"));
        assert!(page.has_class(&toggle, "active"));
    }

    #[test]
    fn link_click_closes_panel() {
        let (page, _, _, _, link) = menu_page();
        let menu = MenuController::init(page, &MenuConfig::default()).unwrap();

        assert_eq!(menu.links(), &[link]);

        menu.on_toggle_click();
        menu.on_link_click();

        assert_eq!(menu.state(), MenuState::Closed);
    }

    #[test]
    fn outside_click_closes_but_inside_clicks_do_not() {
        let (page, _, bars, _, link) = menu_page();
        let elsewhere = page.spawn(&page.body(), "main");
        let menu = MenuController::init(page, &MenuConfig::default()).unwrap();

        menu.on_toggle_click();
        menu.on_document_click(&bars);
        assert_eq!(menu.state(), MenuState::Open);

        menu.on_document_click(&link);
        assert_eq!(menu.state(), MenuState::Open);

        menu.on_document_click(&elsewhere);
        assert_eq!(menu.state(), MenuState::Closed);
    }

    #[test]
    fn missing_markup_skips_the_menu() {
        let page = Rc::new(FakePage::new());
        page.spawn(&page.body(), "ul#navMenu");

        assert!(MenuController::init(page, &MenuConfig::default()).is_none());
    }
}
