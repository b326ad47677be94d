use tracing::debug;

use crate::{config::NavConfig, page::Page};

// the last path segment, i.e. what follows the final slash
pub fn tail_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

pub fn current_page<'a>(path: &'a str, index_page: &'a str) -> &'a str {
    match tail_segment(path) {
        "" => index_page,
        page => page,
    }
}

// marks every navigation link pointing at the current page and clears the rest.  runs once at
// startup, returns how many links ended up active
pub fn highlight_active_links<P: Page>(page: &P, config: &NavConfig) -> usize {
    let path = page.path();
    let current = current_page(&path, &config.index_page);

    let mut marked = 0;
    for link in page.query_all(&config.link_selector) {
        page.remove_class(&link, &config.active_class);

        let Some(href) = page.attribute(&link, "href") else {
            continue;
        };
        if tail_segment(&href) == current {
            page.add_class(&link, &config.active_class);
            marked += 1;
        }
    }

    debug!("highlighted {marked} navigation links for {current}");
    marked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakePage;

    fn nav_page() -> (FakePage, Vec<crate::fake::FakeNode>) {
        let page = FakePage::new();
        let menu = page.spawn(&page.body(), "ul.nav-menu");
        let links = ["index.html", "about.html", "products.html", "/catalog/products.html"]
            .into_iter()
            .map(|href| {
                let link = page.spawn(&menu, "a.active");
                page.set_attribute(&link, "href", href);
                link
            })
            .collect();
        (page, links)
    }

    #[test]
    fn tail_segments() {
        assert_eq!(tail_segment("/products.html"), "products.html");
        assert_eq!(tail_segment("/a/b/"), "");
        assert_eq!(tail_segment("about.html"), "about.html");
        assert_eq!(current_page("/", "index.html"), "index.html");
        assert_eq!(current_page("", "index.html"), "index.html");
    }

    #[test]
    fn only_matching_links_are_active() {
        let (page, links) = nav_page();
        page.set_path("/products.html");

        assert_eq!(highlight_active_links(&page, &NavConfig::default()), 2);

        assert!(!page.has_class(&links[0], "active"));
        assert!(!page.has_class(&links[1], "active"));
        assert!(page.has_class(&links[2], "active"));
        assert!(page.has_class(&links[3], "active"));
    }

    #[test]
    fn root_path_selects_index() {
        let (page, links) = nav_page();
        page.set_path("/");

        assert_eq!(highlight_active_links(&page, &NavConfig::default()), 1);
        assert!(page.has_class(&links[0], "active"));
    }

    #[test]
    fn link_without_href_is_cleared() {
        let page = FakePage::new();
        let menu = page.spawn(&page.body(), "ul.nav-menu");
        let link = page.spawn(&menu, "a.active");
        page.set_path("/about.html");

        assert_eq!(highlight_active_links(&page, &NavConfig::default()), 0);
        assert!(!page.has_class(&link, "active"));
    }
}
