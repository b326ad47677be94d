use anyhow::Result;
use tracing::{error, trace};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, FormData, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement, Node, NodeList, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition, ScrollToOptions, Window,
};

use rsk_common::page::{Page, Rect};

// JsValue errors have no Display, so this is the one place they become anyhow errors
pub fn js_error(err: JsValue) -> anyhow::Error {
    anyhow::Error::msg(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

pub trait LogFailure {
    fn log_failure(self, what: &str);
}

impl<T> LogFailure for Result<T, JsValue> {
    fn log_failure(self, what: &str) {
        if let Err(err) = self {
            error!("{what}: {}", js_error(err));
        }
    }
}

// the live document
//
// nodes are plain web_sys::Elements; anything the browser refuses is logged and otherwise ignored
pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn new() -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| anyhow::Error::msg("no global window exists"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::Error::msg("window has no document"))?;

        Ok(WebPage { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn elements(list: Result<NodeList, JsValue>, selector: &str) -> Vec<Element> {
        match list {
            Ok(list) => (0..list.length())
                .filter_map(|index| list.item(index))
                .filter_map(|node| node.dyn_into::<Element>().ok())
                .collect(),
            Err(err) => {
                error!("failed to query {selector:?}: {}", js_error(err));
                Vec::new()
            }
        }
    }
}

impl Page for WebPage {
    type Node = Element;

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        WebPage::elements(self.document.query_selector_all(selector), selector)
    }

    fn query_within(&self, root: &Element, selector: &str) -> Vec<Element> {
        WebPage::elements(root.query_selector_all(selector), selector)
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document
            .query_selector(selector)
            .unwrap_or_else(|err| {
                error!("failed to query {selector:?}: {}", js_error(err));
                None
            })
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let node: &Node = node.as_ref();
        ancestor.contains(Some(node))
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) {
        node.class_list()
            .add_1(class)
            .log_failure("failed to add class");
    }

    fn remove_class(&self, node: &Element, class: &str) {
        node.class_list()
            .remove_1(class)
            .log_failure("failed to remove class");
    }

    fn toggle_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().toggle(class).unwrap_or_else(|err| {
            error!("failed to toggle class {class}: {}", js_error(err));
            self.has_class(node, class)
        })
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        node.set_attribute(name, value)
            .log_failure("failed to set attribute");
    }

    fn remove_attribute(&self, node: &Element, name: &str) {
        node.remove_attribute(name)
            .log_failure("failed to remove attribute");
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        match node.dyn_ref::<HtmlElement>() {
            Some(element) => element
                .style()
                .set_property(property, value)
                .log_failure("failed to set style"),
            None => trace!("{} has no inline style, skipping {property}", node.tag_name()),
        }
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn value(&self, node: &Element) -> String {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(textarea) = node.dyn_ref::<HtmlTextAreaElement>() {
            textarea.value()
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            String::new()
        }
    }

    // goes through FormData so the values are exactly what a real submission would carry
    fn field_value(&self, form: &Element, name: &str) -> Option<String> {
        let form = form.dyn_ref::<HtmlFormElement>()?;

        match FormData::new_with_form(form) {
            Ok(data) => data.get(name).as_string(),
            Err(err) => {
                error!("failed to read form data: {}", js_error(err));
                None
            }
        }
    }

    fn reset_form(&self, form: &Element) {
        if let Some(form) = form.dyn_ref::<HtmlFormElement>() {
            form.reset();
        }
    }

    fn offset_top(&self, node: &Element) -> f64 {
        node.dyn_ref::<HtmlElement>()
            .map(|element| f64::from(element.offset_top()))
            .unwrap_or(0.0)
    }

    fn offset_height(&self, node: &Element) -> f64 {
        node.dyn_ref::<HtmlElement>()
            .map(|element| f64::from(element.offset_height()))
            .unwrap_or(0.0)
    }

    fn bounding_rect(&self, node: &Element) -> Rect {
        let rect = node.get_bounding_client_rect();

        Rect {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        }
    }

    fn create_element(&self, tag: &str) -> Option<Element> {
        self.document
            .create_element(tag)
            .map_err(|err| error!("failed to create <{tag}>: {}", js_error(err)))
            .ok()
    }

    fn append_child(&self, parent: &Element, child: &Element) {
        parent
            .append_child(child)
            .log_failure("failed to append child");
    }

    fn append_to_head(&self, child: &Element) {
        match self.document.head() {
            Some(head) => head
                .append_child(child)
                .log_failure("failed to append to head"),
            None => error!("document has no head"),
        }
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn path(&self) -> String {
        self.window.location().pathname().unwrap_or_else(|err| {
            error!("failed to read location: {}", js_error(err));
            String::new()
        })
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or_else(|err| {
            error!("failed to read scroll offset: {}", js_error(err));
            0.0
        })
    }

    fn smooth_scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);

        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn scroll_into_view(&self, node: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Nearest);

        node.scroll_into_view_with_scroll_into_view_options(&options);
    }
}
