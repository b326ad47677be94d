use std::rc::Rc;

use tracing::debug;

use crate::{config::InputConfig, page::Page};

// input wrappers
//
// the styling hooks live on the control's parent: "focused" while the control has focus and
// "filled" whenever its trimmed value is non-empty.  filled is only re-evaluated on blur and
// once at startup
pub struct InputStateStyler<P: Page> {
    page: Rc<P>,
    inputs: Vec<P::Node>,
    focused_class: String,
    filled_class: String,
}

impl<P: Page> InputStateStyler<P> {
    pub fn init(page: Rc<P>, config: &InputConfig) -> Option<Self> {
        let inputs = page.query_all(&config.selector);
        if inputs.is_empty() {
            debug!("no form inputs to style");
            return None;
        }

        let styler = InputStateStyler {
            page,
            inputs,
            focused_class: config.focused_class.clone(),
            filled_class: config.filled_class.clone(),
        };

        for input in &styler.inputs {
            if styler.page.value(input).trim().is_empty() {
                continue;
            }
            if let Some(wrapper) = styler.page.parent(input) {
                styler.page.add_class(&wrapper, &styler.filled_class);
            }
        }
        debug!("styling {} form inputs", styler.inputs.len());

        Some(styler)
    }

    pub fn inputs(&self) -> &[P::Node] {
        &self.inputs
    }

    pub fn on_focus(&self, input: &P::Node) {
        if let Some(wrapper) = self.page.parent(input) {
            self.page.add_class(&wrapper, &self.focused_class);
        }
    }

    pub fn on_blur(&self, input: &P::Node) {
        let Some(wrapper) = self.page.parent(input) else {
            return;
        };

        self.page.remove_class(&wrapper, &self.focused_class);
        if self.page.value(input).trim().is_empty() {
            self.page.remove_class(&wrapper, &self.filled_class);
        } else {
            self.page.add_class(&wrapper, &self.filled_class);
        }
    }
}
