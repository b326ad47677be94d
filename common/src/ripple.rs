use std::rc::Rc;

use tracing::{debug, warn};

use crate::{
    config::RippleConfig,
    page::{Page, Rect, Scheduler},
};

// where a ripple sits inside its button: a square as large as the button's longer side, centered
// on the click
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleGeometry {
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

impl RippleGeometry {
    pub fn at(rect: Rect, client_x: f64, client_y: f64) -> Self {
        let size = rect.width.max(rect.height);

        RippleGeometry {
            size,
            left: client_x - rect.left - size / 2.0,
            top: client_y - rect.top - size / 2.0,
        }
    }
}

// the animation length has to agree with the cleanup delay, so both come from the same setting
pub fn ripple_styles(button_selector: &str, class: &str, lifetime_ms: u32) -> String {
    let seconds = f64::from(lifetime_ms) / 1000.0;

    format!(
        r#"
{button_selector} {{
  position: relative;
  overflow: hidden;
}}
.{class} {{
  position: absolute;
  border-radius: 50%;
  background: rgba(255, 255, 255, 0.6);
  transform: scale(0);
  animation: ripple-animation {seconds}s ease-out;
  pointer-events: none;
}}
@keyframes ripple-animation {{
  to {{
    transform: scale(4);
    opacity: 0;
  }}
}}
"#
    )
}

pub struct RippleEffect<P: Page, S: Scheduler> {
    page: Rc<P>,
    scheduler: Rc<S>,
    buttons: Vec<P::Node>,
    config: RippleConfig,
}

impl<P: Page + 'static, S: Scheduler> RippleEffect<P, S> {
    pub fn init(page: Rc<P>, scheduler: Rc<S>, config: &RippleConfig) -> Option<Self> {
        let buttons = page.query_all(&config.button_selector);
        if buttons.is_empty() {
            debug!("no buttons, skipping ripple effect");
            return None;
        }
        debug!("attached ripple effect to {} buttons", buttons.len());

        Some(RippleEffect {
            page,
            scheduler,
            buttons,
            config: config.clone(),
        })
    }

    pub fn buttons(&self) -> &[P::Node] {
        &self.buttons
    }

    // returns the ripple node, which removes itself after the configured lifetime
    pub fn on_click(&self, button: &P::Node, client_x: f64, client_y: f64) -> Option<P::Node> {
        let geometry = RippleGeometry::at(self.page.bounding_rect(button), client_x, client_y);

        let Some(ripple) = self.page.create_element("span") else {
            warn!("failed to create ripple element");
            return None;
        };

        let size = format!("{}px", geometry.size);
        self.page.set_style(&ripple, "width", &size);
        self.page.set_style(&ripple, "height", &size);
        self.page.set_style(&ripple, "left", &format!("{}px", geometry.left));
        self.page.set_style(&ripple, "top", &format!("{}px", geometry.top));
        self.page.add_class(&ripple, &self.config.class);

        self.ensure_styles();
        self.page.append_child(button, &ripple);

        let page = self.page.clone();
        let node = ripple.clone();
        // cleanups are never cancelled, the handle is dropped
        let _ = self.scheduler.schedule(
            self.config.lifetime_ms,
            Box::new(move || page.remove(&node)),
        );

        Some(ripple)
    }

    // the stylesheet is looked up by id on every click so a page that already ships it is left alone
    fn ensure_styles(&self) {
        if self.page.by_id(&self.config.style_id).is_some() {
            return;
        }

        let Some(style) = self.page.create_element("style") else {
            warn!("failed to create ripple stylesheet");
            return;
        };

        self.page.set_attribute(&style, "id", &self.config.style_id);
        self.page.set_text(
            &style,
            &ripple_styles(
                &self.config.button_selector,
                &self.config.class,
                self.config.lifetime_ms,
            ),
        );
        self.page.append_to_head(&style);
        debug!("injected ripple stylesheet");
    }
}
