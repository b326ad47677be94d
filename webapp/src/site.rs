use std::rc::Rc;

use anyhow::Result;
use tracing::{Level, debug, error, instrument};
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};

use rsk_common::{
    BehaviorConfig, Page,
    active::highlight_active_links,
    anchor::ScrollNavigator,
    config::{FadeConfig, FormConfig, InputConfig, LazyConfig, MenuConfig, RippleConfig, ScrollConfig, ShadowConfig},
    fade::FadeInObserver,
    form::FormValidator,
    input::InputStateStyler,
    lazy::LazyImageLoader,
    menu::MenuController,
    ripple::RippleEffect,
    shadow::NavbarShadow,
};

use crate::{banner, dom::WebPage, listen::listen, timer::TimeoutScheduler, watch};

// a page can override any behavior setting with
// <script type="application/json" id="rsk-behavior-config">{ ... }</script>
pub const CONFIG_BLOCK_ID: &str = "rsk-behavior-config";

// every component is attached on its own; one with missing markup is skipped without affecting
// the others
#[instrument(level=Level::DEBUG)]
pub fn init_site() -> Result<()> {
    let page = Rc::new(WebPage::new()?);
    let scheduler = Rc::new(TimeoutScheduler::new(page.window().clone()));
    let config = load_config(&page);

    attach_menu(&page, &config.menu);
    attach_form(&page, &scheduler, &config.form);
    attach_anchors(&page, &config.scroll);
    attach_shadow(&page, &config.shadow);
    attach_fade(&page, &config.fade);
    highlight_active_links(page.as_ref(), &config.nav);
    attach_inputs(&page, &config.inputs);
    attach_ripple(&page, &scheduler, &config.ripple);
    attach_lazy(&page, &config.lazy);

    banner::welcome();
    debug!("site behavior attached");
    Ok(())
}

fn load_config(page: &WebPage) -> BehaviorConfig {
    let block = page
        .by_id(CONFIG_BLOCK_ID)
        .and_then(|block| block.text_content());

    BehaviorConfig::from_optional_json(block.as_deref())
}

fn attach_menu(page: &Rc<WebPage>, config: &MenuConfig) {
    let Some(menu) = MenuController::init(page.clone(), config) else {
        return;
    };
    let menu = Rc::new(menu);

    let handler = menu.clone();
    listen(menu.toggle(), "click", move |_| {
        handler.on_toggle_click();
    });

    for link in menu.links() {
        let handler = menu.clone();
        listen(link, "click", move |_| handler.on_link_click());
    }

    // non-element targets (the document itself) can't be inside the menu, but they also never
    // reach here from a real click
    let handler = menu.clone();
    listen(page.document(), "click", move |event| {
        if let Some(target) = event.target().and_then(|target| target.dyn_into::<Element>().ok()) {
            handler.on_document_click(&target);
        }
    });
}

fn attach_form(page: &Rc<WebPage>, scheduler: &Rc<TimeoutScheduler>, config: &FormConfig) {
    let Some(validator) = FormValidator::init(page.clone(), scheduler.clone(), config) else {
        return;
    };
    let validator = Rc::new(validator);

    let handler = validator.clone();
    listen(validator.form(), "submit", move |event| {
        event.prevent_default();
        handler.on_submit();
    });
}

fn attach_anchors(page: &Rc<WebPage>, config: &ScrollConfig) {
    let Some(navigator) = ScrollNavigator::init(page.clone(), config) else {
        return;
    };
    let navigator = Rc::new(navigator);

    for anchor in navigator.anchors() {
        let handler = navigator.clone();
        let target = anchor.clone();
        listen(anchor, "click", move |event| {
            if handler.on_anchor_click(&target).prevents_default() {
                event.prevent_default();
            }
        });
    }
}

fn attach_shadow(page: &Rc<WebPage>, config: &ShadowConfig) {
    let Some(shadow) = NavbarShadow::init(page.clone(), config) else {
        return;
    };

    listen(page.window(), "scroll", move |_| {
        shadow.on_scroll();
    });
}

fn attach_fade(page: &Rc<WebPage>, config: &FadeConfig) {
    if !watch::is_supported(page.window()) {
        debug!("no IntersectionObserver, cards stay visible");
        return;
    }
    let Some(fade) = FadeInObserver::init(page.clone(), config) else {
        return;
    };
    let fade = Rc::new(fade);

    let handler = fade.clone();
    match watch::watch(Some(fade.options()), move |card, _| handler.on_visible(card)) {
        Ok(watcher) => fade.attach(&watcher),
        Err(err) => error!("failed to watch cards: {err}"),
    }
}

fn attach_inputs(page: &Rc<WebPage>, config: &InputConfig) {
    let Some(styler) = InputStateStyler::init(page.clone(), config) else {
        return;
    };
    let styler = Rc::new(styler);

    for input in styler.inputs() {
        let handler = styler.clone();
        let target = input.clone();
        listen(input, "focus", move |_| handler.on_focus(&target));

        let handler = styler.clone();
        let target = input.clone();
        listen(input, "blur", move |_| handler.on_blur(&target));
    }
}

fn attach_ripple(page: &Rc<WebPage>, scheduler: &Rc<TimeoutScheduler>, config: &RippleConfig) {
    let Some(effect) = RippleEffect::init(page.clone(), scheduler.clone(), config) else {
        return;
    };
    let effect = Rc::new(effect);

    for button in effect.buttons() {
        let handler = effect.clone();
        let target = button.clone();
        listen(button, "click", move |event| {
            let Some(click) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            handler.on_click(&target, f64::from(click.client_x()), f64::from(click.client_y()));
        });
    }
}

fn attach_lazy(page: &Rc<WebPage>, config: &LazyConfig) {
    if !watch::is_supported(page.window()) {
        debug!("no IntersectionObserver, skipping deferred images");
        return;
    }
    let Some(loader) = LazyImageLoader::init(page.clone(), config) else {
        return;
    };
    let loader = Rc::new(loader);

    let handler = loader.clone();
    match watch::watch(None, move |image, watcher| {
        handler.on_visible(image, watcher);
    }) {
        Ok(watcher) => loader.attach(&watcher),
        Err(err) => error!("failed to watch deferred images: {err}"),
    }
}
