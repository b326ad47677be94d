use anyhow::Result;
use js_sys::{Array, Reflect};
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{
    Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window,
};

use rsk_common::{fade::WatchOptions, page::Watcher};

use crate::dom::js_error;

pub struct ObserverWatcher(IntersectionObserver);

impl Watcher<Element> for ObserverWatcher {
    fn observe(&self, node: &Element) {
        self.0.observe(node);
    }

    fn unobserve(&self, node: &Element) {
        self.0.unobserve(node);
    }
}

pub fn is_supported(window: &Window) -> bool {
    Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

// builds an IntersectionObserver that hands every element entering the viewport to on_visible,
// together with a watcher for the observer that reported it
pub fn watch<F>(options: Option<&WatchOptions>, mut on_visible: F) -> Result<ObserverWatcher>
where
    F: FnMut(&Element, &ObserverWatcher) + 'static,
{
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            let watcher = ObserverWatcher(observer);

            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if entry.is_intersecting() {
                    on_visible(&entry.target(), &watcher);
                }
            }
        },
    );

    let init = IntersectionObserverInit::new();
    if let Some(options) = options {
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);
    }

    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
        .map_err(js_error)?;

    // the observer lives as long as the page
    callback.forget();

    Ok(ObserverWatcher(observer))
}
