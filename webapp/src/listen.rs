use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{Event, EventTarget};

use crate::dom::LogFailure;

// listeners are never removed, so their closures are leaked
pub fn listen<F>(target: &EventTarget, event: &str, handler: F)
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);

    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .log_failure("failed to add event listener");

    closure.forget();
}
