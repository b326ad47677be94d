use gloo_timers::callback::Timeout;
use tracing::warn;
use web_sys::Window;

use rsk_common::page::{ScheduledTask, Scheduler};

// browser timers
//
// the timeout is forgotten straight away so that dropping the task handle never cancels it;
// cancellation goes through clearTimeout with the id gloo hands back
pub struct TimeoutScheduler {
    window: Window,
}

impl TimeoutScheduler {
    pub fn new(window: Window) -> Self {
        TimeoutScheduler { window }
    }
}

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ScheduledTask {
        let id = Timeout::new(delay_ms, task).forget();
        let window = self.window.clone();

        ScheduledTask::new(move || match id.as_f64() {
            Some(id) => window.clear_timeout_with_handle(id as i32),
            None => warn!("timeout id {id:?} is not a number, cannot cancel"),
        })
    }
}
