// site behavior
//
// each controller in this crate owns one piece of page behavior and nothing else.  they are
// built from an explicit Page handle at startup (returning None when their markup is missing)
// and expose named handlers that the wasm binding wires to real DOM events.  no controller
// calls into another
pub mod active;
pub mod anchor;
pub mod config;
pub mod fade;
pub mod form;
pub mod input;
pub mod lazy;
pub mod menu;
pub mod page;
pub mod ripple;
pub mod shadow;

#[cfg(any(test, feature = "fake"))]
pub mod fake;

pub use config::BehaviorConfig;
pub use page::{Disposition, Page, Rect, ScheduledTask, Scheduler, Watcher};

// string validation
//
// both patterns are loose: the email check only wants something@something.something
// and the phone check only restricts the alphabet, the digit count in form.rs is the real gate
pub const EMAIL_REGEX: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
pub const PHONE_REGEX: &str = r"^[0-9\s\-\+\(\)]+$";

pub const MIN_PHONE_DIGITS: usize = 10;
