use std::fmt::Debug;

// abstract page
//
// this is the narrow slice of the DOM that the controllers need.  every method is infallible
// from the caller's point of view: the browser implementation logs platform errors and carries
// on, which matches how the site behaves when a piece of markup is missing
pub trait Page {
    type Node: Clone + Debug + PartialEq;

    fn by_id(&self, id: &str) -> Option<Self::Node>;

    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    fn query_within(&self, root: &Self::Node, selector: &str) -> Vec<Self::Node>;

    fn query(&self, selector: &str) -> Option<Self::Node> {
        self.query_all(selector).into_iter().next()
    }

    /// True when `node` is `ancestor` or sits anywhere below it.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    // classes and attributes
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn add_class(&self, node: &Self::Node, class: &str);

    fn remove_class(&self, node: &Self::Node, class: &str);

    /// Flips `class` on `node` and returns whether it is now present.
    fn toggle_class(&self, node: &Self::Node, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            true
        }
    }

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

    fn remove_attribute(&self, node: &Self::Node, name: &str);

    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    fn set_text(&self, node: &Self::Node, text: &str);

    // form controls
    fn value(&self, node: &Self::Node) -> String;

    /// The submitted value of the control called `name` inside `form`, if there is one.
    fn field_value(&self, form: &Self::Node, name: &str) -> Option<String>;

    fn reset_form(&self, form: &Self::Node);

    // layout
    fn offset_top(&self, node: &Self::Node) -> f64;

    fn offset_height(&self, node: &Self::Node) -> f64;

    fn bounding_rect(&self, node: &Self::Node) -> Rect;

    // tree mutation
    fn create_element(&self, tag: &str) -> Option<Self::Node>;

    fn append_child(&self, parent: &Self::Node, child: &Self::Node);

    fn append_to_head(&self, child: &Self::Node);

    fn remove(&self, node: &Self::Node);

    // window
    fn path(&self) -> String;

    fn scroll_y(&self) -> f64;

    fn smooth_scroll_to(&self, top: f64);

    fn scroll_into_view(&self, node: &Self::Node);
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

// what a click handler wants done with the browser's default action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    Intercepted,
    Default,
}

impl Disposition {
    pub fn prevents_default(self) -> bool {
        self == Disposition::Intercepted
    }
}

// deferred work
//
// dropping a ScheduledTask detaches it (the work still runs); only an explicit cancel() stops it.
// this lets fire-and-forget cleanups like the ripple removal skip bookkeeping entirely
pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ScheduledTask;
}

pub struct ScheduledTask {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl ScheduledTask {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        ScheduledTask {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Debug for ScheduledTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

// visibility watcher
//
// notifications are delivered by whoever owns the watcher (an IntersectionObserver callback in
// the browser, the test itself otherwise) straight to the controller's on_visible handler
pub trait Watcher<N> {
    fn observe(&self, node: &N);

    fn unobserve(&self, node: &N);
}
