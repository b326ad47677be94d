use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
};

use crate::page::{Page, Rect, ScheduledTask, Scheduler, Watcher};

mod selector;

use selector::{AttributeFilter, Compound, SelectorList};

// in-memory page
//
// a tree of plain records standing in for the document.  nodes are handles into an arena and
// are never freed; removing a node only detaches it, which is enough to check that a page no
// longer shows it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FakeNode(usize);

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    value: String,
    parent: Option<usize>,
    children: Vec<usize>,
    offset_top: f64,
    offset_height: f64,
    rect: Rect,
}

#[derive(Debug)]
pub struct FakePage {
    nodes: RefCell<Vec<NodeData>>,
    path: RefCell<String>,
    scroll_y: Cell<f64>,
    scroll_requests: RefCell<Vec<f64>>,
    revealed: RefCell<Vec<FakeNode>>,
}

const ROOT: usize = 0;
const HEAD: usize = 1;
const BODY: usize = 2;

impl FakePage {
    pub fn new() -> Self {
        let page = FakePage {
            nodes: RefCell::new(Vec::new()),
            path: RefCell::new(String::from("/")),
            scroll_y: Cell::new(0.0),
            scroll_requests: RefCell::new(Vec::new()),
            revealed: RefCell::new(Vec::new()),
        };

        let root = page.insert("html");
        let head = page.insert("head");
        let body = page.insert("body");
        page.attach(root, head);
        page.attach(root, body);

        page
    }

    pub fn head(&self) -> FakeNode {
        FakeNode(HEAD)
    }

    pub fn body(&self) -> FakeNode {
        FakeNode(BODY)
    }

    /// Appends a new element under `parent`, described like a selector: `a#top.btn.large`.
    pub fn spawn(&self, parent: &FakeNode, description: &str) -> FakeNode {
        let compound = Compound::parse(description);

        let index = self.insert(compound.tag.as_deref().unwrap_or("div"));
        {
            let mut nodes = self.nodes.borrow_mut();
            let data = &mut nodes[index];
            data.id = compound.id;
            data.classes = compound.classes;
            for filter in compound.attributes {
                match filter {
                    AttributeFilter::Present(name) => data.attributes.insert(name, String::new()),
                    AttributeFilter::Equals(name, value) | AttributeFilter::Prefix(name, value) => {
                        data.attributes.insert(name, value)
                    }
                };
            }
        }
        self.attach(parent.0, index);

        FakeNode(index)
    }

    pub fn set_value(&self, node: &FakeNode, value: &str) {
        self.nodes.borrow_mut()[node.0].value = value.to_owned();
    }

    pub fn set_layout(&self, node: &FakeNode, offset_top: f64, offset_height: f64) {
        let mut nodes = self.nodes.borrow_mut();
        nodes[node.0].offset_top = offset_top;
        nodes[node.0].offset_height = offset_height;
    }

    pub fn set_rect(&self, node: &FakeNode, rect: Rect) {
        self.nodes.borrow_mut()[node.0].rect = rect;
    }

    pub fn set_path(&self, path: &str) {
        *self.path.borrow_mut() = path.to_owned();
    }

    pub fn set_scroll_y(&self, offset: f64) {
        self.scroll_y.set(offset);
    }

    pub fn style(&self, node: &FakeNode, property: &str) -> Option<String> {
        self.nodes.borrow()[node.0].styles.get(property).cloned()
    }

    pub fn text(&self, node: &FakeNode) -> String {
        self.nodes.borrow()[node.0].text.clone()
    }

    pub fn classes(&self, node: &FakeNode) -> Vec<String> {
        self.nodes.borrow()[node.0].classes.clone()
    }

    pub fn children(&self, node: &FakeNode) -> Vec<FakeNode> {
        self.nodes.borrow()[node.0]
            .children
            .iter()
            .map(|&index| FakeNode(index))
            .collect()
    }

    /// Whether `node` is reachable from the document root.
    pub fn is_connected(&self, node: &FakeNode) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = node.0;
        loop {
            if current == ROOT {
                return true;
            }
            match nodes[current].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn scroll_requests(&self) -> Vec<f64> {
        self.scroll_requests.borrow().clone()
    }

    pub fn revealed(&self) -> Vec<FakeNode> {
        self.revealed.borrow().clone()
    }

    fn insert(&self, tag: &str) -> usize {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeData {
            tag: tag.to_ascii_lowercase(),
            ..NodeData::default()
        });
        nodes.len() - 1
    }

    fn attach(&self, parent: usize, child: usize) {
        self.detach(child);

        let mut nodes = self.nodes.borrow_mut();
        nodes[child].parent = Some(parent);
        nodes[parent].children.push(child);
    }

    fn detach(&self, child: usize) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[child].parent.take() {
            nodes[parent].children.retain(|&index| index != child);
        }
    }

    // document order below (and excluding) root
    fn descendants(&self, root: usize) -> Vec<usize> {
        let nodes = self.nodes.borrow();
        let mut found = Vec::new();
        let mut stack: Vec<usize> = nodes[root].children.iter().rev().copied().collect();

        while let Some(index) = stack.pop() {
            found.push(index);
            stack.extend(nodes[index].children.iter().rev().copied());
        }

        found
    }

    fn matches_compound(&self, index: usize, compound: &Compound) -> bool {
        let nodes = self.nodes.borrow();
        let data = &nodes[index];

        if compound.tag.as_ref().is_some_and(|tag| *tag != data.tag) {
            return false;
        }
        if compound.id.is_some() && compound.id != data.id {
            return false;
        }
        if !compound
            .classes
            .iter()
            .all(|class| data.classes.contains(class))
        {
            return false;
        }

        compound.attributes.iter().all(|filter| match filter {
            AttributeFilter::Present(name) => data.attributes.contains_key(name),
            AttributeFilter::Equals(name, value) => data.attributes.get(name) == Some(value),
            AttributeFilter::Prefix(name, prefix) => data
                .attributes
                .get(name)
                .is_some_and(|value| value.starts_with(prefix.as_str())),
        })
    }

    fn matches(&self, index: usize, selectors: &SelectorList) -> bool {
        selectors.0.iter().any(|chain| {
            let Some((last, ancestors)) = chain.0.split_last() else {
                return false;
            };
            if !self.matches_compound(index, last) {
                return false;
            }

            // descendant combinators only, so taking the nearest matching ancestor never loses a match
            let mut current = self.nodes.borrow()[index].parent;
            for compound in ancestors.iter().rev() {
                loop {
                    let Some(candidate) = current else {
                        return false;
                    };
                    current = self.nodes.borrow()[candidate].parent;
                    if self.matches_compound(candidate, compound) {
                        break;
                    }
                }
            }
            true
        })
    }

    fn select(&self, root: usize, selector: &str) -> Vec<FakeNode> {
        let selectors = SelectorList::parse(selector);

        self.descendants(root)
            .into_iter()
            .filter(|&index| self.matches(index, &selectors))
            .map(FakeNode)
            .collect()
    }
}

impl Default for FakePage {
    fn default() -> Self {
        FakePage::new()
    }
}

impl Page for FakePage {
    type Node = FakeNode;

    fn by_id(&self, id: &str) -> Option<FakeNode> {
        self.descendants(ROOT)
            .into_iter()
            .find(|&index| self.nodes.borrow()[index].id.as_deref() == Some(id))
            .map(FakeNode)
    }

    fn query_all(&self, selector: &str) -> Vec<FakeNode> {
        self.select(ROOT, selector)
    }

    fn query_within(&self, root: &FakeNode, selector: &str) -> Vec<FakeNode> {
        self.select(root.0, selector)
    }

    fn contains(&self, ancestor: &FakeNode, node: &FakeNode) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = Some(node.0);
        while let Some(index) = current {
            if index == ancestor.0 {
                return true;
            }
            current = nodes[index].parent;
        }
        false
    }

    fn parent(&self, node: &FakeNode) -> Option<FakeNode> {
        self.nodes.borrow()[node.0].parent.map(FakeNode)
    }

    fn has_class(&self, node: &FakeNode, class: &str) -> bool {
        self.nodes.borrow()[node.0]
            .classes
            .iter()
            .any(|present| present == class)
    }

    fn add_class(&self, node: &FakeNode, class: &str) {
        if !self.has_class(node, class) {
            self.nodes.borrow_mut()[node.0].classes.push(class.to_owned());
        }
    }

    fn remove_class(&self, node: &FakeNode, class: &str) {
        self.nodes.borrow_mut()[node.0]
            .classes
            .retain(|present| present != class);
    }

    fn attribute(&self, node: &FakeNode, name: &str) -> Option<String> {
        let nodes = self.nodes.borrow();
        let data = &nodes[node.0];
        match name {
            "id" => data.id.clone(),
            "class" => Some(data.classes.join(" ")),
            _ => data.attributes.get(name).cloned(),
        }
    }

    fn set_attribute(&self, node: &FakeNode, name: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let data = &mut nodes[node.0];
        match name {
            "id" => data.id = Some(value.to_owned()),
            "class" => data.classes = value.split_whitespace().map(str::to_owned).collect(),
            _ => {
                data.attributes.insert(name.to_owned(), value.to_owned());
            }
        }
    }

    fn remove_attribute(&self, node: &FakeNode, name: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let data = &mut nodes[node.0];
        match name {
            "id" => data.id = None,
            "class" => data.classes.clear(),
            _ => {
                data.attributes.remove(name);
            }
        }
    }

    fn set_style(&self, node: &FakeNode, property: &str, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .styles
            .insert(property.to_owned(), value.to_owned());
    }

    fn set_text(&self, node: &FakeNode, text: &str) {
        self.nodes.borrow_mut()[node.0].text = text.to_owned();
    }

    fn value(&self, node: &FakeNode) -> String {
        self.nodes.borrow()[node.0].value.clone()
    }

    fn field_value(&self, form: &FakeNode, name: &str) -> Option<String> {
        self.descendants(form.0)
            .into_iter()
            .find(|&index| {
                self.nodes.borrow()[index].attributes.get("name").map(String::as_str) == Some(name)
            })
            .map(|index| self.nodes.borrow()[index].value.clone())
    }

    fn reset_form(&self, form: &FakeNode) {
        for index in self.descendants(form.0) {
            self.nodes.borrow_mut()[index].value.clear();
        }
    }

    fn offset_top(&self, node: &FakeNode) -> f64 {
        self.nodes.borrow()[node.0].offset_top
    }

    fn offset_height(&self, node: &FakeNode) -> f64 {
        self.nodes.borrow()[node.0].offset_height
    }

    fn bounding_rect(&self, node: &FakeNode) -> Rect {
        self.nodes.borrow()[node.0].rect
    }

    fn create_element(&self, tag: &str) -> Option<FakeNode> {
        Some(FakeNode(self.insert(tag)))
    }

    fn append_child(&self, parent: &FakeNode, child: &FakeNode) {
        self.attach(parent.0, child.0);
    }

    fn append_to_head(&self, child: &FakeNode) {
        self.attach(HEAD, child.0);
    }

    fn remove(&self, node: &FakeNode) {
        self.detach(node.0);
    }

    fn path(&self) -> String {
        self.path.borrow().clone()
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn smooth_scroll_to(&self, top: f64) {
        self.scroll_requests.borrow_mut().push(top);
    }

    fn scroll_into_view(&self, node: &FakeNode) {
        self.revealed.borrow_mut().push(*node);
    }
}

// manual clock
//
// tasks run only when the test advances time, in (deadline, submission order), which mirrors how
// browser timers with equal deadlines fire
struct PendingTask {
    due: u64,
    seq: u64,
    cancelled: Rc<Cell<bool>>,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<u64>,
    seq: Cell<u64>,
    queue: RefCell<Vec<PendingTask>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        ManualScheduler::default()
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Number of tasks still waiting to run and not cancelled.
    pub fn pending(&self) -> usize {
        self.queue
            .borrow()
            .iter()
            .filter(|pending| !pending.cancelled.get())
            .count()
    }

    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;

        loop {
            // the task has to leave the queue before it runs, it may schedule more work
            let next = {
                let mut queue = self.queue.borrow_mut();
                let position = queue
                    .iter()
                    .enumerate()
                    .filter(|(_, pending)| pending.due <= target)
                    .min_by_key(|(_, pending)| (pending.due, pending.seq))
                    .map(|(position, _)| position);
                position.map(|position| queue.remove(position))
            };

            let Some(pending) = next else {
                break;
            };

            self.now.set(pending.due);
            if !pending.cancelled.get() {
                (pending.task)();
            }
        }

        self.now.set(target);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ScheduledTask {
        let seq = self.seq.get();
        self.seq.set(seq + 1);

        let cancelled = Rc::new(Cell::new(false));
        self.queue.borrow_mut().push(PendingTask {
            due: self.now.get() + u64::from(delay_ms),
            seq,
            cancelled: cancelled.clone(),
            task,
        });

        ScheduledTask::new(move || cancelled.set(true))
    }
}

#[derive(Debug, Default)]
pub struct FakeWatcher {
    observed: RefCell<Vec<FakeNode>>,
}

impl FakeWatcher {
    pub fn new() -> Self {
        FakeWatcher::default()
    }

    pub fn is_observed(&self, node: &FakeNode) -> bool {
        self.observed.borrow().contains(node)
    }

    pub fn observed(&self) -> Vec<FakeNode> {
        self.observed.borrow().clone()
    }
}

impl Watcher<FakeNode> for FakeWatcher {
    fn observe(&self, node: &FakeNode) {
        let mut observed = self.observed.borrow_mut();
        if !observed.contains(node) {
            observed.push(*node);
        }
    }

    fn unobserve(&self, node: &FakeNode) {
        self.observed.borrow_mut().retain(|present| present != node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descendant_selectors_respect_nesting() {
        let page = FakePage::new();
        let menu = page.spawn(&page.body(), "ul.nav-menu");
        let inside = page.spawn(&menu, "a");
        let _outside = page.spawn(&page.body(), "a");

        assert_eq!(page.query_all(".nav-menu a"), vec![inside]);
        assert_eq!(page.query_all("a").len(), 2);
    }

    #[test]
    fn removed_nodes_leave_the_document() {
        let page = FakePage::new();
        let span = page.spawn(&page.body(), "span.ripple");

        page.remove(&span);

        assert!(!page.is_connected(&span));
        assert!(page.query_all(".ripple").is_empty());
    }

    #[test]
    fn scheduler_runs_due_tasks_in_order_and_skips_cancelled() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = log.clone();
        let _a = scheduler.schedule(100, Box::new(move || first.borrow_mut().push("a")));
        let second = log.clone();
        let b = scheduler.schedule(50, Box::new(move || second.borrow_mut().push("b")));
        let third = log.clone();
        let _c = scheduler.schedule(100, Box::new(move || third.borrow_mut().push("c")));

        b.cancel();
        scheduler.advance(99);
        assert!(log.borrow().is_empty());

        scheduler.advance(1);
        assert_eq!(*log.borrow(), vec!["a", "c"]);
        assert_eq!(scheduler.pending(), 0);
    }
}
