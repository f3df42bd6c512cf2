//! In-memory fakes for driving the bootstrap flow without a browser.

use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::click::{ClickPoint, ClickSink};
use crate::config::BootstrapConfig;
use crate::ids::{BindingId, IdAllocator};
use crate::platform::{ClickHandler, PageDom, UiEmbed};
use crate::session::BootSession;
use crate::{BootstrapError, Result};

/// An element in a [`FakePage`] document.
///
/// Identity matters: replacing an element yields a node with the same tag
/// but a fresh key, exactly like a re-rendered DOM element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FakeNode {
    /// Tag name; selectors match against it.
    pub tag: String,
    /// Document-unique key distinguishing same-tag nodes.
    pub key: u32,
}

struct Registration {
    target: FakeNode,
    handler: ClickHandler,
}

/// In-memory document implementing [`PageDom`].
///
/// Selector matching is deliberately tiny: a selector matches elements whose
/// tag equals the selector string, in insertion order.
#[derive(Default)]
pub struct FakePage {
    next_key: u32,
    ids: IdAllocator,
    mounts: HashMap<String, FakeNode>,
    nodes: Vec<FakeNode>,
    /// Stylesheet hrefs handed to the page, in load order.
    pub stylesheets: Vec<String>,
    /// When set, `load_stylesheet` fails with this reason.
    pub stylesheet_error: Option<String>,
    /// When set, `attach_click` fails with this reason.
    pub attach_error: Option<String>,
    handlers: HashMap<BindingId, Registration>,
    /// Bindings removed via `detach_click`, in removal order.
    pub detach_log: Vec<BindingId>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page with a single mount element, the common starting point.
    pub fn with_mount(id: &str) -> Self {
        let mut page = Self::new();
        page.insert_mount(id);
        page
    }

    /// Append a `div` carrying an id attribute.
    pub fn insert_mount(&mut self, id: impl Into<String>) -> FakeNode {
        let node = self.fresh("div");
        self.mounts.insert(id.into(), node.clone());
        self.nodes.push(node.clone());
        node
    }

    /// Append an element to the document.
    pub fn insert_node(&mut self, tag: impl Into<String>) -> FakeNode {
        let node = self.fresh(tag);
        self.nodes.push(node.clone());
        node
    }

    /// Remove an element. Its click registrations stop firing but stay
    /// allocated, like listeners on a detached DOM node.
    pub fn remove_node(&mut self, node: &FakeNode) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n != node);
        self.mounts.retain(|_, n| n != node);
        self.nodes.len() != before
    }

    /// Replace an element in place with a fresh identity of the same tag,
    /// like a framework re-render. Returns the new node.
    pub fn replace_node(&mut self, node: &FakeNode) -> Option<FakeNode> {
        let pos = self.nodes.iter().position(|n| n == node)?;
        let fresh = self.fresh(node.tag.clone());
        self.nodes[pos] = fresh.clone();
        self.mounts.retain(|_, n| n != node);
        Some(fresh)
    }

    /// True if the node is currently in the document.
    pub fn contains(&self, node: &FakeNode) -> bool {
        self.nodes.contains(node)
    }

    /// Number of live click registrations.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Dispatch a click on the given node. Returns how many registrations
    /// fired; clicks on removed nodes fire nothing.
    pub fn click(&mut self, node: &FakeNode, point: ClickPoint) -> usize {
        if !self.contains(node) {
            return 0;
        }
        let mut fired = 0;
        for registration in self.handlers.values_mut() {
            if registration.target == *node {
                (registration.handler)(point);
                fired += 1;
            }
        }
        fired
    }

    /// Dispatch a click on the first selector match.
    pub fn click_first(&mut self, selector: &str, point: ClickPoint) -> usize {
        match self.first_match(selector) {
            Some(node) => self.click(&node, point),
            None => 0,
        }
    }

    fn fresh(&mut self, tag: impl Into<String>) -> FakeNode {
        let node = FakeNode {
            tag: tag.into(),
            key: self.next_key,
        };
        self.next_key += 1;
        node
    }
}

impl PageDom for FakePage {
    type Node = FakeNode;

    fn node_by_id(&self, id: &str) -> Option<FakeNode> {
        self.mounts.get(id).cloned()
    }

    fn first_match(&self, selector: &str) -> Option<FakeNode> {
        self.nodes.iter().find(|n| n.tag == selector).cloned()
    }

    fn load_stylesheet(&mut self, href: &str) -> Result<()> {
        if let Some(reason) = &self.stylesheet_error {
            return Err(BootstrapError::StylesheetLoad {
                href: href.to_string(),
                reason: reason.clone(),
            });
        }
        self.stylesheets.push(href.to_string());
        Ok(())
    }

    fn attach_click(&mut self, node: &FakeNode, handler: ClickHandler) -> Result<BindingId> {
        if let Some(reason) = &self.attach_error {
            return Err(BootstrapError::AttachFailed {
                reason: reason.clone(),
            });
        }
        let binding = self.ids.alloc_binding();
        self.handlers.insert(
            binding,
            Registration {
                target: node.clone(),
                handler,
            },
        );
        Ok(binding)
    }

    fn detach_click(&mut self, binding: BindingId) {
        if self.handlers.remove(&binding).is_some() {
            self.detach_log.push(binding);
        }
    }
}

/// Embedder that records entry-point invocations.
pub struct RecordingEmbedder {
    /// Each invocation as `(mount, asset_url)`, in call order.
    pub calls: Vec<(FakeNode, String)>,
    /// Value reported from `signals_readiness`.
    pub ready: bool,
    /// Forces the next embed to fail with this reason.
    pub fail_with: Option<String>,
}

impl RecordingEmbedder {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            ready: false,
            fail_with: None,
        }
    }

    /// Embedder that reports readiness support.
    pub fn signaling() -> Self {
        Self {
            ready: true,
            ..Self::new()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }
}

impl Default for RecordingEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl UiEmbed<FakeNode> for RecordingEmbedder {
    fn embed(&mut self, mount: &FakeNode, asset_url: &str) -> Result<()> {
        // Record first: a failing entry point was still invoked.
        self.calls.push((mount.clone(), asset_url.to_string()));
        if let Some(reason) = self.fail_with.take() {
            return Err(BootstrapError::EmbedFailed { reason });
        }
        Ok(())
    }

    fn signals_readiness(&self) -> bool {
        self.ready
    }
}

/// Sink that collects clicks for inspection. Clones share one buffer, so a
/// test can keep a handle while the session owns the other.
#[derive(Clone, Default)]
pub struct CollectingSink {
    points: Rc<RefCell<Vec<ClickPoint>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the recorded clicks, in arrival order.
    pub fn points(&self) -> Vec<ClickPoint> {
        self.points.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.points.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.borrow().is_empty()
    }
}

impl ClickSink for CollectingSink {
    fn record(&mut self, point: ClickPoint) {
        self.points.borrow_mut().push(point);
    }
}

/// Page with the default mount and one `svg` graphic.
pub fn page_with_graphic() -> FakePage {
    let mut page = FakePage::with_mount("root");
    page.insert_node("svg");
    page
}

/// Fully wired session over fakes: default config, registered image and
/// stylesheet, collecting sink. Returns the session and the sink handle.
pub fn boot_session() -> (BootSession<FakePage, RecordingEmbedder>, CollectingSink) {
    let sink = CollectingSink::new();
    let session = BootSession::new(
        page_with_graphic(),
        RecordingEmbedder::new(),
        BootstrapConfig::default(),
    )
    .with_asset("map.jpg", "/assets/map-3ab41c.jpg")
    .with_asset("main.css", "/assets/main-0f2d66.css")
    .with_sink(sink.clone());
    (session, sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicks_on_removed_nodes_fire_nothing() {
        let mut page = page_with_graphic();
        let svg = page.first_match("svg").unwrap();
        let hits = Rc::new(RefCell::new(0u32));
        let seen = Rc::clone(&hits);
        page.attach_click(&svg, Box::new(move |_| *seen.borrow_mut() += 1))
            .unwrap();

        assert_eq!(page.click(&svg, ClickPoint::new(1.0, 2.0)), 1);
        page.remove_node(&svg);
        assert_eq!(page.click(&svg, ClickPoint::new(1.0, 2.0)), 0);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn replace_keeps_tag_but_changes_identity() {
        let mut page = page_with_graphic();
        let old = page.first_match("svg").unwrap();
        let new = page.replace_node(&old).unwrap();
        assert_eq!(new.tag, "svg");
        assert_ne!(new, old);
        assert_eq!(page.first_match("svg").unwrap(), new);
        assert!(!page.contains(&old));
    }
}
