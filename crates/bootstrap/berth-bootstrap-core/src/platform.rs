//! Traits the host platform implements.
//!
//! The core never reaches for ambient globals. The document and the external
//! component are handed in behind these seams, so the whole flow runs against
//! fakes in native tests and against the real DOM in the wasm binding.

use crate::click::ClickPoint;
use crate::ids::BindingId;
use crate::Result;

/// Callback invoked for each click on a bound element.
pub type ClickHandler = Box<dyn FnMut(ClickPoint)>;

/// Host document access.
pub trait PageDom {
    /// Handle to an element in the host document.
    type Node: Clone;

    /// Look up an element by its id attribute.
    fn node_by_id(&self, id: &str) -> Option<Self::Node>;

    /// First element matching a selector, in document order.
    fn first_match(&self, selector: &str) -> Option<Self::Node>;

    /// Load a stylesheet for its side effects.
    fn load_stylesheet(&mut self, href: &str) -> Result<()>;

    /// Attach a click handler to a node. The returned id identifies the
    /// registration for a later [`detach_click`](Self::detach_click).
    fn attach_click(&mut self, node: &Self::Node, handler: ClickHandler) -> Result<BindingId>;

    /// Remove a click registration. Unknown ids are a no-op.
    fn detach_click(&mut self, binding: BindingId);
}

/// The external UI component's embedding entry point.
pub trait UiEmbed<N> {
    /// Invoke the entry point with the mount node and the resolved asset URL.
    fn embed(&mut self, mount: &N, asset_url: &str) -> Result<()>;

    /// Whether this component reports readiness after embedding.
    ///
    /// Components that stay silent leave attach timing to the policy
    /// deadline; see [`AttachPolicy`](crate::AttachPolicy).
    fn signals_readiness(&self) -> bool {
        false
    }
}
