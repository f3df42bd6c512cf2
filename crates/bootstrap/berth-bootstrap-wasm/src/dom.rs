//! Browser implementation of the core page seams.

use std::collections::HashMap;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, MouseEvent};

use berth_bootstrap::ids::IdAllocator;
use berth_bootstrap::{BindingId, BootstrapError, ClickHandler, ClickPoint, PageDom, Result};

/// Stored click closure plus the element it is attached to, so detach can
/// remove the browser listener and drop the closure together.
struct BindingEntry {
    target: Element,
    closure: Closure<dyn FnMut(MouseEvent)>,
}

/// [`PageDom`] over the real browser document.
///
/// Closures are retained per binding; dropping one before the listener is
/// removed would leave a dangling JS shim.
pub struct DomPage {
    document: Document,
    ids: IdAllocator,
    bindings: HashMap<BindingId, BindingEntry>,
}

impl DomPage {
    /// Capture the current window's document.
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| BootstrapError::platform("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| BootstrapError::platform("no document on window"))?;
        Ok(Self {
            document,
            ids: IdAllocator::new(),
            bindings: HashMap::new(),
        })
    }
}

impl PageDom for DomPage {
    type Node = Element;

    fn node_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn first_match(&self, selector: &str) -> Option<Element> {
        // An invalid selector reads the same as no match.
        self.document.query_selector(selector).ok().flatten()
    }

    fn load_stylesheet(&mut self, href: &str) -> Result<()> {
        let link = self
            .document
            .create_element("link")
            .map_err(|e| stylesheet_error(href, &e))?;
        link.set_attribute("rel", "stylesheet")
            .map_err(|e| stylesheet_error(href, &e))?;
        link.set_attribute("href", href)
            .map_err(|e| stylesheet_error(href, &e))?;
        let head = self
            .document
            .head()
            .ok_or_else(|| BootstrapError::StylesheetLoad {
                href: href.to_string(),
                reason: "document has no head".to_string(),
            })?;
        head.append_child(&link)
            .map_err(|e| stylesheet_error(href, &e))?;
        Ok(())
    }

    fn attach_click(&mut self, node: &Element, mut handler: ClickHandler) -> Result<BindingId> {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            handler(ClickPoint::new(
                f64::from(event.offset_x()),
                f64::from(event.offset_y()),
            ));
        });
        node.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(|e| BootstrapError::AttachFailed {
                reason: format!("{e:?}"),
            })?;
        let binding = self.ids.alloc_binding();
        self.bindings.insert(
            binding,
            BindingEntry {
                target: node.clone(),
                closure,
            },
        );
        Ok(binding)
    }

    fn detach_click(&mut self, binding: BindingId) {
        if let Some(entry) = self.bindings.remove(&binding) {
            let _ = entry.target.remove_event_listener_with_callback(
                "click",
                entry.closure.as_ref().unchecked_ref(),
            );
        }
    }
}

fn stylesheet_error(href: &str, err: &JsValue) -> BootstrapError {
    BootstrapError::StylesheetLoad {
        href: href.to_string(),
        reason: format!("{err:?}"),
    }
}
