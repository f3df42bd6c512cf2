//! JS-side implementations of the component and sink seams.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::JsValue;
use web_sys::Element;

use berth_bootstrap::{BootstrapError, ClickPoint, ClickSink, Result, UiEmbed};

/// Calls the external component's embedding entry point, a JS function of
/// `(mountNode, assetUrl)`.
pub struct JsEmbedder {
    entry: Option<Function>,
    readiness: bool,
}

impl JsEmbedder {
    pub fn new() -> Self {
        Self {
            entry: None,
            readiness: false,
        }
    }

    /// Set the entry point function.
    pub fn set_entry(&mut self, entry: Function) {
        self.entry = Some(entry);
    }

    /// Declare whether the component will follow up with a readiness signal.
    pub fn set_signals_readiness(&mut self, readiness: bool) {
        self.readiness = readiness;
    }
}

impl Default for JsEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl UiEmbed<Element> for JsEmbedder {
    fn embed(&mut self, mount: &Element, asset_url: &str) -> Result<()> {
        let entry = self
            .entry
            .as_ref()
            .ok_or_else(|| BootstrapError::EmbedFailed {
                reason: "no entry point set".to_string(),
            })?;
        entry
            .call2(
                &JsValue::UNDEFINED,
                mount.as_ref(),
                &JsValue::from_str(asset_url),
            )
            .map_err(|e| BootstrapError::EmbedFailed {
                reason: format!("{e:?}"),
            })?;
        Ok(())
    }

    fn signals_readiness(&self) -> bool {
        self.readiness
    }
}

/// Sink that prints `x y` to the browser console, exactly like the legacy
/// inline handler, and optionally forwards each click to a JS callback.
pub struct BrowserSink {
    callback: Rc<RefCell<Option<Function>>>,
}

impl BrowserSink {
    /// Returns the sink and the shared callback slot the binding fills in
    /// later via `on_click`.
    pub fn new() -> (Self, Rc<RefCell<Option<Function>>>) {
        let callback = Rc::new(RefCell::new(None));
        (
            Self {
                callback: Rc::clone(&callback),
            },
            callback,
        )
    }
}

impl ClickSink for BrowserSink {
    fn record(&mut self, point: ClickPoint) {
        web_sys::console::log_2(&JsValue::from_f64(point.x), &JsValue::from_f64(point.y));
        // Clone out of the cell so a callback that re-registers itself
        // cannot hit a live borrow.
        let callback = self.callback.borrow().clone();
        if let Some(function) = callback {
            let _ = function.call2(
                &JsValue::UNDEFINED,
                &JsValue::from_f64(point.x),
                &JsValue::from_f64(point.y),
            );
        }
    }
}
