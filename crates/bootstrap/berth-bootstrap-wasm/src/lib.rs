//! wasm-bindgen interface for Berth page bootstrap.
//!
//! JS constructs a [`PageBoot`], registers asset URLs, hands over the
//! component's embed entry point, and the binding drives the core session:
//! one embed invocation, then a click listener attached per the configured
//! policy. The fallback deadline runs on a one-shot `gloo` timeout that is
//! never cancelled; the core absorbs a fire that arrives after readiness
//! already attached the listener.

mod dom;
mod embed;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Timeout;
use js_sys::Function;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use berth_bootstrap::{AttachOutcome, BootSession, BootstrapConfig};

pub use crate::dom::DomPage;
pub use crate::embed::{BrowserSink, JsEmbedder};

type Session = BootSession<DomPage, JsEmbedder>;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

#[wasm_bindgen]
pub struct PageBoot {
    session: Rc<RefCell<Session>>,
    click_callback: Rc<RefCell<Option<Function>>>,
    deadline_ms: Option<u32>,
}

#[wasm_bindgen]
impl PageBoot {
    /// Create a boot controller over the current document. Pass a JSON
    /// config object or undefined/null for the legacy defaults
    /// (#root, svg, map.jpg, main.css, 1000 ms).
    /// Example:
    ///   new PageBoot({ attach: { after_delay: { delay_ms: 500 } } })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<PageBoot, JsError> {
        console_error_panic_hook::set_once();

        let cfg: BootstrapConfig = if jsvalue_is_undefined_or_null(&config) {
            BootstrapConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        let deadline_ms = cfg.attach.deadline().map(|d| d.as_millis() as u32);
        let page = DomPage::new().map_err(|e| JsError::new(&e.to_string()))?;
        let (sink, click_callback) = BrowserSink::new();
        let session = BootSession::new(page, JsEmbedder::new(), cfg).with_sink(sink);

        Ok(PageBoot {
            session: Rc::new(RefCell::new(session)),
            click_callback,
            deadline_ms,
        })
    }

    /// Register a logical asset name with the URL the deployment serves it
    /// from.
    #[wasm_bindgen(js_name = register_asset)]
    pub fn register_asset(&mut self, name: String, url: String) {
        self.session.borrow_mut().register_asset(name, url);
    }

    /// Forward each logged click to `callback(x, y)` in addition to the
    /// console line.
    #[wasm_bindgen(js_name = on_click)]
    pub fn on_click(&mut self, callback: Function) {
        *self.click_callback.borrow_mut() = Some(callback);
    }

    /// Declare that the component will signal readiness through
    /// [`notify_ready`](Self::notify_ready).
    #[wasm_bindgen(js_name = set_signals_readiness)]
    pub fn set_signals_readiness(&mut self, value: bool) {
        self.session
            .borrow_mut()
            .embedder
            .set_signals_readiness(value);
    }

    /// Embed the component. `embed(mountNode, assetUrl)` runs exactly once,
    /// and the attach deadline timer is armed if the policy has one.
    #[wasm_bindgen]
    pub fn start(&mut self, embed: Function) -> Result<(), JsError> {
        {
            let mut session = self.session.borrow_mut();
            session.embedder.set_entry(embed);
            session.start().map_err(|e| JsError::new(&e.to_string()))?;
        }
        if let Some(delay_ms) = self.deadline_ms {
            let session = Rc::clone(&self.session);
            // One-shot, never cancelled. A fire after readiness already
            // attached is a no-op in the core.
            Timeout::new(delay_ms, move || {
                let dt = Duration::from_millis(u64::from(delay_ms));
                if let Err(err) = session.borrow_mut().advance(dt) {
                    web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
                }
            })
            .forget();
        }
        Ok(())
    }

    /// Relay the component's readiness signal. Returns true if this call
    /// attached the listener.
    #[wasm_bindgen(js_name = notify_ready)]
    pub fn notify_ready(&mut self) -> Result<bool, JsError> {
        let outcome = self
            .session
            .borrow_mut()
            .notify_ready()
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(outcome == AttachOutcome::Attached)
    }

    /// Remove the click listener.
    #[wasm_bindgen]
    pub fn detach(&mut self) -> Result<(), JsError> {
        self.session
            .borrow_mut()
            .detach()
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Re-bind the listener to the first current selector match, for hosts
    /// whose target element was replaced after attach.
    #[wasm_bindgen]
    pub fn reattach(&mut self) -> Result<(), JsError> {
        self.session
            .borrow_mut()
            .reattach()
            .map(|_| ())
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Current lifecycle phase as a string.
    #[wasm_bindgen]
    pub fn phase(&self) -> String {
        self.session.borrow().phase().as_str().to_string()
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
