//! Click records and the sinks that receive them.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// A click position relative to the padding edge of the clicked element,
/// in CSS pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClickPoint {
    pub x: f64,
    pub y: f64,
}

impl ClickPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Receives every captured click, in arrival order.
pub trait ClickSink {
    fn record(&mut self, point: ClickPoint);
}

/// Shared handle to a sink.
///
/// Click handlers and the owning session both need the sink. The crate runs
/// on single-threaded hosts (browser main thread, test harness), so a
/// non-atomic shared cell is sufficient.
pub type SharedSink = Rc<RefCell<dyn ClickSink>>;

/// Wrap a sink for sharing with click handlers.
pub fn shared_sink<S: ClickSink + 'static>(sink: S) -> SharedSink {
    Rc::new(RefCell::new(sink))
}

/// Sink that forwards clicks to the `log` facade as `x y` pairs, matching
/// the legacy console output.
#[derive(Default)]
pub struct LogSink;

impl ClickSink for LogSink {
    fn record(&mut self, point: ClickPoint) {
        log::info!(target: "berth::clicks", "{} {}", point.x, point.y);
    }
}

/// Sink that drops every click.
#[derive(Default)]
pub struct NullSink;

impl ClickSink for NullSink {
    fn record(&mut self, _point: ClickPoint) {}
}
