//! Lifecycle events emitted while a page boots.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Types of bootstrap lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EventKind {
    /// The stylesheet was handed to the platform.
    StylesheetLoaded,
    /// The stylesheet could not be loaded; bootstrap continued without it.
    StylesheetFailed,
    /// The component's embedding entry point was invoked.
    Embedded,
    /// The host relayed the component's readiness signal.
    ReadySignaled,
    /// The click listener was attached to the target element.
    ListenerAttached,
    /// The click listener was removed.
    ListenerDetached,
    /// A fatal bootstrap step failed.
    Failed,
    /// Custom host-defined event.
    Custom(String),
}

impl EventKind {
    /// Get the name of this event kind.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Self::StylesheetLoaded => "stylesheet_loaded",
            Self::StylesheetFailed => "stylesheet_failed",
            Self::Embedded => "embedded",
            Self::ReadySignaled => "ready_signaled",
            Self::ListenerAttached => "listener_attached",
            Self::ListenerDetached => "listener_detached",
            Self::Failed => "failed",
            Self::Custom(name) => name,
        }
    }

    /// Check if this kind reports a failure.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::StylesheetFailed | Self::Failed)
    }
}

/// A lifecycle event with session-relative timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootEvent {
    /// What happened.
    pub kind: EventKind,
    /// Session time at which it happened.
    pub elapsed: Duration,
    /// Optional human-readable detail.
    pub detail: Option<String>,
}

impl BootEvent {
    /// Create a new event.
    pub fn new(kind: EventKind, elapsed: Duration) -> Self {
        Self {
            kind,
            elapsed,
            detail: None,
        }
    }

    /// Attach a detail string.
    #[inline]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Listener for bootstrap lifecycle events.
///
/// Listeners run on the host's single thread, so no `Send`/`Sync` bound.
pub trait EventListener {
    /// Handle a lifecycle event.
    fn on_event(&mut self, event: &BootEvent);

    /// Kinds this listener is interested in; empty means all.
    fn interested_kinds(&self) -> Vec<EventKind> {
        vec![]
    }

    /// Check if this listener is interested in a specific kind.
    fn is_interested_in(&self, kind: &EventKind) -> bool {
        let interested = self.interested_kinds();
        interested.is_empty() || interested.contains(kind)
    }
}

/// Dispatches events to registered listeners.
///
/// Bootstrap is a short linear flow, so events go out immediately rather
/// than through a frame queue.
pub struct EventDispatcher {
    listeners: Vec<Box<dyn EventListener>>,
    enabled: bool,
}

impl EventDispatcher {
    /// Create a new event dispatcher.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            enabled: true,
        }
    }

    /// Add an event listener.
    pub fn add_listener(&mut self, listener: Box<dyn EventListener>) {
        self.listeners.push(listener);
    }

    /// Remove all listeners.
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Dispatch an event to all interested listeners.
    pub fn dispatch(&mut self, event: BootEvent) {
        if !self.enabled {
            return;
        }
        for listener in &mut self.listeners {
            if listener.is_interested_in(&event.kind) {
                listener.on_event(&event);
            }
        }
    }

    /// Get the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Enable or disable event dispatching.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check if event dispatching is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Listener that forwards events to the `log` facade.
pub struct LoggingListener {
    interested: Vec<EventKind>,
}

impl LoggingListener {
    /// Create a listener that logs every event.
    pub fn new() -> Self {
        Self { interested: vec![] }
    }

    /// Create a listener for specific event kinds.
    pub fn for_kinds(kinds: Vec<EventKind>) -> Self {
        Self { interested: kinds }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl EventListener for LoggingListener {
    fn on_event(&mut self, event: &BootEvent) {
        let detail = event.detail.as_deref().unwrap_or("no detail");
        if event.kind.is_failure() {
            log::warn!(
                target: "berth::boot",
                "[{}ms] {}: {}",
                event.elapsed.as_millis(),
                event.kind.name(),
                detail
            );
        } else {
            log::debug!(
                target: "berth::boot",
                "[{}ms] {}: {}",
                event.elapsed.as_millis(),
                event.kind.name(),
                detail
            );
        }
    }

    fn interested_kinds(&self) -> Vec<EventKind> {
        self.interested.clone()
    }
}

/// Shared view of the events captured by a [`CollectingListener`].
///
/// The handle stays readable after the listener itself moves into a
/// dispatcher.
#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<BootEvent>>>);

impl EventLog {
    /// Copy of all captured events, in dispatch order.
    pub fn snapshot(&self) -> Vec<BootEvent> {
        self.0.borrow().clone()
    }

    /// Captured kinds, in dispatch order.
    pub fn kinds(&self) -> Vec<EventKind> {
        self.0.borrow().iter().map(|e| e.kind.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn contains(&self, kind: &EventKind) -> bool {
        self.0.borrow().iter().any(|e| &e.kind == kind)
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Listener that collects events for inspection in tests.
pub struct CollectingListener {
    log: EventLog,
    interested: Vec<EventKind>,
}

impl CollectingListener {
    /// Create a new collecting listener.
    pub fn new() -> Self {
        Self {
            log: EventLog::default(),
            interested: vec![],
        }
    }

    /// Create a collecting listener for specific event kinds.
    pub fn for_kinds(kinds: Vec<EventKind>) -> Self {
        Self {
            log: EventLog::default(),
            interested: kinds,
        }
    }

    /// Handle onto the captured events.
    pub fn log(&self) -> EventLog {
        self.log.clone()
    }
}

impl Default for CollectingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl EventListener for CollectingListener {
    fn on_event(&mut self, event: &BootEvent) {
        self.log.0.borrow_mut().push(event.clone());
    }

    fn interested_kinds(&self) -> Vec<EventKind> {
        self.interested.clone()
    }
}
