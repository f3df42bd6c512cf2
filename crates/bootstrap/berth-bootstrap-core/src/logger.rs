//! Deferred click capture on the configured target element.

use std::rc::Rc;
use std::time::Duration;

use crate::click::SharedSink;
use crate::config::AttachPolicy;
use crate::events::{BootEvent, EventDispatcher, EventKind};
use crate::ids::BindingId;
use crate::platform::PageDom;
use crate::{BootstrapError, Result};

/// Where the logger is in its attach lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachState {
    /// Waiting for the policy to trigger the attach.
    Pending,
    /// Listening; clicks flow to the sink.
    Attached(BindingId),
    /// The single attach attempt failed; the logger stays down.
    Failed,
    /// Detached by the host.
    Detached,
}

/// What an advance or readiness notification did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// Policy not triggered yet.
    Pending,
    /// The listener was attached by this call.
    Attached,
    /// Nothing to do: already resolved, or the signal was ignored.
    Skipped,
}

/// Attaches a click listener to the first selector match once the attach
/// policy fires, then forwards each click's offset coordinates to the sink
/// unmodified.
///
/// The logger advances on host-provided time and never consults a clock,
/// so the whole schedule is reproducible in tests.
pub struct CoordinateLogger {
    selector: String,
    policy: AttachPolicy,
    elapsed: Duration,
    state: AttachState,
}

impl CoordinateLogger {
    pub fn new(selector: impl Into<String>, policy: AttachPolicy) -> Self {
        Self {
            selector: selector.into(),
            policy,
            elapsed: Duration::ZERO,
            state: AttachState::Pending,
        }
    }

    #[inline]
    pub fn state(&self) -> AttachState {
        self.state
    }

    #[inline]
    pub fn is_listening(&self) -> bool {
        matches!(self.state, AttachState::Attached(_))
    }

    /// Session time accumulated so far.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Advance session time by `dt`.
    ///
    /// Attaches once the accumulated time reaches the policy deadline; the
    /// deadline is a floor, never an early trigger. Calls after the attach
    /// resolved are no-ops, so a platform timer that cannot be cancelled
    /// stays harmless when it fires late.
    pub fn advance<P: PageDom>(
        &mut self,
        page: &mut P,
        dt: Duration,
        sink: &SharedSink,
        events: &mut EventDispatcher,
    ) -> Result<AttachOutcome> {
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.state != AttachState::Pending {
            return Ok(AttachOutcome::Skipped);
        }
        match self.policy.deadline() {
            Some(deadline) if self.elapsed >= deadline => self.try_attach(page, sink, events),
            _ => Ok(AttachOutcome::Pending),
        }
    }

    /// Relay the embedded component's readiness signal.
    ///
    /// Signals are ignored under a delay-only policy and after the attach
    /// has resolved; neither case is an error.
    pub fn notify_ready<P: PageDom>(
        &mut self,
        page: &mut P,
        sink: &SharedSink,
        events: &mut EventDispatcher,
    ) -> Result<AttachOutcome> {
        events.dispatch(BootEvent::new(EventKind::ReadySignaled, self.elapsed));
        if !self.policy.accepts_ready() || self.state != AttachState::Pending {
            return Ok(AttachOutcome::Skipped);
        }
        self.try_attach(page, sink, events)
    }

    /// Remove the listener. Errors unless currently attached.
    pub fn detach<P: PageDom>(
        &mut self,
        page: &mut P,
        events: &mut EventDispatcher,
    ) -> Result<()> {
        match self.state {
            AttachState::Attached(binding) => {
                page.detach_click(binding);
                self.state = AttachState::Detached;
                events.dispatch(BootEvent::new(EventKind::ListenerDetached, self.elapsed));
                Ok(())
            }
            _ => Err(BootstrapError::NotListening),
        }
    }

    /// Bind to the first current selector match, dropping any existing
    /// binding first.
    ///
    /// This is the explicit host action for a replaced target element; the
    /// policy-driven attach still happens at most once. A logger whose one
    /// attempt failed stays failed.
    pub fn reattach<P: PageDom>(
        &mut self,
        page: &mut P,
        sink: &SharedSink,
        events: &mut EventDispatcher,
    ) -> Result<AttachOutcome> {
        match self.state {
            AttachState::Attached(_) => {
                self.detach(page, events)?;
                self.try_attach(page, sink, events)
            }
            AttachState::Detached => self.try_attach(page, sink, events),
            AttachState::Failed => Err(BootstrapError::AttachFailed {
                reason: "previous attach attempt failed".to_string(),
            }),
            AttachState::Pending => Err(BootstrapError::NotListening),
        }
    }

    fn try_attach<P: PageDom>(
        &mut self,
        page: &mut P,
        sink: &SharedSink,
        events: &mut EventDispatcher,
    ) -> Result<AttachOutcome> {
        let node = match page.first_match(&self.selector) {
            Some(node) => node,
            None => {
                self.state = AttachState::Failed;
                return Err(BootstrapError::GraphicNotFound {
                    selector: self.selector.clone(),
                });
            }
        };

        let sink = Rc::clone(sink);
        match page.attach_click(&node, Box::new(move |point| sink.borrow_mut().record(point))) {
            Ok(binding) => {
                self.state = AttachState::Attached(binding);
                events.dispatch(BootEvent::new(EventKind::ListenerAttached, self.elapsed));
                log::debug!(target: "berth::boot", "listening on {}", self.selector);
                Ok(AttachOutcome::Attached)
            }
            Err(err) => {
                self.state = AttachState::Failed;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::click::shared_sink;
    use crate::fixtures::{CollectingSink, FakePage};

    fn wired() -> (FakePage, SharedSink, CollectingSink, EventDispatcher) {
        let mut page = FakePage::with_mount("root");
        page.insert_node("svg");
        let sink = CollectingSink::new();
        let shared = shared_sink(sink.clone());
        (page, shared, sink, EventDispatcher::new())
    }

    #[test]
    fn deadline_is_a_floor() {
        let (mut page, sink, _points, mut events) = wired();
        let mut logger =
            CoordinateLogger::new("svg", AttachPolicy::AfterDelay { delay_ms: 1000 });

        let outcome = logger
            .advance(&mut page, Duration::from_millis(999), &sink, &mut events)
            .unwrap();
        assert_eq!(outcome, AttachOutcome::Pending);
        assert!(!logger.is_listening());

        let outcome = logger
            .advance(&mut page, Duration::from_millis(1), &sink, &mut events)
            .unwrap();
        assert_eq!(outcome, AttachOutcome::Attached);
        assert!(logger.is_listening());
    }

    #[test]
    fn elapsed_accumulates_across_small_steps() {
        let (mut page, sink, _points, mut events) = wired();
        let mut logger = CoordinateLogger::new("svg", AttachPolicy::AfterDelay { delay_ms: 30 });

        for _ in 0..2 {
            let outcome = logger
                .advance(&mut page, Duration::from_millis(10), &sink, &mut events)
                .unwrap();
            assert_eq!(outcome, AttachOutcome::Pending);
        }
        let outcome = logger
            .advance(&mut page, Duration::from_millis(10), &sink, &mut events)
            .unwrap();
        assert_eq!(outcome, AttachOutcome::Attached);
        assert_eq!(logger.elapsed(), Duration::from_millis(30));
    }

    #[test]
    fn ready_is_ignored_under_delay_only_policy() {
        let (mut page, sink, _points, mut events) = wired();
        let mut logger = CoordinateLogger::new("svg", AttachPolicy::AfterDelay { delay_ms: 50 });

        let outcome = logger.notify_ready(&mut page, &sink, &mut events).unwrap();
        assert_eq!(outcome, AttachOutcome::Skipped);
        assert_eq!(logger.state(), AttachState::Pending);
    }

    #[test]
    fn missing_target_fails_once_and_stays_failed() {
        let mut page = FakePage::with_mount("root");
        let sink = shared_sink(CollectingSink::new());
        let mut events = EventDispatcher::new();
        let mut logger = CoordinateLogger::new("svg", AttachPolicy::AfterDelay { delay_ms: 10 });

        let err = logger
            .advance(&mut page, Duration::from_millis(10), &sink, &mut events)
            .unwrap_err();
        assert_eq!(
            err,
            BootstrapError::GraphicNotFound {
                selector: "svg".to_string()
            }
        );
        assert_eq!(logger.state(), AttachState::Failed);

        // A target appearing later does not revive the logger.
        page.insert_node("svg");
        let outcome = logger
            .advance(&mut page, Duration::from_millis(10), &sink, &mut events)
            .unwrap();
        assert_eq!(outcome, AttachOutcome::Skipped);
        assert_eq!(logger.state(), AttachState::Failed);
    }
}
