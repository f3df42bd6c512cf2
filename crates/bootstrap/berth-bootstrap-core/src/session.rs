//! Session façade tying bootstrap, click capture, and events together.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::assets::AssetCatalog;
use crate::bootstrap::Bootstrapper;
use crate::click::{shared_sink, ClickSink, NullSink, SharedSink};
use crate::config::{AttachPolicy, BootstrapConfig};
use crate::events::{BootEvent, EventDispatcher, EventKind, EventListener};
use crate::logger::{AttachOutcome, CoordinateLogger};
use crate::platform::{PageDom, UiEmbed};
use crate::{BootstrapError, Result};

/// Lifecycle phase of a [`BootSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Built, not started.
    Created,
    /// Component embedded; listener pending.
    Embedded,
    /// Click listener attached and forwarding.
    Listening,
    /// Listener removed by the host.
    Detached,
    /// A fatal step failed; the session stays down.
    Failed,
}

impl Phase {
    /// Stable lowercase name for host-facing surfaces.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Embedded => "embedded",
            Self::Listening => "listening",
            Self::Detached => "detached",
            Self::Failed => "failed",
        }
    }
}

/// Drives one page bootstrap from embed to click capture.
///
/// The session owns the platform seams and steps on host-provided time; it
/// never consults a clock of its own. Hosts call [`start`](Self::start)
/// once, then feed it elapsed time and readiness signals and let the attach
/// policy decide when the click listener goes live.
pub struct BootSession<P: PageDom, E: UiEmbed<P::Node>> {
    /// Host document access.
    pub page: P,
    /// The external component's entry point.
    pub embedder: E,
    assets: AssetCatalog,
    config: BootstrapConfig,
    bootstrapper: Bootstrapper,
    logger: CoordinateLogger,
    sink: SharedSink,
    events: EventDispatcher,
    phase: Phase,
}

impl<P: PageDom, E: UiEmbed<P::Node>> BootSession<P, E> {
    /// Create a session over the given platform seams. Clicks go to a
    /// [`NullSink`] until [`with_sink`](Self::with_sink) replaces it.
    pub fn new(page: P, embedder: E, config: BootstrapConfig) -> Self {
        let bootstrapper = Bootstrapper::new(&config);
        let logger = CoordinateLogger::new(config.graphic_selector.clone(), config.attach);
        Self {
            page,
            embedder,
            assets: AssetCatalog::new(),
            config,
            bootstrapper,
            logger,
            sink: shared_sink(NullSink),
            events: EventDispatcher::new(),
            phase: Phase::Created,
        }
    }

    /// Replace the click sink. Only effective before [`start`](Self::start);
    /// attached handlers keep the sink they were built with.
    pub fn with_sink<S: ClickSink + 'static>(mut self, sink: S) -> Self {
        self.sink = shared_sink(sink);
        self
    }

    /// Register an asset in the session catalog.
    pub fn with_asset(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.assets.register(name, url);
        self
    }

    /// Register a lifecycle event listener.
    pub fn with_listener(mut self, listener: Box<dyn EventListener>) -> Self {
        self.events.add_listener(listener);
        self
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Session time accumulated so far.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.logger.elapsed()
    }

    /// Register an asset after construction.
    pub fn register_asset(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.assets.register(name, url);
    }

    /// Run the embed sequence. Succeeds at most once per session.
    pub fn start(&mut self) -> Result<()> {
        if self.phase != Phase::Created {
            return Err(BootstrapError::AlreadyEmbedded);
        }
        if self.config.attach == AttachPolicy::OnReady && !self.embedder.signals_readiness() {
            log::warn!(
                target: "berth::boot",
                "attach policy waits for readiness but the component signals none; the listener will never attach"
            );
        }
        match self.bootstrapper.run(
            &mut self.page,
            &mut self.embedder,
            &self.assets,
            &mut self.events,
            Duration::ZERO,
        ) {
            Ok(_mount) => {
                self.phase = Phase::Embedded;
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    /// Advance session time by `dt`, attaching the listener if the policy
    /// deadline is reached. Late calls after resolution are no-ops.
    pub fn advance(&mut self, dt: Duration) -> Result<AttachOutcome> {
        match self.phase {
            Phase::Created => Err(BootstrapError::NotEmbedded),
            Phase::Failed => Ok(AttachOutcome::Skipped),
            _ => match self
                .logger
                .advance(&mut self.page, dt, &self.sink, &mut self.events)
            {
                Ok(AttachOutcome::Attached) => {
                    self.phase = Phase::Listening;
                    Ok(AttachOutcome::Attached)
                }
                Ok(outcome) => Ok(outcome),
                Err(err) => self.fail(err),
            },
        }
    }

    /// Relay the embedded component's readiness signal. Duplicate or
    /// ignored signals are not errors.
    pub fn notify_ready(&mut self) -> Result<AttachOutcome> {
        match self.phase {
            Phase::Created => Err(BootstrapError::NotEmbedded),
            Phase::Failed => Ok(AttachOutcome::Skipped),
            _ => match self
                .logger
                .notify_ready(&mut self.page, &self.sink, &mut self.events)
            {
                Ok(AttachOutcome::Attached) => {
                    self.phase = Phase::Listening;
                    Ok(AttachOutcome::Attached)
                }
                Ok(outcome) => Ok(outcome),
                Err(err) => self.fail(err),
            },
        }
    }

    /// Remove the click listener. The session can later
    /// [`reattach`](Self::reattach).
    pub fn detach(&mut self) -> Result<()> {
        if self.phase != Phase::Listening {
            return Err(BootstrapError::NotListening);
        }
        self.logger.detach(&mut self.page, &mut self.events)?;
        self.phase = Phase::Detached;
        Ok(())
    }

    /// Bind the listener to the first current selector match: the explicit
    /// host action after the target element was replaced or the session
    /// was detached.
    pub fn reattach(&mut self) -> Result<AttachOutcome> {
        match self.phase {
            Phase::Listening | Phase::Detached => {
                match self
                    .logger
                    .reattach(&mut self.page, &self.sink, &mut self.events)
                {
                    Ok(outcome) => {
                        self.phase = Phase::Listening;
                        Ok(outcome)
                    }
                    Err(err) => self.fail(err),
                }
            }
            Phase::Created => Err(BootstrapError::NotEmbedded),
            _ => Err(BootstrapError::NotListening),
        }
    }

    fn fail<T>(&mut self, err: BootstrapError) -> Result<T> {
        self.phase = Phase::Failed;
        log::error!(target: "berth::boot", "bootstrap failed ({}): {}", err.category(), err);
        self.events.dispatch(
            BootEvent::new(EventKind::Failed, self.logger.elapsed()).with_detail(err.to_string()),
        );
        Err(err)
    }
}
