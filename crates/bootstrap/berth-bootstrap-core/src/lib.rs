//! Berth Bootstrap Core (platform-agnostic)
//!
//! Embeds an external UI component into a host page and captures click
//! coordinates on a configured target element. This crate defines the
//! platform seams (document access, embed entry point, click sink), the
//! attach-policy machinery, lifecycle events, and the [`BootSession`]
//! facade. The browser binding lives in `berth-bootstrap-wasm`; native
//! tests drive everything through the fakes in [`fixtures`].

pub mod assets;
pub mod bootstrap;
pub mod click;
pub mod config;
pub mod error;
pub mod events;
pub mod fixtures;
pub mod ids;
pub mod logger;
pub mod platform;
pub mod session;

// Re-exports for consumers (bindings and hosts)
pub use assets::AssetCatalog;
pub use bootstrap::Bootstrapper;
pub use click::{shared_sink, ClickPoint, ClickSink, LogSink, NullSink, SharedSink};
pub use config::{AttachPolicy, BootstrapConfig, DEFAULT_ATTACH_DELAY_MS};
pub use error::{BootstrapError, Result};
pub use events::{
    BootEvent, CollectingListener, EventDispatcher, EventKind, EventListener, EventLog,
    LoggingListener,
};
pub use ids::BindingId;
pub use logger::{AttachOutcome, AttachState, CoordinateLogger};
pub use platform::{ClickHandler, PageDom, UiEmbed};
pub use session::{BootSession, Phase};
