//! Bootstrap configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;

/// Legacy delay between embedding and the listener attach attempt.
pub const DEFAULT_ATTACH_DELAY_MS: u64 = 1_000;

/// When the click listener is attached after embedding.
///
/// The original flow armed a fixed timer and hoped the component had
/// rendered by then. Components that can report readiness should use
/// `OnReady`; `ReadyOrDelay` keeps the delay as a fallback deadline for
/// components that usually signal but might not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachPolicy {
    /// Attach when the component signals readiness; no deadline.
    OnReady,
    /// Attach once the delay has elapsed; readiness signals are ignored.
    AfterDelay { delay_ms: u64 },
    /// Attach on readiness, or at the deadline if no signal arrives first.
    ReadyOrDelay { delay_ms: u64 },
}

impl AttachPolicy {
    /// Deadline after which the attach attempt fires, if the policy has one.
    #[inline]
    pub fn deadline(&self) -> Option<Duration> {
        match *self {
            Self::OnReady => None,
            Self::AfterDelay { delay_ms } | Self::ReadyOrDelay { delay_ms } => {
                Some(Duration::from_millis(delay_ms))
            }
        }
    }

    /// Whether a readiness signal triggers the attach.
    #[inline]
    pub fn accepts_ready(&self) -> bool {
        matches!(self, Self::OnReady | Self::ReadyOrDelay { .. })
    }
}

impl Default for AttachPolicy {
    fn default() -> Self {
        Self::ReadyOrDelay {
            delay_ms: DEFAULT_ATTACH_DELAY_MS,
        }
    }
}

/// Page bootstrap configuration.
///
/// The defaults reproduce the legacy deployment: mount into `#root`, load
/// `main.css`, hand `map.jpg` to the component, and log clicks on the
/// first `svg` element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Id attribute of the element the component is mounted into.
    pub mount_id: String,
    /// Selector for the element whose clicks are logged.
    pub graphic_selector: String,
    /// Logical name of the image asset handed to the component.
    pub image_asset: String,
    /// Logical name of the stylesheet to load, if any.
    pub stylesheet: Option<String>,
    /// Listener attach policy.
    pub attach: AttachPolicy,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            mount_id: "root".to_string(),
            graphic_selector: "svg".to_string(),
            image_asset: "map.jpg".to_string(),
            stylesheet: Some("main.css".to_string()),
            attach: AttachPolicy::default(),
        }
    }
}

impl BootstrapConfig {
    /// Parse a config from JSON. Missing fields fall back to the defaults,
    /// so hosts only spell out what they change.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_legacy_deployment() {
        let cfg = BootstrapConfig::default();
        assert_eq!(cfg.mount_id, "root");
        assert_eq!(cfg.graphic_selector, "svg");
        assert_eq!(cfg.image_asset, "map.jpg");
        assert_eq!(cfg.stylesheet.as_deref(), Some("main.css"));
        assert_eq!(
            cfg.attach.deadline(),
            Some(Duration::from_millis(DEFAULT_ATTACH_DELAY_MS))
        );
    }

    #[test]
    fn policy_deadline_and_ready() {
        assert_eq!(AttachPolicy::OnReady.deadline(), None);
        assert!(AttachPolicy::OnReady.accepts_ready());

        let delay = AttachPolicy::AfterDelay { delay_ms: 250 };
        assert_eq!(delay.deadline(), Some(Duration::from_millis(250)));
        assert!(!delay.accepts_ready());

        let either = AttachPolicy::ReadyOrDelay { delay_ms: 250 };
        assert_eq!(either.deadline(), Some(Duration::from_millis(250)));
        assert!(either.accepts_ready());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = BootstrapConfig::from_json(r#"{ "mount_id": "app" }"#).unwrap();
        assert_eq!(cfg.mount_id, "app");
        assert_eq!(cfg.graphic_selector, "svg");
        assert_eq!(cfg.attach, AttachPolicy::default());
    }

    #[test]
    fn policy_json_shapes() {
        let cfg = BootstrapConfig::from_json(
            r#"{ "attach": { "after_delay": { "delay_ms": 500 } } }"#,
        )
        .unwrap();
        assert_eq!(cfg.attach, AttachPolicy::AfterDelay { delay_ms: 500 });

        let cfg = BootstrapConfig::from_json(r#"{ "attach": "on_ready" }"#).unwrap();
        assert_eq!(cfg.attach, AttachPolicy::OnReady);
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let err = BootstrapConfig::from_json("{ not json").unwrap_err();
        assert_eq!(err.category(), "config");
    }
}
