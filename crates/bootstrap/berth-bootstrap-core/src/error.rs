//! Error types for bootstrap and click-capture operations.

use serde::{Deserialize, Serialize};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BootstrapError>;

/// Comprehensive error type for bootstrap operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BootstrapError {
    /// The configured mount element is not in the document.
    #[error("Mount element not found: #{id}")]
    MountNotFound { id: String },

    /// No element matched the click-target selector.
    #[error("Click target not found: {selector}")]
    GraphicNotFound { selector: String },

    /// A logical asset name has no registered URL.
    #[error("Asset not registered: {name}")]
    AssetNotFound { name: String },

    /// The stylesheet could not be loaded.
    #[error("Stylesheet load failed for {href}: {reason}")]
    StylesheetLoad { href: String, reason: String },

    /// The embedding entry point reported a failure.
    #[error("Embed failed: {reason}")]
    EmbedFailed { reason: String },

    /// The click listener could not be attached.
    #[error("Listener attach failed: {reason}")]
    AttachFailed { reason: String },

    /// The embedding entry point was already invoked for this session.
    #[error("Component already embedded")]
    AlreadyEmbedded,

    /// The click listener is already attached.
    #[error("Click listener already attached")]
    AlreadyAttached,

    /// The session has not embedded the component yet.
    #[error("Component not embedded yet")]
    NotEmbedded,

    /// No click listener is currently attached.
    #[error("No click listener attached")]
    NotListening,

    /// Invalid bootstrap configuration.
    #[error("Invalid bootstrap config: {reason}")]
    Config { reason: String },

    /// Platform-level failure outside this crate's control.
    #[error("Platform error: {reason}")]
    Platform { reason: String },
}

impl BootstrapError {
    /// Create a platform error from any displayable reason.
    pub fn platform(reason: impl Into<String>) -> Self {
        Self::Platform {
            reason: reason.into(),
        }
    }

    /// Check if this error reports something absent from the page or
    /// catalog, which a host may resolve and retry at its level.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MountNotFound { .. } | Self::GraphicNotFound { .. } | Self::AssetNotFound { .. }
        )
    }

    /// Get error category for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::MountNotFound { .. }
            | Self::GraphicNotFound { .. }
            | Self::AssetNotFound { .. } => "not_found",
            Self::StylesheetLoad { .. } => "stylesheet",
            Self::EmbedFailed { .. } | Self::AlreadyEmbedded | Self::NotEmbedded => "embed",
            Self::AttachFailed { .. } | Self::AlreadyAttached | Self::NotListening => "listener",
            Self::Config { .. } => "config",
            Self::Platform { .. } => "platform",
        }
    }
}

impl From<serde_json::Error> for BootstrapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = BootstrapError::MountNotFound {
            id: "root".to_string(),
        };
        assert_eq!(error.to_string(), "Mount element not found: #root");

        let error = BootstrapError::GraphicNotFound {
            selector: "svg".to_string(),
        };
        assert_eq!(error.to_string(), "Click target not found: svg");
    }

    #[test]
    fn test_not_found_classification() {
        assert!(BootstrapError::AssetNotFound {
            name: "map.jpg".to_string()
        }
        .is_not_found());
        assert!(!BootstrapError::AlreadyEmbedded.is_not_found());
    }

    #[test]
    fn test_error_categories() {
        let absent = BootstrapError::GraphicNotFound {
            selector: "svg".to_string(),
        };
        assert_eq!(absent.category(), "not_found");

        let embed = BootstrapError::EmbedFailed {
            reason: "entry point threw".to_string(),
        };
        assert_eq!(embed.category(), "embed");

        assert_eq!(BootstrapError::platform("no window").category(), "platform");
    }

    #[test]
    fn test_serialization() {
        let error = BootstrapError::AssetNotFound {
            name: "map.jpg".to_string(),
        };
        let serialized = serde_json::to_string(&error).unwrap();
        let deserialized: BootstrapError = serde_json::from_str(&serialized).unwrap();
        assert_eq!(error, deserialized);
    }
}
