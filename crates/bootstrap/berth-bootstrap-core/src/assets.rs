//! Logical asset names and their resolved URLs.
//!
//! The legacy deployment resolved asset references at bundle time. Hosts now
//! register each logical name with the URL the deployment actually serves it
//! from, and bootstrap resolves through this catalog.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{BootstrapError, Result};

/// Registry mapping logical asset names to resolved URLs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetCatalog {
    entries: HashMap<String, String>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace an asset. Returns the previous URL if the name
    /// was already registered.
    pub fn register(&mut self, name: impl Into<String>, url: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), url.into())
    }

    /// Builder-style registration for wiring and tests.
    pub fn with(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.register(name, url);
        self
    }

    /// Resolve a logical name to its registered URL.
    pub fn resolve(&self, name: &str) -> Result<&str> {
        self.entries
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| BootstrapError::AssetNotFound {
                name: name.to_string(),
            })
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_resolve() {
        let catalog = AssetCatalog::new().with("map.jpg", "/assets/map-3ab41c.jpg");
        assert_eq!(catalog.resolve("map.jpg").unwrap(), "/assets/map-3ab41c.jpg");
        assert!(catalog.contains("map.jpg"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn missing_asset_is_typed() {
        let catalog = AssetCatalog::new();
        let err = catalog.resolve("map.jpg").unwrap_err();
        assert_eq!(
            err,
            BootstrapError::AssetNotFound {
                name: "map.jpg".to_string()
            }
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn re_register_replaces() {
        let mut catalog = AssetCatalog::new();
        assert_eq!(catalog.register("map.jpg", "/old.jpg"), None);
        assert_eq!(
            catalog.register("map.jpg", "/new.jpg"),
            Some("/old.jpg".to_string())
        );
        assert_eq!(catalog.resolve("map.jpg").unwrap(), "/new.jpg");
    }
}
