//! One-shot embedding of the external UI component.

use std::time::Duration;

use crate::assets::AssetCatalog;
use crate::config::BootstrapConfig;
use crate::events::{BootEvent, EventDispatcher, EventKind};
use crate::platform::{PageDom, UiEmbed};
use crate::{BootstrapError, Result};

/// Performs the embed sequence: stylesheet, asset resolution, mount lookup,
/// then a single invocation of the component's entry point.
#[derive(Debug, Clone)]
pub struct Bootstrapper {
    mount_id: String,
    image_asset: String,
    stylesheet: Option<String>,
    embedded: bool,
}

impl Bootstrapper {
    pub fn new(cfg: &BootstrapConfig) -> Self {
        Self {
            mount_id: cfg.mount_id.clone(),
            image_asset: cfg.image_asset.clone(),
            stylesheet: cfg.stylesheet.clone(),
            embedded: false,
        }
    }

    /// Whether the entry point has been invoked.
    #[inline]
    pub fn has_embedded(&self) -> bool {
        self.embedded
    }

    /// Run the embed sequence once. Returns the mount node on success.
    ///
    /// The once-guard trips on the attempt, not on success: the entry
    /// point's partial effects cannot be rolled back, so a failed embed
    /// still counts as the one permitted invocation.
    pub fn run<P, E>(
        &mut self,
        page: &mut P,
        embedder: &mut E,
        assets: &AssetCatalog,
        events: &mut EventDispatcher,
        elapsed: Duration,
    ) -> Result<P::Node>
    where
        P: PageDom,
        E: UiEmbed<P::Node>,
    {
        if self.embedded {
            return Err(BootstrapError::AlreadyEmbedded);
        }

        // Stylesheet is a pure side effect; failure is reported, not fatal.
        if let Some(sheet) = self.stylesheet.clone() {
            match self.load_stylesheet(page, assets, &sheet) {
                Ok(href) => events.dispatch(
                    BootEvent::new(EventKind::StylesheetLoaded, elapsed).with_detail(href),
                ),
                Err(err) => {
                    log::warn!(target: "berth::boot", "stylesheet {}: {}", sheet, err);
                    events.dispatch(
                        BootEvent::new(EventKind::StylesheetFailed, elapsed)
                            .with_detail(err.to_string()),
                    );
                }
            }
        }

        let asset_url = assets.resolve(&self.image_asset)?.to_string();

        let mount =
            page.node_by_id(&self.mount_id)
                .ok_or_else(|| BootstrapError::MountNotFound {
                    id: self.mount_id.clone(),
                })?;

        self.embedded = true;
        embedder.embed(&mount, &asset_url)?;
        events.dispatch(BootEvent::new(EventKind::Embedded, elapsed).with_detail(asset_url));
        log::debug!(target: "berth::boot", "embedded into #{}", self.mount_id);
        Ok(mount)
    }

    /// Stylesheet names resolve through the catalog like any other asset.
    /// An unregistered name falls back to the name itself, so deployments
    /// that serve stylesheets under their plain names keep working.
    fn load_stylesheet<P: PageDom>(
        &self,
        page: &mut P,
        assets: &AssetCatalog,
        sheet: &str,
    ) -> Result<String> {
        let href = assets.resolve(sheet).unwrap_or(sheet).to_string();
        page.load_stylesheet(&href)?;
        Ok(href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{FakePage, RecordingEmbedder};

    fn wired() -> (FakePage, RecordingEmbedder, AssetCatalog, EventDispatcher) {
        let page = FakePage::with_mount("root");
        let embedder = RecordingEmbedder::new();
        let assets = AssetCatalog::new().with("map.jpg", "/assets/map-3ab41c.jpg");
        (page, embedder, assets, EventDispatcher::new())
    }

    #[test]
    fn second_run_is_rejected() {
        let (mut page, mut embedder, assets, mut events) = wired();
        let mut boot = Bootstrapper::new(&BootstrapConfig::default());

        boot.run(&mut page, &mut embedder, &assets, &mut events, Duration::ZERO)
            .unwrap();
        assert!(boot.has_embedded());

        let err = boot
            .run(&mut page, &mut embedder, &assets, &mut events, Duration::ZERO)
            .unwrap_err();
        assert_eq!(err, BootstrapError::AlreadyEmbedded);
        assert_eq!(embedder.call_count(), 1);
    }

    #[test]
    fn unregistered_stylesheet_falls_back_to_its_name() {
        let (mut page, mut embedder, assets, mut events) = wired();
        let mut boot = Bootstrapper::new(&BootstrapConfig::default());

        boot.run(&mut page, &mut embedder, &assets, &mut events, Duration::ZERO)
            .unwrap();
        assert_eq!(page.stylesheets, vec!["main.css".to_string()]);
    }

    #[test]
    fn registered_stylesheet_resolves_through_catalog() {
        let (mut page, mut embedder, assets, mut events) = wired();
        let assets = assets.with("main.css", "/assets/main-0f2d66.css");
        let mut boot = Bootstrapper::new(&BootstrapConfig::default());

        boot.run(&mut page, &mut embedder, &assets, &mut events, Duration::ZERO)
            .unwrap();
        assert_eq!(page.stylesheets, vec!["/assets/main-0f2d66.css".to_string()]);
    }
}
