use std::time::Duration;

use berth_bootstrap::fixtures::{boot_session, page_with_graphic, FakePage, RecordingEmbedder};
use berth_bootstrap::{
    AttachOutcome, BootSession, BootstrapConfig, BootstrapError, CollectingListener, EventKind,
    PageDom, Phase,
};

#[test]
fn start_embeds_exactly_once_with_resolved_assets() {
    let (mut session, _sink) = boot_session();

    session.start().expect("start ok");
    assert_eq!(session.phase(), Phase::Embedded);

    // The stylesheet went in resolved, before the embed.
    assert_eq!(
        session.page.stylesheets,
        vec!["/assets/main-0f2d66.css".to_string()]
    );

    // The entry point got the mount node and the resolved image URL.
    let root = session.page.node_by_id("root").expect("mount exists");
    assert_eq!(
        session.embedder.calls,
        vec![(root, "/assets/map-3ab41c.jpg".to_string())]
    );

    // A second start must not reach the entry point again.
    let err = session.start().unwrap_err();
    assert_eq!(err, BootstrapError::AlreadyEmbedded);
    assert_eq!(session.embedder.call_count(), 1);
}

#[test]
fn missing_mount_is_typed_and_blocks_embed() {
    let mut page = FakePage::new();
    page.insert_node("svg");
    let mut session = BootSession::new(page, RecordingEmbedder::new(), BootstrapConfig::default())
        .with_asset("map.jpg", "/assets/map.jpg");

    let err = session.start().unwrap_err();
    assert_eq!(
        err,
        BootstrapError::MountNotFound {
            id: "root".to_string()
        }
    );
    assert!(err.is_not_found());
    assert_eq!(session.phase(), Phase::Failed);
    assert_eq!(
        session.embedder.call_count(),
        0,
        "entry point must not run without a mount"
    );
}

#[test]
fn unregistered_image_asset_blocks_embed() {
    let mut session = BootSession::new(
        page_with_graphic(),
        RecordingEmbedder::new(),
        BootstrapConfig::default(),
    );

    let err = session.start().unwrap_err();
    assert_eq!(
        err,
        BootstrapError::AssetNotFound {
            name: "map.jpg".to_string()
        }
    );
    assert_eq!(session.phase(), Phase::Failed);
    assert_eq!(session.embedder.call_count(), 0);
}

#[test]
fn stylesheet_failure_is_not_fatal() {
    let mut page = page_with_graphic();
    page.stylesheet_error = Some("network unreachable".to_string());
    let listener = CollectingListener::new();
    let log = listener.log();
    let mut session = BootSession::new(page, RecordingEmbedder::new(), BootstrapConfig::default())
        .with_asset("map.jpg", "/assets/map.jpg")
        .with_listener(Box::new(listener));

    session
        .start()
        .expect("stylesheet failure must not abort bootstrap");
    assert_eq!(session.phase(), Phase::Embedded);
    assert_eq!(session.embedder.call_count(), 1);
    assert!(log.contains(&EventKind::StylesheetFailed));
    assert!(log.contains(&EventKind::Embedded));
}

#[test]
fn embed_failure_is_terminal_but_counts_as_invoked() {
    let mut embedder = RecordingEmbedder::new();
    embedder.fail_with = Some("entry point threw".to_string());
    let mut session = BootSession::new(page_with_graphic(), embedder, BootstrapConfig::default())
        .with_asset("map.jpg", "/assets/map.jpg");

    let err = session.start().unwrap_err();
    assert_eq!(
        err,
        BootstrapError::EmbedFailed {
            reason: "entry point threw".to_string()
        }
    );
    assert_eq!(session.phase(), Phase::Failed);
    assert_eq!(session.embedder.call_count(), 1);

    // The session stays down: no second invocation, no listener.
    assert_eq!(session.start().unwrap_err(), BootstrapError::AlreadyEmbedded);
    let outcome = session
        .advance(Duration::from_millis(2000))
        .expect("advance in a failed session is a no-op");
    assert_eq!(outcome, AttachOutcome::Skipped);
    assert_eq!(session.page.handler_count(), 0);
}
