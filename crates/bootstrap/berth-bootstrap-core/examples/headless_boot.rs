use std::time::Duration;

use berth_bootstrap::fixtures::{page_with_graphic, CollectingSink, RecordingEmbedder};
use berth_bootstrap::{BootSession, BootstrapConfig, ClickPoint, LoggingListener};

fn main() -> berth_bootstrap::Result<()> {
    let sink = CollectingSink::new();
    let mut session = BootSession::new(
        page_with_graphic(),
        RecordingEmbedder::new(),
        BootstrapConfig::default(),
    )
    .with_asset("map.jpg", "/assets/map-3ab41c.jpg")
    .with_asset("main.css", "/assets/main-0f2d66.css")
    .with_sink(sink.clone())
    .with_listener(Box::new(LoggingListener::new()));

    // Embed, then step past the fallback deadline in frame-sized ticks.
    session.start()?;
    while session.elapsed() < Duration::from_millis(1000) {
        session.advance(Duration::from_millis(100))?;
    }
    println!("phase after deadline: {}", session.phase().as_str());

    // Simulate a few clicks on the graphic.
    session.page.click_first("svg", ClickPoint::new(12.0, 34.0));
    session.page.click_first("svg", ClickPoint::new(56.0, 78.0));

    for point in sink.points() {
        println!("{} {}", point.x, point.y);
    }
    Ok(())
}
