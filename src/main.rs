mod app;
mod codec;
mod config;
mod editor;
mod interaction;
mod model;
mod snap;
mod source;
mod spatial;
mod sync;
mod util;
mod view_state;

use app::MapEditorApp;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mapedit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("mapedit: map feature editor")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "mapedit",
        native_options,
        Box::new(|cc| Ok(Box::new(MapEditorApp::new(cc)))),
    )
}
