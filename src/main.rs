#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use event_countdown::app;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Event Countdown v{}", env!("CARGO_PKG_VERSION"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([640.0, 400.0])
            .with_title("Event Countdown"),
        ..Default::default()
    };

    eframe::run_native(
        "Event Countdown",
        options,
        Box::new(|cc| Ok(Box::new(app::EventsApp::new(cc)))),
    )
}
