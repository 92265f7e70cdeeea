use crate::config::ViewerConfig;
use crate::create_app;
use tracing::info;

const TITLE: &str = "Network viewer";

/// Entry point used by the native executable.
pub fn run(config: ViewerConfig) -> eframe::Result<()> {
    let native_options = eframe::NativeOptions::default();
    info!("starting viewer");

    eframe::run_native(
        TITLE,
        native_options,
        Box::new(|cc| Ok(Box::new(create_app(cc, config)))),
    )
}
