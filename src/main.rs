use netviz::ViewerConfig;
use tracing::{info, warn};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match ViewerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "viewer config unreadable, using defaults");
            ViewerConfig::default()
        }
    };
    info!(path = %ViewerConfig::path().display(), "configuration ready");

    netviz::native::run(config)
}
