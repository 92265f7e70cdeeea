//! Dual-panel viewer for interaction networks: two graph views that can be
//! compared, laid out together, merged and edited, driven by an
//! action/effect store.

pub mod actions;
pub mod app;
pub mod color_scale;
pub mod config;
pub mod edge_gesture;
pub mod effects;
pub mod error;
pub mod graph_view;
pub mod layout;
pub mod native;
pub mod node_editor;
pub mod node_shapes;
pub mod panels;
pub mod serialization;
pub mod state;
pub mod store;

pub use app::NetvizApp;
pub use config::ViewerConfig;
pub use error::{Result, ViewerError};

use state::State;
use store::Store;

/// Build the viewer from an already loaded configuration.
pub fn create_app(_cc: &eframe::CreationContext<'_>, config: ViewerConfig) -> NetvizApp {
    NetvizApp::new(State::new(Store::new(config)))
}
