use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use std::path::Path;
use toxynet::{Network, NetworkPayload};
use tracing::info;

/// Nodes without color or shape get the configured style of their type.
pub fn apply_type_styles(payload: &mut NetworkPayload, config: &ViewerConfig) {
    for node in &mut payload.nodes {
        let style = config.type_style(&node.node_type);
        node.color.get_or_insert_with(|| style.color.to_hex());
        node.shape.get_or_insert_with(|| style.shape.to_string());
    }
}

pub fn network_from_json(json: &str, config: &ViewerConfig) -> Result<Network> {
    let mut payload: NetworkPayload = serde_json::from_str(json)?;
    apply_type_styles(&mut payload, config);
    Ok(Network::from_payload(payload)?)
}

// ------------------------------------------------------------------
// File I/O operations
// ------------------------------------------------------------------

pub fn save_to_file(network: &Network, path: &Path) -> Result<()> {
    let json = network.to_json()?;
    std::fs::write(path, json).map_err(|source| ViewerError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), nodes = network.node_count(), "network saved");
    Ok(())
}

pub fn load_from_file(path: &Path, config: &ViewerConfig) -> Result<Network> {
    let json = std::fs::read_to_string(path).map_err(|source| ViewerError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let network = network_from_json(&json, config)?;
    info!(path = %path.display(), nodes = network.node_count(), "network loaded");
    Ok(network)
}
