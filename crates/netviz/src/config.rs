use crate::error::{Result, ViewerError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use toxynet::{Color, NodeShape, NodeType};
use tracing::{info, warn};

pub const CONFIG_FILE: &str = "netviz.json";
pub const CONFIG_ENV: &str = "NETVIZ_CONFIG";

/// Default look of every node of one type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypeStyle {
    pub color: Color,
    pub shape: NodeShape,
}

impl TypeStyle {
    pub fn builtin(node_type: &NodeType) -> Self {
        Self {
            color: node_type.default_color(),
            shape: node_type.default_shape(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Keyed by the payload type string (`mRNA`, `miRNA`, ...).
    pub type_styles: BTreeMap<String, TypeStyle>,
    pub highlight_color: Color,
    /// Layout used for the nodes exclusive to one panel in a dual layout.
    pub fallback_layout: String,
    /// Distance between neighbouring nodes when sizing layout boxes.
    pub layout_spacing: f32,
    pub random_seed: u64,
    pub ui_height: f32,
    pub labels_always: bool,
    pub node_radius: f32,
    pub selected_border_width: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let type_styles = [NodeType::MsgRna, NodeType::MicroRna]
            .iter()
            .map(|t| (t.as_str().to_string(), TypeStyle::builtin(t)))
            .collect();
        Self {
            type_styles,
            highlight_color: Color::rgb(0xff, 0xd7, 0x00),
            fallback_layout: "grid".to_string(),
            layout_spacing: 80.0,
            random_seed: 42,
            ui_height: 92.0,
            labels_always: true,
            node_radius: 12.0,
            selected_border_width: 5.0,
        }
    }
}

impl ViewerConfig {
    /// Style for `node_type`; unconfigured extra types get a stable
    /// categorical color.
    pub fn type_style(&self, node_type: &NodeType) -> TypeStyle {
        if let Some(style) = self.type_styles.get(node_type.as_str()) {
            return *style;
        }
        match node_type {
            NodeType::Other(name) => {
                let palette = colorous::TABLEAU10;
                let slot = name.bytes().map(usize::from).sum::<usize>() % palette.len();
                let c = palette[slot];
                TypeStyle {
                    color: Color::rgb(c.r, c.g, c.b),
                    shape: node_type.default_shape(),
                }
            }
            builtin => TypeStyle::builtin(builtin),
        }
    }

    /// Types offered by the node editor: the two builtin ones first.
    pub fn node_types(&self) -> Vec<NodeType> {
        let mut types = vec![NodeType::MsgRna, NodeType::MicroRna];
        for name in self.type_styles.keys() {
            let t = NodeType::from(name.as_str());
            if !types.contains(&t) {
                types.push(t);
            }
        }
        types
    }

    pub fn path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    /// Load from [`ViewerConfig::path`]; a missing file gives the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no viewer config, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ViewerError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents)?;
        if config.layout_spacing <= 0.0 {
            warn!(spacing = config.layout_spacing, "non-positive layout spacing");
        }
        info!(path = %path.display(), "viewer config loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: ViewerConfig =
            serde_json::from_str(r##"{"fallback_layout": "circle", "highlight_color": "#00ff00"}"##)
                .unwrap();
        assert_eq!(config.fallback_layout, "circle");
        assert_eq!(config.highlight_color, Color::rgb(0, 255, 0));
        assert_eq!(config.ui_height, 92.0);
        assert_eq!(
            config.type_style(&NodeType::MsgRna),
            TypeStyle::builtin(&NodeType::MsgRna)
        );
    }

    #[test]
    fn test_other_types_get_stable_palette_color() {
        let config = ViewerConfig::default();
        let protein = NodeType::from("protein");
        let first = config.type_style(&protein);
        assert_eq!(first, config.type_style(&protein));
        assert_eq!(first.shape, NodeShape::Rectangle);
    }

    #[test]
    fn test_node_types_lists_configured_extras() {
        let mut config = ViewerConfig::default();
        config.type_styles.insert(
            "lncRNA".to_string(),
            TypeStyle {
                color: Color::BLACK,
                shape: NodeShape::Hexagon,
            },
        );
        let types = config.node_types();
        assert_eq!(types[0], NodeType::MsgRna);
        assert_eq!(types[1], NodeType::MicroRna);
        assert!(types.contains(&NodeType::from("lncRNA")));
        assert_eq!(types.len(), 3);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = Path::new("/nonexistent/netviz-config-for-tests.json");
        assert_eq!(ViewerConfig::load_from(path).unwrap(), ViewerConfig::default());
    }
}
