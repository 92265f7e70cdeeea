use crate::graph_view::NetworkView;
use petgraph::stable_graph::NodeIndex;
use toxynet::{Color, Node, NodeType};
use tracing::debug;

/// Linear white-to-`base` coloring driven by one weight key per node type.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    pub msg_rna_key: Option<String>,
    pub micro_rna_key: Option<String>,
    pub base: Color,
}

impl ColorScale {
    /// Value used to color `node`. Other node types, absent keys and NaN
    /// weights give `None`.
    pub fn weight_for(&self, node: &Node) -> Option<f64> {
        let key = match node.node_type {
            NodeType::MsgRna => self.msg_rna_key.as_deref(),
            NodeType::MicroRna => self.micro_rna_key.as_deref(),
            NodeType::Other(_) => None,
        }?;
        node.weight(key).filter(|v| !v.is_nan())
    }

    pub fn range<'a>(&self, nodes: impl IntoIterator<Item = &'a Node>) -> Option<(f64, f64)> {
        nodes
            .into_iter()
            .filter_map(|n| self.weight_for(n))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// `None` on a degenerate range.
    pub fn color_for(&self, value: f64, min: f64, max: f64) -> Option<Color> {
        let span = max - min;
        if span == 0.0 || !span.is_finite() {
            return None;
        }
        Color::WHITE.lerp(self.base, (value - min) / span)
    }
}

impl NetworkView {
    /// Store the scaled color and a `base` border into each colorable
    /// node's data. Returns the number of nodes recolored.
    pub fn apply_color_scale(&mut self, scale: &ColorScale) -> usize {
        let nodes = self.domain_nodes();
        let Some((min, max)) = scale.range(&nodes) else {
            debug!("no weights to scale");
            return 0;
        };
        let mut colored = 0;
        for node in &nodes {
            let Some(color) = scale
                .weight_for(node)
                .and_then(|v| scale.color_for(v, min, max))
            else {
                continue;
            };
            let Some(idx) = self.find_by_id(&node.id) else {
                continue;
            };
            self.recolor(idx, color, scale.base);
            colored += 1;
        }
        debug!(colored, min, max, "color scale applied");
        colored
    }

    fn recolor(&mut self, idx: NodeIndex, color: Color, border: Color) {
        if let Some(data) = self.node_data_mut(idx) {
            data.color = color;
            data.border_color = Some(border);
        }
        self.refresh_style(idx);
    }
}
