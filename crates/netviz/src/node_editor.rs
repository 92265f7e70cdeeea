use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::graph_view::NetworkView;
use toxynet::{Color, Node, NodeId, NodeShape, NodeType};
use tracing::debug;

/// Raw contents of the node properties form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeEdit {
    pub id: NodeId,
    pub label: String,
    pub node_type: String,
    pub weight_key: Option<String>,
    pub weight_value: String,
    pub color: String,
    pub shape: String,
}

/// Validated form, ready to be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEdit {
    pub id: NodeId,
    pub label: String,
    pub node_type: NodeType,
    pub weight: Option<(String, f64)>,
    pub color: Color,
    pub shape: NodeShape,
}

impl NodeEdit {
    pub fn for_node(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label().to_string(),
            node_type: node.node_type.to_string(),
            weight_key: None,
            weight_value: String::new(),
            color: node.color.to_hex(),
            shape: node.shape.to_string(),
        }
    }

    /// Choose the weight entry to edit and show its current value.
    pub fn select_weight(&mut self, node: &Node, key: Option<String>) {
        self.weight_value = key
            .as_deref()
            .and_then(|k| node.weight(k))
            .map(|v| v.to_string())
            .unwrap_or_default();
        self.weight_key = key;
    }

    pub fn apply_type_defaults(&mut self, config: &ViewerConfig) {
        let style = config.type_style(&NodeType::from(self.node_type.as_str()));
        self.color = style.color.to_hex();
        self.shape = style.shape.to_string();
    }

    pub fn parse(&self) -> Result<ParsedEdit> {
        let node_type = self.node_type.trim();
        if node_type.is_empty() {
            return Err(ViewerError::InvalidInput("node type is empty".to_string()));
        }
        let color = self
            .color
            .trim()
            .parse::<Color>()
            .map_err(|e| ViewerError::InvalidInput(e.to_string()))?;
        let shape = self
            .shape
            .trim()
            .parse::<NodeShape>()
            .map_err(|e| ViewerError::InvalidInput(e.to_string()))?;
        let weight = match &self.weight_key {
            None => None,
            Some(key) => {
                let value = self.weight_value.trim().parse::<f64>().map_err(|_| {
                    ViewerError::InvalidInput(format!(
                        "weight `{key}` must be a number, got `{}`",
                        self.weight_value
                    ))
                })?;
                Some((key.clone(), value))
            }
        };
        Ok(ParsedEdit {
            id: self.id.clone(),
            label: self.label.clone(),
            node_type: NodeType::from(node_type),
            weight,
            color,
            shape,
        })
    }
}

impl NetworkView {
    /// Write the edit into the node's data and refresh its style.
    /// `false` when the node is not rendered.
    pub fn apply_edit(&mut self, edit: &ParsedEdit) -> bool {
        let Some(idx) = self.find_by_id(&edit.id) else {
            debug!(id = %edit.id, "edited node not found");
            return false;
        };
        let Some(data) = self.node_data_mut(idx) else {
            return false;
        };
        data.set_label(edit.label.clone());
        data.node_type = edit.node_type.clone();
        data.color = edit.color;
        data.shape = edit.shape;
        if let Some((key, value)) = &edit.weight {
            data.weights.insert(key.clone(), *value);
        }
        self.refresh_style(idx);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_view::ViewSettings;
    use toxynet::Network;

    fn node() -> Node {
        Node::new("p1", NodeType::MsgRna)
            .with_label("Cyp1a1")
            .with_weight("c1", 2.5)
            .with_weight("c2", 4.0)
    }

    #[test]
    fn test_form_prefill_and_weight_choice() {
        let n = node();
        let mut form = NodeEdit::for_node(&n);
        assert_eq!(form.label, "Cyp1a1");
        assert_eq!(form.node_type, "mRNA");
        assert_eq!(form.shape, "ellipse");
        form.select_weight(&n, Some("c2".to_string()));
        assert_eq!(form.weight_value, "4");
        form.select_weight(&n, None);
        assert!(form.weight_value.is_empty());
    }

    #[test]
    fn test_type_defaults_follow_chosen_type() {
        let mut form = NodeEdit::for_node(&node());
        form.node_type = "miRNA".to_string();
        form.apply_type_defaults(&ViewerConfig::default());
        assert_eq!(form.color, NodeType::MicroRna.default_color().to_hex());
        assert_eq!(form.shape, "pentagon");
    }

    #[test]
    fn test_malformed_fields_are_rejected() {
        let mut form = NodeEdit::for_node(&node());
        form.color = "blue-ish".to_string();
        assert!(matches!(form.parse(), Err(ViewerError::InvalidInput(_))));

        let mut form = NodeEdit::for_node(&node());
        form.weight_key = Some("c1".to_string());
        form.weight_value = "lots".to_string();
        assert!(matches!(form.parse(), Err(ViewerError::InvalidInput(_))));

        let mut form = NodeEdit::for_node(&node());
        form.shape = "star".to_string();
        assert!(form.parse().is_err());
    }

    #[test]
    fn test_apply_edit_updates_data_and_style() {
        let net = Network::new("t", vec![], vec![node()]).unwrap();
        let mut view = NetworkView::from_network(&net, ViewSettings::default());
        let mut form = NodeEdit::for_node(&node());
        form.label = "Renamed".to_string();
        form.node_type = "protein".to_string();
        form.color = "#112233".to_string();
        form.shape = "hexagon".to_string();
        form.weight_key = Some("c1".to_string());
        form.weight_value = "9".to_string();
        assert!(view.apply_edit(&form.parse().unwrap()));

        let edited = view.node(&NodeId::new("p1")).unwrap();
        assert_eq!(edited.data.label(), "Renamed");
        assert_eq!(edited.data.node_type, NodeType::from("protein"));
        assert_eq!(edited.data.weight("c1"), Some(9.0));
        assert_eq!(edited.data.weight("c2"), Some(4.0));
        assert_eq!(edited.style.fill, Color::rgb(0x11, 0x22, 0x33));
        assert_eq!(edited.style.shape, NodeShape::Hexagon);
    }

    #[test]
    fn test_apply_edit_on_missing_node_is_noop() {
        let mut view = NetworkView::new(ViewSettings::default());
        let mut form = NodeEdit::for_node(&node());
        form.id = NodeId::new("ghost");
        assert!(!view.apply_edit(&form.parse().unwrap()));
    }
}
