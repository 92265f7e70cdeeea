use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Stable node identifier (a probe or gene id); shared across panels.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Biological role of a node. Unknown payload types are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    MsgRna,
    MicroRna,
    Other(String),
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::MsgRna => "mRNA",
            NodeType::MicroRna => "miRNA",
            NodeType::Other(name) => name,
        }
    }

    pub fn default_color(&self) -> Color {
        match self {
            NodeType::MsgRna => Color::rgb(0x00, 0x7f, 0x7f),
            NodeType::MicroRna => Color::rgb(0x82, 0x7f, 0x00),
            NodeType::Other(_) => Color::rgb(0x99, 0x99, 0x99),
        }
    }

    pub fn default_shape(&self) -> NodeShape {
        match self {
            NodeType::MsgRna => NodeShape::Ellipse,
            NodeType::MicroRna => NodeShape::Pentagon,
            NodeType::Other(_) => NodeShape::Rectangle,
        }
    }
}

impl From<String> for NodeType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "mRNA" => NodeType::MsgRna,
            "miRNA" => NodeType::MicroRna,
            _ => NodeType::Other(value),
        }
    }
}

impl From<&str> for NodeType {
    fn from(value: &str) -> Self {
        NodeType::from(value.to_string())
    }
}

impl From<NodeType> for String {
    fn from(node_type: NodeType) -> Self {
        node_type.as_str().to_string()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    #[default]
    Ellipse,
    Rectangle,
    Triangle,
    Diamond,
    Pentagon,
    Hexagon,
}

impl NodeShape {
    pub const ALL: [NodeShape; 6] = [
        NodeShape::Ellipse,
        NodeShape::Rectangle,
        NodeShape::Triangle,
        NodeShape::Diamond,
        NodeShape::Pentagon,
        NodeShape::Hexagon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeShape::Ellipse => "ellipse",
            NodeShape::Rectangle => "rectangle",
            NodeShape::Triangle => "triangle",
            NodeShape::Diamond => "diamond",
            NodeShape::Pentagon => "pentagon",
            NodeShape::Hexagon => "hexagon",
        }
    }
}

impl fmt::Display for NodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown node shape `{0}`")]
pub struct ShapeParseError(pub String);

impl FromStr for NodeShape {
    type Err = ShapeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        NodeShape::ALL
            .into_iter()
            .find(|shape| shape.as_str() == wanted)
            .ok_or_else(|| ShapeParseError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Named numeric values (expression level per sample group). Sparse.
pub type Weights = BTreeMap<String, f64>;

/// A network node in its renderer-independent form.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub node_type: NodeType,
    /// First entry is the display label.
    pub labels: Vec<String>,
    pub weights: Weights,
    pub color: Color,
    pub border_color: Option<Color>,
    pub shape: NodeShape,
    pub position: Position,
}

impl Node {
    /// New node with the defaults of its type and its id as label.
    pub fn new(id: impl Into<NodeId>, node_type: NodeType) -> Self {
        let id = id.into();
        Self {
            labels: vec![id.to_string()],
            color: node_type.default_color(),
            shape: node_type.default_shape(),
            id,
            node_type,
            weights: Weights::new(),
            border_color: None,
            position: Position::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.set_label(label);
        self
    }

    pub fn with_weight(mut self, key: impl Into<String>, value: f64) -> Self {
        self.weights.insert(key.into(), value);
        self
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn label(&self) -> &str {
        self.labels
            .first()
            .map(String::as_str)
            .unwrap_or_else(|| self.id.as_str())
    }

    /// Replace the primary label, keeping any secondary ones.
    pub fn set_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        match self.labels.first_mut() {
            Some(first) => *first = label,
            None => self.labels.push(label),
        }
    }

    pub fn weight(&self, key: &str) -> Option<f64> {
        self.weights.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_payload_strings() {
        assert_eq!(NodeType::from("mRNA"), NodeType::MsgRna);
        assert_eq!(NodeType::from("miRNA"), NodeType::MicroRna);
        assert_eq!(
            NodeType::from("protein"),
            NodeType::Other("protein".to_string())
        );
        let json = serde_json::to_string(&NodeType::MicroRna).unwrap();
        assert_eq!(json, "\"miRNA\"");
    }

    #[test]
    fn test_shape_parse_is_case_insensitive() {
        assert_eq!("Diamond".parse::<NodeShape>().unwrap(), NodeShape::Diamond);
        assert!("blob".parse::<NodeShape>().is_err());
    }

    #[test]
    fn test_new_node_uses_type_defaults() {
        let node = Node::new("p1", NodeType::MicroRna);
        assert_eq!(node.label(), "p1");
        assert_eq!(node.color, NodeType::MicroRna.default_color());
        assert_eq!(node.shape, NodeType::MicroRna.default_shape());
        assert!(node.weights.is_empty());
    }

    #[test]
    fn test_set_label_keeps_secondary_labels() {
        let mut node = Node::new("p1", NodeType::MsgRna);
        node.labels.push("alias".to_string());
        node.set_label("Cyp1a1");
        assert_eq!(node.labels, vec!["Cyp1a1".to_string(), "alias".to_string()]);
    }
}
