use crate::color::{Color, ColorParseError};
use crate::interaction::Interaction;
use crate::node::{Node, NodeId, NodeShape, NodeType, Position, ShapeParseError, Weights};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

// ------------------------------------------------------------------
// Payload structures (the JSON shape handed over by the host)
// ------------------------------------------------------------------

/// A node label is sent either as one string or as a list of aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelPayload {
    One(String),
    Many(Vec<String>),
}

impl Default for LabelPayload {
    fn default() -> Self {
        LabelPayload::Many(Vec::new())
    }
}

impl LabelPayload {
    fn into_labels(self) -> Vec<String> {
        match self {
            LabelPayload::One(label) => vec![label],
            LabelPayload::Many(labels) => labels,
        }
    }

    fn from_labels(mut labels: Vec<String>) -> Self {
        if labels.len() == 1 {
            LabelPayload::One(labels.remove(0))
        } else {
            LabelPayload::Many(labels)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePayload {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub label: LabelPayload,
    #[serde(default)]
    pub weight: Weights,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(
        default,
        rename = "borderColor",
        skip_serializing_if = "Option::is_none"
    )]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub nodes: Vec<NodePayload>,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

// ------------------------------------------------------------------
// Network
// ------------------------------------------------------------------

/// Renderer-independent network: ordered nodes, directed interactions.
/// Every interaction endpoint refers to a node of the network.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Network {
    title: String,
    nodes: Vec<Node>,
    interactions: Vec<Interaction>,
}

impl Network {
    pub fn new(
        title: impl Into<String>,
        interactions: Vec<Interaction>,
        nodes: Vec<Node>,
    ) -> Result<Self, NetworkError> {
        let mut ids = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !ids.insert(&node.id) {
                return Err(NetworkError::DuplicateNode(node.id.clone()));
            }
        }
        for edge in &interactions {
            for end in [&edge.source, &edge.target] {
                if !ids.contains(end) {
                    return Err(NetworkError::DanglingInteraction {
                        from: edge.source.clone(),
                        to: edge.target.clone(),
                        missing: end.clone(),
                    });
                }
            }
        }
        Ok(Self {
            title: title.into(),
            nodes,
            interactions,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn interaction_count(&self) -> usize {
        self.interactions.len()
    }

    /// All weight keys carried by at least one node of `node_type`.
    pub fn weight_keys(&self, node_type: &NodeType) -> BTreeSet<String> {
        self.nodes
            .iter()
            .filter(|n| &n.node_type == node_type)
            .flat_map(|n| n.weights.keys().cloned())
            .collect()
    }

    pub fn into_parts(self) -> (String, Vec<Node>, Vec<Interaction>) {
        (self.title, self.nodes, self.interactions)
    }

    pub fn from_payload(payload: NetworkPayload) -> Result<Self, NetworkError> {
        let nodes = payload
            .nodes
            .into_iter()
            .map(node_from_payload)
            .collect::<Result<Vec<_>, _>>()?;
        let network = Self::new(payload.title, payload.interactions, nodes)?;
        debug!(
            title = %network.title,
            nodes = network.nodes.len(),
            interactions = network.interactions.len(),
            "network decoded"
        );
        Ok(network)
    }

    pub fn to_payload(&self) -> NetworkPayload {
        NetworkPayload {
            title: self.title.clone(),
            nodes: self.nodes.iter().map(node_to_payload).collect(),
            interactions: self.interactions.clone(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, NetworkError> {
        let payload: NetworkPayload = serde_json::from_str(json)?;
        Self::from_payload(payload)
    }

    pub fn to_json(&self) -> Result<String, NetworkError> {
        Ok(serde_json::to_string_pretty(&self.to_payload())?)
    }
}

fn node_from_payload(payload: NodePayload) -> Result<Node, NetworkError> {
    let id = NodeId::new(payload.id);
    let mut node = Node::new(id.clone(), payload.node_type);
    let labels = payload.label.into_labels();
    if !labels.is_empty() {
        node.labels = labels;
    }
    node.weights = payload.weight;
    if let Some(color) = payload.color {
        node.color = color.parse().map_err(|error| NetworkError::InvalidColor {
            node: id.clone(),
            error,
        })?;
    }
    if let Some(border) = payload.border_color {
        node.border_color = Some(border.parse::<Color>().map_err(|error| {
            NetworkError::InvalidColor {
                node: id.clone(),
                error,
            }
        })?);
    }
    if let Some(shape) = payload.shape {
        node.shape = shape.parse::<NodeShape>().map_err(|error| {
            NetworkError::InvalidShape {
                node: id.clone(),
                error,
            }
        })?;
    }
    if let (Some(x), Some(y)) = (payload.x, payload.y) {
        node.position = Position::new(x, y);
    }
    Ok(node)
}

fn node_to_payload(node: &Node) -> NodePayload {
    NodePayload {
        id: node.id.to_string(),
        node_type: node.node_type.clone(),
        label: LabelPayload::from_labels(node.labels.clone()),
        weight: node.weights.clone(),
        color: Some(node.color.to_hex()),
        border_color: node.border_color.map(Color::to_hex),
        shape: Some(node.shape.as_str().to_string()),
        x: Some(node.position.x),
        y: Some(node.position.y),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum NetworkError {
    #[error("duplicate node id `{0}`")]
    DuplicateNode(NodeId),
    #[error("interaction {from} -> {to} references unknown node `{missing}`")]
    DanglingInteraction {
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },
    #[error("node `{node}`: {error}")]
    InvalidColor { node: NodeId, error: ColorParseError },
    #[error("node `{node}`: {error}")]
    InvalidShape { node: NodeId, error: ShapeParseError },
    #[error("malformed network payload: {0}")]
    Json(#[from] serde_json::Error),
}
