//! Renderer-independent model of a biological interaction network:
//! typed nodes with sparse weights, directed interactions, and the JSON
//! payload used to exchange networks with the hosting application.

pub mod color;
pub mod interaction;
pub mod network;
pub mod node;

pub use color::{Color, ColorParseError};
pub use interaction::Interaction;
pub use network::{LabelPayload, Network, NetworkError, NetworkPayload, NodePayload};
pub use node::{Node, NodeId, NodeShape, NodeType, Position, ShapeParseError, Weights};
