use crate::panels::PanelId;
use toxynet::{NetworkError, NodeId};

#[derive(thiserror::Error, Debug)]
pub enum ViewerError {
    #[error("unknown layout `{0}`")]
    UnknownLayout(String),
    #[error("no network is displayed in the {0} panel")]
    MissingPanel(PanelId),
    #[error("{0}")]
    InvalidInput(String),
    #[error("Edge not added: {0}")]
    EdgeRejected(EdgeRejection),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("cannot access `{path}`: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EdgeRejection {
    #[error("node `{0}` is not displayed")]
    UnknownNode(NodeId),
    #[error("`{0}` cannot be linked to itself")]
    SelfLoop(NodeId),
    #[error("`{from}` is already linked to `{to}`")]
    AlreadyLinked { from: NodeId, to: NodeId },
    #[error("no target node was clicked")]
    NoTarget,
    #[error("the target must be in the same panel as the source")]
    OtherPanel,
}

pub type Result<T> = std::result::Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_rejection_message() {
        let err = ViewerError::EdgeRejected(EdgeRejection::AlreadyLinked {
            from: NodeId::new("a"),
            to: NodeId::new("b"),
        });
        assert_eq!(err.to_string(), "Edge not added: `a` is already linked to `b`");
        assert_eq!(
            EdgeRejection::SelfLoop(NodeId::new("a")).to_string(),
            "`a` cannot be linked to itself"
        );
    }
}
