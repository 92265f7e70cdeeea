use crate::node::NodeId;
use serde::{Deserialize, Serialize};

/// Directed edge between two nodes. Parallel edges are allowed in a
/// network; merge deduplicates on the `(source, target)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interaction {
    pub source: NodeId,
    pub target: NodeId,
}

impl Interaction {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Deterministic edge id derived from both endpoints.
    pub fn id(&self) -> String {
        format!("#{}{}", self.source, self.target)
    }

    pub fn key(&self) -> (&NodeId, &NodeId) {
        (&self.source, &self.target)
    }

    pub fn touches(&self, id: &NodeId) -> bool {
        &self.source == id || &self.target == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_concatenates_endpoints() {
        let edge = Interaction::new("a", "b");
        assert_eq!(edge.id(), "#ab");
        assert_eq!(edge.id(), Interaction::new("a", "b").id());
        assert_ne!(edge.key(), Interaction::new("b", "a").key());
    }
}
