use serde::{Deserialize, Serialize};

/// A vertex of a Huffman tree.
///
/// Leaves carry the byte they stand for and how often it occurred. Internal
/// nodes own exactly two children; their weight is the sum over the subtree
/// and is computed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Leaf { value: u8, frequency: u64 },
    Internal { left: Box<Node>, right: Box<Node> },
}

impl Node {
    pub fn leaf(value: u8, frequency: u64) -> Self {
        Node::Leaf { value, frequency }
    }

    pub fn from_children(left: Node, right: Node) -> Self {
        Node::Internal {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn frequency(&self) -> u64 {
        match self {
            Node::Leaf { frequency, .. } => *frequency,
            Node::Internal { left, right } => left.frequency() + right.frequency(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Follows one edge: `false` goes left, `true` goes right. Leaves have no children.
    pub fn child(&self, bit: bool) -> Option<&Node> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { left, right } => Some(if bit { &**right } else { &**left }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_leaf() {
        let n = Node::leaf(b'a', 3);
        assert_eq!(n.frequency(), 3);
        assert!(n.is_leaf());
        assert_eq!(n.child(false), None);
        assert_eq!(n.child(true), None);
    }

    #[test]
    fn node_from_children() {
        let left = Node::leaf(b'a', 5);
        let right = Node::leaf(b'b', 2);

        let n = Node::from_children(left.clone(), right.clone());

        assert!(!n.is_leaf());
        assert_eq!(n.frequency(), 7);
        assert_eq!(n.child(false), Some(&left));
        assert_eq!(n.child(true), Some(&right));
    }

    #[test]
    fn frequency_sums_whole_subtree() {
        let inner = Node::from_children(Node::leaf(1, 1), Node::leaf(2, 2));
        let n = Node::from_children(inner, Node::leaf(3, 4));
        assert_eq!(n.frequency(), 7);
    }
}
