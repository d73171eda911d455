use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt;
use std::io::{Read, Write};

use derivative::Derivative;
use serde::{Deserialize, Serialize};

use crate::bits::BitSequence;
use crate::error::{CompressionError, Result};
use crate::frame;
use crate::node::Node;

/// Queue entry: ordered by frequency, then by the order nodes entered the queue.
///
/// Leaves enter in ascending byte order, merged nodes after all leaves, so
/// equal frequencies always resolve the same way.
#[derive(Debug, Derivative)]
#[derivative(PartialEq, Eq, PartialOrd, Ord)]
struct Pending {
    frequency: u64,
    sequence: usize,

    #[derivative(PartialEq = "ignore")]
    #[derivative(PartialOrd = "ignore")]
    #[derivative(Ord = "ignore")]
    node: Node,
}

impl Pending {
    fn new(node: Node, sequence: usize) -> Self {
        Self {
            frequency: node.frequency(),
            sequence,
            node,
        }
    }
}

/// Occurrence count of every byte value present in `bytes`.
pub fn frequencies(bytes: &[u8]) -> BTreeMap<u8, u64> {
    let mut freq = BTreeMap::new();
    for &b in bytes {
        *freq.entry(b).or_default() += 1;
    }
    freq
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let freq = frequencies(bytes);
        log::trace!("Byte frequency: {:?}", freq);
        Self::from_frequencies(&freq)
    }

    /// Greedy construction: merge the two lightest nodes until one is left.
    ///
    /// The first node taken from the queue becomes the left child. A table
    /// with a single byte yields a bare leaf.
    pub fn from_frequencies(freq: &BTreeMap<u8, u64>) -> Result<Self> {
        let mut pq: BinaryHeap<_> = freq
            .iter()
            .filter(|&(_, &count)| count > 0)
            .enumerate()
            .map(|(sequence, (&b, &count))| Reverse(Pending::new(Node::leaf(b, count), sequence)))
            .collect();

        let mut sequence = pq.len();
        while pq.len() > 1 {
            let (Some(Reverse(left)), Some(Reverse(right))) = (pq.pop(), pq.pop()) else {
                break;
            };
            pq.push(Reverse(Pending::new(
                Node::from_children(left.node, right.node),
                sequence,
            )));
            sequence += 1;
        }

        pq.pop()
            .map(|Reverse(pending)| HuffmanTree { root: pending.node })
            .ok_or(CompressionError::EmptyInput)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// A tree made of one leaf: the input held a single distinct byte.
    pub fn is_degenerate(&self) -> bool {
        self.root.is_leaf()
    }

    pub fn code_map(&self) -> CodeMap {
        fn collect(node: &Node, mut path: BitSequence, codes: &mut BTreeMap<u8, BitSequence>) {
            match node {
                Node::Leaf { value, .. } => {
                    codes.insert(*value, path);
                }
                Node::Internal { left, right } => {
                    let mut left_path = path.clone();
                    left_path.push(false);
                    collect(left, left_path, codes);

                    path.push(true);
                    collect(right, path, codes);
                }
            }
        }

        let mut codes = BTreeMap::new();
        collect(&self.root, BitSequence::new(), &mut codes);
        CodeMap { codes }
    }

    /// Pre-order walk: one structure bit per node (`true` for a leaf) and the
    /// leaf bytes in the order they are visited.
    pub fn flatten(&self) -> (Vec<u8>, BitSequence) {
        fn visit(node: &Node, bytes: &mut Vec<u8>, structure: &mut BitSequence) {
            match node {
                Node::Leaf { value, .. } => {
                    structure.push(true);
                    bytes.push(*value);
                }
                Node::Internal { left, right } => {
                    structure.push(false);
                    visit(left, bytes, structure);
                    visit(right, bytes, structure);
                }
            }
        }

        let mut bytes = Vec::new();
        let mut structure = BitSequence::new();
        visit(&self.root, &mut bytes, &mut structure);
        (bytes, structure)
    }

    /// Inverse of [`HuffmanTree::flatten`]. Both inputs must be consumed exactly.
    ///
    /// Rebuilt leaves have a frequency of zero; only shape and bytes are stored.
    pub fn unflatten(bytes: &[u8], structure: BitSequence) -> Result<Self> {
        let mut reader = Unflatten {
            bytes,
            next: 0,
            seen: [false; 256],
            structure,
        };
        let root = reader.node(0)?;

        if reader.next != bytes.len() {
            return Err(CompressionError::CorruptTree("unused leaf bytes"));
        }
        if !reader.structure.is_empty() {
            return Err(CompressionError::CorruptTree("unused structure bits"));
        }
        Ok(HuffmanTree { root })
    }

    pub fn write_to<W: Write>(&self, output: &mut W) -> Result<()> {
        let (bytes, structure) = self.flatten();

        frame::write_u32(output, bytes.len())?;
        output.write_all(&bytes)?;
        frame::write_u32(output, structure.len())?;
        output.write_all(&structure.to_bytes())?;
        Ok(())
    }

    pub fn read_from<R: Read>(input: &mut R) -> Result<Self> {
        let leaf_count = frame::read_u32(input, "leaf byte count")?;
        if leaf_count == 0 {
            return Err(CompressionError::CorruptTree("tree has no leaves"));
        }
        if leaf_count > 256 {
            return Err(CompressionError::CorruptTree("more leaves than byte values"));
        }
        let bytes = frame::read_bytes(input, leaf_count, "leaf bytes")?;

        let bit_count = frame::read_u32(input, "structure bit count")?;
        if bit_count != 2 * leaf_count - 1 {
            return Err(CompressionError::CorruptTree(
                "structure bit count does not match leaf count",
            ));
        }
        let packed = frame::read_bytes(input, bit_count.div_ceil(8), "structure bits")?;
        let structure = BitSequence::from_bytes(&packed, bit_count)
            .ok_or(CompressionError::CorruptTree("structure bits missing"))?;

        Self::unflatten(&bytes, structure)
    }
}

struct Unflatten<'a> {
    bytes: &'a [u8],
    next: usize,
    seen: [bool; 256],
    structure: BitSequence,
}

impl Unflatten<'_> {
    fn node(&mut self, depth: usize) -> Result<Node> {
        if self.next >= self.bytes.len() {
            return Err(CompressionError::CorruptTree("leaf bytes exhausted"));
        }
        // n leaves never sit deeper than n - 1
        if depth >= self.bytes.len() {
            return Err(CompressionError::CorruptTree("tree deeper than its leaf count"));
        }

        match self.structure.pop_front() {
            None => Err(CompressionError::CorruptTree("structure bits exhausted")),
            Some(true) => {
                let value = self.bytes[self.next];
                self.next += 1;
                if std::mem::replace(&mut self.seen[value as usize], true) {
                    return Err(CompressionError::CorruptTree("duplicate leaf byte"));
                }
                Ok(Node::leaf(value, 0))
            }
            Some(false) => {
                let left = self.node(depth + 1)?;
                let right = self.node(depth + 1)?;
                Ok(Node::from_children(left, right))
            }
        }
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_node(f: &mut fmt::Formatter<'_>, node: &Node, depth: usize, label: &str) -> fmt::Result {
            let indent = "  ".repeat(depth);
            match node {
                Node::Leaf { value, frequency } => writeln!(
                    f,
                    "{indent}{label}-> Leaf: '{}' ({value}) [weight: {frequency}]",
                    value.escape_ascii()
                ),
                Node::Internal { left, right } => {
                    writeln!(f, "{indent}{label}-> Internal [weight: {}]", node.frequency())?;
                    write_node(f, left, depth + 1, "L")?;
                    write_node(f, right, depth + 1, "R")
                }
            }
        }

        writeln!(f, "Huffman tree:")?;
        write_node(f, &self.root, 0, "root")
    }
}

/// Byte to codeword table derived from a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeMap {
    codes: BTreeMap<u8, BitSequence>,
}

impl CodeMap {
    pub fn get(&self, b: u8) -> Option<&BitSequence> {
        self.codes.get(&b)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitSequence)> + '_ {
        self.codes.iter().map(|(&b, code)| (b, code))
    }

    /// Concatenates the codewords of `stream`, or `None` if a byte has no codeword.
    pub fn encode(&self, stream: impl Iterator<Item = u8>) -> Option<BitSequence> {
        let mut out = BitSequence::new();
        for b in stream {
            out.append(self.codes.get(&b)?);
        }
        Some(out)
    }
}
