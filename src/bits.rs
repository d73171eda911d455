use bitvec::prelude::*;

/// Append-at-back, pop-at-front queue of bits.
///
/// Bits are stored LSB-first in bytes, which is also the packing used on the
/// wire, so [`BitSequence::to_bytes`] and [`BitSequence::from_bytes`] are
/// the only conversion points.
#[derive(Debug, Clone, Default)]
pub struct BitSequence {
    bits: BitVec<u8, Lsb0>,
    head: usize,
}

impl BitSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bits: BitVec::with_capacity(bits),
            head: 0,
        }
    }

    /// Reads the first `len` bits of `bytes`, LSB-first within each byte.
    ///
    /// Returns `None` when `bytes` holds fewer than `len` bits.
    pub fn from_bytes(bytes: &[u8], len: usize) -> Option<Self> {
        let available = bytes.view_bits::<Lsb0>();
        if len > available.len() {
            return None;
        }

        Some(Self {
            bits: available[..len].iter().by_vals().collect(),
            head: 0,
        })
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn append(&mut self, other: &BitSequence) {
        self.bits.extend_from_bitslice(other.as_bitslice());
    }

    pub fn pop_front(&mut self) -> Option<bool> {
        let bit = self.bits.get(self.head).map(|b| *b)?;
        self.head += 1;
        Some(bit)
    }

    pub fn len(&self) -> usize {
        self.bits.len() - self.head
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.as_bitslice().iter().by_vals()
    }

    pub fn as_bitslice(&self) -> &BitSlice<u8, Lsb0> {
        &self.bits[self.head..]
    }

    /// True if `self` is a prefix of `other`.
    pub fn is_prefix_of(&self, other: &BitSequence) -> bool {
        self.len() <= other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }

    /// Packs the remaining bits into `ceil(len / 8)` bytes, zero padded.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut packed: BitVec<u8, Lsb0> = BitVec::with_capacity(self.len());
        packed.extend(self.iter());
        packed.set_uninitialized(false);
        packed.into_vec()
    }
}

impl PartialEq for BitSequence {
    fn eq(&self, other: &Self) -> bool {
        self.as_bitslice() == other.as_bitslice()
    }
}

impl Eq for BitSequence {}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
            head: 0,
        }
    }
}

impl Extend<bool> for BitSequence {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        self.bits.extend(iter);
    }
}
