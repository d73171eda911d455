//! Static Huffman compression of byte streams.
//!
//! ```
//! let data = b"Eerie eyes seen near lake.";
//!
//! let mut compressed = Vec::new();
//! huffstream::compress(&data[..], &mut compressed)?;
//!
//! let mut restored = Vec::new();
//! huffstream::decompress(&compressed[..], &mut restored)?;
//! assert_eq!(restored, data);
//! # Ok::<(), huffstream::CompressionError>(())
//! ```

pub mod bits;
pub mod codec;
pub mod error;
pub mod node;
pub mod tree;

mod frame;

pub use bits::BitSequence;
pub use codec::{compress, compress_bytes, decompress, decompress_bytes};
pub use error::{CompressionError, Result};
pub use node::Node;
pub use tree::{frequencies, CodeMap, HuffmanTree};
