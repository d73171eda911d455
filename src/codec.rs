use std::io::{self, Read, Write};
use std::ptr;
use std::time::Instant;

use crate::bits::BitSequence;
use crate::error::{CompressionError, Result};
use crate::frame;
use crate::node::Node;
use crate::tree::HuffmanTree;

/// Compresses everything `input` yields and writes the framed result to `output`.
///
/// The whole input is buffered and encoded before the first byte is
/// written, so a failure leaves `output` untouched.
pub fn compress<R: Read, W: Write>(mut input: R, mut output: W) -> Result<()> {
    let start = Instant::now();

    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    if bytes.is_empty() {
        return Err(CompressionError::EmptyInput);
    }
    let read_time = start.elapsed();
    log::info!("Read time: {}ms", read_time.as_millis());

    let framed = compress_bytes(&bytes)?;
    let encode_time = start.elapsed();
    log::info!("Compression time: {}ms", (encode_time - read_time).as_millis());

    output.write_all(&framed)?;
    output.flush()?;
    let total = start.elapsed();
    log::info!("Write time: {}ms", (total - encode_time).as_millis());
    log::info!("Total time: {}ms", total.as_millis());
    Ok(())
}

/// Reads one framed stream from `input` and writes the original bytes to `output`.
pub fn decompress<R: Read, W: Write>(mut input: R, mut output: W) -> Result<()> {
    let start = Instant::now();

    let tree = HuffmanTree::read_from(&mut input)?;
    let payload_len = frame::read_u32(&mut input, "payload bit count")?;
    if payload_len == 0 {
        return Err(CompressionError::CorruptTree("payload is empty"));
    }

    if let Node::Leaf { value, .. } = tree.root() {
        // single symbol: the count field holds the number of repetitions
        io::copy(&mut io::repeat(*value).take(payload_len as u64), &mut output)?;
    } else {
        let packed = frame::read_bytes(&mut input, payload_len.div_ceil(8), "payload bits")?;
        let payload = BitSequence::from_bytes(&packed, payload_len)
            .ok_or(CompressionError::CorruptTree("payload bits missing"))?;
        output.write_all(&walk(tree.root(), &payload)?)?;
    }

    output.flush()?;
    log::info!("Total time: {}ms", start.elapsed().as_millis());
    Ok(())
}

/// In-memory form of [`compress`].
pub fn compress_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    let tree = HuffmanTree::from_bytes(bytes)?;
    log::debug!("{tree}");

    let mut out = Vec::new();
    tree.write_to(&mut out)?;

    if tree.is_degenerate() {
        frame::write_u32(&mut out, bytes.len())?;
        return Ok(out);
    }

    let payload = tree
        .code_map()
        .encode(bytes.iter().copied())
        .ok_or(CompressionError::CorruptTree("byte missing from code map"))?;
    frame::write_u32(&mut out, payload.len())?;
    out.extend_from_slice(&payload.to_bytes());
    Ok(out)
}

/// In-memory form of [`decompress`].
pub fn decompress_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decompress(bytes, &mut out)?;
    Ok(out)
}

/// Walks `root` once per payload bit, emitting a byte at every leaf reached.
fn walk(root: &Node, payload: &BitSequence) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut node = root;
    for bit in payload.iter() {
        node = node
            .child(bit)
            .ok_or(CompressionError::CorruptTree("walk reached past a leaf"))?;
        if let Node::Leaf { value, .. } = node {
            out.push(*value);
            node = root;
        }
    }

    if !ptr::eq(node, root) {
        return Err(CompressionError::CorruptTree("payload ends inside a codeword"));
    }
    Ok(out)
}
