//! Fixed-width fields of the compressed format.
//!
//! Every count is a big-endian u32; every variable-length section is preceded by one.

use std::io::{Read, Write};

use crate::error::{CompressionError, Result};

pub(crate) fn write_u32<W: Write>(output: &mut W, value: usize) -> Result<()> {
    let value = u32::try_from(value).map_err(|_| CompressionError::InputTooLarge(value as u64))?;
    output.write_all(&value.to_be_bytes())?;
    Ok(())
}

pub(crate) fn read_u32<R: Read>(input: &mut R, field: &'static str) -> Result<usize> {
    let bytes = read_bytes(input, 4, field)?;
    let mut value = [0u8; 4];
    value.copy_from_slice(&bytes);
    Ok(u32::from_be_bytes(value) as usize)
}

/// Reads exactly `len` bytes without trusting `len` for the allocation.
pub(crate) fn read_bytes<R: Read>(input: &mut R, len: usize, field: &'static str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    input.by_ref().take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(CompressionError::TruncatedInput {
            field,
            expected: len,
            found: bytes.len(),
        });
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn u32_is_big_endian() {
        let mut out = Vec::new();
        write_u32(&mut out, 0x0102_0304).unwrap();
        assert_eq!(out, vec![1, 2, 3, 4]);

        let value = read_u32(&mut Cursor::new(out), "count").unwrap();
        assert_eq!(value, 0x0102_0304);
    }

    #[test]
    fn short_read_is_truncation() {
        let err = read_u32(&mut Cursor::new(vec![0, 1]), "count").unwrap_err();
        match err {
            CompressionError::TruncatedInput {
                field,
                expected,
                found,
            } => {
                assert_eq!(field, "count");
                assert_eq!(expected, 4);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn read_bytes_leaves_the_rest() {
        let mut input = Cursor::new(vec![1, 2, 3]);
        assert_eq!(read_bytes(&mut input, 2, "head").unwrap(), vec![1, 2]);
        assert_eq!(read_bytes(&mut input, 1, "tail").unwrap(), vec![3]);
        assert_eq!(read_bytes(&mut input, 0, "empty").unwrap(), Vec::<u8>::new());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn oversized_count_is_rejected() {
        let err = write_u32(&mut Vec::new(), u32::MAX as usize + 1).unwrap_err();
        assert!(matches!(err, CompressionError::InputTooLarge(_)));
    }
}
