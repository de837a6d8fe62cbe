use std::io::{self, Write};

use crate::idx::decoder::UBYTE_TYPE;
use crate::idx::tensor::IdxTensor;

/// Writes `tensor` in IDX layout: zero magic, type 0x08, rank, big-endian
/// extents, then the payload.
pub fn encode<W: Write>(tensor: &IdxTensor, mut writer: W) -> io::Result<()> {
    // `IdxTensor` can only be built with 1..=255 extents via `decode`, but
    // `IdxTensor::new` accepts any non-empty shape.
    let ndims = u8::try_from(tensor.rank()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("IDX supports at most 255 dimensions, tensor has {}", tensor.rank()),
        )
    })?;

    writer.write_all(&[0x00, 0x00, UBYTE_TYPE, ndims])?;
    for extent in tensor.shape() {
        writer.write_all(&extent.to_be_bytes())?;
    }
    writer.write_all(tensor.payload())?;
    writer.flush()
}

/// Convenience wrapper around `encode` for in-memory use.
pub fn to_bytes(tensor: &IdxTensor) -> io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(4 + 4 * tensor.rank() + tensor.payload().len());
    encode(tensor, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idx::decoder::{decode, DecodeMode};

    #[test]
    fn header_layout_matches_mnist_labels() {
        let labels = IdxTensor::new(vec![2], vec![3, 9]).unwrap();
        assert_eq!(to_bytes(&labels).unwrap(), vec![0, 0, 0x08, 1, 0, 0, 0, 2, 3, 9]);
    }

    #[test]
    fn decode_reproduces_encoded_image_stack() {
        let images = IdxTensor::new(vec![3, 2, 5], (0..30).collect()).unwrap();
        let decoded = decode(&to_bytes(&images).unwrap()[..], DecodeMode::Strict).unwrap();
        assert_eq!(decoded, images);
    }

    #[test]
    fn rank_above_255_is_rejected() {
        let wide = IdxTensor::new(vec![1; 256], vec![0]).unwrap();
        let err = encode(&wide, Vec::new()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        let err = to_bytes(&wide).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
