use crate::idx::error::FormatError;

/// A decoded IDX record set: a big-endian shape header followed by a flat
/// unsigned-byte payload.
///
/// `shape[0]` is always the record count. Label files are rank 1
/// (`[n]`), image files are rank 3 (`[n, rows, cols]`).
///
/// The tensor is immutable once built and owns both its shape and its
/// payload, so image and label tensors can be shared by reference between
/// the training and evaluation phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdxTensor {
    shape: Vec<u32>,
    payload: Vec<u8>,
}

impl IdxTensor {
    /// Builds a tensor, checking that `payload.len() == product(shape)`.
    pub fn new(shape: Vec<u32>, payload: Vec<u8>) -> Result<IdxTensor, FormatError> {
        if shape.is_empty() {
            return Err(FormatError::ZeroDimensions);
        }
        let expected = payload_len(&shape)?;
        if payload.len() != expected {
            return Err(FormatError::PayloadLength {
                shape,
                expected,
                actual: payload.len(),
            });
        }
        Ok(IdxTensor { shape, payload })
    }

    /// Decoder-side constructor; the caller has already sized the payload.
    pub(crate) fn from_parts(shape: Vec<u32>, payload: Vec<u8>) -> IdxTensor {
        IdxTensor { shape, payload }
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn shape(&self) -> &[u32] {
        &self.shape
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Number of records along the outer dimension.
    pub fn record_count(&self) -> usize {
        self.shape[0] as usize
    }

    /// Bytes per record: the product of every extent after the first.
    pub fn record_len(&self) -> usize {
        self.shape[1..].iter().map(|&d| d as usize).product()
    }

    /// Returns the `index`-th value of a rank-1 tensor.
    ///
    /// # Panics
    /// Panics if the tensor is not rank 1 or `index` is past the record count.
    pub fn scalar(&self, index: usize) -> u8 {
        assert_eq!(self.rank(), 1, "scalar() needs a rank-1 tensor, got rank {}", self.rank());
        assert!(
            index < self.record_count(),
            "scalar index {} out of range for {} records",
            index,
            self.record_count()
        );
        self.payload[index]
    }

    /// Copies the `index`-th `rows × cols` matrix of a rank-3 tensor into
    /// `out[..rows * cols]`.
    ///
    /// # Panics
    /// Panics if the tensor is not rank 3, `index` is past the record count,
    /// or `out` is shorter than one record.
    pub fn record_into(&self, index: usize, out: &mut [u8]) {
        assert_eq!(self.rank(), 3, "record_into() needs a rank-3 tensor, got rank {}", self.rank());
        assert!(
            index < self.record_count(),
            "record index {} out of range for {} records",
            index,
            self.record_count()
        );
        let n = self.shape[1] as usize * self.shape[2] as usize;
        assert!(out.len() >= n, "output buffer holds {} bytes, record needs {}", out.len(), n);
        let start = index * n;
        out[..n].copy_from_slice(&self.payload[start..start + n]);
    }
}

/// Product of all extents, or `ShapeOverflow` if it does not fit in `usize`.
pub(crate) fn payload_len(shape: &[u32]) -> Result<usize, FormatError> {
    shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d as usize))
        .ok_or_else(|| FormatError::ShapeOverflow(shape.to_vec()))
}
