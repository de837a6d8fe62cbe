use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::idx::error::{FormatError, IdxError};
use crate::idx::tensor::{payload_len, IdxTensor};

/// Element-type tag for unsigned bytes, the only payload type supported.
pub const UBYTE_TYPE: u8 = 0x08;

/// What to do when the payload ends before `product(shape)` bytes were read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeMode {
    /// Fail with `IdxError::TruncatedPayload`.
    #[default]
    Strict,
    /// Keep what was read and zero-fill the rest of the payload.
    Lenient,
}

/// Decodes one IDX tensor from `reader`.
///
/// # Wire layout
/// ```text
/// bytes 0-1:        magic (not validated)
/// byte  2:          element type, must be 0x08 (uint8)
/// byte  3:          ndims, must be >= 1
/// bytes 4..4+4n:    ndims big-endian u32 extents, outermost first
/// then:             product(extents) payload bytes, row-major
/// ```
///
/// # Errors
/// - `FormatError` for a short header, a foreign type tag, zero dimensions,
///   a truncated shape section, or a shape whose byte count overflows.
/// - `IdxError::TruncatedPayload` for a short payload in `DecodeMode::Strict`.
/// - `IdxError::Io` for any other read failure.
pub fn decode<R: Read>(mut reader: R, mode: DecodeMode) -> Result<IdxTensor, IdxError> {
    // ── Header ──────────────────────────────────────────────────────────────
    let mut header = [0u8; 4];
    let got = read_full(&mut reader, &mut header)?;
    if got < header.len() {
        return Err(FormatError::ShortHeader(got).into());
    }

    let [m0, m1, type_tag, ndims] = header;
    debug!(
        "idx header: magic={:#06x}, type={:#04x}, ndims={}",
        u16::from_be_bytes([m0, m1]),
        type_tag,
        ndims
    );

    if type_tag != UBYTE_TYPE {
        return Err(FormatError::UnsupportedType(type_tag).into());
    }
    if ndims == 0 {
        return Err(FormatError::ZeroDimensions.into());
    }

    // ── Shape (big-endian on disk, whatever the host) ───────────────────────
    let ndims = ndims as usize;
    let mut raw_dims = vec![0u8; 4 * ndims];
    let got = read_full(&mut reader, &mut raw_dims)?;
    if got < raw_dims.len() {
        return Err(FormatError::TruncatedShape { declared: ndims, read: got / 4 }.into());
    }

    let shape: Vec<u32> = raw_dims
        .chunks_exact(4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    for (i, extent) in shape.iter().enumerate() {
        debug!("idx extent[{}]={}", i, extent);
    }

    // ── Payload ─────────────────────────────────────────────────────────────
    let expected = payload_len(&shape)?;
    let mut payload = Vec::new();
    reader.by_ref().take(expected as u64).read_to_end(&mut payload)?;
    let actual = payload.len();
    debug!("idx payload: read {} of {} bytes", actual, expected);

    if actual < expected {
        match mode {
            DecodeMode::Strict => {
                return Err(IdxError::TruncatedPayload { expected, actual });
            }
            DecodeMode::Lenient => {
                warn!(
                    "idx payload truncated: read {} of {} bytes, zero-filling the rest",
                    actual, expected
                );
                payload.resize(expected, 0);
            }
        }
    }

    Ok(IdxTensor::from_parts(shape, payload))
}

/// Opens `path` and decodes it.
pub fn read_idx_file<P: AsRef<Path>>(path: P, mode: DecodeMode) -> Result<IdxTensor, IdxError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IdxError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("decoding {}", path.display());
    decode(BufReader::new(file), mode)
}

/// Fills `buf` until it is full or the source is exhausted; returns the byte count.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
