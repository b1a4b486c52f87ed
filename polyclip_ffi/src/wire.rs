//! Flat `i64` encoding of paths shared with foreign callers.
//!
//! Layout: `[total_len, path_count, (vertex_count, 0, x1, y1, x2, y2, ...), ...]` where
//! `total_len` counts every element including itself.
use polyclip::{Path64, Paths64, Point64};
use thiserror::Error;

/// Reasons a wire buffer is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("buffer shorter than its header ({0} elements)")]
    TooShort(i64),
    #[error("negative count {0}")]
    NegativeCount(i64),
    #[error("reserved element of path {0} is not zero")]
    ReservedNotZero(usize),
    #[error("buffer length {expected} does not match its content ({actual} elements)")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("allocation failed for encoded paths")]
    ResourceExhausted,
}

const HEADER_LEN: usize = 2;
const PATH_HEADER_LEN: usize = 2;

/// Decode a complete wire buffer, `buf.len()` must equal the encoded total length.
pub fn decode_paths(buf: &[i64]) -> Result<Paths64, WireError> {
    if buf.len() < HEADER_LEN {
        return Err(WireError::TooShort(buf.len() as i64));
    }
    let total_len = count(buf[0])?;
    if total_len != buf.len() {
        return Err(WireError::LengthMismatch {
            expected: total_len,
            actual: buf.len(),
        });
    }
    let path_count = count(buf[1])?;

    let mut paths = Paths64::new();
    let mut pos = HEADER_LEN;
    for i in 0..path_count {
        let header = buf
            .get(pos..pos + PATH_HEADER_LEN)
            .ok_or(WireError::LengthMismatch {
                expected: total_len,
                actual: pos + PATH_HEADER_LEN,
            })?;
        let vertex_count = count(header[0])?;
        if header[1] != 0 {
            return Err(WireError::ReservedNotZero(i));
        }
        pos += PATH_HEADER_LEN;

        let end = vertex_count
            .checked_mul(2)
            .and_then(|n| n.checked_add(pos))
            .filter(|&end| end <= total_len)
            .ok_or(WireError::LengthMismatch {
                expected: total_len,
                actual: pos.saturating_add(vertex_count.saturating_mul(2)),
            })?;
        let path: Path64 = buf[pos..end]
            .chunks_exact(2)
            .map(|xy| Point64::new(xy[0], xy[1]))
            .collect();
        paths.push(path);
        pos = end;
    }

    if pos != total_len {
        return Err(WireError::LengthMismatch {
            expected: total_len,
            actual: pos,
        });
    }
    Ok(paths)
}

/// Number of elements [encode_paths] produces for `paths`.
pub fn encoded_len(paths: &[Path64]) -> usize {
    HEADER_LEN
        + paths
            .iter()
            .map(|p| PATH_HEADER_LEN + 2 * p.len())
            .sum::<usize>()
}

/// Encode `paths` into a boxed wire buffer.
pub fn encode_paths(paths: &[Path64]) -> Result<Box<[i64]>, WireError> {
    let len = encoded_len(paths);
    let mut buf: Vec<i64> = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| WireError::ResourceExhausted)?;
    buf.push(len as i64);
    buf.push(paths.len() as i64);
    for p in paths {
        buf.push(p.len() as i64);
        buf.push(0);
        for pt in p {
            buf.push(pt.x);
            buf.push(pt.y);
        }
    }
    Ok(buf.into_boxed_slice())
}

fn count(v: i64) -> Result<usize, WireError> {
    usize::try_from(v).map_err(|_| WireError::NegativeCount(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyclip::path64;

    #[test]
    fn decode_example_buffer() {
        let buf = [10, 2, 1, 0, 5, 6, 1, 0, -1, -2];
        let paths = decode_paths(&buf).unwrap();
        assert_eq!(paths, vec![path64![(5, 6)], path64![(-1, -2)]]);
        assert_eq!(&*encode_paths(&paths).unwrap(), &buf);
    }

    #[test]
    fn empty_paths() {
        let encoded = encode_paths(&[]).unwrap();
        assert_eq!(&*encoded, &[2, 0]);
        assert!(decode_paths(&encoded).unwrap().is_empty());
    }

    #[test]
    fn malformed_buffers() {
        assert_eq!(decode_paths(&[1]), Err(WireError::TooShort(1)));
        assert!(matches!(
            decode_paths(&[3, 0]),
            Err(WireError::LengthMismatch { .. })
        ));
        assert_eq!(decode_paths(&[2, -1]), Err(WireError::NegativeCount(-1)));
        assert_eq!(
            decode_paths(&[6, 1, 1, 7, 0, 0]),
            Err(WireError::ReservedNotZero(0))
        );
        // vertex count runs past the end
        assert!(matches!(
            decode_paths(&[6, 1, 5, 0, 0, 0]),
            Err(WireError::LengthMismatch { .. })
        ));
        // trailing elements not covered by any path
        assert!(matches!(
            decode_paths(&[5, 0, 0, 0, 0]),
            Err(WireError::LengthMismatch { .. })
        ));
    }
}
