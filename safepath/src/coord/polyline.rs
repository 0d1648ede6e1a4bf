//! Encoded polyline decoding.
//!
//! Route paths arrive from the mapping provider in the "encoded polyline"
//! format: each point is a pair of zig-zag encoded deltas (1e-5 degree
//! precision) packed into 5-bit groups offset by 63 into printable ASCII.

use super::types::{CoordError, Coordinate};

const PRECISION: f64 = 1e5;

/// Decodes an encoded polyline into coordinates.
///
/// An empty string decodes to an empty path.
pub fn decode_polyline(encoded: &str) -> Result<Vec<Coordinate>, CoordError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        lat += next_value(bytes, &mut index)?;
        lon += next_value(bytes, &mut index)?;
        points.push(Coordinate::new(
            lat as f64 / PRECISION,
            lon as f64 / PRECISION,
        )?);
    }

    Ok(points)
}

/// Reads one zig-zag encoded value starting at `index`.
fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, CoordError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes.get(*index).ok_or_else(|| {
            CoordError::InvalidPolyline(format!("truncated value at byte {}", *index))
        })?;
        let chunk = i64::from(byte) - 63;
        if !(0..64).contains(&chunk) {
            return Err(CoordError::InvalidPolyline(format!(
                "unexpected character {:?} at byte {}",
                byte as char, *index
            )));
        }
        if shift > 60 {
            return Err(CoordError::InvalidPolyline("value overflow".to_string()));
        }

        *index += 1;
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(point: &Coordinate, lat: f64, lon: f64) {
        assert!(
            (point.latitude() - lat).abs() < 1e-6 && (point.longitude() - lon).abs() < 1e-6,
            "expected ({}, {}), got {}",
            lat,
            lon,
            point
        );
    }

    #[test]
    fn test_decode_reference_polyline() {
        let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();

        assert_eq!(points.len(), 3);
        assert_close(&points[0], 38.5, -120.2);
        assert_close(&points[1], 40.7, -120.95);
        assert_close(&points[2], 43.252, -126.453);
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode_polyline("").unwrap().is_empty());
    }

    #[test]
    fn test_truncated_polyline_is_rejected() {
        // Latitude present, longitude missing
        let result = decode_polyline("_p~iF");
        assert!(matches!(result, Err(CoordError::InvalidPolyline(_))));
    }

    #[test]
    fn test_invalid_character_is_rejected() {
        let result = decode_polyline("_p~iF ps|U");
        assert!(matches!(result, Err(CoordError::InvalidPolyline(_))));
    }
}
