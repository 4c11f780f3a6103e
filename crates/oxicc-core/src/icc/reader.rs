//! Big-endian field decoding
//!
//! Callers must validate `offset + width <= bytes.len()` first; these reads
//! index directly and panic out of range.

use super::types::DateTime;

#[inline]
pub(crate) fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([bytes[offset], bytes[offset + 1]])
}

#[inline]
pub(crate) fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[inline]
pub(crate) fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    read_u32(bytes, offset) as i32
}

#[inline]
pub(crate) fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    ((read_u32(bytes, offset) as u64) << 32) | read_u32(bytes, offset + 4) as u64
}

/// Decode an s15Fixed16Number (raw i32 / 65536)
#[inline]
pub(crate) fn read_s15fixed16(bytes: &[u8], offset: usize) -> f32 {
    read_i32(bytes, offset) as f32 * (1.0 / 65536.0)
}

/// Decode a 12-byte dateTimeNumber
pub(crate) fn read_date_time(bytes: &[u8], offset: usize) -> DateTime {
    DateTime {
        year: read_u16(bytes, offset),
        month: read_u16(bytes, offset + 2),
        day: read_u16(bytes, offset + 4),
        hour: read_u16(bytes, offset + 6),
        minute: read_u16(bytes, offset + 8),
        second: read_u16(bytes, offset + 10),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09];
        assert_eq!(read_u16(&bytes, 0), 0x0102);
        assert_eq!(read_u16(&bytes, 1), 0x0203);
        assert_eq!(read_u32(&bytes, 0), 0x0102_0304);
        assert_eq!(read_u64(&bytes, 1), 0x0203_0405_0607_0809);
        assert_eq!(read_i32(&[0xFF, 0xFF, 0xFF, 0xFE], 0), -2);
    }

    #[test]
    fn test_reads_end_at_buffer_end() {
        let bytes = [0u8, 0, 0, 0, 0xAB, 0xCD, 0x12, 0x34];
        assert_eq!(read_u16(&bytes, bytes.len() - 2), 0x1234);
        assert_eq!(read_u32(&bytes, bytes.len() - 4), 0xABCD_1234);
        assert_eq!(read_u64(&bytes, 0), 0xABCD_1234);
    }

    #[test]
    fn test_s15fixed16() {
        assert_eq!(read_s15fixed16(&[0x00, 0x01, 0x00, 0x00], 0), 1.0);
        assert_eq!(read_s15fixed16(&[0x00, 0x00, 0x80, 0x00], 0), 0.5);
        assert_eq!(read_s15fixed16(&[0xFF, 0xFF, 0x00, 0x00], 0), -1.0);

        // D50 X as stored in most profiles
        let x = read_s15fixed16(&[0x00, 0x00, 0xF6, 0xD6], 0);
        assert!((x - 0.9642).abs() < 1e-4);
    }

    #[test]
    fn test_date_time() {
        let bytes = [
            0x07, 0xE2, // 2018
            0x00, 0x03, // March
            0x00, 0x1F, // 31
            0x00, 0x17, // 23
            0x00, 0x3B, // 59
            0x00, 0x01, // 1
        ];
        let dt = read_date_time(&bytes, 0);
        assert_eq!(
            dt,
            DateTime {
                year: 2018,
                month: 3,
                day: 31,
                hour: 23,
                minute: 59,
                second: 1,
            }
        );
    }
}
