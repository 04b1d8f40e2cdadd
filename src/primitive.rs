//! Fixed-width big-endian integers and floats, booleans, and length-prefixed
//! byte/UTF-8 strings.
//!
//! Everything here is big-endian, in contrast to the varint codec: the two
//! numeric encodings in this format are deliberately distinct (§4.1 vs §4.2).

use byteorder::{BigEndian, ByteOrder};

use crate::error::{RecordError, Result};
use crate::varint::{decode_zigzag_varint, encode_zigzag_varint};

fn take<'a>(bytes: &'a [u8], len: usize, kind: &'static str) -> Result<(&'a [u8], &'a [u8])> {
    if bytes.len() < len {
        return Err(RecordError::TruncatedInput {
            expected: len - bytes.len(),
            kind,
        });
    }
    Ok((&bytes[..len], &bytes[len..]))
}

/// Encodes a 16-bit big-endian integer.
pub fn encode_i16(value: i16, out: &mut Vec<u8>) {
    let mut buf = [0u8; 2];
    BigEndian::write_i16(&mut buf, value);
    out.extend_from_slice(&buf);
}

/// Decodes a 16-bit big-endian integer.
pub fn decode_i16(bytes: &[u8]) -> Result<(i16, &[u8])> {
    let (head, rest) = take(bytes, 2, "short")?;
    Ok((BigEndian::read_i16(head), rest))
}

/// Encodes a 16-bit big-endian unsigned integer (used for RID cluster ids).
pub fn encode_u16(value: u16, out: &mut Vec<u8>) {
    let mut buf = [0u8; 2];
    BigEndian::write_u16(&mut buf, value);
    out.extend_from_slice(&buf);
}

/// Decodes a 16-bit big-endian unsigned integer.
pub fn decode_u16(bytes: &[u8]) -> Result<(u16, &[u8])> {
    let (head, rest) = take(bytes, 2, "u16")?;
    Ok((BigEndian::read_u16(head), rest))
}

/// Encodes a 32-bit big-endian integer.
pub fn encode_i32(value: i32, out: &mut Vec<u8>) {
    let mut buf = [0u8; 4];
    BigEndian::write_i32(&mut buf, value);
    out.extend_from_slice(&buf);
}

/// Decodes a 32-bit big-endian integer.
pub fn decode_i32(bytes: &[u8]) -> Result<(i32, &[u8])> {
    let (head, rest) = take(bytes, 4, "int")?;
    Ok((BigEndian::read_i32(head), rest))
}

/// Encodes a 32-bit big-endian unsigned integer (header offsets, decimal
/// scale/length, link-bag size).
pub fn encode_u32(value: u32, out: &mut Vec<u8>) {
    let mut buf = [0u8; 4];
    BigEndian::write_u32(&mut buf, value);
    out.extend_from_slice(&buf);
}

/// Decodes a 32-bit big-endian unsigned integer.
pub fn decode_u32(bytes: &[u8]) -> Result<(u32, &[u8])> {
    let (head, rest) = take(bytes, 4, "u32")?;
    Ok((BigEndian::read_u32(head), rest))
}

/// Encodes a 64-bit big-endian integer.
pub fn encode_i64(value: i64, out: &mut Vec<u8>) {
    let mut buf = [0u8; 8];
    BigEndian::write_i64(&mut buf, value);
    out.extend_from_slice(&buf);
}

/// Decodes a 64-bit big-endian integer.
pub fn decode_i64(bytes: &[u8]) -> Result<(i64, &[u8])> {
    let (head, rest) = take(bytes, 8, "long")?;
    Ok((BigEndian::read_i64(head), rest))
}

/// Encodes a 64-bit big-endian unsigned integer (RID position in link bags).
pub fn encode_u64(value: u64, out: &mut Vec<u8>) {
    let mut buf = [0u8; 8];
    BigEndian::write_u64(&mut buf, value);
    out.extend_from_slice(&buf);
}

/// Decodes a 64-bit big-endian unsigned integer.
pub fn decode_u64(bytes: &[u8]) -> Result<(u64, &[u8])> {
    let (head, rest) = take(bytes, 8, "u64")?;
    Ok((BigEndian::read_u64(head), rest))
}

/// Encodes a 4-byte big-endian IEEE-754 float.
pub fn encode_f32(value: f32, out: &mut Vec<u8>) {
    let mut buf = [0u8; 4];
    BigEndian::write_f32(&mut buf, value);
    out.extend_from_slice(&buf);
}

/// Decodes a 4-byte big-endian IEEE-754 float.
pub fn decode_f32(bytes: &[u8]) -> Result<(f32, &[u8])> {
    let (head, rest) = take(bytes, 4, "float")?;
    Ok((BigEndian::read_f32(head), rest))
}

/// Encodes an 8-byte big-endian IEEE-754 double.
pub fn encode_f64(value: f64, out: &mut Vec<u8>) {
    let mut buf = [0u8; 8];
    BigEndian::write_f64(&mut buf, value);
    out.extend_from_slice(&buf);
}

/// Decodes an 8-byte big-endian IEEE-754 double.
pub fn decode_f64(bytes: &[u8]) -> Result<(f64, &[u8])> {
    let (head, rest) = take(bytes, 8, "double")?;
    Ok((BigEndian::read_f64(head), rest))
}

/// Encodes a boolean as a single `0x00`/`0x01` byte.
pub fn encode_bool(value: bool, out: &mut Vec<u8>) {
    out.push(if value { 0x01 } else { 0x00 });
}

/// Decodes a boolean byte, rejecting anything outside `{0, 1}`.
pub fn decode_bool(bytes: &[u8]) -> Result<(bool, &[u8])> {
    let (head, rest) = take(bytes, 1, "boolean")?;
    match head[0] {
        0x00 => Ok((false, rest)),
        0x01 => Ok((true, rest)),
        byte => Err(RecordError::InvalidBoolean { byte }),
    }
}

/// Encodes a ZigZag-varint length followed by `bytes` verbatim.
pub fn encode_length_prefixed_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    encode_zigzag_varint(bytes.len() as i64, out);
    out.extend_from_slice(bytes);
}

/// Decodes a ZigZag-varint length followed by that many raw bytes.
pub fn decode_length_prefixed_bytes(bytes: &[u8]) -> Result<(&[u8], &[u8])> {
    let (len, rest) = decode_zigzag_varint(bytes)?;
    if len < 0 {
        return Err(RecordError::InvalidLength { length: len });
    }
    take(rest, len as usize, "length-prefixed bytes")
}

/// Encodes a ZigZag-varint length followed by the UTF-8 bytes of `value`.
pub fn encode_string(value: &str, out: &mut Vec<u8>) {
    encode_length_prefixed_bytes(value.as_bytes(), out);
}

/// Decodes a length-prefixed UTF-8 string.
pub fn decode_string(bytes: &[u8]) -> Result<(String, &[u8])> {
    let (body, rest) = decode_length_prefixed_bytes(bytes)?;
    let s = std::str::from_utf8(body).map_err(|_| RecordError::InvalidUtf8)?;
    Ok((s.to_owned(), rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_round_trip() {
        let mut buf = Vec::new();
        encode_bool(true, &mut buf);
        encode_bool(false, &mut buf);
        assert_eq!(buf, vec![0x01, 0x00]);

        let (v, rest) = decode_bool(&buf).unwrap();
        assert!(v);
        let (v, rest) = decode_bool(rest).unwrap();
        assert!(!v);
        assert!(rest.is_empty());
    }

    #[test]
    fn bool_invalid_byte_rejected() {
        assert_eq!(
            decode_bool(&[0x02]),
            Err(RecordError::InvalidBoolean { byte: 0x02 })
        );
    }

    #[test]
    fn fixed_width_big_endian() {
        let mut buf = Vec::new();
        encode_i32(-12, &mut buf);
        assert_eq!(buf, vec![0xFF, 0xFF, 0xFF, 0xF4]);
        let (v, rest) = decode_i32(&buf).unwrap();
        assert_eq!(v, -12);
        assert!(rest.is_empty());
    }

    #[test]
    fn string_round_trip_including_empty() {
        for s in ["", "hello", "world!", "\u{1F980}"] {
            let mut buf = Vec::new();
            encode_string(s, &mut buf);
            let (decoded, rest) = decode_string(&buf).unwrap();
            assert_eq!(decoded, s);
            assert!(rest.is_empty());
        }
    }

    #[test]
    fn invalid_utf8_rejected() {
        let mut buf = Vec::new();
        encode_zigzag_varint(1, &mut buf);
        buf.push(0xFF);
        assert_eq!(decode_string(&buf), Err(RecordError::InvalidUtf8));
    }

    #[test]
    fn truncated_fixed_width_reported() {
        assert_eq!(
            decode_i32(&[0x00, 0x01]),
            Err(RecordError::TruncatedInput {
                expected: 2,
                kind: "int"
            })
        );
    }
}
