//! Arbitrary-precision signed decimals (§3, §4.3.5).
//!
//! A decimal is `unscaled × 10^(-scale)`, with `scale` non-negative and
//! `unscaled` an arbitrary-length two's-complement big-endian integer.

use num_bigint::{BigInt, Sign};

use crate::error::{RecordError, Result};
use crate::primitive::{decode_u32, encode_u32};

/// An arbitrary-precision signed decimal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal {
    scale: u32,
    unscaled: BigInt,
}

impl Decimal {
    /// Builds a decimal directly from its unscaled integer and scale.
    pub fn new(unscaled: BigInt, scale: u32) -> Self {
        Decimal { scale, unscaled }
    }

    /// The non-negative scale (number of digits after the decimal point).
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// The unscaled integer value.
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    /// Converts a binary `f64` into an exact decimal.
    ///
    /// Converting through the binary mantissa/exponent would encode the
    /// float's *binary* approximation rather than the value a human would
    /// expect (e.g. `0.1_f64` is not exactly one tenth). Instead this routes
    /// through `f64`'s `Display`, which Rust already renders with the
    /// shortest string that round-trips back to the same float, and that
    /// string is exact decimal text.
    pub fn from_f64(value: f64) -> Result<Decimal> {
        Decimal::parse_decimal_str(&value.to_string())
    }

    fn parse_decimal_str(text: &str) -> Result<Decimal> {
        let (sign, text) = match text.strip_prefix('-') {
            Some(rest) => (Sign::Minus, rest),
            None => (Sign::Plus, text),
        };

        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i, f),
            None => (text, ""),
        };

        let scale = frac_part.len() as u32;
        let mut digits = String::with_capacity(int_part.len() + frac_part.len());
        digits.push_str(int_part);
        digits.push_str(frac_part);
        if digits.is_empty() {
            digits.push('0');
        }

        let magnitude = digits
            .parse::<BigInt>()
            .map_err(|_| RecordError::InvalidLength { length: -1 })?;
        let unscaled = if sign == Sign::Minus {
            -magnitude
        } else {
            magnitude
        };

        Ok(Decimal { scale, unscaled })
    }

    /// Encodes this decimal's body: 4-byte scale, 4-byte mantissa byte
    /// length, then the mantissa's two's-complement big-endian bytes.
    pub fn encode(&self, out: &mut Vec<u8>) {
        let mantissa = self.unscaled.to_signed_bytes_be();
        encode_u32(self.scale, out);
        encode_u32(mantissa.len() as u32, out);
        out.extend_from_slice(&mantissa);
    }

    /// Decodes a decimal body, returning the value and the unconsumed tail.
    pub fn decode(bytes: &[u8]) -> Result<(Decimal, &[u8])> {
        let (scale, rest) = decode_u32(bytes)?;
        let (length, rest) = decode_u32(rest)?;
        let length = length as usize;
        if rest.len() < length {
            return Err(RecordError::TruncatedInput {
                expected: length - rest.len(),
                kind: "decimal mantissa",
            });
        }
        let (mantissa_bytes, rest) = (&rest[..length], &rest[length..]);
        let unscaled = BigInt::from_signed_bytes_be(mantissa_bytes);
        Ok((Decimal { scale, unscaled }, rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_simple_values() {
        for (unscaled, scale) in [(0i64, 0u32), (12345, 2), (-12345, 2), (1, 0), (-1, 5)] {
            let d = Decimal::new(BigInt::from(unscaled), scale);
            let mut buf = Vec::new();
            d.encode(&mut buf);
            let (decoded, rest) = Decimal::decode(&buf).unwrap();
            assert_eq!(decoded, d);
            assert!(rest.is_empty());
        }
    }

    #[test]
    fn from_f64_preserves_exact_text() {
        let d = Decimal::from_f64(12.24).unwrap();
        assert_eq!(d.scale(), 2);
        assert_eq!(d.unscaled(), &BigInt::from(1224));
    }

    #[test]
    fn from_f64_handles_negative_and_integral() {
        let d = Decimal::from_f64(-3.0).unwrap();
        assert_eq!(d.unscaled(), &BigInt::from(-3));

        let d = Decimal::from_f64(0.0).unwrap();
        assert_eq!(d.unscaled(), &BigInt::from(0));
    }

    #[test]
    fn arbitrary_precision_beyond_i64() {
        let big: BigInt = "123456789012345678901234567890".parse().unwrap();
        let d = Decimal::new(big.clone(), 10);
        let mut buf = Vec::new();
        d.encode(&mut buf);
        let (decoded, _) = Decimal::decode(&buf).unwrap();
        assert_eq!(decoded.unscaled(), &big);
    }
}
