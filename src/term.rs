//! The envelope term codec (§4.5): a smaller, simpler sibling of the value
//! codec used by the RPC framing layer rather than stored records. Terms
//! carry no inline type tag on the wire; the caller supplies the expected
//! [`TermKind`] up front, mirroring how framing code already knows the shape
//! of the next field it's about to read.

use crate::error::{RecordError, Result};
use crate::primitive::{decode_i16, decode_i32, decode_i64, encode_i16, encode_i32, encode_i64};

/// A single envelope term (§4.5).
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Boolean(bool),
    /// Wire-encoded as a lone 4-byte big-endian length of `-1`.
    Absent,
    Short(i16),
    Int(i32),
    Long(i64),
    /// A plain 4-byte big-endian integer, distinct from the tagged `Int`
    /// term at the type level even though the wire shape is identical.
    PlainInt(i32),
    String(String),
    Bytes(Vec<u8>),
    /// Bytes written verbatim with no length prefix; the caller already
    /// knows how many bytes to expect on decode.
    Raw(Vec<u8>),
    List(Vec<Term>),
}

/// Describes the wire shape expected on decode, since terms carry no inline
/// tag of their own.
#[derive(Debug, Clone)]
pub enum TermKind {
    Boolean,
    Absent,
    Short,
    Int,
    Long,
    PlainInt,
    String,
    Bytes,
    /// Raw bytes of the given length.
    Raw(usize),
    /// A nested list whose element shapes are each known up front.
    List(Vec<TermKind>),
}

const ABSENT_LENGTH: i32 = -1;

/// Encodes a single term to its wire bytes.
pub fn encode_term(term: &Term) -> Vec<u8> {
    let mut out = Vec::new();
    encode_term_into(term, &mut out);
    out
}

fn encode_term_into(term: &Term, out: &mut Vec<u8>) {
    match term {
        Term::Boolean(b) => out.push(if *b { 0x01 } else { 0x00 }),
        Term::Absent => encode_i32(ABSENT_LENGTH, out),
        Term::Short(v) => encode_i16(*v, out),
        Term::Int(v) => encode_i32(*v, out),
        Term::Long(v) => encode_i64(*v, out),
        Term::PlainInt(v) => encode_i32(*v, out),
        Term::String(s) => {
            encode_i32(s.len() as i32, out);
            out.extend_from_slice(s.as_bytes());
        }
        Term::Bytes(b) => {
            encode_i32(b.len() as i32, out);
            out.extend_from_slice(b);
        }
        Term::Raw(b) => out.extend_from_slice(b),
        Term::List(items) => {
            for item in items {
                encode_term_into(item, out);
            }
        }
    }
}

/// Decodes a single term of the given `kind` from the front of `bytes`,
/// returning the term and the unconsumed tail.
pub fn decode_term<'a>(bytes: &'a [u8], kind: &TermKind) -> Result<(Term, &'a [u8])> {
    match kind {
        TermKind::Boolean => {
            let (byte, rest) = take_one(bytes)?;
            match byte {
                0x00 => Ok((Term::Boolean(false), rest)),
                0x01 => Ok((Term::Boolean(true), rest)),
                other => Err(RecordError::InvalidBoolean { byte: other }),
            }
        }
        TermKind::Absent => {
            let (length, rest) = decode_i32(bytes)?;
            if length != ABSENT_LENGTH {
                return Err(RecordError::InvalidLength {
                    length: length as i64,
                });
            }
            Ok((Term::Absent, rest))
        }
        TermKind::Short => decode_i16(bytes).map(|(v, rest)| (Term::Short(v), rest)),
        TermKind::Int => decode_i32(bytes).map(|(v, rest)| (Term::Int(v), rest)),
        TermKind::Long => decode_i64(bytes).map(|(v, rest)| (Term::Long(v), rest)),
        TermKind::PlainInt => decode_i32(bytes).map(|(v, rest)| (Term::PlainInt(v), rest)),
        TermKind::String => {
            let (body, rest) = decode_length_prefixed(bytes)?;
            let s = std::str::from_utf8(body)
                .map_err(|_| RecordError::InvalidUtf8)?
                .to_owned();
            Ok((Term::String(s), rest))
        }
        TermKind::Bytes => {
            let (body, rest) = decode_length_prefixed(bytes)?;
            Ok((Term::Bytes(body.to_vec()), rest))
        }
        TermKind::Raw(len) => {
            if bytes.len() < *len {
                return Err(RecordError::TruncatedInput {
                    expected: len - bytes.len(),
                    kind: "raw term",
                });
            }
            Ok((Term::Raw(bytes[..*len].to_vec()), &bytes[*len..]))
        }
        TermKind::List(kinds) => {
            let mut items = Vec::with_capacity(kinds.len());
            let mut rest = bytes;
            for kind in kinds {
                let (term, tail) = decode_term(rest, kind)?;
                items.push(term);
                rest = tail;
            }
            Ok((Term::List(items), rest))
        }
    }
}

fn decode_length_prefixed(bytes: &[u8]) -> Result<(&[u8], &[u8])> {
    let (length, rest) = decode_i32(bytes)?;
    if length < 0 {
        return Err(RecordError::InvalidLength {
            length: length as i64,
        });
    }
    let length = length as usize;
    if rest.len() < length {
        return Err(RecordError::TruncatedInput {
            expected: length - rest.len(),
            kind: "length-prefixed term",
        });
    }
    Ok((&rest[..length], &rest[length..]))
}

fn take_one(bytes: &[u8]) -> Result<(u8, &[u8])> {
    if bytes.is_empty() {
        return Err(RecordError::TruncatedInput {
            expected: 1,
            kind: "boolean term",
        });
    }
    Ok((bytes[0], &bytes[1..]))
}

/// Assembles a sequence of terms into wire bytes without performing any I/O
/// itself, one encoded chunk per pushed term.
///
/// Mirrors, at term granularity, the incremental assembly style this crate's
/// lineage uses for streaming output: a caller writing to an actual socket
/// can iterate [`TermBuilder::chunks`] and write each chunk as it's ready,
/// instead of requiring one contiguous buffer up front.
#[derive(Debug, Clone, Default)]
pub struct TermBuilder {
    chunks: Vec<Vec<u8>>,
}

impl TermBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        TermBuilder { chunks: Vec::new() }
    }

    /// Encodes `term` and appends it as the next chunk.
    pub fn push(&mut self, term: &Term) -> &mut Self {
        self.chunks.push(encode_term(term));
        self
    }

    /// Iterates the encoded chunks in push order.
    pub fn chunks(&self) -> impl Iterator<Item = &[u8]> {
        self.chunks.iter().map(|chunk| chunk.as_slice())
    }

    /// Flattens all chunks into a single contiguous buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.chunks.concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(term: Term, kind: TermKind) {
        let bytes = encode_term(&term);
        let (decoded, rest) = decode_term(&bytes, &kind).unwrap();
        assert_eq!(decoded, term);
        assert!(rest.is_empty());
    }

    #[test]
    fn boolean_round_trip() {
        round_trip(Term::Boolean(true), TermKind::Boolean);
        round_trip(Term::Boolean(false), TermKind::Boolean);
    }

    #[test]
    fn absent_is_lone_negative_one_length() {
        let bytes = encode_term(&Term::Absent);
        assert_eq!(bytes, vec![0xFF, 0xFF, 0xFF, 0xFF]);
        round_trip(Term::Absent, TermKind::Absent);
    }

    #[test]
    fn fixed_width_tagged_ints_round_trip() {
        round_trip(Term::Short(-5), TermKind::Short);
        round_trip(Term::Int(70_000), TermKind::Int);
        round_trip(Term::Long(i64::MIN), TermKind::Long);
        round_trip(Term::PlainInt(-1), TermKind::PlainInt);
    }

    #[test]
    fn string_and_bytes_round_trip() {
        round_trip(Term::String("hi there".to_owned()), TermKind::String);
        round_trip(Term::Bytes(vec![9, 8, 7]), TermKind::Bytes);
    }

    #[test]
    fn raw_has_no_length_prefix() {
        let term = Term::Raw(vec![0xCA, 0xFE]);
        let bytes = encode_term(&term);
        assert_eq!(bytes, vec![0xCA, 0xFE]);
        round_trip(term, TermKind::Raw(2));
    }

    #[test]
    fn nested_list_concatenates_encoded_terms() {
        let term = Term::List(vec![Term::Boolean(true), Term::Int(7), Term::Absent]);
        let kind = TermKind::List(vec![TermKind::Boolean, TermKind::Int, TermKind::Absent]);
        round_trip(term, kind);
    }

    #[test]
    fn builder_assembles_chunks_in_push_order() {
        let mut builder = TermBuilder::new();
        builder.push(&Term::Boolean(true)).push(&Term::Int(42));
        let chunks: Vec<&[u8]> = builder.chunks().collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], &[0x01]);

        let flattened = builder.into_bytes();
        let mut expected = vec![0x01u8];
        expected.extend_from_slice(&42i32.to_be_bytes());
        assert_eq!(flattened, expected);
    }
}
