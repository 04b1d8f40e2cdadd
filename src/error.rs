//! Typed errors for the record serialization core.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RecordError>;

/// Everything that can go wrong encoding or decoding a record, a value, or an
/// envelope term.
///
/// Every variant carries enough structured context for a caller to report a
/// useful message without re-deriving it from the raw bytes.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RecordError {
    /// The leading version byte of a top-level record was not `0`.
    #[error("unsupported record version: got {got}, only version 0 is supported")]
    UnsupportedRecordVersion {
        /// The byte actually found on the wire.
        got: u8,
    },

    /// A varint was truncated or exceeded the 10-byte bound for a 64-bit value.
    #[error("malformed varint")]
    MalformedVarInt,

    /// A value-type tag outside the defined set (§4.3) was encountered.
    #[error("unknown type tag: {tag}")]
    UnknownType {
        /// The offending tag byte.
        tag: u8,
    },

    /// A header entry referenced a global property id the schema doesn't know.
    #[error("unknown property id: {id}")]
    UnknownProperty {
        /// The property id that failed lookup.
        id: i64,
    },

    /// A decode call needed a schema (to resolve a property reference) but
    /// none was supplied.
    #[error("property reference in header but no schema was supplied")]
    MissingSchema,

    /// A link bag's discriminator byte was not `0x01`.
    #[error("tree-form link bags are not supported")]
    TreeLinkBagUnsupported,

    /// Not enough bytes remained to satisfy a fixed-width or length-prefixed read.
    #[error("truncated input: expected {expected} more byte(s) while reading {kind}")]
    TruncatedInput {
        /// How many more bytes were required.
        expected: usize,
        /// What was being read when the input ran out.
        kind: &'static str,
    },

    /// A string body was not valid UTF-8.
    #[error("invalid utf-8 in string body")]
    InvalidUtf8,

    /// A boolean body byte was outside `{0, 1}`.
    #[error("invalid boolean byte: {byte:#04x}")]
    InvalidBoolean {
        /// The offending byte.
        byte: u8,
    },

    /// A header offset pointed outside the bounds of the record.
    #[error("offset {offset} out of range for record of length {record_len}")]
    OffsetOutOfRange {
        /// The offset read from the header.
        offset: u32,
        /// The total length of the record being decoded.
        record_len: usize,
    },

    /// Mutual value/document recursion exceeded the crate's depth budget.
    #[error("recursion limit exceeded at depth {depth}")]
    RecursionLimitExceeded {
        /// The depth at which the limit was hit.
        depth: usize,
    },

    /// A class-prefix or header-entry name length was outside what its
    /// encoding allows (class prefix: less than -1; header entry: handled
    /// structurally, since 0 is the terminator and negative is a property
    /// reference).
    #[error("invalid field name length: {length}")]
    InvalidFieldNameLength {
        /// The offending ZigZag-decoded length.
        length: i64,
    },

    /// A string or binary length was negative (beyond the class-name special case).
    #[error("invalid length: {length}")]
    InvalidLength {
        /// The offending ZigZag-decoded length.
        length: i64,
    },
}
