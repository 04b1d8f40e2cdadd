//! Record serialization core for a multi-model graph/document database
//! client: translates between a language-native value universe and the
//! database's binary on-wire record format.
//!
//! The crate is pure and synchronous (no I/O, no global state). Callers
//! construct [`Document`]s and [`Value`]s, encode them to bytes with
//! [`encode_document`]/[`encode_value`], and decode bytes back with
//! [`decode_document`]/[`decode_type`]. A [`Schema`] resolves property-id
//! header references during decode; it is borrowed for the call and never
//! retained.

pub mod datetime;
pub mod decimal;
pub mod document;
pub mod error;
pub mod primitive;
pub mod rid;
pub mod schema;
pub mod term;
pub mod value;
pub mod varint;

pub use datetime::{Date, DateTime};
pub use decimal::Decimal;
pub use document::{decode_document, encode_document, Document};
pub use error::{RecordError, Result};
pub use rid::Rid;
pub use schema::{Schema, StaticSchema};
pub use term::{decode_term, encode_term, Term, TermBuilder, TermKind};
pub use value::{decode_type, encode_value, Value, ValueSet};

/// The maximum depth of mutual value/document recursion this crate will
/// follow before raising [`RecordError::RecursionLimitExceeded`] (§9).
///
/// Chosen well above any realistic document shape while still far short of
/// where a release-mode stack would actually overflow.
pub const MAX_NESTING_DEPTH: usize = 64;
