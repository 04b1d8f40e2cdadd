//! The typed value universe (§3) and its tagged wire encoding (§4.3).
//!
//! Values and embedded documents are mutually recursive: an embedded
//! document's fields hold values, and a value can itself be an embedded
//! document, list, set or map. Every recursive call threads a depth counter
//! and bails out with [`RecordError::RecursionLimitExceeded`] rather than
//! risking a stack overflow on adversarial input (§9).

use std::collections::{HashMap, HashSet};
use std::iter::FromIterator;

use crate::datetime::{Date, DateTime};
use crate::decimal::Decimal;
use crate::document::Document;
use crate::error::{RecordError, Result};
use crate::primitive::{
    decode_bool, decode_f32, decode_f64, decode_string, encode_bool, encode_f32, encode_f64,
    encode_string,
};
use crate::rid::Rid;
use crate::schema::Schema;
use crate::varint::{decode_zigzag_varint, encode_zigzag_varint};
use crate::MAX_NESTING_DEPTH;

/// The single-byte type tags used throughout the format: as a header field
/// type, as the key/value type in an embedded map entry, and as the
/// per-element type in an embedded list or set (§4.3).
pub mod tag {
    pub const BOOLEAN: u8 = 0;
    pub const INT: u8 = 1;
    pub const SHORT: u8 = 2;
    pub const LONG: u8 = 3;
    pub const FLOAT: u8 = 4;
    pub const DOUBLE: u8 = 5;
    pub const DATETIME: u8 = 6;
    pub const STRING: u8 = 7;
    pub const BINARY: u8 = 8;
    pub const EMBEDDED_DOCUMENT: u8 = 9;
    pub const EMBEDDED_LIST: u8 = 10;
    pub const EMBEDDED_SET: u8 = 11;
    pub const EMBEDDED_MAP: u8 = 12;
    pub const LINK: u8 = 13;
    pub const LINK_LIST: u8 = 14;
    pub const LINK_SET: u8 = 15;
    pub const LINK_MAP: u8 = 16;
    pub const LINK_BAG: u8 = 17;
    pub const DECIMAL: u8 = 19;
    /// Reserved in this crate for a tag-driven (not offset-driven) null
    /// marker; see the open-question resolution in the design notes.
    pub const NULL: u8 = 21;
    pub const DATE: u8 = 22;
    /// Heterogeneous-element marker used as the uniform element type of an
    /// embedded list/set, and as the header type tag this crate writes for a
    /// null-valued named document field (§4.4).
    pub const ANY: u8 = 23;
}

/// An unordered bag of values with bag (multiset) equality.
///
/// `Value` can't derive `Eq`/`Hash` (it contains `f32`/`f64`), so embedded
/// sets can't be backed by `HashSet<Value>`. This wrapper keeps insertion
/// order internally (encoding simply iterates it, per §4.3.1's "whatever
/// order the container yields") but compares for equality as a multiset,
/// which is what the round-trip invariant (§8) actually requires.
#[derive(Debug, Clone, Default)]
pub struct ValueSet(Vec<Value>);

impl ValueSet {
    /// An empty set.
    pub fn new() -> Self {
        ValueSet(Vec::new())
    }

    /// Wraps an existing vector without deduplicating it.
    pub fn from_vec(items: Vec<Value>) -> Self {
        ValueSet(items)
    }

    /// Appends a value.
    pub fn push(&mut self, value: Value) {
        self.0.push(value);
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no elements.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the elements in their current (unspecified) order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// Consumes the set, returning its elements as a vector.
    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }
}

impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        if self.0.len() != other.0.len() {
            return false;
        }
        let mut matched = vec![false; other.0.len()];
        'items: for item in &self.0 {
            for (i, candidate) in other.0.iter().enumerate() {
                if !matched[i] && item == candidate {
                    matched[i] = true;
                    continue 'items;
                }
            }
            return false;
        }
        true
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        ValueSet(iter.into_iter().collect())
    }
}

/// The closed, typed value universe (§3).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i32),
    Short(i16),
    Long(i64),
    /// An explicitly 4-byte float. Native floats default to [`Value::Double`]
    /// on encode; use this variant to force the narrower wire form (§9).
    Float(f32),
    Double(f64),
    DateTime(DateTime),
    Date(Date),
    String(String),
    Binary(Vec<u8>),
    /// An embedded document: no version byte, inlined directly (§4.4).
    Document(Document),
    EmbeddedList(Vec<Value>),
    EmbeddedSet(ValueSet),
    /// Map keys are always strings on the wire (§3 invariant 9); non-string
    /// keys are the caller's problem to stringify before constructing this.
    EmbeddedMap(HashMap<String, Value>),
    Link(Rid),
    LinkList(Vec<Rid>),
    LinkSet(HashSet<Rid>),
    LinkMap(HashMap<String, Rid>),
    /// Always the embedded form; the tree form is rejected at decode time
    /// with [`RecordError::TreeLinkBagUnsupported`] and never constructed.
    LinkBag(Vec<Rid>),
    Decimal(Decimal),
}

impl Value {
    /// The wire type tag this value would be encoded with.
    pub fn type_tag(&self) -> u8 {
        match self {
            Value::Null => tag::NULL,
            Value::Boolean(_) => tag::BOOLEAN,
            Value::Int(_) => tag::INT,
            Value::Short(_) => tag::SHORT,
            Value::Long(_) => tag::LONG,
            Value::Float(_) => tag::FLOAT,
            Value::Double(_) => tag::DOUBLE,
            Value::DateTime(_) => tag::DATETIME,
            Value::Date(_) => tag::DATE,
            Value::String(_) => tag::STRING,
            Value::Binary(_) => tag::BINARY,
            Value::Document(_) => tag::EMBEDDED_DOCUMENT,
            Value::EmbeddedList(_) => tag::EMBEDDED_LIST,
            Value::EmbeddedSet(_) => tag::EMBEDDED_SET,
            Value::EmbeddedMap(_) => tag::EMBEDDED_MAP,
            Value::Link(_) => tag::LINK,
            Value::LinkList(_) => tag::LINK_LIST,
            Value::LinkSet(_) => tag::LINK_SET,
            Value::LinkMap(_) => tag::LINK_MAP,
            Value::LinkBag(_) => tag::LINK_BAG,
            Value::Decimal(_) => tag::DECIMAL,
        }
    }
}

fn check_depth(depth: usize) -> Result<()> {
    if depth > MAX_NESTING_DEPTH {
        return Err(RecordError::RecursionLimitExceeded { depth });
    }
    Ok(())
}

/// Encodes a value body-and-tag pair outside of any document or collection
/// frame (rare; mostly used by tests and embedded contexts that already hold
/// a bare `Value`). The returned bytes are `<1-byte tag><body>`.
pub fn encode_value(value: &Value) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.push(value.type_tag());
    encode_body(value, 0, &mut out)?;
    Ok(out)
}

/// Encodes just a value's body (no leading tag byte) into `out`.
pub(crate) fn encode_body(value: &Value, depth: usize, out: &mut Vec<u8>) -> Result<()> {
    check_depth(depth)?;
    match value {
        Value::Null => {}
        Value::Boolean(b) => encode_bool(*b, out),
        Value::Int(v) => encode_zigzag_varint(*v as i64, out),
        Value::Short(v) => encode_zigzag_varint(*v as i64, out),
        Value::Long(v) => encode_zigzag_varint(*v, out),
        Value::Float(v) => encode_f32(*v, out),
        Value::Double(v) => encode_f64(*v, out),
        Value::DateTime(v) => v.encode(out),
        Value::Date(v) => v.encode(out),
        Value::String(s) => encode_string(s, out),
        Value::Binary(b) => crate::primitive::encode_length_prefixed_bytes(b, out),
        Value::Document(doc) => doc.encode_embedded_into(out, depth + 1)?,
        Value::EmbeddedList(items) => encode_list_body(items.iter(), items.len(), depth, out)?,
        Value::EmbeddedSet(set) => encode_list_body(set.iter(), set.len(), depth, out)?,
        Value::EmbeddedMap(map) => encode_map_body(map, depth, out)?,
        Value::Link(rid) => rid.encode_varint(out),
        Value::LinkList(rids) => {
            encode_zigzag_varint(rids.len() as i64, out);
            for rid in rids {
                rid.encode_varint(out);
            }
        }
        Value::LinkSet(rids) => {
            encode_zigzag_varint(rids.len() as i64, out);
            for rid in rids {
                rid.encode_varint(out);
            }
        }
        Value::LinkMap(map) => {
            encode_zigzag_varint(map.len() as i64, out);
            for (key, rid) in map {
                out.push(tag::STRING);
                encode_string(key, out);
                rid.encode_varint(out);
            }
        }
        Value::LinkBag(rids) => {
            out.push(0x01);
            crate::primitive::encode_u32(rids.len() as u32, out);
            for rid in rids {
                rid.encode_fixed(out);
            }
        }
        Value::Decimal(d) => d.encode(out),
    }
    Ok(())
}

fn encode_list_body<'a, I>(items: I, len: usize, depth: usize, out: &mut Vec<u8>) -> Result<()>
where
    I: Iterator<Item = &'a Value>,
{
    encode_zigzag_varint(len as i64, out);
    out.push(tag::ANY);
    for item in items {
        out.push(item.type_tag());
        encode_body(item, depth + 1, out)?;
    }
    Ok(())
}

fn encode_map_body(map: &HashMap<String, Value>, depth: usize, out: &mut Vec<u8>) -> Result<()> {
    // Offsets are relative to the start of *this* map's own encoding, which
    // may sit anywhere inside a larger `out` buffer (e.g. as a document
    // field's body), not relative to the start of `out` itself.
    let map_base = out.len();
    encode_zigzag_varint(map.len() as i64, out);

    // `None` marks a null entry (offset 0, tag conventionally 0, no body).
    struct Pending {
        placeholder: usize,
        body: Option<(u8, Vec<u8>)>,
    }
    let mut pending: Vec<Pending> = Vec::with_capacity(map.len());

    for (key, value) in map {
        out.push(tag::STRING);
        encode_string(key, out);
        let placeholder = out.len();
        out.extend_from_slice(&[0, 0, 0, 0]);
        match value {
            Value::Null => {
                out.push(0);
                pending.push(Pending {
                    placeholder,
                    body: None,
                });
            }
            other => {
                out.push(other.type_tag());
                let mut body = Vec::new();
                encode_body(other, depth + 1, &mut body)?;
                pending.push(Pending {
                    placeholder,
                    body: Some((other.type_tag(), body)),
                });
            }
        }
    }

    let mut cursor = out.len();
    for entry in &pending {
        let offset = match &entry.body {
            None => 0u32,
            Some(_) => (cursor - map_base) as u32,
        };
        out[entry.placeholder..entry.placeholder + 4].copy_from_slice(&offset.to_be_bytes());
        if let Some((_, body)) = &entry.body {
            cursor += body.len();
        }
    }
    for entry in &pending {
        if let Some((_, body)) = &entry.body {
            out.extend_from_slice(body);
        }
    }
    Ok(())
}

/// Decodes a single value of the given `type_tag` from the front of `bytes`,
/// returning the value and the unconsumed tail.
///
/// `schema` is forwarded to embedded-document decoding (tag 9) in case the
/// embedded document's header contains property references.
pub fn decode_type<'a>(
    bytes: &'a [u8],
    type_tag: u8,
    schema: Option<&dyn Schema>,
) -> Result<(Value, &'a [u8])> {
    decode_type_at_depth(bytes, type_tag, schema, 0)
}

pub(crate) fn decode_type_at_depth<'a>(
    bytes: &'a [u8],
    type_tag: u8,
    schema: Option<&dyn Schema>,
    depth: usize,
) -> Result<(Value, &'a [u8])> {
    check_depth(depth)?;
    match type_tag {
        tag::NULL => Ok((Value::Null, bytes)),
        tag::BOOLEAN => decode_bool(bytes).map(|(v, rest)| (Value::Boolean(v), rest)),
        tag::INT => decode_zigzag_varint(bytes).map(|(v, rest)| (Value::Int(v as i32), rest)),
        tag::SHORT => decode_zigzag_varint(bytes).map(|(v, rest)| (Value::Short(v as i16), rest)),
        tag::LONG => decode_zigzag_varint(bytes).map(|(v, rest)| (Value::Long(v), rest)),
        tag::FLOAT => decode_f32(bytes).map(|(v, rest)| (Value::Float(v), rest)),
        tag::DOUBLE => decode_f64(bytes).map(|(v, rest)| (Value::Double(v), rest)),
        tag::DATETIME => DateTime::decode(bytes).map(|(v, rest)| (Value::DateTime(v), rest)),
        tag::DATE => Date::decode(bytes).map(|(v, rest)| (Value::Date(v), rest)),
        tag::STRING => decode_string(bytes).map(|(v, rest)| (Value::String(v), rest)),
        tag::BINARY => crate::primitive::decode_length_prefixed_bytes(bytes)
            .map(|(v, rest)| (Value::Binary(v.to_vec()), rest)),
        tag::EMBEDDED_DOCUMENT => {
            let (doc, rest) = Document::decode_embedded_at_depth(bytes, schema, depth + 1)?;
            Ok((Value::Document(doc), rest))
        }
        tag::EMBEDDED_LIST => decode_list_body(bytes, schema, depth),
        tag::EMBEDDED_SET => {
            let (items, rest) = decode_list_items(bytes, schema, depth)?;
            Ok((Value::EmbeddedSet(ValueSet::from_vec(items)), rest))
        }
        tag::EMBEDDED_MAP => decode_map_body(bytes, schema, depth),
        tag::LINK => {
            let (rid, rest) = Rid::decode_varint(bytes)?;
            Ok((Value::Link(rid), rest))
        }
        tag::LINK_LIST => {
            let (rids, rest) = decode_rid_varint_seq(bytes)?;
            Ok((Value::LinkList(rids), rest))
        }
        tag::LINK_SET => {
            let (rids, rest) = decode_rid_varint_seq(bytes)?;
            Ok((Value::LinkSet(rids.into_iter().collect()), rest))
        }
        tag::LINK_MAP => decode_link_map_body(bytes),
        tag::LINK_BAG => decode_link_bag_body(bytes),
        tag::DECIMAL => Decimal::decode(bytes).map(|(v, rest)| (Value::Decimal(v), rest)),
        other => Err(RecordError::UnknownType { tag: other }),
    }
}

fn decode_list_body<'a>(
    bytes: &'a [u8],
    schema: Option<&dyn Schema>,
    depth: usize,
) -> Result<(Value, &'a [u8])> {
    let (items, rest) = decode_list_items(bytes, schema, depth)?;
    Ok((Value::EmbeddedList(items), rest))
}

fn decode_list_items<'a>(
    bytes: &'a [u8],
    schema: Option<&dyn Schema>,
    depth: usize,
) -> Result<(Vec<Value>, &'a [u8])> {
    let (count, rest) = decode_zigzag_varint(bytes)?;
    let count = non_negative(count)?;
    let (_uniform_type, mut rest) = take_one(rest, "embedded list/set element type")?;
    let mut items = Vec::with_capacity(count.min(1 << 20));
    for _ in 0..count {
        let (elem_tag, tail) = take_one(rest, "embedded list/set element tag")?;
        let (value, tail) = decode_type_at_depth(tail, elem_tag, schema, depth + 1)?;
        items.push(value);
        rest = tail;
    }
    Ok((items, rest))
}

fn decode_map_body<'a>(
    bytes: &'a [u8],
    schema: Option<&dyn Schema>,
    depth: usize,
) -> Result<(Value, &'a [u8])> {
    let total_len = bytes.len();
    let (count, after_count) = decode_zigzag_varint(bytes)?;
    let count = non_negative(count)?;

    struct PendingEntry {
        key: String,
        offset: u32,
        value_tag: u8,
    }
    let mut entries = Vec::with_capacity(count);
    let mut rest = after_count;
    for _ in 0..count {
        let (key_tag, tail) = take_one(rest, "embedded map key type")?;
        if key_tag != tag::STRING {
            return Err(RecordError::UnknownType { tag: key_tag });
        }
        let (key, tail) = decode_string(tail)?;
        let (offset, tail) = crate::primitive::decode_u32(tail)?;
        let (value_tag, tail) = take_one(tail, "embedded map value type")?;
        entries.push(PendingEntry {
            key,
            offset,
            value_tag,
        });
        rest = tail;
    }

    // Value bodies follow the header directly, in entry-emission order
    // (§4.3.2): decode them in that same order, tracking a cursor, rather
    // than treating each offset as an arbitrary random-access pointer.
    let header_end = total_len - rest.len();
    let mut cursor = header_end;
    let mut map = HashMap::with_capacity(entries.len());
    for entry in entries {
        if entry.offset == 0 {
            map.insert(entry.key, Value::Null);
            continue;
        }
        let offset = entry.offset as usize;
        if offset != cursor || offset > total_len {
            return Err(RecordError::OffsetOutOfRange {
                offset: entry.offset,
                record_len: total_len,
            });
        }
        let value_bytes = &bytes[offset..];
        let (value, tail) = decode_type_at_depth(value_bytes, entry.value_tag, schema, depth + 1)?;
        cursor = offset + (value_bytes.len() - tail.len());
        map.insert(entry.key, value);
    }

    Ok((Value::EmbeddedMap(map), &bytes[cursor..]))
}

fn decode_rid_varint_seq(bytes: &[u8]) -> Result<(Vec<Rid>, &[u8])> {
    let (count, rest) = decode_zigzag_varint(bytes)?;
    let count = non_negative(count)?;
    let mut rids = Vec::with_capacity(count.min(1 << 20));
    let mut rest = rest;
    for _ in 0..count {
        let (rid, tail) = Rid::decode_varint(rest)?;
        rids.push(rid);
        rest = tail;
    }
    Ok((rids, rest))
}

fn decode_link_map_body(bytes: &[u8]) -> Result<(Value, &[u8])> {
    let (count, rest) = decode_zigzag_varint(bytes)?;
    let count = non_negative(count)?;
    let mut map = HashMap::with_capacity(count.min(1 << 20));
    let mut rest = rest;
    for _ in 0..count {
        let (key_tag, tail) = take_one(rest, "link-map key type")?;
        if key_tag != tag::STRING {
            return Err(RecordError::UnknownType { tag: key_tag });
        }
        let (key, tail) = decode_string(tail)?;
        let (rid, tail) = Rid::decode_varint(tail)?;
        map.insert(key, rid);
        rest = tail;
    }
    Ok((Value::LinkMap(map), rest))
}

fn decode_link_bag_body(bytes: &[u8]) -> Result<(Value, &[u8])> {
    let (discriminator, rest) = take_one(bytes, "link-bag discriminator")?;
    if discriminator != 0x01 {
        return Err(RecordError::TreeLinkBagUnsupported);
    }
    let (size, rest) = crate::primitive::decode_u32(rest)?;
    let mut rids = Vec::with_capacity((size as usize).min(1 << 20));
    let mut rest = rest;
    for _ in 0..size {
        let (rid, tail) = Rid::decode_fixed(rest)?;
        rids.push(rid);
        rest = tail;
    }
    Ok((Value::LinkBag(rids), rest))
}

fn non_negative(n: i64) -> Result<usize> {
    if n < 0 {
        return Err(RecordError::InvalidLength { length: n });
    }
    Ok(n as usize)
}

fn take_one<'a>(bytes: &'a [u8], kind: &'static str) -> Result<(u8, &'a [u8])> {
    if bytes.is_empty() {
        return Err(RecordError::TruncatedInput { expected: 1, kind });
    }
    Ok((bytes[0], &bytes[1..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn round_trip(value: &Value) {
        let bytes = encode_value(value).unwrap();
        let (decoded, rest) = decode_type(&bytes[1..], bytes[0], None).unwrap();
        assert_eq!(&decoded, value);
        assert!(rest.is_empty());
    }

    #[test]
    fn scalar_round_trips() {
        round_trip(&Value::Null);
        round_trip(&Value::Boolean(true));
        round_trip(&Value::Int(-12));
        round_trip(&Value::Short(300));
        round_trip(&Value::Long(i64::MIN));
        round_trip(&Value::Float(1.5));
        round_trip(&Value::Double(-2.25));
        round_trip(&Value::String("hello".to_owned()));
        round_trip(&Value::Binary(vec![1, 2, 3]));
        round_trip(&Value::Decimal(Decimal::new(
            num_bigint::BigInt::from(1224),
            2,
        )));
        round_trip(&Value::DateTime(DateTime::from_epoch_millis(1_700_000_000_123)));
        round_trip(&Value::Date(Date::from_epoch_days(19_675)));
    }

    #[test]
    fn link_round_trips() {
        round_trip(&Value::Link(Rid::new(9, 14)));
        round_trip(&Value::LinkList(vec![Rid::new(1, 1), Rid::new(2, 2)]));
        round_trip(&Value::LinkSet(
            [Rid::new(1, 1), Rid::new(2, 2)].iter().copied().collect(),
        ));
        let mut map = HashMap::new();
        map.insert("a".to_owned(), Rid::new(1, 1));
        map.insert("b".to_owned(), Rid::new(2, 2));
        round_trip(&Value::LinkMap(map));
    }

    #[test]
    fn embedded_collections_round_trip() {
        round_trip(&Value::EmbeddedList(vec![
            Value::String("elem".to_owned()),
            Value::Boolean(true),
        ]));
        round_trip(&Value::EmbeddedSet(ValueSet::from_vec(vec![
            Value::Int(1),
            Value::Int(2),
            Value::Int(2),
        ])));

        let mut map = HashMap::new();
        map.insert("x".to_owned(), Value::Int(1));
        map.insert("y".to_owned(), Value::Null);
        map.insert("z".to_owned(), Value::String("nested".to_owned()));
        round_trip(&Value::EmbeddedMap(map));
    }

    #[test]
    fn embedded_map_nested_inside_list_keeps_correct_offsets() {
        // Regression test: map offsets must be relative to the map's own
        // start, not to the start of whatever buffer it's embedded in.
        let mut inner = HashMap::new();
        inner.insert("k".to_owned(), Value::Long(42));
        let outer = Value::EmbeddedList(vec![
            Value::Boolean(true),
            Value::EmbeddedMap(inner),
        ]);
        round_trip(&outer);
    }

    #[test]
    fn embedded_list_fixture_matches_literal_bytes() {
        let value = Value::EmbeddedList(vec![
            Value::String("elem".to_owned()),
            Value::Boolean(true),
        ]);
        let mut body = Vec::new();
        encode_body(&value, 0, &mut body).unwrap();
        assert_eq!(
            body,
            vec![0x04, 0x17, 0x07, 0x08, 0x65, 0x6C, 0x65, 0x6D, 0x00, 0x01]
        );
    }

    #[test]
    fn link_bag_fixture_matches_literal_bytes() {
        let value = Value::LinkBag(vec![Rid::new(1, 22), Rid::new(9, 14)]);
        let mut body = Vec::new();
        encode_body(&value, 0, &mut body).unwrap();
        assert_eq!(
            body,
            vec![
                0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
                0x00, 0x16, 0x00, 0x09, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0E,
            ]
        );
        round_trip(&value);
    }

    #[test]
    fn link_bag_tree_form_rejected() {
        let mut body = vec![0x02u8]; // discriminator other than 0x01
        body.extend_from_slice(&[0, 0, 0, 0]);
        let err = decode_type(&body, tag::LINK_BAG, None).unwrap_err();
        assert_eq!(err, RecordError::TreeLinkBagUnsupported);
    }

    #[test]
    fn unknown_type_tag_rejected() {
        let err = decode_type(&[], 18, None).unwrap_err();
        assert_eq!(err, RecordError::UnknownType { tag: 18 });
    }

    #[test]
    fn value_set_equality_is_multiset_not_order_sensitive() {
        let a = ValueSet::from_vec(vec![Value::Int(1), Value::Int(2)]);
        let b = ValueSet::from_vec(vec![Value::Int(2), Value::Int(1)]);
        assert_eq!(a, b);

        let c = ValueSet::from_vec(vec![Value::Int(1), Value::Int(1)]);
        assert_ne!(a, c);
    }

    #[test]
    fn recursion_limit_exceeded_on_pathological_nesting() {
        let mut value = Value::Int(0);
        for _ in 0..(MAX_NESTING_DEPTH + 10) {
            value = Value::EmbeddedList(vec![value]);
        }
        let bytes = encode_value(&value);
        assert!(matches!(
            bytes,
            Err(RecordError::RecursionLimitExceeded { .. })
        ));
    }

    fn random_value(rng: &mut StdRng, depth: usize) -> Value {
        let max_kind = if depth >= 4 { 8 } else { 12 };
        match rng.gen_range(0..max_kind) {
            0 => Value::Null,
            1 => Value::Boolean(rng.gen()),
            2 => Value::Int(rng.gen()),
            3 => Value::Long(rng.gen()),
            4 => Value::Double(rng.gen()),
            5 => Value::String(format!("s{}", rng.gen::<u32>())),
            6 => Value::Binary((0..rng.gen_range(0..8)).map(|_| rng.gen()).collect()),
            7 => Value::Link(Rid::new(rng.gen(), rng.gen::<u32>() as u64)),
            8 => Value::EmbeddedList(
                (0..rng.gen_range(0..4))
                    .map(|_| random_value(rng, depth + 1))
                    .collect(),
            ),
            9 => {
                let mut map = HashMap::new();
                for i in 0..rng.gen_range(0..4) {
                    map.insert(format!("k{}", i), random_value(rng, depth + 1));
                }
                Value::EmbeddedMap(map)
            }
            10 => Value::EmbeddedSet(ValueSet::from_vec(
                (0..rng.gen_range(0..4))
                    .map(|_| random_value(rng, depth + 1))
                    .collect(),
            )),
            _ => Value::Document(Document::new(None, {
                let mut fields = HashMap::new();
                for i in 0..rng.gen_range(0..4) {
                    fields.insert(format!("f{}", i), random_value(rng, depth + 1));
                }
                fields
            })),
        }
    }

    #[test]
    fn randomized_round_trip() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        for _ in 0..200 {
            let value = random_value(&mut rng, 0);
            let bytes = encode_value(&value).unwrap();
            let (decoded, rest) = decode_type(&bytes[1..], bytes[0], None).unwrap();
            assert!(rest.is_empty());
            // `Value`'s derived equality already delegates to `ValueSet`'s
            // multiset equality for the `EmbeddedSet` variant, at any depth.
            assert_eq!(value, decoded);
        }
    }
}
