//! The document codec: class prefix, header, and two-pass offset fixup
//! (§4.4).
//!
//! A top-level record is `<version=0> <class-prefix> <header> <data>`; an
//! embedded document is the same minus the version byte. Header entries name
//! a field either literally or by schema-resolved property id, and carry a
//! 4-byte absolute offset to the field's data (zero for null).

use std::collections::HashMap;

use log::{debug, trace};

use crate::error::{RecordError, Result};
use crate::primitive::decode_u32;
use crate::schema::Schema;
use crate::value::{decode_type_at_depth, encode_body, tag, Value};
use crate::varint::{decode_zigzag_varint, encode_zigzag_varint};

const RECORD_VERSION: u8 = 0;

/// A record: an optional class name and a field map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    class: Option<String>,
    fields: HashMap<String, Value>,
}

impl Document {
    /// Builds a document with the given class name (or `None`) and fields.
    pub fn new(class: Option<String>, fields: HashMap<String, Value>) -> Self {
        Document { class, fields }
    }

    /// The document's class name, if any.
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// The document's fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Inserts or replaces a field.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    fn encode_class_prefix(&self, out: &mut Vec<u8>) {
        match &self.class {
            None => encode_zigzag_varint(-1, out),
            Some(name) => {
                encode_zigzag_varint(name.len() as i64, out);
                out.extend_from_slice(name.as_bytes());
            }
        }
    }

    fn decode_class_prefix(bytes: &[u8]) -> Result<(Option<String>, &[u8])> {
        let (length, rest) = decode_zigzag_varint(bytes)?;
        if length < -1 {
            return Err(RecordError::InvalidFieldNameLength { length });
        }
        if length == -1 {
            return Ok((None, rest));
        }
        let length = length as usize;
        if rest.len() < length {
            return Err(RecordError::TruncatedInput {
                expected: length - rest.len(),
                kind: "class name",
            });
        }
        let (name_bytes, rest) = (&rest[..length], &rest[length..]);
        let name = std::str::from_utf8(name_bytes)
            .map_err(|_| RecordError::InvalidUtf8)?
            .to_owned();
        Ok((Some(name), rest))
    }

    /// Encodes this document's body (class prefix, header, data) without a
    /// version byte, into `out`, at nesting depth `depth`.
    pub(crate) fn encode_embedded_into(&self, out: &mut Vec<u8>, depth: usize) -> Result<()> {
        let base = out.len();
        self.encode_class_prefix(out);

        struct Pending<'a> {
            placeholder: usize,
            value: &'a Value,
        }
        let mut pending: Vec<Pending> = Vec::with_capacity(self.fields.len());

        for (name, value) in &self.fields {
            encode_zigzag_varint(name.len() as i64, out);
            out.extend_from_slice(name.as_bytes());
            let placeholder = out.len();
            out.extend_from_slice(&[0, 0, 0, 0]);
            out.push(if matches!(value, Value::Null) {
                tag::ANY
            } else {
                value.type_tag()
            });
            pending.push(Pending { placeholder, value });
        }
        out.push(0); // header terminator

        let mut cursor = out.len();
        let mut bodies: Vec<Vec<u8>> = Vec::with_capacity(pending.len());
        for entry in &pending {
            if matches!(entry.value, Value::Null) {
                out[entry.placeholder..entry.placeholder + 4].copy_from_slice(&0u32.to_be_bytes());
                bodies.push(Vec::new());
                continue;
            }
            let offset = (cursor - base) as u32;
            out[entry.placeholder..entry.placeholder + 4].copy_from_slice(&offset.to_be_bytes());
            let mut body = Vec::new();
            encode_body(entry.value, depth + 1, &mut body)?;
            cursor += body.len();
            bodies.push(body);
        }
        for body in bodies {
            out.extend_from_slice(&body);
        }
        Ok(())
    }

    pub(crate) fn decode_embedded_at_depth<'a>(
        bytes: &'a [u8],
        schema: Option<&dyn Schema>,
        depth: usize,
    ) -> Result<(Document, &'a [u8])> {
        trace!("decoding embedded document at depth {}", depth);
        let total_len = bytes.len();
        let (class, mut rest) = Document::decode_class_prefix(bytes)?;

        struct PendingEntry {
            name: String,
            offset: u32,
            type_tag: u8,
        }
        let mut entries = Vec::new();
        loop {
            let (length, tail) = decode_zigzag_varint(rest)?;
            if length == 0 {
                rest = tail;
                break;
            }
            if length > 0 {
                let length = length as usize;
                if tail.len() < length {
                    return Err(RecordError::TruncatedInput {
                        expected: length - tail.len(),
                        kind: "field name",
                    });
                }
                let (name_bytes, tail) = (&tail[..length], &tail[length..]);
                let name = std::str::from_utf8(name_bytes)
                    .map_err(|_| RecordError::InvalidUtf8)?
                    .to_owned();
                let (offset, tail) = decode_u32(tail)?;
                let (type_tag, tail) = take_one(tail)?;
                entries.push(PendingEntry {
                    name,
                    offset,
                    type_tag,
                });
                rest = tail;
            } else {
                let property_id = -length - 1;
                let (name, declared_type) = schema
                    .ok_or(RecordError::MissingSchema)?
                    .lookup(property_id)
                    .ok_or(RecordError::UnknownProperty { id: property_id })?;
                let (offset, tail) = decode_u32(tail)?;
                entries.push(PendingEntry {
                    name: name.to_owned(),
                    offset,
                    type_tag: declared_type,
                });
                rest = tail;
            }
        }

        let header_end = total_len - rest.len();
        let mut cursor = header_end;
        let mut fields = HashMap::with_capacity(entries.len());
        for entry in entries {
            if entry.offset == 0 {
                fields.insert(entry.name, Value::Null);
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
            let (value, tail) =
                decode_type_at_depth(value_bytes, entry.type_tag, schema, depth + 1)?;
            cursor = offset + (value_bytes.len() - tail.len());
            fields.insert(entry.name, value);
        }

        debug!(
            "decoded document: class={:?}, {} field(s)",
            class.is_some(),
            fields.len()
        );
        Ok((Document { class, fields }, &bytes[cursor..]))
    }
}

fn take_one(bytes: &[u8]) -> Result<(u8, &[u8])> {
    if bytes.is_empty() {
        return Err(RecordError::TruncatedInput {
            expected: 1,
            kind: "header type tag",
        });
    }
    Ok((bytes[0], &bytes[1..]))
}

/// Encodes a top-level record: version byte followed by the document body.
pub fn encode_document(doc: &Document) -> Result<Vec<u8>> {
    trace!("encoding top-level document, class={:?}", doc.class());
    let mut out = vec![RECORD_VERSION];
    doc.encode_embedded_into(&mut out, 0)?;
    Ok(out)
}

/// Decodes a top-level record: version byte, then the document body.
///
/// `schema` resolves property-reference header entries; omit it only when
/// the caller knows the record has none (a `MissingSchema` error otherwise).
pub fn decode_document(bytes: &[u8], schema: Option<&dyn Schema>) -> Result<Document> {
    trace!("decoding top-level document ({} byte(s))", bytes.len());
    let version = *bytes.first().ok_or(RecordError::TruncatedInput {
        expected: 1,
        kind: "record version",
    })?;
    if version != RECORD_VERSION {
        return Err(RecordError::UnsupportedRecordVersion { got: version });
    }
    let (doc, _tail) = Document::decode_embedded_at_depth(&bytes[1..], schema, 0)?;
    Ok(doc)
}
