//! The read-only schema lookup consumed by document decoding (§4.6).
//!
//! The core never discovers a schema itself; it borrows one, for the
//! duration of a single decode call, from whatever the embedding client
//! maintains.

use std::collections::HashMap;

/// A read-only mapping from global property id to `(name, declared type tag)`.
///
/// Implementations only need to answer lookups; they are never mutated by
/// this crate and are borrowed only for as long as a single decode call
/// takes (§5). Missing ids are a decode error (`UnknownProperty`), never a
/// silent skip.
pub trait Schema {
    /// Looks up a global property id, returning its declared name and type
    /// tag if the schema knows it.
    fn lookup(&self, property_id: i64) -> Option<(&str, u8)>;
}

impl<T: Schema + ?Sized> Schema for &T {
    fn lookup(&self, property_id: i64) -> Option<(&str, u8)> {
        (**self).lookup(property_id)
    }
}

/// A simple, dependency-free [`Schema`] backed by a `HashMap`.
///
/// Embedding clients that already maintain a live, hot-swappable schema
/// cache will usually implement `Schema` directly against their own
/// structure instead of copying data into this one.
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    properties: HashMap<i64, (String, u8)>,
}

impl StaticSchema {
    /// Starts building a new static schema.
    pub fn builder() -> StaticSchemaBuilder {
        StaticSchemaBuilder::default()
    }
}

impl Schema for StaticSchema {
    fn lookup(&self, property_id: i64) -> Option<(&str, u8)> {
        self.properties
            .get(&property_id)
            .map(|(name, tag)| (name.as_str(), *tag))
    }
}

/// Builder for [`StaticSchema`].
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaBuilder {
    properties: HashMap<i64, (String, u8)>,
}

impl StaticSchemaBuilder {
    /// Registers a property id with its declared name and type tag.
    pub fn property(mut self, id: i64, name: impl Into<String>, type_tag: u8) -> Self {
        self.properties.insert(id, (name.into(), type_tag));
        self
    }

    /// Finishes building the schema.
    pub fn build(self) -> StaticSchema {
        StaticSchema {
            properties: self.properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::tag;

    #[test]
    fn builder_round_trip_lookup() {
        let schema = StaticSchema::builder()
            .property(0, "prop", tag::STRING)
            .property(5, "age", tag::INT)
            .build();

        assert_eq!(schema.lookup(0), Some(("prop", tag::STRING)));
        assert_eq!(schema.lookup(5), Some(("age", tag::INT)));
        assert_eq!(schema.lookup(1), None);
    }
}
