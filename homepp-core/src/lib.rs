pub mod envelope;
pub mod protocol;

use std::collections::BTreeMap;

use serde::Serialize;

pub use envelope::{CaptureTime, Envelope};
pub use protocol::{
    DecodeError, Discriminator, FieldSpec, NumberMatch, Radix, VARIANTS, Variant,
    decode_frame, decode_frame_or_empty, tokenize,
};

/// Field key carrying the sensor category.
pub const TYPE_FIELD: &str = "type";
/// Field key carrying the sensor sub-variant.
pub const NUMBER_FIELD: &str = "number";

/// A decoded sensor reading: field name to integer value.
///
/// A successful decode always holds `type` and `number`. Other keys depend
/// on the matched variant; keys a variant does not carry are absent rather
/// than zero. An empty reading means "no data for this line".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Reading {
    fields: BTreeMap<&'static str, i64>,
}

impl Reading {
    /// Reading holding only the discriminator fields.
    pub fn with_discriminator(discriminator: Discriminator) -> Self {
        let mut reading = Self::default();
        reading.insert(TYPE_FIELD, discriminator.sensor_type);
        reading.insert(NUMBER_FIELD, discriminator.number);
        reading
    }

    pub fn insert(&mut self, name: &'static str, value: i64) {
        self.fields.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.fields.get(name).copied()
    }

    pub fn sensor_type(&self) -> Option<i64> {
        self.get(TYPE_FIELD)
    }

    pub fn number(&self) -> Option<i64> {
        self.get(NUMBER_FIELD)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in sorted order, discriminator included.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, i64)> + '_ {
        self.fields.iter().map(|(name, value)| (*name, *value))
    }
}
