//! In-memory representation of reassembled records.
//!
//! A record is a [`Group`]: an ordered list of fields, each carrying one or
//! more values. Absent optional fields and empty repeated fields simply do
//! not appear: the event stream never mentions them, so neither does the
//! materialized form.

use crate::schema::PrimitiveKind;

/// A primitive column value.
///
/// The set of variants is closed over the schema vocabulary; consumers
/// dispatch on it instead of downcasting.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValue {
    /// Boolean value.
    Boolean(bool),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// 32-bit float.
    Float32(f32),
    /// 64-bit float.
    Float64(f64),
    /// Byte sequence.
    Bytes(Vec<u8>),
    /// UTF-8 string.
    Str(String),
}

impl PrimitiveValue {
    /// The schema kind of this value.
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            PrimitiveValue::Boolean(_) => PrimitiveKind::Boolean,
            PrimitiveValue::Int32(_) => PrimitiveKind::Int32,
            PrimitiveValue::Int64(_) => PrimitiveKind::Int64,
            PrimitiveValue::Float32(_) => PrimitiveKind::Float32,
            PrimitiveValue::Float64(_) => PrimitiveKind::Float64,
            PrimitiveValue::Bytes(_) => PrimitiveKind::Bytes,
            PrimitiveValue::Str(_) => PrimitiveKind::String,
        }
    }
}

impl From<bool> for PrimitiveValue {
    fn from(v: bool) -> Self {
        PrimitiveValue::Boolean(v)
    }
}

impl From<i32> for PrimitiveValue {
    fn from(v: i32) -> Self {
        PrimitiveValue::Int32(v)
    }
}

impl From<i64> for PrimitiveValue {
    fn from(v: i64) -> Self {
        PrimitiveValue::Int64(v)
    }
}

impl From<f32> for PrimitiveValue {
    fn from(v: f32) -> Self {
        PrimitiveValue::Float32(v)
    }
}

impl From<f64> for PrimitiveValue {
    fn from(v: f64) -> Self {
        PrimitiveValue::Float64(v)
    }
}

impl From<&str> for PrimitiveValue {
    fn from(v: &str) -> Self {
        PrimitiveValue::Str(v.to_string())
    }
}

impl From<String> for PrimitiveValue {
    fn from(v: String) -> Self {
        PrimitiveValue::Str(v)
    }
}

impl From<Vec<u8>> for PrimitiveValue {
    fn from(v: Vec<u8>) -> Self {
        PrimitiveValue::Bytes(v)
    }
}

/// One value of a field: a primitive or a nested group.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A primitive leaf value.
    Primitive(PrimitiveValue),
    /// A nested group.
    Group(Group),
}

/// All occurrences of one field within a group, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// The field name.
    pub name: String,
    /// The field's position among its siblings in the schema.
    pub index: usize,
    /// The occurrences; repeated fields may carry several.
    pub values: Vec<Value>,
}

/// A reassembled group: the message root or any nested group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    /// Fields in emission order; absent fields do not appear.
    pub fields: Vec<Field>,
}

impl Group {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Append one primitive occurrence to the named field, creating the
    /// field if this is its first occurrence.
    pub fn with_value(
        self,
        name: impl Into<String>,
        index: usize,
        value: impl Into<PrimitiveValue>,
    ) -> Self {
        self.push(name.into(), index, Value::Primitive(value.into()))
    }

    /// Append one group occurrence to the named field, creating the field
    /// if this is its first occurrence.
    pub fn with_group(self, name: impl Into<String>, index: usize, group: Group) -> Self {
        self.push(name.into(), index, Value::Group(group))
    }

    fn push(mut self, name: String, index: usize, value: Value) -> Self {
        if let Some(field) = self.fields.iter_mut().find(|f| f.index == index) {
            field.values.push(value);
        } else {
            self.fields.push(Field {
                name,
                index,
                values: vec![value],
            });
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_kinds() {
        assert_eq!(PrimitiveValue::from(true).kind(), PrimitiveKind::Boolean);
        assert_eq!(PrimitiveValue::from(1i32).kind(), PrimitiveKind::Int32);
        assert_eq!(PrimitiveValue::from(1i64).kind(), PrimitiveKind::Int64);
        assert_eq!(PrimitiveValue::from(1.0f32).kind(), PrimitiveKind::Float32);
        assert_eq!(PrimitiveValue::from(1.0f64).kind(), PrimitiveKind::Float64);
        assert_eq!(PrimitiveValue::from("x").kind(), PrimitiveKind::String);
        assert_eq!(
            PrimitiveValue::from(vec![0u8, 1]).kind(),
            PrimitiveKind::Bytes
        );
    }

    #[test]
    fn test_group_builder_merges_occurrences() {
        let group = Group::new()
            .with_value("xs", 0, 1i32)
            .with_value("xs", 0, 2i32)
            .with_value("name", 1, "n");

        assert_eq!(group.fields.len(), 2);
        let xs = group.field("xs").unwrap();
        assert_eq!(xs.values.len(), 2);
        assert_eq!(group.field("name").unwrap().values.len(), 1);
        assert!(group.field("missing").is_none());
    }
}
