//! Message schema types.
//!
//! This module defines the nested message vocabulary: groups, primitive
//! fields, and the required/optional/repeated repetition of each field.

/// How often a field may occur within its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repetition {
    /// Exactly one occurrence.
    Required,
    /// Zero or one occurrence.
    Optional,
    /// Zero or more occurrences.
    Repeated,
}

impl Repetition {
    /// Whether this repetition allows multiple occurrences.
    pub fn is_repeated(self) -> bool {
        matches!(self, Repetition::Repeated)
    }

    /// Whether this repetition demands exactly one occurrence.
    pub fn is_required(self) -> bool {
        matches!(self, Repetition::Required)
    }
}

/// The closed set of primitive column kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// Boolean value.
    Boolean,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit IEEE 754 floating-point.
    Float32,
    /// 64-bit IEEE 754 floating-point.
    Float64,
    /// Sequence of bytes.
    Bytes,
    /// UTF-8 string.
    String,
}

/// The shape of a field: a primitive column or a nested group.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// A primitive leaf column.
    Primitive(PrimitiveKind),
    /// A nested group of fields.
    Group(GroupSchema),
}

/// Schema for a group of fields (the message root or any nested group).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupSchema {
    /// The fields of the group, in declaration order.
    pub fields: Vec<FieldSchema>,
}

impl GroupSchema {
    /// Create a new GroupSchema with the given fields.
    pub fn new(fields: Vec<FieldSchema>) -> Self {
        Self { fields }
    }
}

/// Schema for a single field within a group.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// The name of the field.
    pub name: String,
    /// How often the field may occur.
    pub repetition: Repetition,
    /// The shape of the field's values.
    pub field_type: FieldType,
}

impl FieldSchema {
    /// Create a primitive field.
    pub fn primitive(name: impl Into<String>, repetition: Repetition, kind: PrimitiveKind) -> Self {
        Self {
            name: name.into(),
            repetition,
            field_type: FieldType::Primitive(kind),
        }
    }

    /// Create a required primitive field.
    pub fn required(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self::primitive(name, Repetition::Required, kind)
    }

    /// Create an optional primitive field.
    pub fn optional(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self::primitive(name, Repetition::Optional, kind)
    }

    /// Create a repeated primitive field.
    pub fn repeated(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self::primitive(name, Repetition::Repeated, kind)
    }

    /// Create a group field with the given repetition and child fields.
    pub fn group(
        name: impl Into<String>,
        repetition: Repetition,
        fields: Vec<FieldSchema>,
    ) -> Self {
        Self {
            name: name.into(),
            repetition,
            field_type: FieldType::Group(GroupSchema::new(fields)),
        }
    }

    /// Whether this field is a primitive leaf.
    pub fn is_primitive(&self) -> bool {
        matches!(self.field_type, FieldType::Primitive(_))
    }

    /// The primitive kind, if this field is a leaf.
    pub fn kind(&self) -> Option<PrimitiveKind> {
        match self.field_type {
            FieldType::Primitive(kind) => Some(kind),
            FieldType::Group(_) => None,
        }
    }

    /// The child fields, if this field is a group.
    pub fn group_fields(&self) -> Option<&[FieldSchema]> {
        match &self.field_type {
            FieldType::Primitive(_) => None,
            FieldType::Group(group) => Some(&group.fields),
        }
    }
}

/// A complete message schema: a named root group.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageSchema {
    /// The name of the message.
    pub name: String,
    /// The top-level fields.
    pub fields: Vec<FieldSchema>,
}

impl MessageSchema {
    /// Create a new MessageSchema with the given name and fields.
    pub fn new(name: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}
