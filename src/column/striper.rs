//! Shreds record values into striped columns.
//!
//! The write-side inverse of record assembly: each leaf value is written
//! with the definition level of its deepest present ancestor and the
//! repetition level at which its enclosing repetition started. An absent
//! subtree contributes one null position per leaf beneath it, at the
//! definition level established so far.

use crate::error::ViolationError;
use crate::record::{Group, Value};
use crate::schema::{ColumnIoTree, FieldSchema, FieldType, MessageSchema};

use super::store::MemColumnStore;

/// Stripes [`Group`] records into a [`MemColumnStore`].
#[derive(Debug)]
pub struct RecordStriper<'a> {
    schema: &'a MessageSchema,
    tree: &'a ColumnIoTree,
}

impl<'a> RecordStriper<'a> {
    /// Create a striper for the given schema and its column I/O tree.
    pub fn new(schema: &'a MessageSchema, tree: &'a ColumnIoTree) -> Self {
        Self { schema, tree }
    }

    /// Stripe the records into fresh columns, one per leaf in document
    /// order.
    pub fn stripe(&self, records: &[Group]) -> Result<MemColumnStore, ViolationError> {
        let mut store = MemColumnStore::for_tree(self.tree);
        for record in records {
            let mut leaf = 0;
            self.stripe_group(
                &self.schema.name,
                &self.schema.fields,
                record,
                0,
                0,
                0,
                &mut leaf,
                &mut store,
            )?;
        }
        Ok(store)
    }

    /// Stripe one group occurrence: every schema field in order, present
    /// or not. `rep` is the repetition level this occurrence starts at,
    /// `def` the definition level established by present ancestors, and
    /// `level_rep` the number of repeated ancestors entered so far.
    #[allow(clippy::too_many_arguments)]
    fn stripe_group(
        &self,
        group_name: &str,
        fields: &[FieldSchema],
        group: &Group,
        rep: i16,
        def: i16,
        level_rep: i16,
        leaf: &mut usize,
        store: &mut MemColumnStore,
    ) -> Result<(), ViolationError> {
        for field in &group.fields {
            let known = fields
                .get(field.index)
                .is_some_and(|f| f.name == field.name);
            if !known {
                return Err(ViolationError::UnknownField {
                    group: group_name.to_string(),
                    name: field.name.clone(),
                    index: field.index,
                });
            }
        }

        for (position, field) in fields.iter().enumerate() {
            let occurrence = group.fields.iter().find(|f| f.index == position);
            let values = occurrence.map(|f| f.values.as_slice()).unwrap_or(&[]);

            if values.is_empty() {
                if field.repetition.is_required() {
                    return Err(ViolationError::MissingRequiredField {
                        group: group_name.to_string(),
                        name: field.name.clone(),
                    });
                }
                self.write_absent(field, def, rep, leaf, store);
                continue;
            }
            if !field.repetition.is_repeated() && values.len() > 1 {
                return Err(ViolationError::TooManyValues {
                    name: field.name.clone(),
                    count: values.len(),
                });
            }

            let child_def = if field.repetition.is_required() {
                def
            } else {
                def + 1
            };
            let (child_rep_level, own_rep) = if field.repetition.is_repeated() {
                (level_rep + 1, level_rep + 1)
            } else {
                (level_rep, rep)
            };

            // each occurrence walks the same leaf range
            let first_leaf = *leaf;
            for (k, value) in values.iter().enumerate() {
                *leaf = first_leaf;
                let value_rep = if k == 0 { rep } else { own_rep };
                self.stripe_value(field, value, value_rep, child_def, child_rep_level, leaf, store)?;
            }
        }
        Ok(())
    }

    fn stripe_value(
        &self,
        field: &FieldSchema,
        value: &Value,
        rep: i16,
        def: i16,
        level_rep: i16,
        leaf: &mut usize,
        store: &mut MemColumnStore,
    ) -> Result<(), ViolationError> {
        match (&field.field_type, value) {
            (FieldType::Primitive(kind), Value::Primitive(primitive)) => {
                if primitive.kind() != *kind {
                    return Err(ViolationError::KindMismatch {
                        name: field.name.clone(),
                        expected: *kind,
                        actual: primitive.kind(),
                    });
                }
                store.column_mut(*leaf).push_value(primitive.clone(), rep);
                *leaf += 1;
                Ok(())
            }
            (FieldType::Group(child), Value::Group(group)) => self.stripe_group(
                &field.name,
                &child.fields,
                group,
                rep,
                def,
                level_rep,
                leaf,
                store,
            ),
            (FieldType::Primitive(_), Value::Group(_)) => Err(ViolationError::ShapeMismatch {
                name: field.name.clone(),
                expected: "primitive",
                actual: "group",
            }),
            (FieldType::Group(_), Value::Primitive(_)) => Err(ViolationError::ShapeMismatch {
                name: field.name.clone(),
                expected: "group",
                actual: "primitive",
            }),
        }
    }

    /// One null position per leaf beneath an absent field.
    fn write_absent(
        &self,
        field: &FieldSchema,
        def: i16,
        rep: i16,
        leaf: &mut usize,
        store: &mut MemColumnStore,
    ) {
        match &field.field_type {
            FieldType::Primitive(_) => {
                store.column_mut(*leaf).push_null(def, rep);
                *leaf += 1;
            }
            FieldType::Group(group) => {
                for child in &group.fields {
                    self.write_absent(child, def, rep, leaf, store);
                }
            }
        }
    }
}
