//! A consumer decorator that validates the event stream against the
//! schema.

use crate::error::ViolationError;
use crate::record::PrimitiveValue;
use crate::schema::{FieldSchema, FieldType, MessageSchema};

use super::consumer::{RecordConsumer, RecordMaterializer};

/// Checks every callback against the schema before forwarding it.
///
/// The validator keeps a cursor stack mirroring the open groups: each
/// frame tracks which field is open, how many values it has received,
/// and the last field closed, so it can reject out-of-order fields,
/// repeated values on non-repeated fields, wrong primitive kinds, and
/// events the grammar does not allow. The first violation fails the
/// stream; nothing is forwarded past it.
pub struct ValidatingConsumer<'a, C> {
    schema: &'a MessageSchema,
    inner: C,
    frames: Vec<Frame<'a>>,
}

struct Frame<'a> {
    group_name: &'a str,
    fields: &'a [FieldSchema],
    /// The open field, if any.
    current: Option<usize>,
    /// Occurrences emitted for the open field so far.
    occurrences: usize,
    /// The last field closed in this group.
    last_closed: Option<usize>,
}

impl<'a, C: RecordConsumer> ValidatingConsumer<'a, C> {
    /// Wrap a consumer, validating against the given schema.
    pub fn new(schema: &'a MessageSchema, inner: C) -> Self {
        Self {
            schema,
            inner,
            frames: Vec::new(),
        }
    }

    /// Unwrap the inner consumer.
    pub fn into_inner(self) -> C {
        self.inner
    }

    fn unexpected(event: &'static str, context: impl Into<String>) -> ViolationError {
        ViolationError::UnexpectedEvent {
            event,
            context: context.into(),
        }
    }

    fn open_frame(&mut self, event: &'static str) -> Result<&mut Frame<'a>, ViolationError> {
        self.frames
            .last_mut()
            .ok_or_else(|| Self::unexpected(event, "outside a message"))
    }

    /// The declared field an occurrence is about to be added to, with
    /// arity enforcement.
    fn occurring_field(&mut self, event: &'static str) -> Result<&'a FieldSchema, ViolationError> {
        let frame = self.open_frame(event)?;
        let index = frame
            .current
            .ok_or_else(|| Self::unexpected(event, "with no field open"))?;
        let fields: &'a [FieldSchema] = frame.fields;
        let field = &fields[index];
        if !field.repetition.is_repeated() && frame.occurrences >= 1 {
            return Err(ViolationError::TooManyValues {
                name: field.name.clone(),
                count: frame.occurrences + 1,
            });
        }
        frame.occurrences += 1;
        Ok(field)
    }
}

impl<C: RecordConsumer> RecordConsumer for ValidatingConsumer<'_, C> {
    fn start_message(&mut self) -> Result<(), ViolationError> {
        if !self.frames.is_empty() {
            return Err(Self::unexpected("start_message", "inside a message"));
        }
        self.frames.push(Frame {
            group_name: &self.schema.name,
            fields: &self.schema.fields,
            current: None,
            occurrences: 0,
            last_closed: None,
        });
        self.inner.start_message()
    }

    fn end_message(&mut self) -> Result<(), ViolationError> {
        if self.frames.is_empty() {
            return Err(Self::unexpected("end_message", "outside a message"));
        }
        if self.frames.len() > 1 || self.frames[0].current.is_some() {
            return Err(Self::unexpected(
                "end_message",
                "with a field or group still open",
            ));
        }
        self.frames.clear();
        self.inner.end_message()
    }

    fn start_field(&mut self, field: &str, index: usize) -> Result<(), ViolationError> {
        let frame = self.open_frame("start_field")?;
        if frame.current.is_some() {
            return Err(Self::unexpected("start_field", "with a field already open"));
        }
        let declared = frame.fields.get(index);
        if declared.map(|f| f.name.as_str()) != Some(field) {
            return Err(ViolationError::UnknownField {
                group: frame.group_name.to_string(),
                name: field.to_string(),
                index,
            });
        }
        if frame.last_closed.is_some_and(|last| index <= last) {
            return Err(ViolationError::FieldOutOfOrder {
                group: frame.group_name.to_string(),
                name: field.to_string(),
                index,
            });
        }
        frame.current = Some(index);
        frame.occurrences = 0;
        self.inner.start_field(field, index)
    }

    fn end_field(&mut self, field: &str, index: usize) -> Result<(), ViolationError> {
        let frame = self.open_frame("end_field")?;
        if frame.current != Some(index) {
            return Err(Self::unexpected(
                "end_field",
                format!("for {field:?} which is not the open field"),
            ));
        }
        if frame.occurrences == 0 {
            return Err(Self::unexpected("end_field", "on a field with no values"));
        }
        frame.current = None;
        frame.last_closed = Some(index);
        self.inner.end_field(field, index)
    }

    fn start_group(&mut self) -> Result<(), ViolationError> {
        let field = self.occurring_field("start_group")?;
        match &field.field_type {
            FieldType::Group(group) => {
                self.frames.push(Frame {
                    group_name: &field.name,
                    fields: &group.fields,
                    current: None,
                    occurrences: 0,
                    last_closed: None,
                });
                self.inner.start_group()
            }
            FieldType::Primitive(_) => Err(ViolationError::ShapeMismatch {
                name: field.name.clone(),
                expected: "primitive",
                actual: "group",
            }),
        }
    }

    fn end_group(&mut self) -> Result<(), ViolationError> {
        if self.frames.len() < 2 {
            return Err(Self::unexpected("end_group", "outside a group"));
        }
        let frame = self.open_frame("end_group")?;
        if frame.current.is_some() {
            return Err(Self::unexpected("end_group", "with a field still open"));
        }
        self.frames.pop();
        self.inner.end_group()
    }

    fn add_primitive(&mut self, value: PrimitiveValue) -> Result<(), ViolationError> {
        let field = self.occurring_field("add_primitive")?;
        match &field.field_type {
            FieldType::Primitive(kind) => {
                if value.kind() != *kind {
                    return Err(ViolationError::KindMismatch {
                        name: field.name.clone(),
                        expected: *kind,
                        actual: value.kind(),
                    });
                }
                self.inner.add_primitive(value)
            }
            FieldType::Group(_) => Err(ViolationError::ShapeMismatch {
                name: field.name.clone(),
                expected: "group",
                actual: "primitive",
            }),
        }
    }
}

impl<C: RecordMaterializer> RecordMaterializer for ValidatingConsumer<'_, C> {
    type Record = C::Record;

    fn current_record(&mut self) -> C::Record {
        self.inner.current_record()
    }
}
