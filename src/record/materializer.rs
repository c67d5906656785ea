//! Materializes the event stream into [`Group`] records.

use crate::assembly::{RecordConsumer, RecordMaterializer};
use crate::error::ViolationError;
use crate::record::{Field, Group, PrimitiveValue, Value};

/// Builds a [`Group`] from consumer callbacks.
///
/// Keeps a stack of open groups and a stack of open fields; every
/// `end_group`/`end_field` folds the finished item into its parent. The
/// assembly loop only emits well-formed sequences, but a hand-driven
/// caller may not, so stack underflows are reported rather than assumed
/// away.
#[derive(Debug, Default)]
pub struct GroupMaterializer {
    groups: Vec<Group>,
    fields: Vec<Field>,
    finished: Option<Group>,
}

impl GroupMaterializer {
    /// Create a new materializer.
    pub fn new() -> Self {
        Self::default()
    }

    fn misplaced(event: &'static str) -> ViolationError {
        ViolationError::UnexpectedEvent {
            event,
            context: "with no enclosing scope open".to_string(),
        }
    }
}

impl RecordConsumer for GroupMaterializer {
    fn start_message(&mut self) -> Result<(), ViolationError> {
        self.groups.push(Group::new());
        Ok(())
    }

    fn end_message(&mut self) -> Result<(), ViolationError> {
        match self.groups.pop() {
            Some(root) => {
                self.finished = Some(root);
                Ok(())
            }
            None => Err(Self::misplaced("end_message")),
        }
    }

    fn start_field(&mut self, field: &str, index: usize) -> Result<(), ViolationError> {
        self.fields.push(Field {
            name: field.to_string(),
            index,
            values: Vec::new(),
        });
        Ok(())
    }

    fn end_field(&mut self, _field: &str, _index: usize) -> Result<(), ViolationError> {
        let field = self
            .fields
            .pop()
            .ok_or_else(|| Self::misplaced("end_field"))?;
        match self.groups.last_mut() {
            Some(group) => {
                group.fields.push(field);
                Ok(())
            }
            None => Err(Self::misplaced("end_field")),
        }
    }

    fn start_group(&mut self) -> Result<(), ViolationError> {
        self.groups.push(Group::new());
        Ok(())
    }

    fn end_group(&mut self) -> Result<(), ViolationError> {
        let group = self
            .groups
            .pop()
            .ok_or_else(|| Self::misplaced("end_group"))?;
        match self.fields.last_mut() {
            Some(field) => {
                field.values.push(Value::Group(group));
                Ok(())
            }
            None => Err(Self::misplaced("end_group")),
        }
    }

    fn add_primitive(&mut self, value: PrimitiveValue) -> Result<(), ViolationError> {
        match self.fields.last_mut() {
            Some(field) => {
                field.values.push(Value::Primitive(value));
                Ok(())
            }
            None => Err(Self::misplaced("add_primitive")),
        }
    }
}

impl RecordMaterializer for GroupMaterializer {
    type Record = Group;

    fn current_record(&mut self) -> Group {
        self.finished.take().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_materializes_nested_record() {
        let mut m = GroupMaterializer::new();
        m.start_message().unwrap();
        m.start_field("g", 0).unwrap();
        m.start_group().unwrap();
        m.start_field("v", 0).unwrap();
        m.add_primitive(1i32.into()).unwrap();
        m.end_field("v", 0).unwrap();
        m.end_group().unwrap();
        m.end_field("g", 0).unwrap();
        m.end_message().unwrap();

        let record = m.current_record();
        let expected = Group::new().with_group("g", 0, Group::new().with_value("v", 0, 1i32));
        assert_eq!(record, expected);
    }

    #[test]
    fn test_stray_event_is_reported() {
        let mut m = GroupMaterializer::new();
        assert!(m.end_group().is_err());
        assert!(m.add_primitive(1i32.into()).is_err());
    }

    #[test]
    fn test_current_record_is_taken_once() {
        let mut m = GroupMaterializer::new();
        m.start_message().unwrap();
        m.end_message().unwrap();
        assert_eq!(m.current_record(), Group::new());
        assert_eq!(m.current_record(), Group::new());
    }
}
