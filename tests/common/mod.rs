//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use restitch::{
    FieldSchema, MessageSchema, PrimitiveKind, PrimitiveValue, RecordConsumer, RecordMaterializer,
    Repetition, ViolationError,
};

/// One consumer callback, captured for assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StartMessage,
    EndMessage,
    StartField(String, usize),
    EndField(String, usize),
    StartGroup,
    EndGroup,
    AddPrimitive(PrimitiveValue),
}

/// Records every callback verbatim; `current_record` drains the log.
#[derive(Debug, Default)]
pub struct EventCollector {
    pub events: Vec<Event>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordConsumer for EventCollector {
    fn start_message(&mut self) -> Result<(), ViolationError> {
        self.events.push(Event::StartMessage);
        Ok(())
    }

    fn end_message(&mut self) -> Result<(), ViolationError> {
        self.events.push(Event::EndMessage);
        Ok(())
    }

    fn start_field(&mut self, field: &str, index: usize) -> Result<(), ViolationError> {
        self.events.push(Event::StartField(field.to_string(), index));
        Ok(())
    }

    fn end_field(&mut self, field: &str, index: usize) -> Result<(), ViolationError> {
        self.events.push(Event::EndField(field.to_string(), index));
        Ok(())
    }

    fn start_group(&mut self) -> Result<(), ViolationError> {
        self.events.push(Event::StartGroup);
        Ok(())
    }

    fn end_group(&mut self) -> Result<(), ViolationError> {
        self.events.push(Event::EndGroup);
        Ok(())
    }

    fn add_primitive(&mut self, value: PrimitiveValue) -> Result<(), ViolationError> {
        self.events.push(Event::AddPrimitive(value));
        Ok(())
    }
}

impl RecordMaterializer for EventCollector {
    type Record = Vec<Event>;

    fn current_record(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

/// Shorthand constructors for expected event sequences.
pub fn sf(name: &str, index: usize) -> Event {
    Event::StartField(name.to_string(), index)
}

pub fn ef(name: &str, index: usize) -> Event {
    Event::EndField(name.to_string(), index)
}

pub fn add(value: impl Into<PrimitiveValue>) -> Event {
    Event::AddPrimitive(value.into())
}

/// `message M { required int64 a; required string b; }`
pub fn flat_required() -> MessageSchema {
    MessageSchema::new(
        "M",
        vec![
            FieldSchema::required("a", PrimitiveKind::Int64),
            FieldSchema::required("b", PrimitiveKind::String),
        ],
    )
}

/// `message M { optional int64 a; required int64 b; }`
pub fn optional_then_required() -> MessageSchema {
    MessageSchema::new(
        "M",
        vec![
            FieldSchema::optional("a", PrimitiveKind::Int64),
            FieldSchema::required("b", PrimitiveKind::Int64),
        ],
    )
}

/// `message M { repeated int32 xs; }`
pub fn repeated_primitive() -> MessageSchema {
    MessageSchema::new("M", vec![FieldSchema::repeated("xs", PrimitiveKind::Int32)])
}

/// `message M { repeated group g { required int32 v; } }`
pub fn repeated_group() -> MessageSchema {
    MessageSchema::new(
        "M",
        vec![FieldSchema::group(
            "g",
            Repetition::Repeated,
            vec![FieldSchema::required("v", PrimitiveKind::Int32)],
        )],
    )
}

/// `message M { repeated group g { optional int32 a; optional int32 b; } }`
pub fn two_leaves_under_repeated_group() -> MessageSchema {
    MessageSchema::new(
        "M",
        vec![FieldSchema::group(
            "g",
            Repetition::Repeated,
            vec![
                FieldSchema::optional("a", PrimitiveKind::Int32),
                FieldSchema::optional("b", PrimitiveKind::Int32),
            ],
        )],
    )
}

/// Verify the structural invariants every assembled event stream obeys:
/// balanced message/group/field pairs and no elidable close/open pair
/// left behind.
pub fn assert_well_formed(events: &[Event]) {
    assert_eq!(events.first(), Some(&Event::StartMessage));
    assert_eq!(events.last(), Some(&Event::EndMessage));

    let mut message_depth = 0i32;
    let mut group_depth = 0i32;
    let mut field_depth = 0i32;
    for event in events {
        match event {
            Event::StartMessage => message_depth += 1,
            Event::EndMessage => message_depth -= 1,
            Event::StartGroup => group_depth += 1,
            Event::EndGroup => group_depth -= 1,
            Event::StartField(..) => field_depth += 1,
            Event::EndField(..) => field_depth -= 1,
            Event::AddPrimitive(_) => {}
        }
        assert!(message_depth >= 0 && group_depth >= 0 && field_depth >= 0);
    }
    assert_eq!(message_depth, 0);
    assert_eq!(group_depth, 0);
    assert_eq!(field_depth, 0);

    for pair in events.windows(2) {
        if let [Event::EndField(name, index), Event::StartField(next_name, next_index)] = pair {
            assert!(
                !(name == next_name && index == next_index),
                "elidable end/start pair for field {name:?} survived"
            );
        }
    }
}
