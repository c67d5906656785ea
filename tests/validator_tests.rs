//! Tests for the validating consumer decorator.

mod common;

use std::sync::Arc;

use common::EventCollector;
use restitch::{
    AssemblyPlan, ColumnIoTree, Group, GroupMaterializer, MessageSchema, RecordConsumer,
    RecordMaterializer, RecordReader, RecordStriper, ValidatingConsumer, ViolationError,
};

fn validator(schema: &MessageSchema) -> ValidatingConsumer<'_, EventCollector> {
    ValidatingConsumer::new(schema, EventCollector::new())
}

// ============================================================================
// Accepting valid streams
// ============================================================================

#[test]
fn test_assembled_streams_validate() {
    let schema = common::two_leaves_under_repeated_group();
    let records = vec![
        Group::new()
            .with_group(
                "g",
                0,
                Group::new().with_value("a", 0, 1i32).with_value("b", 1, 2i32),
            )
            .with_group("g", 0, Group::new().with_value("a", 0, 3i32)),
        Group::new(),
    ];
    let tree = ColumnIoTree::build(&schema);
    let store = RecordStriper::new(&schema, &tree).stripe(&records).unwrap();
    let plan = Arc::new(AssemblyPlan::build(&tree).unwrap());

    let consumer = ValidatingConsumer::new(&schema, GroupMaterializer::new());
    let mut reader = RecordReader::new(plan, store.readers(), consumer).unwrap();
    assert_eq!(reader.read().unwrap(), records[0]);
    assert_eq!(reader.read().unwrap(), records[1]);
}

#[test]
fn test_hand_driven_valid_stream() {
    let schema = common::flat_required();
    let mut v = validator(&schema);
    v.start_message().unwrap();
    v.start_field("a", 0).unwrap();
    v.add_primitive(1i64.into()).unwrap();
    v.end_field("a", 0).unwrap();
    v.start_field("b", 1).unwrap();
    v.add_primitive("x".into()).unwrap();
    v.end_field("b", 1).unwrap();
    v.end_message().unwrap();
}

// ============================================================================
// Rejecting invalid streams
// ============================================================================

#[test]
fn test_unknown_field_is_rejected() {
    let schema = common::flat_required();
    let mut v = validator(&schema);
    v.start_message().unwrap();
    let err = v.start_field("zzz", 0).unwrap_err();
    assert!(matches!(err, ViolationError::UnknownField { .. }));
}

#[test]
fn test_misindexed_field_is_rejected() {
    let schema = common::flat_required();
    let mut v = validator(&schema);
    v.start_message().unwrap();
    let err = v.start_field("a", 1).unwrap_err();
    assert!(matches!(err, ViolationError::UnknownField { .. }));
}

#[test]
fn test_field_order_is_enforced() {
    let schema = common::flat_required();
    let mut v = validator(&schema);
    v.start_message().unwrap();
    v.start_field("b", 1).unwrap();
    v.add_primitive("x".into()).unwrap();
    v.end_field("b", 1).unwrap();
    let err = v.start_field("a", 0).unwrap_err();
    assert!(matches!(err, ViolationError::FieldOutOfOrder { .. }));
}

#[test]
fn test_wrong_primitive_kind_is_rejected() {
    let schema = common::flat_required();
    let mut v = validator(&schema);
    v.start_message().unwrap();
    v.start_field("a", 0).unwrap();
    let err = v.add_primitive("not an int".into()).unwrap_err();
    assert!(matches!(err, ViolationError::KindMismatch { .. }));
}

#[test]
fn test_second_value_on_non_repeated_field_is_rejected() {
    let schema = common::flat_required();
    let mut v = validator(&schema);
    v.start_message().unwrap();
    v.start_field("a", 0).unwrap();
    v.add_primitive(1i64.into()).unwrap();
    let err = v.add_primitive(2i64.into()).unwrap_err();
    assert!(matches!(err, ViolationError::TooManyValues { .. }));
}

#[test]
fn test_group_event_on_primitive_field_is_rejected() {
    let schema = common::flat_required();
    let mut v = validator(&schema);
    v.start_message().unwrap();
    v.start_field("a", 0).unwrap();
    let err = v.start_group().unwrap_err();
    assert!(matches!(err, ViolationError::ShapeMismatch { .. }));
}

#[test]
fn test_primitive_on_group_field_is_rejected() {
    let schema = common::repeated_group();
    let mut v = validator(&schema);
    v.start_message().unwrap();
    v.start_field("g", 0).unwrap();
    let err = v.add_primitive(1i32.into()).unwrap_err();
    assert!(matches!(err, ViolationError::ShapeMismatch { .. }));
}

#[test]
fn test_empty_field_is_rejected() {
    let schema = common::flat_required();
    let mut v = validator(&schema);
    v.start_message().unwrap();
    v.start_field("a", 0).unwrap();
    let err = v.end_field("a", 0).unwrap_err();
    assert!(matches!(err, ViolationError::UnexpectedEvent { .. }));
}

#[test]
fn test_events_outside_a_message_are_rejected() {
    let schema = common::flat_required();
    let mut v = validator(&schema);
    assert!(v.start_field("a", 0).is_err());
    assert!(v.end_message().is_err());
    assert!(v.end_group().is_err());

    v.start_message().unwrap();
    assert!(v.start_message().is_err());
}

#[test]
fn test_unclosed_field_fails_end_message() {
    let schema = common::flat_required();
    let mut v = validator(&schema);
    v.start_message().unwrap();
    v.start_field("a", 0).unwrap();
    v.add_primitive(1i64.into()).unwrap();
    let err = v.end_message().unwrap_err();
    assert!(matches!(err, ViolationError::UnexpectedEvent { .. }));
}

#[test]
fn test_nothing_is_forwarded_past_a_violation() {
    let schema = common::flat_required();
    let mut v = validator(&schema);
    v.start_message().unwrap();
    v.start_field("a", 0).unwrap();
    let _ = v.add_primitive("wrong".into());
    let events = v.into_inner().events;
    // the offending add_primitive never reached the inner consumer
    assert_eq!(events.len(), 2);
}

// ============================================================================
// Decorator composition
// ============================================================================

#[test]
fn test_validator_forwards_materialization() {
    let schema = common::repeated_primitive();
    let mut v = ValidatingConsumer::new(&schema, GroupMaterializer::new());
    v.start_message().unwrap();
    v.start_field("xs", 0).unwrap();
    v.add_primitive(1i32.into()).unwrap();
    v.add_primitive(2i32.into()).unwrap();
    v.end_field("xs", 0).unwrap();
    v.end_message().unwrap();
    assert_eq!(
        v.current_record(),
        Group::new().with_value("xs", 0, 1i32).with_value("xs", 0, 2i32)
    );
}
