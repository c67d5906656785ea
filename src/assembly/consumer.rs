//! The record consumer protocol.
//!
//! The assembly loop narrates each reassembled record as a flat event
//! stream. A consumer observes, per record:
//!
//! ```text
//! message   := start_message field* end_message
//! field     := start_field (group | primitive)+ end_field
//! group     := start_group field* end_group
//! primitive := add_primitive
//! ```
//!
//! The loop only ever produces allowed sequences; wrappers such as
//! [`ValidatingConsumer`](super::ValidatingConsumer) can reject anything
//! else. Every callback returns `Result` so a failing wrapper stops the
//! stream at the offending event; the loop propagates and catches
//! nothing.

use crate::error::ViolationError;
use crate::record::PrimitiveValue;

/// Sink for the reassembled event stream.
pub trait RecordConsumer {
    /// A new record begins.
    fn start_message(&mut self) -> Result<(), ViolationError>;

    /// The current record is complete.
    fn end_message(&mut self) -> Result<(), ViolationError>;

    /// A field of the enclosing group begins; `index` is its position
    /// among its siblings in the schema.
    fn start_field(&mut self, field: &str, index: usize) -> Result<(), ViolationError>;

    /// The named field ends.
    fn end_field(&mut self, field: &str, index: usize) -> Result<(), ViolationError>;

    /// A group value of the open field begins.
    fn start_group(&mut self) -> Result<(), ViolationError>;

    /// The current group ends.
    fn end_group(&mut self) -> Result<(), ViolationError>;

    /// A primitive value of the open field.
    fn add_primitive(&mut self, value: PrimitiveValue) -> Result<(), ViolationError>;
}

/// A consumer that additionally materializes each record.
///
/// Wrappers that decorate a materializing consumer should forward this
/// trait so decoration composes with
/// [`RecordReader`](super::RecordReader).
pub trait RecordMaterializer: RecordConsumer {
    /// The materialized record type.
    type Record;

    /// Hand over the record finished by the last `end_message`.
    fn current_record(&mut self) -> Self::Record;
}
