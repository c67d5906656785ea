//! Error types for record assembly

use thiserror::Error;

use crate::schema::PrimitiveKind;

/// Errors raised while building an assembly plan.
///
/// These are programming errors: the schema handed to the builder is
/// internally inconsistent. Construction aborts and nothing is recoverable.
#[derive(Debug, Error)]
pub enum PlanError {
    /// A computed close-down level exceeds the leaf's own depth
    #[error(
        "transition out of bounds for leaf {path:?}: close level {next_level} \
         at repetition level {repetition_level} exceeds leaf depth {max}"
    )]
    TransitionOutOfBounds {
        /// Field path of the offending leaf
        path: Vec<String>,
        /// Repetition level of the offending transition
        repetition_level: i16,
        /// The out-of-range close-down level
        next_level: usize,
        /// The deepest level permitted for this leaf
        max: usize,
    },
    /// The message schema has no primitive columns
    #[error("message {0:?} has no primitive columns")]
    EmptyMessage(String),
    /// A reader was wired with the wrong number of column cursors
    #[error("expected {expected} column readers (one per leaf), got {actual}")]
    ColumnCountMismatch {
        /// One per plan state
        expected: usize,
        /// What the caller supplied
        actual: usize,
    },
}

/// A callback sequence or record value that violates the schema.
///
/// Raised by the validating consumer at the offending callback, or by the
/// striper at the offending value. The stream is not recoverable.
#[derive(Debug, Error)]
pub enum ViolationError {
    /// A callback arrived in a position the schema grammar does not allow
    #[error("unexpected {event} {context}")]
    UnexpectedEvent {
        /// The offending callback name
        event: &'static str,
        /// Where in the stream it happened
        context: String,
    },
    /// A field name/index pair does not exist in the enclosing group
    #[error("group {group:?} has no field {name:?} at index {index}")]
    UnknownField {
        /// The enclosing group
        group: String,
        /// The claimed field name
        name: String,
        /// The claimed field index
        index: usize,
    },
    /// Fields must be visited in declaration order
    #[error("field {name:?} (index {index}) out of order in group {group:?}")]
    FieldOutOfOrder {
        /// The enclosing group
        group: String,
        /// The offending field
        name: String,
        /// Its declared index
        index: usize,
    },
    /// A required field is missing from a record being striped
    #[error("missing required field {name:?} in group {group:?}")]
    MissingRequiredField {
        /// The enclosing group
        group: String,
        /// The missing field
        name: String,
    },
    /// A non-repeated field carried more than one value
    #[error("field {name:?} is not repeated but has {count} values")]
    TooManyValues {
        /// The offending field
        name: String,
        /// How many values it carried
        count: usize,
    },
    /// A primitive value of the wrong kind
    #[error("field {name:?} expects {expected:?}, got {actual:?}")]
    KindMismatch {
        /// The offending field
        name: String,
        /// The declared primitive kind
        expected: PrimitiveKind,
        /// The kind actually seen
        actual: PrimitiveKind,
    },
    /// A group value where a primitive was declared, or vice versa
    #[error("field {name:?} expects a {expected}, got a {actual}")]
    ShapeMismatch {
        /// The offending field
        name: String,
        /// "group" or "primitive"
        expected: &'static str,
        /// What arrived instead
        actual: &'static str,
    },
}

/// Top-level error for the read path.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// Reading past the last record in the column stream
    #[error("column stream exhausted")]
    Exhausted,

    /// `read_into` asked for more records than the buffer holds
    #[error("cannot read {count} records into a buffer of length {capacity}")]
    BufferTooSmall {
        /// Requested record count
        count: usize,
        /// Buffer capacity actually available
        capacity: usize,
    },

    /// Schema violation reported by a consumer
    #[error("schema violation: {0}")]
    Violation(#[from] ViolationError),
}
