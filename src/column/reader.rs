//! The column reader contract.

use crate::record::PrimitiveValue;

/// Cursor over one leaf column's (value, definition, repetition) triples
/// in record order.
///
/// The cursor starts on the first triple. `consume` advances it by one.
/// `current_value` may only be called while the current definition level
/// equals the column's maximum; a lower level means the value slot is
/// absent for this position.
///
/// After the last triple has been consumed the cursor reports
/// `is_fully_consumed`, and the level accessors return 0 so a record in
/// flight terminates normally.
pub trait ColumnReader {
    /// Definition level of the current position.
    fn current_definition_level(&self) -> i16;

    /// Repetition level of the current position.
    fn current_repetition_level(&self) -> i16;

    /// The value at the current position. Only valid while the current
    /// definition level is the column's maximum.
    fn current_value(&self) -> PrimitiveValue;

    /// Advance past the current position.
    fn consume(&mut self);

    /// Whether every triple has been consumed.
    fn is_fully_consumed(&self) -> bool;
}
