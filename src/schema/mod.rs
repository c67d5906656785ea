//! Message schema types and the derived column I/O tree.
//!
//! The schema vocabulary (groups, primitive fields, repetition) lives in
//! `types`; `column_io` flattens a schema into per-leaf structural facts
//! consumed by the assembly-plan builder.

mod column_io;
mod types;

pub use column_io::{ColumnIoTree, LeafColumnIo};
pub use types::{FieldSchema, FieldType, GroupSchema, MessageSchema, PrimitiveKind, Repetition};
