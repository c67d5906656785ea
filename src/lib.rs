//! Record assembly for striped columnar data
//!
//! This library reassembles nested records from columns of
//! (value, repetition-level, definition-level) triples, the way the
//! Dremel assembly algorithm does: a finite automaton over the leaf
//! columns is built once per schema, and a tight per-record loop of
//! table lookups replays each record to a consumer as a structured event
//! stream.
//!
//! ```
//! use std::sync::Arc;
//! use restitch::{
//!     AssemblyPlan, ColumnIoTree, FieldSchema, Group, GroupMaterializer, MessageSchema,
//!     PrimitiveKind, RecordReader, RecordStriper,
//! };
//!
//! let schema = MessageSchema::new(
//!     "Doc",
//!     vec![
//!         FieldSchema::required("id", PrimitiveKind::Int64),
//!         FieldSchema::repeated("name", PrimitiveKind::String),
//!     ],
//! );
//! let tree = ColumnIoTree::build(&schema);
//! let records = vec![Group::new()
//!     .with_value("id", 0, 10i64)
//!     .with_value("name", 1, "a")
//!     .with_value("name", 1, "b")];
//!
//! let store = RecordStriper::new(&schema, &tree).stripe(&records).unwrap();
//! let plan = Arc::new(AssemblyPlan::build(&tree).unwrap());
//! let mut reader = RecordReader::new(plan, store.readers(), GroupMaterializer::new()).unwrap();
//! assert_eq!(reader.read().unwrap(), records[0]);
//! ```

pub mod assembly;
pub mod column;
pub mod error;
pub mod record;
pub mod schema;

// Re-export main types
pub use assembly::{
    AssemblyPlan, Case, RecordConsumer, RecordMaterializer, RecordReader, State, TracingConsumer,
    ValidatingConsumer,
};
pub use column::{ColumnData, ColumnReader, MemColumnReader, MemColumnStore, RecordStriper};
pub use error::{AssemblyError, PlanError, ViolationError};
pub use record::{Field, Group, GroupMaterializer, PrimitiveValue, Value};
pub use schema::{
    ColumnIoTree, FieldSchema, FieldType, GroupSchema, LeafColumnIo, MessageSchema, PrimitiveKind,
    Repetition,
};
