//! Column reader contract, in-memory striped columns, and the record
//! striper.

mod reader;
mod store;
mod striper;

pub use reader::ColumnReader;
pub use store::{ColumnData, MemColumnReader, MemColumnStore};
pub use striper::RecordStriper;
