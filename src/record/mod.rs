//! Reassembled record values and the materializing consumer.

mod materializer;
mod value;

pub use materializer::GroupMaterializer;
pub use value::{Field, Group, PrimitiveValue, Value};
