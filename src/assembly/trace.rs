//! A consumer decorator that logs every callback.

use tracing::trace;

use crate::error::ViolationError;
use crate::record::PrimitiveValue;

use super::consumer::{RecordConsumer, RecordMaterializer};

/// Logs each callback at `trace` level, then forwards it.
///
/// Wrap the materializer with this while debugging an assembly stream;
/// the per-event cost makes it unsuitable for production reads.
pub struct TracingConsumer<C> {
    inner: C,
}

impl<C: RecordConsumer> TracingConsumer<C> {
    /// Wrap a consumer.
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    /// Unwrap the inner consumer.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: RecordConsumer> RecordConsumer for TracingConsumer<C> {
    fn start_message(&mut self) -> Result<(), ViolationError> {
        trace!("start_message");
        self.inner.start_message()
    }

    fn end_message(&mut self) -> Result<(), ViolationError> {
        trace!("end_message");
        self.inner.end_message()
    }

    fn start_field(&mut self, field: &str, index: usize) -> Result<(), ViolationError> {
        trace!(field = %field, index, "start_field");
        self.inner.start_field(field, index)
    }

    fn end_field(&mut self, field: &str, index: usize) -> Result<(), ViolationError> {
        trace!(field = %field, index, "end_field");
        self.inner.end_field(field, index)
    }

    fn start_group(&mut self) -> Result<(), ViolationError> {
        trace!("start_group");
        self.inner.start_group()
    }

    fn end_group(&mut self) -> Result<(), ViolationError> {
        trace!("end_group");
        self.inner.end_group()
    }

    fn add_primitive(&mut self, value: PrimitiveValue) -> Result<(), ViolationError> {
        trace!(kind = ?value.kind(), "add_primitive");
        self.inner.add_primitive(value)
    }
}

impl<C: RecordMaterializer> RecordMaterializer for TracingConsumer<C> {
    type Record = C::Record;

    fn current_record(&mut self) -> C::Record {
        self.inner.current_record()
    }
}
