//! The assembly loop: drives the automaton to reassemble one record per
//! call.

use std::sync::Arc;

use crate::column::ColumnReader;
use crate::error::{AssemblyError, PlanError};
use crate::record::PrimitiveValue;

use super::consumer::RecordMaterializer;
use super::plan::AssemblyPlan;

/// Reassembles records from striped columns.
///
/// The plan is shared read-only; the reader exclusively owns its column
/// cursors and its consumer for the duration of the stream. One record
/// per [`read`](RecordReader::read) call; concurrent callers are not
/// supported.
#[derive(Debug)]
pub struct RecordReader<M, C> {
    plan: Arc<AssemblyPlan>,
    columns: Vec<C>,
    emitter: EventEmitter<M>,
}

impl<M, C> RecordReader<M, C>
where
    M: RecordMaterializer,
    C: ColumnReader,
{
    /// Create a reader over one column cursor per leaf, in leaf order.
    pub fn new(plan: Arc<AssemblyPlan>, columns: Vec<C>, consumer: M) -> Result<Self, PlanError> {
        if columns.len() != plan.state_count() {
            return Err(PlanError::ColumnCountMismatch {
                expected: plan.state_count(),
                actual: columns.len(),
            });
        }
        let emitter = EventEmitter {
            plan: Arc::clone(&plan),
            consumer,
            pending_end_field: None,
        };
        Ok(Self {
            plan,
            columns,
            emitter,
        })
    }

    /// Whether another record can be read.
    pub fn has_next(&self) -> bool {
        !self.columns[0].is_fully_consumed()
    }

    /// Reassemble the next record, advancing each visited column by
    /// exactly one position per occurrence.
    pub fn read(&mut self) -> Result<M::Record, AssemblyError> {
        if !self.has_next() {
            return Err(AssemblyError::Exhausted);
        }

        let mut current_level = 0usize;
        let mut state_id = 0usize;
        self.emitter.start_message()?;
        loop {
            let state = self.plan.state(state_id);
            let column = &mut self.columns[state_id];

            let d = column.current_definition_level();
            // open the groups this value's definition level demands
            let depth = state.depth_for_definition(d);
            while (current_level as i32) <= depth {
                self.emitter.start_group(state_id, current_level)?;
                current_level += 1;
            }

            if d == state.max_definition_level() {
                let value = column.current_value();
                self.emitter.add_primitive(state_id, value)?;
            }
            column.consume();

            let next_r = if state.max_repetition_level() == 0 {
                0
            } else {
                column.current_repetition_level()
            };
            // close down to where the next transition resumes
            let target = state.next_level(next_r);
            while current_level > target {
                current_level -= 1;
                self.emitter.end_group(state_id, current_level)?;
            }

            state_id = state.next_state_id(next_r);
            if state_id == self.plan.sink() {
                break;
            }
        }
        self.emitter.end_message()?;
        Ok(self.emitter.current_record())
    }

    /// Reassemble `count` consecutive records into the buffer.
    ///
    /// Fails before touching any state if the buffer is too small.
    pub fn read_into(
        &mut self,
        records: &mut [M::Record],
        count: usize,
    ) -> Result<(), AssemblyError> {
        if count > records.len() {
            return Err(AssemblyError::BufferTooSmall {
                count,
                capacity: records.len(),
            });
        }
        for slot in records.iter_mut().take(count) {
            *slot = self.read()?;
        }
        Ok(())
    }

    /// The shared plan.
    pub fn plan(&self) -> &AssemblyPlan {
        &self.plan
    }

    /// Tear the reader down, returning its column cursors.
    pub fn into_columns(self) -> Vec<C> {
        self.columns
    }
}

/// Forwards events to the consumer, eliding an `end_field` immediately
/// followed by a `start_field` of the same field.
///
/// Without the elision, a field holding several values or group
/// occurrences would be closed and reopened between each pair of
/// children. The pending pair is held back until the next event decides
/// its fate; every other emission flushes it first.
#[derive(Debug)]
struct EventEmitter<M> {
    plan: Arc<AssemblyPlan>,
    consumer: M,
    /// The held-back `end_field`, as (state id, path level).
    pending_end_field: Option<(usize, usize)>,
}

impl<M: RecordMaterializer> EventEmitter<M> {
    fn start_message(&mut self) -> Result<(), AssemblyError> {
        self.pending_end_field = None;
        self.consumer.start_message()?;
        Ok(())
    }

    fn end_message(&mut self) -> Result<(), AssemblyError> {
        self.flush_pending()?;
        self.consumer.end_message()?;
        Ok(())
    }

    fn start_group(&mut self, state_id: usize, level: usize) -> Result<(), AssemblyError> {
        self.start_field(state_id, level)?;
        self.consumer.start_group()?;
        Ok(())
    }

    fn end_group(&mut self, state_id: usize, level: usize) -> Result<(), AssemblyError> {
        self.flush_pending()?;
        self.consumer.end_group()?;
        self.pending_end_field = Some((state_id, level));
        Ok(())
    }

    fn add_primitive(
        &mut self,
        state_id: usize,
        value: PrimitiveValue,
    ) -> Result<(), AssemblyError> {
        let leaf_level = self.plan.state(state_id).field_path().len() - 1;
        self.start_field(state_id, leaf_level)?;
        self.consumer.add_primitive(value)?;
        self.flush_pending()?;
        self.pending_end_field = Some((state_id, leaf_level));
        Ok(())
    }

    fn start_field(&mut self, state_id: usize, level: usize) -> Result<(), AssemblyError> {
        let index = self.plan.state(state_id).index_path()[level];
        if let Some((pending_state, pending_level)) = self.pending_end_field {
            if self.plan.state(pending_state).index_path()[pending_level] == index {
                // same field continues: skip the close/open pair
                self.pending_end_field = None;
                return Ok(());
            }
        }
        self.flush_pending()?;
        let state = self.plan.state(state_id);
        self.consumer.start_field(&state.field_path()[level], index)?;
        Ok(())
    }

    fn flush_pending(&mut self) -> Result<(), AssemblyError> {
        if let Some((state_id, level)) = self.pending_end_field.take() {
            let state = self.plan.state(state_id);
            self.consumer
                .end_field(&state.field_path()[level], state.index_path()[level])?;
        }
        Ok(())
    }

    fn current_record(&mut self) -> M::Record {
        self.consumer.current_record()
    }
}
