//! In-memory striped columns.
//!
//! One [`ColumnData`] per leaf holds the column's triples in record order.
//! Values are stored compacted: a slot exists only where the definition
//! level reaches the column's maximum, so null positions cost two level
//! entries and nothing else.

use crate::record::PrimitiveValue;
use crate::schema::ColumnIoTree;

use super::reader::ColumnReader;

/// The striped data of one leaf column.
#[derive(Debug, Clone, Default)]
pub struct ColumnData {
    max_def: i16,
    def_levels: Vec<i16>,
    rep_levels: Vec<i16>,
    values: Vec<PrimitiveValue>,
}

impl ColumnData {
    /// Create an empty column with the given maximum definition level.
    pub fn new(max_def: i16) -> Self {
        Self {
            max_def,
            def_levels: Vec::new(),
            rep_levels: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Append a present value.
    pub fn push_value(&mut self, value: PrimitiveValue, rep: i16) {
        self.def_levels.push(self.max_def);
        self.rep_levels.push(rep);
        self.values.push(value);
    }

    /// Append a null position at the given definition level.
    pub fn push_null(&mut self, def: i16, rep: i16) {
        debug_assert!(def < self.max_def);
        self.def_levels.push(def);
        self.rep_levels.push(rep);
    }

    /// Number of triples in the column.
    pub fn len(&self) -> usize {
        self.def_levels.len()
    }

    /// Whether the column holds no triples.
    pub fn is_empty(&self) -> bool {
        self.def_levels.is_empty()
    }

    /// The maximum definition level of this column.
    pub fn max_definition_level(&self) -> i16 {
        self.max_def
    }

    /// A fresh cursor over this column.
    pub fn reader(&self) -> MemColumnReader<'_> {
        MemColumnReader {
            column: self,
            position: 0,
            value_position: 0,
        }
    }
}

/// All striped columns of one message, indexed by leaf position.
#[derive(Debug, Clone, Default)]
pub struct MemColumnStore {
    columns: Vec<ColumnData>,
}

impl MemColumnStore {
    /// Create an empty store with one column per leaf of the tree.
    pub fn for_tree(tree: &ColumnIoTree) -> Self {
        Self {
            columns: tree
                .leaves()
                .iter()
                .map(|leaf| ColumnData::new(leaf.max_definition_level()))
                .collect(),
        }
    }

    /// The column for the leaf at the given position.
    pub fn column(&self, i: usize) -> &ColumnData {
        &self.columns[i]
    }

    /// Mutable access to the column for the leaf at the given position.
    pub fn column_mut(&mut self, i: usize) -> &mut ColumnData {
        &mut self.columns[i]
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the store has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Fresh cursors over every column, in leaf order.
    pub fn readers(&self) -> Vec<MemColumnReader<'_>> {
        self.columns.iter().map(ColumnData::reader).collect()
    }
}

/// Cursor over one in-memory column.
#[derive(Debug, Clone)]
pub struct MemColumnReader<'a> {
    column: &'a ColumnData,
    position: usize,
    value_position: usize,
}

impl ColumnReader for MemColumnReader<'_> {
    fn current_definition_level(&self) -> i16 {
        self.column
            .def_levels
            .get(self.position)
            .copied()
            .unwrap_or(0)
    }

    fn current_repetition_level(&self) -> i16 {
        self.column
            .rep_levels
            .get(self.position)
            .copied()
            .unwrap_or(0)
    }

    fn current_value(&self) -> PrimitiveValue {
        self.column.values[self.value_position].clone()
    }

    fn consume(&mut self) {
        if let Some(&def) = self.column.def_levels.get(self.position) {
            if def == self.column.max_def {
                self.value_position += 1;
            }
            self.position += 1;
        }
    }

    fn is_fully_consumed(&self) -> bool {
        self.position >= self.column.len()
    }
}
