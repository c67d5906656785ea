//! The column I/O tree: per-leaf structural facts derived from a schema.
//!
//! Record assembly never walks the schema at read time. Everything it needs
//! per leaf column (field path, index path, definition/repetition bounds,
//! ancestor definition levels, and the first/last position of the leaf
//! within each repetition scope) is computed here in a single walk.

use super::types::{FieldSchema, FieldType, MessageSchema, PrimitiveKind};

/// Structural facts about one primitive column.
///
/// Levels follow the striping convention: each optional or repeated
/// ancestor (the leaf included) adds one definition level, each repeated
/// ancestor adds one repetition level.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafColumnIo {
    field_path: Vec<String>,
    index_path: Vec<usize>,
    max_def: i16,
    max_rep: i16,
    kind: PrimitiveKind,
    /// Definition level of each node on the root path: entry 0 is the
    /// message root, entry k the group enclosing `field_path[k..]`.
    ancestor_def_levels: Vec<i16>,
    /// Field-path length of the repetition-level-r ancestor (entry 0 is
    /// the message root, length 0). A repeated leaf is its own deepest
    /// repetition ancestor.
    rep_ancestor_path_len: Vec<usize>,
    first_of_repetition: Vec<bool>,
    last_of_repetition: Vec<bool>,
}

impl LeafColumnIo {
    /// Field names from the message root down to this leaf.
    pub fn field_path(&self) -> &[String] {
        &self.field_path
    }

    /// Position of each path element among its siblings.
    pub fn index_path(&self) -> &[usize] {
        &self.index_path
    }

    /// The definition level of a fully present value.
    pub fn max_definition_level(&self) -> i16 {
        self.max_def
    }

    /// The deepest repetition level of this column.
    pub fn max_repetition_level(&self) -> i16 {
        self.max_rep
    }

    /// The primitive kind of the column.
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Definition level of the ancestor at the given root-path position
    /// (0 is the message root).
    pub fn ancestor_definition_level(&self, level: usize) -> i16 {
        self.ancestor_def_levels[level]
    }

    /// Whether this leaf is the first leaf of the subtree rooted at its
    /// repetition-level-`r` ancestor.
    pub fn is_first(&self, r: i16) -> bool {
        self.first_of_repetition[r as usize]
    }

    /// Whether this leaf is the last leaf of the subtree rooted at its
    /// repetition-level-`r` ancestor.
    pub fn is_last(&self, r: i16) -> bool {
        self.last_of_repetition[r as usize]
    }

    /// Field-path length of the repetition-level-`r` ancestor.
    pub fn repetition_ancestor_path_len(&self, r: i16) -> usize {
        self.rep_ancestor_path_len[r as usize]
    }
}

/// The leaves of a message schema in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnIoTree {
    message: String,
    leaves: Vec<LeafColumnIo>,
}

impl ColumnIoTree {
    /// Build the column I/O tree for a message schema.
    pub fn build(schema: &MessageSchema) -> Self {
        let mut walker = Walker {
            leaves: Vec::new(),
            spans: vec![(usize::MAX, 0)],
            leaf_rep_ordinals: Vec::new(),
        };
        let mut path = Vec::new();
        let mut index_path = Vec::new();
        // root: definition level 0, repetition ancestor ordinal 0
        let mut ancestor_defs = vec![0];
        let mut rep_stack = vec![(0usize, 0usize)];

        walker.visit(
            &schema.fields,
            0,
            0,
            &mut path,
            &mut index_path,
            &mut ancestor_defs,
            &mut rep_stack,
        );

        // resolve first/last flags now that every subtree span is known
        let Walker {
            mut leaves,
            spans,
            leaf_rep_ordinals,
        } = walker;
        for (i, (leaf, ordinals)) in leaves.iter_mut().zip(&leaf_rep_ordinals).enumerate() {
            for &ordinal in ordinals {
                let (first, last) = spans[ordinal];
                leaf.first_of_repetition.push(first == i);
                leaf.last_of_repetition.push(last == i);
            }
        }

        ColumnIoTree {
            message: schema.name.clone(),
            leaves,
        }
    }

    /// The name of the message this tree was built from.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// All leaves in document order.
    pub fn leaves(&self) -> &[LeafColumnIo] {
        &self.leaves
    }

    /// The leaf at the given position.
    pub fn leaf(&self, i: usize) -> &LeafColumnIo {
        &self.leaves[i]
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Whether the message has no leaves at all.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

struct Walker {
    leaves: Vec<LeafColumnIo>,
    /// Per repetition-ancestor ordinal: (first leaf index, last leaf index).
    spans: Vec<(usize, usize)>,
    /// Per leaf: the span ordinal of its repetition-level-r ancestor,
    /// indexed by r.
    leaf_rep_ordinals: Vec<Vec<usize>>,
}

impl Walker {
    #[allow(clippy::too_many_arguments)]
    fn visit(
        &mut self,
        fields: &[FieldSchema],
        rep: i16,
        def: i16,
        path: &mut Vec<String>,
        index_path: &mut Vec<usize>,
        ancestor_defs: &mut Vec<i16>,
        rep_stack: &mut Vec<(usize, usize)>,
    ) {
        for (position, field) in fields.iter().enumerate() {
            let child_def = if field.repetition.is_required() {
                def
            } else {
                def + 1
            };
            let child_rep = if field.repetition.is_repeated() {
                rep + 1
            } else {
                rep
            };

            path.push(field.name.clone());
            index_path.push(position);
            let pushed_rep = field.repetition.is_repeated();
            if pushed_rep {
                let ordinal = self.spans.len();
                self.spans.push((usize::MAX, 0));
                rep_stack.push((ordinal, path.len()));
            }

            match &field.field_type {
                FieldType::Primitive(kind) => {
                    let leaf_index = self.leaves.len();
                    for &(ordinal, _) in rep_stack.iter() {
                        let span = &mut self.spans[ordinal];
                        span.0 = span.0.min(leaf_index);
                        span.1 = span.1.max(leaf_index);
                    }
                    self.leaf_rep_ordinals
                        .push(rep_stack.iter().map(|&(ordinal, _)| ordinal).collect());
                    self.leaves.push(LeafColumnIo {
                        field_path: path.clone(),
                        index_path: index_path.clone(),
                        max_def: child_def,
                        max_rep: child_rep,
                        kind: *kind,
                        ancestor_def_levels: ancestor_defs.clone(),
                        rep_ancestor_path_len: rep_stack
                            .iter()
                            .map(|&(_, path_len)| path_len)
                            .collect(),
                        first_of_repetition: Vec::new(),
                        last_of_repetition: Vec::new(),
                    });
                }
                FieldType::Group(group) => {
                    ancestor_defs.push(child_def);
                    self.visit(
                        &group.fields,
                        child_rep,
                        child_def,
                        path,
                        index_path,
                        ancestor_defs,
                        rep_stack,
                    );
                    ancestor_defs.pop();
                }
            }

            if pushed_rep {
                rep_stack.pop();
            }
            path.pop();
            index_path.pop();
        }
    }
}
