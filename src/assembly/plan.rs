//! The assembly plan: a finite automaton over the leaf columns.
//!
//! One [`State`] per leaf, in document order. For every possible next
//! repetition level a state knows which state to jump to and how far down
//! the group tree to close first; for every definition level it knows how
//! deep the group tree must be opened. The per-state case tables collapse
//! each (current level, definition level, next repetition level) triple
//! into a hash-consed [`Case`] describing the whole open/close action.
//!
//! The plan is built once from the column I/O tree, is immutable
//! afterwards, and may be shared read-only by any number of assembly
//! streams.

use std::collections::HashMap;

use tracing::debug;

use crate::error::PlanError;
use crate::schema::{ColumnIoTree, PrimitiveKind};

/// A precomputed open/close action, unique per state by its
/// `(start_level, depth, next_level, next_state)` tuple.
///
/// Starting at tree level `start_level`, groups are opened down to
/// `depth`, the column's value is handled, groups are closed down to
/// `next_level`, and the automaton jumps to `next_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Case {
    id: usize,
    start_level: usize,
    depth: i32,
    next_level: usize,
    next_state: usize,
}

impl Case {
    /// Stable id within this state's pool, assigned in insertion order.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Tree level at entry.
    pub fn start_level(&self) -> usize {
        self.start_level
    }

    /// Tree depth after the opens; −1 means no group is open.
    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Tree level after the closes.
    pub fn next_level(&self) -> usize {
        self.next_level
    }

    /// Target state id; the sink is the state count.
    pub fn next_state(&self) -> usize {
        self.next_state
    }

    /// Whether this case opens at least one group.
    pub fn going_up(&self) -> bool {
        self.start_level as i32 <= self.depth
    }

    /// Whether this case closes at least one group.
    pub fn going_down(&self) -> bool {
        self.depth + 1 > self.next_level as i32
    }

    fn key(&self) -> CaseKey {
        (self.start_level, self.depth, self.next_level, self.next_state)
    }
}

type CaseKey = (usize, i32, usize, usize);

/// One leaf's node in the assembly automaton. Immutable after
/// construction.
#[derive(Debug, Clone)]
pub struct State {
    id: usize,
    field_path: Vec<String>,
    index_path: Vec<usize>,
    max_def: i16,
    max_rep: i16,
    kind: PrimitiveKind,
    /// Indexed by definition level: the deepest tree level at which a
    /// group must exist when a value with that level arrives; −1 for
    /// none.
    def_level_to_depth: Vec<i32>,
    /// Indexed by next repetition level: the target state id, or the
    /// sink sentinel.
    next_state: Vec<usize>,
    /// Indexed by next repetition level: the tree level to close down to
    /// before jumping.
    next_level: Vec<usize>,
    /// Indexed by `[current_level][d][next_r]`.
    case_lookup: Vec<Vec<Vec<Case>>>,
    defined_cases: Vec<Case>,
    undefined_cases: Vec<Case>,
}

impl State {
    /// The state id, equal to the leaf's document-order position.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Field names from the root to this leaf.
    pub fn field_path(&self) -> &[String] {
        &self.field_path
    }

    /// Sibling positions parallel to `field_path`.
    pub fn index_path(&self) -> &[usize] {
        &self.index_path
    }

    /// The leaf's own field name.
    pub fn primitive_field(&self) -> &str {
        &self.field_path[self.field_path.len() - 1]
    }

    /// The leaf's own sibling position.
    pub fn primitive_field_index(&self) -> usize {
        self.index_path[self.index_path.len() - 1]
    }

    /// The definition level of a present value.
    pub fn max_definition_level(&self) -> i16 {
        self.max_def
    }

    /// The deepest repetition level of this column.
    pub fn max_repetition_level(&self) -> i16 {
        self.max_rep
    }

    /// The primitive kind of this column.
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// The tree depth demanded by the given definition level; −1 when no
    /// group needs to exist.
    pub fn depth_for_definition(&self, d: i16) -> i32 {
        self.def_level_to_depth[d as usize]
    }

    /// The state to jump to when the next value repeats at level `r`.
    pub fn next_state_id(&self, r: i16) -> usize {
        self.next_state[r as usize]
    }

    /// The tree level to close down to when the next value repeats at
    /// level `r`.
    pub fn next_level(&self, r: i16) -> usize {
        self.next_level[r as usize]
    }

    /// The precomputed case for (current level, definition level, next
    /// repetition level).
    pub fn case(&self, current_level: usize, d: i16, next_r: i16) -> Case {
        self.case_lookup[current_level][d as usize][next_r as usize]
    }

    /// De-duplicated cases reachable with the value present, ordered by
    /// id.
    pub fn defined_cases(&self) -> &[Case] {
        &self.defined_cases
    }

    /// De-duplicated cases reachable with the value absent, ordered by
    /// id.
    pub fn undefined_cases(&self) -> &[Case] {
        &self.undefined_cases
    }
}

/// The immutable automaton built once per message.
#[derive(Debug, Clone)]
pub struct AssemblyPlan {
    message: String,
    states: Vec<State>,
}

impl AssemblyPlan {
    /// Build the plan for a column I/O tree.
    pub fn build(tree: &ColumnIoTree) -> Result<Self, PlanError> {
        let leaves = tree.leaves();
        if leaves.is_empty() {
            return Err(PlanError::EmptyMessage(tree.message().to_string()));
        }
        let n = leaves.len();

        // Step A: transition targets and close-down levels per (leaf, r)
        let deepest = leaves
            .iter()
            .map(|leaf| leaf.max_repetition_level())
            .max()
            .unwrap_or(0);
        let mut firsts = vec![0usize; deepest as usize + 1];
        let mut next_states = Vec::with_capacity(n);
        let mut next_levels = Vec::with_capacity(n);
        for (i, leaf) in leaves.iter().enumerate() {
            let max_rep = leaf.max_repetition_level();
            let mut states_of_r = Vec::with_capacity(max_rep as usize + 1);
            let mut levels_of_r = Vec::with_capacity(max_rep as usize + 1);
            for r in 0..=max_rep {
                if leaf.is_first(r) {
                    firsts[r as usize] = i;
                }
                let next = if r > 0 && leaf.is_last(r) {
                    // the last leaf of this repetition scope loops back
                    // to its first
                    firsts[r as usize]
                } else {
                    i + 1
                };
                let level = if next == n {
                    // end of record: close everything
                    0
                } else if r > 0 && leaf.is_last(r) {
                    // close down to the repeating ancestor
                    leaf.repetition_ancestor_path_len(r) - 1
                } else {
                    // close down to the deepest group shared with the
                    // next leaf
                    common_prefix_len(leaf.field_path(), leaves[next].field_path())
                };
                if level > leaf.field_path().len() - 1 {
                    return Err(PlanError::TransitionOutOfBounds {
                        path: leaf.field_path().to_vec(),
                        repetition_level: r,
                        next_level: level,
                        max: leaf.field_path().len() - 1,
                    });
                }
                states_of_r.push(next);
                levels_of_r.push(level);
            }
            next_states.push(states_of_r);
            next_levels.push(levels_of_r);
        }

        // Step B: definition level to tree depth per leaf
        let mut states = Vec::with_capacity(n);
        for (i, leaf) in leaves.iter().enumerate() {
            let path_len = leaf.field_path().len();
            let max_def = leaf.max_definition_level();
            let mut def_level_to_depth = Vec::with_capacity(max_def as usize + 1);
            let mut depth = 0usize;
            for d in 0..=max_def {
                while depth < path_len - 1 && d > leaf.ancestor_definition_level(depth) {
                    depth += 1;
                }
                def_level_to_depth.push(depth as i32 - 1);
            }

            states.push(State {
                id: i,
                field_path: leaf.field_path().to_vec(),
                index_path: leaf.index_path().to_vec(),
                max_def,
                max_rep: leaf.max_repetition_level(),
                kind: leaf.kind(),
                def_level_to_depth,
                next_state: std::mem::take(&mut next_states[i]),
                next_level: std::mem::take(&mut next_levels[i]),
                case_lookup: Vec::new(),
                defined_cases: Vec::new(),
                undefined_cases: Vec::new(),
            });
        }

        // Step D: hash-consed case tables. The value-to-id maps are
        // construction scaffolding; only the pools and the lookup
        // survive.
        for state in &mut states {
            let mut defined_ids: HashMap<CaseKey, usize> = HashMap::new();
            let mut undefined_ids: HashMap<CaseKey, usize> = HashMap::new();
            let mut lookup = Vec::with_capacity(state.field_path.len());
            for current_level in 0..state.field_path.len() {
                let mut by_def = Vec::with_capacity(state.max_def as usize + 1);
                for d in 0..=state.max_def {
                    let mut by_rep = Vec::with_capacity(state.max_rep as usize + 1);
                    for next_r in 0..=state.max_rep {
                        let depth = state.def_level_to_depth[d as usize]
                            .max(current_level as i32 - 1);
                        let next_level =
                            (state.next_level[next_r as usize] as i32).min(depth + 1) as usize;
                        let mut case = Case {
                            id: 0,
                            start_level: current_level,
                            depth,
                            next_level,
                            next_state: state.next_state[next_r as usize],
                        };
                        let (pool, ids) = if d == state.max_def {
                            (&mut state.defined_cases, &mut defined_ids)
                        } else {
                            (&mut state.undefined_cases, &mut undefined_ids)
                        };
                        case = match ids.get(&case.key()) {
                            Some(&id) => pool[id],
                            None => {
                                case.id = pool.len();
                                ids.insert(case.key(), case.id);
                                pool.push(case);
                                case
                            }
                        };
                        by_rep.push(case);
                    }
                    by_def.push(by_rep);
                }
                lookup.push(by_def);
            }
            state.case_lookup = lookup;
        }

        debug!(schema = %tree.message(), states = n, "assembly plan built");
        Ok(AssemblyPlan {
            message: tree.message().to_string(),
            states,
        })
    }

    /// The name of the message this plan assembles.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Number of states (and of leaf columns).
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// The state for the leaf at the given position.
    pub fn state(&self, i: usize) -> &State {
        &self.states[i]
    }

    /// All states in leaf order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// The sink sentinel id.
    pub fn sink(&self) -> usize {
        self.states.len()
    }

    /// Target state id for a transition; the sink is reported as
    /// `state_count()`.
    pub fn next_reader_id(&self, state: usize, r: i16) -> usize {
        self.states[state].next_state_id(r)
    }

    /// Close-down level for a transition.
    pub fn next_level(&self, state: usize, r: i16) -> usize {
        self.states[state].next_level(r)
    }
}

/// Length of the longest common field-path prefix.
fn common_prefix_len(left: &[String], right: &[String]) -> usize {
    left.iter().zip(right).take_while(|(l, r)| l == r).count()
}
