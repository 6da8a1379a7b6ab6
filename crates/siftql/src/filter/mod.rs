//! Filter-node decoding, clause validation, and the grouping compiler.
//!
//! The wire grammar is a tagged union decoded at runtime: a node is either a
//! grouping (`*and` / `*or` / `*not`, exactly one key) or a clause (exactly
//! one field key whose value carries exactly one operator key). The source
//! language expressed that exclusivity statically; here it is an explicit
//! cardinality check on the key set.

mod builder;
mod clause;
mod compile;
mod node;


pub use builder::FieldRef;
pub use node::{Clause, FilterNode};

use crate::{
    catalog::FieldCatalog,
    error::{CompileError, TreePath},
    policy::Limits,
    predicate::Predicate,
};
use serde_json::Value as JsonValue;

pub(crate) use clause::CompileContext;

/// Decode a raw `where` tree into a typed [`FilterNode`].
///
/// Depth is guarded here as well as during compilation, so a pathologically
/// nested input fails with `FilterTooDeep` before recursion can exhaust the
/// stack.
pub fn decode_filter(value: &JsonValue, limits: &Limits) -> Result<FilterNode, CompileError> {
    node::decode_node(value, &TreePath::top("where"), 0, limits.max_depth)
}

/// Validate and compile a filter tree against `model`.
///
/// Pure and deterministic: identical input always yields a structurally
/// identical predicate, and output shape mirrors input shape 1:1 except for
/// the empty-group identity rewrites.
pub fn compile_filter(
    catalog: &dyn FieldCatalog,
    model: &str,
    node: &FilterNode,
    limits: &Limits,
) -> Result<Predicate, CompileError> {
    let cx = CompileContext {
        catalog,
        model,
        limits,
    };

    compile::compile_node(&cx, node, &TreePath::top("where"), 0)
}
