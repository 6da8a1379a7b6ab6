use crate::{
    error::{CompileError, ErrorKind, TreePath},
    filter::{FilterNode, clause},
    predicate::Predicate,
};

use super::CompileContext;

/// Recursive grouping walk.
///
/// - clause → leaf predicate (via the clause validator)
/// - `*and: []` → `True` (identity of conjunction)
/// - `*or: []`  → `False` (identity of disjunction)
/// - `*not`     → negation wrapper
///
/// The depth budget is re-checked here so builder-constructed trees get the
/// same guard as decoded input.
pub(crate) fn compile_node(
    cx: &CompileContext<'_>,
    node: &FilterNode,
    path: &TreePath,
    depth: u32,
) -> Result<Predicate, CompileError> {
    if depth >= cx.limits.max_depth {
        return Err(CompileError::new(
            path.clone(),
            ErrorKind::FilterTooDeep {
                max_depth: cx.limits.max_depth,
            },
        ));
    }

    match node {
        FilterNode::And(children) => {
            if children.is_empty() {
                return Ok(Predicate::True);
            }

            compile_children(cx, children, &path.child("*and"), depth).map(Predicate::And)
        }
        FilterNode::Or(children) => {
            if children.is_empty() {
                return Ok(Predicate::False);
            }

            compile_children(cx, children, &path.child("*or"), depth).map(Predicate::Or)
        }
        FilterNode::Not(child) => compile_node(cx, child, &path.child("*not"), depth + 1)
            .map(|inner| Predicate::Not(Box::new(inner))),
        FilterNode::Clause(node) => {
            clause::compile_clause(cx, node, path).map(Predicate::Leaf)
        }
    }
}

fn compile_children(
    cx: &CompileContext<'_>,
    children: &[FilterNode],
    path: &TreePath,
    depth: u32,
) -> Result<Vec<Predicate>, CompileError> {
    let mut compiled = Vec::with_capacity(children.len());
    for (index, child) in children.iter().enumerate() {
        compiled.push(compile_node(cx, child, &path.index(index), depth + 1)?);
    }

    Ok(compiled)
}
