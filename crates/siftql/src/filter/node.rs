use crate::{
    error::{CompileError, ErrorKind, TreePath},
    ops::FilterOp,
    value::Operand,
};
use serde_json::Value as JsonValue;

const AND_TOKEN: &str = "*and";
const OR_TOKEN: &str = "*or";
const NOT_TOKEN: &str = "*not";

///
/// FilterNode
///
/// A decoded `where` subtree: logical grouping or leaf clause.
///

#[derive(Clone, Debug, PartialEq)]
pub enum FilterNode {
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Clause(Clause),
}

impl FilterNode {
    #[must_use]
    pub const fn and(children: Vec<Self>) -> Self {
        Self::And(children)
    }

    #[must_use]
    pub const fn or(children: Vec<Self>) -> Self {
        Self::Or(children)
    }

    #[expect(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(child: Self) -> Self {
        Self::Not(Box::new(child))
    }
}

///
/// Clause
///
/// One field token bound to one operator and its operand. Key cardinality is
/// enforced at decode time; a `Clause` value is exclusive by construction.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Clause {
    pub field: String,
    pub op: FilterOp,
    pub operand: Operand,
}

// Recursive tagged-union decode with an explicit depth budget.
pub(crate) fn decode_node(
    value: &JsonValue,
    path: &TreePath,
    depth: u32,
    max_depth: u32,
) -> Result<FilterNode, CompileError> {
    if depth >= max_depth {
        return Err(CompileError::new(
            path.clone(),
            ErrorKind::FilterTooDeep { max_depth },
        ));
    }

    let JsonValue::Object(entries) = value else {
        return Err(CompileError::malformed_clause(
            path,
            "filter node must be an object",
        ));
    };

    let is_grouping = entries
        .keys()
        .any(|key| matches!(key.as_str(), AND_TOKEN | OR_TOKEN | NOT_TOKEN));
    if is_grouping {
        return decode_grouping(entries, path, depth, max_depth);
    }

    decode_clause(entries, path)
}

fn decode_grouping(
    entries: &serde_json::Map<String, JsonValue>,
    path: &TreePath,
    depth: u32,
    max_depth: u32,
) -> Result<FilterNode, CompileError> {
    let mut keys = entries.iter();
    let (Some((token, body)), None) = (keys.next(), keys.next()) else {
        return Err(CompileError::malformed_clause(
            path,
            "grouping node must carry exactly one key",
        ));
    };

    match token.as_str() {
        AND_TOKEN => decode_children(body, &path.child(AND_TOKEN), depth, max_depth)
            .map(FilterNode::And),
        OR_TOKEN => {
            decode_children(body, &path.child(OR_TOKEN), depth, max_depth).map(FilterNode::Or)
        }
        _ => decode_node(body, &path.child(NOT_TOKEN), depth + 1, max_depth)
            .map(|child| FilterNode::Not(Box::new(child))),
    }
}

fn decode_children(
    body: &JsonValue,
    path: &TreePath,
    depth: u32,
    max_depth: u32,
) -> Result<Vec<FilterNode>, CompileError> {
    let JsonValue::Array(items) = body else {
        return Err(CompileError::malformed_clause(
            path,
            "grouping operand must be an array of filter nodes",
        ));
    };

    let mut children = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        children.push(decode_node(item, &path.index(index), depth + 1, max_depth)?);
    }

    Ok(children)
}

fn decode_clause(
    entries: &serde_json::Map<String, JsonValue>,
    path: &TreePath,
) -> Result<FilterNode, CompileError> {
    let mut keys = entries.iter();
    let (Some((field, body)), None) = (keys.next(), keys.next()) else {
        return Err(CompileError::malformed_clause(
            path,
            "clause must bind exactly one field",
        ));
    };

    // `*`-prefixed keys share a namespace with grouping and operator tokens;
    // anything unrecognized in node position is an operator-namespace miss,
    // not a field name.
    if field.starts_with('*') {
        return Err(CompileError::unknown_operator(path, field));
    }

    let clause_path = path.child(field);
    let JsonValue::Object(operators) = body else {
        return Err(CompileError::malformed_clause(
            &clause_path,
            "clause value must be an object binding exactly one operator",
        ));
    };

    let mut operators = operators.iter();
    let (Some((token, operand)), None) = (operators.next(), operators.next()) else {
        return Err(CompileError::malformed_clause(
            &clause_path,
            "clause must bind exactly one operator",
        ));
    };

    let op = FilterOp::from_token(token)
        .ok_or_else(|| CompileError::unknown_operator(&clause_path, token))?;
    let operand = Operand::decode(operand, &clause_path.child(token))?;

    Ok(FilterNode::Clause(Clause {
        field: field.clone(),
        op,
        operand,
    }))
}
