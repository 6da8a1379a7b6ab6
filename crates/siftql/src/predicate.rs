//! Compiled predicate tree.
//!
//! Pure, backend-agnostic output of the grouping compiler. Compilation
//! mirrors input shape 1:1 (the only rewrites are the empty-group identities
//! `*and: []` → `True` and `*or: []` → `False`); the [`normalize`] pass below
//! is an explicit opt-in for callers that want canonical trees for caching.

use crate::{ops::FilterOp, path::FieldPath, value::Operand};

///
/// LeafPredicate
///
/// One validated clause: a resolved field path, a registry operator, and the
/// bound value carried for parameter binding by the execution layer.
///

#[derive(Clone, Debug, PartialEq)]
pub struct LeafPredicate {
    pub field: FieldPath,
    pub op: FilterOp,
    pub value: Operand,
}

///
/// Predicate
///
/// The compiled filter tree handed to the execution layer.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// Identity of conjunction; also the predicate of a request without `where`.
    True,
    /// Identity of disjunction.
    False,
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Leaf(LeafPredicate),
}

impl Predicate {
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

    #[must_use]
    pub const fn leaf(field: FieldPath, op: FilterOp, value: Operand) -> Self {
        Self::Leaf(LeafPredicate { field, op, value })
    }
}

///
/// Normalize a predicate into a flattened, identity-free form.
///
/// Guarantees:
/// - logical equivalence is preserved
/// - nested AND / OR nodes are flattened
/// - neutral elements are removed (True under AND, False under OR)
/// - absorbing elements short-circuit (False under AND, True under OR)
/// - double negation is eliminated
/// - child order is preserved as written
///
/// The compiler never calls this: compiled output stays 1:1 with input shape
/// so callers can correlate predicate nodes with request nodes.
///
#[must_use]
pub fn normalize(predicate: &Predicate) -> Predicate {
    match predicate {
        Predicate::True => Predicate::True,
        Predicate::False => Predicate::False,
        Predicate::And(children) => normalize_and(children),
        Predicate::Or(children) => normalize_or(children),
        Predicate::Not(inner) => normalize_not(inner),
        Predicate::Leaf(leaf) => Predicate::Leaf(leaf.clone()),
    }
}

fn normalize_and(children: &[Predicate]) -> Predicate {
    let mut out = Vec::new();

    for child in children {
        match normalize(child) {
            Predicate::True => {}
            Predicate::False => return Predicate::False,
            Predicate::And(grandchildren) => out.extend(grandchildren),
            other => out.push(other),
        }
    }

    match out.len() {
        0 => Predicate::True,
        1 => out.remove(0),
        _ => Predicate::And(out),
    }
}

fn normalize_or(children: &[Predicate]) -> Predicate {
    let mut out = Vec::new();

    for child in children {
        match normalize(child) {
            Predicate::False => {}
            Predicate::True => return Predicate::True,
            Predicate::Or(grandchildren) => out.extend(grandchildren),
            other => out.push(other),
        }
    }

    match out.len() {
        0 => Predicate::False,
        1 => out.remove(0),
        _ => Predicate::Or(out),
    }
}

fn normalize_not(inner: &Predicate) -> Predicate {
    match normalize(inner) {
        // NOT (NOT x) → x
        Predicate::Not(double) => *double,
        Predicate::True => Predicate::False,
        Predicate::False => Predicate::True,
        other => Predicate::Not(Box::new(other)),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{FieldDescriptor, FieldKind, ModelCatalog},
        error::TreePath,
        path::resolve_field,
        value::Literal,
    };

    fn leaf(field: &str, op: FilterOp, value: Literal) -> Predicate {
        let catalog = ModelCatalog::new().with_model(
            "user",
            [
                FieldDescriptor::new("age", FieldKind::Uint),
                FieldDescriptor::new("name", FieldKind::Text),
            ],
        );
        let field = resolve_field(&catalog, "user", field, &TreePath::root()).unwrap();

        Predicate::leaf(field, op, Operand::One(value))
    }

    #[test]
    fn normalize_flattens_nested_groups() {
        let a = leaf("age", FilterOp::Gt, Literal::Int(5));
        let b = leaf("name", FilterOp::Eq, Literal::from("x"));
        let c = leaf("age", FilterOp::Lt, Literal::Int(90));

        let tree = Predicate::and(vec![
            Predicate::and(vec![a.clone(), b.clone()]),
            c.clone(),
        ]);

        assert_eq!(normalize(&tree), Predicate::And(vec![a, b, c]));
    }

    #[test]
    fn normalize_removes_neutral_and_absorbing_elements() {
        let a = leaf("age", FilterOp::Gt, Literal::Int(5));

        let neutral = Predicate::and(vec![Predicate::True, a.clone()]);
        assert_eq!(normalize(&neutral), a);

        let absorbing = Predicate::and(vec![Predicate::False, a.clone()]);
        assert_eq!(normalize(&absorbing), Predicate::False);

        let or_neutral = Predicate::or(vec![Predicate::False, a.clone()]);
        assert_eq!(normalize(&or_neutral), a);

        let or_absorbing = Predicate::or(vec![Predicate::True, a]);
        assert_eq!(normalize(&or_absorbing), Predicate::True);
    }

    #[test]
    fn normalize_eliminates_double_negation() {
        let a = leaf("age", FilterOp::Gt, Literal::Int(5));
        let tree = Predicate::not(Predicate::not(a.clone()));

        assert_eq!(normalize(&tree), a);
    }

    #[test]
    fn normalize_keeps_empty_group_identities() {
        assert_eq!(normalize(&Predicate::and(vec![])), Predicate::True);
        assert_eq!(normalize(&Predicate::or(vec![])), Predicate::False);
        assert_eq!(normalize(&Predicate::not(Predicate::True)), Predicate::False);
    }
}
