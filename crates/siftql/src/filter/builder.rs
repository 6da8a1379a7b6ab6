use crate::{
    filter::{Clause, FilterNode},
    ops::FilterOp,
    value::{Literal, Operand},
};
use derive_more::Deref;

///
/// FieldRef
///
/// Zero-cost wrapper around a static field token used to build filter trees
/// programmatically, without going through the JSON wire form. Carries only a
/// `&'static str` and derefs to `str`.
///
/// Builder output is ordinary [`FilterNode`] data; it passes through the same
/// validation as decoded input.
///

#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct FieldRef(&'static str);

impl FieldRef {
    /// Create a new field reference. Dotted tokens address nested sub-paths.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Return the underlying field token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }

    /// Bind an arbitrary registry operator to this field.
    #[must_use]
    pub fn op(self, op: FilterOp, operand: impl Into<Operand>) -> FilterNode {
        FilterNode::Clause(Clause {
            field: self.0.to_string(),
            op,
            operand: operand.into(),
        })
    }

    #[must_use]
    pub fn eq(self, value: impl Into<Literal>) -> FilterNode {
        self.op(FilterOp::Eq, value.into())
    }

    /// Equality against null; compiles to `IS NULL`.
    #[must_use]
    pub fn eq_none(self) -> FilterNode {
        self.op(FilterOp::Eq, Literal::Null)
    }

    #[must_use]
    pub fn neq(self, value: impl Into<Literal>) -> FilterNode {
        self.op(FilterOp::Neq, value.into())
    }

    #[must_use]
    pub fn gt(self, value: impl Into<Literal>) -> FilterNode {
        self.op(FilterOp::Gt, value.into())
    }

    #[must_use]
    pub fn gte(self, value: impl Into<Literal>) -> FilterNode {
        self.op(FilterOp::Gte, value.into())
    }

    #[must_use]
    pub fn lt(self, value: impl Into<Literal>) -> FilterNode {
        self.op(FilterOp::Lt, value.into())
    }

    #[must_use]
    pub fn lte(self, value: impl Into<Literal>) -> FilterNode {
        self.op(FilterOp::Lte, value.into())
    }

    #[must_use]
    pub fn like(self, pattern: impl Into<String>) -> FilterNode {
        self.op(FilterOp::Like, Literal::Text(pattern.into()))
    }

    #[must_use]
    pub fn contains(self, value: impl Into<Literal>) -> FilterNode {
        self.op(FilterOp::Contains, value.into())
    }

    #[must_use]
    pub fn icontains(self, needle: impl Into<String>) -> FilterNode {
        self.op(FilterOp::IContains, Literal::Text(needle.into()))
    }

    #[must_use]
    pub fn starts_with(self, prefix: impl Into<String>) -> FilterNode {
        self.op(FilterOp::StartsWith, Literal::Text(prefix.into()))
    }

    #[must_use]
    pub fn ends_with(self, suffix: impl Into<String>) -> FilterNode {
        self.op(FilterOp::EndsWith, Literal::Text(suffix.into()))
    }

    #[must_use]
    pub fn websearch(self, query: impl Into<String>) -> FilterNode {
        self.op(FilterOp::WebsearchToTsquery, Literal::Text(query.into()))
    }

    #[must_use]
    pub fn in_(self, values: impl IntoIterator<Item = impl Into<Literal>>) -> FilterNode {
        self.array_op(FilterOp::In, values)
    }

    #[must_use]
    pub fn has_key(self, key: impl Into<String>) -> FilterNode {
        self.op(FilterOp::HasKey, Literal::Text(key.into()))
    }

    #[must_use]
    pub fn has_all(self, keys: impl IntoIterator<Item = impl Into<Literal>>) -> FilterNode {
        self.array_op(FilterOp::HasAll, keys)
    }

    #[must_use]
    pub fn has_any(self, keys: impl IntoIterator<Item = impl Into<Literal>>) -> FilterNode {
        self.array_op(FilterOp::HasAny, keys)
    }

    #[must_use]
    pub fn intersects(self, bounds: impl IntoIterator<Item = impl Into<Literal>>) -> FilterNode {
        self.array_op(FilterOp::Intersects, bounds)
    }

    fn array_op(
        self,
        op: FilterOp,
        values: impl IntoIterator<Item = impl Into<Literal>>,
    ) -> FilterNode {
        let values: Vec<Literal> = values.into_iter().map(Into::into).collect();

        self.op(op, Operand::Many(values))
    }
}
