use derive_more::Deref;
use std::fmt;
use thiserror::Error as ThisError;

///
/// PathSegment
///
/// One step into the request input tree: an object key (field token, operator
/// token, grouping token) or an array position.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

///
/// TreePath
///
/// Location of a node within the raw request input, carried on every error so
/// callers can point at the offending subtree.
///
/// Rendered as `where.*and[2].age.*gt`: keys joined with `.`, array positions
/// appended as `[n]`.
///

#[derive(Clone, Debug, Default, Deref, Eq, PartialEq)]
pub struct TreePath(Vec<PathSegment>);

impl TreePath {
    /// The empty path addressing the request object itself.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Path consisting of a single top-level key.
    #[must_use]
    pub fn top(key: impl Into<String>) -> Self {
        Self(vec![PathSegment::Key(key.into())])
    }

    /// Extend with an object key.
    #[must_use]
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    /// Extend with an array position.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "request");
        }

        let mut first = true;
        for segment in &self.0 {
            match segment {
                PathSegment::Key(key) => {
                    if !first {
                        write!(f, ".")?;
                    }
                    write!(f, "{key}")?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
            first = false;
        }

        Ok(())
    }
}

///
/// ErrorKind
///
/// Validation failure taxonomy. Every kind is a structured value; the
/// offending input location travels separately on [`CompileError`].
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ErrorKind {
    #[error("unknown model '{model}'")]
    UnknownModel { model: String },

    #[error("unknown field '{field}' on model '{model}'")]
    UnknownField { model: String, field: String },

    #[error("unknown operator '{token}'")]
    UnknownOperator { token: String },

    #[error("operator {op} is not valid for field '{field}' of type {kind}")]
    UnsupportedOperator {
        op: String,
        field: String,
        kind: String,
    },

    #[error("malformed clause: {message}")]
    MalformedClause { message: String },

    #[error("invalid literal: {message}")]
    InvalidLiteral { message: String },

    #[error("operand arity mismatch for {op}: {message}")]
    OperandArity { op: String, message: String },

    #[error("filter exceeds maximum nesting depth {max_depth}")]
    FilterTooDeep { max_depth: u32 },

    #[error("invalid pagination: {message}")]
    InvalidPagination { message: String },

    #[error("duplicate sort key '{key}'")]
    DuplicateSortKey { key: String },

    #[error("duplicate column '{name}'")]
    DuplicateColumn { name: String },

    #[error("malformed request: {message}")]
    MalformedRequest { message: String },
}

///
/// CompileError
///
/// The single error surface of the crate: a taxonomy kind plus the tree path
/// of the input node that produced it. Compilation is fail-fast; the first
/// error encountered is returned and no partial output exists.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{path}: {kind}")]
pub struct CompileError {
    pub path: TreePath,
    pub kind: ErrorKind,
}

impl CompileError {
    #[must_use]
    pub const fn new(path: TreePath, kind: ErrorKind) -> Self {
        Self { path, kind }
    }

    pub(crate) fn unknown_field(
        path: &TreePath,
        model: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self::new(
            path.clone(),
            ErrorKind::UnknownField {
                model: model.into(),
                field: field.into(),
            },
        )
    }

    pub(crate) fn unknown_operator(path: &TreePath, token: impl Into<String>) -> Self {
        Self::new(
            path.clone(),
            ErrorKind::UnknownOperator {
                token: token.into(),
            },
        )
    }

    pub(crate) fn malformed_clause(path: &TreePath, message: impl Into<String>) -> Self {
        Self::new(
            path.clone(),
            ErrorKind::MalformedClause {
                message: message.into(),
            },
        )
    }

    pub(crate) fn invalid_literal(path: &TreePath, message: impl Into<String>) -> Self {
        Self::new(
            path.clone(),
            ErrorKind::InvalidLiteral {
                message: message.into(),
            },
        )
    }

    pub(crate) fn operand_arity(
        path: &TreePath,
        op: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            path.clone(),
            ErrorKind::OperandArity {
                op: op.into(),
                message: message.into(),
            },
        )
    }

    pub(crate) fn invalid_pagination(path: &TreePath, message: impl Into<String>) -> Self {
        Self::new(
            path.clone(),
            ErrorKind::InvalidPagination {
                message: message.into(),
            },
        )
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_path_renders_keys_and_indexes() {
        let path = TreePath::top("where")
            .child("*and")
            .index(2)
            .child("age")
            .child("*gt");

        assert_eq!(path.to_string(), "where.*and[2].age.*gt");
    }

    #[test]
    fn empty_tree_path_renders_request() {
        assert_eq!(TreePath::root().to_string(), "request");
    }

    #[test]
    fn compile_error_display_prefixes_path() {
        let err = CompileError::unknown_operator(&TreePath::top("where").child("age"), "*foo");

        assert_eq!(err.to_string(), "where.age: unknown operator '*foo'");
    }
}
