//! Dotted-path resolution against the field catalog.
//!
//! A field token is either a bare catalog field (`"age"`) or a dotted path
//! (`"address.city"`). Only the leading segment is resolved against the
//! catalog; when that field is marked nesting-capable the remainder passes
//! through to the backend as an opaque sub-path. Every segment must be a
//! plain identifier, so resolved paths are safe to splice as identifiers.

use crate::{
    catalog::{FieldCatalog, FieldKind},
    error::{CompileError, TreePath},
};
use std::fmt;

///
/// FieldPath
///
/// A resolved field reference: the catalog field it anchors on, the opaque
/// nested remainder (if any), and the native kind of the anchor field.
/// Construction always goes through [`resolve_field`], so a `FieldPath` in a
/// compiled predicate is known to be catalog-backed and identifier-clean.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldPath {
    root: String,
    nested: Option<String>,
    kind: FieldKind,
}

impl FieldPath {
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    #[must_use]
    pub fn nested(&self) -> Option<&str> {
        self.nested.as_deref()
    }

    /// Segments of the nested remainder, in order.
    pub fn nested_segments(&self) -> impl Iterator<Item = &str> {
        self.nested.as_deref().unwrap_or("").split('.').filter(|segment| !segment.is_empty())
    }

    /// Native kind of the anchor field.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// True when this path reaches below the anchor field. Opaque paths are
    /// not type-checked against operators; the backend owns their semantics.
    #[must_use]
    pub const fn is_opaque(&self) -> bool {
        self.nested.is_some()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.nested {
            Some(nested) => write!(f, "{}.{nested}", self.root),
            None => write!(f, "{}", self.root),
        }
    }
}

/// Resolve a field token for `model`, failing with `UnknownField` when the
/// leading segment is absent from the catalog, when a dotted remainder hangs
/// off a non-nesting field, or when any segment is not a plain identifier.
pub(crate) fn resolve_field(
    catalog: &dyn FieldCatalog,
    model: &str,
    token: &str,
    path: &TreePath,
) -> Result<FieldPath, CompileError> {
    let (head, rest) = match token.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (token, None),
    };

    if !is_identifier(head) {
        return Err(CompileError::unknown_field(path, model, token));
    }
    if let Some(rest) = rest {
        if rest.is_empty() || !rest.split('.').all(is_identifier) {
            return Err(CompileError::unknown_field(path, model, token));
        }
    }

    let descriptor = catalog
        .resolve(model, head)
        .ok_or_else(|| CompileError::unknown_field(path, model, token))?;

    if rest.is_some() && !descriptor.nested {
        return Err(CompileError::unknown_field(path, model, token));
    }

    Ok(FieldPath {
        root: descriptor.name.clone(),
        nested: rest.map(str::to_string),
        kind: descriptor.kind,
    })
}

// Identifier charset gate: segments become SQL identifiers downstream.
pub(crate) fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldDescriptor, ModelCatalog};

    fn catalog() -> ModelCatalog {
        ModelCatalog::new().with_model(
            "user",
            [
                FieldDescriptor::new("age", FieldKind::Uint),
                FieldDescriptor::nested("address", FieldKind::Json),
            ],
        )
    }

    fn resolve(token: &str) -> Result<FieldPath, CompileError> {
        resolve_field(&catalog(), "user", token, &TreePath::top("where"))
    }

    #[test]
    fn bare_field_resolves() {
        let field = resolve("age").unwrap();

        assert_eq!(field.root(), "age");
        assert_eq!(field.kind(), FieldKind::Uint);
        assert!(!field.is_opaque());
    }

    #[test]
    fn dotted_path_requires_nesting_capable_anchor() {
        let field = resolve("address.city").unwrap();
        assert_eq!(field.root(), "address");
        assert_eq!(field.nested(), Some("city"));
        assert!(field.is_opaque());

        assert!(resolve("age.bucket").is_err());
    }

    #[test]
    fn unknown_leading_segment_fails() {
        let err = resolve("salary").unwrap_err();
        assert!(matches!(err.kind, crate::ErrorKind::UnknownField { .. }));
    }

    #[test]
    fn non_identifier_segments_fail() {
        assert!(resolve("age; DROP TABLE users").is_err());
        assert!(resolve("address.").is_err());
        assert!(resolve("address..city").is_err());
        assert!(resolve("address.ci ty").is_err());
        assert!(resolve("1age").is_err());
    }

    #[test]
    fn nested_segments_iterate_in_order() {
        let field = resolve("address.geo.lat").unwrap();
        let segments: Vec<&str> = field.nested_segments().collect();

        assert_eq!(segments, vec!["geo", "lat"]);
    }
}
