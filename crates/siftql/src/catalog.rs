//! Field catalog surface.
//!
//! The catalog is an external authority supplied per request; this crate only
//! consumes it through [`FieldCatalog`]. A `BTreeMap`-backed [`ModelCatalog`]
//! ships for callers that hold their schema in memory (and for tests).

use std::{collections::BTreeMap, fmt};

///
/// FieldKind
///
/// Native type classification for catalog fields. This is deliberately
/// smaller than any storage type system: it exists only to drive operator
/// validity and literal compatibility checks.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Bool,
    Int,
    Uint,
    Float,
    Text,
    Timestamp,
    Date,
    Json,
    Range,
    Geometry,
}

impl FieldKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::Text => "text",
            Self::Timestamp => "timestamp",
            Self::Date => "date",
            Self::Json => "json",
            Self::Range => "range",
            Self::Geometry => "geometry",
        }
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Uint | Self::Float)
    }

    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(self, Self::Timestamp | Self::Date)
    }

    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Text)
    }

    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    #[must_use]
    pub const fn is_spatial(self) -> bool {
        matches!(self, Self::Range | Self::Geometry)
    }

    /// Scalar kinds: everything a single column value can be compared against
    /// without structural semantics.
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        !matches!(self, Self::Json | Self::Range | Self::Geometry)
    }

    /// Kinds with a total order usable by range comparisons.
    #[must_use]
    pub const fn is_orderable(self) -> bool {
        self.is_numeric() || self.is_temporal()
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

///
/// FieldDescriptor
///
/// One catalog entry: the field's name, its native type classification, and
/// whether dotted sub-paths below it are allowed to pass through.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub nested: bool,
}

impl FieldDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nested: false,
        }
    }

    /// A field whose dotted sub-paths pass through to the backend opaquely.
    #[must_use]
    pub fn nested(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nested: true,
        }
    }
}

///
/// FieldCatalog
///
/// The only schema surface compilation depends on. `resolve` answers for the
/// *leading* segment of a field token; dotted remainders are handled by the
/// path resolver, not the catalog.
///

pub trait FieldCatalog {
    /// True when the catalog knows the model at all.
    fn has_model(&self, model: &str) -> bool;

    /// Resolve a field name on a model, or `None` when either is unknown.
    fn resolve(&self, model: &str, field: &str) -> Option<&FieldDescriptor>;
}

///
/// ModelCatalog
///
/// In-memory catalog implementation keyed by model name.
///

#[derive(Clone, Debug, Default)]
pub struct ModelCatalog {
    models: BTreeMap<String, BTreeMap<String, FieldDescriptor>>,
}

impl ModelCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model with its field descriptors. Later descriptors with a
    /// repeated name replace earlier ones.
    #[must_use]
    pub fn with_model(
        mut self,
        model: impl Into<String>,
        fields: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Self {
        let fields = fields
            .into_iter()
            .map(|descriptor| (descriptor.name.clone(), descriptor))
            .collect();
        self.models.insert(model.into(), fields);

        self
    }

}

impl FieldCatalog for ModelCatalog {
    fn has_model(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    fn resolve(&self, model: &str, field: &str) -> Option<&FieldDescriptor> {
        self.models.get(model)?.get(field)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_per_model() {
        let catalog = ModelCatalog::new()
            .with_model("user", [FieldDescriptor::new("age", FieldKind::Uint)])
            .with_model("order", [FieldDescriptor::new("total", FieldKind::Float)]);

        assert!(catalog.resolve("user", "age").is_some());
        assert!(catalog.resolve("user", "total").is_none());
        assert!(catalog.resolve("invoice", "total").is_none());
    }

    #[test]
    fn scalar_classification_excludes_structured_kinds() {
        assert!(FieldKind::Text.is_scalar());
        assert!(FieldKind::Timestamp.is_scalar());
        assert!(!FieldKind::Json.is_scalar());
        assert!(!FieldKind::Range.is_scalar());
        assert!(!FieldKind::Geometry.is_scalar());
    }
}
