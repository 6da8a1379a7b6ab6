//! Literal decoding and operand coercion.
//!
//! Literals arrive either as plain JSON scalars or as tagged temporal objects
//! (`{"*datetime": ...}` / `{"*datetime_naive": ...}`). Decoding turns them
//! into typed values once; coercion checks them against the operator registry
//! and the resolved field type. Bound values are only ever carried for
//! parameter binding, never spliced into SQL text.

use crate::{
    catalog::FieldKind,
    error::{CompileError, TreePath},
};
use serde_json::Value as JsonValue;
use std::fmt;
use time::{
    OffsetDateTime, PrimitiveDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

const DATETIME_TAG: &str = "*datetime";
const DATETIME_NAIVE_TAG: &str = "*datetime_naive";

const NAIVE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const NAIVE_SUBSECOND_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");

///
/// Literal
///
/// A typed scalar operand. JSON numbers decode to `Int` when they fit in
/// `i64` and to `Float` otherwise; both classify as numeric for coercion.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(OffsetDateTime),
    DateTimeNaive(PrimitiveDateTime),
}

impl Literal {
    /// Decode one scalar literal from its JSON wire form.
    ///
    /// Objects are accepted only as tagged temporal literals; arrays are
    /// rejected here because operand arrays are decoded element-wise by
    /// [`Operand::decode`].
    pub(crate) fn decode(value: &JsonValue, path: &TreePath) -> Result<Self, CompileError> {
        match value {
            JsonValue::Null => Ok(Self::Null),
            JsonValue::Bool(flag) => Ok(Self::Bool(*flag)),
            JsonValue::Number(number) => number.as_i64().map_or_else(
                || {
                    number
                        .as_f64()
                        .map(Self::Float)
                        .ok_or_else(|| CompileError::invalid_literal(path, "unrepresentable number"))
                },
                |int| Ok(Self::Int(int)),
            ),
            JsonValue::String(text) => Ok(Self::Text(text.clone())),
            JsonValue::Object(entries) => decode_tagged(entries, path),
            JsonValue::Array(_) => Err(CompileError::invalid_literal(
                path,
                "array is not a scalar literal",
            )),
        }
    }

    /// Stable classification label used in diagnostics and homogeneity checks.
    #[must_use]
    pub const fn class_label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) | Self::Float(_) => "number",
            Self::Text(_) => "text",
            Self::DateTime(_) | Self::DateTimeNaive(_) => "datetime",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    #[must_use]
    pub const fn is_temporal(&self) -> bool {
        matches!(self, Self::DateTime(_) | Self::DateTimeNaive(_))
    }

    /// True when this literal is a plausible value for a field of `kind`.
    ///
    /// JSON-typed fields accept any literal: sub-document shapes are opaque to
    /// the catalog. Range and geometry fields carry backend-specific encodings,
    /// so any non-null scalar passes; the operator registry constrains which
    /// operators reach them in the first place.
    #[must_use]
    pub(crate) const fn matches_field(&self, kind: FieldKind) -> bool {
        match kind {
            FieldKind::Bool => matches!(self, Self::Bool(_)),
            FieldKind::Int | FieldKind::Uint | FieldKind::Float => self.is_numeric(),
            FieldKind::Text => self.is_text(),
            FieldKind::Timestamp | FieldKind::Date => self.is_temporal(),
            FieldKind::Json => true,
            FieldKind::Range | FieldKind::Geometry => !self.is_null(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Int(int) => write!(f, "{int}"),
            Self::Float(float) => write!(f, "{float}"),
            Self::Text(text) => write!(f, "'{text}'"),
            Self::DateTime(ts) => match ts.format(&Rfc3339) {
                Ok(formatted) => write!(f, "{formatted}"),
                Err(_) => write!(f, "{ts:?}"),
            },
            Self::DateTimeNaive(ts) => match ts.format(NAIVE_FORMAT) {
                Ok(formatted) => write!(f, "{formatted}"),
                Err(_) => write!(f, "{ts:?}"),
            },
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Literal {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<OffsetDateTime> for Literal {
    fn from(value: OffsetDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<PrimitiveDateTime> for Literal {
    fn from(value: PrimitiveDateTime) -> Self {
        Self::DateTimeNaive(value)
    }
}

///
/// Operand
///
/// The literal or literal array an operator is applied to. The same shape is
/// used on the input side (decoded clauses) and on the output side (bound
/// values on leaf predicates), so compiled output mirrors input 1:1.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    One(Literal),
    Many(Vec<Literal>),
}

impl Operand {
    /// Decode an operand from its JSON wire form: an array decodes
    /// element-wise, anything else as a single scalar.
    pub(crate) fn decode(value: &JsonValue, path: &TreePath) -> Result<Self, CompileError> {
        match value {
            JsonValue::Array(items) => {
                let mut literals = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    literals.push(Literal::decode(item, &path.index(index))?);
                }

                Ok(Self::Many(literals))
            }
            other => Ok(Self::One(Literal::decode(other, path)?)),
        }
    }

    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Many(_))
    }
}

impl From<Literal> for Operand {
    fn from(value: Literal) -> Self {
        Self::One(value)
    }
}

impl From<Vec<Literal>> for Operand {
    fn from(values: Vec<Literal>) -> Self {
        Self::Many(values)
    }
}

// Decode a single-key tagged object into a temporal literal.
fn decode_tagged(
    entries: &serde_json::Map<String, JsonValue>,
    path: &TreePath,
) -> Result<Literal, CompileError> {
    let mut keys = entries.keys();
    let (Some(tag), None) = (keys.next(), keys.next()) else {
        return Err(CompileError::invalid_literal(
            path,
            "tagged literal must carry exactly one tag",
        ));
    };

    let Some(JsonValue::String(raw)) = entries.get(tag) else {
        return Err(CompileError::invalid_literal(
            path,
            format!("'{tag}' payload must be a string"),
        ));
    };

    match tag.as_str() {
        DATETIME_TAG => parse_datetime(raw)
            .map(Literal::DateTime)
            .ok_or_else(|| {
                CompileError::invalid_literal(
                    &path.child(DATETIME_TAG),
                    format!("'{raw}' is not a valid RFC 3339 datetime"),
                )
            }),
        DATETIME_NAIVE_TAG => parse_datetime_naive(raw)
            .map(Literal::DateTimeNaive)
            .ok_or_else(|| {
                CompileError::invalid_literal(
                    &path.child(DATETIME_NAIVE_TAG),
                    format!("'{raw}' is not a valid offset-free ISO-8601 datetime"),
                )
            }),
        other => Err(CompileError::invalid_literal(
            path,
            format!("unknown literal tag '{other}'"),
        )),
    }
}

fn parse_datetime(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339).ok()
}

fn parse_datetime_naive(raw: &str) -> Option<PrimitiveDateTime> {
    PrimitiveDateTime::parse(raw, NAIVE_SUBSECOND_FORMAT)
        .or_else(|_| PrimitiveDateTime::parse(raw, NAIVE_FORMAT))
        .ok()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: &JsonValue) -> Result<Literal, CompileError> {
        Literal::decode(value, &TreePath::root())
    }

    #[test]
    fn scalars_decode_to_typed_literals() {
        assert_eq!(decode(&json!(null)).unwrap(), Literal::Null);
        assert_eq!(decode(&json!(true)).unwrap(), Literal::Bool(true));
        assert_eq!(decode(&json!(42)).unwrap(), Literal::Int(42));
        assert_eq!(decode(&json!(1.5)).unwrap(), Literal::Float(1.5));
        assert_eq!(
            decode(&json!("hi")).unwrap(),
            Literal::Text("hi".to_string())
        );
    }

    #[test]
    fn tagged_datetime_requires_offset() {
        let ok = decode(&json!({"*datetime": "2024-05-01T10:30:00Z"})).unwrap();
        assert!(matches!(ok, Literal::DateTime(_)));

        let missing_offset = decode(&json!({"*datetime": "2024-05-01T10:30:00"}));
        assert!(missing_offset.is_err());

        let garbage = decode(&json!({"*datetime": "not-a-date"}));
        assert!(garbage.is_err());
    }

    #[test]
    fn tagged_naive_datetime_rejects_offset() {
        let ok = decode(&json!({"*datetime_naive": "2024-05-01T10:30:00"})).unwrap();
        assert!(matches!(ok, Literal::DateTimeNaive(_)));

        let subseconds = decode(&json!({"*datetime_naive": "2024-05-01T10:30:00.250"})).unwrap();
        assert!(matches!(subseconds, Literal::DateTimeNaive(_)));

        let with_offset = decode(&json!({"*datetime_naive": "2024-05-01T10:30:00Z"}));
        assert!(with_offset.is_err());
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = decode(&json!({"*duration": "PT5M"})).unwrap_err();
        assert!(matches!(err.kind, crate::ErrorKind::InvalidLiteral { .. }));
    }

    #[test]
    fn operand_array_decodes_element_wise_with_paths() {
        let operand =
            Operand::decode(&json!(["a", "b"]), &TreePath::top("where").child("tags")).unwrap();
        assert_eq!(
            operand,
            Operand::Many(vec![Literal::from("a"), Literal::from("b")])
        );

        let err =
            Operand::decode(&json!([1, [2]]), &TreePath::top("where").child("tags")).unwrap_err();
        assert_eq!(err.path.to_string(), "where.tags[1]");
    }

    #[test]
    fn number_classification_is_shared() {
        assert_eq!(Literal::Int(1).class_label(), "number");
        assert_eq!(Literal::Float(1.0).class_label(), "number");
    }
}
