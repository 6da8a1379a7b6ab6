//! Operator registry.
//!
//! Static, immutable metadata for the 22 recognized operator tokens: operand
//! arity, accepted native field kinds, operand class, and the SQL symbol the
//! operator compiles to. All operator semantics are declared here; the clause
//! validator and the SQL renderer only consult this table, never re-derive
//! rules of their own.

use crate::catalog::FieldKind;

///
/// OperandArity
///
/// Whether an operator takes a single literal or a literal array.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperandArity {
    Scalar,
    Array,
}

impl OperandArity {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Array => "array",
        }
    }
}

///
/// OperandClass
///
/// What the coercer requires of each bound literal (array operators apply the
/// class element-wise).
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum OperandClass {
    /// Literal must be plausible for the resolved field kind.
    Field,
    /// Literal must be text.
    Text,
    /// Literal must be numeric or a tagged datetime.
    NumericOrTemporal,
}

///
/// FilterOp
///
/// The 22 recognized operator tokens.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FilterOp {
    In,
    Eq,
    Neq,
    Contains,
    IContains,
    WebsearchToTsquery,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    ContainedBy,
    HasKey,
    HasAll,
    HasAny,
    Intersects,
    IntersectsNd,
    Same,
    Above,
    Below,
    StartsWith,
    EndsWith,
}

impl FilterOp {
    /// Every registered operator, in token-table order.
    pub const ALL: [Self; 22] = [
        Self::In,
        Self::Eq,
        Self::Neq,
        Self::Contains,
        Self::IContains,
        Self::WebsearchToTsquery,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::Like,
        Self::ContainedBy,
        Self::HasKey,
        Self::HasAll,
        Self::HasAny,
        Self::Intersects,
        Self::IntersectsNd,
        Self::Same,
        Self::Above,
        Self::Below,
        Self::StartsWith,
        Self::EndsWith,
    ];

    /// The wire token, always `*`-prefixed.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::In => "*in_",
            Self::Eq => "*eq",
            Self::Neq => "*neq",
            Self::Contains => "*contains",
            Self::IContains => "*icontains",
            Self::WebsearchToTsquery => "*websearch_to_tsquery",
            Self::Gt => "*gt",
            Self::Gte => "*gte",
            Self::Lt => "*lt",
            Self::Lte => "*lte",
            Self::Like => "*like",
            Self::ContainedBy => "*contained_by",
            Self::HasKey => "*has_key",
            Self::HasAll => "*has_all",
            Self::HasAny => "*has_any",
            Self::Intersects => "*intersects",
            Self::IntersectsNd => "*intersects_nd",
            Self::Same => "*same",
            Self::Above => "*above",
            Self::Below => "*below",
            Self::StartsWith => "*startswith",
            Self::EndsWith => "*endswith",
        }
    }

    /// Registry lookup by wire token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.token() == token)
    }

    /// Accepted operand arity.
    #[must_use]
    pub const fn arity(self) -> OperandArity {
        match self {
            Self::In | Self::HasAll | Self::HasAny | Self::Intersects | Self::IntersectsNd => {
                OperandArity::Array
            }
            _ => OperandArity::Scalar,
        }
    }

    /// True when `null` is a legal operand (compiles to `IS [NOT] NULL`).
    #[must_use]
    pub const fn allows_null(self) -> bool {
        matches!(self, Self::Eq | Self::Neq)
    }

    /// Accepted native field kinds.
    #[must_use]
    pub const fn supports_field(self, kind: FieldKind) -> bool {
        match self {
            Self::Eq | Self::Neq => true,
            Self::In => kind.is_scalar(),
            Self::Contains => kind.is_text() || kind.is_json() || kind.is_spatial(),
            Self::IContains
            | Self::WebsearchToTsquery
            | Self::Like
            | Self::StartsWith
            | Self::EndsWith => kind.is_text(),
            Self::Gt | Self::Gte | Self::Lt | Self::Lte => kind.is_orderable(),
            Self::ContainedBy => kind.is_json() || kind.is_spatial(),
            Self::HasKey | Self::HasAll | Self::HasAny => kind.is_json(),
            Self::Intersects | Self::IntersectsNd | Self::Same | Self::Above | Self::Below => {
                kind.is_spatial()
            }
        }
    }

    /// Operand class demanded by this operator against a field of `kind`.
    ///
    /// `*contains` is the one field-dependent entry: substring match on text
    /// fields, structural containment elsewhere.
    #[must_use]
    pub(crate) const fn operand_class(self, kind: FieldKind) -> OperandClass {
        match self {
            Self::Eq | Self::Neq | Self::In | Self::ContainedBy | Self::Same => OperandClass::Field,
            Self::Contains => {
                if kind.is_text() {
                    OperandClass::Text
                } else {
                    OperandClass::Field
                }
            }
            Self::IContains
            | Self::WebsearchToTsquery
            | Self::Like
            | Self::StartsWith
            | Self::EndsWith
            | Self::HasKey
            | Self::HasAll
            | Self::HasAny => OperandClass::Text,
            Self::Gt
            | Self::Gte
            | Self::Lt
            | Self::Lte
            | Self::Above
            | Self::Below
            | Self::Intersects
            | Self::IntersectsNd => OperandClass::NumericOrTemporal,
        }
    }

    /// SQL symbol this operator compiles to against a field of `kind`.
    /// Shapes that are not plain binary comparisons (IN lists, text patterns,
    /// websearch, null equality) are assembled by the renderer around this
    /// symbol:
    ///
    /// - `*eq`          → `field = $n` (or `field IS NULL`)
    /// - `*in_`         → `field IN ($n, $n+1, …)`
    /// - `*contains`    → `field LIKE $n` on text, `field @> $n` otherwise
    /// - `*has_any`     → `field ?| $n`
    /// - `*startswith`  → `field LIKE $n` with the bound value suffixed `%`
    /// - `*websearch_to_tsquery` → `to_tsvector(field) @@ websearch_to_tsquery($n)`
    #[must_use]
    pub(crate) const fn sql_symbol(self, kind: FieldKind) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Eq => "=",
            Self::Neq => "<>",
            Self::Contains => {
                if kind.is_text() {
                    "LIKE"
                } else {
                    "@>"
                }
            }
            Self::Like | Self::StartsWith | Self::EndsWith => "LIKE",
            Self::IContains => "ILIKE",
            Self::WebsearchToTsquery => "@@",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::ContainedBy => "<@",
            Self::HasKey => "?",
            Self::HasAll => "?&",
            Self::HasAny => "?|",
            Self::Intersects => "&&",
            Self::IntersectsNd => "&&&",
            Self::Same => "~=",
            Self::Above => "|>>",
            Self::Below => "<<|",
        }
    }
}

///
/// TESTS
///
