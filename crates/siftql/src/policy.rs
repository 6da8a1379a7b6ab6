//! Compilation ceilings for attacker-controlled input.
//!
//! The grouping compiler and the value coercer enforce these limits; nothing
//! else in the crate re-checks them. Callers bound total validation latency by
//! bounding input size, not by interrupting in-flight work.

///
/// CONSTANTS
///

/// Default maximum nesting depth of a `where` tree.
pub const DEFAULT_MAX_DEPTH: u32 = 32;

/// Default ceiling for the `limit` pagination parameter.
pub const DEFAULT_MAX_LIMIT: u32 = 1_000;

/// Default maximum length of an array operand.
pub const DEFAULT_MAX_OPERANDS: usize = 128;

///
/// Limits
///
/// Caller-configurable compilation ceilings. All three are configuration, not
/// hard-coded checks, so deployments can tighten them per surface.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Limits {
    /// Maximum nesting depth of the filter tree before `FilterTooDeep`.
    pub max_depth: u32,

    /// Upper bound for the pagination `limit` parameter.
    pub max_limit: u32,

    /// Maximum number of elements in an array operand.
    pub max_operands: usize,
}

impl Limits {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_limit: DEFAULT_MAX_LIMIT,
            max_operands: DEFAULT_MAX_OPERANDS,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new()
    }
}
