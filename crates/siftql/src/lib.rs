//! Core runtime for siftql: a validator and compiler that turns JSON-shaped
//! `where` trees, sort keys, and pagination into a backend-agnostic predicate
//! tree plus a parameterized SQL fragment.
//!
//! ## Crate layout
//! - `catalog`: field catalog surface consumed per request.
//! - `filter`: filter-node decoding, clause validation, and the grouping compiler.
//! - `ops`: the operator registry.
//! - `path`: dotted-path resolution against the catalog.
//! - `predicate`: the compiled predicate tree and its normalization pass.
//! - `request`: request-level validation and assembly.
//! - `sql`: parameterized rendering of compiled requests.
//! - `value`: literal decoding and operand coercion.
//!
//! Compilation is pure: identical input always yields a structurally identical
//! compiled tree, and no call mutates shared state beyond the `obs` counters.

pub mod catalog;
pub mod error;
pub mod filter;
pub mod obs;
pub mod ops;
pub mod path;
pub mod policy;
pub mod predicate;
pub mod request;
pub mod sql;
pub mod value;

pub use error::{CompileError, ErrorKind};
pub use policy::Limits;
pub use request::{CompiledRequest, Request, compile_request, compile_request_value};

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No renderers, counters, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        catalog::{FieldCatalog, FieldDescriptor, FieldKind, ModelCatalog},
        error::{CompileError, ErrorKind},
        filter::{FieldRef, FilterNode},
        ops::FilterOp,
        policy::Limits,
        predicate::Predicate,
        request::{CompiledRequest, Request, SortParam, compile_request},
        value::{Literal, Operand},
    };
}
