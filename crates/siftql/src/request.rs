//! Request-level validation and assembly.
//!
//! Validates pagination bounds, resolves requested output columns and sort
//! keys, hands the `where` subtree to the grouping compiler, and assembles
//! the compiled request consumed by the execution layer.

use crate::{
    catalog::FieldCatalog,
    error::{CompileError, ErrorKind, TreePath},
    filter::{compile_filter, decode_filter},
    obs,
    path::{FieldPath, resolve_field},
    policy::Limits,
    predicate::Predicate,
};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;

///
/// Request
///
/// The raw, JSON-shaped query request. Pagination fields are decoded as
/// signed integers so out-of-range values surface as `InvalidPagination`
/// instead of a deserialization fault.
///

#[derive(Clone, Debug, Deserialize)]
pub struct Request {
    pub page: i64,
    pub limit: i64,

    #[serde(default)]
    pub columns: Option<Vec<String>>,

    #[serde(default)]
    pub sort: Option<Vec<SortParam>>,

    #[serde(default, rename = "where")]
    pub where_: Option<JsonValue>,
}

impl Request {
    /// Decode a request from its JSON wire form.
    pub fn from_value(value: &JsonValue) -> Result<Self, CompileError> {
        Self::deserialize(value).map_err(|err| {
            CompileError::new(
                TreePath::root(),
                ErrorKind::MalformedRequest {
                    message: err.to_string(),
                },
            )
        })
    }
}

///
/// SortParam
///
/// One requested sort key in wire form.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct SortParam {
    pub key: String,
    pub desc: bool,
}

///
/// SortSpec
///
/// One validated sort key: resolved field plus direction.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SortSpec {
    pub field: FieldPath,
    pub desc: bool,
}

///
/// CompiledRequest
///
/// The validated, compiled request. `columns` empty means "all columns";
/// `predicate` is `True` when the request carried no `where` tree.
///

#[derive(Clone, Debug, PartialEq)]
pub struct CompiledRequest {
    pub model: String,
    pub page: u64,
    pub limit: u32,
    pub columns: Vec<FieldPath>,
    pub sort: Vec<SortSpec>,
    pub predicate: Predicate,
}

/// Validate and compile a request against `model`.
///
/// Fail-fast: the first structured error encountered is returned and no
/// partial output exists. The call is pure apart from the `obs` counters.
pub fn compile_request(
    catalog: &dyn FieldCatalog,
    model: &str,
    request: &Request,
    limits: &Limits,
) -> Result<CompiledRequest, CompileError> {
    let compiled = compile_request_inner(catalog, model, request, limits);

    match &compiled {
        Ok(_) => obs::record_compiled(model),
        Err(_) => obs::record_rejected(model),
    }

    compiled
}

/// Decode a JSON value into a [`Request`] and compile it in one step.
pub fn compile_request_value(
    catalog: &dyn FieldCatalog,
    model: &str,
    value: &JsonValue,
    limits: &Limits,
) -> Result<CompiledRequest, CompileError> {
    let request = Request::from_value(value)?;

    compile_request(catalog, model, &request, limits)
}

fn compile_request_inner(
    catalog: &dyn FieldCatalog,
    model: &str,
    request: &Request,
    limits: &Limits,
) -> Result<CompiledRequest, CompileError> {
    // Model names reach the FROM clause; gate both existence and charset.
    if !catalog.has_model(model) || !crate::path::is_identifier(model) {
        return Err(CompileError::new(
            TreePath::root(),
            ErrorKind::UnknownModel {
                model: model.to_string(),
            },
        ));
    }

    let page = validate_page(request.page)?;
    let limit = validate_limit(request.limit, limits)?;
    let columns = validate_columns(catalog, model, request.columns.as_deref())?;
    let sort = validate_sort(catalog, model, request.sort.as_deref())?;

    let predicate = match &request.where_ {
        Some(tree) => {
            let node = decode_filter(tree, limits)?;
            compile_filter(catalog, model, &node, limits)?
        }
        None => Predicate::True,
    };

    Ok(CompiledRequest {
        model: model.to_string(),
        page,
        limit,
        columns,
        sort,
        predicate,
    })
}

fn validate_page(page: i64) -> Result<u64, CompileError> {
    u64::try_from(page)
        .map_err(|_| CompileError::invalid_pagination(&TreePath::top("page"), "page must be >= 0"))
}

fn validate_limit(limit: i64, limits: &Limits) -> Result<u32, CompileError> {
    let path = TreePath::top("limit");

    if limit < 1 {
        return Err(CompileError::invalid_pagination(
            &path,
            "limit must be >= 1",
        ));
    }
    if limit > i64::from(limits.max_limit) {
        return Err(CompileError::invalid_pagination(
            &path,
            format!("limit must be <= {}", limits.max_limit),
        ));
    }

    u32::try_from(limit)
        .map_err(|_| CompileError::invalid_pagination(&path, "limit is out of range"))
}

fn validate_columns(
    catalog: &dyn FieldCatalog,
    model: &str,
    columns: Option<&[String]>,
) -> Result<Vec<FieldPath>, CompileError> {
    let Some(columns) = columns else {
        return Ok(Vec::new());
    };

    let base = TreePath::top("columns");
    let mut seen = BTreeSet::new();
    let mut resolved = Vec::with_capacity(columns.len());

    for (index, name) in columns.iter().enumerate() {
        let path = base.index(index);
        if !seen.insert(name.as_str()) {
            return Err(CompileError::new(
                path,
                ErrorKind::DuplicateColumn { name: name.clone() },
            ));
        }
        resolved.push(resolve_field(catalog, model, name, &path)?);
    }

    Ok(resolved)
}

fn validate_sort(
    catalog: &dyn FieldCatalog,
    model: &str,
    sort: Option<&[SortParam]>,
) -> Result<Vec<SortSpec>, CompileError> {
    let Some(sort) = sort else {
        return Ok(Vec::new());
    };

    let base = TreePath::top("sort");
    let mut seen = BTreeSet::new();
    let mut resolved = Vec::with_capacity(sort.len());

    for (index, param) in sort.iter().enumerate() {
        let path = base.index(index).child("key");
        if !seen.insert(param.key.as_str()) {
            return Err(CompileError::new(
                path,
                ErrorKind::DuplicateSortKey {
                    key: param.key.clone(),
                },
            ));
        }

        let field = resolve_field(catalog, model, &param.key, &path)?;
        resolved.push(SortSpec {
            field,
            desc: param.desc,
        });
    }

    Ok(resolved)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldDescriptor, FieldKind, ModelCatalog};
    use serde_json::json;

    fn catalog() -> ModelCatalog {
        ModelCatalog::new().with_model(
            "user",
            [
                FieldDescriptor::new("id", FieldKind::Uint),
                FieldDescriptor::new("age", FieldKind::Uint),
                FieldDescriptor::new("name", FieldKind::Text),
            ],
        )
    }

    fn compile(value: JsonValue) -> Result<CompiledRequest, CompileError> {
        compile_request_value(&catalog(), "user", &value, &Limits::default())
    }

    #[test]
    fn minimal_request_compiles_with_true_predicate() {
        let compiled = compile(json!({"page": 0, "limit": 25})).unwrap();

        assert_eq!(compiled.model, "user");
        assert_eq!(compiled.page, 0);
        assert_eq!(compiled.limit, 25);
        assert!(compiled.columns.is_empty());
        assert!(compiled.sort.is_empty());
        assert_eq!(compiled.predicate, Predicate::True);
    }

    #[test]
    fn unknown_model_is_rejected() {
        let err = compile_request_value(
            &catalog(),
            "invoice",
            &json!({"page": 0, "limit": 10}),
            &Limits::default(),
        )
        .unwrap_err();

        assert!(matches!(err.kind, ErrorKind::UnknownModel { .. }));
    }

    #[test]
    fn negative_page_is_invalid_pagination() {
        let err = compile(json!({"page": -1, "limit": 25})).unwrap_err();

        assert!(matches!(err.kind, ErrorKind::InvalidPagination { .. }));
        assert_eq!(err.path.to_string(), "page");
    }

    #[test]
    fn limit_bounds_are_enforced() {
        let zero = compile(json!({"page": 0, "limit": 0})).unwrap_err();
        assert!(matches!(zero.kind, ErrorKind::InvalidPagination { .. }));

        let over = compile(json!({"page": 0, "limit": 100_000})).unwrap_err();
        assert!(matches!(over.kind, ErrorKind::InvalidPagination { .. }));
        assert_eq!(over.path.to_string(), "limit");
    }

    #[test]
    fn duplicate_sort_key_is_rejected() {
        let err = compile(json!({
            "page": 0, "limit": 10,
            "sort": [{"key": "age", "desc": true}, {"key": "age", "desc": false}],
        }))
        .unwrap_err();

        assert_eq!(
            err.kind,
            ErrorKind::DuplicateSortKey {
                key: "age".to_string()
            }
        );
        assert_eq!(err.path.to_string(), "sort[1].key");
    }

    #[test]
    fn unknown_sort_key_is_rejected() {
        let err = compile(json!({
            "page": 0, "limit": 10,
            "sort": [{"key": "salary", "desc": false}],
        }))
        .unwrap_err();

        assert!(matches!(err.kind, ErrorKind::UnknownField { .. }));
    }

    #[test]
    fn duplicate_column_is_rejected() {
        let err = compile(json!({
            "page": 0, "limit": 10,
            "columns": ["age", "name", "age"],
        }))
        .unwrap_err();

        assert_eq!(
            err.kind,
            ErrorKind::DuplicateColumn {
                name: "age".to_string()
            }
        );
        assert_eq!(err.path.to_string(), "columns[2]");
    }

    #[test]
    fn full_request_assembles_all_parts() {
        let compiled = compile(json!({
            "page": 2, "limit": 50,
            "columns": ["id", "name"],
            "sort": [{"key": "age", "desc": true}, {"key": "id", "desc": false}],
            "where": {"*and": [
                {"age": {"*gte": 21}},
                {"name": {"*startswith": "a"}},
            ]},
        }))
        .unwrap();

        assert_eq!(compiled.page, 2);
        assert_eq!(compiled.limit, 50);
        assert_eq!(compiled.columns.len(), 2);
        assert_eq!(compiled.sort.len(), 2);
        assert!(compiled.sort[0].desc);
        assert!(matches!(compiled.predicate, Predicate::And(_)));
    }

    #[test]
    fn non_numeric_pagination_is_a_malformed_request() {
        let err = compile(json!({"page": 0, "limit": "ten"})).unwrap_err();

        assert!(matches!(err.kind, ErrorKind::MalformedRequest { .. }));
    }

    #[test]
    fn compilation_is_deterministic_for_full_requests() {
        let request = json!({
            "page": 0, "limit": 10,
            "sort": [{"key": "age", "desc": false}],
            "where": {"*or": [
                {"age": {"*in_": [1, 2, 3]}},
                {"*not": {"name": {"*eq": null}}},
            ]},
        });

        assert_eq!(compile(request.clone()), compile(request));
    }
}
