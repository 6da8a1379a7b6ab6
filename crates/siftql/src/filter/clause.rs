use crate::{
    catalog::FieldCatalog,
    error::{CompileError, ErrorKind, TreePath},
    filter::Clause,
    ops::{FilterOp, OperandArity, OperandClass},
    path::{FieldPath, resolve_field},
    policy::Limits,
    predicate::LeafPredicate,
    value::{Literal, Operand},
};

///
/// CompileContext
///
/// Read-only per-request compilation inputs, threaded through the recursive
/// walk. Nothing here is mutated; concurrent compilations share nothing.
///

pub(crate) struct CompileContext<'a> {
    pub catalog: &'a dyn FieldCatalog,
    pub model: &'a str,
    pub limits: &'a Limits,
}

/// Validate one clause and emit its leaf predicate.
///
/// Order of checks: field resolution, operand arity, operator/field-type
/// compatibility, operand coercion. The bound value is carried verbatim on
/// the leaf; it is never spliced into SQL text.
pub(crate) fn compile_clause(
    cx: &CompileContext<'_>,
    clause: &Clause,
    path: &TreePath,
) -> Result<LeafPredicate, CompileError> {
    let clause_path = path.child(&clause.field);
    let field = resolve_field(cx.catalog, cx.model, &clause.field, &clause_path)?;
    let op_path = clause_path.child(clause.op.token());

    check_arity(clause.op, &clause.operand, &op_path)?;
    check_field_support(clause.op, &field, &op_path)?;
    coerce_operand(cx, clause.op, &field, &clause.operand, &op_path)?;

    Ok(LeafPredicate {
        field,
        op: clause.op,
        value: clause.operand.clone(),
    })
}

fn check_arity(op: FilterOp, operand: &Operand, path: &TreePath) -> Result<(), CompileError> {
    let message = match (op.arity(), operand) {
        (OperandArity::Array, Operand::One(_)) => "array operand required but scalar given",
        (OperandArity::Scalar, Operand::Many(_)) => "scalar operand required but array given",
        _ => return Ok(()),
    };

    Err(CompileError::operand_arity(path, op.token(), message))
}

// Operator/field-kind compatibility. Opaque nested paths are exempt: their
// leaf type is unknown to the catalog and belongs to the backend.
fn check_field_support(
    op: FilterOp,
    field: &FieldPath,
    path: &TreePath,
) -> Result<(), CompileError> {
    if field.is_opaque() || op.supports_field(field.kind()) {
        return Ok(());
    }

    Err(CompileError::new(
        path.clone(),
        ErrorKind::UnsupportedOperator {
            op: op.token().to_string(),
            field: field.to_string(),
            kind: field.kind().label().to_string(),
        },
    ))
}

fn coerce_operand(
    cx: &CompileContext<'_>,
    op: FilterOp,
    field: &FieldPath,
    operand: &Operand,
    path: &TreePath,
) -> Result<(), CompileError> {
    match operand {
        Operand::One(literal) => coerce_scalar(op, field, literal, path),
        Operand::Many(items) => {
            if items.is_empty() {
                return Err(CompileError::operand_arity(
                    path,
                    op.token(),
                    "array operand must be non-empty",
                ));
            }
            if items.len() > cx.limits.max_operands {
                return Err(CompileError::operand_arity(
                    path,
                    op.token(),
                    format!(
                        "array operand exceeds maximum length {}",
                        cx.limits.max_operands
                    ),
                ));
            }

            let first_class = items[0].class_label();
            for (index, literal) in items.iter().enumerate() {
                let item_path = path.index(index);
                if literal.is_null() {
                    return Err(CompileError::invalid_literal(
                        &item_path,
                        "null is not accepted inside array operands",
                    ));
                }
                if literal.class_label() != first_class {
                    return Err(CompileError::invalid_literal(
                        &item_path,
                        format!(
                            "heterogeneous array operand: {} vs {first_class}",
                            literal.class_label()
                        ),
                    ));
                }
                coerce_class(op, field, literal, &item_path)?;
            }

            Ok(())
        }
    }
}

fn coerce_scalar(
    op: FilterOp,
    field: &FieldPath,
    literal: &Literal,
    path: &TreePath,
) -> Result<(), CompileError> {
    if literal.is_null() {
        if op.allows_null() {
            return Ok(());
        }

        return Err(CompileError::invalid_literal(
            path,
            "null is only accepted for *eq and *neq",
        ));
    }

    coerce_class(op, field, literal, path)
}

fn coerce_class(
    op: FilterOp,
    field: &FieldPath,
    literal: &Literal,
    path: &TreePath,
) -> Result<(), CompileError> {
    match op.operand_class(field.kind()) {
        OperandClass::Text => {
            if literal.is_text() {
                Ok(())
            } else {
                Err(CompileError::invalid_literal(
                    path,
                    format!("expected text literal, got {}", literal.class_label()),
                ))
            }
        }
        OperandClass::NumericOrTemporal => {
            if literal.is_numeric() || literal.is_temporal() {
                Ok(())
            } else {
                Err(CompileError::invalid_literal(
                    path,
                    format!(
                        "expected numeric or datetime literal, got {}",
                        literal.class_label()
                    ),
                ))
            }
        }
        OperandClass::Field => {
            if field.is_opaque() || literal.matches_field(field.kind()) {
                Ok(())
            } else {
                Err(CompileError::invalid_literal(
                    path,
                    format!(
                        "literal of class {} does not match field type {}",
                        literal.class_label(),
                        field.kind()
                    ),
                ))
            }
        }
    }
}
