//! Parameterized SQL rendering.
//!
//! Renders a compiled request into a single SQL statement with numbered `$n`
//! placeholders. Bound values are emitted as a parameter list next to the
//! text; user-controlled strings never appear inside the SQL itself. Text
//! pattern operators (`*startswith`, `*endswith`, `*contains` on text,
//! `*icontains`) rewrite the *parameter* — escaping `%`/`_`/`\` in the user
//! payload, then adding the wildcard — so operands cannot smuggle wildcards
//! or escape characters into the match.
//!
//! Nested sub-paths render as `->` chains (`address->'city'`); every segment
//! passed identifier validation during path resolution.

use crate::{
    ops::FilterOp,
    path::FieldPath,
    predicate::{LeafPredicate, Predicate},
    request::CompiledRequest,
    value::{Literal, Operand},
};

///
/// SqlFragment
///
/// SQL text plus its positional parameters, 1-based `$n`.
///

#[derive(Clone, Debug, PartialEq)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<Operand>,
}

/// Render a predicate tree into a boolean SQL expression.
#[must_use]
pub fn render_predicate(predicate: &Predicate) -> SqlFragment {
    let mut writer = SqlWriter::default();
    writer.write_predicate(predicate);

    writer.finish()
}

/// Render a compiled request into a full SELECT statement.
///
/// `page`/`limit` were validated against configured ceilings and are written
/// inline; everything operand-shaped is parameterized.
#[must_use]
pub fn render_request(request: &CompiledRequest) -> SqlFragment {
    let mut writer = SqlWriter::default();

    writer.push("SELECT ");
    if request.columns.is_empty() {
        writer.push("*");
    } else {
        for (index, column) in request.columns.iter().enumerate() {
            if index > 0 {
                writer.push(", ");
            }
            writer.push(&column_sql(column));
        }
    }

    writer.push(" FROM ");
    writer.push(&request.model);
    writer.push(" WHERE ");
    writer.write_predicate(&request.predicate);

    if !request.sort.is_empty() {
        writer.push(" ORDER BY ");
        for (index, sort) in request.sort.iter().enumerate() {
            if index > 0 {
                writer.push(", ");
            }
            writer.push(&column_sql(&sort.field));
            writer.push(if sort.desc { " DESC" } else { " ASC" });
        }
    }

    let offset = request.page.saturating_mul(u64::from(request.limit));
    writer.push(&format!(" LIMIT {} OFFSET {offset}", request.limit));

    writer.finish()
}

///
/// SqlWriter
///
/// Accumulates SQL text and the parameter list; `bind` is the only way a
/// value reaches the output.
///

#[derive(Default)]
struct SqlWriter {
    sql: String,
    params: Vec<Operand>,
}

impl SqlWriter {
    fn push(&mut self, text: &str) {
        self.sql.push_str(text);
    }

    // Register a parameter and write its placeholder.
    fn bind(&mut self, param: Operand) {
        self.params.push(param);
        self.push(&format!("${}", self.params.len()));
    }

    fn finish(self) -> SqlFragment {
        SqlFragment {
            sql: self.sql,
            params: self.params,
        }
    }

    fn write_predicate(&mut self, predicate: &Predicate) {
        match predicate {
            Predicate::True => self.push("TRUE"),
            Predicate::False => self.push("FALSE"),
            Predicate::And(children) => self.write_group(children, " AND ", "TRUE"),
            Predicate::Or(children) => self.write_group(children, " OR ", "FALSE"),
            Predicate::Not(inner) => {
                self.push("NOT (");
                self.write_predicate(inner);
                self.push(")");
            }
            Predicate::Leaf(leaf) => self.write_leaf(leaf),
        }
    }

    fn write_group(&mut self, children: &[Predicate], joiner: &str, identity: &str) {
        if children.is_empty() {
            self.push(identity);
            return;
        }

        self.push("(");
        for (index, child) in children.iter().enumerate() {
            if index > 0 {
                self.push(joiner);
            }
            self.write_predicate(child);
        }
        self.push(")");
    }

    fn write_leaf(&mut self, leaf: &LeafPredicate) {
        let column = column_sql(&leaf.field);

        match (leaf.op, &leaf.value) {
            (FilterOp::Eq, Operand::One(Literal::Null)) => {
                self.push(&column);
                self.push(" IS NULL");
            }
            (FilterOp::Neq, Operand::One(Literal::Null)) => {
                self.push(&column);
                self.push(" IS NOT NULL");
            }
            (FilterOp::In, Operand::Many(items)) => {
                self.push(&column);
                self.push(" IN (");
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        self.push(", ");
                    }
                    self.bind(Operand::One(item.clone()));
                }
                self.push(")");
            }
            (FilterOp::WebsearchToTsquery, value) => {
                self.push("to_tsvector(");
                self.push(&column);
                self.push(") @@ websearch_to_tsquery(");
                self.bind(value.clone());
                self.push(")");
            }
            (FilterOp::StartsWith, Operand::One(Literal::Text(text))) => {
                let pattern = format!("{}%", escape_like(text));
                self.write_pattern(&column, "LIKE", pattern);
            }
            (FilterOp::EndsWith, Operand::One(Literal::Text(text))) => {
                let pattern = format!("%{}", escape_like(text));
                self.write_pattern(&column, "LIKE", pattern);
            }
            (FilterOp::IContains, Operand::One(Literal::Text(text))) => {
                let pattern = format!("%{}%", escape_like(text));
                self.write_pattern(&column, "ILIKE", pattern);
            }
            (FilterOp::Contains, Operand::One(Literal::Text(text)))
                if leaf.field.kind().is_text() && !leaf.field.is_opaque() =>
            {
                let pattern = format!("%{}%", escape_like(text));
                self.write_pattern(&column, "LIKE", pattern);
            }
            (op, value) => {
                self.push(&column);
                self.push(" ");
                self.push(op.sql_symbol(leaf.field.kind()));
                self.push(" ");
                self.bind(value.clone());
            }
        }
    }

    // Pattern comparisons escape the payload, so the ESCAPE character is
    // pinned explicitly rather than left to backend defaults.
    fn write_pattern(&mut self, column: &str, operator: &str, pattern: String) {
        self.push(column);
        self.push(" ");
        self.push(operator);
        self.push(" ");
        self.bind(Operand::One(Literal::Text(pattern)));
        self.push(" ESCAPE '\\'");
    }
}

fn column_sql(field: &FieldPath) -> String {
    let mut out = String::from(field.root());
    for segment in field.nested_segments() {
        out.push_str("->'");
        out.push_str(segment);
        out.push('\'');
    }

    out
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }

    out
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{FieldDescriptor, FieldKind, ModelCatalog},
        filter::{compile_filter, decode_filter},
        policy::Limits,
        request::compile_request_value,
    };
    use serde_json::{Value as JsonValue, json};

    fn catalog() -> ModelCatalog {
        ModelCatalog::new().with_model(
            "user",
            [
                FieldDescriptor::new("id", FieldKind::Uint),
                FieldDescriptor::new("age", FieldKind::Uint),
                FieldDescriptor::new("name", FieldKind::Text),
                FieldDescriptor::new("bio", FieldKind::Text),
                FieldDescriptor::nested("tags", FieldKind::Json),
                FieldDescriptor::nested("address", FieldKind::Json),
            ],
        )
    }

    fn render(filter: &JsonValue) -> SqlFragment {
        let limits = Limits::default();
        let node = decode_filter(filter, &limits).unwrap();
        let predicate = compile_filter(&catalog(), "user", &node, &limits).unwrap();

        render_predicate(&predicate)
    }

    #[test]
    fn binary_comparison_is_parameterized() {
        let fragment = render(&json!({"age": {"*gt": 21}}));

        assert_eq!(fragment.sql, "age > $1");
        assert_eq!(fragment.params, vec![Operand::One(Literal::Int(21))]);
    }

    #[test]
    fn null_equality_renders_is_null_without_params() {
        let eq = render(&json!({"name": {"*eq": null}}));
        assert_eq!(eq.sql, "name IS NULL");
        assert!(eq.params.is_empty());

        let neq = render(&json!({"name": {"*neq": null}}));
        assert_eq!(neq.sql, "name IS NOT NULL");
    }

    #[test]
    fn in_list_expands_one_placeholder_per_element() {
        let fragment = render(&json!({"age": {"*in_": [1, 2, 3]}}));

        assert_eq!(fragment.sql, "age IN ($1, $2, $3)");
        assert_eq!(fragment.params.len(), 3);
    }

    #[test]
    fn startswith_escapes_payload_and_suffixes_wildcard() {
        let fragment = render(&json!({"name": {"*startswith": "50%_a"}}));

        assert_eq!(fragment.sql, "name LIKE $1 ESCAPE '\\'");
        assert_eq!(
            fragment.params,
            vec![Operand::One(Literal::Text("50\\%\\_a%".to_string()))]
        );
    }

    #[test]
    fn icontains_wraps_both_sides() {
        let fragment = render(&json!({"name": {"*icontains": "an"}}));

        assert_eq!(fragment.sql, "name ILIKE $1 ESCAPE '\\'");
        assert_eq!(
            fragment.params,
            vec![Operand::One(Literal::Text("%an%".to_string()))]
        );
    }

    #[test]
    fn contains_on_json_field_is_structural() {
        let fragment = render(&json!({"tags": {"*contains": "admin"}}));

        assert_eq!(fragment.sql, "tags @> $1");
    }

    #[test]
    fn has_any_binds_the_whole_array_once() {
        let fragment = render(&json!({"tags": {"*has_any": ["a", "b"]}}));

        assert_eq!(fragment.sql, "tags ?| $1");
        assert_eq!(
            fragment.params,
            vec![Operand::Many(vec![
                Literal::from("a"),
                Literal::from("b"),
            ])]
        );
    }

    #[test]
    fn websearch_renders_the_function_pair() {
        let fragment = render(&json!({"bio": {"*websearch_to_tsquery": "rust compilers"}}));

        assert_eq!(
            fragment.sql,
            "to_tsvector(bio) @@ websearch_to_tsquery($1)"
        );
    }

    #[test]
    fn nested_paths_render_as_arrow_chains() {
        let fragment = render(&json!({"address.geo.lat": {"*eq": 52}}));

        assert_eq!(fragment.sql, "address->'geo'->'lat' = $1");
    }

    #[test]
    fn groups_nest_with_parentheses_and_running_placeholders() {
        let fragment = render(&json!({"*or": [
            {"age": {"*gte": 18}},
            {"*and": [
                {"name": {"*eq": "ana"}},
                {"*not": {"age": {"*eq": 99}}},
            ]},
        ]}));

        assert_eq!(
            fragment.sql,
            "(age >= $1 OR (name = $2 AND NOT (age = $3)))"
        );
        assert_eq!(fragment.params.len(), 3);
    }

    #[test]
    fn full_request_renders_select_order_and_pagination() {
        let compiled = compile_request_value(
            &catalog(),
            "user",
            &json!({
                "page": 2, "limit": 50,
                "columns": ["id", "name"],
                "sort": [{"key": "age", "desc": true}, {"key": "id", "desc": false}],
                "where": {"age": {"*gte": 21}},
            }),
            &Limits::default(),
        )
        .unwrap();

        let fragment = render_request(&compiled);
        assert_eq!(
            fragment.sql,
            "SELECT id, name FROM user WHERE age >= $1 \
             ORDER BY age DESC, id ASC LIMIT 50 OFFSET 100"
        );
        assert_eq!(fragment.params, vec![Operand::One(Literal::Int(21))]);
    }

    #[test]
    fn request_without_filter_renders_true_predicate() {
        let compiled = compile_request_value(
            &catalog(),
            "user",
            &json!({"page": 0, "limit": 10}),
            &Limits::default(),
        )
        .unwrap();

        let fragment = render_request(&compiled);
        assert_eq!(fragment.sql, "SELECT * FROM user WHERE TRUE LIMIT 10 OFFSET 0");
        assert!(fragment.params.is_empty());
    }
}
