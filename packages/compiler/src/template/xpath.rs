//! XPath selector clauses
//!
//! A patch selects nodes of the inherited template by their directive
//! values (`//t[@t-if='state.items']`). Those values are expressions of the
//! inherited template and are compiled like the attribute they match.

use super::attributes::{CALL_CLAUSE, T_ATTR_REGEXP};
use super::dynamic_string::process_dynamic_string;
use crate::error::Result;
use crate::expression_parser::{compile_expr, BoundVariables};

/// Compile the `@t-<name>='...'` clauses of an xpath expression.
///
/// Clauses whose name is in `skip_attrs` are left alone; `t-call` clauses
/// are dynamic strings.
pub fn process_xpath_expr(expr: &str, bound_variables: &BoundVariables, skip_attrs: &[&str]) -> Result<String> {
    let mut result = String::with_capacity(expr.len() + 16);
    let mut copied = 0;

    for captures in T_ATTR_REGEXP.captures_iter(expr) {
        let (Some(name), Some(value)) = (captures.get(1), captures.get(2)) else {
            continue;
        };
        if skip_attrs.contains(&name.as_str()) {
            continue;
        }

        let compiled = if name.as_str() == CALL_CLAUSE {
            process_dynamic_string(value.as_str(), bound_variables)?
        } else {
            compile_expr(value.as_str(), bound_variables)?
        };
        result.push_str(&expr[copied..value.start()]);
        result.push_str(&compiled);
        copied = value.end();
    }

    result.push_str(&expr[copied..]);
    Ok(result)
}
