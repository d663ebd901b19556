//! Bound-variable collection
//!
//! Variables a template introduces for its own expressions: `t-set` and
//! `t-slot-scope` names, and loop variables with their companions.

use super::attributes::{T_AS, T_NAME, T_SET, T_SLOT_SCOPE};
use crate::expression_parser::BoundVariables;
use crate::ml_parser::Element;

const LOOP_COMPANION_SUFFIXES: &[&str] = &["_index", "_first", "_last", "_value"];

/// A loop variable and the companions the loop defines along with it
pub fn expand_t_as(name: &str) -> Vec<String> {
    std::iter::once(name.to_string())
        .chain(LOOP_COMPANION_SUFFIXES.iter().map(|suffix| format!("{name}{suffix}")))
        .collect()
}

/// Collect the variables bound in `root`, `root` included. Templates
/// nested under `root` (`t-name`) have their own scope and are skipped.
pub fn collect_bound_variables(root: &Element) -> BoundVariables {
    let mut bound = BoundVariables::new();
    collect_into(root, &mut bound);
    bound
}

fn collect_into(element: &Element, bound: &mut BoundVariables) {
    for attr in [T_SET, T_SLOT_SCOPE] {
        if let Some(name) = element.get_attr(attr).filter(|name| !name.is_empty()) {
            bound.insert(name.to_string());
        }
    }
    if let Some(name) = element.get_attr(T_AS).filter(|name| !name.is_empty()) {
        bound.extend(expand_t_as(name));
    }

    for child in element.child_elements().filter(|child| !child.has_attr(T_NAME)) {
        collect_into(child, bound);
    }
}
