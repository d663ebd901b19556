//! Template Module
//!
//! Finds the expressions of QWeb/OWL templates and rewrites them with the
//! expression compiler.

pub mod aggregate;
pub mod attributes;
pub mod bound_vars;
pub mod dynamic_string;
pub mod walker;
pub mod xpath;

pub use aggregate::{
    aggregate_call_vars, aggregate_document, aggregate_inside_vars, merge_template_vars, CorpusVars, TemplateVars,
};
pub use bound_vars::{collect_bound_variables, expand_t_as};
pub use dynamic_string::process_dynamic_string;
pub use walker::{fix_rendering_context, fix_template, fix_xpath_only, process_component_attributes, process_t_att_attributes};
pub use xpath::process_xpath_expr;
