//! Corpus aggregation
//!
//! Before templates can be rewritten, the variables flowing between them
//! are collected over the whole corpus:
//!
//! - `outside_vars[name]`: variables set by `t-set` inside a `t-call` of
//!   template `name`, available to that template's body.
//! - `inside_vars[name]`: variables template `name` binds itself, available
//!   to the patches of templates inheriting from it.
//!
//! Both maps are merged across files, so they are kept ordered and
//! serializable.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::attributes::{
    T_AS, T_CALL, T_FOREACH, T_FOREACH_INDEX, T_FOR_EACH, T_INDEX, T_INHERIT, T_NAME, T_SET,
};
use super::bound_vars::expand_t_as;
use crate::ml_parser::{Document, Element};

/// Template name to variable names
pub type TemplateVars = IndexMap<String, BTreeSet<String>>;

const TEMPLATE_TAG: &str = "template";
const TEMPLATE_ID: &str = "id";

fn non_empty_attr<'a>(element: &'a Element, name: &str) -> Option<&'a str> {
    element.get_attr(name).map(str::trim).filter(|value| !value.is_empty())
}

/// Merge `other` into `vars`
pub fn merge_template_vars(vars: &mut TemplateVars, other: &TemplateVars) {
    for (name, names) in other {
        vars.entry(name.clone()).or_default().extend(names.iter().cloned());
    }
}

/// Record, for every `t-call` target, the `t-set` variables of the call
pub fn aggregate_call_vars(document: &Document, vars: &mut TemplateVars) {
    for call in document.elements() {
        let Some(target) = call.get_attr(T_CALL).filter(|target| !target.is_empty()) else {
            continue;
        };
        let names = vars.entry(target.to_string()).or_default();
        for element in call.descendants() {
            if let Some(name) = element.get_attr(T_SET).filter(|name| !name.is_empty()) {
                names.insert(name.to_string());
            }
        }
    }
}

/// Record, for every named template, the variables it binds itself.
///
/// Inheritance targets get an entry too, so that every template a patch
/// refers to is known after aggregation.
pub fn aggregate_inside_vars(document: &Document, inside_vars: &mut TemplateVars) {
    for template in document.elements() {
        if let Some(target) = non_empty_attr(template, T_INHERIT) {
            inside_vars.entry(target.to_string()).or_default();
        }

        let name = non_empty_attr(template, T_NAME).or_else(|| {
            (template.name == TEMPLATE_TAG)
                .then(|| non_empty_attr(template, TEMPLATE_ID))
                .flatten()
        });
        let Some(name) = name else {
            continue;
        };

        let names = inside_vars.entry(name.to_string()).or_default();
        for element in template.descendants() {
            if let Some(variable) = non_empty_attr(element, T_SET) {
                names.insert(variable.to_string());
            }
            if !element.has_attr(T_FOREACH) && !element.has_attr(T_FOR_EACH) {
                continue;
            }
            if let Some(variable) = non_empty_attr(element, T_AS) {
                names.extend(expand_t_as(variable));
            }
            if let Some(index) = non_empty_attr(element, T_FOREACH_INDEX).or_else(|| non_empty_attr(element, T_INDEX)) {
                names.insert(index.to_string());
            }
        }
    }
}

/// Both maps of a corpus, as exchanged between runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusVars {
    pub outside_vars: TemplateVars,
    pub inside_vars: TemplateVars,
}

impl CorpusVars {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn merge(&mut self, other: &CorpusVars) {
        merge_template_vars(&mut self.outside_vars, &other.outside_vars);
        merge_template_vars(&mut self.inside_vars, &other.inside_vars);
    }

    pub fn aggregate(&mut self, document: &Document) {
        aggregate_document(document, &mut self.outside_vars, &mut self.inside_vars);
    }
}

/// Run both aggregations over one document
pub fn aggregate_document(document: &Document, vars: &mut TemplateVars, inside_vars: &mut TemplateVars) {
    aggregate_call_vars(document, vars);
    aggregate_inside_vars(document, inside_vars);
    log::debug!(
        "{}: {} call targets, {} templates",
        document.file.url,
        vars.len(),
        inside_vars.len()
    );
}
