//! Template walker
//!
//! Rewrites the expressions of parsed templates in place. Each template
//! (an element with `t-name`, or the whole document when none has one) is
//! compiled against the variables it binds itself plus the variables its
//! callers provide (`outside_vars`). Inheritance patches are compiled
//! against the variables of the template they patch (`inside_vars`).

use super::aggregate::TemplateVars;
use super::attributes::{
    classify_attribute, is_component, is_expression_patch, AttributeKind, ATTRIBUTE_PATCH_NAME,
    ATTRIBUTE_PATCH_TAG, CALL_CLAUSE, SKIP_XPATH_ATTRS, T_INHERIT, T_NAME, XPATH_EXPR, XPATH_TAG,
};
use super::bound_vars::collect_bound_variables;
use super::dynamic_string::process_dynamic_string;
use super::xpath::process_xpath_expr;
use crate::error::Result;
use crate::expression_parser::{compile_expr, BoundVariables};
use crate::ml_parser::{Document, Element};

type Compiler = fn(&str, &BoundVariables) -> Result<String>;

/// Apply `f` to `root` and every element below it that belongs to the same
/// template. Nested `t-name` elements are templates of their own.
fn visit_template_elements<F>(root: &mut Element, f: &mut F) -> Result<()>
where
    F: FnMut(&mut Element) -> Result<()>,
{
    f(root)?;
    for child in root.child_elements_mut() {
        if child.has_attr(T_NAME) {
            continue;
        }
        visit_template_elements(child, f)?;
    }
    Ok(())
}

/// Apply `f` to `root` and every element below it
fn visit_elements<F>(root: &mut Element, f: &mut F) -> Result<()>
where
    F: FnMut(&mut Element) -> Result<()>,
{
    f(root)?;
    for child in root.child_elements_mut() {
        visit_elements(child, f)?;
    }
    Ok(())
}

/// Compile the attributes of `element` selected by `select`
fn compile_attributes<S>(element: &mut Element, bound_variables: &BoundVariables, select: S) -> Result<()>
where
    S: Fn(&str) -> Option<Compiler>,
{
    let Element { name, attrs, .. } = element;
    let name: &str = name;
    for attr in attrs.iter_mut() {
        let Some(compile) = select(&attr.name) else {
            continue;
        };
        let compiled = compile(&attr.value, bound_variables).map_err(|e| e.in_attribute(name, &attr.name))?;
        if compiled != attr.value {
            log::trace!("<{} {}>: `{}` -> `{}`", name, attr.name, attr.value, compiled);
            attr.value = compiled;
        }
    }
    Ok(())
}

fn compiler_for(kind: AttributeKind) -> Compiler {
    if kind.is_dynamic_string() {
        process_dynamic_string
    } else {
        compile_expr
    }
}

/// Compile the attributes of one kind across a template
fn process_attributes_of_kind(root: &mut Element, bound_variables: &BoundVariables, kind: AttributeKind) -> Result<()> {
    visit_template_elements(root, &mut |element| {
        let component = is_component(element);
        compile_attributes(element, bound_variables, |name| {
            (classify_attribute(name, component) == Some(kind)).then(|| compiler_for(kind))
        })
    })
}

/// Compile the `t-att-*` attributes of a template
pub fn process_t_att_attributes(root: &mut Element, bound_variables: &BoundVariables) -> Result<()> {
    process_attributes_of_kind(root, bound_variables, AttributeKind::Att)
}

/// Compile the plain attributes of the components of a template as props
pub fn process_component_attributes(root: &mut Element, bound_variables: &BoundVariables) -> Result<()> {
    process_attributes_of_kind(root, bound_variables, AttributeKind::ComponentProp)
}

/// Compile the xpath selectors and attribute patches of the `t-inherit`
/// elements of a template.
fn process_inherited_patches(
    root: &mut Element,
    bound_variables: &BoundVariables,
    inside_vars: &TemplateVars,
) -> Result<()> {
    visit_template_elements(root, &mut |element| {
        let Some(target) = element.get_attr(T_INHERIT).map(str::to_string) else {
            return Ok(());
        };
        let inherit_vars: BoundVariables = inside_vars
            .get(&target)
            .map(|vars| vars.iter().cloned().collect())
            .unwrap_or_default();
        let patch_vars: BoundVariables = bound_variables.union(&inherit_vars).cloned().collect();
        log::trace!("patches of {} use {} inherited variables", target, inherit_vars.len());

        visit_elements(element, &mut |xpath| {
            if xpath.name != XPATH_TAG {
                return Ok(());
            }
            let Some(expr) = xpath.get_attr(XPATH_EXPR).map(str::to_string) else {
                return Ok(());
            };
            if !expr.is_empty() {
                compile_attributes(xpath, &inherit_vars, |name| {
                    (name == XPATH_EXPR).then_some(compile_selector as Compiler)
                })?;
            }
            process_attribute_patches(xpath, &expr, &patch_vars)
        })
    })
}

fn compile_selector(expr: &str, bound_variables: &BoundVariables) -> Result<String> {
    process_xpath_expr(expr, bound_variables, SKIP_XPATH_ATTRS)
}

fn compile_selector_without_calls(expr: &str, bound_variables: &BoundVariables) -> Result<String> {
    let mut skip = SKIP_XPATH_ATTRS.to_vec();
    skip.push(CALL_CLAUSE);
    process_xpath_expr(expr, bound_variables, &skip)
}

/// Compile the text of the `<attribute name="...">` patches of an xpath
fn process_attribute_patches(xpath: &mut Element, expr: &str, bound_variables: &BoundVariables) -> Result<()> {
    visit_elements(xpath, &mut |patch| {
        if patch.name != ATTRIBUTE_PATCH_TAG {
            return Ok(());
        }
        let Some(attribute) = patch.get_attr(ATTRIBUTE_PATCH_NAME).map(str::to_string) else {
            return Ok(());
        };
        if !is_expression_patch(&attribute, expr) {
            return Ok(());
        }
        let Some(text) = patch.text() else {
            return Ok(());
        };
        let compiled = compile_expr(text, bound_variables).map_err(|e| e.in_attribute(ATTRIBUTE_PATCH_TAG, &attribute))?;
        if compiled != text {
            log::trace!("<attribute name=\"{}\">: `{}` -> `{}`", attribute, text, compiled);
            patch.set_text(compiled);
        }
        Ok(())
    })
}

/// Rewrite every expression of one template.
///
/// Attribute kinds are disjoint: each attribute is compiled at most once.
pub fn fix_template(root: &mut Element, bound_variables: &BoundVariables, inside_vars: &TemplateVars) -> Result<()> {
    for kind in [
        AttributeKind::Directive,
        AttributeKind::Event,
        AttributeKind::DynamicString,
        AttributeKind::Att,
        AttributeKind::ComponentProp,
    ] {
        process_attributes_of_kind(root, bound_variables, kind)?;
    }
    process_inherited_patches(root, bound_variables, inside_vars)
}

/// Rewrite every template of a document
pub fn fix_rendering_context(document: &mut Document, outside_vars: &TemplateVars, inside_vars: &TemplateVars) -> Result<()> {
    let has_named_templates = document.elements().any(|element| element.has_attr(T_NAME));

    for root in document.root_elements_mut() {
        if has_named_templates {
            fix_named_templates(root, outside_vars, inside_vars)?;
        } else {
            let bound_variables = collect_bound_variables(root);
            log::debug!("fixing anonymous template <{}> ({} bound variables)", root.name, bound_variables.len());
            fix_template(root, &bound_variables, inside_vars)?;
        }
    }
    Ok(())
}

fn fix_named_templates(element: &mut Element, outside_vars: &TemplateVars, inside_vars: &TemplateVars) -> Result<()> {
    if let Some(name) = element.get_attr(T_NAME).map(str::to_string) {
        let mut bound_variables = collect_bound_variables(element);
        if let Some(vars) = outside_vars.get(&name) {
            bound_variables.extend(vars.iter().cloned());
        }
        log::debug!("fixing template {} ({} bound variables)", name, bound_variables.len());
        fix_template(element, &bound_variables, inside_vars)?;
    }

    // templates nested in this one, or below a non-template container
    for child in element.child_elements_mut() {
        fix_named_templates(child, outside_vars, inside_vars)?;
    }
    Ok(())
}

/// Rewrite only the xpath selectors of the patches whose target is a key of
/// `inside_vars`. `t-call` clauses are left alone.
pub fn fix_xpath_only(document: &mut Document, inside_vars: &TemplateVars) -> Result<()> {
    for root in document.root_elements_mut() {
        visit_elements(root, &mut |element| {
            let Some(vars) = element.get_attr(T_INHERIT).and_then(|target| inside_vars.get(target)) else {
                return Ok(());
            };
            let bound_variables: BoundVariables = vars.iter().cloned().collect();

            visit_elements(element, &mut |xpath| {
                if xpath.name != XPATH_TAG {
                    return Ok(());
                }
                compile_attributes(xpath, &bound_variables, |name| {
                    (name == XPATH_EXPR).then_some(compile_selector_without_calls as Compiler)
                })
            })
        })?;
    }
    Ok(())
}
