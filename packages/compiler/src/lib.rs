#![deny(clippy::all)]

/**
 * QWeb Template Compiler
 *
 * Rewrites the expressions embedded in QWeb/OWL templates so that every
 * free identifier becomes an explicit member access on the rendering
 * context (`foo` becomes `this.foo`).
 */

pub mod chars;
pub mod error;
pub mod parse_util;

pub mod expression_parser;
pub mod ml_parser;
pub mod template;

pub use error::{CompileError, Result};
pub use expression_parser::{compile_expr, BoundVariables};
pub use ml_parser::Document;
pub use template::{process_dynamic_string, process_xpath_expr, CorpusVars, TemplateVars};

const TEMPLATE_URL: &str = "template.xml";

/// Rewrite every template of one file.
///
/// `outside_vars` and `inside_vars` come from [`aggregate_vars`] run over
/// the whole corpus beforehand. The output is the input with only the
/// rewritten expressions changed.
pub fn update_template(content: &str, outside_vars: &TemplateVars, inside_vars: &TemplateVars) -> Result<String> {
    let mut document = Document::parse(content, TEMPLATE_URL)?;
    template::fix_rendering_context(&mut document, outside_vars, inside_vars)?;
    Ok(document.serialize())
}

/// Rewrite only the xpath selectors of the patches whose inherited
/// template is a key of `inside_vars`.
///
/// Used for patches of templates defined outside the corpus, whose own
/// expressions are rewritten elsewhere.
pub fn replace_xpath_only(content: &str, inside_vars: &TemplateVars) -> Result<String> {
    let mut document = Document::parse(content, TEMPLATE_URL)?;
    template::fix_xpath_only(&mut document, inside_vars)?;
    Ok(document.serialize())
}

/// Add the variables of one file to the corpus maps
pub fn aggregate_vars(content: &str, vars: &mut TemplateVars, inside_vars: &mut TemplateVars) -> Result<()> {
    let document = Document::parse(content, TEMPLATE_URL)?;
    template::aggregate_document(&document, vars, inside_vars);
    Ok(())
}
