//! Attribute classification
//!
//! Which attributes of a template element carry an expression, and how
//! their value is compiled. The decision only depends on the attribute name
//! and on whether the element is a component.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ml_parser::Element;

pub const T_NAME: &str = "t-name";
pub const T_INHERIT: &str = "t-inherit";
pub const T_CALL: &str = "t-call";
pub const T_SET: &str = "t-set";
pub const T_AS: &str = "t-as";
pub const T_SLOT_SCOPE: &str = "t-slot-scope";
pub const T_COMPONENT: &str = "t-component";
pub const T_FOREACH: &str = "t-foreach";
pub const T_FOR_EACH: &str = "t-for-each";
pub const T_FOREACH_INDEX: &str = "t-foreach-index";
pub const T_INDEX: &str = "t-index";

/// Attributes whose whole value is an expression
pub const DIRECTIVES: &[&str] = &[
    "t-esc",
    "t-out",
    "t-value",
    "t-key",
    "t-if",
    "t-elif",
    "t-foreach",
    "t-component",
    "t-props",
    "t-model",
    "t-tag",
    "t-call-context",
];

pub const DIRECTIVE_PREFIX: &str = "t-";
pub const EVENT_PREFIX: &str = "t-on-";
pub const ATT_PREFIX: &str = "t-att-";
pub const ATTF_PREFIX: &str = "t-attf-";

/// Attributes holding text with `#{...}`/`{{...}}` interpolations
pub const DYNAMIC_STRING_ATTRIBUTES: &[&str] = &["t-call", "t-ref", "t-slot"];

/// Component attributes with this suffix are literal strings
pub const NO_COMPILE_SUFFIX: &str = ".translate";

/// Selector clauses never holding an expression
pub const SKIP_XPATH_ATTRS: &[&str] = &["name", "ref", "set-slot", "slot"];

/// Clause naming a call target, a dynamic string
pub const CALL_CLAUSE: &str = "call";

/// `@t-<name>='<expression>'` clause of an xpath selector
pub static T_ATTR_REGEXP: Lazy<Regex> = Lazy::new(|| Regex::new(r"@t-([\w-]+)='(.*?)'").unwrap());

/// Selector starting at a component element (`//Layout`)
pub static COMP_REGEXP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^//[A-Z]\w*").unwrap());

pub const XPATH_TAG: &str = "xpath";
pub const XPATH_EXPR: &str = "expr";
pub const ATTRIBUTE_PATCH_TAG: &str = "attribute";
pub const ATTRIBUTE_PATCH_NAME: &str = "name";

/// How an attribute value is compiled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Listed directive
    Directive,
    /// `t-on-*` handler
    Event,
    /// `t-attf-*`, `t-call`, `t-ref`, `t-slot`
    DynamicString,
    /// `t-att-*`
    Att,
    /// Plain attribute of a component, a prop expression
    ComponentProp,
}

impl AttributeKind {
    pub fn is_dynamic_string(self) -> bool {
        self == AttributeKind::DynamicString
    }
}

pub fn is_component(element: &Element) -> bool {
    element.name.chars().next().is_some_and(char::is_uppercase) || element.has_attr(T_COMPONENT)
}

pub fn is_directive(name: &str) -> bool {
    DIRECTIVES.contains(&name)
}

pub fn classify_attribute(name: &str, component: bool) -> Option<AttributeKind> {
    if is_directive(name) {
        Some(AttributeKind::Directive)
    } else if name.starts_with(EVENT_PREFIX) {
        Some(AttributeKind::Event)
    } else if name.starts_with(ATTF_PREFIX) || DYNAMIC_STRING_ATTRIBUTES.contains(&name) {
        Some(AttributeKind::DynamicString)
    } else if name.starts_with(ATT_PREFIX) {
        Some(AttributeKind::Att)
    } else if component && !name.starts_with(DIRECTIVE_PREFIX) && !name.ends_with(NO_COMPILE_SUFFIX) {
        Some(AttributeKind::ComponentProp)
    } else {
        None
    }
}

/// Whether the text of `<attribute name="...">` under `<xpath expr="...">`
/// is an expression
pub fn is_expression_patch(attribute_name: &str, xpath_expr: &str) -> bool {
    is_directive(attribute_name)
        || attribute_name.starts_with(EVENT_PREFIX)
        || attribute_name.starts_with(ATT_PREFIX)
        || xpath_expr.contains(T_COMPONENT)
        || COMP_REGEXP.is_match(xpath_expr)
}
