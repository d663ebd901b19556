/**
 * Expression Compiler
 *
 * Rewrites the free identifiers of a template expression into member
 * accesses on the rendering receiver (`foo` becomes `this.foo`). Identifiers
 * that are already in scope (bound variables, arrow function parameters),
 * reserved words, property names and object keys are left alone.
 *
 * The rewrite is idempotent: every rewritten identifier ends up behind a
 * `.` or is `this` itself, and neither is rewritten again.
 */

use std::collections::HashSet;

use smallvec::SmallVec;

use super::delimiters::find_closing_brace;
use super::lexer::{tokenize, Token, TokenType};
use crate::error::{CompileError, Result};

/// Identifiers considered already in scope for an expression
pub type BoundVariables = HashSet<String>;

pub const RECEIVER: &str = "this";

/// Identifiers never rewritten
pub const RESERVED_WORDS: &[&str] = &[
    "true",
    "false",
    "NaN",
    "null",
    "undefined",
    "debugger",
    "console",
    "window",
    "in",
    "instanceof",
    "new",
    "function",
    "return",
    "eval",
    "void",
    "Math",
    "RegExp",
    "Array",
    "Object",
    "Date",
    "__globals__",
];

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Compile an expression against a set of bound variables.
///
/// Whitespace around the expression is kept as is; a blank expression is
/// returned unchanged.
pub fn compile_expr(expr: &str, bound_variables: &BoundVariables) -> Result<String> {
    ExpressionCompiler::new(bound_variables).compile(expr)
}

/// Parameters introduced by one arrow function, in scope from `start` on
#[derive(Debug)]
struct ArrowScope {
    start: usize,
    params: Vec<String>,
}

pub struct ExpressionCompiler<'a> {
    bound_variables: &'a BoundVariables,
}

impl<'a> ExpressionCompiler<'a> {
    pub fn new(bound_variables: &'a BoundVariables) -> Self {
        ExpressionCompiler { bound_variables }
    }

    pub fn compile(&self, expr: &str) -> Result<String> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Ok(expr.to_string());
        }
        let start = expr.len() - expr.trim_start().len();
        let end = start + trimmed.len();

        let mut tokens = tokenize(trimmed)?;
        self.rewrite_tokens(&mut tokens, trimmed)?;

        let mut result = String::with_capacity(expr.len() + 16);
        result.push_str(&expr[..start]);
        for token in &tokens {
            result.push_str(&token.value);
        }
        result.push_str(&expr[end..]);
        Ok(result)
    }

    fn rewrite_tokens(&self, tokens: &mut [Token], expr: &str) -> Result<()> {
        let mut scopes = collect_arrow_scopes(tokens, expr)?.into_iter().peekable();
        let mut local_vars: HashSet<String> = HashSet::new();
        let mut group_stack: SmallVec<[TokenType; 8]> = SmallVec::new();

        for i in 0..tokens.len() {
            while let Some(scope) = scopes.next_if(|scope| scope.start <= i) {
                local_vars.extend(scope.params);
            }

            let token_type = tokens[i].token_type;
            if token_type == TokenType::Whitespace {
                continue;
            }

            if token_type == TokenType::TemplateString {
                tokens[i].value = self.compile_template_literal(&tokens[i].original_value)?;
            }

            let group_type = group_stack.last().copied();
            if token_type.is_group_open() {
                group_stack.push(token_type);
            } else if token_type.is_group_close() && group_stack.pop().is_none() {
                return Err(CompileError::UnbalancedGroup {
                    found: tokens[i].original_value.chars().next().unwrap_or_default(),
                    expression: expr.to_string(),
                });
            }

            if token_type != TokenType::Symbol {
                continue;
            }

            let prev = prev_non_whitespace(tokens, i);
            let next = next_non_whitespace(tokens, i);
            let name = tokens[i].original_value.as_str();

            if self.is_in_scope(name, &local_vars)
                || prev.is_some_and(|t| t.is_operator("."))
                || is_object_key(prev, next)
            {
                continue;
            }

            let rewritten = if group_type == Some(TokenType::LeftBrace)
                && is_shorthand_property(prev, next)
            {
                format!("{name}: {RECEIVER}.{name}")
            } else {
                format!("{RECEIVER}.{name}")
            };
            log::trace!("rewrite identifier `{}` -> `{}`", name, rewritten);
            tokens[i].value = rewritten;
        }

        Ok(())
    }

    fn is_in_scope(&self, name: &str, local_vars: &HashSet<String>) -> bool {
        name == RECEIVER
            || is_reserved_word(name)
            || self.bound_variables.contains(name)
            || local_vars.contains(name)
    }

    /// Compile every `${...}` interpolation of a template literal.
    ///
    /// Interpolations are independent sub-expressions: they see the bound
    /// variables of the enclosing expression, not its arrow parameters.
    fn compile_template_literal(&self, literal: &str) -> Result<String> {
        let bytes = literal.as_bytes();
        let mut result = String::with_capacity(literal.len() + 16);
        let mut copied = 0;
        let mut i = 0;

        while i + 1 < bytes.len() {
            if bytes[i] == b'\\' {
                i += 2;
                continue;
            }
            if bytes[i] == b'$' && bytes[i + 1] == b'{' {
                let inner_start = i + 2;
                if let Some(close) = find_closing_brace(literal, inner_start) {
                    let inner = &literal[inner_start..close];
                    result.push_str(&literal[copied..inner_start]);
                    result.push_str(&self.compile(inner)?);
                    copied = close;
                    i = close + 1;
                    continue;
                }
            }
            i += 1;
        }

        result.push_str(&literal[copied..]);
        Ok(result)
    }
}

fn prev_non_whitespace(tokens: &[Token], i: usize) -> Option<&Token> {
    tokens[..i].iter().rev().find(|t| !t.is_whitespace())
}

fn next_non_whitespace(tokens: &[Token], i: usize) -> Option<&Token> {
    tokens[i + 1..].iter().find(|t| !t.is_whitespace())
}

fn follows_group_start_or_comma(prev: Option<&Token>) -> bool {
    prev.is_some_and(|t| matches!(t.token_type, TokenType::LeftBrace | TokenType::Comma))
}

/// `{ key: value }` or `, key: value`: the key is a literal name
fn is_object_key(prev: Option<&Token>, next: Option<&Token>) -> bool {
    follows_group_start_or_comma(prev) && next.is_some_and(|t| t.token_type == TokenType::Colon)
}

/// `{ a, b }`: a property without explicit value
fn is_shorthand_property(prev: Option<&Token>, next: Option<&Token>) -> bool {
    follows_group_start_or_comma(prev)
        && next.is_some_and(|t| matches!(t.token_type, TokenType::RightBrace | TokenType::Comma))
}

/// Find the parameters of every arrow function in the token stream.
///
/// Parameters are known before any identifier is rewritten, so a
/// parameter list is never rewritten speculatively.
fn collect_arrow_scopes(tokens: &[Token], expr: &str) -> Result<Vec<ArrowScope>> {
    let mut scopes = Vec::new();

    for (k, token) in tokens.iter().enumerate() {
        if !token.is_arrow() {
            continue;
        }
        let Some(p) = tokens[..k].iter().rposition(|t| !t.is_whitespace()) else {
            continue;
        };

        match tokens[p].token_type {
            TokenType::RightParen => {
                let open = matching_open_paren(tokens, p).ok_or_else(|| {
                    CompileError::UnmatchedArrowParameters {
                        expression: expr.to_string(),
                    }
                })?;
                let params = tokens[open + 1..p]
                    .iter()
                    .filter(|t| t.is_symbol())
                    .map(|t| t.original_value.clone())
                    .collect();
                scopes.push(ArrowScope { start: open, params });
            }
            TokenType::Symbol => scopes.push(ArrowScope {
                start: p,
                params: vec![tokens[p].original_value.clone()],
            }),
            _ => {}
        }
    }

    scopes.sort_by_key(|scope| scope.start);
    Ok(scopes)
}

fn matching_open_paren(tokens: &[Token], close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for j in (0..close).rev() {
        match tokens[j].token_type {
            TokenType::RightParen => depth += 1,
            TokenType::LeftParen if depth == 0 => return Some(j),
            TokenType::LeftParen => depth -= 1,
            _ => {}
        }
    }
    None
}
