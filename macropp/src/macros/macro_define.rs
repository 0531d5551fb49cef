// macropp - a source-to-source macro preprocessor.
// Copyright (C) 2026 The macropp Authors.
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <http://www.gnu.org/licenses/>.

//! `macro_define`/`macro_block_define`: defines a new user macro and the
//! substitution machinery (`blame_caller`, trailing-comma elision) that
//! expands calls to it.

use std::collections::HashMap;

use crate::{
    error::MacroError,
    language::is_valid_variable_name,
    macros::{MacroImpl, MacroResult},
    parser::Parser,
    token::{argument, new_token, python_token, Token},
};

/// A macro defined by the user via `macro_define` or `macro_block_define`.
pub struct UserMacro {
    name: String,
    params: Vec<String>,
    variadic: Option<String>,
    is_block: bool,
    body: Vec<Token>,
}

impl MacroImpl for UserMacro {
    fn call(
        &self,
        _parser: &mut Parser,
        args: Vec<Vec<Token>>,
        name_token: Token,
    ) -> Result<MacroResult, MacroError> {
        let fixed = if self.is_block {
            self.params.len() - 1
        } else {
            self.variadic.as_ref().map_or(self.params.len(), |_| self.params.len() - 1)
        };

        let arg_count_ok = if self.is_block || self.variadic.is_none() {
            args.len() == fixed
        } else {
            args.len() >= fixed
        };
        if !arg_count_ok {
            return Err(MacroError::UserMacroArgCount {
                macro_: self.name.clone(),
                expected: fixed,
                found: args.len(),
            });
        }

        let mut bindings: HashMap<String, Vec<Token>> = HashMap::new();
        for (param, arg) in self.params.iter().take(fixed).zip(args.iter()) {
            bindings.insert(param.clone(), arg.clone());
        }

        if self.is_block {
            let body_param = self.params.last().unwrap().clone();
            let body = self.body.clone();
            return Ok(MacroResult::AwaitBody(Box::new(move |_parser, invocation_body| {
                let mut bindings = bindings;
                bindings.insert(body_param, invocation_body);
                let tokens = substitute(&body, &bindings, None, &name_token)?;
                Ok((tokens, true))
            })));
        }

        if let Some(variadic) = &self.variadic {
            let rest = flatten_varargs(&args[fixed..]);
            bindings.insert(variadic.clone(), rest);
        }
        let tokens = substitute(&self.body, &bindings, self.variadic.as_deref(), &name_token)?;
        Ok(MacroResult::Final { tokens, reinterpret: true })
    }
}

/// Joins each variadic argument's tokens with a synthetic `,` between them.
fn flatten_varargs(args: &[Vec<Token>]) -> Vec<Token> {
    let mut out = Vec::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(python_token(","));
        }
        out.extend(arg.iter().cloned());
    }
    out
}

/// Substitutes `bindings` into `body`, unwrapping `blame_caller { ... }`
/// groups and rewriting the literal (non-substituted) tokens inside them to
/// point at `call_site`, and eliding a trailing comma left dangling by an
/// empty variadic expansion.
///
/// `blame_caller` state is a single depth counter rather than a stack: -1
/// means outside any `blame_caller`, 0 means the opening `{` is still
/// expected, and 1+ is the brace-nesting depth once inside. Nested
/// `blame_caller { blame_caller { ... } }` is not given special treatment;
/// the inner occurrence is just ordinary text within the outer span.
pub fn substitute(
    body: &[Token],
    bindings: &HashMap<String, Vec<Token>>,
    variadic_param: Option<&str>,
    call_site: &Token,
) -> Result<Vec<Token>, MacroError> {
    let mut substitution = Vec::new();
    let mut blame_depth: i32 = -1;
    for raw in body {
        let mut token = raw.clone();
        if blame_depth == -1 && token.matches("blame_caller") {
            blame_depth = 0;
            continue;
        }
        if blame_depth == 0 {
            if token.matches("{") {
                blame_depth = 1;
                continue;
            } else if token.is_whitespace() {
                continue;
            } else {
                return Err(MacroError::ExpectedBlameCallerBrace(token.text().to_string()));
            }
        }
        if token.matches("}") && blame_depth == 1 {
            blame_depth = -1;
            continue;
        }
        if blame_depth >= 1 {
            if token.matches("{") {
                blame_depth += 1;
            } else if token.matches("}") {
                blame_depth -= 1;
            }
            token = new_token(token.text().to_string(), call_site);
        }

        if variadic_param == Some(token.text()) && bindings.get(token.text()).is_some_and(Vec::is_empty) {
            elide_trailing_comma(&mut substitution);
        }
        match bindings.get(token.text()) {
            Some(replacement) => substitution.extend(replacement.iter().cloned()),
            None => substitution.push(token),
        }
    }
    Ok(substitution)
}

fn elide_trailing_comma(output: &mut Vec<Token>) {
    let mut idx = output.len();
    while idx > 0 && output[idx - 1].is_whitespace() {
        idx -= 1;
    }
    if idx > 0 && output[idx - 1].matches(",") {
        output.truncate(idx - 1);
    }
}

/// `macro_define` (variadic-capable) or `macro_block_define` (call-site body
/// becomes the last parameter), selected by `is_block`.
pub struct MacroDefine {
    pub is_block: bool,
}

impl MacroImpl for MacroDefine {
    fn call(
        &self,
        _parser: &mut Parser,
        args: Vec<Vec<Token>>,
        _name_token: Token,
    ) -> Result<MacroResult, MacroError> {
        if self.is_block {
            if args.len() < 2 {
                return Err(MacroError::MacroBlockDefineMissingName);
            }
        } else if args.is_empty() {
            return Err(MacroError::MacroDefineMissingName);
        }

        let name = argument(&args[0]);
        if !is_valid_variable_name(&name) {
            return Err(MacroError::InvalidIdentifier(name));
        }

        let param_args = &args[1..];
        let last_index = param_args.len().saturating_sub(1);
        let mut params = Vec::with_capacity(param_args.len());
        let mut variadic = None;
        for (idx, arg) in param_args.iter().enumerate() {
            let text = argument(arg);
            if !self.is_block && text.ends_with("...") {
                let base = text[..text.len() - 3].to_string();
                if !is_valid_variable_name(&base) || idx != last_index || variadic.is_some() {
                    return Err(MacroError::InvalidIdentifier(text));
                }
                variadic = Some(base.clone());
                params.push(base);
            } else {
                if !is_valid_variable_name(&text) {
                    return Err(MacroError::InvalidIdentifier(text));
                }
                params.push(text);
            }
        }

        let is_block = self.is_block;
        Ok(MacroResult::AwaitBody(Box::new(move |parser, body| {
            let macro_impl = UserMacro {
                name: name.clone(),
                params,
                variadic,
                is_block,
                body,
            };
            parser.try_add_macro(name, std::rc::Rc::new(macro_impl))?;
            Ok((Vec::new(), false))
        })))
    }
}
