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

//! `anonymous_symbol(var) { ... }`: substitutes `var` with a fresh
//! collision-resistant identifier, unique within this translation unit.

use crate::{
    error::MacroError,
    language::is_valid_variable_name,
    macros::{MacroImpl, MacroResult},
    parser::Parser,
    token::{argument, new_token_from_list, Token},
};

pub struct AnonymousSymbol;

impl MacroImpl for AnonymousSymbol {
    fn call(
        &self,
        _parser: &mut Parser,
        args: Vec<Vec<Token>>,
        _name_token: Token,
    ) -> Result<MacroResult, MacroError> {
        if args.len() != 1 {
            return Err(MacroError::WrongArgCount {
                macro_: "anonymous_symbol".into(),
                expected: "1 argument".into(),
            });
        }
        let var_tokens = args.into_iter().next().unwrap();
        let var = argument(&var_tokens);
        if !is_valid_variable_name(&var) {
            return Err(MacroError::InvalidVariableName(var));
        }

        Ok(MacroResult::AwaitBody(Box::new(move |parser, body| {
            let symbol = parser.next_anonymous_symbol();
            let replacement = new_token_from_list(symbol, &var_tokens);
            let mut output = Vec::with_capacity(body.len());
            for token in &body {
                if token.matches(&var) {
                    output.push(replacement.clone());
                } else {
                    output.push(token.clone());
                }
            }
            Ok((output, true))
        })))
    }
}
