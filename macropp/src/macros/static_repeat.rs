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

//! `static_repeat(n, var) { ... }`: unrolls its body `n` times, substituting
//! the loop variable with the literal iteration count each time.

use crate::{
    error::MacroError,
    language::is_valid_identifier,
    macros::{MacroImpl, MacroResult},
    parser::Parser,
    token::{argument, new_token_from_list, Token},
};

pub struct StaticRepeat;

impl MacroImpl for StaticRepeat {
    fn call(
        &self,
        _parser: &mut Parser,
        args: Vec<Vec<Token>>,
        _name_token: Token,
    ) -> Result<MacroResult, MacroError> {
        if args.len() != 2 {
            return Err(MacroError::WrongArgCount {
                macro_: "static_repeat".into(),
                expected: "2 arguments".into(),
            });
        }
        let count_tokens = args[0].clone();
        let count_text = argument(&count_tokens);
        if count_text.is_empty() || !count_text.chars().all(|c| c.is_ascii_digit()) {
            return Err(MacroError::InvalidRepeatCount(count_text));
        }
        let count: u32 = count_text
            .parse()
            .map_err(|_| MacroError::InvalidRepeatCount(count_text.clone()))?;
        let var = argument(&args[1]);
        if !is_valid_identifier(&var) {
            return Err(MacroError::InvalidVariableName(var));
        }

        Ok(MacroResult::AwaitBody(Box::new(move |_parser, body| {
            let mut output = Vec::new();
            for i in 0..count {
                let count_token = new_token_from_list(i.to_string(), &count_tokens);
                for token in &body {
                    if token.matches(&var) {
                        output.push(count_token.clone());
                    } else {
                        output.push(token.clone());
                    }
                }
            }
            Ok((output, true))
        })))
    }
}
