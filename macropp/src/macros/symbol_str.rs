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

//! `symbol_str(a)`: stringizes its argument into a double-quoted literal.

use crate::{
    error::MacroError,
    macros::{MacroImpl, MacroResult},
    parser::Parser,
    token::{argument, new_token, Token},
};

pub struct SymbolStr;

impl MacroImpl for SymbolStr {
    fn call(
        &self,
        _parser: &mut Parser,
        args: Vec<Vec<Token>>,
        name_token: Token,
    ) -> Result<MacroResult, MacroError> {
        if args.len() != 1 {
            return Err(MacroError::WrongArgCount {
                macro_: "symbol_str".into(),
                expected: "1 argument".into(),
            });
        }
        let text = argument(&args[0]);
        let mut escaped = String::with_capacity(text.len() + 2);
        escaped.push('"');
        for c in text.chars() {
            if c == '\\' || c == '"' {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped.push('"');
        let token = new_token(escaped, &name_token);
        Ok(MacroResult::Final { tokens: vec![token], reinterpret: false })
    }
}
