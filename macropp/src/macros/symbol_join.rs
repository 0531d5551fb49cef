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

//! `symbol_join(a, b, ...)`: pastes its arguments into a single identifier.

use crate::{
    error::MacroError,
    macros::{MacroImpl, MacroResult},
    parser::Parser,
    token::{argument, new_token, Token},
};

pub struct SymbolJoin;

impl MacroImpl for SymbolJoin {
    fn call(
        &self,
        _parser: &mut Parser,
        args: Vec<Vec<Token>>,
        name_token: Token,
    ) -> Result<MacroResult, MacroError> {
        if args.len() < 2 {
            return Err(MacroError::WrongArgCount {
                macro_: "symbol_join".into(),
                expected: "at least 2 arguments".into(),
            });
        }
        let joined = args
            .iter()
            .map(|arg| argument(arg))
            .collect::<Vec<_>>()
            .join("_");
        let token = new_token(joined, &name_token);
        Ok(MacroResult::Final { tokens: vec![token], reinterpret: false })
    }
}
