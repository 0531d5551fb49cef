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

//! The built-in meta-macros and the contract every macro (built-in or
//! user-defined via `macro_define`) implements.

mod anonymous_symbol;
mod debugf_core;
mod macro_define;
mod static_repeat;
mod symbol_join;
mod symbol_str;

pub(crate) use macro_define::substitute;
pub use macro_define::UserMacro;

use std::rc::Rc;

use crate::{error::MacroError, parser::Parser, token::Token};

/// What a macro invocation produces once its argument list (and, for a
/// block macro, its braced body) is fully known.
pub enum MacroResult {
    /// The expansion is final: `tokens` either flow to the enclosing frame
    /// (as-is, if `reinterpret` is false) or are re-fed through the parser
    /// as freshly tokenized input (if `reinterpret` is true).
    Final { tokens: Vec<Token>, reinterpret: bool },

    /// The macro is a block macro: it still needs a braced body before it
    /// can produce final tokens. The closure receives the parser (so
    /// e.g. `macro_define` can register the new macro it just defined) and
    /// the captured body tokens.
    #[allow(clippy::type_complexity)]
    AwaitBody(Box<dyn FnOnce(&mut Parser, Vec<Token>) -> Result<(Vec<Token>, bool), MacroError>>),
}

/// A macro definition: built-in or user-defined via `macro_define`/
/// `macro_block_define`. `call` receives the fully-collected argument
/// token-lists and the macro-name token (used to blame synthetic output at
/// the invocation site).
pub trait MacroImpl {
    fn call(
        &self,
        parser: &mut Parser,
        args: Vec<Vec<Token>>,
        name_token: Token,
    ) -> Result<MacroResult, MacroError>;
}

/// Registers every built-in macro with `parser`. Called once, by
/// [`Parser::new`](crate::parser::Parser::new).
pub fn register_all(parser: &mut Parser) {
    parser.add_macro("anonymous_symbol", Rc::new(anonymous_symbol::AnonymousSymbol));
    parser.add_macro("debugf_core", Rc::new(debugf_core::DebugfCore));
    parser.add_macro("macro_define", Rc::new(macro_define::MacroDefine { is_block: false }));
    parser.add_macro(
        "macro_block_define",
        Rc::new(macro_define::MacroDefine { is_block: true }),
    );
    parser.add_macro("static_repeat", Rc::new(static_repeat::StaticRepeat));
    parser.add_macro("symbol_join", Rc::new(symbol_join::SymbolJoin));
    parser.add_macro("symbol_str", Rc::new(symbol_str::SymbolStr));
}
