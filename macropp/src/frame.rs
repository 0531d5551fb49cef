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

//! The four expander frame variants that make up the parser's stack, and
//! the uniform protocol (`on_tokens`, `on_comma`, `on_open_brace`,
//! `execute`, `allow_macro`) each implements.

use std::{
    fmt::{self, Display, Formatter},
    rc::Rc,
};

use crate::{
    error::MacroError,
    macros::{MacroImpl, MacroResult},
    parser::Parser,
    token::Token,
};

/// What popping a frame (on its matching closer) produces.
pub enum ExecuteResult {
    /// A new frame to push in this one's place (only `MacroExpr`, when its
    /// macro turns out to be a block macro, transitions this way).
    Continuation(Frame),

    /// Final tokens: either re-fed through the parser (`reinterpret`) or
    /// handed to the new top frame / emitted directly if the stack is now
    /// empty.
    Tokens { tokens: Vec<Token>, reinterpret: bool },
}

/// A frame on the parser's stack: an unfinished parenthesized group,
/// braced group, macro call, or macro-body capture.
pub enum Frame {
    Paren(ParenExpr),
    Brace(BraceExpr),
    Macro(MacroExpr),
    MacroBody(MacroBodyExpr),
}

impl Frame {
    pub fn allow_macro(&self) -> bool {
        match self {
            Frame::Paren(_) | Frame::Brace(_) | Frame::Macro(_) => true,
            Frame::MacroBody(m) => m.allow_macro(),
        }
    }

    pub fn on_tokens(&mut self, tokens: Vec<Token>) -> Result<(), MacroError> {
        match self {
            Frame::Paren(p) => {
                p.on_tokens(tokens);
                Ok(())
            }
            Frame::Brace(b) => {
                b.on_tokens(tokens);
                Ok(())
            }
            Frame::Macro(m) => {
                m.on_tokens(tokens);
                Ok(())
            }
            Frame::MacroBody(m) => m.on_tokens(tokens),
        }
    }

    pub fn on_comma(&mut self, token: Token) {
        match self {
            Frame::Paren(p) => p.on_comma(token),
            Frame::Brace(b) => b.on_comma(token),
            Frame::Macro(m) => m.on_comma(),
            Frame::MacroBody(m) => m.on_comma(token),
        }
    }

    /// Returns true if this frame consumed the brace itself (only
    /// `MacroBodyExpr`, and only the first time); otherwise the caller must
    /// push a new `BraceExpr`.
    pub fn on_open_brace(&mut self) -> bool {
        match self {
            Frame::MacroBody(m) => m.on_open_brace(),
            _ => false,
        }
    }

    pub fn execute(self, parser: &mut Parser, closer: Token) -> Result<ExecuteResult, MacroError> {
        match self {
            Frame::Paren(p) => p.execute(closer),
            Frame::Brace(b) => b.execute(closer),
            Frame::Macro(m) => m.execute(parser, closer),
            Frame::MacroBody(m) => m.execute(parser, closer),
        }
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Paren(p) => write!(f, "ParenExpr({:?})", p.tokens),
            Frame::Brace(b) => write!(f, "BraceExpr({:?})", b.tokens),
            Frame::Macro(m) => write!(f, "{:?}: {:?}", m.name_token, m.args),
            Frame::MacroBody(_) => write!(f, "macro body awaiting '}}'"),
        }
    }
}

/// An unfinished `name(arg1, arg2, ...)` macro invocation, up to its
/// closing `)`.
pub struct MacroExpr {
    macro_impl: Rc<dyn MacroImpl>,
    name_token: Token,
    args: Vec<Vec<Token>>,
}

impl MacroExpr {
    pub fn new(macro_impl: Rc<dyn MacroImpl>, name_token: Token) -> Self {
        Self {
            macro_impl,
            name_token,
            args: Vec::new(),
        }
    }

    fn on_tokens(&mut self, tokens: Vec<Token>) {
        if self.args.is_empty() {
            self.args.push(Vec::new());
        }
        self.args.last_mut().unwrap().extend(tokens);
    }

    fn on_comma(&mut self) {
        self.args.push(Vec::new());
    }

    fn execute(self, parser: &mut Parser, closer: Token) -> Result<ExecuteResult, MacroError> {
        if !closer.matches(")") {
            return Err(MacroError::ExpectedRParen(closer.text().to_string()));
        }
        match self.macro_impl.call(parser, self.args, self.name_token)? {
            MacroResult::Final { tokens, reinterpret } => Ok(ExecuteResult::Tokens { tokens, reinterpret }),
            MacroResult::AwaitBody(f) => Ok(ExecuteResult::Continuation(Frame::MacroBody(MacroBodyExpr::new(f)))),
        }
    }
}

/// A block macro's captured body, from the `)` that opened it to its
/// matching `}`.
pub struct MacroBodyExpr {
    #[allow(clippy::type_complexity)]
    macro_func: Box<dyn FnOnce(&mut Parser, Vec<Token>) -> Result<(Vec<Token>, bool), MacroError>>,
    has_open: bool,
    body: Vec<Token>,
}

impl MacroBodyExpr {
    fn new(
        macro_func: Box<dyn FnOnce(&mut Parser, Vec<Token>) -> Result<(Vec<Token>, bool), MacroError>>,
    ) -> Self {
        Self {
            macro_func,
            has_open: false,
            body: Vec::new(),
        }
    }

    fn allow_macro(&self) -> bool {
        !self.has_open
    }

    fn on_tokens(&mut self, tokens: Vec<Token>) -> Result<(), MacroError> {
        if !self.has_open && !tokens.iter().all(Token::is_whitespace) {
            let text: String = tokens.iter().map(Token::text).collect();
            return Err(MacroError::ExpectedOpenBrace(text));
        }
        self.body.extend(tokens);
        Ok(())
    }

    fn on_open_brace(&mut self) -> bool {
        if self.has_open {
            return false;
        }
        self.has_open = true;
        true
    }

    fn on_comma(&mut self, token: Token) {
        self.body.push(token);
    }

    fn execute(self, parser: &mut Parser, closer: Token) -> Result<ExecuteResult, MacroError> {
        if !closer.matches("}") {
            return Err(MacroError::ExpectedRBrace(closer.text().to_string()));
        }
        let (tokens, reinterpret) = (self.macro_func)(parser, self.body)?;
        Ok(ExecuteResult::Tokens { tokens, reinterpret })
    }
}

/// An unfinished `(...)` group that isn't a macro call.
pub struct ParenExpr {
    tokens: Vec<Token>,
}

impl ParenExpr {
    pub fn new(open: Token) -> Self {
        Self { tokens: vec![open] }
    }

    fn on_tokens(&mut self, tokens: Vec<Token>) {
        self.tokens.extend(tokens);
    }

    fn on_comma(&mut self, token: Token) {
        self.tokens.push(token);
    }

    fn execute(mut self, closer: Token) -> Result<ExecuteResult, MacroError> {
        if !closer.matches(")") {
            return Err(MacroError::ExpectedRParen(closer.text().to_string()));
        }
        self.tokens.push(closer);
        Ok(ExecuteResult::Tokens { tokens: self.tokens, reinterpret: false })
    }
}

/// An unfinished `{...}` group that isn't a macro body capture.
pub struct BraceExpr {
    tokens: Vec<Token>,
}

impl BraceExpr {
    pub fn new(open: Token) -> Self {
        Self { tokens: vec![open] }
    }

    fn on_tokens(&mut self, tokens: Vec<Token>) {
        self.tokens.extend(tokens);
    }

    fn on_comma(&mut self, token: Token) {
        self.tokens.push(token);
    }

    fn execute(mut self, closer: Token) -> Result<ExecuteResult, MacroError> {
        if !closer.matches("}") {
            return Err(MacroError::ExpectedRBrace(closer.text().to_string()));
        }
        self.tokens.push(closer);
        Ok(ExecuteResult::Tokens { tokens: self.tokens, reinterpret: false })
    }
}
