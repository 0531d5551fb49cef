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

//! The preprocessor's error taxonomy: tokenization errors and the single
//! structural/macro error kind that covers everything raised while
//! expanding a macro invocation.

use thiserror::Error as ThisError;

/// A fatal error from the tokenizer.
#[derive(Clone, Debug, ThisError, PartialEq, Eq)]
pub enum TokenizeError {
    /// A string literal was still open when the physical line ended.
    #[error("string did not finish by end of line")]
    UnterminatedString,
}

/// Every macro-level and structural error the parser and built-in macros
/// can raise. All are fatal: the caller prints the message, the offending
/// line, and `file:line`, then exits with status 1.
#[derive(Clone, Debug, ThisError)]
pub enum MacroError {
    /// A paren-ish frame (`ParenExpr`, `MacroExpr`) got a mismatched closer.
    #[error("Expected ')' but got {0:?}")]
    ExpectedRParen(String),

    /// A brace-ish frame (`BraceExpr`) got a mismatched closer.
    #[error("Expected '}}' but got {0:?}")]
    ExpectedRBrace(String),

    /// A block macro's body didn't start with `{`.
    #[error("Macro expected '{{' but got {0:?}")]
    ExpectedOpenBrace(String),

    /// A quoted-string macro argument contained a stray character outside
    /// any `"..."` span.
    #[error("unexpected symbol {0:?} in string argument {1:?}")]
    UnexpectedSymbolInString(char, String),

    /// An escape sequence in a quoted-string argument wasn't recognized.
    #[error("unknown escape sequence '\\{0}'")]
    UnknownEscape(char),

    /// A quoted-string argument's closing `"` was never found.
    #[error("unterminated string in argument {0:?}")]
    UnterminatedStringArgument(String),

    /// A built-in macro got the wrong number of arguments.
    #[error("{macro_} requires {expected}")]
    WrongArgCount { macro_: String, expected: String },

    /// An argument that should be a host-language identifier wasn't one.
    #[error("invalid variable name {0:?}")]
    InvalidVariableName(String),

    /// `static_repeat`'s count argument wasn't a non-negative decimal integer.
    #[error("invalid repeat count {0:?}")]
    InvalidRepeatCount(String),

    /// `macro_define` was called with no macro name to define.
    #[error("macro_define must always have a macro name to define")]
    MacroDefineMissingName,

    /// `macro_block_define` was called with no name and/or body parameter.
    #[error("macro_block_define must always have a macro name to define and a body variable")]
    MacroBlockDefineMissingName,

    /// A `macro_define`/`macro_block_define` parameter or the macro name
    /// itself wasn't a valid identifier.
    #[error("invalid identifier {0:?}")]
    InvalidIdentifier(String),

    /// `blame_caller` wasn't immediately followed by `{` (modulo whitespace).
    #[error("unexpected symbol {0:?} when expecting {{ after blame_caller")]
    ExpectedBlameCallerBrace(String),

    /// A user-defined macro was called with the wrong number of arguments.
    #[error("user-defined macro {macro_:?} requires {expected} arguments but found {found}")]
    UserMacroArgCount {
        macro_: String,
        expected: usize,
        found: usize,
    },

    /// `macro_define`/`macro_block_define` tried to redefine an existing name.
    #[error("macro already defined: {0:?}")]
    DuplicateMacro(String),

    /// `debugf_core`'s log-level argument wasn't one of the five recognized levels.
    #[error("debugf requires a valid log level, not {0:?}")]
    InvalidLogLevel(String),

    /// `debugf_core`'s stable-id argument decoded to something non-alphanumeric.
    #[error("debugf stable id is invalid: {0:?}")]
    InvalidStableId(String),

    /// `debugf_core`'s format string's specifier count didn't match its argument count.
    #[error("debugf format string indicates {expected} arguments, but {found} passed")]
    DebugfArgCountMismatch { expected: usize, found: usize },

    /// A printf specifier was cut off by the end of the format string.
    #[error("format string ended early during specifier (string={0:?})")]
    FormatEndedEarly(String),

    /// A printf conversion character wasn't one `parse_printf_format` understands.
    #[error("unexpected specifier {0:?} in string {1:?}")]
    UnexpectedSpecifier(char, String),

    /// A tokenization error surfaced while processing a physical input line.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
}
