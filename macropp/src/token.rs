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

//! The token model: an immutable `(text, file, line, column)` record plus
//! the provenance arithmetic ([`Token::ending_position`], [`Token::transition`])
//! used to reconstruct accurate line directives in the preprocessor's output.

use std::fmt::{Debug, Formatter, Result as FmtResult};

/// A single lexical token with its position in the original source.
///
/// Tokens are immutable once created. Two kinds of synthetic tokens exist
/// besides those the tokenizer produces: [`new_token`] clones the
/// provenance of a user token (for macro output that should blame the
/// caller), and [`python_token`] points at this crate's own source (for
/// macro boilerplate that should blame the macro implementation instead).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token {
    text: String,
    file: String,
    line: u32,
    column: u32,
}

impl Token {
    /// Builds a token. `line` and `column` are 1-based.
    pub fn new(text: impl Into<String>, file: impl Into<String>, line: u32, column: u32) -> Self {
        debug_assert!(line >= 1 && column >= 1);
        Self {
            text: text.into(),
            file: file.into(),
            line,
            column,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    /// True if this token is a single whitespace run (and not empty).
    pub fn is_whitespace(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_whitespace)
    }

    /// True if this token's text equals `text` exactly.
    pub fn matches(&self, text: &str) -> bool {
        self.text == text
    }

    /// Returns `(line, column)` of the position immediately following this
    /// token's last character, i.e. where the next token would start if it
    /// were adjacent.
    pub fn ending_position(&self) -> (u32, u32) {
        let newlines = self.text.chars().filter(|&c| c == '\n').count() as u32;
        if newlines > 0 {
            let after_last_newline = self.text.chars().rev().position(|c| c == '\n').unwrap() + 1;
            (self.line + newlines, after_last_newline as u32)
        } else {
            (self.line, self.column + self.text.chars().count() as u32)
        }
    }

    /// Returns the literal whitespace, newlines, or line directive that
    /// must be emitted before `self.text` so that `self` lands at its
    /// recorded `(file, line, column)` in the output, given the
    /// previously-emitted token `prev` (`None` at the start of output).
    pub fn transition(&self, prev: Option<&Token>) -> String {
        if let Some(prev) = prev
            && self.file == prev.file
        {
            let (last_line, last_column) = prev.ending_position();
            if self.line == last_line && self.column >= last_column {
                return " ".repeat((self.column - last_column) as usize);
            } else if last_line < self.line && self.line <= last_line + 10 {
                return "\n".repeat((self.line - last_line) as usize)
                    + &" ".repeat((self.column - 1) as usize);
            }
        }
        debug_assert!(
            !self.file.contains(['"', '\n', '\\']),
            "odd filename not handled"
        );
        let leading_newline = prev.is_some_and(|p| !p.text.ends_with('\n'));
        format!(
            "{}# {} \"{}\"\n{}",
            if leading_newline { "\n" } else { "" },
            self.line,
            self.file,
            " ".repeat((self.column - 1) as usize)
        )
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "Token({:?}, {:?}, {}, {})",
            self.text, self.file, self.line, self.column
        )
    }
}

/// Builds a synthetic token blaming `reference`'s source location.
pub fn new_token(text: impl Into<String>, reference: &Token) -> Token {
    Token::new(text, reference.file.clone(), reference.line, reference.column)
}

/// Like [`new_token`], but blames the first non-whitespace token of a list
/// (falling back to the first token if the list is all whitespace).
///
/// Panics if `reference` is empty; callers only ever pass a macro argument
/// or body, which always contains at least a name or delimiter token.
pub fn new_token_from_list(text: impl Into<String>, reference: &[Token]) -> Token {
    let pick = reference
        .iter()
        .find(|t| !t.text.trim().is_empty())
        .unwrap_or(&reference[0]);
    new_token(text, pick)
}

/// Builds a token whose provenance points at the call site of this
/// function in the preprocessor's own source, so that a downstream
/// compiler error in synthetic boilerplate blames the macro implementation
/// rather than the user's code. Column is always 1; the original Python
/// implementation this crate follows has the same limitation.
#[track_caller]
pub fn python_token(text: impl Into<String>) -> Token {
    let loc = std::panic::Location::caller();
    Token::new(text, loc.file(), loc.line(), 1)
}

/// Concatenates a token sequence's text and strips leading/trailing
/// whitespace: how a macro argument is read as a single logical string.
pub fn argument(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::text)
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ending_position_single_line() {
        let t = Token::new("hello", "f.c", 3, 5);
        assert_eq!(t.ending_position(), (3, 10));
    }

    #[test]
    fn ending_position_with_newline() {
        let t = Token::new("  \n", "f.c", 3, 5);
        assert_eq!(t.ending_position(), (4, 1));
    }

    #[test]
    fn transition_same_line() {
        let prev = Token::new("int", "f.c", 1, 1);
        let next = Token::new("x", "f.c", 1, 5);
        assert_eq!(next.transition(Some(&prev)), " ");
    }

    #[test]
    fn transition_short_vertical_gap() {
        let prev = Token::new(";", "f.c", 1, 10);
        let next = Token::new("y", "f.c", 3, 3);
        assert_eq!(next.transition(Some(&prev)), "\n\n  ");
    }

    #[test]
    fn transition_emits_line_directive_on_file_change() {
        let prev = Token::new(";", "a.c", 1, 10);
        let next = Token::new("y", "b.c", 1, 3);
        assert_eq!(next.transition(Some(&prev)), "\n# 1 \"b.c\"\n  ");
    }

    #[test]
    fn transition_at_start_of_output() {
        let t = Token::new("int", "f.c", 1, 1);
        assert_eq!(t.transition(None), "# 1 \"f.c\"\n");
    }

    #[test]
    fn argument_strips_and_joins() {
        let tokens = vec![
            Token::new(" ", "f.c", 1, 1),
            Token::new("foo", "f.c", 1, 2),
            Token::new(" ", "f.c", 1, 5),
        ];
        assert_eq!(argument(&tokens), "foo");
    }
}
