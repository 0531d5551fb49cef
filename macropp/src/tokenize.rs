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

//! The tokenizer: a line-oriented lexer that turns one physical source
//! line into a sequence of tokens with accurate columns.

use crate::{error::TokenizeError, token::Token};

const DELIMITERS: &str = "<[{(,.;&*)}]>";

/// Tokenizes one physical line. `line_number` is the 1-based source line
/// these tokens are attributed to; `file` is the current source file.
///
/// Delimiters in [`DELIMITERS`] are each a single-character token.
/// Whitespace runs (space, tab, newline) collapse into one token. String
/// literals are `"`-delimited with `\`-escape of the following character;
/// an unterminated string at the end of the line is a fatal error. Every
/// other run of characters is a single identifier/word token.
pub fn tokenize_line(line: &str, file: &str, line_number: u32) -> Result<Vec<Token>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut start_column: u32 = 1;
    let mut in_escape = false;
    let mut cur_string: Option<String> = None;
    let mut cur_token: Option<String> = None;
    let mut cur_spaces: Option<String> = None;

    for (i, c) in line.chars().enumerate() {
        let column = (i + 1) as u32;
        if let Some(s) = cur_string.as_mut() {
            s.push(c);
            if in_escape {
                in_escape = false;
            } else if c == '\\' {
                in_escape = true;
            } else if c == '"' {
                tokens.push(Token::new(
                    cur_string.take().unwrap(),
                    file,
                    line_number,
                    start_column,
                ));
            }
        } else if c == ' ' || c == '\t' || c == '\n' {
            if let Some(t) = cur_token.take() {
                tokens.push(Token::new(t, file, line_number, start_column));
            }
            match cur_spaces.as_mut() {
                None => {
                    cur_spaces = Some(c.to_string());
                    start_column = column;
                }
                Some(s) => s.push(c),
            }
        } else if DELIMITERS.contains(c) {
            if let Some(t) = cur_token.take() {
                tokens.push(Token::new(t, file, line_number, start_column));
            }
            if let Some(s) = cur_spaces.take() {
                tokens.push(Token::new(s, file, line_number, start_column));
            }
            tokens.push(Token::new(c.to_string(), file, line_number, column));
        } else if c == '"' {
            if let Some(t) = cur_token.take() {
                tokens.push(Token::new(t, file, line_number, start_column));
            }
            if let Some(s) = cur_spaces.take() {
                tokens.push(Token::new(s, file, line_number, start_column));
            }
            cur_string = Some(c.to_string());
            start_column = column;
        } else {
            if let Some(s) = cur_spaces.take() {
                tokens.push(Token::new(s, file, line_number, start_column));
            }
            match cur_token.as_mut() {
                None => {
                    cur_token = Some(c.to_string());
                    start_column = column;
                }
                Some(t) => t.push(c),
            }
        }
    }

    if cur_string.is_some() {
        return Err(TokenizeError::UnterminatedString);
    }
    if let Some(t) = cur_token.take() {
        tokens.push(Token::new(t, file, line_number, start_column));
    }
    if let Some(s) = cur_spaces.take() {
        tokens.push(Token::new(s, file, line_number, start_column));
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(Token::text).collect()
    }

    #[test]
    fn splits_identifiers_and_delimiters() {
        let tokens = tokenize_line("int main(void) {\n", "f.c", 1).unwrap();
        assert_eq!(
            texts(&tokens),
            vec!["int", " ", "main", "(", "void", ")", " ", "{", "\n"]
        );
    }

    #[test]
    fn string_literal_with_escape() {
        let tokens = tokenize_line(r#"x = "a\"b";"#, "f.c", 1).unwrap();
        assert_eq!(
            texts(&tokens),
            vec!["x", " ", "=", " ", r#""a\"b""#, ";"]
        );
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert_eq!(
            tokenize_line("\"oops\n", "f.c", 1).unwrap_err(),
            TokenizeError::UnterminatedString
        );
    }

    #[test]
    fn whitespace_run_collapses_to_one_token() {
        let tokens = tokenize_line("a   b", "f.c", 1).unwrap();
        assert_eq!(texts(&tokens), vec!["a", "   ", "b"]);
    }

    #[test]
    fn columns_are_one_based() {
        let tokens = tokenize_line("ab(c)", "f.c", 1).unwrap();
        assert_eq!(tokens[0].column(), 1);
        assert_eq!(tokens[1].column(), 3);
        assert_eq!(tokens[2].column(), 4);
        assert_eq!(tokens[3].column(), 5);
    }
}
