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

//! Small lexical helpers shared by the built-in macros: identifier
//! validation and the escaped-string-argument decoder.

use crate::error::MacroError;

/// True if `name` is a valid variable/macro name: strip underscores first,
/// then require the *remaining* string be non-empty, alphanumeric, and start
/// with an alphabetic character. Because underscores are stripped before the
/// first-character check, a leading underscore is fine (`_foo`, `__bar`) as
/// long as some alphabetic character follows it. Used for `anonymous_symbol`'s
/// substituted variable, and for `macro_define`/`macro_block_define`'s macro
/// name, parameter names, and variadic parameter name.
pub fn is_valid_variable_name(name: &str) -> bool {
    let stripped: String = name.chars().filter(|&c| c != '_').collect();
    if stripped.is_empty() {
        return false;
    }
    let Some(first) = stripped.chars().next() else {
        return false;
    };
    first.is_alphabetic() && stripped.chars().all(char::is_alphanumeric)
}

/// True if `name` is a valid identifier under the stricter rule
/// `static_repeat` applies to its loop variable: alphanumeric once
/// underscores are removed, but the *unstripped* first character must
/// itself be alphabetic, so a leading underscore is rejected.
pub fn is_valid_identifier(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return false;
    };
    if !first.is_alphabetic() {
        return false;
    }
    let stripped: String = name.chars().filter(|&c| c != '_').collect();
    !stripped.is_empty() && stripped.chars().all(char::is_alphanumeric)
}

/// Decodes a macro argument that is expected to hold a single
/// double-quoted string literal, such as `debugf_core`'s stable-id and
/// format-string arguments. Whitespace outside the quotes is ignored;
/// `\\`, `\"`, and `\n` are the only recognized escapes.
pub fn decode_string(argument: &str) -> Result<String, MacroError> {
    let mut textual = String::new();
    let mut in_string = false;
    let mut in_escape = false;
    for c in argument.chars() {
        if !in_string {
            match c {
                '"' => in_string = true,
                ' ' | '\t' | '\n' => {}
                _ => {
                    return Err(MacroError::UnexpectedSymbolInString(c, argument.to_string()));
                }
            }
        } else if in_escape {
            let replacement = match c {
                '\\' => '\\',
                '"' => '"',
                'n' => '\n',
                _ => return Err(MacroError::UnknownEscape(c)),
            };
            textual.push(replacement);
            in_escape = false;
        } else if c == '"' {
            in_string = false;
        } else if c == '\\' {
            in_escape = true;
        } else {
            textual.push(c);
        }
    }
    if in_string {
        return Err(MacroError::UnterminatedStringArgument(argument.to_string()));
    }
    Ok(textual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_rejects_leading_digit() {
        assert!(!is_valid_identifier("1abc"));
    }

    #[test]
    fn identifier_allows_underscores() {
        assert!(is_valid_identifier("a_b_c"));
    }

    #[test]
    fn identifier_rejects_all_underscores() {
        assert!(!is_valid_identifier("___"));
    }

    #[test]
    fn identifier_rejects_leading_underscore() {
        assert!(!is_valid_identifier("_foo"));
    }

    #[test]
    fn variable_name_rejects_leading_digit() {
        assert!(!is_valid_variable_name("1abc"));
    }

    #[test]
    fn variable_name_allows_underscores() {
        assert!(is_valid_variable_name("a_b_c"));
    }

    #[test]
    fn variable_name_rejects_all_underscores() {
        assert!(!is_valid_variable_name("___"));
    }

    #[test]
    fn variable_name_allows_leading_underscore() {
        assert!(is_valid_variable_name("_foo"));
        assert!(is_valid_variable_name("__bar"));
    }

    #[test]
    fn decode_plain_string() {
        assert_eq!(decode_string("\"hello\"").unwrap(), "hello");
    }

    #[test]
    fn decode_with_escapes() {
        assert_eq!(
            decode_string(r#" "a\"b\\c\nd" "#).unwrap(),
            "a\"b\\c\nd"
        );
    }

    #[test]
    fn decode_rejects_unterminated() {
        assert!(decode_string("\"abc").is_err());
    }

    #[test]
    fn decode_rejects_stray_chars() {
        assert!(decode_string("x\"abc\"").is_err());
    }
}
