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

//! `debugf_core(level, stable_id, format, args...)`: expands to a
//! statement-expression that serializes a structured log record, sized and
//! typed by walking `format` the way a printf implementation would.

use crate::{
    error::MacroError,
    language::decode_string,
    macros::{MacroImpl, MacroResult},
    parser::Parser,
    token::{argument, python_token, Token},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ArgType {
    Char,
    Short,
    Int,
    Long,
    LongLong,
    PtrdiffT,
    IntmaxT,
    SizeT,
    VoidPtr,
    Double,
    String,
}

impl ArgType {
    fn c_type(self) -> &'static str {
        match self {
            ArgType::Char => "unsigned char",
            ArgType::Short => "unsigned short",
            ArgType::Int => "unsigned int",
            ArgType::Long => "unsigned long",
            ArgType::LongLong => "unsigned long long",
            ArgType::PtrdiffT => "ptrdiff_t",
            ArgType::IntmaxT => "intmax_t",
            ArgType::SizeT => "size_t",
            ArgType::VoidPtr => "const void *",
            ArgType::Double => "double",
            ArgType::String => "const char *",
        }
    }

    fn is_string(self) -> bool {
        matches!(self, ArgType::String)
    }
}

pub struct DebugfCore;

impl MacroImpl for DebugfCore {
    fn call(
        &self,
        _parser: &mut Parser,
        mut args: Vec<Vec<Token>>,
        name_token: Token,
    ) -> Result<MacroResult, MacroError> {
        if args.len() < 3 {
            return Err(MacroError::WrongArgCount {
                macro_: "debugf".into(),
                expected: "at least two arguments".into(),
            });
        }
        let varargs = args.split_off(3);
        let mut args = args.into_iter();
        let loglevel_tokens = args.next().unwrap();
        let stable_id_tokens = args.next().unwrap();
        let format_raw_tokens = args.next().unwrap();

        let loglevel = argument(&loglevel_tokens);
        if !matches!(loglevel.as_str(), "CRITICAL" | "WARNING" | "INFO" | "DEBUG" | "TRACE") {
            return Err(MacroError::InvalidLogLevel(loglevel));
        }

        let stable_id = decode_string(&argument(&stable_id_tokens))?;
        let stable_id = if stable_id.is_empty() {
            None
        } else if stable_id.chars().all(char::is_alphanumeric) {
            Some(stable_id)
        } else {
            return Err(MacroError::InvalidStableId(stable_id));
        };

        let format = decode_string(&argument(&format_raw_tokens))?;
        let arg_types = parse_printf_format(&format)?;
        if arg_types.len() != varargs.len() {
            return Err(MacroError::DebugfArgCountMismatch {
                expected: arg_types.len(),
                found: varargs.len(),
            });
        }

        let mut tokens = vec![
            python_token("({"),
            python_token(
                r#"static __attribute__((section ("debugf_messages"))) const char _msg_format[] = ("#,
            ),
        ];
        tokens.extend(format_raw_tokens);
        tokens.push(python_token(");"));
        let escaped_file = name_token.file().replace('\\', "\\\\").replace('"', "\\\"");
        tokens.push(python_token(format!(
            r#"static __attribute__((section ("debugf_messages"))) const char _msg_filename[] = "{escaped_file}";"#
        )));

        if stable_id.is_some() {
            tokens.push(python_token(
                r#"static __attribute__((section ("debugf_messages"))) const char _msg_stable[] = "#,
            ));
            tokens.extend(stable_id_tokens.clone());
            tokens.push(python_token(";"));
        }

        tokens.push(python_token(
            "static __attribute__((section (\"debugf_messages\"))) const struct debugf_metadata ",
        ));
        tokens.push(python_token("_msg_metadata = {"));
        tokens.push(python_token(".loglevel = ("));
        tokens.extend(loglevel_tokens);
        tokens.push(python_token("),"));
        if stable_id.is_some() {
            tokens.push(python_token(".stable_id = _msg_stable,"));
        } else {
            tokens.push(python_token(".stable_id = (void *) 0,"));
        }
        tokens.push(python_token(".format = _msg_format,"));
        tokens.push(python_token(".filename = _msg_filename,"));
        tokens.push(python_token(format!(".line_number = {},", name_token.line())));
        tokens.push(python_token("};"));
        tokens.push(python_token("struct {"));
        tokens.push(python_token("const struct debugf_metadata *metadata;"));
        tokens.push(python_token("uint64_t timestamp;"));
        for (i, arg_type) in arg_types.iter().enumerate() {
            if !arg_type.is_string() {
                tokens.push(python_token(format!("{} arg{};", arg_type.c_type(), i)));
            }
        }
        tokens.push(python_token("} __attribute__((packed)) _msg_state = {"));
        tokens.push(python_token(".metadata = &_msg_metadata,"));
        tokens.push(python_token(".timestamp = clock_timestamp_fast(),"));
        for (i, (arg_type, arg_expr)) in arg_types.iter().zip(varargs.iter()).enumerate() {
            if !arg_type.is_string() {
                tokens.push(python_token(format!(".arg{i} = (")));
                tokens.extend(arg_expr.clone());
                tokens.push(python_token("),"));
            }
        }
        tokens.push(python_token("};"));
        for (i, (arg_type, arg_expr)) in arg_types.iter().zip(varargs.iter()).enumerate() {
            if arg_type.is_string() {
                tokens.push(python_token(format!("{} _msg_str{i} = (", arg_type.c_type())));
                tokens.extend(arg_expr.clone());
                tokens.push(python_token(");"));
            }
        }

        tokens.push(python_token("const void *_msg_seqs[] = {"));
        tokens.push(python_token("&_msg_state,"));
        let last_string_arg = arg_types
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_string())
            .map(|(i, _)| i)
            .last();
        for (i, arg_type) in arg_types.iter().enumerate() {
            if arg_type.is_string() {
                tokens.push(python_token(format!("_msg_str{i},")));
            }
        }
        tokens.push(python_token("};"));
        tokens.push(python_token("size_t _msg_sizes[] = { sizeof(_msg_state),"));
        let mut num_seqs = 1;
        for (i, arg_type) in arg_types.iter().enumerate() {
            if arg_type.is_string() {
                let pad = if Some(i) == last_string_arg { 0 } else { 1 };
                tokens.push(python_token(format!("strlen(_msg_str{i}) + {pad},")));
                num_seqs += 1;
            }
        }
        tokens.push(python_token("};"));
        tokens.push(python_token(format!(
            "debugf_internal(_msg_seqs, _msg_sizes, {num_seqs});"
        )));
        tokens.push(python_token("})"));

        Ok(MacroResult::Final { tokens, reinterpret: false })
    }
}

/// Walks a printf-style format string, returning the argument type each
/// conversion specifier demands, in order. `*` width/precision each
/// contribute an extra leading `int` argument.
fn parse_printf_format(format: &str) -> Result<Vec<ArgType>, MacroError> {
    let chars: Vec<char> = format.chars().collect();
    let mut pos = 0;
    let mut args = Vec::new();

    fn accept(chars: &[char], pos: &mut usize, set: &str, format: &str) -> Result<bool, MacroError> {
        if *pos >= chars.len() {
            return Err(MacroError::FormatEndedEarly(format.to_string()));
        }
        if set.contains(chars[*pos]) {
            *pos += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    while pos < chars.len() {
        let c = chars[pos];
        pos += 1;
        if c != '%' {
            continue;
        }
        if accept(&chars, &mut pos, "%", format)? {
            continue;
        }
        while accept(&chars, &mut pos, "0-+ #", format)? {}
        if accept(&chars, &mut pos, "*", format)? {
            args.push(ArgType::Int);
        } else {
            while accept(&chars, &mut pos, "0123456789", format)? {}
        }
        if accept(&chars, &mut pos, ".", format)? {
            if accept(&chars, &mut pos, "*", format)? {
                args.push(ArgType::Int);
            } else {
                while accept(&chars, &mut pos, "0123456789", format)? {}
            }
        }
        let length = if accept(&chars, &mut pos, "l", format)? {
            if accept(&chars, &mut pos, "l", format)? {
                ArgType::LongLong
            } else {
                ArgType::Long
            }
        } else if accept(&chars, &mut pos, "h", format)? {
            if accept(&chars, &mut pos, "h", format)? {
                ArgType::Char
            } else {
                ArgType::Short
            }
        } else if accept(&chars, &mut pos, "t", format)? {
            ArgType::PtrdiffT
        } else if accept(&chars, &mut pos, "j", format)? {
            ArgType::IntmaxT
        } else if accept(&chars, &mut pos, "z", format)? {
            ArgType::SizeT
        } else {
            ArgType::Int
        };

        if accept(&chars, &mut pos, "diuxXob", format)? {
            args.push(length);
        } else if accept(&chars, &mut pos, "fFeEgG", format)? {
            args.push(ArgType::Double);
        } else if accept(&chars, &mut pos, "c", format)? {
            args.push(ArgType::Char);
        } else if accept(&chars, &mut pos, "s", format)? {
            args.push(ArgType::String);
        } else if accept(&chars, &mut pos, "p", format)? {
            args.push(ArgType::VoidPtr);
        } else {
            return Err(MacroError::UnexpectedSpecifier(chars[pos], format.to_string()));
        }
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_int_specifier() {
        let types = parse_printf_format("hi=%d").unwrap();
        assert_eq!(types, vec![ArgType::Int]);
    }

    #[test]
    fn percent_escape_consumes_no_argument() {
        let types = parse_printf_format("100%% done").unwrap();
        assert!(types.is_empty());
    }

    #[test]
    fn dynamic_width_adds_extra_int() {
        let types = parse_printf_format("%*d").unwrap();
        assert_eq!(types, vec![ArgType::Int, ArgType::Int]);
    }

    #[test]
    fn string_and_double_specifiers() {
        let types = parse_printf_format("%s=%f").unwrap();
        assert_eq!(types, vec![ArgType::String, ArgType::Double]);
    }

    #[test]
    fn unterminated_specifier_is_an_error() {
        assert!(parse_printf_format("abc%").is_err());
    }

    #[test]
    fn unknown_specifier_is_an_error() {
        assert!(parse_printf_format("%q").is_err());
    }
}
