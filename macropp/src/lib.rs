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

//! A source-to-source preprocessor for a C-like host language: tokenizes one
//! file, expands a closed family of built-in meta-macros plus user-defined
//! macros, and emits a transformed file whose synthesized line directives
//! preserve accurate `file:line:column` references back to the original
//! sources.
//!
//! [`Parser`] is the entry point: build one with [`Parser::new`], then call
//! [`Parser::translate`] exactly once.

pub mod error;
pub mod frame;
pub mod language;
pub mod macros;
pub mod parser;
pub mod token;
pub mod tokenize;

pub use parser::Parser;
