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

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser as ClapParser;
use macropp::Parser;

/// Source-to-source macro preprocessor for a C-like host language.
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Reference the input file as the source of truth for positions
    /// rather than honoring any pre-existing `# <line> "<path>"` directives
    /// it contains.
    #[arg(long)]
    rawlines: bool,

    /// Host-language source file to preprocess.
    input: PathBuf,

    /// Path to write the transformed source file to.
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut parser = Parser::new(cli.rawlines);
    if !parser.translate(&cli.input, &cli.output)? {
        std::process::exit(1);
    }
    Ok(())
}
