// This file is part of pal8asm, a cross-assembler.
// Copyright (C) 2020 Jeffrey Sharp
//
// pal8asm is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// pal8asm is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with pal8asm.  If not, see <http://www.gnu.org/licenses/>.

//! Command-line argument parsing (spec §6): `pal [-d] [-l] [-p] [-r] [-x]
//! [-v] [-h] input.pal`. `-v`/`-h` are handled outside clap's own
//! `--help`/`--version` machinery because the original exits with status
//! 255, not clap's usual 0/2.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = crate::PROGRAM_NAME,
    disable_help_flag = true,
    disable_version_flag = true,
    about = None,
)]
pub struct Args {
    /// Dump the symbol table to stdout after assembly.
    #[arg(short = 'd')]
    pub dump_symbols: bool,

    /// Enable auto-generated off-page MRI literals.
    #[arg(short = 'l')]
    pub literals: bool,

    /// Write a permanent-symbol file alongside the object file.
    #[arg(short = 'p')]
    pub write_permanent: bool,

    /// Output RIM format instead of BIN.
    #[arg(short = 'r')]
    pub rim: bool,

    /// Emit a cross-reference (concordance) listing.
    #[arg(short = 'x')]
    pub xref: bool,

    /// Print version information and exit.
    #[arg(short = 'v')]
    pub version: bool,

    /// Print usage information and exit.
    #[arg(short = 'h')]
    pub help: bool,

    pub input: Option<PathBuf>,
}

/// Status code for `-v`/`-h`, matching `palbart`'s `exit(-1)` (spec §6 NEW).
pub const USAGE_EXIT_CODE: i32 = 255;

pub const USAGE: &str = "usage: pal8 [-d] [-l] [-p] [-r] [-x] [-v] [-h] input.pal";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_and_input() {
        let args = Args::parse_from(["pal8", "-l", "-r", "prog.pal"]);
        assert!(args.literals);
        assert!(args.rim);
        assert!(!args.dump_symbols);
        assert_eq!(args.input, Some(PathBuf::from("prog.pal")));
    }

    #[test]
    fn help_flag_does_not_short_circuit_clap() {
        let args = Args::parse_from(["pal8", "-h"]);
        assert!(args.help);
    }
}
