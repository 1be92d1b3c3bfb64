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

//! The long-form error file (spec §6): one entry per pass-2 diagnostic,
//! deleted at the end of a clean run.

use std::io::{self, Write};

use crate::engine::error::AsmError;

/// Writes entries in `palbart`'s `errorSymbol`/`errorMessage` format:
/// `filename(line:col) : error:  <text>["name"] at Loc = <octal5>\n`.
pub struct ErrorFileWriter<W: Write> {
    out: W,
}

impl<W: Write> ErrorFileWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_entry(&mut self, path: &str, line: u32, clc: u16, error: &AsmError) -> io::Result<()> {
        let linecol = format!("({}:{})", line, error.column + 1);
        match &error.symbol {
            Some(name) => writeln!(
                self.out,
                "{}{:<9} : error:  {} \"{}\" at Loc = {:05o}",
                path, linecol, error.tag.long_message(), name, clc
            ),
            None => writeln!(
                self.out,
                "{}{:<9} : error:  {} at Loc = {:05o}",
                path, linecol, error.tag.long_message(), clc
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::ErrorTag;

    #[test]
    fn formats_entry_with_symbol() {
        let mut buf = Vec::new();
        {
            let mut w = ErrorFileWriter::new(&mut buf);
            let err = AsmError::with_symbol(ErrorTag::Undefined, 3, "FOO");
            w.write_entry("prog.pal", 10, 0o200, &err).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "prog.pal(10:4) : error:  undefined symbol \"FOO\" at Loc = 00200\n");
    }

    #[test]
    fn formats_entry_without_symbol() {
        let mut buf = Vec::new();
        {
            let mut w = ErrorFileWriter::new(&mut buf);
            let err = AsmError::new(ErrorTag::IllegalEquals, 0);
            w.write_entry("x.pal", 1, 0o177, &err).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "x.pal(1:1) : error:  illegal equals at Loc = 00177\n");
    }
}
