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

//! The permanent-symbol file (spec §6), readable back in after `EXPUNGE`:
//! `palbart`'s `printPermanentSymbolTable`.

use std::io::{self, Write};

use crate::engine::symtab::SymbolTable;

/// Writes `EXPUNGE`, one `FIXMRI name=0val` per MRI symbol, one
/// ` name=0val` per other fixed non-pseudo symbol, then `FIXTAB`.
pub fn write_permanent_symbol_table<W: Write>(out: &mut W, symtab: &SymbolTable) -> io::Result<()> {
    writeln!(out, "/ PERMANENT SYMBOL TABLE")?;
    writeln!(out, "/")?;
    writeln!(out, "        EXPUNGE")?;
    writeln!(out, "/")?;

    for sym in symtab.iter() {
        if sym.flags.is_mri() {
            writeln!(out, "{:<7} {}={:04o}", "FIXMRI", sym.name, sym.value)?;
        }
    }
    for sym in symtab.iter() {
        if sym.flags.is_fixed() && !sym.flags.is_mri() && !sym.flags.is_pseudo() {
            writeln!(out, "{:<7} {}={:04o}", " ", sym.name, sym.value)?;
        }
    }

    writeln!(out, "/")?;
    writeln!(out, "        FIXTAB")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;

    #[test]
    fn emits_expunge_fixmri_entries_and_fixtab() {
        let engine = Engine::new();
        let mut buf = Vec::new();
        write_permanent_symbol_table(&mut buf, &engine.symtab).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("EXPUNGE"));
        assert!(text.contains("FIXMRI TAD=1000"));
        assert!(text.trim_end().ends_with("FIXTAB"));
    }
}
