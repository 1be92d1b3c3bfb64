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

//! The cross-reference (concordance) listing (spec §6, GLOSSARY
//! "Concordance"): `palbart`'s `printCrossReference`, one row per
//! user-defined symbol with its reference line numbers wrapped at a
//! fixed row width.

use std::io::{self, Write};

use crate::engine::symtab::SymbolTable;
use crate::engine::xref::CrossReference;

/// References per row before wrapping to a continuation line, matching
/// `palbart`'s five-per-row concordance layout (`SYMBOL_COLUMNS`).
const REFS_PER_ROW: usize = 5;

/// Writes one row per non-permanent symbol: name, then its reference
/// line numbers five to a row, indented continuation rows for the rest.
pub fn write_cross_reference<W: Write>(
    out: &mut W,
    symtab: &SymbolTable,
    xref: &CrossReference,
) -> io::Result<()> {
    for sym in symtab.iter().skip(symtab.fixed_count()) {
        let lines = xref.lines_for(sym);
        write!(out, "{:<7}", sym.name)?;
        for (i, line) in lines.iter().enumerate() {
            if i > 0 && i % REFS_PER_ROW == 0 {
                write!(out, "\n{:<7}", "")?;
            }
            write!(out, "  {:5}", line)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;

    #[test]
    fn writes_one_row_per_user_symbol() {
        let mut engine = Engine::new();
        let id = engine.symtab.lookup_or_insert("FOO").unwrap();
        let sym = engine.symtab.get_mut(id);
        engine.xref.record(sym, 3);
        let sym = engine.symtab.get_mut(id);
        engine.xref.record(sym, 7);

        let mut buf = Vec::new();
        write_cross_reference(&mut buf, &engine.symtab, &engine.xref).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("FOO"));
        assert!(text.contains("3"));
        assert!(text.contains("7"));
    }

    #[test]
    fn wraps_after_five_references() {
        let mut engine = Engine::new();
        let id = engine.symtab.lookup_or_insert("BAR").unwrap();
        for line in 1..=6 {
            let sym = engine.symtab.get_mut(id);
            engine.xref.record(sym, line);
        }
        let mut buf = Vec::new();
        write_cross_reference(&mut buf, &engine.symtab, &engine.xref).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
