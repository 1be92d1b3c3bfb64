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

//! The symbol table: a sorted array of [`Symbol`] with a permanent prefix.

use super::error::{AsmError, ErrorTag};
use super::symbol::{Symbol, SymbolFlags, SymbolId};

/// Maximum number of symbols the table holds before a `ST` fatal error.
///
/// `palbart` sizes `SYMBOL_TABLE_SIZE` generously (thousands of entries);
/// this value is likewise far above any real PAL-8 program's symbol count.
pub const SYMBOL_TABLE_SIZE: usize = 8192;

/// Maximum length, in characters, of a symbol name (spec §3).
pub const SYMBOL_NAME_LEN: usize = 6;

/// Sorted symbol table with a permanent (`FIXED`) prefix.
///
/// Invariant: `table` is sorted by `name` at every point a statement
/// boundary is crossed (spec §8, invariant 2). The first
/// `fixed_count` entries are the permanent prefix and are never
/// reordered relative to each other by anything except [`Self::fixtab`].
#[derive(Debug)]
pub struct SymbolTable {
    table: Vec<Symbol>,
    fixed_count: usize,
}

impl SymbolTable {
    /// Creates an empty table with no permanent entries.
    pub fn new() -> Self {
        Self { table: Vec::new(), fixed_count: 0 }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn fixed_count(&self) -> usize {
        self.fixed_count
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.table[id.0]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.table[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.table.iter()
    }

    /// Returns `true` if `table[lo..hi]` is sorted by name — used only by
    /// tests to check the sortedness invariant (spec §8, invariant 2).
    fn is_sorted_range(&self, lo: usize, hi: usize) -> bool {
        self.table[lo..hi].windows(2).all(|w| w[0].name <= w[1].name)
    }

    pub fn is_sorted(&self) -> bool {
        self.is_sorted_range(0, self.fixed_count)
            && self.is_sorted_range(self.fixed_count, self.table.len())
    }

    /// Binary search for `name` within `[lo, hi)`. Returns `Ok(index)` on a
    /// match, `Err(insertion_point)` otherwise — the same contract as
    /// `[T]::binary_search`, mirroring `palbart`'s `binarySearch`, which
    /// returns the bitwise complement of the insertion point on a miss.
    fn search_range(&self, name: &str, lo: usize, hi: usize) -> Result<usize, usize> {
        self.table[lo..hi]
            .binary_search_by(|s| s.name.as_str().cmp(name))
            .map(|i| i + lo)
            .map_err(|i| i + lo)
    }

    /// Finds `name`, inserting an `UNDEFINED` entry if absent (spec §4.2).
    ///
    /// Searches the permanent prefix first, then the user region; on a
    /// double miss, shifts the user region up by one slot and inserts.
    /// Returns `Err` (`ST`, fatal) if the table would overflow.
    pub fn lookup_or_insert(&mut self, name: &str) -> Result<SymbolId, AsmError> {
        if let Ok(ix) = self.search_range(name, 0, self.fixed_count) {
            return Ok(SymbolId(ix));
        }
        match self.search_range(name, self.fixed_count, self.table.len()) {
            Ok(ix) => Ok(SymbolId(ix)),
            Err(ix) => {
                if self.table.len() + 1 > SYMBOL_TABLE_SIZE {
                    return Err(AsmError::with_symbol(ErrorTag::SymbolTableFull, 0, name));
                }
                self.table.insert(ix, Symbol::undefined(name));
                Ok(SymbolId(ix))
            }
        }
    }

    /// Finds `name` without inserting it; used when a reference must not be
    /// auto-vivified (e.g. a label's own name before `defineSymbol`).
    pub fn find(&self, name: &str) -> Option<SymbolId> {
        self.search_range(name, 0, self.fixed_count)
            .or_else(|_| self.search_range(name, self.fixed_count, self.table.len()))
            .ok()
            .map(SymbolId)
    }

    /// Defines `name` with `value` and `flags` (spec §4.2).
    ///
    /// `pass` selects pass-specific behavior: in pass 1, `CONDITION` is
    /// OR'd into the stored flags; in pass 2 it is cleared. Redefinition
    /// of a non-`LABEL` value in pass 2 is reported once (guarded by the
    /// `REDEFINED` flag) and sets `REDEFINED`.
    pub fn define(
        &mut self,
        name: &str,
        value: u16,
        mut flags: SymbolFlags,
        pass: u8,
        column: usize,
    ) -> Result<(SymbolId, Option<AsmError>), AsmError> {
        if name.is_empty() {
            return Err(AsmError::new(ErrorTag::IllegalCharacter, column));
        }

        let id = self.lookup_or_insert(name)?;
        let mut diagnostic = None;

        if self.get(id).flags.is_fixed() {
            return Ok((id, None));
        }

        let is_label = flags.contains(SymbolFlags::LABEL);
        let stored_value = if is_label { value } else { value & 0o7777 };

        if self.get(id).flags.is_defined() && pass == 2 && self.get(id).value != stored_value {
            if !self.get(id).flags.contains(SymbolFlags::REDEFINED) {
                diagnostic = Some(AsmError::with_symbol(ErrorTag::Redefined, column, name));
            }
            flags |= SymbolFlags::REDEFINED;
        }

        if pass == 1 {
            flags |= SymbolFlags::CONDITION;
        } else {
            flags.remove(SymbolFlags::CONDITION);
        }

        let sym = self.get_mut(id);
        sym.value = stored_value;
        sym.flags = flags;

        Ok((id, diagnostic))
    }

    /// `FIXTAB` — marks every current symbol permanent and re-sorts.
    pub fn fixtab(&mut self) {
        for sym in self.table.iter_mut() {
            sym.flags |= SymbolFlags::FIXED;
        }
        self.fixed_count = self.table.len();
        self.table.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// `EXPUNGE` — clears the table (pass 1 only). Caller is responsible
    /// for reinstalling the pseudo-op and permanent-instruction symbols.
    pub fn expunge(&mut self) {
        self.table.clear();
        self.fixed_count = 0;
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_inserts_undefined() {
        let mut t = SymbolTable::new();
        let id = t.lookup_or_insert("FOO").unwrap();
        assert_eq!(t.get(id).name, "FOO");
        assert!(t.get(id).flags.is_undefined());
    }

    #[test]
    fn lookup_is_idempotent() {
        let mut t = SymbolTable::new();
        let a = t.lookup_or_insert("FOO").unwrap();
        let b = t.lookup_or_insert("FOO").unwrap();
        assert_eq!(a, b);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn stays_sorted_after_many_inserts() {
        let mut t = SymbolTable::new();
        for name in ["ZEBRA", "APPLE", "MANGO", "KIWI", "BANANA"] {
            t.lookup_or_insert(name).unwrap();
        }
        assert!(t.is_sorted());
    }

    #[test]
    fn define_masks_to_12_bits_unless_label() {
        let mut t = SymbolTable::new();
        let (id, _) = t.define("X", 0o170000, SymbolFlags::DEFINED, 1, 0).unwrap();
        assert_eq!(t.get(id).value, 0o170000 & 0o7777);

        let (id2, _) = t.define("Y", 0o170000, SymbolFlags::label(), 1, 0).unwrap();
        assert_eq!(t.get(id2).value, 0o170000);
    }

    #[test]
    fn redefinition_reported_once() {
        let mut t = SymbolTable::new();
        t.define("X", 1, SymbolFlags::DEFINED, 1, 0).unwrap();
        let (_, diag1) = t.define("X", 2, SymbolFlags::DEFINED, 2, 5).unwrap();
        assert!(diag1.is_some());
        let (_, diag2) = t.define("X", 3, SymbolFlags::DEFINED, 2, 6).unwrap();
        assert!(diag2.is_none());
    }

    #[test]
    fn fixed_symbol_cannot_be_redefined() {
        let mut t = SymbolTable::new();
        t.define("X", 1, SymbolFlags::fixed_defined(), 1, 0).unwrap();
        t.fixtab();
        let (id, diag) = t.define("X", 2, SymbolFlags::DEFINED, 2, 0).unwrap();
        assert!(diag.is_none());
        assert_eq!(t.get(id).value, 1);
    }

    #[test]
    fn fixtab_freezes_and_resorts() {
        let mut t = SymbolTable::new();
        t.lookup_or_insert("ZEBRA").unwrap();
        t.lookup_or_insert("APPLE").unwrap();
        t.fixtab();
        assert_eq!(t.fixed_count(), 2);
        assert!(t.is_sorted());
        assert!(t.get(SymbolId(0)).flags.is_fixed());
    }

    #[test]
    fn expunge_clears_table() {
        let mut t = SymbolTable::new();
        t.lookup_or_insert("FOO").unwrap();
        t.expunge();
        assert_eq!(t.len(), 0);
        assert_eq!(t.fixed_count(), 0);
    }

    #[test]
    fn condition_bit_set_in_pass1_cleared_in_pass2() {
        let mut t = SymbolTable::new();
        let (id, _) = t.define("X", 1, SymbolFlags::DEFINED, 1, 0).unwrap();
        assert!(t.get(id).flags.contains(SymbolFlags::CONDITION));

        let (id2, _) = t.define("X", 1, SymbolFlags::DEFINED, 2, 0).unwrap();
        assert!(!t.get(id2).flags.contains(SymbolFlags::CONDITION));
    }

    #[test]
    fn table_full_is_fatal() {
        let mut t = SymbolTable::new();
        // Shrink effective capacity by inserting up to the limit would be
        // slow; instead verify the error shape directly via a tiny table.
        for i in 0..SYMBOL_TABLE_SIZE {
            t.lookup_or_insert(&format!("S{i}")).unwrap();
        }
        let err = t.lookup_or_insert("OVERFLOW").unwrap_err();
        assert_eq!(err.tag, ErrorTag::SymbolTableFull);
    }
}
