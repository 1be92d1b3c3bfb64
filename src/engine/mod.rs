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

//! The assembly engine: all mutable assembly state, owned by one value
//! and threaded by `&mut` through the pass driver and every component
//! (Design Notes §9, "model as an explicit engine value").

pub mod dubl;
pub mod encoder;
pub mod error;
pub mod expr;
pub mod fltg;
pub mod lexer;
pub mod line;
pub mod listing;
pub mod literal;
pub mod opcodes;
pub mod pass;
pub mod pseudo;
pub mod symbol;
pub mod symtab;
pub mod xref;

use listing::ListingState;
use literal::LiteralPool;
use symtab::SymbolTable;
use xref::CrossReference;

/// A pool-flush request raised by the pseudo-op dispatcher for the pass
/// driver to carry out against the object encoder and listing (spec
/// §4.6: `PAGE`/`SEGMNT`/`FIELD` flush pools before moving the origin).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FlushRequest {
    CurrentPageOnly,
    Both,
}

/// Which multi-line constant mode the pass driver should enter after a
/// `DUBL`/`FLTG` directive (spec §4.6).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ConstMode {
    Dubl,
    Fltg,
}

/// Current object-tape output mode (spec §4.9).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OutputMode {
    Bin,
    Rim,
}

/// Which of the two assembly passes is running (spec §4.8).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Pass {
    One,
    Two,
}

impl Pass {
    pub fn as_u8(self) -> u8 {
        match self {
            Pass::One => 1,
            Pass::Two => 2,
        }
    }
}

/// Bit positions within a 15-bit `clc` (field in bits 12-14).
const FIELD_SHIFT: u16 = 12;
const ADDR_MASK: u16 = 0o7777;
const PAGE_MASK: u16 = 0o7600;

/// All mutable state shared by every engine component.
///
/// Fields mirror `palbart`'s process-wide globals (`clc`, `field`,
/// `reloc`, `radix`, `pass`, …), collected onto one value instead of
/// living at file scope (Design Notes §9).
pub struct Engine {
    pub symtab: SymbolTable,
    pub xref: CrossReference,
    pub pz_pool: LiteralPool,
    pub cp_pool: LiteralPool,

    /// In-field 12-bit address, NOT including the field bits.
    pub clc: u16,
    /// Current field, 0-7.
    pub field: u16,
    /// Relocation offset, added when reporting `.`'s value to the caller
    /// but not stored in `clc` itself.
    pub reloc: i16,
    /// Current input/literal radix: 8 or 10.
    pub radix: u8,
    pub mode: OutputMode,
    /// Whether off-page MRI auto-indirect generation is permitted (`-l`).
    pub literals_on: bool,
    /// Running 12-bit object checksum.
    pub checksum: u16,
    /// Whether any data frame has been emitted since the last flush.
    pub binary_emitted: bool,
    /// Current pass.
    pub pass: Pass,
    /// 1-based current source line number.
    pub lineno: u32,
    /// Count of errors seen in pass 1, tracked separately purely for the
    /// final "N errors detected" banner (SPEC_FULL §4.8 NEW addition).
    pub errors_pass_1: u32,
    pub errors_pass_2: u32,
    /// Whether this line set `error_in_line` (spec §7).
    pub error_in_line: bool,
    /// Listing output enabled (`XLIST` toggles this).
    pub listing_enabled: bool,
    pub listing: ListingState,

    /// Object-file punch enabled (`NOPUNCH`/`ENPUNCH`).
    pub punch_enabled: bool,
    /// Set by the pseudo-op dispatcher when a pool flush is owed before
    /// the pass driver emits the next origin; cleared once honored.
    pub pending_flush: Option<FlushRequest>,
    /// Set by `FIELD` alongside `pending_flush`: the new field value (0-7)
    /// whose select frame the pass driver must punch, after flushing the
    /// outgoing field's pools and before resuming at the new origin
    /// (spec §4.6, `FIELD`).
    pub pending_field_frame: Option<u16>,
    /// Words queued by `TEXT`/`ZBLOCK` for the pass driver to emit
    /// starting at the current `clc`.
    pub pending_words: Vec<u16>,
    /// Set by `BINPUNCH`/`RIMPUNCH`: `(new_mode, leader_len)`, where
    /// `leader_len == -1` suppresses the RIM checksum frame.
    pub pending_mode_switch: Option<(OutputMode, i32)>,
    /// Set by `DUBL`/`FLTG` to switch the next lines into constant-parse
    /// mode until a non-numeric lexeme appears.
    pub const_mode: Option<ConstMode>,
    /// Set by `IFDEF`/`IFNDEF`/`IFZERO`/`IFNZERO`: whether the driver
    /// should take the `<...>` branch (`Some(true)`) or skip it
    /// (`Some(false)`).
    pub pending_conditional: Option<bool>,
    /// Whether the most recently emitted word was generated by MRI
    /// off-page auto-indirection, for the listing's `@` suffix.
    pub last_auto_indirect: bool,
    /// Non-aborting diagnostics raised mid-expression (e.g. a literal-pool
    /// reference while literals are off) that the pass driver should book
    /// as errors without cutting the statement short. Drained after each
    /// statement dispatch.
    pub pending_soft_errors: Vec<error::AsmError>,
}

impl Engine {
    pub fn new() -> Self {
        let mut symtab = SymbolTable::new();
        Self::install_permanent_symbols(&mut symtab);

        Self {
            symtab,
            xref: CrossReference::new(),
            pz_pool: LiteralPool::new(),
            cp_pool: LiteralPool::new(),
            clc: 0o200,
            field: 0,
            reloc: 0,
            radix: 8,
            mode: OutputMode::Bin,
            literals_on: false,
            checksum: 0,
            binary_emitted: false,
            pass: Pass::One,
            lineno: 0,
            errors_pass_1: 0,
            errors_pass_2: 0,
            error_in_line: false,
            listing_enabled: true,
            listing: ListingState::new(),
            punch_enabled: true,
            pending_flush: None,
            pending_field_frame: None,
            pending_words: Vec::new(),
            pending_mode_switch: None,
            const_mode: None,
            pending_conditional: None,
            last_auto_indirect: false,
            pending_soft_errors: Vec::new(),
        }
    }

    /// Seeds `symtab` with the pseudo-op directives and the permanent
    /// instruction mnemonics, then `FIXTAB`s them (spec §4.2 NEW addition).
    pub fn install_permanent_symbols(symtab: &mut SymbolTable) {
        opcodes::for_each_permanent(|name, value, flags| {
            let id = symtab.lookup_or_insert(name).expect("permanent table fits");
            let sym = symtab.get_mut(id);
            sym.value = value;
            sym.flags = flags;
        });
        symtab.fixtab();
    }

    /// `EXPUNGE` — re-seeds only the pseudo-op directives, leaving the
    /// instruction mnemonics out so the user can redefine them (spec
    /// §4.2: "empties the table and re-installs the pseudo-op directives").
    pub fn install_pseudo_symbols(symtab: &mut SymbolTable) {
        opcodes::for_each_pseudo(|name, value, flags| {
            let id = symtab.lookup_or_insert(name).expect("pseudo table fits");
            let sym = symtab.get_mut(id);
            sym.value = value;
            sym.flags = flags;
        });
        symtab.fixtab();
    }

    /// The full 15-bit packed location: field in bits 12-14, address in
    /// bits 0-11.
    pub fn clc_with_field(&self) -> u16 {
        (self.field << FIELD_SHIFT) | (self.clc & ADDR_MASK)
    }

    /// `.`'s value: the current location plus the relocation offset.
    pub fn dot_value(&self) -> u16 {
        (self.clc as i32 + self.reloc as i32) as u16 & ADDR_MASK
    }

    /// The base address (bits 7-11) of the page containing `clc`.
    pub fn page_base(&self) -> u16 {
        self.clc & PAGE_MASK
    }

    pub fn is_page_zero(&self) -> bool {
        self.page_base() == 0
    }

    /// Advances `clc` by one word, preserving field bits, per spec §4.8:
    /// `clc = (clc & 070000) | ((clc+1) & 07777)`. Field is tracked
    /// separately here, so this simply wraps the 12-bit address.
    pub fn advance_clc(&mut self) {
        self.clc = (self.clc + 1) & ADDR_MASK;
    }

    /// Selects the pool that `[expr]`/`(expr)`/off-page-MRI literals
    /// should go into: page zero always redirects to `pz_pool` per
    /// spec §4.5 ("because the current page *is* page zero").
    pub fn pool_mut(&mut self, want_current_page: bool) -> &mut LiteralPool {
        if !want_current_page || self.is_page_zero() {
            &mut self.pz_pool
        } else {
            &mut self.cp_pool
        }
    }

    /// `testForLiteralCollision` — checks whether `clc` has grown into
    /// the literal pool it shares a page with (spec §4.5). Page zero
    /// always checks `pz_pool`, regardless of which page `clc` is
    /// currently in; any other page checks its own `cp_pool`. One-shot
    /// per page, via each pool's own `check_collision`.
    pub fn check_literal_collision(&mut self) -> Option<error::ErrorTag> {
        let offset = (self.clc & 0o177) as usize;
        if self.page_base() == 0 {
            self.pz_pool.check_collision(offset).then_some(error::ErrorTag::PageZeroLiteralOverflow)
        } else {
            self.cp_pool.check_collision(offset).then_some(error::ErrorTag::PageLiteralOverflow)
        }
    }

    pub fn errors_total(&self) -> u32 {
        self.errors_pass_1 + self.errors_pass_2
    }

    /// Re-arms the engine for a fresh pass over the same source, keeping
    /// `symtab` (and the error tally already booked against the pass that
    /// just finished) but resetting every other piece of per-pass state
    /// to its initial value (spec §4.8: two full scans share one symbol
    /// table but otherwise start clean).
    pub fn reset_for_pass(&mut self, pass: Pass, mode: OutputMode, literals_on: bool) {
        self.xref = CrossReference::new();
        self.pz_pool = LiteralPool::new();
        self.cp_pool = LiteralPool::new();
        self.clc = 0o200;
        self.field = 0;
        self.reloc = 0;
        self.radix = 8;
        self.mode = mode;
        self.literals_on = literals_on;
        self.checksum = 0;
        self.binary_emitted = false;
        self.pass = pass;
        self.lineno = 0;
        self.error_in_line = false;
        self.listing_enabled = true;
        self.listing = ListingState::new();
        self.punch_enabled = true;
        self.pending_flush = None;
        self.pending_field_frame = None;
        self.pending_words = Vec::new();
        self.pending_mode_switch = None;
        self.const_mode = None;
        self.pending_conditional = None;
        self.last_auto_indirect = false;
        self.pending_soft_errors = Vec::new();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_engine_has_permanent_symbols_installed() {
        let e = Engine::new();
        let tad = e.symtab.find("TAD").expect("TAD installed");
        assert!(e.symtab.get(tad).flags.is_mri());
        assert_eq!(e.symtab.get(tad).value, 0o1000);
        assert!(e.symtab.fixed_count() > 0);
    }

    #[test]
    fn clc_with_field_packs_correctly() {
        let mut e = Engine::new();
        e.field = 3;
        e.clc = 0o1234;
        assert_eq!(e.clc_with_field(), (3 << 12) | 0o1234);
    }

    #[test]
    fn advance_clc_wraps_within_field() {
        let mut e = Engine::new();
        e.clc = 0o7777;
        e.advance_clc();
        assert_eq!(e.clc, 0);
    }

    #[test]
    fn page_zero_redirect_for_literal_pool() {
        let mut e = Engine::new();
        e.clc = 0o0050;
        {
            let pool = e.pool_mut(true);
            pool.insert(1);
        }
        assert!(!e.pz_pool.is_empty());
        assert!(e.cp_pool.is_empty());
    }
}
