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

//! Symbols and their attribute lattice.

use bitflags::bitflags;

bitflags! {
    /// Symbol attribute bits (spec §3).
    ///
    /// `UNDEFINED` is the empty set, not a flag. `FIXED` implies
    /// `DEFINED`; `MRI` implies `FIXED | DEFINED`; `PSEUDO` implies
    /// `FIXED | DEFINED`. These implications are enforced by the
    /// constructor helpers below rather than by the bit layout, mirroring
    /// `palbart`'s `MRIFIX`/`DEFFIX`/`PSEUDO` composite enum constants.
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
    pub struct SymbolFlags: u16 {
        const DEFINED   = 0o0001;
        const FIXED     = 0o0002;
        const MRI       = 0o0004;
        const LABEL     = 0o0010;
        const REDEFINED = 0o0020;
        const DUPLICATE = 0o0040;
        const PSEUDO    = 0o0100;
        const CONDITION = 0o0200;
    }
}

impl SymbolFlags {
    /// The flag set for a fixed memory-reference-instruction opcode.
    pub fn mri() -> Self {
        Self::MRI | Self::FIXED | Self::DEFINED
    }

    /// The flag set for a fixed, defined, non-MRI operate/IOT mnemonic.
    pub fn fixed_defined() -> Self {
        Self::FIXED | Self::DEFINED
    }

    /// The flag set for a pseudo-op (directive) name.
    pub fn pseudo() -> Self {
        Self::PSEUDO | Self::FIXED | Self::DEFINED
    }

    /// The flag set for a user label (`name,`).
    pub fn label() -> Self {
        Self::LABEL | Self::DEFINED
    }

    #[inline]
    pub fn is_undefined(self) -> bool {
        !self.contains(Self::DEFINED)
    }

    #[inline]
    pub fn is_defined(self) -> bool {
        self.contains(Self::DEFINED)
    }

    #[inline]
    pub fn is_fixed(self) -> bool {
        self.contains(Self::FIXED)
    }

    #[inline]
    pub fn is_mri(self) -> bool {
        self.contains(Self::MRI)
    }

    #[inline]
    pub fn is_pseudo(self) -> bool {
        self.contains(Self::PSEUDO)
    }

    /// Whether, ignoring the pass-1-only `CONDITION` bit, this symbol
    /// reads as defined for the purposes of `IFDEF`/`IFNDEF` (spec §4.7).
    #[inline]
    pub fn is_defined_conditionally(self) -> bool {
        self.is_defined() && !self.contains(Self::CONDITION)
    }
}

// -----------------------------------------------------------------------------

/// An identifier for a symbol's slot in a [`SymbolTable`](super::symtab::SymbolTable).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SymbolId(pub usize);

/// A symbol table entry.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Symbol {
    /// Name, uppercased, truncated to 6 characters at creation time.
    pub name: String,
    /// 12-bit value, or the full 15-bit `clc` for a `LABEL`.
    pub value: u16,
    pub flags: SymbolFlags,
    /// Base index into the flat cross-reference array; `0` until assigned.
    pub xref_index: usize,
    /// Count of references recorded so far in the cross-reference array.
    pub xref_count: usize,
}

impl Symbol {
    pub fn undefined(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: 0,
            flags: SymbolFlags::empty(),
            xref_index: 0,
            xref_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mri_implies_fixed_and_defined() {
        let f = SymbolFlags::mri();
        assert!(f.is_mri());
        assert!(f.is_fixed());
        assert!(f.is_defined());
    }

    #[test]
    fn pseudo_implies_fixed_and_defined() {
        let f = SymbolFlags::pseudo();
        assert!(f.is_pseudo());
        assert!(f.is_fixed());
        assert!(f.is_defined());
    }

    #[test]
    fn undefined_is_empty() {
        let f = SymbolFlags::empty();
        assert!(f.is_undefined());
        assert!(!f.is_defined());
    }

    #[test]
    fn condition_bit_affects_conditional_read() {
        let defined_in_pass1 = SymbolFlags::DEFINED | SymbolFlags::CONDITION;
        assert!(defined_in_pass1.is_defined());
        assert!(!defined_in_pass1.is_defined_conditionally());

        let defined_in_pass2 = SymbolFlags::DEFINED;
        assert!(defined_in_pass2.is_defined_conditionally());
    }

    #[test]
    fn new_symbol_is_undefined() {
        let sym = Symbol::undefined("FOO");
        assert_eq!(sym.name, "FOO");
        assert_eq!(sym.value, 0);
        assert!(sym.flags.is_undefined());
    }
}
