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

//! Thin text renderers for the listing, error, cross-reference, and
//! permanent-symbol files (spec §6). Each writer owns no assembly state
//! of its own; it borrows [`crate::engine::Engine`] pieces and formats
//! them exactly as `palbart`'s `printLine`/`errorSymbol`/
//! `printCrossReference`/`printPermanentSymbolTable` do.

pub mod errors;
pub mod listing;
pub mod permsym;
pub mod xref;

pub use errors::ErrorFileWriter;
pub use listing::ListingWriter;
pub use permsym::write_permanent_symbol_table;
pub use xref::write_cross_reference;
