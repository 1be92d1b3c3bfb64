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

//! A two-pass cross-assembler for PDP-8 PAL-style source, producing
//! BIN/RIM paper-tape images (spec §1).

pub mod assembler;
pub mod cli;
pub mod engine;
pub mod message;
pub mod paths;
pub mod render;
pub mod util;

/// The name of the assembler, referenced by [`cli`] and [`message`].
pub const PROGRAM_NAME: &str = "pal8";
