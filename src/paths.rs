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

//! Output pathname derivation: swap the input's extension (spec §6).

use std::path::{Path, PathBuf};

use crate::engine::OutputMode;

fn with_extension(input: &Path, ext: &str) -> PathBuf {
    input.with_extension(ext)
}

/// `.bin` or `.rim`, depending on output mode.
pub fn object_path(input: &Path, mode: OutputMode) -> PathBuf {
    match mode {
        OutputMode::Bin => with_extension(input, "bin"),
        OutputMode::Rim => with_extension(input, "rim"),
    }
}

pub fn listing_path(input: &Path) -> PathBuf {
    with_extension(input, "lst")
}

pub fn error_path(input: &Path) -> PathBuf {
    with_extension(input, "err")
}

pub fn permanent_symbol_path(input: &Path) -> PathBuf {
    with_extension(input, "prm")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_bin_and_rim() {
        let p = Path::new("prog.pal");
        assert_eq!(object_path(p, OutputMode::Bin), PathBuf::from("prog.bin"));
        assert_eq!(object_path(p, OutputMode::Rim), PathBuf::from("prog.rim"));
    }

    #[test]
    fn derives_listing_error_and_permanent_paths() {
        let p = Path::new("dir/prog.pal");
        assert_eq!(listing_path(p), PathBuf::from("dir/prog.lst"));
        assert_eq!(error_path(p), PathBuf::from("dir/prog.err"));
        assert_eq!(permanent_symbol_path(p), PathBuf::from("dir/prog.prm"));
    }
}
