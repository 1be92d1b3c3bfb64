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

//! Listing file text rendering (spec §6), following `palbart`'s
//! `topOfForm`/`printLine`/`printErrorMessages`.

use std::io::{self, Write};

use crate::engine::listing::{LineStyle, ListingLine, ListingState};

pub struct ListingWriter<W: Write> {
    out: W,
}

impl<W: Write> ListingWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_header(&mut self, state: &ListingState) -> io::Result<()> {
        if state.page > 1 {
            write!(self.out, "\x0c")?;
        }
        writeln!(self.out)?;
        writeln!(self.out)?;
        writeln!(self.out)?;
        writeln!(self.out, "      {:<63} {:>10}", state.title, format!("Page {}", state.page))?;
        writeln!(self.out)?;
        writeln!(self.out)?;
        Ok(())
    }

    /// Writes one listing line, preceded by a fresh page header when the
    /// line cursor has reached the bottom of the current page.
    pub fn write_line(&mut self, state: &mut ListingState, line: &ListingLine) -> io::Result<()> {
        if state.advance_line() {
            self.write_header(state)?;
        }

        match line.style {
            LineStyle::Line => {
                write!(self.out, "{:5}             ", line.lineno)?;
                writeln!(self.out, "{}", line.source)?;
            }
            LineStyle::LineVal => {
                write!(self.out, "{:5}       {:04o}  ", line.lineno, line.val)?;
                writeln!(self.out, "{}", line.source)?;
            }
            LineStyle::LineLocVal => {
                let at = if line.auto_indirect { "@" } else { " " };
                write!(self.out, "{:5} {:05o} {:04o}{} ", line.lineno, line.loc, line.val, at)?;
                writeln!(self.out, "{}", line.source)?;
            }
            LineStyle::LocVal => {
                writeln!(self.out, "      {:05o} {:04o}", line.loc, line.val)?;
            }
        }

        for err in &line.errors {
            write!(self.out, "{:<18.18}", err.tag.listing_label())?;
            for _ in 0..err.column {
                write!(self.out, " ")?;
            }
            writeln!(self.out, "^")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::{AsmError, ErrorTag};

    #[test]
    fn line_loc_val_renders_with_auto_indirect_marker() {
        let mut buf = Vec::new();
        let mut state = ListingState::new();
        let line = ListingLine::new(3, "   TAD X", LineStyle::LineLocVal)
            .with_loc_val(0o200, 0o1577)
            .with_auto_indirect();
        {
            let mut w = ListingWriter::new(&mut buf);
            w.write_line(&mut state, &line).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("1577@"));
    }

    #[test]
    fn error_annotation_includes_tag_and_caret() {
        let mut buf = Vec::new();
        let mut state = ListingState::new();
        let err = AsmError::new(ErrorTag::Undefined, 4);
        let line = ListingLine::new(1, "  FOO", LineStyle::Line).with_errors(vec![err]);
        {
            let mut w = ListingWriter::new(&mut buf);
            w.write_line(&mut state, &line).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("UD undefined"));
        assert!(text.contains('^'));
    }
}
