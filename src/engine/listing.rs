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

//! Listing line records and pagination state (spec §3, §6).

use super::error::AsmError;

/// Page size including the 5-line header (`palbart`'s `LIST_LINES_PER_PAGE`).
pub const LINES_PER_PAGE: usize = 55;

/// Header occupies this many lines at the top of every page.
pub const HEADER_LINES: usize = 5;

/// Listing title max length (spec §6: "set listing title (≤63 chars)").
pub const TITLE_MAX_LEN: usize = 63;

/// How a code line's `loc`/`val` columns are rendered (spec §6).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LineStyle {
    /// Source text only, no loc/val columns (comments, pure directives).
    Line,
    /// `val` column only (for `=` and `*` origin-setting statements).
    LineVal,
    /// `loc val` columns, with source (an emitted instruction word).
    LineLocVal,
    /// `loc val` columns, no source (a literal-pool dump line).
    LocVal,
}

/// One rendered listing line, queued by the pass driver and flushed by
/// the (thin) listing renderer.
#[derive(Clone, Debug)]
pub struct ListingLine {
    pub lineno: u32,
    pub source: String,
    pub loc: u16,
    pub val: u16,
    pub style: LineStyle,
    /// `true` when `val` was produced by MRI auto-indirect generation
    /// (rendered with an `@` suffix, spec §6).
    pub auto_indirect: bool,
    pub errors: Vec<AsmError>,
}

impl ListingLine {
    pub fn new(lineno: u32, source: impl Into<String>, style: LineStyle) -> Self {
        Self {
            lineno,
            source: source.into(),
            loc: 0,
            val: 0,
            style,
            auto_indirect: false,
            errors: Vec::new(),
        }
    }

    pub fn with_loc_val(mut self, loc: u16, val: u16) -> Self {
        self.loc = loc;
        self.val = val;
        self
    }

    pub fn with_auto_indirect(mut self) -> Self {
        self.auto_indirect = true;
        self
    }

    pub fn with_errors(mut self, errors: Vec<AsmError>) -> Self {
        self.errors = errors;
        self
    }
}

/// Pagination and title-tracking state, threaded alongside the rest of
/// `Engine`'s machine state (spec §3: "listing state").
#[derive(Debug)]
pub struct ListingState {
    pub page: u32,
    pub line_on_page: usize,
    pub title: String,
    /// `XLIST` suppression toggle; independent of `Engine::listing_enabled`
    /// which additionally gates the whole feature via the CLI.
    pub xlist_suppressed: bool,
    /// Set once the first source line has been seen, so it can seed
    /// `title` when no `TITLE` directive ever fires (spec §6 NEW).
    title_defaulted: bool,
}

impl ListingState {
    pub fn new() -> Self {
        Self {
            page: 0,
            line_on_page: LINES_PER_PAGE,
            title: String::new(),
            xlist_suppressed: false,
            title_defaulted: false,
        }
    }

    /// Forces the next line to start a fresh page (`TITLE`, `EJECT`, or
    /// the very first listing line).
    pub fn force_top_of_form(&mut self) {
        self.line_on_page = LINES_PER_PAGE;
    }

    /// Advances the page cursor, returning `true` if a new page began.
    pub fn advance_line(&mut self) -> bool {
        if self.line_on_page >= LINES_PER_PAGE {
            self.page += 1;
            self.line_on_page = HEADER_LINES;
            true
        } else {
            self.line_on_page += 1;
            false
        }
    }

    /// Seeds `title` from the first source line, truncated to
    /// [`TITLE_MAX_LEN`], unless a `TITLE` directive already set it.
    pub fn maybe_default_title(&mut self, first_line: &str) {
        if !self.title_defaulted && self.title.is_empty() {
            self.title = first_line.chars().take(TITLE_MAX_LEN).collect();
        }
        self.title_defaulted = true;
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.chars().take(TITLE_MAX_LEN).collect();
        self.title_defaulted = true;
        self.force_top_of_form();
    }
}

impl Default for ListingState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_advance_starts_a_page() {
        let mut s = ListingState::new();
        assert!(s.advance_line());
        assert_eq!(s.page, 1);
        assert_eq!(s.line_on_page, HEADER_LINES);
    }

    #[test]
    fn page_rolls_over_at_line_limit() {
        let mut s = ListingState::new();
        s.advance_line();
        for _ in HEADER_LINES..LINES_PER_PAGE {
            s.advance_line();
        }
        assert!(s.advance_line());
        assert_eq!(s.page, 2);
    }

    #[test]
    fn default_title_set_once_from_first_line() {
        let mut s = ListingState::new();
        s.maybe_default_title("MY PROGRAM");
        s.maybe_default_title("SECOND LINE");
        assert_eq!(s.title, "MY PROGRAM");
    }

    #[test]
    fn explicit_title_overrides_default_and_forces_top_of_form() {
        let mut s = ListingState::new();
        s.advance_line();
        s.set_title("EXPLICIT TITLE");
        assert_eq!(s.title, "EXPLICIT TITLE");
        assert!(s.advance_line());
    }

    #[test]
    fn title_truncated_to_63_chars() {
        let mut s = ListingState::new();
        let long = "X".repeat(100);
        s.set_title(&long);
        assert_eq!(s.title.len(), TITLE_MAX_LEN);
    }
}
