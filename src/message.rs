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

//! Assembler messages.

use std::fmt::{self, Display, Formatter};
use crate::util::Location;

// -----------------------------------------------------------------------------

/// Trait for assembler message types.
pub trait Message: Display {
    /// Returns the origin (e.g. path, line, and column) of the message.
    #[inline]
    fn origin(&self) -> Origin { Origin::General }

    /// Returns the severity level of the message.
    #[inline]
    fn severity(&self) -> Severity { Severity::Normal }
}

// -----------------------------------------------------------------------------

/// Assembler message origins.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Origin<'a> {
    /// The message originates from the assembler itself.
    General,

    /// The message originates from a source code file.
    File {
        /// Path of the source code file.
        path: &'a str,

        /// Line-and-column location within the source code file.
        loc: Location,
    },
}

impl Display for Origin<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            Origin::General           => write!(f, "{}", crate::PROGRAM_NAME),
            Origin::File { path, loc } => write!(f, "{}:{}", path, loc),
        }
    }
}

// -----------------------------------------------------------------------------

/// Message severity levels.
///
/// Only [`Severity::Fatal`] aborts the run; every other severity is
/// recorded and assembly continues, per the two-pass engine's recovery
/// model (spec §7: "Errors never abort the pass except `ST` (fatal)").
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Severity {
    /// For informational messages (progress notes, summaries).
    Normal,

    /// For potential problems that do not prevent complete assembly.
    Warning,

    /// For problems that prevent complete assembly of the current line,
    /// but from which the pass recovers and continues.
    Error,

    /// For severe, unrecoverable problems (symbol table exhaustion).
    /// The assembler terminates immediately and does not produce output.
    Fatal,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match *self {
            Severity::Normal  => "",
            Severity::Warning => "warning: ",
            Severity::Error   => "error: ",
            Severity::Fatal   => "fatal: ",
        })
    }
}

impl Severity {
    /// The color used to render this severity on an ANSI-capable terminal.
    pub fn color(self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::Normal  => White,
            Severity::Warning => Yellow,
            Severity::Error   => Red,
            Severity::Fatal   => BrightRed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_order() {
        assert!(Severity::Normal < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn severity_display() {
        assert_eq!(format!("{}", Severity::Normal),  "");
        assert_eq!(format!("{}", Severity::Warning), "warning: ");
        assert_eq!(format!("{}", Severity::Error),   "error: ");
        assert_eq!(format!("{}", Severity::Fatal),   "fatal: ");
    }

    #[test]
    fn origin_display_general() {
        assert_eq!(format!("{}", Origin::General), crate::PROGRAM_NAME);
    }

    #[test]
    fn origin_display_file() {
        let origin = Origin::File { path: "x.pal", loc: Location::new(3, 5) };
        assert_eq!(format!("{}", origin), "x.pal:3:5");
    }
}
