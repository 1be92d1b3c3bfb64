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

//! Lexeme extraction (spec §4.1).

use super::error::{AsmError, ErrorTag};
use super::line::LineBuffer;

/// A single lexeme, as returned by [`next`]/[`next_no_blank`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Lexeme {
    /// A maximal run of alphanumeric characters (identifier or digit-run;
    /// the caller classifies by first character, per spec §4.1/§4.3).
    Word(String),
    /// A two-character quoted literal `"c`: value is `c`.
    Char(char),
    /// Any other single punctuation character.
    Punct(char),
    /// End of line: the cursor did not advance.
    Eol,
}

/// Characters skipped before a lexeme begins (spec §4.1: "space, tab,
/// form-feed, and `>`"). Tabs are already expanded to spaces by
/// [`LineBuffer::new`], so only space/form-feed/`>` are tested here.
fn is_skippable(ch: char) -> bool {
    matches!(ch, ' ' | '\x0c' | '>')
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
}

/// Whether `ch` is end-of-line-ish (NUL or newline), per spec §4.1.
fn is_eol_char(ch: char) -> bool {
    matches!(ch, '\0' | '\n')
}

/// Reads the next lexeme, skipping leading blanks. Returns whether the
/// lexeme was preceded by at least one skipped blank (needed by
/// [`next_no_blank`] and by the MRI OR-list scanner, which treats a
/// blank as the list delimiter).
pub fn next(line: &mut LineBuffer) -> (Lexeme, bool) {
    let start_col = line.column();
    while let Some(ch) = line.peek() {
        if is_skippable(ch) {
            line.advance();
        } else {
            break;
        }
    }
    let had_blank = line.column() != start_col;

    match line.peek() {
        None => (Lexeme::Eol, had_blank),
        Some(ch) if is_eol_char(ch) => (Lexeme::Eol, had_blank),
        Some(ch) if is_word_char(ch) => {
            let word_start = line.column();
            while let Some(c) = line.peek() {
                if is_word_char(c) {
                    line.advance();
                } else {
                    break;
                }
            }
            (Lexeme::Word(line.slice(word_start)), had_blank)
        }
        Some('"') => {
            if let Some(c) = line.peek_at(1) {
                line.advance();
                line.advance();
                (Lexeme::Char(c), had_blank)
            } else {
                line.advance();
                (Lexeme::Punct('"'), had_blank)
            }
        }
        Some(ch) => {
            line.advance();
            (Lexeme::Punct(ch), had_blank)
        }
    }
}

/// As [`next`], but fails with `illegal_blank` if the previous lexeme's
/// trailing delimiter was itself a blank — enforcing that expression
/// terms contain no internal spaces (spec §4.1).
pub fn next_no_blank(line: &mut LineBuffer, prev_had_blank: bool) -> Result<Lexeme, AsmError> {
    if prev_had_blank {
        return Err(AsmError::new(ErrorTag::IllegalCharacter, line.column()));
    }
    let (lex, _) = next(line);
    Ok(lex)
}

/// Whether `"` had no following character to quote (spec §4.1:
/// `no_literal_value` when there is no room for the second character).
pub fn char_literal_is_truncated(line: &LineBuffer) -> bool {
    line.at_eol()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_word_then_punct() {
        let mut l = LineBuffer::new("CLA+1");
        let (w, _) = next(&mut l);
        assert_eq!(w, Lexeme::Word("CLA".into()));
        let (p, _) = next(&mut l);
        assert_eq!(p, Lexeme::Punct('+'));
        let (n, _) = next(&mut l);
        assert_eq!(n, Lexeme::Word("1".into()));
    }

    #[test]
    fn skips_leading_blanks_and_angle_bracket() {
        let mut l = LineBuffer::new("  >X");
        let (w, had_blank) = next(&mut l);
        assert_eq!(w, Lexeme::Word("X".into()));
        assert!(had_blank);
    }

    #[test]
    fn quoted_char_literal() {
        let mut l = LineBuffer::new("\"A");
        let (lex, _) = next(&mut l);
        assert_eq!(lex, Lexeme::Char('A'));
    }

    #[test]
    fn eol_at_end_of_line() {
        let mut l = LineBuffer::new("");
        let (lex, _) = next(&mut l);
        assert_eq!(lex, Lexeme::Eol);
    }

    #[test]
    fn blank_before_operand_rejected_by_next_no_blank() {
        let mut l = LineBuffer::new(" X");
        let (_, had_blank) = next(&mut l);
        let err = next_no_blank(&mut l, had_blank);
        assert!(err.is_err());
    }
}
