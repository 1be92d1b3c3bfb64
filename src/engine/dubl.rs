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

//! `DUBL` constants: signed 24-bit decimal integers, emitted as two
//! 12-bit words, high word first (spec §4.4).

use super::error::{AsmError, ErrorTag};
use super::line::LineBuffer;
use super::lexer::{self, Lexeme};

/// Maximum magnitude a `DUBL` value may hold before `dubl_overflow`.
const DUBL_MAX: i32 = 1 << 23;

/// Parses one `[+|-] digits` `DUBL` constant starting at the cursor.
/// Returns the two 12-bit words (high, low) in two's-complement form.
/// Any operator between sign and digits, or among the digits, is
/// `illegal_expression` (folded into `IllegalCharacter`, spec §7 NEW).
pub fn parse_dubl(line: &mut LineBuffer) -> Result<Option<(u16, u16)>, AsmError> {
    let col = line.column();
    let mut copy = line.clone();
    let (lex, _) = lexer::next(&mut copy);

    let negative = matches!(lex, Lexeme::Punct('-'));
    if negative || matches!(lex, Lexeme::Punct('+')) {
        *line = copy;
    }

    let (digits_lex, _) = lexer::next(line);
    let digits = match digits_lex {
        Lexeme::Word(w) if w.chars().all(|c| c.is_ascii_digit()) => w,
        Lexeme::Eol => return Ok(None),
        _ => return Err(AsmError::new(ErrorTag::IllegalCharacter, col)),
    };

    let mut value: i64 = 0;
    for ch in digits.chars() {
        value = value * 10 + ch.to_digit(10).unwrap() as i64;
    }
    if negative {
        value = -value;
    }

    if value.unsigned_abs() as i64 > DUBL_MAX as i64 {
        return Err(AsmError::new(ErrorTag::IllegalCharacter, col));
    }

    let word24 = (value as i32 as u32) & 0xFF_FFFF;
    let high = (word24 >> 12) as u16;
    let low = (word24 & 0o7777) as u16;
    Ok(Some((high, low)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_value_splits_into_two_words() {
        let mut l = LineBuffer::new("1");
        let (hi, lo) = parse_dubl(&mut l).unwrap().unwrap();
        assert_eq!(hi, 0);
        assert_eq!(lo, 1);
    }

    #[test]
    fn negative_one_is_all_ones() {
        let mut l = LineBuffer::new("-1");
        let (hi, lo) = parse_dubl(&mut l).unwrap().unwrap();
        assert_eq!(hi, 0o7777);
        assert_eq!(lo, 0o7777);
    }

    #[test]
    fn overflow_is_rejected() {
        let mut l = LineBuffer::new("99999999");
        let err = parse_dubl(&mut l).unwrap_err();
        assert_eq!(err.tag, ErrorTag::IllegalCharacter);
    }

    #[test]
    fn end_of_line_yields_none() {
        let mut l = LineBuffer::new("");
        assert!(parse_dubl(&mut l).unwrap().is_none());
    }
}
