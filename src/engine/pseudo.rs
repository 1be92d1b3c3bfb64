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

//! The pseudo-op dispatcher (spec §4.6): one arm per directive, mutating
//! `Engine` state directly and leaving anything that needs the object
//! encoder or listing queued on `Engine` for the pass driver to apply.

use super::error::{AsmError, ErrorTag};
use super::expr::get_expr;
use super::lexer::{self, Lexeme};
use super::line::LineBuffer;
use super::opcodes::Pseudo;
use super::symbol::SymbolFlags;
use super::symtab::SYMBOL_NAME_LEN;
use super::{ConstMode, Engine, FlushRequest, OutputMode, Pass};

/// Whether the pass driver should keep scanning the current line
/// (`true`, e.g. after `FIXMRI sym=expr`) or move on to the next line.
pub type ContinueLine = bool;

fn peek(line: &LineBuffer) -> (Lexeme, bool) {
    let mut copy = line.clone();
    lexer::next(&mut copy)
}

fn uppercased(word: &str) -> String {
    word.to_ascii_uppercase().chars().take(SYMBOL_NAME_LEN).collect()
}

/// Reads an optional bracketed argument for directives like `PAGE`,
/// `FIELD`, `SEGMNT`: returns `None` if the next lexeme is end-of-line
/// or a statement separator.
fn optional_arg(engine: &mut Engine, line: &mut LineBuffer) -> Result<Option<u16>, AsmError> {
    let (lex, _) = peek(line);
    if matches!(lex, Lexeme::Eol | Lexeme::Punct(';') | Lexeme::Punct('/')) {
        return Ok(None);
    }
    Ok(Some(get_expr(engine, line)?.value))
}

/// `BINPUNCH`/`RIMPUNCH`'s leader-length argument, recognizing the
/// literal `-1` sentinel before it reaches the (unsigned, 12-bit)
/// expression evaluator, since `-1` there would otherwise wrap to
/// `07777` rather than surviving as a negative leader length.
fn leader_len_arg(engine: &mut Engine, line: &mut LineBuffer) -> Result<i32, AsmError> {
    let (lex, _) = peek(line);
    if matches!(lex, Lexeme::Eol | Lexeme::Punct(';') | Lexeme::Punct('/')) {
        return Ok(8);
    }
    if matches!(lex, Lexeme::Punct('-')) {
        let mut probe = line.clone();
        lexer::next(&mut probe);
        if let (Lexeme::Word(w), _) = lexer::next(&mut probe) {
            if w == "1" {
                *line = probe;
                return Ok(-1);
            }
        }
    }
    Ok(get_expr(engine, line)?.value as i32)
}

pub fn dispatch(engine: &mut Engine, op: Pseudo, line: &mut LineBuffer) -> Result<ContinueLine, AsmError> {
    use Pseudo::*;
    match op {
        Decimal => {
            engine.radix = 10;
            Ok(true)
        }
        Octal => {
            engine.radix = 8;
            Ok(true)
        }

        Page => {
            engine.pending_flush = Some(FlushRequest::CurrentPageOnly);
            let new_addr = match optional_arg(engine, line)? {
                Some(n) => (n & 0o37) << 7,
                None => (engine.clc & 0o7600).wrapping_add(0o200),
            };
            engine.clc = new_addr & 0o7777;
            Ok(true)
        }

        Segmnt => {
            engine.pending_flush = Some(FlushRequest::CurrentPageOnly);
            let new_addr = match optional_arg(engine, line)? {
                Some(n) => (n & 3) << 10,
                None => (engine.clc & 0o7000).wrapping_add(0o1000),
            };
            engine.clc = new_addr & 0o7777;
            Ok(true)
        }

        Field => {
            if engine.mode == OutputMode::Rim {
                return Err(AsmError::new(ErrorTag::IllegalEquals, line.column()));
            }
            engine.pending_flush = Some(FlushRequest::Both);
            let n = optional_arg(engine, line)?.unwrap_or(0) & 7;
            engine.pending_field_frame = Some(n);
            engine.field = n;
            engine.clc = 0o200;
            Ok(true)
        }

        FixMri => {
            let (lex, _) = lexer::next(line);
            let name = match lex {
                Lexeme::Word(w) => uppercased(&w),
                _ => return Err(AsmError::new(ErrorTag::IllegalCharacter, line.column())),
            };
            let (eq, _) = lexer::next(line);
            if !matches!(eq, Lexeme::Punct('=')) {
                return Err(AsmError::new(ErrorTag::IllegalEquals, line.column()));
            }
            let value = get_expr(engine, line)?.value;
            let pass = engine.pass.as_u8();
            let col = line.column();
            let (_, diag) = engine.symtab.define(&name, value, SymbolFlags::mri(), pass, col)?;
            if let Some(d) = diag {
                return Err(d);
            }
            Ok(true)
        }

        FixTab => {
            engine.symtab.fixtab();
            Ok(false)
        }

        Expunge => {
            if engine.pass == Pass::One {
                engine.symtab.expunge();
                Engine::install_pseudo_symbols(&mut engine.symtab);
            }
            Ok(false)
        }

        IfDef | IfNDef => {
            let (lex, _) = lexer::next(line);
            let name = match lex {
                Lexeme::Word(w) => uppercased(&w),
                _ => return Err(AsmError::new(ErrorTag::IllegalCharacter, line.column())),
            };
            let id = engine.symtab.lookup_or_insert(&name)?;
            let defined = engine.symtab.get(id).flags.is_defined_conditionally();
            let take_branch = if matches!(op, IfDef) { defined } else { !defined };
            engine.pending_conditional = Some(take_branch);
            Ok(true)
        }

        IfZero | IfNZero => {
            let value = get_expr(engine, line)?.value;
            let take_branch = if matches!(op, IfZero) { value == 0 } else { value != 0 };
            engine.pending_conditional = Some(take_branch);
            Ok(true)
        }

        Dubl => {
            engine.const_mode = Some(ConstMode::Dubl);
            Ok(false)
        }
        Fltg => {
            engine.const_mode = Some(ConstMode::Fltg);
            Ok(false)
        }

        Text => super::pass::read_text_operand(engine, line).map(|()| false),

        ZBlock => {
            let n = get_expr(engine, line)?.value;
            if n == 0 || n as usize > super::literal::PAGE_SIZE {
                return Err(AsmError::new(ErrorTag::IllegalCharacter, line.column()));
            }
            engine.pending_words = vec![0; n as usize];
            Ok(false)
        }

        Title => {
            let title = super::pass::read_quoted_string(line)?;
            engine.listing.set_title(&title);
            Ok(false)
        }

        Eject => {
            engine.listing.force_top_of_form();
            Ok(false)
        }

        XList => {
            match optional_arg(engine, line)? {
                Some(v) => engine.listing.xlist_suppressed = v != 0,
                None => engine.listing.xlist_suppressed = !engine.listing.xlist_suppressed,
            }
            Ok(true)
        }

        BinPunch => {
            let n = leader_len_arg(engine, line)?;
            engine.pending_mode_switch = Some((OutputMode::Bin, n));
            Ok(false)
        }
        RimPunch => {
            let n = leader_len_arg(engine, line)?;
            engine.pending_mode_switch = Some((OutputMode::Rim, n));
            Ok(false)
        }

        EnPunch => {
            engine.punch_enabled = true;
            Ok(false)
        }
        NoPunch => {
            engine.punch_enabled = false;
            Ok(false)
        }

        Reloc => {
            let target = optional_arg(engine, line)?;
            engine.reloc = match target {
                Some(v) => (v as i32 - engine.clc as i32) as i16,
                None => 0,
            };
            Ok(true)
        }

        Pause => Ok(false),
        Bank => Err(AsmError::new(ErrorTag::IllegalCharacter, line.column())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_and_octal_set_radix() {
        let mut e = Engine::new();
        let mut l = LineBuffer::new("");
        dispatch(&mut e, Pseudo::Decimal, &mut l).unwrap();
        assert_eq!(e.radix, 10);
        dispatch(&mut e, Pseudo::Octal, &mut l).unwrap();
        assert_eq!(e.radix, 8);
    }

    #[test]
    fn page_with_argument_sets_clc() {
        let mut e = Engine::new();
        let mut l = LineBuffer::new("3");
        dispatch(&mut e, Pseudo::Page, &mut l).unwrap();
        assert_eq!(e.clc, 3 << 7);
        assert_eq!(e.pending_flush, Some(FlushRequest::CurrentPageOnly));
    }

    #[test]
    fn field_sets_field_and_resets_clc() {
        let mut e = Engine::new();
        let mut l = LineBuffer::new("2");
        dispatch(&mut e, Pseudo::Field, &mut l).unwrap();
        assert_eq!(e.field, 2);
        assert_eq!(e.clc, 0o200);
        assert_eq!(e.pending_flush, Some(FlushRequest::Both));
    }

    #[test]
    fn field_rejected_in_rim_mode() {
        let mut e = Engine::new();
        e.mode = OutputMode::Rim;
        let mut l = LineBuffer::new("1");
        assert!(dispatch(&mut e, Pseudo::Field, &mut l).is_err());
    }

    #[test]
    fn fixmri_defines_mri_symbol() {
        let mut e = Engine::new();
        let mut l = LineBuffer::new("FOO=1234");
        dispatch(&mut e, Pseudo::FixMri, &mut l).unwrap();
        let id = e.symtab.find("FOO").unwrap();
        assert!(e.symtab.get(id).flags.is_mri());
    }

    #[test]
    fn zblock_queues_zero_words() {
        let mut e = Engine::new();
        let mut l = LineBuffer::new("5");
        dispatch(&mut e, Pseudo::ZBlock, &mut l).unwrap();
        assert_eq!(e.pending_words, vec![0; 5]);
    }

    #[test]
    fn zblock_zero_is_rejected() {
        let mut e = Engine::new();
        let mut l = LineBuffer::new("0");
        assert!(dispatch(&mut e, Pseudo::ZBlock, &mut l).is_err());
    }

    #[test]
    fn bank_reports_not_implemented() {
        let mut e = Engine::new();
        let mut l = LineBuffer::new("");
        assert!(dispatch(&mut e, Pseudo::Bank, &mut l).is_err());
    }

    #[test]
    fn pause_is_a_harmless_no_op() {
        let mut e = Engine::new();
        let mut l = LineBuffer::new("");
        assert!(dispatch(&mut e, Pseudo::Pause, &mut l).is_ok());
    }
}
