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

//! The pass driver's single-line statement dispatch (spec §4.8). Driving
//! two full passes over a file, and crossing line boundaries for
//! conditional-skip/`DUBL`/`FLTG`/`TEXT` continuations, is the
//! responsibility of [`crate::assembler::Assembler`], which owns the
//! source reader; this module provides the per-line building block it
//! calls into.

use super::error::{AsmError, ErrorTag};
use super::expr::get_exprs;
use super::lexer::{self, Lexeme};
use super::line::LineBuffer;
use super::opcodes;
use super::symbol::SymbolFlags;
use super::{Engine, FlushRequest, Pass};

const ADDR_MASK: u16 = 0o7777;

/// The outcome of processing one statement, for the driver to act on
/// (queue a listing line, advance `clc`, or stop the program).
#[derive(Clone, Debug)]
pub enum Statement {
    /// `$` — end of program.
    EndOfProgram,
    /// A plain expression statement, emitted at `loc`. `collision` is
    /// set if `loc` has grown into this page's literal pool (spec §4.5,
    /// `PE`/`ZE`).
    Emitted { loc: u16, val: u16, auto_indirect: bool, collision: Option<ErrorTag> },
    /// `name,` or `name=expr` — no object word emitted. A bare label
    /// produces no listing row; `name=expr` lists `value` in the `val`
    /// column (spec §6).
    SymbolDefined { assignment: bool, value: u16 },
    /// `*expr` — origin changed to the given full (field-inclusive) address.
    OriginSet { loc: u16 },
    /// A pseudo-op ran and produced no direct object word (most
    /// directives); any queued effect lives on `Engine`
    /// (`pending_flush`, `pending_words`, `pending_mode_switch`, …). The
    /// `bool` is `pseudo::dispatch`'s `ContinueLine`: whether the driver
    /// should keep scanning this line (`true`) or treat the line as
    /// consumed (`false`).
    PseudoHandled(bool),
    /// Blank line, comment-only line, or bare statement separator.
    NoOutput,
}

fn peek(line: &LineBuffer) -> (Lexeme, bool) {
    let mut copy = line.clone();
    lexer::next(&mut copy)
}

fn uppercased(word: &str) -> String {
    word.to_ascii_uppercase().chars().take(super::symtab::SYMBOL_NAME_LEN).collect()
}

/// Runs one statement starting at the line's cursor. Strips a leading
/// `/`-comment (runs to end of line) before dispatching.
pub fn run_statement(engine: &mut Engine, line: &mut LineBuffer) -> Result<Statement, AsmError> {
    engine.last_auto_indirect = false;

    let (lex, _) = peek(line);

    match lex {
        Lexeme::Eol => Ok(Statement::NoOutput),
        Lexeme::Punct('/') => Ok(Statement::NoOutput),
        Lexeme::Punct(';') => {
            lexer::next(line);
            Ok(Statement::NoOutput)
        }
        Lexeme::Punct('$') => {
            lexer::next(line);
            engine.pending_flush = Some(FlushRequest::Both);
            Ok(Statement::EndOfProgram)
        }
        Lexeme::Punct('*') => {
            lexer::next(line);
            let expr = get_exprs(engine, line)?;
            let newclc = (expr & ADDR_MASK) | (engine.field << 12);
            let in_field = newclc & ADDR_MASK;
            if (in_field & 0o7600) != (engine.clc & 0o7600) {
                engine.pending_flush = Some(FlushRequest::CurrentPageOnly);
            }
            engine.clc = (in_field as i32 - engine.reloc as i32) as u16 & ADDR_MASK;
            Ok(Statement::OriginSet { loc: newclc })
        }
        Lexeme::Word(w) if w.chars().next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false) => {
            // Look ahead for a label (`name,`) or assignment (`name=expr`).
            let mut copy = line.clone();
            let (_, _) = lexer::next(&mut copy);
            let (delim, _) = peek(&copy);

            match delim {
                Lexeme::Punct(',') => {
                    lexer::next(line);
                    lexer::next(line); // consume ','
                    define_label(engine, &w)
                }
                Lexeme::Punct('=') => {
                    lexer::next(line);
                    lexer::next(line); // consume '='
                    let value = get_exprs(engine, line)? & ADDR_MASK;
                    let name = uppercased(&w);
                    let col = line.column();
                    let pass = engine.pass.as_u8();
                    let (_, diag) =
                        engine.symtab.define(&name, value, SymbolFlags::DEFINED, pass, col)?;
                    if let Some(d) = diag {
                        return Err(d);
                    }
                    Ok(Statement::SymbolDefined { assignment: true, value })
                }
                _ => {
                    let name = uppercased(&w);
                    if let Some(op) = opcodes::lookup_pseudo(&name) {
                        lexer::next(line); // consume the directive name
                        let cont = super::pseudo::dispatch(engine, op, line)?;
                        Ok(Statement::PseudoHandled(cont))
                    } else {
                        emit_expression(engine, line)
                    }
                }
            }
        }
        _ => emit_expression(engine, line),
    }
}

fn define_label(engine: &mut Engine, raw_name: &str) -> Result<Statement, AsmError> {
    let name = uppercased(raw_name);
    let value = (engine.clc as i32 + engine.reloc as i32) as u16;
    let id = engine.symtab.lookup_or_insert(&name)?;
    let already_defined = engine.symtab.get(id).flags.is_defined();
    let prior_value = engine.symtab.get(id).value;

    let mut diagnostic = None;
    if already_defined && prior_value != value && engine.pass == Pass::Two {
        diagnostic = Some(AsmError::with_symbol(ErrorTag::DuplicateLabel, 0, name.clone()));
    }

    let pass = engine.pass.as_u8();
    let (id, _) = engine.symtab.define(&name, value, SymbolFlags::label(), pass, 0)?;
    if already_defined {
        engine.symtab.get_mut(id).flags |= SymbolFlags::DUPLICATE;
    }
    if engine.pass == Pass::Two {
        let sym = engine.symtab.get_mut(id);
        engine.xref.record(sym, engine.lineno);
    }

    if let Some(d) = diagnostic {
        return Err(d);
    }
    Ok(Statement::SymbolDefined { assignment: false, value })
}

fn emit_expression(engine: &mut Engine, line: &mut LineBuffer) -> Result<Statement, AsmError> {
    let val = get_exprs(engine, line)? & ADDR_MASK;
    let loc = engine.clc;
    let collision = engine.check_literal_collision();
    engine.advance_clc();
    Ok(Statement::Emitted { loc, val, auto_indirect: engine.last_auto_indirect, collision })
}

/// `IFDEF`/`IFNDEF`/`IFZERO`/`IFNZERO` true branch: expects and consumes
/// the opening `<` (spec §4.7). The false branch's multi-line bracket
/// skip is driven by [`crate::assembler::Assembler`], which alone has
/// access to subsequent source lines.
pub fn expect_conditional_open(line: &mut LineBuffer) -> Result<(), AsmError> {
    let (lex, _) = lexer::next(line);
    if matches!(lex, Lexeme::Punct('<')) {
        Ok(())
    } else {
        Err(AsmError::new(ErrorTag::IllegalCharacter, line.column()))
    }
}

/// Scans one line fragment for conditional-skip nesting, updating
/// `depth` (count of unmatched `<`). Returns `true` if the skip is
/// complete (depth reached 0, or `$` was seen) on this line.
///
/// Scans raw characters rather than lexemes: the lexer treats `>` as a
/// skippable (whitespace-like) character (spec §4.1), so it never
/// surfaces as a `Lexeme::Punct('>')` for [`lexer::next`] to see.
pub fn scan_conditional_skip(line: &mut LineBuffer, depth: &mut u32) -> bool {
    loop {
        match line.peek() {
            None => return false,
            Some('<') => {
                *depth += 1;
                line.advance();
            }
            Some('>') => {
                line.advance();
                if *depth > 0 {
                    *depth -= 1;
                }
                if *depth == 0 {
                    return true;
                }
            }
            Some('$') => {
                line.advance();
                return true;
            }
            Some(_) => line.advance(),
        }
    }
}

/// Reads a delimited string for `TEXT`/`TITLE`: one blank is skipped,
/// the next character becomes the delimiter, and the string runs until
/// that delimiter repeats. Unterminated strings are `text_string`
/// (folded into `IllegalCharacter`, spec §7 NEW).
pub fn read_quoted_string(line: &mut LineBuffer) -> Result<String, AsmError> {
    while matches!(line.peek(), Some(' ')) {
        line.advance();
    }
    let delim = match line.peek() {
        Some(c) => c,
        None => return Err(AsmError::new(ErrorTag::IllegalCharacter, line.column())),
    };
    line.advance();

    let start = line.column();
    loop {
        match line.peek() {
            Some(c) if c == delim => {
                let text = line.slice(start);
                line.advance();
                return Ok(text);
            }
            Some(_) => line.advance(),
            None => return Err(AsmError::new(ErrorTag::IllegalCharacter, line.column())),
        }
    }
}

/// `TEXT` — packs the delimited string 6 bits per character, two
/// characters per word, zero-padding an odd final character.
pub fn read_text_operand(engine: &mut Engine, line: &mut LineBuffer) -> Result<(), AsmError> {
    let text = read_quoted_string(line)?;
    let mut words = Vec::with_capacity(text.len() / 2 + 1);
    let mut chars = text.chars();
    loop {
        let hi = match chars.next() {
            Some(c) => (c as u16) & 0o77,
            None => break,
        };
        let lo = chars.next().map(|c| (c as u16) & 0o77).unwrap_or(0);
        words.push((hi << 6) | lo);
    }
    engine.pending_words = words;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_of_program_sets_flush_both() {
        let mut e = Engine::new();
        let mut l = LineBuffer::new("$");
        let stmt = run_statement(&mut e, &mut l).unwrap();
        assert!(matches!(stmt, Statement::EndOfProgram));
        assert_eq!(e.pending_flush, Some(FlushRequest::Both));
    }

    #[test]
    fn label_defines_symbol_at_clc_plus_reloc() {
        let mut e = Engine::new();
        e.clc = 0o300;
        let mut l = LineBuffer::new("FOO,");
        let stmt = run_statement(&mut e, &mut l).unwrap();
        assert!(matches!(stmt, Statement::SymbolDefined { assignment: false, .. }));
        let id = e.symtab.find("FOO").unwrap();
        assert_eq!(e.symtab.get(id).value, 0o300);
    }

    #[test]
    fn assignment_defines_symbol_value() {
        let mut e = Engine::new();
        e.radix = 10;
        let mut l = LineBuffer::new("X=42");
        let stmt = run_statement(&mut e, &mut l).unwrap();
        assert!(matches!(stmt, Statement::SymbolDefined { assignment: true, value: 42 }));
        let id = e.symtab.find("X").unwrap();
        assert_eq!(e.symtab.get(id).value, 42);
    }

    #[test]
    fn plain_expression_emits_at_clc_and_advances() {
        let mut e = Engine::new();
        e.clc = 0o200;
        let mut l = LineBuffer::new("CLA");
        let stmt = run_statement(&mut e, &mut l).unwrap();
        match stmt {
            Statement::Emitted { loc, val, .. } => {
                assert_eq!(loc, 0o200);
                assert_eq!(val, 0o7200);
            }
            _ => panic!("expected Emitted"),
        }
        assert_eq!(e.clc, 0o201);
    }

    #[test]
    fn origin_directive_sets_clc() {
        let mut e = Engine::new();
        let mut l = LineBuffer::new("*400");
        let stmt = run_statement(&mut e, &mut l).unwrap();
        assert!(matches!(stmt, Statement::OriginSet { .. }));
        assert_eq!(e.clc, 0o400);
    }

    #[test]
    fn pseudo_op_dispatches() {
        let mut e = Engine::new();
        let mut l = LineBuffer::new("DECIMAL");
        let stmt = run_statement(&mut e, &mut l).unwrap();
        assert!(matches!(stmt, Statement::PseudoHandled(true)));
        assert_eq!(e.radix, 10);
    }

    #[test]
    fn conditional_skip_completes_at_matching_close() {
        let mut l = LineBuffer::new("CLA>CMA>");
        let mut depth = 1;
        assert!(scan_conditional_skip(&mut l, &mut depth));
        assert_eq!(depth, 0);
    }

    #[test]
    fn conditional_skip_tracks_nested_depth_across_opens() {
        let mut l = LineBuffer::new("CLA<CMA>>");
        let mut depth = 1;
        assert!(scan_conditional_skip(&mut l, &mut depth));
        assert_eq!(depth, 0);
    }

    #[test]
    fn quoted_string_reads_until_matching_delimiter() {
        let mut l = LineBuffer::new("/HELLO/");
        let s = read_quoted_string(&mut l).unwrap();
        assert_eq!(s, "HELLO");
    }

    #[test]
    fn text_packs_two_chars_per_word() {
        let mut e = Engine::new();
        let mut l = LineBuffer::new("/AB/");
        read_text_operand(&mut e, &mut l).unwrap();
        assert_eq!(e.pending_words, vec![0o0102]);
    }
}
