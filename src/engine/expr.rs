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

//! The 12-bit expression evaluator: `eval`/`getExpr`/`getExprs` (spec §4.3).

use super::error::{AsmError, ErrorTag};
use super::line::LineBuffer;
use super::lexer::{self, Lexeme};
use super::symtab::SYMBOL_NAME_LEN;
use super::{Engine, Pass};

const ADDR_MASK: u16 = 0o7777;
const INDIRECT_BIT: u16 = 0o0400;
const PAGE_BIT: u16 = 0o0200;

/// The value and MRI-ness of one evaluated term or expression.
///
/// `is_mri` survives an operator chain unchanged from the first operand,
/// exactly as `palbart`'s `sym_getexpr.type` is set once by the initial
/// `eval()` call and never touched again while `.val` accumulates
/// through `+ - ^ % & !`.
#[derive(Copy, Clone, Debug)]
pub struct ExprValue {
    pub value: u16,
    pub is_mri: bool,
}

impl ExprValue {
    fn plain(value: u16) -> Self {
        Self { value, is_mri: false }
    }
}

fn peek(line: &LineBuffer) -> (Lexeme, bool) {
    let mut copy = line.clone();
    lexer::next(&mut copy)
}

fn uppercased_truncated(word: &str) -> String {
    word.to_ascii_uppercase().chars().take(SYMBOL_NAME_LEN).collect()
}

/// `eval()` — a single term: symbol, number, character literal, `.`,
/// or a bracketed/parenthesized literal-pool reference.
pub fn eval(engine: &mut Engine, line: &mut LineBuffer) -> Result<ExprValue, AsmError> {
    let col = line.column();
    let (lex, _) = lexer::next(line);

    match lex {
        Lexeme::Word(w) if w.chars().next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false) => {
            let name = uppercased_truncated(&w);
            let id = engine.symtab.lookup_or_insert(&name)?;
            if engine.pass == Pass::Two {
                let sym = engine.symtab.get_mut(id);
                engine.xref.record(sym, engine.lineno);
            }
            let sym = engine.symtab.get(id);
            let undefined = sym.flags.is_undefined();
            let value = sym.value;
            let is_mri = sym.flags.is_mri();
            if undefined && engine.pass == Pass::Two {
                return Err(AsmError::with_symbol(ErrorTag::Undefined, col, name));
            }
            Ok(ExprValue { value, is_mri })
        }
        Lexeme::Word(digits) => {
            let mut value: u16 = 0;
            for ch in digits.chars() {
                let digit = ch.to_digit(10).unwrap() as u16;
                if digit >= engine.radix as u16 {
                    return Err(AsmError::new(ErrorTag::IllegalCharacter, col));
                }
                value = value.wrapping_mul(engine.radix as u16).wrapping_add(digit);
            }
            Ok(ExprValue::plain(value))
        }
        Lexeme::Char(c) => Ok(ExprValue::plain((c as u16) | 0o200)),
        Lexeme::Punct('.') => Ok(ExprValue::plain(engine.dot_value())),
        Lexeme::Punct('[') => {
            let literals_on = engine.literals_on;
            if !literals_on {
                engine.pending_soft_errors.push(AsmError::new(ErrorTag::IllegalReference, col));
            }
            let inner = get_expr(engine, line)?;
            let (next_lex, _) = peek(line);
            if matches!(next_lex, Lexeme::Punct(']')) {
                lexer::next(line);
            }
            if literals_on {
                let idx = engine.pool_mut(false).insert(inner.value & ADDR_MASK);
                Ok(ExprValue::plain(idx as u16))
            } else {
                Ok(ExprValue::plain(0))
            }
        }
        Lexeme::Punct('(') => {
            let literals_on = engine.literals_on;
            if !literals_on {
                engine.pending_soft_errors.push(AsmError::new(ErrorTag::IllegalReference, col));
            }
            let inner_val = get_exprs(engine, line)? & ADDR_MASK;
            let (next_lex, _) = peek(line);
            if matches!(next_lex, Lexeme::Punct(')')) {
                lexer::next(line);
            }
            if literals_on {
                let idx = engine.pool_mut(true).insert(inner_val);
                Ok(ExprValue::plain(idx as u16 + engine.page_base()))
            } else {
                Ok(ExprValue::plain(engine.page_base()))
            }
        }
        Lexeme::Punct('=') => Err(AsmError::new(ErrorTag::IllegalEquals, col)),
        _ => Err(AsmError::new(ErrorTag::IllegalCharacter, col)),
    }
}

fn apply_op(op: char, lhs: u16, rhs: u16) -> u16 {
    match op {
        '+' => lhs.wrapping_add(rhs),
        '-' => lhs.wrapping_sub(rhs),
        '^' => lhs.wrapping_mul(rhs),
        // Division by zero is a deliberate redesign: the original leaves
        // this as C integer-division UB, this port defines it as 0.
        '%' => if rhs == 0 { 0 } else { lhs / rhs },
        '&' => lhs & rhs,
        '!' => lhs | rhs,
        _ => unreachable!("apply_op called with non-operator"),
    }
}

/// `getExpr()` — optional leading negation, then a left-to-right,
/// equal-precedence operator chain over `+ - ^ % & !`. Stops at a blank
/// (the MRI OR-list delimiter) or at `/ ; ) ] <` (statement/group end).
pub fn get_expr(engine: &mut Engine, line: &mut LineBuffer) -> Result<ExprValue, AsmError> {
    let (lex, _) = peek(line);
    let negate = matches!(lex, Lexeme::Punct('-'));
    if negate {
        lexer::next(line);
    }
    let mut result = eval(engine, line)?;
    if negate {
        result.value = 0u16.wrapping_sub(result.value) & ADDR_MASK;
    }

    loop {
        let (lex, had_blank) = peek(line);
        if had_blank {
            break;
        }
        match lex {
            Lexeme::Punct(op @ ('+' | '-' | '^' | '%' | '&' | '!')) => {
                lexer::next(line);
                let rhs = eval(engine, line)?;
                result.value = apply_op(op, result.value, rhs.value);
            }
            Lexeme::Eol
            | Lexeme::Punct('/')
            | Lexeme::Punct(';')
            | Lexeme::Punct(')')
            | Lexeme::Punct(']')
            | Lexeme::Punct('<') => break,
            Lexeme::Punct('=') => {
                let col = line.column();
                return Err(AsmError::new(ErrorTag::IllegalEquals, col));
            }
            _ => {
                let col = line.column();
                return Err(AsmError::new(ErrorTag::IllegalCharacter, col));
            }
        }
    }

    Ok(result)
}

/// `getExprs()` — a blank-separated OR-list, resolving MRI address parts
/// (page-zero direct, current-page direct, or off-page auto-indirect)
/// against a leading MRI opcode term.
pub fn get_exprs(engine: &mut Engine, line: &mut LineBuffer) -> Result<u16, AsmError> {
    let first = get_expr(engine, line)?;
    let mut value = first.value;
    let is_mri = first.is_mri;

    loop {
        let (lex, _) = peek(line);
        if matches!(lex, Lexeme::Eol | Lexeme::Punct(')') | Lexeme::Punct(']')) {
            break;
        }

        let term = get_expr(engine, line)?;
        let addr = term.value & ADDR_MASK;

        if is_mri && !term.is_mri {
            let page_start = (engine.clc.wrapping_add(engine.reloc as u16)) & 0o7600;
            let page_end = page_start | 0o177;

            if addr < 0o200 {
                value |= addr;
            } else if addr >= page_start && addr <= page_end {
                value |= PAGE_BIT | (addr & 0o177);
            } else if value & INDIRECT_BIT == INDIRECT_BIT {
                let col = line.column();
                return Err(AsmError::new(ErrorTag::IllegalIndirect, col));
            } else if engine.literals_on {
                let idx = engine.cp_pool.insert(addr);
                value |= 0o600 | idx as u16;
                engine.last_auto_indirect = true;
            } else {
                let col = line.column();
                return Err(AsmError::new(ErrorTag::IllegalReference, col));
            }
        } else if is_mri {
            value |= term.value;
        } else {
            value |= addr;
        }
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_run_parses_in_radix() {
        let mut e = Engine::new();
        e.radix = 8;
        let mut l = LineBuffer::new("17");
        let v = eval(&mut e, &mut l).unwrap();
        assert_eq!(v.value, 0o17);
    }

    #[test]
    fn digit_not_in_radix_is_illegal_character() {
        let mut e = Engine::new();
        e.radix = 8;
        let mut l = LineBuffer::new("8");
        let err = eval(&mut e, &mut l).unwrap_err();
        assert_eq!(err.tag, ErrorTag::IllegalCharacter);
    }

    #[test]
    fn dot_yields_clc_plus_reloc() {
        let mut e = Engine::new();
        e.clc = 0o100;
        e.reloc = 5;
        let mut l = LineBuffer::new(".");
        let v = eval(&mut e, &mut l).unwrap();
        assert_eq!(v.value, 0o100 + 5);
    }

    #[test]
    fn char_literal_sets_high_bit() {
        let mut e = Engine::new();
        let mut l = LineBuffer::new("\"A");
        let v = eval(&mut e, &mut l).unwrap();
        assert_eq!(v.value, ('A' as u16) | 0o200);
    }

    #[test]
    fn operator_chain_is_left_to_right_equal_precedence() {
        let mut e = Engine::new();
        e.radix = 10;
        let mut l = LineBuffer::new("2+3^4");
        let v = get_expr(&mut e, &mut l).unwrap();
        // (2 + 3) * 4 == 20, not 2 + (3*4) == 14.
        assert_eq!(v.value, 20);
    }

    #[test]
    fn division_by_zero_yields_zero() {
        let mut e = Engine::new();
        e.radix = 10;
        let mut l = LineBuffer::new("5%0");
        let v = get_expr(&mut e, &mut l).unwrap();
        assert_eq!(v.value, 0);
    }

    #[test]
    fn undefined_symbol_errors_only_in_pass_2() {
        let mut e = Engine::new();
        e.pass = Pass::One;
        let mut l = LineBuffer::new("FOO");
        assert!(eval(&mut e, &mut l).is_ok());

        e.pass = Pass::Two;
        let mut l2 = LineBuffer::new("FOO");
        let err = eval(&mut e, &mut l2).unwrap_err();
        assert_eq!(err.tag, ErrorTag::Undefined);
    }

    #[test]
    fn mri_page_zero_address_ors_directly() {
        let mut e = Engine::new();
        e.clc = 0o200;
        let mut l = LineBuffer::new("TAD 17");
        let v = get_exprs(&mut e, &mut l).unwrap();
        assert_eq!(v, 0o1000 | 0o17);
    }

    #[test]
    fn mri_off_page_without_literals_is_illegal_reference() {
        let mut e = Engine::new();
        e.clc = 0o200;
        e.literals_on = false;
        let mut l = LineBuffer::new("TAD 1000");
        let err = get_exprs(&mut e, &mut l).unwrap_err();
        assert_eq!(err.tag, ErrorTag::IllegalReference);
    }

    #[test]
    fn bracket_literal_with_literals_off_still_scans_and_yields_zero() {
        let mut e = Engine::new();
        e.literals_on = false;
        let mut l = LineBuffer::new("[5] 1");
        let v = eval(&mut e, &mut l).unwrap();
        assert_eq!(v.value, 0);
        assert_eq!(e.pending_soft_errors.len(), 1);
        assert_eq!(e.pending_soft_errors[0].tag, ErrorTag::IllegalReference);
        // The closing bracket was consumed, so the rest of the line reads normally.
        let rest = get_expr(&mut e, &mut l).unwrap();
        assert_eq!(rest.value, 1);
    }

    #[test]
    fn paren_literal_with_literals_off_yields_page_base() {
        let mut e = Engine::new();
        e.clc = 0o1200;
        e.literals_on = false;
        let mut l = LineBuffer::new("(5)");
        let v = eval(&mut e, &mut l).unwrap();
        assert_eq!(v.value, e.page_base());
        assert_eq!(e.pending_soft_errors.len(), 1);
    }

    #[test]
    fn mri_off_page_with_literals_generates_indirect() {
        let mut e = Engine::new();
        e.clc = 0o200;
        e.literals_on = true;
        let mut l = LineBuffer::new("TAD 1000");
        let v = get_exprs(&mut e, &mut l).unwrap();
        assert_eq!(v & 0o600, 0o600);
        assert!(!e.cp_pool.is_empty());
    }
}
