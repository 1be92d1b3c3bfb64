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

//! Object encoder: BIN/RIM frame emission and the running checksum
//! (spec §4.9).

/// Default leader/trailer length: 240 frames of `0200`, matching
/// `palbart`'s 2 feet of blank tape at 10 punches/inch.
pub const DEFAULT_LEADER_LEN: usize = 240;

const BLANK_FRAME: u8 = 0o200;
const CHECKSUM_MASK: u16 = 0o7777;

/// Emits frames into an output buffer and maintains the running 12-bit
/// checksum (spec invariant 1: origin and data frames add, `FIELD`
/// frames subtract, so a well-formed segment sums to the emitted
/// checksum).
#[derive(Debug, Default)]
pub struct ObjectEncoder {
    checksum: u16,
}

impl ObjectEncoder {
    pub fn new() -> Self {
        Self { checksum: 0 }
    }

    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    pub fn reset_checksum(&mut self) {
        self.checksum = 0;
    }

    fn add(&mut self, frame: u8) {
        self.checksum = (self.checksum + frame as u16) & CHECKSUM_MASK;
    }

    fn sub(&mut self, frame: u8) {
        self.checksum = self.checksum.wrapping_sub(frame as u16) & CHECKSUM_MASK;
    }

    /// `count` frames of blank leader/trailer tape (does not affect the
    /// checksum).
    pub fn punch_leader(&self, count: usize, out: &mut Vec<u8>) {
        out.extend(std::iter::repeat(BLANK_FRAME).take(count));
    }

    /// An origin frame pair for `loc` (12 bits): `((loc>>6)|0100), (loc&077)`.
    pub fn punch_origin(&mut self, loc: u16, out: &mut Vec<u8>) {
        let f1 = (((loc >> 6) & 0o77) | 0o100) as u8;
        let f2 = (loc & 0o77) as u8;
        out.push(f1);
        out.push(f2);
        self.add(f1);
        self.add(f2);
    }

    /// A data frame pair for `val` (12 bits).
    pub fn punch_word(&mut self, val: u16, out: &mut Vec<u8>) {
        let f1 = ((val >> 6) & 0o77) as u8;
        let f2 = (val & 0o77) as u8;
        out.push(f1);
        out.push(f2);
        self.add(f1);
        self.add(f2);
    }

    /// A RIM-mode word: origin emitted before every word.
    pub fn punch_rim_word(&mut self, loc: u16, val: u16, out: &mut Vec<u8>) {
        self.punch_origin(loc, out);
        self.punch_word(val, out);
    }

    /// The field-select frame `0300 | (field<<3)`. Subtracted from the
    /// checksum so `FIELD` frames net to zero (spec §4.9).
    pub fn punch_field(&mut self, field: u16, out: &mut Vec<u8>) {
        let frame = (0o300 | (field << 3)) as u8;
        out.push(frame);
        self.sub(frame);
    }

    /// The checksum frame pair, emitted at end-of-binary in BIN mode.
    /// Does not itself affect the running checksum.
    pub fn punch_checksum(&self, out: &mut Vec<u8>) {
        out.push(((self.checksum >> 6) & 0o77) as u8);
        out.push((self.checksum & 0o77) as u8);
    }
}
