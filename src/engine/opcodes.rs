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

//! The permanent symbol table: pseudo-op names and built-in instruction
//! mnemonics installed before every assembly pass (spec §3, §4.2).

use super::symbol::SymbolFlags;

/// One of the 26 pseudo-op directives (spec §4.6).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Pseudo {
    Bank,
    BinPunch,
    Decimal,
    Dubl,
    Eject,
    EnPunch,
    Expunge,
    Field,
    FixMri,
    FixTab,
    Fltg,
    IfDef,
    IfNDef,
    IfNZero,
    IfZero,
    NoPunch,
    Octal,
    Page,
    Pause,
    Reloc,
    RimPunch,
    Segmnt,
    Text,
    Title,
    XList,
    ZBlock,
}

/// `name` is the truncated-to-6 spelling the lexer matches, as in
/// `palbart`'s `pseudo[]` table.
pub const PSEUDO_OPS: &[(&str, Pseudo)] = &[
    ("BANK",   Pseudo::Bank),
    ("BINPUN", Pseudo::BinPunch),
    ("DECIMA", Pseudo::Decimal),
    ("DUBL",   Pseudo::Dubl),
    ("EJECT",  Pseudo::Eject),
    ("ENPUNC", Pseudo::EnPunch),
    ("EXPUNG", Pseudo::Expunge),
    ("FIELD",  Pseudo::Field),
    ("FIXMRI", Pseudo::FixMri),
    ("FIXTAB", Pseudo::FixTab),
    ("FLTG",   Pseudo::Fltg),
    ("IFDEF",  Pseudo::IfDef),
    ("IFNDEF", Pseudo::IfNDef),
    ("IFNZER", Pseudo::IfNZero),
    ("IFZERO", Pseudo::IfZero),
    ("NOPUNC", Pseudo::NoPunch),
    ("OCTAL",  Pseudo::Octal),
    ("PAGE",   Pseudo::Page),
    ("PAUSE",  Pseudo::Pause),
    ("RELOC",  Pseudo::Reloc),
    ("RIMPUN", Pseudo::RimPunch),
    ("SEGMNT", Pseudo::Segmnt),
    ("TEXT",   Pseudo::Text),
    ("TITLE",  Pseudo::Title),
    ("XLIST",  Pseudo::XList),
    ("ZBLOCK", Pseudo::ZBlock),
];

/// A permanent mnemonic: either a memory-reference instruction (`mri =
/// true`, contributing its opcode bits to an address field) or a plain
/// fixed value (operate/IOT microinstruction, or a page-zero constant
/// like `Z`/`I`).
struct Permanent {
    name: &'static str,
    value: u16,
    mri: bool,
}

macro_rules! mri { ($name:expr, $value:expr) => { Permanent { name: $name, value: $value, mri: true } } }
macro_rules! fix { ($name:expr, $value:expr) => { Permanent { name: $name, value: $value, mri: false } } }

/// The full built-in instruction set, transcribed from `palbart`'s
/// `permanent_symbols[]`. Later duplicate names (e.g. `DCIM`/`DCEA` alias
/// the same opcode under two mnemonics for different peripherals) simply
/// win in lookup order, matching the original table's effect once sorted.
const PERMANENT: &[Permanent] = &[
    // Memory reference instructions
    mri!("AND", 0o0000),
    mri!("TAD", 0o1000),
    mri!("ISZ", 0o2000),
    mri!("DCA", 0o3000),
    mri!("I",   0o0400),
    mri!("JMP", 0o5000),
    mri!("JMS", 0o4000),
    mri!("Z",   0o0000),
    // Floating point interpreter
    mri!("FEXT", 0o0000),
    mri!("FADD", 0o1000),
    mri!("FSUB", 0o2000),
    mri!("FMPY", 0o3000),
    mri!("FDIV", 0o4000),
    mri!("FGET", 0o5000),
    mri!("FPUT", 0o6000),
    fix!("FNOR",   0o7000),
    fix!("SQUARE", 0o0001),
    fix!("SQROOT", 0o0002),
    // Group 1 operate
    fix!("NOP", 0o7000),
    fix!("IAC", 0o7001),
    fix!("RAL", 0o7004),
    fix!("RTL", 0o7006),
    fix!("RAR", 0o7010),
    fix!("RTR", 0o7012),
    fix!("CML", 0o7020),
    fix!("CMA", 0o7040),
    fix!("CLL", 0o7100),
    fix!("CLA", 0o7200),
    // Group 2 operate
    fix!("BSW", 0o7002),
    fix!("HLT", 0o7402),
    fix!("OSR", 0o7404),
    fix!("SKP", 0o7410),
    fix!("SNL", 0o7420),
    fix!("SZL", 0o7430),
    fix!("SZA", 0o7440),
    fix!("SNA", 0o7450),
    fix!("SMA", 0o7500),
    fix!("SPA", 0o7510),
    // Combined operate
    fix!("CIA", 0o7041),
    fix!("STL", 0o7120),
    fix!("GLK", 0o7204),
    fix!("STA", 0o7240),
    fix!("LAS", 0o7604),
    // MQ instructions
    fix!("MQL", 0o7421),
    fix!("MQA", 0o7501),
    fix!("SWP", 0o7521),
    fix!("ACL", 0o7701),
    // Program interrupt
    fix!("IOT",  0o6000),
    fix!("ION",  0o6001),
    fix!("IOF",  0o6002),
    fix!("SKON", 0o6000),
    fix!("SRQ",  0o6003),
    fix!("GTF",  0o6004),
    fix!("RTF",  0o6005),
    fix!("SGT",  0o6006),
    fix!("CAF",  0o6007),
    // Keyboard/reader
    fix!("KSF", 0o6031),
    fix!("KCC", 0o6032),
    fix!("KRS", 0o6034),
    fix!("KRB", 0o6036),
    // Teleprinter/punch
    fix!("TSF", 0o6041),
    fix!("TCF", 0o6042),
    fix!("TPC", 0o6044),
    fix!("TLS", 0o6046),
    // High speed paper tape reader
    fix!("RSF", 0o6011),
    fix!("RRB", 0o6012),
    fix!("RFC", 0o6014),
    // PC8-E reader/punch
    fix!("RPE", 0o6010),
    fix!("PCE", 0o6020),
    fix!("RCC", 0o6016),
    // High speed paper tape punch
    fix!("PSF", 0o6021),
    fix!("PCF", 0o6022),
    fix!("PPC", 0o6024),
    fix!("PLS", 0o6026),
    // DECtape TU55/TC01
    fix!("DTRA", 0o6761),
    fix!("DTCA", 0o6762),
    fix!("DTXA", 0o6764),
    fix!("DTLA", 0o6766),
    fix!("DTSF", 0o6771),
    fix!("DTRB", 0o6772),
    fix!("DTLB", 0o6774),
    // Disk file and control, DF32
    fix!("DCMA", 0o6601),
    fix!("DMAR", 0o6603),
    fix!("DMAW", 0o6605),
    fix!("DCEA", 0o6611),
    fix!("DSAC", 0o6612),
    fix!("DEAL", 0o6615),
    fix!("DEAC", 0o6616),
    fix!("DFSE", 0o6621),
    fix!("DFSC", 0o6622),
    fix!("DMAC", 0o6626),
    // Disk file and control, RF08
    fix!("DCIM", 0o6611),
    fix!("DIML", 0o6615),
    fix!("DIMA", 0o6616),
    fix!("DISK", 0o6623),
    fix!("DCXA", 0o6641),
    fix!("DXAL", 0o6643),
    fix!("DXAC", 0o6645),
    fix!("DMMT", 0o6646),
    // Memory extension control, type 183
    fix!("CDF", 0o6201),
    fix!("CIF", 0o6202),
    fix!("CDI", 0o6203),
    fix!("RDF", 0o6214),
    fix!("RIF", 0o6224),
    fix!("RIB", 0o6234),
    fix!("RMF", 0o6224),
    // Memory parity, MP8/I
    fix!("SMP", 0o6101),
    fix!("CMP", 0o6104),
    // Memory parity, MP8-E
    fix!("DPI", 0o6100),
    fix!("SNP", 0o6101),
    fix!("EPI", 0o6103),
    fix!("CNP", 0o6104),
    fix!("CEP", 0o6106),
    fix!("SPO", 0o6107),
    // Data communications, type 680I
    fix!("TTINCR", 0o6401),
    fix!("TTI",    0o6402),
    fix!("TTO",    0o6404),
    fix!("TTCL",   0o6411),
    fix!("TTSL",   0o6412),
    fix!("TTRL",   0o6414),
    fix!("TTSKP",  0o6421),
    fix!("TTXON",  0o6424),
    fix!("TTXOF",  0o6422),
];

/// Visits every permanent name and its symbol attributes, in table order.
/// [`super::mod::Engine::install_permanent_symbols`] uses this to seed a
/// fresh [`super::symtab::SymbolTable`] before [`SymbolTable::fixtab`].
pub fn for_each_permanent(mut f: impl FnMut(&str, u16, SymbolFlags)) {
    for_each_pseudo(&mut f);
    for p in PERMANENT {
        let flags = if p.mri { SymbolFlags::mri() } else { SymbolFlags::fixed_defined() };
        f(p.name, p.value, flags);
    }
}

/// Visits only the pseudo-op directive names, in table order. `EXPUNGE`
/// uses this alone: `palbart`'s `EXPUNGE` case re-enters only `pseudo[]`,
/// deliberately leaving the instruction mnemonics out so the user can
/// redefine them.
pub fn for_each_pseudo(mut f: impl FnMut(&str, u16, SymbolFlags)) {
    for p in PSEUDO_OPS {
        f(p.0, 0, SymbolFlags::pseudo());
    }
}

pub fn lookup_pseudo(name: &str) -> Option<Pseudo> {
    PSEUDO_OPS.iter().find(|p| p.0 == name).map(|p| p.1)
}
