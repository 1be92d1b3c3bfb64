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

use std::io::{stderr, Write};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use pal8asm::assembler::{write_outputs, Assembler};
use pal8asm::cli::{Args, USAGE, USAGE_EXIT_CODE};
use pal8asm::message::Severity;

fn main() -> ExitCode {
    let args = Args::parse();

    if args.help || args.version {
        let _ = writeln!(stderr(), "{}", USAGE);
        return ExitCode::from(USAGE_EXIT_CODE as u8);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(stderr)
        .init();

    let Some(input) = args.input.clone() else {
        let _ = writeln!(stderr(), "{}", USAGE);
        return ExitCode::from(USAGE_EXIT_CODE as u8);
    };

    let asm = match Assembler::new(input, &args) {
        Ok(asm) => asm,
        Err(e) => {
            report_fatal(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let outcome = match asm.run() {
        Ok(outcome) => outcome,
        Err(e) => {
            report_fatal(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = write_outputs(&outcome) {
        report_fatal(&e.to_string());
        return ExitCode::FAILURE;
    }

    if outcome.fatal || outcome.error_count > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn report_fatal(message: &str) {
    let label = Severity::Fatal.to_string();
    let _ = writeln!(stderr(), "{}{}", label.color(Severity::Fatal.color()), message);
}
