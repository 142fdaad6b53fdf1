// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate enum_primitive;

mod asm;
mod debugger;
mod io;
mod machine;
mod utils;

use crate::debugger::debugger::Debugger;
use crate::io::errors::*;
use crate::io::source;
use crate::machine::machine::{Machine, RuntimeOptions};
use getopts::Options;
use std::env;

/// Prints usage information for the emulator.
fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} [options] PROGRAM", program);
    print!("{}", opts.usage(&brief));
}

/// Initializes and starts the machine. Returns an exit code after which the
/// program unwinds and stops executing. Once the machine starts executing, it
/// only stops when it halts, faults, or the debugger session ends.
fn init() -> i32 {
    let args: Vec<String> = env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| String::from("rm"));

    let mut opts = Options::new();
    opts.optflag("v", "verbose", "log every executed instruction");
    opts.optflag("t", "trace", "print the machine state after every step");
    opts.optflag("d", "debug", "step through the program in the debugger");
    opts.optflag("h", "help", "print this help menu");

    let matches = match opts.parse(args.iter().skip(1)) {
        Ok(matches) => matches,
        Err(e) => {
            eprintln!("rm: {}", e);
            return EXIT_INVALID_ARGS;
        },
    };

    if matches.opt_present("h") {
        print_usage(&program, &opts);
        return EXIT_SUCCESS;
    }

    let path = match matches.free.first() {
        Some(path) => path,
        None => {
            print_usage(&program, &opts);
            return EXIT_INVALID_ARGS;
        },
    };

    let runtime_options = RuntimeOptions {
        verbose: matches.opt_present("v"),
        trace: matches.opt_present("t"),
        debug: matches.opt_present("d"),
    };

    let instructions = match source::load_program(path) {
        Ok(instructions) => instructions,
        Err(e) => {
            eprintln!("rm: {}: {}", path, e);
            return EXIT_INVALID_PROGRAM;
        },
    };

    let mut machine = Machine::new(runtime_options);
    machine.load(&instructions);

    if runtime_options.debug {
        let session = Debugger::new().and_then(|mut debugger| debugger.run(&mut machine));
        return match session {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                eprintln!("rm: debugger: {}", e);
                EXIT_FAILURE
            },
        };
    }

    match machine.execute() {
        Ok(()) => {
            println!("{}", machine);
            EXIT_SUCCESS
        },
        Err(fault) => {
            eprintln!("rm: fault: {}", fault);
            eprintln!("{}", machine);
            EXIT_RUNTIME_FAULT
        },
    }
}

/// Entry point of the program and wrapper of init. Takes the exit code returned
/// from init and exits with it.
fn main() {
    let exit_code = init();
    std::process::exit(exit_code); // Unwinding done, safe to exit.
}
