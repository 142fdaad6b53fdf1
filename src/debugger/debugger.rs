// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::debugger::parser;
use crate::machine::machine::Machine;
use crate::machine::memory::MEMORY_SIZE;
use crate::machine::Word;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = "(rm) ";

// Bytes shown per line and by default in a memory dump.
const MEMORY_ROW: usize = 16;

#[derive(Debug, PartialEq)]
enum Command {
    Step,
    Continue,
    Dump,
    Memory,
    Quit,
}

#[derive(Debug)]
struct CommandWithArguments {
    command: Command,
    args: Vec<String>,
}

/// Interactive prompt that drives a machine one instruction at a time. Faults
/// are reported without ending the session so the state can be inspected.
pub struct Debugger {
    editor: DefaultEditor,
}

impl Debugger {
    pub fn new() -> Result<Debugger, ReadlineError> {
        Ok(Debugger { editor: DefaultEditor::new()? })
    }

    /// Reads and executes commands until the user quits or closes the input.
    pub fn run(&mut self, machine: &mut Machine) -> Result<(), ReadlineError> {
        loop {
            let input = match self.editor.readline(PROMPT) {
                Ok(input) => input,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
                Err(e) => return Err(e),
            };
            if input.trim().is_empty() {
                continue;
            }
            self.editor.add_history_entry(input.as_str())?;

            match interpret(&input) {
                Ok(command) => {
                    if command.command == Command::Quit {
                        return Ok(());
                    }
                    execute_command(command, machine);
                },
                Err(e) => eprintln!("rm: {}", e),
            }
        }
    }
}

/// Parse a raw input string into a list of arguments and a command. This
/// function also maps command names to their respective enums.
fn interpret(input: &str) -> Result<CommandWithArguments, String> {
    let args = parser::parse_raw_input(input)?;

    let command = match args.first() {
        Some(raw_command) => match raw_command.to_lowercase().as_str() {
            // Full commands.
            "step"     => Command::Step,
            "continue" => Command::Continue,
            "dump"     => Command::Dump,
            "mem"      => Command::Memory,
            "quit"     => Command::Quit,
            // Aliases.
            "s" => Command::Step,
            "c" => Command::Continue,
            "d" => Command::Dump,
            "m" => Command::Memory,
            "q" => Command::Quit,
            _ => return Err(format!("unknown command `{}`", raw_command)),
        },
        None => return Err(String::from("no command specified")),
    };

    Ok(CommandWithArguments {
        command: command,
        args: args,
    })
}

/// Executes the correct debugger command based on the enum passed.
fn execute_command(command: CommandWithArguments, machine: &mut Machine) {
    match command.command {
        Command::Step => execute_step(machine),
        Command::Continue => execute_continue(machine),
        Command::Dump => println!("{}", machine),
        Command::Memory => execute_memory(machine, &command.args),
        Command::Quit => {},
    }
}

fn execute_step(machine: &mut Machine) {
    if machine.is_halted() {
        println!("machine is halted");
        return;
    }
    match machine.step() {
        Ok(()) => println!("{}", machine),
        Err(fault) => eprintln!("rm: fault: {}", fault),
    }
}

fn execute_continue(machine: &mut Machine) {
    match machine.execute() {
        Ok(()) => println!("machine is halted"),
        Err(fault) => eprintln!("rm: fault: {}", fault),
    }
}

fn execute_memory(machine: &Machine, args: &[String]) {
    let addr = match args.get(1).map(|arg| parse_word(arg)) {
        Some(Some(addr)) => addr,
        Some(None) => {
            eprintln!("rm: invalid address `{}`", args[1]);
            return;
        },
        None => {
            eprintln!("rm: mem requires an address");
            return;
        },
    };
    let len = match args.get(2).map(|arg| arg.parse::<usize>()) {
        Some(Ok(len)) => len,
        Some(Err(_)) => {
            eprintln!("rm: invalid length `{}`", args[2]);
            return;
        },
        None => MEMORY_ROW,
    };
    print!("{}", format_memory(machine, addr, len));
}

/// Parses a word given in decimal or `0x` prefixed hexadecimal.
fn parse_word(arg: &str) -> Option<Word> {
    if arg.starts_with("0x") || arg.starts_with("0X") {
        Word::from_str_radix(&arg[2..], 16).ok()
    } else {
        arg.parse::<Word>().ok()
    }
}

/// Formats `len` bytes of memory starting at `addr` as hex rows. The dump
/// stops at the top of memory.
fn format_memory(machine: &Machine, addr: Word, len: usize) -> String {
    let start = addr as usize;
    let end = (start + len).min(MEMORY_SIZE);
    let mut out = String::new();

    for row in (start..end).step_by(MEMORY_ROW) {
        let cells: Vec<String> = (row..(row + MEMORY_ROW).min(end))
            .map(|a| format!("{:02X}", machine.memory.read_u8(a as Word)))
            .collect();
        out.push_str(&format!("{:02X}: {}\n", row, cells.join(" ")));
    }
    out
}
