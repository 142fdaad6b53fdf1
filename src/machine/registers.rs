// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::machine::fault::Fault;
use crate::machine::Word;
use num::FromPrimitive;

pub const REGISTER_COUNT: usize = 8;

// Flag constants that allow easy bitwise getting and setting of flag values
// inside of the F register. The remaining 6 bits are unused but preserved.
pub const EQUAL_FLAG: Word = 0x1;
pub const LESS_FLAG : Word = 0x2;

enum_from_primitive! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Register {
        IP = 0, // instruction pointer
        SP = 1, // stack pointer
        SB = 2, // stack base pointer
        A  = 3,
        B  = 4,
        C  = 5,
        D  = 6,
        F  = 7, // flags
    }
}

// Assembler names indexed by register number.
const NAMES: [&str; REGISTER_COUNT] = ["rip", "rsp", "rsb", "rax", "rbx", "rcx", "rdx", "rfx"];

/// Returns the assembler name of the register with the given index.
pub fn name(index: Word) -> Option<&'static str> {
    NAMES.get(index as usize).cloned()
}

/// Looks up a register by its assembler name.
pub fn by_name(name: &str) -> Option<Register> {
    NAMES.iter()
        .position(|n| *n == name)
        .and_then(|index| Register::from_usize(index))
}

/// The register file. IP, SP and SB are ordinary registers that the machine
/// gives special meaning to; they can be read and written like any other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    regs: [Word; REGISTER_COUNT],
}

impl Registers {
    pub fn new() -> Registers {
        Registers { regs: [0; REGISTER_COUNT] }
    }

    /// Reads a register by raw index as found in an instruction operand.
    pub fn get(&self, index: Word) -> Result<Word, Fault> {
        self.regs.get(index as usize)
            .cloned()
            .ok_or(Fault::InvalidRegister(index))
    }

    /// Writes a register by raw index as found in an instruction operand.
    pub fn set(&mut self, index: Word, value: Word) -> Result<(), Fault> {
        match self.regs.get_mut(index as usize) {
            Some(reg) => {
                *reg = value;
                Ok(())
            },
            None => Err(Fault::InvalidRegister(index)),
        }
    }

    // Named accessors can't fail since every `Register` is in range.

    #[inline(always)]
    pub fn read(&self, reg: Register) -> Word {
        self.regs[reg as usize]
    }

    #[inline(always)]
    pub fn write(&mut self, reg: Register, value: Word) {
        self.regs[reg as usize] = value;
    }

    #[inline(always)]
    pub fn ip(&self) -> Word {
        self.read(Register::IP)
    }

    #[inline(always)]
    pub fn sp(&self) -> Word {
        self.read(Register::SP)
    }

    #[inline(always)]
    pub fn sb(&self) -> Word {
        self.read(Register::SB)
    }

    #[inline(always)]
    pub fn set_ip(&mut self, value: Word) {
        self.write(Register::IP, value);
    }

    /// Returns true if the last comparison found both operands equal.
    #[inline(always)]
    pub fn equal_flag_set(&self) -> bool {
        self.read(Register::F) & EQUAL_FLAG == EQUAL_FLAG
    }

    /// Returns true if the last comparison found the left operand smaller.
    #[inline(always)]
    pub fn less_flag_set(&self) -> bool {
        self.read(Register::F) & LESS_FLAG == LESS_FLAG
    }

    #[inline(always)]
    pub fn toggle_equal_flag(&mut self, set: bool) {
        self.toggle_flag(EQUAL_FLAG, set);
    }

    #[inline(always)]
    pub fn toggle_less_flag(&mut self, set: bool) {
        self.toggle_flag(LESS_FLAG, set);
    }

    fn toggle_flag(&mut self, flag: Word, set: bool) {
        let f = self.read(Register::F);
        self.write(Register::F, if set { f | flag } else { f & !flag });
    }

    /// All registers in index order.
    pub fn as_slice(&self) -> &[Word] {
        &self.regs
    }
}
