// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::machine::Word;
use thiserror::Error;

/// Faults raised while executing a program. Every fault is fatal: the step
/// that raised it is abandoned and the machine is left exactly as it was at
/// the moment of the fault so it can be inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    /// Register index outside of the 8 entry register file.
    #[error("register index {0} is out of range")]
    InvalidRegister(Word),

    /// Memory accessed through an address that lies below the stack base.
    #[error("memory address {address:#04X} is below the stack base {base:#04X}")]
    MemoryGuardViolation { address: Word, base: Word },

    #[error("division by zero")]
    DivisionByZero,

    /// The instruction pointer sits where no whole instruction can be decoded
    /// (the block would cross below address 0).
    #[error("instruction pointer {0:#04X} does not point at an instruction")]
    InvalidInstructionPointer(Word),

    #[error("unknown opcode {0:#04X}")]
    InvalidOpcode(Word),
}
