// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::machine::fault::Fault;
use crate::machine::opcode::{self, Opcode};
use crate::machine::registers;
use crate::machine::Word;
use std::fmt;

/// Every instruction occupies exactly this many memory cells.
pub const INSTRUCTION_WORDS: usize = 4;

/// An instruction is always 4 bytes wide. The first byte is the opcode and the
/// following 3 bytes are operands whose meaning depends on the opcode (register
/// index, immediate or unused). Unused operands are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub operation: Word,
    pub operand1: Word,
    pub operand2: Word,
    pub operand3: Word,
}

impl Instruction {
    pub fn new(opcode: Opcode, operand1: Word, operand2: Word) -> Instruction {
        Instruction {
            operation: opcode as Word,
            operand1: operand1,
            operand2: operand2,
            operand3: 0,
        }
    }

    /// Builds an instruction that only uses its first operand.
    pub fn unary(opcode: Opcode, operand: Word) -> Instruction {
        Instruction::new(opcode, operand, 0)
    }

    /// Lays the instruction out in field order, operation first.
    #[inline(always)]
    pub fn to_bytes(&self) -> [Word; INSTRUCTION_WORDS] {
        [self.operation, self.operand1, self.operand2, self.operand3]
    }

    /// Inverse of `to_bytes`.
    #[inline(always)]
    pub fn from_bytes(bytes: [Word; INSTRUCTION_WORDS]) -> Instruction {
        Instruction {
            operation: bytes[0],
            operand1: bytes[1],
            operand2: bytes[2],
            operand3: bytes[3],
        }
    }

    #[inline(always)]
    pub fn opcode(&self) -> Result<Opcode, Fault> {
        opcode::decode_opcode(self.operation)
    }
}

/// Formats a register operand by name, falling back to the raw index for
/// registers that do not exist.
fn fmt_reg(index: Word) -> String {
    match registers::name(index) {
        Some(name) => String::from(name),
        None => format!("r{}", index),
    }
}

fn fmt_mem_reg(index: Word) -> String {
    format!("[{}]", fmt_reg(index))
}

impl fmt::Display for Instruction {
    /// Disassembles the instruction into the syntax accepted by the assembler.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use crate::machine::opcode::Opcode::*;

        let opcode = match self.opcode() {
            Ok(opcode) => opcode,
            Err(_) => return write!(f, ".byte {}, {}, {}, {}", self.operation,
                                    self.operand1, self.operand2, self.operand3),
        };

        let (a, b) = (self.operand1, self.operand2);
        let operands = match opcode {
            MovRI | AddRI | SubRI | MulRI | DivRI | CmpRI =>
                format!("{}, {}", fmt_reg(a), b),
            MovRR | AddRR | SubRR | MulRR | DivRR | CmpRR =>
                format!("{}, {}", fmt_reg(a), fmt_reg(b)),
            MovRMR  => format!("{}, {}", fmt_reg(a), fmt_mem_reg(b)),
            MovMI   => format!("{}, {}", a, b),
            MovMR   => format!("{}, {}", a, fmt_reg(b)),
            MovMMR  => format!("{}, {}", a, fmt_mem_reg(b)),
            MovMRI  => format!("{}, {}", fmt_mem_reg(a), b),
            MovMRR  => format!("{}, {}", fmt_mem_reg(a), fmt_reg(b)),
            MovMRMR => format!("{}, {}", fmt_mem_reg(a), fmt_mem_reg(b)),
            PushI | JmprI | JmpaI | JerI | JeaI => format!("{}", a),
            PushR | PopR | JmprR | JmpaR | JerR | JeaR => fmt_reg(a),
        };

        write!(f, "{} {}", opcode::mnemonic(opcode), operands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::registers::Register;

    #[test]
    fn byte_layout_is_field_order() {
        let instr = Instruction {
            operation: Opcode::CmpRI as Word,
            operand1: Register::A as Word,
            operand2: 42,
            operand3: 7,
        };
        assert_eq!(instr.to_bytes(), [0x19, 3, 42, 7]);
        assert_eq!(Instruction::from_bytes(instr.to_bytes()), instr);
    }

    #[test]
    fn unary_instructions_zero_trailing_operands() {
        let instr = Instruction::unary(Opcode::PushI, 9);
        assert_eq!(instr.to_bytes(), [0x11, 9, 0, 0]);
    }

    #[test]
    fn disassembles_operand_kinds() {
        let a = Register::A as Word;
        let b = Register::B as Word;
        assert_eq!(Instruction::new(Opcode::MovRI, a, 5).to_string(), "mov rax, 5");
        assert_eq!(Instruction::new(Opcode::MovMRMR, a, b).to_string(), "mov [rax], [rbx]");
        assert_eq!(Instruction::new(Opcode::MovMI, 20, 1).to_string(), "mov 20, 1");
        assert_eq!(Instruction::unary(Opcode::PopR, b).to_string(), "pop rbx");
        assert_eq!(Instruction::unary(Opcode::JeaI, 12).to_string(), "jea 12");
    }

    #[test]
    fn disassembles_unknown_opcode_as_raw_bytes() {
        let instr = Instruction::from_bytes([0xEE, 1, 2, 3]);
        assert_eq!(instr.to_string(), ".byte 238, 1, 2, 3");
    }
}
