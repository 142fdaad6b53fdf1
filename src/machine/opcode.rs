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

// Operand notation used in the names below:
//
//   R  - register index
//   I  - immediate byte
//   M  - absolute memory address (immediate)
//   MR - memory address held in a register
//
// The numeric values are part of the encoding and must never change.
enum_from_primitive! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Opcode {
        MovRI   = 0x00, // mov r, imm
        MovRR   = 0x01, // mov r, r
        MovRMR  = 0x02, // mov r, [r]

        MovMI   = 0x03, // mov m, imm
        MovMR   = 0x04, // mov m, r
        MovMMR  = 0x05, // mov m, [r]

        MovMRI  = 0x06, // mov [r], imm
        MovMRR  = 0x07, // mov [r], r
        MovMRMR = 0x08, // mov [r], [r]

        AddRI   = 0x09,
        AddRR   = 0x0A,

        SubRI   = 0x0B,
        SubRR   = 0x0C,

        MulRI   = 0x0D,
        MulRR   = 0x0E,

        DivRI   = 0x0F,
        DivRR   = 0x10,

        PushI   = 0x11,
        PushR   = 0x12,

        PopR    = 0x13,

        JmprI   = 0x14, // ip -= imm
        JmprR   = 0x15, // ip -= r

        JmpaI   = 0x16, // ip = imm
        JmpaR   = 0x17, // ip = r

        CmpRR   = 0x18,
        CmpRI   = 0x19,

        JerI    = 0x1A,
        JerR    = 0x1B,
        JeaI    = 0x1C,
        JeaR    = 0x1D,
    }
}

/// Decodes an opcode by converting an opcode byte to an enum value.
pub fn decode_opcode(opcode: Word) -> Result<Opcode, Fault> {
    match Opcode::from_u8(opcode) {
        Some(opcode) => Ok(opcode),
        None => Err(Fault::InvalidOpcode(opcode)),
    }
}

/// Returns the assembler mnemonic used for the given opcode.
pub fn mnemonic(opcode: Opcode) -> &'static str {
    use self::Opcode::*;

    match opcode {
        MovRI | MovRR | MovRMR |
        MovMI | MovMR | MovMMR |
        MovMRI | MovMRR | MovMRMR => "mov",

        AddRI | AddRR => "add",
        SubRI | SubRR => "sub",
        MulRI | MulRR => "mul",
        DivRI | DivRR => "div",

        PushI | PushR => "push",
        PopR          => "pop",

        JmprI | JmprR => "jmpr",
        JmpaI | JmpaR => "jmpa",

        CmpRR | CmpRI => "cmp",

        JerI | JerR => "jer",
        JeaI | JeaR => "jea",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_every_assigned_opcode() {
        for byte in 0x00..=0x1D {
            let opcode = decode_opcode(byte).unwrap();
            assert_eq!(opcode as Word, byte);
        }
    }

    #[test]
    fn rejects_unassigned_opcodes() {
        assert_eq!(decode_opcode(0x1E), Err(Fault::InvalidOpcode(0x1E)));
        assert_eq!(decode_opcode(0xFF), Err(Fault::InvalidOpcode(0xFF)));
    }
}
