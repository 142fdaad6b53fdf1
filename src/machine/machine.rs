// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::io::log;
use crate::machine::fault::Fault;
use crate::machine::instruction::{Instruction, INSTRUCTION_WORDS};
use crate::machine::memory::Memory;
use crate::machine::registers::{self, Register, Registers};
use crate::machine::Word;
use crate::utils::arithmetic::{self, Operation};
use std::fmt;

/// Options passed from the command-line that may influence how the machine
/// behaves.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    // Log every executed instruction.
    pub verbose: bool,

    // Print the full machine state after every step.
    pub trace: bool,

    // Drive the machine from the interactive debugger instead of running it
    // to completion.
    pub debug: bool,
}

/// An 8-bit register machine with 256 bytes of memory.
///
/// Programs are loaded back to front: the last instruction of a program lands
/// at address 0 and the first instruction occupies the highest code addresses.
/// The instruction pointer starts at the last byte of the first instruction
/// and counts downwards, so instructions still execute in program order. The
/// stack begins directly above the code and grows upwards.
///
/// The machine is halted whenever the instruction pointer is 0. There is no
/// halt instruction; a program stops by jumping to 0, or by running off the
/// end of its code into zeroed memory at the top of the address space, which
/// decodes as `mov rip, 0`.
pub struct Machine {
    pub registers: Registers,
    pub memory: Memory,
    runtime_options: RuntimeOptions,
}

impl Machine {
    pub fn new(runtime_options: RuntimeOptions) -> Machine {
        Machine {
            registers: Registers::new(),
            memory: Memory::new(),
            runtime_options: runtime_options,
        }
    }

    /// Encodes a program into memory starting at address 0 and sets up the
    /// stack directly above it. An empty program leaves the machine halted.
    pub fn load(&mut self, program: &[Instruction]) {
        self.registers.set_ip(0);
        if program.is_empty() {
            log::log("load", "empty program, machine halted", &self.runtime_options);
            return;
        }

        for instr in program.iter().rev() {
            self.encode(instr);
        }

        let end = self.registers.ip();
        self.registers.write(Register::SP, end);
        self.registers.write(Register::SB, end);
        self.registers.set_ip(end.wrapping_sub(1));

        log::log("load", format!("{} instructions loaded, stack base at {:#04X}",
                                 program.len(), end), &self.runtime_options);
    }

    /// Runs until the machine halts or faults. On a fault the machine is left
    /// as it was when the fault occurred.
    pub fn execute(&mut self) -> Result<(), Fault> {
        while !self.is_halted() {
            self.step()?;
        }
        Ok(())
    }

    /// Fetches, decodes and executes a single instruction. Does nothing when
    /// the machine is halted.
    pub fn step(&mut self) -> Result<(), Fault> {
        if self.is_halted() {
            return Ok(());
        }

        let addr = self.registers.ip();
        let instr = self.decode_next()?;
        if self.runtime_options.verbose {
            let bytes = instr.to_bytes();
            log::log("cpu", format!("{:02X}  {:02X} {:02X} {:02X} {:02X}  {}",
                                    addr, bytes[0], bytes[1], bytes[2], bytes[3], instr),
                     &self.runtime_options);
        }

        self.dispatch(instr)?;

        if self.runtime_options.trace {
            println!("{}", self);
        }
        Ok(())
    }

    #[inline(always)]
    pub fn is_halted(&self) -> bool {
        self.registers.ip() == 0
    }

    /// The live stack, `memory[SB..SP]`. Empty if SP was moved below SB.
    pub fn stack_window(&self) -> &[Word] {
        self.memory.slice(self.registers.sb(), self.registers.sp())
    }

    /// Writes an instruction at the instruction pointer in field order and
    /// advances the instruction pointer past it.
    fn encode(&mut self, instr: &Instruction) {
        let ip = self.registers.ip();
        self.memory.memdump(ip, &instr.to_bytes());
        self.registers.set_ip(ip.wrapping_add(INSTRUCTION_WORDS as Word));
    }

    /// Reads the instruction whose last byte is at the instruction pointer,
    /// walking downwards and filling fields from operand3 back to operation.
    /// This mirrors `encode`, so a block is recovered unchanged when decoding
    /// starts at its highest address.
    fn decode_next(&mut self) -> Result<Instruction, Fault> {
        let mut ip = self.registers.ip();

        // A block below address 3 would wrap around the bottom of memory
        // halfway through an instruction.
        if (ip as usize) < INSTRUCTION_WORDS - 1 {
            return Err(Fault::InvalidInstructionPointer(ip));
        }

        let mut bytes = [0; INSTRUCTION_WORDS];
        for byte in bytes.iter_mut().rev() {
            *byte = self.memory.read_u8(ip);
            ip = ip.wrapping_sub(1);
        }
        self.registers.set_ip(ip);

        Ok(Instruction::from_bytes(bytes))
    }

    /// Executes a decoded instruction. Stack instructions are composed from
    /// the move and arithmetic instructions and re-enter this function.
    fn dispatch(&mut self, instr: Instruction) -> Result<(), Fault> {
        use crate::machine::opcode::Opcode::*;

        let (op1, op2) = (instr.operand1, instr.operand2);
        match instr.opcode()? {
            MovRI => self.registers.set(op1, op2),
            MovRR => {
                let val = self.registers.get(op2)?;
                self.registers.set(op1, val)
            },
            MovRMR => {
                let val = self.load_indirect(op2)?;
                self.registers.set(op1, val)
            },

            MovMI => self.store(op1, op2),
            MovMR => {
                let val = self.registers.get(op2)?;
                self.store(op1, val)
            },
            MovMMR => {
                let val = self.load_indirect(op2)?;
                self.store(op1, val)
            },

            MovMRI => self.store_indirect(op1, op2),
            MovMRR => {
                let val = self.registers.get(op2)?;
                self.store_indirect(op1, val)
            },
            MovMRMR => {
                let val = self.load_indirect(op2)?;
                self.store_indirect(op1, val)
            },

            AddRI => self.arithmetic(Operation::Add, op1, op2),
            AddRR => self.arithmetic_reg(Operation::Add, op1, op2),
            SubRI => self.arithmetic(Operation::Sub, op1, op2),
            SubRR => self.arithmetic_reg(Operation::Sub, op1, op2),
            MulRI => self.arithmetic(Operation::Mul, op1, op2),
            MulRR => self.arithmetic_reg(Operation::Mul, op1, op2),
            DivRI => self.arithmetic(Operation::Div, op1, op2),
            DivRR => self.arithmetic_reg(Operation::Div, op1, op2),

            // push: write at SP first, then move SP up.
            PushI => {
                self.dispatch(Instruction::new(MovMRI, Register::SP as Word, op1))?;
                self.dispatch(Instruction::new(AddRI, Register::SP as Word, 1))
            },
            PushR => {
                self.dispatch(Instruction::new(MovMRR, Register::SP as Word, op1))?;
                self.dispatch(Instruction::new(AddRI, Register::SP as Word, 1))
            },
            // pop: move SP down first, then read at SP.
            PopR => {
                self.dispatch(Instruction::new(SubRI, Register::SP as Word, 1))?;
                self.dispatch(Instruction::new(MovRMR, op1, Register::SP as Word))
            },

            JmprI => {
                self.jump_relative(op1);
                Ok(())
            },
            JmprR => {
                let offset = self.registers.get(op1)?;
                self.jump_relative(offset);
                Ok(())
            },
            JmpaI => {
                self.registers.set_ip(op1);
                Ok(())
            },
            JmpaR => {
                let target = self.registers.get(op1)?;
                self.registers.set_ip(target);
                Ok(())
            },

            CmpRR => {
                let rhs = self.registers.get(op2)?;
                self.compare(op1, rhs)
            },
            CmpRI => self.compare(op1, op2),

            JerI | JerR | JeaI | JeaR if !self.registers.equal_flag_set() => Ok(()),
            JerI => self.dispatch(Instruction::unary(JmprI, op1)),
            JerR => self.dispatch(Instruction::unary(JmprR, op1)),
            JeaI => self.dispatch(Instruction::unary(JmpaI, op1)),
            JeaR => self.dispatch(Instruction::unary(JmpaR, op1)),
        }
    }

    /// Rejects any memory access below the stack base, which protects the
    /// loaded code from data and stack instructions.
    #[inline(always)]
    fn guard(&self, addr: Word) -> Result<Word, Fault> {
        let base = self.registers.sb();
        if addr < base {
            return Err(Fault::MemoryGuardViolation { address: addr, base: base });
        }
        Ok(addr)
    }

    fn store(&mut self, addr: Word, val: Word) -> Result<(), Fault> {
        let addr = self.guard(addr)?;
        self.memory.write_u8(addr, val);
        Ok(())
    }

    fn fetch(&self, addr: Word) -> Result<Word, Fault> {
        let addr = self.guard(addr)?;
        Ok(self.memory.read_u8(addr))
    }

    /// Reads the memory cell addressed by a register.
    fn load_indirect(&self, reg: Word) -> Result<Word, Fault> {
        let addr = self.registers.get(reg)?;
        self.fetch(addr)
    }

    /// Writes the memory cell addressed by a register.
    fn store_indirect(&mut self, reg: Word, val: Word) -> Result<(), Fault> {
        let addr = self.registers.get(reg)?;
        self.store(addr, val)
    }

    fn arithmetic(&mut self, op: Operation, reg: Word, rhs: Word) -> Result<(), Fault> {
        let lhs = self.registers.get(reg)?;
        let result = arithmetic::apply(op, lhs, rhs)?;
        self.registers.set(reg, result)
    }

    fn arithmetic_reg(&mut self, op: Operation, reg: Word, rhs_reg: Word) -> Result<(), Fault> {
        let rhs = self.registers.get(rhs_reg)?;
        self.arithmetic(op, reg, rhs)
    }

    fn compare(&mut self, reg: Word, rhs: Word) -> Result<(), Fault> {
        let lhs = self.registers.get(reg)?;
        self.registers.toggle_equal_flag(lhs == rhs);
        self.registers.toggle_less_flag(lhs < rhs);
        Ok(())
    }

    #[inline(always)]
    fn jump_relative(&mut self, offset: Word) {
        let ip = self.registers.ip();
        self.registers.set_ip(arithmetic::sub_relative(ip, offset));
    }

    /// Returns "SET" if the passed boolean is true, otherwise "UNSET".
    fn fmt_flag(flag: bool) -> &'static str {
        if flag { "SET" } else { "UNSET" }
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Stack:")?;
        for val in self.stack_window() {
            writeln!(f, " {}", val)?;
        }

        writeln!(f, "Registers:")?;
        for (index, val) in self.registers.as_slice().iter().enumerate() {
            let name = registers::name(index as Word).unwrap_or("?");
            writeln!(f, " {} = {}", name, val)?;
        }

        write!(f, "Flags: eq={} lt={}",
               Machine::fmt_flag(self.registers.equal_flag_set()),
               Machine::fmt_flag(self.registers.less_flag_set()))
    }
}
