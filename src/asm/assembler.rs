// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Assembler for the register machine's text syntax.
//!
//! One instruction per line: `<mnemonic> <operand>[, <operand>]`. Text after a
//! `;` is a comment. Operands are integer literals (`5`, `-4`), register names
//! (`rax`) or a register holding a memory address (`[rax]`). An integer in the
//! destination of a `mov` is an absolute memory address.

use crate::machine::instruction::Instruction;
use crate::machine::opcode::Opcode;
use crate::machine::registers;
use crate::machine::Word;
use std::fmt;
use thiserror::Error;

const COMMENT: char = ';';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Imm,
    Reg,
    RegVal,
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            OperandKind::Imm => write!(f, "imm"),
            OperandKind::Reg => write!(f, "reg"),
            OperandKind::RegVal => write!(f, "[reg]"),
        }
    }
}

/// A parsed operand: its kind and the word it resolves to (an immediate value
/// or a register index).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub kind: OperandKind,
    pub word: Word,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsmErrorKind {
    #[error("unknown mnemonic `{0}`")]
    UnknownMnemonic(String),

    #[error("unknown register `{0}`")]
    UnknownRegister(String),

    #[error("`{0}` is missing an operand")]
    MissingOperand(String),

    #[error("`{0}` has too many operands")]
    TrailingOperand(String),

    #[error("`{mnemonic}` does not accept operands ({operands})")]
    UnsupportedOperands { mnemonic: String, operands: String },
}

/// An assembly error along with the (1-based) source line it occurred on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct AsmError {
    pub line: usize,
    pub kind: AsmErrorKind,
}

/// Assembles a whole source text into a program. Blank and comment-only lines
/// produce no instruction.
pub fn assemble(source: &str) -> Result<Vec<Instruction>, AsmError> {
    let mut program = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let parsed = parse_instruction(line).map_err(|kind| AsmError {
            line: index + 1,
            kind: kind,
        })?;
        if let Some(instr) = parsed {
            program.push(instr);
        }
    }
    Ok(program)
}

/// Parses a single line of assembly. Returns `None` for lines without an
/// instruction.
pub fn parse_instruction(line: &str) -> Result<Option<Instruction>, AsmErrorKind> {
    let code = match line.find(COMMENT) {
        Some(pos) => &line[..pos],
        None => line,
    }.trim();
    if code.is_empty() {
        return Ok(None);
    }

    let (mnemonic, rest) = match code.find(char::is_whitespace) {
        Some(pos) => (&code[..pos], code[pos..].trim()),
        None => (code, ""),
    };
    let mnemonic = mnemonic.to_lowercase();

    let arity = match arity(&mnemonic) {
        Some(arity) => arity,
        None => return Err(AsmErrorKind::UnknownMnemonic(mnemonic)),
    };

    let raw: Vec<&str> = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split(',').map(str::trim).collect()
    };
    if raw.len() < arity || raw.iter().any(|op| op.is_empty()) {
        return Err(AsmErrorKind::MissingOperand(mnemonic));
    }
    if raw.len() > arity {
        return Err(AsmErrorKind::TrailingOperand(mnemonic));
    }

    let operands = raw.iter()
        .map(|op| parse_operand(op))
        .collect::<Result<Vec<Operand>, AsmErrorKind>>()?;
    let kinds: Vec<OperandKind> = operands.iter().map(|op| op.kind).collect();

    let opcode = match opcode_for(&mnemonic, &kinds) {
        Some(opcode) => opcode,
        None => {
            let listed: Vec<String> = kinds.iter().map(|k| k.to_string()).collect();
            return Err(AsmErrorKind::UnsupportedOperands {
                mnemonic: mnemonic,
                operands: listed.join(", "),
            });
        },
    };

    Ok(Some(match operands.as_slice() {
        [op] => Instruction::unary(opcode, op.word),
        [op1, op2] => Instruction::new(opcode, op1.word, op2.word),
        _ => unreachable!("arity is checked above"),
    }))
}

/// Parses an operand. Integer literals are truncated to a word, so negative
/// literals wrap (`-4` becomes 252).
pub fn parse_operand(operand: &str) -> Result<Operand, AsmErrorKind> {
    if let Ok(imm) = operand.parse::<i64>() {
        return Ok(Operand { kind: OperandKind::Imm, word: imm as Word });
    }

    if operand.starts_with('[') && operand.ends_with(']') && operand.len() >= 2 {
        let name = operand[1..operand.len() - 1].trim();
        return Ok(Operand { kind: OperandKind::RegVal, word: register(name)? });
    }

    Ok(Operand { kind: OperandKind::Reg, word: register(operand)? })
}

fn register(name: &str) -> Result<Word, AsmErrorKind> {
    match registers::by_name(&name.to_lowercase()) {
        Some(reg) => Ok(reg as Word),
        None => Err(AsmErrorKind::UnknownRegister(String::from(name))),
    }
}

/// Number of operands a mnemonic takes, or `None` for unknown mnemonics.
fn arity(mnemonic: &str) -> Option<usize> {
    match mnemonic {
        "mov" | "add" | "sub" | "mul" | "div" | "cmp" => Some(2),
        "push" | "pop" | "jmpr" | "jmpa" | "jer" | "jea" => Some(1),
        _ => None,
    }
}

/// Selects the opcode for a mnemonic and the kinds of its operands.
fn opcode_for(mnemonic: &str, kinds: &[OperandKind]) -> Option<Opcode> {
    use self::OperandKind::*;
    use crate::machine::opcode::Opcode::*;

    Some(match (mnemonic, kinds) {
        ("mov", [Reg, Imm])       => MovRI,
        ("mov", [Reg, Reg])       => MovRR,
        ("mov", [Reg, RegVal])    => MovRMR,
        ("mov", [Imm, Imm])       => MovMI,
        ("mov", [Imm, Reg])       => MovMR,
        ("mov", [Imm, RegVal])    => MovMMR,
        ("mov", [RegVal, Imm])    => MovMRI,
        ("mov", [RegVal, Reg])    => MovMRR,
        ("mov", [RegVal, RegVal]) => MovMRMR,

        ("add", [Reg, Imm]) => AddRI,
        ("add", [Reg, Reg]) => AddRR,
        ("sub", [Reg, Imm]) => SubRI,
        ("sub", [Reg, Reg]) => SubRR,
        ("mul", [Reg, Imm]) => MulRI,
        ("mul", [Reg, Reg]) => MulRR,
        ("div", [Reg, Imm]) => DivRI,
        ("div", [Reg, Reg]) => DivRR,

        ("push", [Imm]) => PushI,
        ("push", [Reg]) => PushR,
        ("pop",  [Reg]) => PopR,

        ("jmpr", [Imm]) => JmprI,
        ("jmpr", [Reg]) => JmprR,
        ("jmpa", [Imm]) => JmpaI,
        ("jmpa", [Reg]) => JmpaR,

        ("cmp", [Reg, Reg]) => CmpRR,
        ("cmp", [Reg, Imm]) => CmpRI,

        ("jer", [Imm]) => JerI,
        ("jer", [Reg]) => JerR,
        ("jea", [Imm]) => JeaI,
        ("jea", [Reg]) => JeaR,

        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::fault::Fault;
    use crate::machine::machine::{Machine, RuntimeOptions};
    use crate::machine::registers::Register;

    fn run(source: &str) -> (Machine, Result<(), Fault>) {
        let program = assemble(source).unwrap();
        let mut machine = Machine::new(RuntimeOptions::default());
        machine.load(&program);
        let result = machine.execute();
        (machine, result)
    }

    #[test]
    fn parses_operand_kinds() {
        assert_eq!(parse_operand("42"), Ok(Operand { kind: OperandKind::Imm, word: 42 }));
        assert_eq!(parse_operand("-4"), Ok(Operand { kind: OperandKind::Imm, word: 252 }));
        assert_eq!(parse_operand("rcx"), Ok(Operand { kind: OperandKind::Reg, word: 5 }));
        assert_eq!(parse_operand("[rsp]"), Ok(Operand { kind: OperandKind::RegVal, word: 1 }));
        assert_eq!(parse_operand("[rqx]"), Err(AsmErrorKind::UnknownRegister(String::from("rqx"))));
    }

    #[test]
    fn selects_opcode_by_operand_kinds() {
        let program = assemble("mov rax, 5\nmov 20, [rbx]\npush rax\njea 0").unwrap();
        assert_eq!(program, vec![
            Instruction::new(Opcode::MovRI, 3, 5),
            Instruction::new(Opcode::MovMMR, 20, 4),
            Instruction::unary(Opcode::PushR, 3),
            Instruction::unary(Opcode::JeaI, 0),
        ]);
    }

    #[test]
    fn skips_blank_lines_and_comments() {
        let program = assemble("; counter\n\n  add rax, 1 ; bump\n").unwrap();
        assert_eq!(program, vec![Instruction::new(Opcode::AddRI, 3, 1)]);
    }

    #[test]
    fn reports_line_numbers() {
        let err = assemble("mov rax, 1\nfrob rax").unwrap_err();
        assert_eq!(err, AsmError {
            line: 2,
            kind: AsmErrorKind::UnknownMnemonic(String::from("frob")),
        });
        assert_eq!(err.to_string(), "line 2: unknown mnemonic `frob`");
    }

    #[test]
    fn rejects_wrong_operand_counts() {
        assert_eq!(parse_instruction("push"), Err(AsmErrorKind::MissingOperand(String::from("push"))));
        assert_eq!(parse_instruction("mov rax,"), Err(AsmErrorKind::MissingOperand(String::from("mov"))));
        assert_eq!(parse_instruction("pop rax, rbx"), Err(AsmErrorKind::TrailingOperand(String::from("pop"))));
    }

    #[test]
    fn rejects_unsupported_operand_kinds() {
        assert_eq!(parse_instruction("add 5, rax"), Err(AsmErrorKind::UnsupportedOperands {
            mnemonic: String::from("add"),
            operands: String::from("imm, reg"),
        }));
        assert!(parse_instruction("pop 3").is_err());
        assert!(parse_instruction("cmp rax, [rbx]").is_err());
    }

    #[test]
    fn disassembly_reassembles() {
        let source = "mov [rax], [rbx]\ncmp rdx, 7\njmpr rcx\nmov 9, rfx";
        let program = assemble(source).unwrap();
        let listing: Vec<String> = program.iter().map(|i| i.to_string()).collect();
        assert_eq!(listing.join("\n"), source);
    }

    #[test]
    fn stack_program() {
        let (machine, result) = run("push 7\npush 9\npop rbx\npop rax");
        assert_eq!(result, Ok(()));
        assert_eq!(machine.registers.read(Register::A), 7);
        assert_eq!(machine.registers.read(Register::B), 9);
        assert_eq!(machine.registers.sp(), machine.registers.sb());
    }

    #[test]
    fn branch_program() {
        let source = "
            mov rax, 3
            mov rbx, 3
            cmp rax, rbx
            jer 4        ; skip the next instruction
            mov rcx, 1
            mov rdx, 2
        ";
        let (machine, result) = run(source);
        assert_eq!(result, Ok(()));
        assert_eq!(machine.registers.read(Register::C), 0);
        assert_eq!(machine.registers.read(Register::D), 2);
    }

    #[test]
    fn guarded_write_program() {
        let (_, result) = run("mov 3, 1\nmov rax, 1");
        assert_eq!(result, Err(Fault::MemoryGuardViolation { address: 3, base: 8 }));
    }

    #[test]
    fn division_program() {
        let (machine, result) = run("mov rax, 5\nmov rbx, 0\ndiv rax, rbx");
        assert_eq!(result, Err(Fault::DivisionByZero));
        assert_eq!(machine.registers.read(Register::A), 5);
    }
}
