// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::machine::fault::Fault;
use crate::machine::Word;

/// The four arithmetic operations supported by the instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
}

/// Applies an arithmetic operation to two words. Addition, subtraction and
/// multiplication wrap modulo 256; division by zero is a fault.
#[inline(always)]
pub fn apply(op: Operation, lhs: Word, rhs: Word) -> Result<Word, Fault> {
    match op {
        Operation::Add => Ok(lhs.wrapping_add(rhs)),
        Operation::Sub => Ok(lhs.wrapping_sub(rhs)),
        Operation::Mul => Ok(lhs.wrapping_mul(rhs)),
        Operation::Div => lhs.checked_div(rhs).ok_or(Fault::DivisionByZero),
    }
}

/// Moves an address back by a relative displacement. The instruction pointer
/// counts downwards, so a relative jump subtracts its offset; an offset larger
/// than the address wraps around the top of memory (which is how backwards
/// jumps are expressed).
#[inline(always)]
pub fn sub_relative(base_addr: Word, displacement: Word) -> Word {
    base_addr.wrapping_sub(displacement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_wraps() {
        assert_eq!(apply(Operation::Add, 250, 10), Ok(4));
        assert_eq!(apply(Operation::Sub, 3, 5), Ok(254));
        assert_eq!(apply(Operation::Mul, 16, 17), Ok(16));
    }

    #[test]
    fn division_truncates() {
        assert_eq!(apply(Operation::Div, 7, 2), Ok(3));
    }

    #[test]
    fn division_by_zero_faults() {
        assert_eq!(apply(Operation::Div, 5, 0), Err(Fault::DivisionByZero));
    }

    #[test]
    fn relative_displacement_wraps() {
        assert_eq!(sub_relative(11, 8), 3);
        assert_eq!(sub_relative(3, 252), 7);
    }
}
