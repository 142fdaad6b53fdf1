// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::machine::Word;

/// Addresses and data share the same width, so memory is exactly as large as
/// one word can address and every address is in range.
pub const MEMORY_SIZE: usize = Word::MAX as usize + 1;

/// Flat, zero-initialized memory. Access here is unchecked; the code/stack
/// guard is applied by the machine, which knows where the stack base is.
pub struct Memory {
    cells: [Word; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Memory {
        Memory { cells: [0; MEMORY_SIZE] }
    }

    #[inline(always)]
    pub fn read_u8(&self, addr: Word) -> Word {
        self.cells[addr as usize]
    }

    #[inline(always)]
    pub fn write_u8(&mut self, addr: Word, val: Word) {
        self.cells[addr as usize] = val;
    }

    /// Returns the cells in `start..end`, or an empty slice if the range is
    /// inverted.
    pub fn slice(&self, start: Word, end: Word) -> &[Word] {
        if start > end {
            return &[];
        }
        &self.cells[start as usize..end as usize]
    }

    /// Dumps the contents of a slice starting at a given address, wrapping
    /// around the top of memory.
    pub fn memdump(&mut self, addr: Word, buf: &[Word]) {
        for (i, val) in buf.iter().enumerate() {
            self.write_u8(addr.wrapping_add(i as Word), *val);
        }
    }
}
