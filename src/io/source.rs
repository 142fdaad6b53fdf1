// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::asm::assembler::{self, AsmError};
use crate::machine::instruction::Instruction;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read program: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Asm(#[from] AsmError),
}

/// Reads a text file at a given path into a string.
pub fn read_source<P: AsRef<Path>>(path: P) -> Result<String, io::Error> {
    let mut buffer = String::new();
    let mut file = File::open(path)?;
    file.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Reads and assembles the program at a given path.
pub fn load_program<P: AsRef<Path>>(path: P) -> Result<Vec<Instruction>, LoadError> {
    let source = read_source(path)?;
    Ok(assembler::assemble(&source)?)
}
