// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::{DateTime, Local};
use crate::machine::machine::RuntimeOptions;

/// Prints a timestamped line to stdout when the verbose flag is set. The
/// machine logs under `load` once a program is placed in memory and under `cpu`
/// for every executed instruction (its address, raw bytes and disassembly).
pub fn log<P, T>(prefix: P, text: T, runtime_options: &RuntimeOptions) where P: Into<String>, T: Into<String> {
    if runtime_options.verbose {
        let local: DateTime<Local> = Local::now();
        println!("[{}] -- [{}] {}", local, prefix.into(), text.into());
    }
}
