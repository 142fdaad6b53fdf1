// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::mem;

enum ParseState {
    ScanningForArguments,
    ScanningArgument,
    ScanningQuotedArgument,
}

/// Returns true if the character passed is a whitespace character. Both spaces
/// and tabs are considered whitespace characters.
fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Returns true if the character passed is a quote.
fn is_quote(c: char) -> bool {
    c == '"'
}

fn is_escape(c: char) -> bool {
    c == '\\'
}

/// Parses raw debugger input into a list of separate arguments. Arguments are
/// separated by whitespace and can be quoted. Inside of quotes a backslash
/// escapes the next character.
pub fn parse_raw_input(input: &str) -> Result<Vec<String>, &'static str> {
    let mut state = ParseState::ScanningForArguments;
    let mut args: Vec<String> = Vec::new();
    let mut arg = String::new();
    let mut escaped = false;

    for c in input.chars() {
        match state {
            ParseState::ScanningForArguments => {
                // The first non-whitespace character decides what kind of
                // argument follows.
                if is_quote(c) {
                    state = ParseState::ScanningQuotedArgument;
                } else if !is_whitespace(c) {
                    arg.push(c);
                    state = ParseState::ScanningArgument;
                }
            },
            ParseState::ScanningArgument => {
                if is_whitespace(c) {
                    args.push(mem::take(&mut arg));
                    state = ParseState::ScanningForArguments;
                } else {
                    arg.push(c);
                }
            },
            ParseState::ScanningQuotedArgument => {
                if escaped {
                    arg.push(c);
                    escaped = false;
                } else if is_escape(c) {
                    escaped = true;
                } else if is_quote(c) {
                    args.push(mem::take(&mut arg));
                    state = ParseState::ScanningForArguments;
                } else {
                    arg.push(c);
                }
            },
        }
    }

    match state {
        ParseState::ScanningForArguments => {},
        ParseState::ScanningArgument => args.push(arg),
        ParseState::ScanningQuotedArgument => return Err("quoted arg does not close"),
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(parse_raw_input("  mem 0x10\t8 ").unwrap(), vec!["mem", "0x10", "8"]);
    }

    #[test]
    fn keeps_quoted_arguments_together() {
        assert_eq!(parse_raw_input(r#"dump "a b" c"#).unwrap(), vec!["dump", "a b", "c"]);
        assert_eq!(parse_raw_input(r#""""#).unwrap(), vec![""]);
    }

    #[test]
    fn escapes_inside_quotes() {
        assert_eq!(parse_raw_input(r#""say \"hi\"""#).unwrap(), vec![r#"say "hi""#]);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        assert!(parse_raw_input(r#"dump "oops"#).is_err());
    }

    #[test]
    fn empty_input_has_no_arguments() {
        assert!(parse_raw_input("   ").unwrap().is_empty());
    }
}
