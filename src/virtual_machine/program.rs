//! Program text parsing.
//!
//! A program is a single line of comma-separated signed base-10 integers,
//! optionally followed by a newline:
//!
//! ```text
//! 3,9,8,9,10,9,4,9,99,-1,8
//! ```
//!
//! The parsed [`Program`] is the immutable initial memory image; every
//! [`VM`](super::vm::VM) built from it gets its own copy.

use crate::virtual_machine::errors::VMError;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Initial memory image of a machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    words: Vec<i64>,
}

impl Program {
    /// Wraps raw words. Returns [`VMError::EmptyProgram`] if `words` is empty.
    pub fn new(words: Vec<i64>) -> Result<Self, VMError> {
        if words.is_empty() {
            return Err(VMError::EmptyProgram);
        }
        Ok(Self { words })
    }

    /// Reads and parses a program file.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, VMError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| VMError::IoError {
            reason: format!("{}: {}", path.display(), e),
        })?;
        text.parse()
    }

    pub fn words(&self) -> &[i64] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl FromStr for Program {
    type Err = VMError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.is_empty() {
            return Err(VMError::EmptyProgram);
        }

        let words = text
            .split(',')
            .enumerate()
            .map(|(index, token)| {
                let token = token.trim();
                token.parse::<i64>().map_err(|_| VMError::ParseError {
                    token: token.to_string(),
                    index,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(words)
    }
}

/// Renders the program back to its comma-separated text form.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{word}")?;
        }
        Ok(())
    }
}
