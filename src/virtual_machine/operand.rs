//! Parameter modes and instruction-word decoding.
//!
//! An instruction word packs the opcode in its two low decimal digits and one
//! mode digit per operand above them, least significant first:
//!
//! ```text
//!   1002  ->  opcode 02, modes [Position, Immediate, Position]
//!  21101  ->  opcode 01, modes [Immediate, Immediate, Relative]
//! ```
//!
//! Missing leading digits mean [`ParameterMode::Position`].

use crate::virtual_machine::errors::VMError;

/// How an operand's raw word maps to a value or a write target.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterMode {
    /// Raw word is an address.
    Position = 0,
    /// Raw word is the value itself. Illegal for writes.
    Immediate = 1,
    /// Raw word is an offset from the relative base.
    Relative = 2,
}

impl TryFrom<i64> for ParameterMode {
    type Error = VMError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Position),
            1 => Ok(Self::Immediate),
            2 => Ok(Self::Relative),
            _ => Err(VMError::InvalidMode {
                mode: value,
                operand: 0,
                offset: 0,
            }),
        }
    }
}

/// Whether an operand is read from or written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandKind {
    Read,
    Write,
}

/// An instruction word split into opcode and mode digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstructionWord {
    /// `word mod 100`.
    pub opcode: i64,
    /// `word div 100`, one decimal digit per operand.
    pub modes: i64,
}

impl InstructionWord {
    pub const fn split(word: i64) -> Self {
        Self {
            opcode: word % 100,
            modes: word / 100,
        }
    }

    /// Raw mode digit of operand `operand` (0-based).
    pub fn mode_digit(&self, operand: usize) -> i64 {
        let mut modes = self.modes;
        for _ in 0..operand {
            if modes == 0 {
                return 0;
            }
            modes /= 10;
        }
        modes % 10
    }

    /// Decoded mode of operand `operand`, with the fault reporting
    /// `operand` and the instruction's `offset`.
    pub fn mode(&self, operand: usize, offset: usize) -> Result<ParameterMode, VMError> {
        let digit = self.mode_digit(operand);
        ParameterMode::try_from(digit).map_err(|_| VMError::InvalidMode {
            mode: digit,
            operand,
            offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_mode_try_from_valid() {
        assert_eq!(ParameterMode::try_from(0).unwrap(), ParameterMode::Position);
        assert_eq!(ParameterMode::try_from(1).unwrap(), ParameterMode::Immediate);
        assert_eq!(ParameterMode::try_from(2).unwrap(), ParameterMode::Relative);
    }

    #[test]
    fn parameter_mode_try_from_invalid() {
        for digit in 3..=9 {
            let err = ParameterMode::try_from(digit).unwrap_err();
            assert!(matches!(err, VMError::InvalidMode { mode, .. } if mode == digit));
        }
    }

    #[test]
    fn split_word() {
        let word = InstructionWord::split(1002);
        assert_eq!(word.opcode, 2);
        assert_eq!(word.modes, 10);

        let word = InstructionWord::split(99);
        assert_eq!(word.opcode, 99);
        assert_eq!(word.modes, 0);
    }

    #[test]
    fn modes_read_least_significant_first() {
        let word = InstructionWord::split(21101);
        assert_eq!(word.mode(0, 0).unwrap(), ParameterMode::Immediate);
        assert_eq!(word.mode(1, 0).unwrap(), ParameterMode::Immediate);
        assert_eq!(word.mode(2, 0).unwrap(), ParameterMode::Relative);
    }

    #[test]
    fn missing_digits_default_to_position() {
        let word = InstructionWord::split(104);
        assert_eq!(word.mode(0, 0).unwrap(), ParameterMode::Immediate);
        assert_eq!(word.mode(1, 0).unwrap(), ParameterMode::Position);
        assert_eq!(word.mode(7, 0).unwrap(), ParameterMode::Position);
    }

    #[test]
    fn invalid_digit_reports_operand_and_offset() {
        let word = InstructionWord::split(3001);
        assert_eq!(
            word.mode(1, 12).unwrap_err(),
            VMError::InvalidMode {
                mode: 3,
                operand: 1,
                offset: 12,
            }
        );
    }
}
