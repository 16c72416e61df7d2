//! Instruction Set Architecture (ISA) definitions.
//!
//! The [`for_each_instruction!`](crate::for_each_instruction) macro holds the
//! canonical instruction table and invokes a callback macro with it, so the
//! enum, the decoder, the disassembler and the ISA fingerprint test are all
//! generated from one list.
//!
//! This module generates:
//! - The [`Instruction`] enum with opcode mappings
//! - `TryFrom<i64>` for decoding opcodes
//! - Per-instruction mnemonic, operand kinds, width and step category
//!
//! # Instruction Format
//!
//! Every instruction is one instruction word followed by one word per
//! operand. See [`operand`](super::operand) for the mode digits.

use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::operand::OperandKind;
use crate::virtual_machine::vm::StepCategory;

/// Invokes a callback macro with the complete instruction definition list.
#[macro_export]
macro_rules! for_each_instruction {
    ($callback:ident) => {
        $callback! {
            /// ADD a, b, dst ; dst = a + b
            Add = 1, "ADD" => [a: Read, b: Read, dst: Write], Arithmetic,
            /// MUL a, b, dst ; dst = a * b
            Multiply = 2, "MUL" => [a: Read, b: Read, dst: Write], Arithmetic,
            /// IN dst ; dst = next queued input, suspends when the queue is empty
            Input = 3, "IN" => [dst: Write], Io,
            /// OUT a ; append a to the output queue
            Output = 4, "OUT" => [a: Read], Io,
            /// JNZ cond, target ; if cond != 0 then IP = target
            JumpIfTrue = 5, "JNZ" => [cond: Read, target: Read], Jump,
            /// JZ cond, target ; if cond == 0 then IP = target
            JumpIfFalse = 6, "JZ" => [cond: Read, target: Read], Jump,
            /// LT a, b, dst ; dst = (a < b)
            LessThan = 7, "LT" => [a: Read, b: Read, dst: Write], Compare,
            /// EQ a, b, dst ; dst = (a == b)
            Equals = 8, "EQ" => [a: Read, b: Read, dst: Write], Compare,
            /// ARB a ; relative base += a
            AdjustBase = 9, "ARB" => [a: Read], Base,
            /// HALT ; stop the machine for good
            Halt = 99, "HALT" => [], Control,
        }
    };
}

#[macro_export]
macro_rules! define_instructions {
    (
        $(
            $(#[$doc:meta])*
            $name:ident = $opcode:literal, $mnemonic:literal => [
                $( $field:ident : $kind:ident ),* $(,)?
            ], $category:ident
        ),* $(,)?
    ) => {
        #[repr(u8)]
        #[derive(Copy, Clone, Debug, Eq, PartialEq)]
        pub enum Instruction {
            $(
                $(#[$doc])*
                $name = $opcode,
            )*
        }

        impl TryFrom<i64> for Instruction {
            type Error = VMError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                match value {
                    $( $opcode => Ok(Instruction::$name), )*
                    _ => Err(VMError::InvalidInstruction {
                        opcode: value,
                        offset: 0,
                    }),
                }
            }
        }

        impl Instruction {
            /// Returns the assembly mnemonic for this instruction.
            pub const fn mnemonic(&self) -> &'static str {
                match self {
                    $( Instruction::$name => $mnemonic, )*
                }
            }

            /// Returns the kind of each operand, in encoding order.
            pub const fn operand_kinds(&self) -> &'static [OperandKind] {
                match self {
                    $( Instruction::$name => &[$( OperandKind::$kind ),*], )*
                }
            }

            /// Returns the accounting category of this instruction.
            pub const fn category(&self) -> StepCategory {
                match self {
                    $( Instruction::$name => StepCategory::$category, )*
                }
            }
        }
    };
}

for_each_instruction!(define_instructions);

impl Instruction {
    /// Number of operands.
    pub const fn arity(&self) -> usize {
        self.operand_kinds().len()
    }

    /// Number of words occupied, instruction word included.
    pub const fn width(&self) -> usize {
        self.arity() + 1
    }
}
