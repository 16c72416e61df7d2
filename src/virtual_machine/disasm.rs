//! Program disassembly.
//!
//! Renders one line per instruction:
//!
//! ```text
//!      0: IN   [9]
//!      2: EQ   [9], [10], [9]
//!      6: OUT  [9]
//!      8: HALT
//!      9: DATA -1
//! ```
//!
//! Operands print as `[a]` (position), `a` (immediate) or `rb+a` / `rb-a`
//! (relative). Words that do not decode as a whole instruction print as
//! `DATA`, so data tables interleaved with code do not derail the listing.
//! Disassembly is static: self-modifying code is shown as loaded.

use crate::virtual_machine::isa::Instruction;
use crate::virtual_machine::operand::{InstructionWord, ParameterMode};
use crate::virtual_machine::program::Program;

/// One disassembled line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub offset: usize,
    pub text: String,
}

/// Disassembles the whole program.
pub fn disassemble(program: &Program) -> Vec<Line> {
    let words = program.words();
    let mut lines = Vec::new();
    let mut offset = 0;

    while offset < words.len() {
        match decode_at(words, offset) {
            Some((instr, text)) => {
                lines.push(Line { offset, text });
                offset += instr.width();
            }
            None => {
                lines.push(Line {
                    offset,
                    text: format!("DATA {}", words[offset]),
                });
                offset += 1;
            }
        }
    }
    lines
}

/// Disassembles into a single printable listing.
pub fn listing(program: &Program) -> String {
    disassemble(program)
        .iter()
        .map(|line| format!("{:>6}: {}\n", line.offset, line.text))
        .collect()
}

/// Decodes the instruction at `offset` if its opcode, every mode digit and
/// every operand word are valid and present.
fn decode_at(words: &[i64], offset: usize) -> Option<(Instruction, String)> {
    let word = InstructionWord::split(words[offset]);
    let instr = Instruction::try_from(word.opcode).ok()?;
    let operands = words.get(offset + 1..offset + instr.width())?;

    let rendered = operands
        .iter()
        .enumerate()
        .map(|(i, &raw)| {
            let mode = word.mode(i, offset).ok()?;
            Some(render_operand(mode, raw))
        })
        .collect::<Option<Vec<_>>>()?;

    let text = if rendered.is_empty() {
        instr.mnemonic().to_string()
    } else {
        format!("{:<4} {}", instr.mnemonic(), rendered.join(", "))
    };
    Some((instr, text))
}

fn render_operand(mode: ParameterMode, raw: i64) -> String {
    match mode {
        ParameterMode::Position => format!("[{raw}]"),
        ParameterMode::Immediate => raw.to_string(),
        ParameterMode::Relative if raw < 0 => format!("rb-{}", raw.unsigned_abs()),
        ParameterMode::Relative => format!("rb+{raw}"),
    }
}
