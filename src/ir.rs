//! Structured emission records.
//!
//! The translator never formats text itself. It produces a stream of
//! [`Event`]s, each tagged with the loop depth it happened at, and hands
//! them to a [`Backend`]. The C code generator is one backend, a plain
//! `Vec` recorder is another (used by the interpreter and the tests).

use std::io;

use crate::lexer::{Instruction, RunClass};

/// One emitted statement
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Statement {
    /// Add a signed amount to the current cell (fused `+`/`-`)
    Add(i64),
    /// Move the pointer by a signed amount (fused `>`/`<`), growing the
    /// tape as needed
    Move(i64),
    /// Write the current cell
    Output,
    /// Read one byte into the current cell
    Input,
    /// `while (cell) {`
    BeginLoop,
    /// `}`
    EndLoop,
}

impl Statement {
    /// A statement for an accumulated run.
    pub fn run(class: RunClass, magnitude: i64) -> Self {
        match class {
            RunClass::Arithmetic => Statement::Add(magnitude),
            RunClass::Movement => Statement::Move(magnitude),
        }
    }

    /// A statement for a single instruction.
    pub fn single(instr: Instruction) -> Self {
        match instr {
            Instruction::Add => Statement::Add(1),
            Instruction::Subtract => Statement::Add(-1),
            Instruction::Right => Statement::Move(1),
            Instruction::Left => Statement::Move(-1),
            Instruction::Output => Statement::Output,
            Instruction::Input => Statement::Input,
            Instruction::BeginLoop => Statement::BeginLoop,
            Instruction::EndLoop => Statement::EndLoop,
        }
    }
}

/// Everything the translator can emit
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Event {
    /// Runtime scaffolding, once, before anything else
    Preamble,
    Statement(Statement),
    /// Start of a comment block (opens the first comment line)
    CommentStart,
    /// One byte of comment text, verbatim
    CommentByte(u8),
    /// A newline inside a comment block (the next line is a comment too)
    CommentBreak,
    /// End of a comment block
    CommentEnd,
    /// Runtime teardown, once, after everything else
    Postamble,
}

/// Consumer of emission events.
pub trait Backend {
    /// Emit one event at the given loop depth.
    fn emit(&mut self, depth: usize, event: Event) -> io::Result<()>;
}

/// A recorded event stream: `(depth, event)` pairs in emission order.
pub type Recording = Vec<(usize, Event)>;

/// Records events for later inspection or execution.
impl Backend for Recording {
    fn emit(&mut self, depth: usize, event: Event) -> io::Result<()> {
        self.push((depth, event));
        Ok(())
    }
}

/// Extract the executable statements from a recorded event stream.
pub fn statements(events: &[(usize, Event)]) -> Vec<Statement> {
    events
        .iter()
        .filter_map(|(_, e)| match e {
            Event::Statement(s) => Some(*s),
            _ => None,
        })
        .collect()
}
