use std::io::Read;
use std::io::Write;

use thiserror::Error;

use crate::ir::Statement;
use crate::settings::Settings;
use crate::tape::{GrowableTape, TapeError};

/// Error type for execution
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Tape error (allocation failure in the generated program).
    #[error("Tape error: {0}")]
    TapeError(#[from] TapeError),
    /// Io error during program execution.
    #[error("Unexpected IO Error: {0}")]
    IoError(#[from] std::io::Error),
    /// Loop statements do not pair up.
    #[error("Unbalanced loop at statement {0}")]
    UnbalancedLoop(usize),
    /// Aborted by callback
    #[error("Callback aborted execution")]
    Aborted,
    /// Cells wider than 8 bits are only supported in generated C.
    #[error("Cannot interpret with cell type {0:?}, only char types are supported")]
    UnsupportedCellType(String),
}

impl PartialEq for ExecutionError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::IoError(l0), Self::IoError(r0)) => l0.kind() == r0.kind(),
            (Self::TapeError(l0), Self::TapeError(r0)) => l0 == r0,
            (Self::UnbalancedLoop(l0), Self::UnbalancedLoop(r0)) => l0 == r0,
            (Self::UnsupportedCellType(l0), Self::UnsupportedCellType(r0)) => l0 == r0,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

/// Reply type for callback
pub enum ExecuteCallbackResult {
    /// Continue execution
    Continue,
    /// Abort execution
    Abort,
}

/// Value `getchar()` leaves in a `char` cell at end of input (`EOF`, -1).
const EOF_CELL: u8 = 0xff;

/// Check that the generated program with these settings has the cells
/// [`execute`] models.
pub fn check_cell_type(settings: &Settings) -> Result<(), ExecutionError> {
    if settings.has_byte_cells() {
        Ok(())
    } else {
        Err(ExecutionError::UnsupportedCellType(settings.cell_type.clone()))
    }
}

/// Pair up loop statements: for each `BeginLoop` the index of its
/// `EndLoop` and vice versa.
fn match_loops(code: &[Statement]) -> Result<Vec<usize>, ExecutionError> {
    let mut jumps = vec![0; code.len()];
    let mut open = vec![];
    for (idx, stmt) in code.iter().enumerate() {
        match stmt {
            Statement::BeginLoop => open.push(idx),
            Statement::EndLoop => {
                let start = open.pop().ok_or(ExecutionError::UnbalancedLoop(idx))?;
                jumps[start] = idx;
                jumps[idx] = start;
            }
            _ => (),
        }
    }
    match open.pop() {
        Some(idx) => Err(ExecutionError::UnbalancedLoop(idx)),
        None => Ok(jumps),
    }
}

/// Execute a statement stream the way the generated C program would.
///
/// Cells are 8 bit, see [`check_cell_type`]. At end of input the current cell is set to what
/// `getchar()` returns stored into a `char` (-1, i.e. 255).
pub fn execute<F>(
    code: &[Statement],
    tape: &mut GrowableTape,
    input: &mut impl Read,
    output: &mut impl Write,
    callback: &mut F,
) -> Result<(), ExecutionError>
where
    F: FnMut(&Statement, &GrowableTape) -> ExecuteCallbackResult,
{
    let jumps = match_loops(code)?;
    let mut pc = 0;
    while let Some(stmt) = code.get(pc) {
        match callback(stmt, tape) {
            ExecuteCallbackResult::Continue => (),
            ExecuteCallbackResult::Abort => return Err(ExecutionError::Aborted),
        }
        match *stmt {
            Statement::Add(n) => tape.modify(n),
            Statement::Move(n) => tape.move_by(n)?,
            Statement::Output => {
                output.write_all(&[u8::from(tape.get())])?;
            }
            Statement::Input => {
                let mut tmp: [u8; 1] = [0; 1];
                // We may need to flush output here if there wasn't a newline.
                output.flush()?;
                let n_bytes = input.read(&mut tmp)?;
                if n_bytes == 0 {
                    tape.set(EOF_CELL.into());
                } else {
                    tape.set(tmp[0].into());
                }
            }
            Statement::BeginLoop => {
                if tape.get().is_zero() {
                    pc = jumps[pc];
                }
            }
            Statement::EndLoop => {
                if !tape.get().is_zero() {
                    pc = jumps[pc];
                }
            }
        }
        pc += 1;
    }
    output.flush()?;
    Ok(())
}
