//! Run coalescing: merging adjacent `+`/`-` and `<`/`>` instructions.

use log::debug;

use crate::{ir::Statement, lexer::RunClass};

/// A run that has not been emitted yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRun {
    pub class: RunClass,
    /// Signed sum of the steps seen so far
    pub magnitude: i64,
}

impl PendingRun {
    fn into_statement(self) -> Statement {
        if self.magnitude == 0 {
            debug!("Run of {:?} cancels out, emitting a no-op", self.class);
        }
        Statement::run(self.class, self.magnitude)
    }
}

/// Holds at most one pending run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Coalescer {
    pending: Option<PendingRun>,
}

impl Coalescer {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// The run currently being accumulated.
    pub fn pending(&self) -> Option<PendingRun> {
        self.pending
    }

    /// Add one step of the given class.
    ///
    /// Returns the previous run if it was of a different class: it must be
    /// emitted before anything that follows.
    pub fn push(&mut self, class: RunClass, step: i64) -> Option<Statement> {
        match self.pending {
            Some(ref mut run) if run.class == class => {
                run.magnitude += step;
                None
            }
            _ => {
                let flushed = self.flush();
                self.pending = Some(PendingRun {
                    class,
                    magnitude: step,
                });
                flushed
            }
        }
    }

    /// Take the pending run, if any.
    pub fn flush(&mut self) -> Option<Statement> {
        self.pending.take().map(PendingRun::into_statement)
    }
}
