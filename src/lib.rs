//! # bf2c - A streaming Brainfuck to C translator
//!
//! The translator reads a Brainfuck source once, byte by byte, and writes a
//! C program with the same behaviour. The generated program keeps its tape
//! in a heap buffer that grows on demand in both directions.
//!
//! **NOTE! This is primarily a command line program. The library API is
//! not stable.**

// Re-export some symbols.
pub use codegen::CWriter;
pub use interpreter::check_cell_type;
pub use interpreter::execute;
pub use interpreter::ExecuteCallbackResult;
pub use interpreter::ExecutionError;
pub use translator::generate_c;
pub use translator::translate;
pub use translator::translate_to_c;
pub use translator::Summary;
pub use translator::TranslateError;
pub use translator::Translator;
pub use types::BfNum;

#[doc(hidden)]
pub mod byte_utils;
pub mod coalesce;
pub mod codegen;
mod interpreter;
pub mod ir;
pub mod lexer;
pub mod settings;
pub mod tape;
#[doc(hidden)]
pub mod test_utils;
mod translator;
pub mod types;
