#[cfg(target_os = "linux")]
use std::os::linux::fs::MetadataExt;

use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use thiserror::Error;

use bf2c::{
    byte_utils::excerpt,
    check_cell_type, execute,
    ir::{statements, Recording},
    settings::{Settings, DEFAULT_CELL_TYPE, DEFAULT_EXTEND_SIZE, DEFAULT_INIT_SIZE},
    tape::{GrowableTape, TapeError},
    translate, translate_to_c, ExecuteCallbackResult, ExecutionError, TranslateError,
};
use clap::{ArgAction, Parser, ValueEnum};

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Translation error: {0}")]
    TranslateError(#[from] TranslateError),
    #[error("Execution error: {0}")]
    ExecutionError(#[from] ExecutionError),
    #[error("Tape error: {0}")]
    TapeError(#[from] TapeError),
    #[error("Logger error: {0}")]
    LoggerError(#[from] log::SetLoggerError),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Mode {
    /// Generate C code for the program
    GenC,
    /// Interpret the program (with the same tape semantics as the C code,
    /// for char cell types only)
    Interpret,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input Brainfuck source file
    input_file: PathBuf,

    /// Output C file (standard output if omitted)
    output_file: Option<PathBuf>,

    /// Select program mode
    #[arg(short, long, value_name = "MODE")]
    mode: Option<Mode>,

    /// C type of a tape cell
    #[arg(short = 't', long, value_name = "TYPE", default_value = DEFAULT_CELL_TYPE)]
    cell_type: String,

    /// Copy non-instruction text into the output as comments
    #[arg(short, long, default_value_t = false)]
    comments: bool,

    /// Initial tape size, in cells
    #[arg(short, long, value_name = "CELLS", default_value_t = DEFAULT_INIT_SIZE)]
    init_size: u64,

    /// Number of cells to grow the tape by when it runs out
    #[arg(short, long, value_name = "CELLS", default_value_t = DEFAULT_EXTEND_SIZE)]
    extend_size: u64,

    /// Enable optimisation (merge runs of +- and <>)
    #[arg(short, long, default_value_t = false)]
    optimise: bool,

    /// More log output (repeat for even more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn settings(&self) -> Settings {
        Settings {
            cell_type: self.cell_type.clone(),
            comments: self.comments,
            init_size: self.init_size,
            extend_size: self.extend_size,
            coalesce: self.optimise,
        }
    }

    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn load_file(path: &Path) -> Result<Vec<u8>, io::Error> {
    let mut file = File::open(path)?;

    #[cfg(target_os = "linux")]
    let mut buf = Vec::with_capacity(file.metadata()?.st_size() as usize);
    #[cfg(not(target_os = "linux"))]
    let mut buf = Vec::new();

    file.read_to_end(&mut buf)?;
    Ok(buf)
}

fn gen_c(source: &[u8], settings: &Settings, output: Option<&Path>) -> Result<(), ProgramError> {
    let result = match output {
        Some(path) => {
            let file = BufWriter::new(File::create(path)?);
            let result = translate_to_c(source, file, settings).and_then(|(mut out, summary)| {
                out.flush()?;
                Ok(summary)
            });
            if result.is_err() {
                // Do not leave a half written program behind.
                if let Err(err) = std::fs::remove_file(path) {
                    error!("Failed to remove {path:?}: {err}");
                }
            }
            result
        }
        None => translate_to_c(source, io::stdout().lock(), settings).map(|(_, summary)| summary),
    };

    match result {
        Ok(summary) => {
            info!(
                "Translated {} bytes into {} statements ({} comment blocks, loop depth {})",
                summary.bytes, summary.statements, summary.comment_blocks, summary.max_depth
            );
            Ok(())
        }
        Err(err) => {
            if let TranslateError::TooManyEndLoop { position } = &err {
                error!("Near `{}`", excerpt(source, *position as usize, 8));
            }
            Err(err.into())
        }
    }
}

fn interpret(source: &[u8], settings: &Settings) -> Result<(), ProgramError> {
    check_cell_type(settings)?;
    let (events, summary) = translate(source, Recording::new(), settings)?;
    info!("Executing {} statements", summary.statements);
    let code = statements(&events);
    let mut tape = GrowableTape::new(settings.init_size, settings.extend_size)?;
    execute(
        &code,
        &mut tape,
        &mut io::stdin().lock(),
        &mut io::stdout().lock(),
        &mut |_, _| ExecuteCallbackResult::Continue,
    )?;
    info!("Final tape size {} cells", tape.len());
    Ok(())
}

fn main() -> Result<(), ProgramError> {
    let args = Args::parse();

    TermLogger::init(
        args.log_level(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let source = load_file(&args.input_file)?;
    let settings = args.settings();

    match args.mode.unwrap_or(Mode::GenC) {
        Mode::GenC => gen_c(&source, &settings, args.output_file.as_deref()),
        Mode::Interpret => interpret(&source, &settings),
    }
}
