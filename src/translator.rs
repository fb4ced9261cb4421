//! The single pass translation driver.

use std::io::{self, BufReader, Read, Write};

use log::{debug, trace};
use thiserror::Error;

use crate::{
    codegen::CWriter,
    coalesce::Coalescer,
    ir::{Backend, Event, Statement},
    lexer::{classify, is_comment_whitespace, Instruction, Token},
    settings::{Settings, SettingsError},
};

/// Errors during translation
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Reading the source or writing the output failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// The settings cannot produce a valid program.
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),
    /// A `]` without a matching `[`.
    #[error("Malformed program: unbalanced loop, `]` at byte {position} has no matching `[`")]
    TooManyEndLoop { position: u64 },
    /// Source ended inside a loop.
    #[error("Malformed program: unbalanced loop, {open} `[` never closed")]
    TooManyStartLoop { open: usize },
}

impl PartialEq for TranslateError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Io(l0), Self::Io(r0)) => l0.kind() == r0.kind(),
            (Self::Settings(l0), Self::Settings(r0)) => l0 == r0,
            (Self::TooManyEndLoop { position: l0 }, Self::TooManyEndLoop { position: r0 }) => {
                l0 == r0
            }
            (Self::TooManyStartLoop { open: l0 }, Self::TooManyStartLoop { open: r0 }) => l0 == r0,
            _ => false,
        }
    }
}

/// Mutable state threaded through the translation of one source.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TranslationState {
    /// Current loop nesting depth
    pub depth: usize,
    /// A comment block is open
    pub comment_open: bool,
    /// Pending run (only used when coalescing)
    pub run: Coalescer,
    /// Offset of the byte being processed
    pub position: u64,
}

/// Counters reported after a translation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Bytes consumed
    pub bytes: u64,
    /// Statements emitted
    pub statements: u64,
    /// Comment blocks emitted
    pub comment_blocks: u64,
    /// Deepest loop nesting seen
    pub max_depth: usize,
}

/// Streaming translator. Feed it bytes, then call [`Translator::finish`].
pub struct Translator<'s, B: Backend> {
    settings: &'s Settings,
    backend: B,
    state: TranslationState,
    summary: Summary,
}

impl<'s, B: Backend> Translator<'s, B> {
    /// Validate the settings and emit the preamble.
    pub fn new(settings: &'s Settings, mut backend: B) -> Result<Self, TranslateError> {
        settings.validate()?;
        debug!("Translating with {settings:?}");
        backend.emit(0, Event::Preamble)?;
        Ok(Self {
            settings,
            backend,
            state: TranslationState::default(),
            summary: Summary::default(),
        })
    }

    /// Current state, mostly of interest to tests.
    pub fn state(&self) -> &TranslationState {
        &self.state
    }

    /// Process one source byte.
    pub fn feed(&mut self, c: u8) -> Result<(), TranslateError> {
        match classify(c) {
            Token::Instruction(instr) => {
                self.close_comment()?;
                self.instruction(instr)?;
            }
            Token::Other(c) if self.settings.comments => self.comment(c)?,
            Token::Other(_) => (),
        }
        self.state.position += 1;
        Ok(())
    }

    /// Flush pending output, emit the postamble and give back the backend.
    pub fn finish(mut self) -> Result<(B, Summary), TranslateError> {
        self.flush_run()?;
        self.close_comment()?;
        if self.state.depth != 0 {
            return Err(TranslateError::TooManyStartLoop {
                open: self.state.depth,
            });
        }
        self.backend.emit(0, Event::Postamble)?;
        self.summary.bytes = self.state.position;
        debug!("Translation done: {:?}", self.summary);
        Ok((self.backend, self.summary))
    }

    fn instruction(&mut self, instr: Instruction) -> Result<(), TranslateError> {
        if let Some((class, step)) = instr.run_step() {
            if !self.settings.coalesce {
                return self.statement(Statement::single(instr));
            }
            if let Some(stmt) = self.state.run.push(class, step) {
                self.statement(stmt)?;
            }
            return Ok(());
        }

        self.flush_run()?;
        match instr {
            Instruction::BeginLoop => {
                self.statement(Statement::BeginLoop)?;
                self.state.depth += 1;
                self.summary.max_depth = self.summary.max_depth.max(self.state.depth);
                Ok(())
            }
            Instruction::EndLoop => {
                self.state.depth = self.state.depth.checked_sub(1).ok_or(
                    TranslateError::TooManyEndLoop {
                        position: self.state.position,
                    },
                )?;
                self.statement(Statement::EndLoop)
            }
            other => self.statement(Statement::single(other)),
        }
    }

    fn comment(&mut self, c: u8) -> Result<(), TranslateError> {
        if is_comment_whitespace(c) {
            if !self.state.comment_open {
                return Ok(());
            }
            if c == b'\n' {
                return self.emit(Event::CommentBreak);
            }
            return self.emit(Event::CommentByte(c));
        }
        if !self.state.comment_open {
            self.flush_run()?;
            self.state.comment_open = true;
            self.summary.comment_blocks += 1;
            self.emit(Event::CommentStart)?;
        }
        self.emit(Event::CommentByte(c))
    }

    fn close_comment(&mut self) -> Result<(), TranslateError> {
        if self.state.comment_open {
            self.state.comment_open = false;
            self.emit(Event::CommentEnd)?;
        }
        Ok(())
    }

    fn flush_run(&mut self) -> Result<(), TranslateError> {
        match self.state.run.flush() {
            Some(stmt) => self.statement(stmt),
            None => Ok(()),
        }
    }

    fn statement(&mut self, stmt: Statement) -> Result<(), TranslateError> {
        trace!("{}: {stmt:?} at depth {}", self.state.position, self.state.depth);
        self.summary.statements += 1;
        self.emit(Event::Statement(stmt))
    }

    fn emit(&mut self, event: Event) -> Result<(), TranslateError> {
        Ok(self.backend.emit(self.state.depth, event)?)
    }
}

/// Translate a byte stream into events for the given backend.
pub fn translate<B: Backend>(
    input: impl Read,
    backend: B,
    settings: &Settings,
) -> Result<(B, Summary), TranslateError> {
    let mut translator = Translator::new(settings, backend)?;
    for c in BufReader::new(input).bytes() {
        translator.feed(c?)?;
    }
    translator.finish()
}

/// Translate a byte stream to C source written to `output`.
pub fn translate_to_c<W: Write>(
    input: impl Read,
    output: W,
    settings: &Settings,
) -> Result<(W, Summary), TranslateError> {
    let (writer, summary) = translate(input, CWriter::new(output, settings), settings)?;
    Ok((writer.into_inner(), summary))
}

/// Generate C code for an in-memory source.
///
/// The result is bytes, not a `String`: comments are copied verbatim and
/// Brainfuck sources need not be UTF-8.
pub fn generate_c(source: &[u8], settings: &Settings) -> Result<Vec<u8>, TranslateError> {
    let (out, _) = translate_to_c(source, Vec::new(), settings)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{generate_c, translate, TranslateError, Translator};
    use crate::{
        codegen::{generate_postamble, generate_preamble},
        ir::{Event, Recording, Statement},
        settings::{Settings, SettingsError},
    };

    fn events(src: &[u8], settings: &Settings) -> Recording {
        let (ev, _) = translate(src, Recording::new(), settings).unwrap();
        // Drop preamble and postamble
        ev[1..ev.len() - 1].to_vec()
    }

    fn coalescing() -> Settings {
        Settings {
            coalesce: true,
            ..Default::default()
        }
    }

    fn with_comments() -> Settings {
        Settings {
            comments: true,
            ..Default::default()
        }
    }

    fn body(src: &[u8], settings: &Settings) -> String {
        let out = String::from_utf8(generate_c(src, settings).unwrap()).unwrap();
        let pre = generate_preamble(settings);
        let post = generate_postamble();
        assert!(out.starts_with(&pre));
        assert!(out.ends_with(&post));
        out[pre.len()..out.len() - post.len()].to_string()
    }

    #[test]
    fn test_run_accumulation() {
        assert_eq!(
            events(b"+++", &coalescing()),
            vec![(0, Event::Statement(Statement::Add(3)))]
        );
        assert_eq!(
            events(b"+-+", &coalescing()),
            vec![(0, Event::Statement(Statement::Add(1)))]
        );
        assert_eq!(
            events(b"<<>+", &coalescing()),
            vec![
                (0, Event::Statement(Statement::Move(-1))),
                (0, Event::Statement(Statement::Add(1))),
            ]
        );
        assert_eq!(
            events(b"+-", &coalescing()),
            vec![(0, Event::Statement(Statement::Add(0)))]
        );
    }

    #[test]
    fn test_no_coalescing() {
        assert_eq!(
            events(b"++<", &Settings::default()),
            vec![
                (0, Event::Statement(Statement::Add(1))),
                (0, Event::Statement(Statement::Add(1))),
                (0, Event::Statement(Statement::Move(-1))),
            ]
        );
    }

    #[test]
    fn test_flush_before_io_and_loops() {
        assert_eq!(
            events(b"++.>>[-]", &coalescing()),
            vec![
                (0, Event::Statement(Statement::Add(2))),
                (0, Event::Statement(Statement::Output)),
                (0, Event::Statement(Statement::Move(2))),
                (0, Event::Statement(Statement::BeginLoop)),
                (1, Event::Statement(Statement::Add(-1))),
                (0, Event::Statement(Statement::EndLoop)),
            ]
        );
    }

    #[test]
    fn test_loop_nesting() {
        assert_eq!(
            events(b"[[.]]", &Settings::default()),
            vec![
                (0, Event::Statement(Statement::BeginLoop)),
                (1, Event::Statement(Statement::BeginLoop)),
                (2, Event::Statement(Statement::Output)),
                (1, Event::Statement(Statement::EndLoop)),
                (0, Event::Statement(Statement::EndLoop)),
            ]
        );
        assert_eq!(
            body(b"[[.]]", &Settings::default()),
            "\twhile (*(mem + ptr)) {\n\t\twhile (*(mem + ptr)) {\n\t\t\tputchar(*(mem + ptr));\n\t\t}\n\t}\n"
        );
    }

    #[test]
    fn test_unbalanced() {
        let settings = Settings::default();
        assert_eq!(
            translate(&b"+]"[..], Recording::new(), &settings).unwrap_err(),
            TranslateError::TooManyEndLoop { position: 1 }
        );
        assert_eq!(
            translate(&b"[[]"[..], Recording::new(), &settings).unwrap_err(),
            TranslateError::TooManyStartLoop { open: 1 }
        );
    }

    #[test]
    fn test_invalid_settings() {
        let settings = Settings {
            extend_size: 0,
            ..Default::default()
        };
        assert_eq!(
            generate_c(b"+", &settings).unwrap_err(),
            TranslateError::Settings(SettingsError::ZeroExtendSize)
        );
    }

    #[test]
    fn test_comment_passthrough() {
        assert_eq!(
            body(b"hi+", &with_comments()),
            "\t// hi\n\t*(mem + ptr) += 1;\n"
        );
        assert_eq!(body(b"hi+", &Settings::default()), "\t*(mem + ptr) += 1;\n");
    }

    #[test]
    fn test_comment_whitespace() {
        // Leading whitespace is dropped, whitespace inside a block is kept.
        assert_eq!(
            body(b"  \n+ a b\nc\n.", &with_comments()),
            "\t*(mem + ptr) += 1;\n\t// a b\n\t// c\n\t// \n\tputchar(*(mem + ptr));\n"
        );
        // Comment in a loop body is indented with it.
        assert_eq!(
            body(b"[x]", &with_comments()),
            "\twhile (*(mem + ptr)) {\n\t\t// x\n\t}\n"
        );
    }

    #[test]
    fn test_comment_flushes_run() {
        let settings = Settings {
            comments: true,
            coalesce: true,
            ..Default::default()
        };
        assert_eq!(
            events(b"++x+", &settings),
            vec![
                (0, Event::Statement(Statement::Add(2))),
                (0, Event::CommentStart),
                (0, Event::CommentByte(b'x')),
                (0, Event::CommentEnd),
                (0, Event::Statement(Statement::Add(1))),
            ]
        );
        // Blank bytes do not break a run.
        assert_eq!(
            events(b"+ \n+", &settings),
            vec![(0, Event::Statement(Statement::Add(2)))]
        );
    }

    #[test]
    fn test_trailing_comment_closed() {
        let out = body(b"+end", &with_comments());
        assert_eq!(out, "\t*(mem + ptr) += 1;\n\t// end\n");
    }

    #[test]
    fn test_state_tracking() {
        let settings = Settings {
            comments: true,
            coalesce: true,
            ..Default::default()
        };
        let mut t = Translator::new(&settings, Recording::new()).unwrap();
        for c in b"[a" {
            t.feed(*c).unwrap();
        }
        assert_eq!(t.state().depth, 1);
        assert!(t.state().comment_open);
        t.feed(b'>').unwrap();
        assert!(!t.state().comment_open);
        assert!(t.state().run.pending().is_some());
        t.feed(b']').unwrap();
        assert_eq!(t.state().depth, 0);
        assert_eq!(t.state().run.pending(), None);
        let (_, summary) = t.finish().unwrap();
        assert_eq!(summary.bytes, 4);
        assert_eq!(summary.statements, 3);
        assert_eq!(summary.comment_blocks, 1);
        assert_eq!(summary.max_depth, 1);
    }

    #[test]
    fn test_deterministic() {
        let src = b"++[>+<-]comment\n>.,";
        let settings = Settings {
            comments: true,
            coalesce: true,
            ..Default::default()
        };
        assert_eq!(
            generate_c(src, &settings).unwrap(),
            generate_c(src, &settings).unwrap()
        );
    }
}
