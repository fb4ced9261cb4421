//! Classification of source bytes

/// The eight Brainfuck instructions
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Instruction {
    Add,
    Subtract,
    Right,
    Left,
    Output,
    Input,
    BeginLoop,
    EndLoop,
}

/// Instructions that can be merged into one counted statement.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum RunClass {
    /// `+` and `-`
    Arithmetic,
    /// `>` and `<`
    Movement,
}

impl Instruction {
    /// The run class and signed contribution of this instruction, if it
    /// can take part in a run.
    pub fn run_step(self) -> Option<(RunClass, i64)> {
        match self {
            Instruction::Add => Some((RunClass::Arithmetic, 1)),
            Instruction::Subtract => Some((RunClass::Arithmetic, -1)),
            Instruction::Right => Some((RunClass::Movement, 1)),
            Instruction::Left => Some((RunClass::Movement, -1)),
            Instruction::Output
            | Instruction::Input
            | Instruction::BeginLoop
            | Instruction::EndLoop => None,
        }
    }
}

/// A classified source byte
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    Instruction(Instruction),
    /// Anything else: comment text, if comments are passed through.
    Other(u8),
}

/// Classify a single byte. Total and context free.
pub fn classify(c: u8) -> Token {
    match c {
        b'+' => Token::Instruction(Instruction::Add),
        b'-' => Token::Instruction(Instruction::Subtract),
        b'>' => Token::Instruction(Instruction::Right),
        b'<' => Token::Instruction(Instruction::Left),
        b'.' => Token::Instruction(Instruction::Output),
        b',' => Token::Instruction(Instruction::Input),
        b'[' => Token::Instruction(Instruction::BeginLoop),
        b']' => Token::Instruction(Instruction::EndLoop),
        other => Token::Other(other),
    }
}

/// Whitespace that never opens a comment block on its own.
pub fn is_comment_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b'\n')
}

#[cfg(test)]
mod tests {
    use super::{classify, is_comment_whitespace, Instruction, RunClass, Token};

    #[test]
    fn test_classify() {
        let classes: Vec<Token> = b"+-><.,[]".iter().map(|c| classify(*c)).collect();
        assert_eq!(
            classes,
            vec![
                Token::Instruction(Instruction::Add),
                Token::Instruction(Instruction::Subtract),
                Token::Instruction(Instruction::Right),
                Token::Instruction(Instruction::Left),
                Token::Instruction(Instruction::Output),
                Token::Instruction(Instruction::Input),
                Token::Instruction(Instruction::BeginLoop),
                Token::Instruction(Instruction::EndLoop),
            ]
        );
        assert_eq!(classify(b'a'), Token::Other(b'a'));
        assert_eq!(classify(b'\n'), Token::Other(b'\n'));
        assert_eq!(classify(0xff), Token::Other(0xff));
    }

    #[test]
    fn test_run_step() {
        assert_eq!(
            Instruction::Subtract.run_step(),
            Some((RunClass::Arithmetic, -1))
        );
        assert_eq!(Instruction::Right.run_step(), Some((RunClass::Movement, 1)));
        assert_eq!(Instruction::BeginLoop.run_step(), None);
        assert_eq!(Instruction::Output.run_step(), None);
    }

    #[test]
    fn test_whitespace() {
        assert!(b" \t\r\n".iter().all(|c| is_comment_whitespace(*c)));
        assert!(!is_comment_whitespace(b'x'));
        assert!(!is_comment_whitespace(0x0b));
    }
}
