//! Error type for expression evaluation.

use rvmon_machine::Word;
use thiserror::Error;

/// Everything that can go wrong while lexing or evaluating an
/// expression. All variants abort the current evaluation only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExprError {
    /// A byte the grammar does not know about.
    #[error("unexpected character {ch:?} at column {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    /// A literal or register name longer than the lexeme bound.
    #[error("token at column {pos} exceeds {max} characters")]
    LexemeTooLong { pos: usize, max: usize },

    /// The expression has more tokens than the token buffer holds.
    #[error("expression has more than {max} tokens")]
    TooManyTokens { max: usize },

    /// Nothing to evaluate.
    #[error("empty expression")]
    Empty,

    /// Parenthesis depth went negative, or a nonempty range has no
    /// main operator.
    #[error("unbalanced expression")]
    Unbalanced,

    /// An operator is missing a usable operand.
    #[error("operator is missing an operand")]
    BadOperand,

    /// A `$name` that is not in the fixed register list.
    #[error("unknown register '{0}'")]
    UnknownRegister(String),

    /// A dereference of an address outside guest physical memory.
    #[error("physical address {0:#010x} is not mapped")]
    BadAddress(Word),

    /// Division with a zero right operand.
    #[error("division by zero")]
    DivideByZero,
}

/// Result type alias for expression operations.
pub type Result<T> = std::result::Result<T, ExprError>;
