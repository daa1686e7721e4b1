//! Token types for the expression grammar.

/// Upper bound on tokens per expression. Longer inputs are rejected by
/// the lexer rather than evaluated partially.
pub const MAX_TOKENS: usize = 32;

/// Upper bound on the length of a single lexeme in bytes.
pub const MAX_LEXEME: usize = 31;

/// The closed set of token kinds.
///
/// `Deref` and `Neg` are never produced by the scanner itself; the
/// retagging pass rewrites `Star` and `Minus` into them when the left
/// context shows they cannot be binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `+`
    Plus,
    /// `-` (binary subtraction)
    Minus,
    /// `*` (binary multiplication)
    Star,
    /// `/`
    Slash,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `!` (logical not)
    Not,
    /// Decimal literal; lexeme kept verbatim.
    Num,
    /// Hexadecimal literal including its `0x` prefix.
    Hex,
    /// Register reference including its `$` sigil(s).
    Reg,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<=`
    Leq,
    /// `>=`
    Geq,
    /// `||`
    Or,
    /// `&&`
    And,
    /// Unary `*`: read a word of guest memory at the operand address.
    Deref,
    /// Unary `-`: two's-complement negation.
    Neg,
}

impl TokenKind {
    /// Binding strength used to pick the main operator of a range.
    /// Zero means the kind is not an operator.
    pub(crate) fn precedence(self) -> u8 {
        match self {
            TokenKind::Or => 1,
            TokenKind::And => 2,
            TokenKind::Eq | TokenKind::NotEq | TokenKind::Leq | TokenKind::Geq => 3,
            TokenKind::Plus | TokenKind::Minus => 4,
            TokenKind::Star | TokenKind::Slash => 5,
            TokenKind::Deref => 6,
            TokenKind::Neg | TokenKind::Not => 7,
            _ => 0,
        }
    }

    /// Unary operators fold into the operand on their right.
    pub(crate) fn is_unary(self) -> bool {
        matches!(self, TokenKind::Deref | TokenKind::Neg | TokenKind::Not)
    }

    /// Kinds that can end an operand. A `*` or `-` directly after one of
    /// these is binary; anywhere else it is unary.
    pub(crate) fn ends_operand(self) -> bool {
        matches!(
            self,
            TokenKind::Num | TokenKind::Hex | TokenKind::Reg | TokenKind::RParen
        )
    }
}

/// A single token: kind plus the literal text for kinds that need it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Lexeme text, populated only for `Num`, `Hex` and `Reg`.
    pub text: String,
}

impl Token {
    pub(crate) fn op(kind: TokenKind) -> Self {
        Self {
            kind,
            text: String::new(),
        }
    }

    pub(crate) fn literal(kind: TokenKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}
