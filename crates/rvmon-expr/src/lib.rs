//! rvmon-expr - Debugger expression engine
//!
//! Turns a user-typed expression such as `*0x80000000 + $a0 * 2` into a
//! 32-bit value against the current machine state. The pipeline has three
//! stages:
//!
//! 1. [`lexer`] - scan the input into a bounded token sequence,
//! 2. a retagging pass that reinterprets `*` and `-` as the unary
//!    dereference and negation operators based on their left context,
//! 3. [`eval`] - recursive evaluation of token ranges, splitting each
//!    range at its main operator by precedence.
//!
//! Supported syntax: decimal and hexadecimal literals, `$`-prefixed
//! register names, `+ - * /`, comparisons `== != <= >=`, logicals
//! `&& || !`, unary minus, pointer-style dereference of a literal
//! address, and parentheses.

mod error;
mod eval;
mod lexer;
mod token;

mod edge_cases;

pub use error::{ExprError, Result};
pub use eval::evaluate;
pub use token::{Token, TokenKind, MAX_LEXEME, MAX_TOKENS};
