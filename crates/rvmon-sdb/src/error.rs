//! Error type for debugger operations.

use rvmon_expr::ExprError;
use thiserror::Error;

/// Errors surfaced to the monitor's command layer.
#[derive(Debug, Error)]
pub enum SdbError {
    /// A watchpoint id that is not currently armed.
    #[error("no watchpoint {0}")]
    NoSuchWatchpoint(usize),

    /// The underlying expression failed to lex or evaluate.
    #[error(transparent)]
    Expr(#[from] ExprError),
}

/// Result type alias for debugger operations.
pub type Result<T> = std::result::Result<T, SdbError>;
