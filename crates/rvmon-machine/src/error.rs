//! Error types for the machine model.

use thiserror::Error;

/// Errors raised while setting up the guest machine.
#[derive(Debug, Error)]
pub enum MachineError {
    /// The memory image does not fit in guest physical memory.
    #[error("image of {image} bytes exceeds the {avail} bytes mapped at {base:#010x}")]
    ImageTooLarge {
        image: usize,
        avail: usize,
        base: u32,
    },

    /// An image load address outside guest physical memory.
    #[error("load address {addr:#010x} is not in guest physical memory")]
    BadLoadAddress { addr: u32 },
}

/// Result type alias for machine operations.
pub type Result<T> = std::result::Result<T, MachineError>;
