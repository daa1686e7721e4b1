//! CPU register state and register-name lookup.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::Word;

/// Reset value of the program counter; execution starts at the base of
/// guest physical memory.
pub const RESET_PC: Word = 0x8000_0000;

/// ABI names of the 32 general-purpose registers, in index order.
/// `x0` goes by `$0` so that the expression syntax `$$0` names it.
const GPR_NAMES: [&str; 32] = [
    "$0", "ra", "sp", "gp", "tp", "t0", "t1", "t2", //
    "s0", "s1", "a0", "a1", "a2", "a3", "a4", "a5", //
    "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", //
    "s8", "s9", "s10", "s11", "t3", "t4", "t5", "t6",
];

/// Name of the program counter, the 33rd addressable register.
const PC_NAME: &str = "pc";

fn name_table() -> &'static FxHashMap<&'static str, usize> {
    static TABLE: OnceLock<FxHashMap<&'static str, usize>> = OnceLock::new();
    TABLE.get_or_init(|| GPR_NAMES.iter().enumerate().map(|(i, &n)| (n, i)).collect())
}

/// The rv32 register file: 32 general-purpose registers plus `pc`.
#[derive(Debug, Clone)]
pub struct Cpu {
    pub gpr: [Word; 32],
    pub pc: Word,
}

impl Cpu {
    /// Creates a cleared register file with `pc` at `reset_pc`.
    pub fn new(reset_pc: Word) -> Self {
        Self {
            gpr: [0; 32],
            pc: reset_pc,
        }
    }

    /// Looks up a register by its bare name (`"ra"`, `"a0"`, `"$0"`,
    /// `"pc"`). Case-sensitive exact match; returns `None` for anything
    /// not in the fixed 33-entry list.
    pub fn reg_by_name(&self, name: &str) -> Option<Word> {
        if name == PC_NAME {
            return Some(self.pc);
        }
        name_table().get(name).map(|&i| self.gpr[i])
    }

    /// Iterates over all 33 named registers in display order, `pc` last.
    pub fn regs(&self) -> impl Iterator<Item = (&'static str, Word)> + '_ {
        GPR_NAMES
            .iter()
            .enumerate()
            .map(|(i, &n)| (n, self.gpr[i]))
            .chain(std::iter::once((PC_NAME, self.pc)))
    }
}
