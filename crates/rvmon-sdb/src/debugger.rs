//! Debugger facade over a machine and its watchpoint pool.

use rvmon_machine::{EmuState, Machine, Word};

use crate::error::Result;
use crate::watchpoint::{WatchHit, WatchPool, Watchpoint};

/// The debugger: owns the machine being inspected and the watchpoints
/// armed on it. This is the API the monitor's command layer talks to.
#[derive(Debug)]
pub struct Debugger {
    machine: Machine,
    watchpoints: WatchPool,
}

impl Debugger {
    pub fn new(machine: Machine) -> Self {
        Self {
            machine,
            watchpoints: WatchPool::new(),
        }
    }

    /// The machine under inspection.
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    /// Evaluates an expression against the current machine state.
    pub fn eval(&self, expr: &str) -> Result<Word> {
        Ok(rvmon_expr::evaluate(expr, &self.machine)?)
    }

    /// Arms a watchpoint and returns its id.
    pub fn add_watchpoint(&mut self, expr: &str) -> Result<usize> {
        Ok(self.watchpoints.add(expr, &self.machine)?)
    }

    /// Disarms the watchpoint with the given id.
    pub fn delete_watchpoint(&mut self, id: usize) -> Result<()> {
        self.watchpoints.remove(id)
    }

    /// The armed watchpoints, newest first.
    pub fn watchpoints(&self) -> impl Iterator<Item = &Watchpoint> {
        self.watchpoints.iter()
    }

    /// Reevaluates every watchpoint; any change stops the guest unless
    /// it has already ended.
    pub fn check_watchpoints(&mut self) -> Vec<WatchHit> {
        let hits = self.watchpoints.check(&self.machine);
        if !hits.is_empty() && !self.machine.state.is_end() {
            self.machine.state = EmuState::Stop;
        }
        hits
    }

    /// Runs up to `n` guest steps, checking watchpoints after each one.
    /// Returns the watchpoint hits observed along the way.
    ///
    /// Pass `u64::MAX` to run until something stops the guest.
    pub fn exec(&mut self, n: u64) -> Vec<WatchHit> {
        match self.machine.state {
            EmuState::End { .. } | EmuState::Quit => {
                tracing::warn!("program execution has ended; restart the monitor to run again");
                return Vec::new();
            }
            _ => self.machine.state = EmuState::Running,
        }

        let mut hits = Vec::new();
        for _ in 0..n {
            self.machine.step_one();
            hits.extend(self.check_watchpoints());
            if self.machine.state != EmuState::Running {
                break;
            }
        }
        if self.machine.state == EmuState::Running {
            self.machine.state = EmuState::Stop;
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rvmon_machine::{Memory, EBREAK};

    /// A machine whose guest is 16 placeholder words and an ebreak.
    fn debugger() -> Debugger {
        let mut mem = Memory::new(0x8000_0000, 0x100);
        for i in 0..16 {
            mem.write(0x8000_0000 + 4 * i, 4, 0x0000_0013).unwrap();
        }
        mem.write(0x8000_0040, 4, EBREAK).unwrap();
        Debugger::new(Machine::new(mem))
    }

    #[test]
    fn test_exec_counts_steps() {
        let mut dbg = debugger();
        let hits = dbg.exec(3);
        assert!(hits.is_empty());
        assert_eq!(dbg.machine().cpu.pc, 0x8000_000c);
        assert_eq!(dbg.machine().state, EmuState::Stop);
    }

    #[test]
    fn test_exec_runs_to_guest_end() {
        let mut dbg = debugger();
        dbg.exec(u64::MAX);
        assert_eq!(
            dbg.machine().state,
            EmuState::End {
                pc: 0x8000_0040,
                code: 0
            }
        );
        // once ended, further exec requests are refused
        dbg.exec(1);
        assert_eq!(dbg.machine().cpu.pc, 0x8000_0040);
    }

    #[test]
    fn test_pc_watchpoint_stops_execution() {
        let mut dbg = debugger();
        let id = dbg.add_watchpoint("$pc").unwrap();

        let hits = dbg.exec(u64::MAX);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, id);
        assert_eq!(hits[0].old, 0x8000_0000);
        assert_eq!(hits[0].new, 0x8000_0004);
        assert_eq!(dbg.machine().state, EmuState::Stop);
        assert_eq!(dbg.machine().cpu.pc, 0x8000_0004);
    }

    #[test]
    fn test_memory_watchpoint_fires_on_write() {
        let mut dbg = debugger();
        dbg.add_watchpoint("*0x80000080").unwrap();

        let hits = dbg.exec(2);
        assert!(hits.is_empty());

        dbg.machine_mut().mem.write(0x8000_0080, 4, 99).unwrap();
        let hits = dbg.exec(1);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].old, 0);
        assert_eq!(hits[0].new, 99);
        assert_eq!(dbg.machine().state, EmuState::Stop);
    }

    #[test]
    fn test_watchpoint_change_at_guest_end_does_not_unstop_end() {
        let mut dbg = debugger();
        dbg.add_watchpoint("$pc").unwrap();
        // drain the pc watchpoint hits one step at a time up to ebreak
        for _ in 0..16 {
            dbg.exec(1);
        }
        let hits = dbg.exec(1);
        assert!(hits.is_empty());
        assert!(dbg.machine().state.is_end());
    }

    #[test]
    fn test_eval_sees_machine_state() {
        let mut dbg = debugger();
        dbg.machine_mut().cpu.gpr[10] = 41;
        assert_eq!(dbg.eval("$a0 + 1").unwrap(), 42);
    }

    #[test]
    fn test_delete_watchpoint_round_trip() {
        let mut dbg = debugger();
        let id = dbg.add_watchpoint("$pc").unwrap();
        assert_eq!(dbg.watchpoints().count(), 1);
        dbg.delete_watchpoint(id).unwrap();
        assert_eq!(dbg.watchpoints().count(), 0);
        assert!(dbg.delete_watchpoint(id).is_err());
    }
}
