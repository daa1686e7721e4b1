//! Fixed-capacity watchpoint pool.
//!
//! The pool is a fixed array of slots partitioned between two
//! index-linked lists threaded through the slots themselves: the free
//! list and the active list. A slot's id is its array index and never
//! changes, so deleting and re-adding a watchpoint reuses the same id.
//! Allocation pops the free-list head; the active list keeps insertion
//! order, newest first.

use rvmon_expr::{evaluate, ExprError};
use rvmon_machine::{Machine, Word};

use crate::error::{Result, SdbError};

/// Number of watchpoint slots.
pub const NR_WATCHPOINTS: usize = 32;

/// Stored expressions are truncated to this many characters.
const MAX_EXPR_LEN: usize = 255;

/// One watchpoint slot: a stored expression and the value it had the
/// last time it was successfully evaluated.
#[derive(Debug)]
pub struct Watchpoint {
    id: usize,
    expr: String,
    last_val: Word,
    /// Link to the next slot of whichever list this slot is on.
    next: Option<usize>,
}

impl Watchpoint {
    /// Stable id of this watchpoint, equal to its slot index.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The watched expression text.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// Value of the expression at the last successful evaluation.
    pub fn last_val(&self) -> Word {
        self.last_val
    }
}

/// A detected change of a watched expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchHit {
    pub id: usize,
    pub expr: String,
    pub old: Word,
    pub new: Word,
}

/// The watchpoint pool.
#[derive(Debug)]
pub struct WatchPool {
    slots: Vec<Watchpoint>,
    /// Head of the active list (most recently added watchpoint).
    active: Option<usize>,
    /// Head of the free list.
    free: Option<usize>,
}

impl WatchPool {
    /// Creates the pool with every slot on the free list in index order.
    pub fn new() -> Self {
        let slots = (0..NR_WATCHPOINTS)
            .map(|i| Watchpoint {
                id: i,
                expr: String::new(),
                last_val: 0,
                next: (i + 1 < NR_WATCHPOINTS).then_some(i + 1),
            })
            .collect();
        Self {
            slots,
            active: None,
            free: Some(0),
        }
    }

    /// Arms a watchpoint on `expr`, seeding its cached value by
    /// evaluating immediately. On evaluation failure the slot goes
    /// straight back to the free list and no id is consumed.
    ///
    /// # Panics
    /// When all slots are armed. Pool exhaustion is a configuration
    /// error on the part of the embedder, not a runtime condition.
    pub fn add(&mut self, expr: &str, machine: &Machine) -> std::result::Result<usize, ExprError> {
        let id = self.alloc();
        let stored: String = expr.chars().take(MAX_EXPR_LEN).collect();
        match evaluate(&stored, machine) {
            Ok(val) => {
                self.slots[id].expr = stored;
                self.slots[id].last_val = val;
                tracing::info!(id, expr = %self.slots[id].expr, value = self.slots[id].last_val, "watchpoint armed");
                Ok(id)
            }
            Err(err) => {
                self.release(id);
                Err(err)
            }
        }
    }

    /// Disarms the watchpoint with the given id.
    pub fn remove(&mut self, id: usize) -> Result<()> {
        let mut cur = self.active;
        while let Some(i) = cur {
            if i == id {
                self.release(id);
                tracing::info!(id, "watchpoint disarmed");
                return Ok(());
            }
            cur = self.slots[i].next;
        }
        Err(SdbError::NoSuchWatchpoint(id))
    }

    /// Iterates over the armed watchpoints, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Watchpoint> {
        std::iter::successors(self.active.map(|i| &self.slots[i]), |wp| {
            wp.next.map(|i| &self.slots[i])
        })
    }

    /// Number of armed watchpoints.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// True when no watchpoint is armed.
    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }

    /// Reevaluates every armed watchpoint against the machine and
    /// returns the detected changes, updating each cached value in
    /// place. Watchpoints whose expression fails to evaluate keep
    /// their previous cached value and report nothing.
    pub fn check(&mut self, machine: &Machine) -> Vec<WatchHit> {
        let mut hits = Vec::new();
        let mut cur = self.active;
        while let Some(i) = cur {
            if let Ok(val) = evaluate(&self.slots[i].expr, machine) {
                if val != self.slots[i].last_val {
                    hits.push(WatchHit {
                        id: i,
                        expr: self.slots[i].expr.clone(),
                        old: self.slots[i].last_val,
                        new: val,
                    });
                    self.slots[i].last_val = val;
                }
            }
            cur = self.slots[i].next;
        }
        hits
    }

    /// Pops the free-list head and pushes it onto the active list.
    fn alloc(&mut self) -> usize {
        let Some(id) = self.free else {
            panic!("watchpoint pool exhausted ({NR_WATCHPOINTS} slots)");
        };
        self.free = self.slots[id].next;
        self.slots[id].next = self.active;
        self.active = Some(id);
        id
    }

    /// Unlinks a slot from the active list and pushes it onto the
    /// free list.
    fn release(&mut self, id: usize) {
        if self.active == Some(id) {
            self.active = self.slots[id].next;
        } else {
            let mut cur = self.active;
            while let Some(i) = cur {
                if self.slots[i].next == Some(id) {
                    self.slots[i].next = self.slots[id].next;
                    break;
                }
                cur = self.slots[i].next;
            }
        }
        self.slots[id].next = self.free;
        self.free = Some(id);
        self.slots[id].expr.clear();
    }
}

impl Default for WatchPool {
    fn default() -> Self {
        Self::new()
    }
}
