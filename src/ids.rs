//! Allocation of global feature identifiers.

use crate::Gfid;

/// Hands out identifiers for features created by the network itself.
///
/// Real identifiers ascend from zero and are used when a connection is
/// materialised as a persisted feature. Virtual identifiers descend from the
/// counter's starting value of `-1`; the first one handed out is `-2`, which
/// keeps `-1` free for the caller-side "synthesize one for me" sentinel.
/// Virtual identifiers are never reused within the allocator's lifetime.
///
/// The allocator is owned by the single network object; there is no global
/// state. Seed it with [`observe`](IdAllocator::observe) while loading a
/// persisted graph so later allocations land past everything already in use.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next_real: i64,
    virtual_counter: i64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Creates an allocator for an empty network.
    pub fn new() -> Self {
        Self {
            next_real: 0,
            virtual_counter: -1,
        }
    }

    /// Accounts for an identifier observed while loading a persisted graph,
    /// so neither counter ever hands it out again.
    pub fn observe(&mut self, id: Gfid) {
        let raw = id.raw();
        if raw >= self.next_real {
            self.next_real = raw + 1;
        }
        if raw < self.virtual_counter {
            self.virtual_counter = raw;
        }
    }

    /// Mints a fresh virtual identifier, strictly below every virtual
    /// identifier handed out or observed so far.
    pub fn mint_virtual(&mut self) -> Gfid {
        self.virtual_counter -= 1;
        Gfid::new(self.virtual_counter)
    }

    /// Mints a fresh persisted-feature identifier, strictly above every real
    /// identifier handed out or observed so far.
    pub fn mint_real(&mut self) -> Gfid {
        let id = self.next_real;
        self.next_real += 1;
        Gfid::new(id)
    }
}
