// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use crate::{ActiveSet, Register};

/// The fixed set of allocatable registers `R0 .. R{count - 1}`.
///
/// The pool keeps no occupancy of its own: a register is free exactly when
/// no entry of the active set holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterPool {
    count: u16,
}

impl RegisterPool {
    #[must_use]
    pub const fn new(count: u16) -> Self {
        Self { count }
    }

    #[must_use]
    pub const fn count(&self) -> usize {
        self.count as usize
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn registers(&self) -> impl Iterator<Item = Register> {
        (0..self.count).map(Register::new)
    }

    /// Free registers in ascending order.
    #[must_use]
    pub fn free_registers(&self, active: &ActiveSet<'_>) -> Vec<Register> {
        let occupied = active.occupancy(self.count());
        self.registers()
            .filter(|register| !occupied[usize::from(register.index())])
            .collect()
    }

    /// Linear in the pool size plus the number of active entries.
    #[must_use]
    pub fn lowest_free(&self, active: &ActiveSet<'_>) -> Option<Register> {
        let occupied = active.occupancy(self.count());
        self.registers().find(|register| !occupied[usize::from(register.index())])
    }
}
