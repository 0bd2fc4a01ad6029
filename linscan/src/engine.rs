// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use strum::IntoStaticStr;

use crate::{ActiveSet, Interval, Register, RegisterPool};

/// What should happen to the interval that is currently being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Decision {
    /// A register is free; the lowest one is taken.
    Assign(Register),

    /// The pool is exhausted, but the active interval at `victim` lives
    /// longer than the current one. Its register is handed over and the
    /// victim becomes spilled.
    Steal { victim: usize, register: Register },

    /// The current interval lives at least as long as every active one, so
    /// it goes to memory itself.
    Spill,
}

/// Decides the location of `current`. Expiry for `current.start()` must
/// already have run on `active`.
#[must_use]
pub fn decide(current: &Interval, active: &ActiveSet<'_>, pool: &RegisterPool) -> Decision {
    if pool.is_empty() {
        return Decision::Spill;
    }

    if active.len() < pool.count() {
        if let Some(register) = pool.lowest_free(active) {
            return Decision::Assign(register);
        }
    }

    let Some(victim) = active.victim() else {
        return Decision::Spill;
    };

    if victim.end() > current.end() {
        Decision::Steal {
            victim: victim.position(),
            register: victim.register(),
        }
    } else {
        Decision::Spill
    }
}
