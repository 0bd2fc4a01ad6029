// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::fmt::{Display, Write};

/// A physical register of the pool. Registers are enumerated from zero, so
/// the lowest index is the preferred one whenever multiple are free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Register {
    index: u16,
}

impl Register {
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self { index }
    }

    #[must_use]
    pub const fn index(&self) -> u16 {
        self.index
    }
}

impl Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('R')?;
        self.index.fmt(f)
    }
}
