// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::ops::RangeInclusive;

use linscan::ProgramPoint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableLifetime {
    first_use: ProgramPoint,
    last_use: ProgramPoint,
    times_used: usize,
    times_used_as_argument: usize,
    last_loop: Option<RangeInclusive<ProgramPoint>>,
}

impl VariableLifetime {
    #[must_use]
    pub fn new(index: ProgramPoint) -> Self {
        Self {
            first_use: index,
            last_use: index,
            times_used: 0,
            times_used_as_argument: 0,
            last_loop: None,
        }
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.last_use - self.first_use
    }

    #[must_use]
    pub fn first_use(&self) -> ProgramPoint {
        self.first_use
    }

    #[must_use]
    pub fn last_use(&self) -> ProgramPoint {
        self.last_use
    }

    #[must_use]
    pub fn times_used(&self) -> usize {
        self.times_used
    }

    #[must_use]
    pub fn times_used_as_argument(&self) -> usize {
        self.times_used_as_argument
    }

    #[must_use]
    pub fn last_loop(&self) -> Option<&RangeInclusive<ProgramPoint>> {
        self.last_loop.as_ref()
    }

    pub fn did_use_at(&mut self, index: ProgramPoint) {
        debug_assert!(self.last_use <= index);
        self.last_use = index;
        self.times_used += 1;
    }

    pub fn did_use_for_argument(&mut self) {
        self.times_used_as_argument += 1;
    }

    /// Keeps the variable alive until the back edge of `loop_range`.
    pub fn did_use_during_loop(&mut self, loop_range: RangeInclusive<ProgramPoint>) {
        if self.last_use < *loop_range.end() {
            self.last_use = *loop_range.end();
        }
        self.last_loop = Some(loop_range);
    }

    #[must_use]
    pub fn is_active_at(&self, index: ProgramPoint) -> bool {
        (self.first_use()..=self.last_use()).contains(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_first_and_last_use() {
        let mut lifetime = VariableLifetime::new(2);
        lifetime.did_use_at(2);
        lifetime.did_use_at(6);

        assert_eq!(lifetime.first_use(), 2);
        assert_eq!(lifetime.last_use(), 6);
        assert_eq!(lifetime.length(), 4);
        assert_eq!(lifetime.times_used(), 2);
        assert!(lifetime.is_active_at(6));
        assert!(!lifetime.is_active_at(7));
    }

    #[test]
    fn loop_extends_to_back_edge() {
        let mut lifetime = VariableLifetime::new(0);
        lifetime.did_use_at(3);
        lifetime.did_use_during_loop(2..=8);

        assert_eq!(lifetime.last_use(), 8);
        assert_eq!(lifetime.last_loop(), Some(&(2..=8)));
    }
}
