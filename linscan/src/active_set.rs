// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use crate::{Interval, ProgramPoint, Register};

/// An interval that is live and currently holds a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveEntry<'a> {
    interval: &'a Interval,
    position: usize,
    register: Register,
}

impl<'a> ActiveEntry<'a> {
    /// `position` is the index of the interval in the processing order of
    /// the pass, and identifies the entry within the set.
    #[must_use]
    pub const fn new(interval: &'a Interval, position: usize, register: Register) -> Self {
        Self { interval, position, register }
    }

    #[must_use]
    pub const fn interval(&self) -> &'a Interval {
        self.interval
    }

    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub const fn register(&self) -> Register {
        self.register
    }

    #[must_use]
    pub const fn end(&self) -> ProgramPoint {
        self.interval.end()
    }
}

/// The intervals currently holding a register, ordered by `(end, id)`.
#[derive(Debug, Default, Clone)]
pub struct ActiveSet<'a> {
    entries: Vec<ActiveEntry<'a>>,
}

impl<'a> ActiveSet<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEntry<'a>> + '_ {
        self.entries.iter()
    }

    #[must_use]
    pub fn holds(&self, register: Register) -> bool {
        self.entries.iter().any(|entry| entry.register == register)
    }

    /// Which of the registers `R0 .. R{count - 1}` are held, indexed by
    /// register. Registers outside that range are ignored.
    #[must_use]
    pub fn occupancy(&self, count: usize) -> Vec<bool> {
        let mut occupied = vec![false; count];
        for entry in &self.entries {
            if let Some(slot) = occupied.get_mut(usize::from(entry.register.index())) {
                *slot = true;
            }
        }
        occupied
    }

    /// Removes every entry ending strictly before `current_start`. An entry
    /// ending exactly at `current_start` stays: intervals are closed, so the
    /// variable is still live at the instruction where it dies.
    pub fn expire(&mut self, current_start: ProgramPoint) -> Vec<ActiveEntry<'a>> {
        let count = self.entries.partition_point(|entry| entry.end() < current_start);
        self.entries.drain(..count).collect()
    }

    pub fn insert(&mut self, entry: ActiveEntry<'a>) {
        debug_assert!(!self.holds(entry.register), "{} is already held by an active interval", entry.register);

        let key = entry.interval.end_key();
        let index = self.entries.partition_point(|other| other.interval.end_key() < key);
        self.entries.insert(index, entry);
    }

    /// Evicts the entry of the interval at `position`. The location recorded
    /// for that interval is left for the caller to update.
    pub fn remove(&mut self, position: usize) -> Option<ActiveEntry<'a>> {
        let index = self.entries.iter().position(|entry| entry.position == position)?;
        Some(self.entries.remove(index))
    }

    /// The spill candidate: the entry with the furthest end point. When
    /// several entries share that end point, the one with the lowest id wins.
    #[must_use]
    pub fn victim(&self) -> Option<&ActiveEntry<'a>> {
        let furthest_end = self.entries.last()?.end();
        let index = self.entries.partition_point(|entry| entry.end() < furthest_end);
        self.entries.get(index)
    }
}
