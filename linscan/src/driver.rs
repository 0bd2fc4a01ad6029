// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::collections::HashSet;

use log::{debug, trace};

use crate::{
    decide,
    verify,
    ActiveEntry,
    ActiveSet,
    AllocatedInterval,
    ConfigurationError,
    Decision,
    Interval,
    IntervalError,
    Location,
    RegisterPool,
    VerificationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    register_count: u16,
}

impl AllocatorConfig {
    #[must_use]
    pub const fn new(register_count: u16) -> Self {
        Self { register_count }
    }

    /// Validates a register count coming from an untyped source, such as a
    /// configuration file or the command line.
    pub fn try_new(register_count: i64) -> Result<Self, ConfigurationError> {
        if register_count < 0 {
            return Err(ConfigurationError::NegativeRegisterCount { count: register_count });
        }

        let register_count = u16::try_from(register_count)
            .map_err(|_| ConfigurationError::TooManyRegisters { count: register_count })?;

        Ok(Self { register_count })
    }

    #[must_use]
    pub const fn register_count(&self) -> usize {
        self.register_count as usize
    }

    #[must_use]
    pub const fn pool(&self) -> RegisterPool {
        RegisterPool::new(self.register_count)
    }
}

impl TryFrom<i64> for AllocatorConfig {
    type Error = ConfigurationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

/// Classic single-pass linear-scan allocator. The allocator itself holds
/// only configuration; every call to [`LinearScanAllocator::allocate`] runs
/// an independent [`AllocationPass`].
#[derive(Debug, Clone)]
pub struct LinearScanAllocator {
    config: AllocatorConfig,
}

impl LinearScanAllocator {
    #[must_use]
    pub const fn new(config: AllocatorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> AllocatorConfig {
        self.config
    }

    pub fn allocate(&self, intervals: &[Interval]) -> Result<Allocation, IntervalError> {
        let pass = AllocationPass::new(self.config, intervals)?;
        Ok(pass.run())
    }
}

/// Shorthand for a single pass with `register_count` registers.
pub fn allocate(intervals: &[Interval], register_count: u16) -> Result<Allocation, IntervalError> {
    LinearScanAllocator::new(AllocatorConfig::new(register_count)).allocate(intervals)
}

/// Counters of a single pass, mostly useful for logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub assigned: usize,
    pub stolen: usize,
    pub spilled_on_arrival: usize,
    pub expired: usize,
    pub peak_active: usize,
}

/// The state of one allocation pass. It borrows the input intervals and is
/// consumed by [`AllocationPass::run`], so nothing carries over between
/// passes.
#[derive(Debug)]
pub struct AllocationPass<'a> {
    intervals: &'a [Interval],
    pool: RegisterPool,
    active: ActiveSet<'a>,

    /// Indices into `intervals`, sorted by `(start, id)`.
    order: Vec<usize>,

    /// Locations by position in `order`. Grows by one per processed
    /// interval; earlier entries change when they get stolen from.
    locations: Vec<Location>,

    statistics: Statistics,
}

impl<'a> AllocationPass<'a> {
    pub fn new(config: AllocatorConfig, intervals: &'a [Interval]) -> Result<Self, IntervalError> {
        let mut seen = HashSet::with_capacity(intervals.len());
        for interval in intervals {
            if !seen.insert(interval.id()) {
                return Err(IntervalError::DuplicateId { id: interval.id().to_string() });
            }
        }

        let mut order: Vec<usize> = (0..intervals.len()).collect();
        order.sort_by(|a, b| intervals[*a].start_key().cmp(&intervals[*b].start_key()));

        Ok(Self {
            intervals,
            pool: config.pool(),
            active: ActiveSet::new(),
            order,
            locations: Vec::with_capacity(intervals.len()),
            statistics: Statistics::default(),
        })
    }

    #[must_use]
    pub fn run(mut self) -> Allocation {
        let intervals = self.intervals;

        for position in 0..self.order.len() {
            let current = &intervals[self.order[position]];

            self.expire(current.start());
            self.allocate_current(position, current);

            debug_assert!(self.active.len() <= self.pool.count());
            self.statistics.peak_active = self.statistics.peak_active.max(self.active.len());
        }

        self.dump_statistics();
        self.finish()
    }

    fn expire(&mut self, current_start: usize) {
        let expired = self.active.expire(current_start);

        for entry in &expired {
            trace!("{} expired before {current_start}, {} is free again", entry.interval(), entry.register());
        }

        self.statistics.expired += expired.len();
    }

    fn allocate_current(&mut self, position: usize, current: &'a Interval) {
        let decision = decide(current, &self.active, &self.pool);

        let kind: &'static str = (&decision).into();
        trace!("{current}: {kind}");

        match decision {
            Decision::Assign(register) => {
                self.active.insert(ActiveEntry::new(current, position, register));
                self.locations.push(Location::Register(register));
                self.statistics.assigned += 1;
            }

            Decision::Steal { victim, register } => {
                if let Some(entry) = self.active.remove(victim) {
                    trace!("    {} loses {register} and is spilled", entry.interval());
                }

                self.locations[victim] = Location::Spilled;
                self.active.insert(ActiveEntry::new(current, position, register));
                self.locations.push(Location::Register(register));
                self.statistics.stolen += 1;
            }

            Decision::Spill => {
                self.locations.push(Location::Spilled);
                self.statistics.spilled_on_arrival += 1;
            }
        }

        debug_assert_eq!(self.locations.len(), position + 1);
    }

    fn finish(self) -> Allocation {
        let mut by_input: Vec<(usize, Location)> = self.order.into_iter()
            .zip(self.locations)
            .collect();
        by_input.sort_by_key(|(index, _)| *index);

        let intervals: Vec<AllocatedInterval> = by_input.into_iter()
            .map(|(index, location)| AllocatedInterval::new(self.intervals[index].clone(), location))
            .collect();

        let allocation = Allocation {
            intervals,
            register_count: self.pool.count(),
            statistics: self.statistics,
        };

        allocation.dump_mappings();
        allocation
    }

    fn dump_statistics(&self) {
        let Statistics { assigned, stolen, spilled_on_arrival, expired, peak_active } = self.statistics;
        debug!(
            "Pass over {} intervals with {} registers: {assigned} assigned, {stolen} stolen, {spilled_on_arrival} spilled on arrival, {expired} expired, at most {peak_active} active",
            self.order.len(),
            self.pool.count(),
        );
    }
}

/// The outcome of a pass: every input interval with its final location, in
/// the order the intervals were given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    intervals: Vec<AllocatedInterval>,
    register_count: usize,
    statistics: Statistics,
}

impl Allocation {
    #[must_use]
    pub fn intervals(&self) -> &[AllocatedInterval] {
        &self.intervals
    }

    #[must_use]
    pub fn into_intervals(self) -> Vec<AllocatedInterval> {
        self.intervals
    }

    #[must_use]
    pub fn location_of(&self, id: &str) -> Option<Location> {
        self.intervals.iter()
            .find(|interval| interval.id() == id)
            .map(AllocatedInterval::location)
    }

    pub fn spilled(&self) -> impl Iterator<Item = &AllocatedInterval> + '_ {
        self.intervals.iter().filter(|interval| interval.location().is_spilled())
    }

    #[must_use]
    pub fn spill_count(&self) -> usize {
        self.spilled().count()
    }

    #[must_use]
    pub const fn register_count(&self) -> usize {
        self.register_count
    }

    #[must_use]
    pub const fn statistics(&self) -> Statistics {
        self.statistics
    }

    pub fn verify(&self) -> Result<(), VerificationError> {
        verify(&self.intervals, self.register_count)
    }

    fn dump_mappings(&self) {
        debug!("Register mappings:");
        for interval in &self.intervals {
            match interval.location() {
                Location::Register(register) => debug!("    {} is mapped to {register}", interval.interval()),
                Location::Spilled => debug!("    {} is spilled", interval.interval()),
            }
        }
        debug!("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Register;
    use pretty_assertions::assert_eq;

    #[test]
    fn config_rejects_negative_register_count() {
        assert_eq!(
            AllocatorConfig::try_new(-1),
            Err(ConfigurationError::NegativeRegisterCount { count: -1 })
        );
    }

    #[test]
    fn config_rejects_huge_register_count() {
        assert_eq!(
            AllocatorConfig::try_from(1_i64 << 20),
            Err(ConfigurationError::TooManyRegisters { count: 1 << 20 })
        );
    }

    #[test]
    fn config_accepts_zero() {
        assert_eq!(AllocatorConfig::try_new(0).map(|config| config.register_count()), Ok(0));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let intervals = [
            Interval::new("x", 0, 1).unwrap(),
            Interval::new("x", 2, 3).unwrap(),
        ];

        assert_eq!(
            allocate(&intervals, 2),
            Err(IntervalError::DuplicateId { id: "x".into() })
        );
    }

    #[test]
    fn output_keeps_input_order() {
        let intervals = [
            Interval::new("late", 4, 6).unwrap(),
            Interval::new("early", 0, 2).unwrap(),
        ];

        let allocation = allocate(&intervals, 1).unwrap();
        let ids: Vec<&str> = allocation.intervals().iter().map(AllocatedInterval::id).collect();
        assert_eq!(ids, ["late", "early"]);

        assert_eq!(allocation.location_of("early"), Some(Location::Register(Register::new(0))));
        assert_eq!(allocation.location_of("late"), Some(Location::Register(Register::new(0))));
        assert_eq!(allocation.location_of("missing"), None);
    }

    #[test]
    fn statistics_are_counted() {
        let intervals = [
            Interval::new("a", 0, 10).unwrap(),
            Interval::new("b", 1, 3).unwrap(),
            Interval::new("c", 2, 12).unwrap(),
            Interval::new("d", 11, 12).unwrap(),
        ];

        let allocation = allocate(&intervals, 1).unwrap();
        assert_eq!(
            allocation.statistics(),
            Statistics {
                assigned: 2,
                stolen: 1,
                spilled_on_arrival: 1,
                expired: 1,
                peak_active: 1,
            }
        );
    }

    #[test]
    fn empty_input() {
        let allocation = allocate(&[], 4).unwrap();
        assert!(allocation.intervals().is_empty());
        assert_eq!(allocation.spill_count(), 0);
    }
}
