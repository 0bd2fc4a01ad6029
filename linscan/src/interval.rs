// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::fmt::Display;

use crate::{IntervalError, Register};

/// Index of an instruction in the linear instruction sequence.
pub type ProgramPoint = usize;

/// The closed range of program points `[start, end]` over which a variable
/// must stay accessible.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    id: String,
    start: ProgramPoint,
    end: ProgramPoint,
}

impl Interval {
    pub fn new(id: impl Into<String>, start: ProgramPoint, end: ProgramPoint) -> Result<Self, IntervalError> {
        let id = id.into();

        if start > end {
            return Err(IntervalError::InvertedRange { id, start, end });
        }

        Ok(Self { id, start, end })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub const fn start(&self) -> ProgramPoint {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> ProgramPoint {
        self.end
    }

    #[must_use]
    pub const fn length(&self) -> usize {
        self.end - self.start
    }

    /// Both ends are inclusive: a variable is still live at the point where
    /// it dies.
    #[must_use]
    pub fn is_active_at(&self, point: ProgramPoint) -> bool {
        (self.start..=self.end).contains(&point)
    }

    #[must_use]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Processing order of the driver.
    #[must_use]
    pub fn start_key(&self) -> (ProgramPoint, &str) {
        (self.start, &self.id)
    }

    /// Ordering of the active set.
    #[must_use]
    pub fn end_key(&self) -> (ProgramPoint, &str) {
        (self.end, &self.id)
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}, {}]", self.id, self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Register(Register),
    Spilled,
}

impl Location {
    #[must_use]
    pub const fn register(&self) -> Option<Register> {
        match self {
            Self::Register(register) => Some(*register),
            Self::Spilled => None,
        }
    }

    #[must_use]
    pub const fn is_spilled(&self) -> bool {
        matches!(self, Self::Spilled)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Register(register) => register.fmt(f),
            Self::Spilled => f.write_str("spilled"),
        }
    }
}

/// An interval together with the final decision of the allocator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatedInterval {
    interval: Interval,
    location: Location,
}

impl AllocatedInterval {
    #[must_use]
    pub(crate) fn new(interval: Interval, location: Location) -> Self {
        Self { interval, location }
    }

    #[must_use]
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    #[must_use]
    pub fn id(&self) -> &str {
        self.interval.id()
    }

    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }
}

impl Display for AllocatedInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.interval, self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn rejects_start_after_end() {
        assert_eq!(
            Interval::new("x", 4, 3),
            Err(IntervalError::InvertedRange { id: "x".into(), start: 4, end: 3 })
        );
    }

    #[test]
    fn accepts_single_point() {
        let interval = Interval::new("x", 7, 7).unwrap();
        assert_eq!(interval.length(), 0);
        assert!(interval.is_active_at(7));
    }

    #[rstest]
    #[case((0, 5), (5, 9), true)]
    #[case((0, 5), (6, 9), false)]
    #[case((2, 3), (0, 9), true)]
    #[case((6, 9), (0, 5), false)]
    fn overlap_is_closed(#[case] a: (usize, usize), #[case] b: (usize, usize), #[case] expected: bool) {
        let a = Interval::new("a", a.0, a.1).unwrap();
        let b = Interval::new("b", b.0, b.1).unwrap();
        assert_eq!(a.overlaps(&b), expected);
        assert_eq!(b.overlaps(&a), expected);
    }

    #[test]
    fn keys_break_ties_by_id() {
        let a = Interval::new("a", 3, 8).unwrap();
        let b = Interval::new("b", 3, 8).unwrap();
        assert!(a.start_key() < b.start_key());
        assert!(a.end_key() < b.end_key());
    }

    #[test]
    fn display_matches_report_format() {
        let interval = Interval::new("c", 4, 9).unwrap();
        assert_eq!(AllocatedInterval::new(interval.clone(), Location::Spilled).to_string(), "c [4, 9] -> spilled");
        assert_eq!(AllocatedInterval::new(interval, Location::Register(Register::new(2))).to_string(), "c [4, 9] -> R2");
    }
}
