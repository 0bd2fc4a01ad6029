// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use thiserror::Error;

use crate::{ProgramPoint, Register};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    #[error("interval `{id}` ends before it starts: [{start}, {end}]")]
    InvertedRange { id: String, start: ProgramPoint, end: ProgramPoint },

    #[error("interval `{id}` occurs more than once in the same allocation pass")]
    DuplicateId { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("register count must not be negative, got {count}")]
    NegativeRegisterCount { count: i64 },

    #[error("register count {count} exceeds the maximum of {}", u16::MAX)]
    TooManyRegisters { count: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("intervals `{first}` and `{second}` overlap but both hold {register}")]
    Overlap { register: Register, first: String, second: String },

    #[error("interval `{id}` holds {register}, which is not part of a pool of {capacity} registers")]
    UnknownRegister { register: Register, id: String, capacity: usize },

    #[error("{live} intervals hold a register at point {point}, but only {capacity} registers exist")]
    CapacityExceeded { point: ProgramPoint, live: usize, capacity: usize },
}
