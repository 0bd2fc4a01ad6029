// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

#![deny(elided_lifetimes_in_paths)]

mod active_set;
mod driver;
mod engine;
mod error;
mod interval;
mod register;
mod register_pool;
mod verify;

pub use self::{
    active_set::{ActiveEntry, ActiveSet},
    driver::{allocate, Allocation, AllocationPass, AllocatorConfig, LinearScanAllocator, Statistics},
    engine::{decide, Decision},
    error::{ConfigurationError, IntervalError, VerificationError},
    interval::{AllocatedInterval, Interval, Location, ProgramPoint},
    register::Register,
    register_pool::RegisterPool,
    verify::verify,
};
