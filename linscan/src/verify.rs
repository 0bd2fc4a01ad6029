// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::collections::BTreeMap;

use crate::{AllocatedInterval, Interval, Register, VerificationError};

/// Checks a finished allocation against the register exclusivity and
/// capacity invariants.
pub fn verify(intervals: &[AllocatedInterval], register_count: usize) -> Result<(), VerificationError> {
    let mut by_register: BTreeMap<Register, Vec<&Interval>> = BTreeMap::new();

    for allocated in intervals {
        let Some(register) = allocated.location().register() else { continue };

        if register.index() as usize >= register_count {
            return Err(VerificationError::UnknownRegister {
                register,
                id: allocated.id().to_string(),
                capacity: register_count,
            });
        }

        by_register.entry(register).or_default().push(allocated.interval());
    }

    for (register, holders) in &mut by_register {
        holders.sort_by(|a, b| a.start_key().cmp(&b.start_key()));

        // Sorted by start, any overlapping pair implies an overlapping
        // neighbour pair.
        for pair in holders.windows(2) {
            if pair[0].overlaps(pair[1]) {
                return Err(VerificationError::Overlap {
                    register: *register,
                    first: pair[0].id().to_string(),
                    second: pair[1].id().to_string(),
                });
            }
        }
    }

    check_capacity(by_register.values().flatten().copied(), register_count)
}

fn check_capacity<'a>(holders: impl Iterator<Item = &'a Interval>, capacity: usize) -> Result<(), VerificationError> {
    // Opening events sort before closing ones at the same point, because both
    // ends of an interval are inclusive.
    let mut events: Vec<(usize, bool)> = holders
        .flat_map(|interval| [(interval.start(), false), (interval.end(), true)])
        .collect();
    events.sort_unstable();

    let mut live = 0_usize;
    for (point, is_close) in events {
        if is_close {
            live -= 1;
            continue;
        }

        live += 1;
        if live > capacity {
            return Err(VerificationError::CapacityExceeded { point, live, capacity });
        }
    }

    Ok(())
}
