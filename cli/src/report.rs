// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use colored::Colorize;
use linscan::{AllocatedInterval, Allocation, Location};

pub fn print_allocation(allocation: &Allocation) {
    for interval in allocation.intervals() {
        println!("{}", format_interval(interval));
    }

    println!();
    println!("{}", summary(allocation));
}

#[must_use]
pub fn format_interval(interval: &AllocatedInterval) -> String {
    let location = match interval.location() {
        Location::Register(register) => register.to_string().green().bold(),
        Location::Spilled => "spilled".yellow(),
    };

    format!("{} -> {location}", interval.interval())
}

#[must_use]
pub fn summary(allocation: &Allocation) -> String {
    let count = allocation.intervals().len();
    let spilled = allocation.spill_count();

    format!(
        "{count} {}, {} {}, {spilled} spilled",
        if count == 1 { "interval" } else { "intervals" },
        allocation.register_count(),
        if allocation.register_count() == 1 { "register" } else { "registers" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use linscan::{allocate, Interval};

    #[test]
    fn summary_counts_spills() {
        colored::control::set_override(false);

        let intervals = [
            Interval::new("a", 0, 5).unwrap(),
            Interval::new("f", 5, 9).unwrap(),
        ];
        let allocation = allocate(&intervals, 1).unwrap();

        assert_eq!(format_interval(&allocation.intervals()[0]), "a [0, 5] -> R0");
        assert_eq!(format_interval(&allocation.intervals()[1]), "f [5, 9] -> spilled");
        assert_eq!(summary(&allocation), "2 intervals, 1 register, 1 spilled");
    }
}
