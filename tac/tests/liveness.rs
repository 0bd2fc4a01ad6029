// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! Live intervals computed from TAC listings, and the allocations they lead to.

use linscan::{allocate, Interval, Location, Register};
use linscan_tac::{intervals_from_listing, parse_listing, LifeAnalysis, TacError};
use pretty_assertions::assert_eq;
use rstest::rstest;

const STRAIGHT_LINE: &str = "
    t1 = 10 / 2
    x = t1
    t2 = x + 3
    y = t2
    t3 = y > 5
    if t3 goto L1
    z = 0
    goto L2
    label L1
    z = 1
    label L2
    call print(z)
";

/// Copies spelled `x = = y`, and the literal 0 dropped from `z = =`.
const DOUBLED_ASSIGNMENTS: &str = "\
t1 = 10 / 2
x = = t1
t2 = x + 3
y = = t2
t3 = y > 5
if t3 goto L4
goto L5
label L5
z = =
label L4
z = = 1
label L6
call print(z)";

const COUNTING_LOOP: &str = "
    i = 0
    s = 0
    label L1
    t1 = i < 10
    if t1 == 0 goto L2
    s = s + i
    i = i + 1
    goto L1
    label L2
    call print(s)
";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).filter(None, log::LevelFilter::max()).try_init();
}

fn interval(id: &str, start: usize, end: usize) -> Interval {
    Interval::new(id, start, end).unwrap()
}

#[test]
fn straight_line_intervals() {
    init_logger();

    assert_eq!(
        intervals_from_listing(STRAIGHT_LINE).unwrap(),
        vec![
            interval("t1", 0, 1),
            interval("x", 1, 2),
            interval("t2", 2, 3),
            interval("y", 3, 4),
            interval("t3", 4, 5),
            interval("z", 6, 11),
        ]
    );
}

#[test]
fn loop_keeps_outer_variables_alive_until_back_edge() {
    init_logger();

    assert_eq!(
        intervals_from_listing(COUNTING_LOOP).unwrap(),
        vec![
            interval("i", 0, 7),
            interval("s", 1, 9),
            interval("t1", 3, 4),
        ]
    );
}

#[test]
fn call_arguments_are_counted() {
    let instructions = parse_listing(COUNTING_LOOP).unwrap();
    let analysis = LifeAnalysis::analyze(&instructions).unwrap();

    assert_eq!(analysis.lifetime_of("s").map(|l| l.times_used_as_argument()), Some(1));
    assert_eq!(analysis.lifetime_of("i").map(|l| l.times_used_as_argument()), Some(0));
    assert!(analysis.lifetime_of("L1").is_none());
}

#[test]
fn occurrences_are_counted() {
    init_logger();

    let instructions = parse_listing(COUNTING_LOOP).unwrap();
    let analysis = LifeAnalysis::analyze(&instructions).unwrap();
    analysis.dump_result();

    assert_eq!(analysis.lifetime_of("s").map(|l| l.times_used()), Some(4));
    assert_eq!(analysis.lifetime_of("i").map(|l| l.times_used()), Some(5));
    assert_eq!(analysis.lifetime_of("t1").map(|l| l.times_used()), Some(2));
}

#[test]
fn nested_loops_extend_to_outer_back_edge() {
    let intervals = intervals_from_listing("
        n = 3
        label outer
        j = 0
        label inner
        j = j + n
        if j < 9 goto inner
        if j < 99 goto outer
    ").unwrap();

    assert_eq!(intervals, vec![interval("n", 0, 6), interval("j", 2, 6)]);
}

#[rstest]
#[case(1, &[("t1", 0), ("t2", 0), ("t3", 0), ("z", 0)], &["x", "y"])]
#[case(2, &[("t1", 0), ("x", 1), ("t2", 0), ("y", 1), ("t3", 0), ("z", 0)], &[])]
fn straight_line_allocation(#[case] registers: u16, #[case] expected: &[(&str, u16)], #[case] spilled: &[&str]) {
    let allocation = allocate(&intervals_from_listing(STRAIGHT_LINE).unwrap(), registers).unwrap();

    for (id, register) in expected {
        assert_eq!(allocation.location_of(id), Some(Location::Register(Register::new(*register))), "location of {id}");
    }

    let actual_spilled: Vec<&str> = allocation.spilled().map(|i| i.id()).collect();
    assert_eq!(actual_spilled, spilled);
    assert_eq!(allocation.verify(), Ok(()));
}

#[test]
fn doubled_assignment_listing() {
    init_logger();

    let intervals = intervals_from_listing(DOUBLED_ASSIGNMENTS).unwrap();
    assert_eq!(
        intervals,
        vec![
            interval("t1", 0, 1),
            interval("x", 1, 2),
            interval("t2", 2, 3),
            interval("y", 3, 4),
            interval("t3", 4, 5),
            interval("z", 8, 12),
        ]
    );

    let allocation = allocate(&intervals, 1).unwrap();
    let spilled: Vec<&str> = allocation.spilled().map(|i| i.id()).collect();
    assert_eq!(spilled, ["x", "y"]);
    assert_eq!(allocation.location_of("z"), Some(Location::Register(Register::new(0))));
}

#[test]
fn loop_allocation_steals_from_accumulator() {
    let allocation = allocate(&intervals_from_listing(COUNTING_LOOP).unwrap(), 2).unwrap();

    assert_eq!(allocation.location_of("i"), Some(Location::Register(Register::new(0))));
    assert_eq!(allocation.location_of("t1"), Some(Location::Register(Register::new(1))));
    assert_eq!(allocation.location_of("s"), Some(Location::Spilled));
}

#[test]
fn syntax_errors_carry_the_line() {
    let error = intervals_from_listing("x = 1\nx = y ?").unwrap_err();
    assert!(matches!(error, TacError::Syntax { line: 2, .. }), "{error:?}");
}
