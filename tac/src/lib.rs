// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

#![deny(elided_lifetimes_in_paths)]

mod control_flow;
mod error;
mod instruction;
mod life_analysis;
mod reader;
mod variable_lifetime;

use linscan::Interval;

pub use self::{
    control_flow::ControlFlowGraph,
    error::{TacError, TacErrorKind},
    instruction::{BinaryOperator, Instruction, Label, Operand, UnaryOperator},
    life_analysis::{LifeAnalysis, LifeAnalysisResult},
    reader::parse_listing,
    variable_lifetime::VariableLifetime,
};

/// Reads a TAC listing and computes the live interval of every variable in it.
pub fn intervals_from_listing(source: &str) -> Result<Vec<Interval>, TacError> {
    let instructions = parse_listing(source)?;
    let analysis = LifeAnalysis::analyze(&instructions)?;
    analysis.dump_result();
    analysis.into_intervals()
}
