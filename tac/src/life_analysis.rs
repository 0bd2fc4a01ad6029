// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::collections::BTreeMap;

use linscan::{Interval, ProgramPoint};
use log::debug;

use crate::{ControlFlowGraph, Instruction, TacError, VariableLifetime};

/// Computes for every variable the range between its first and last
/// occurrence, by instruction index.
#[derive(Debug)]
pub struct LifeAnalysis {
    result: LifeAnalysisResult,
    cfg: ControlFlowGraph,
}

impl LifeAnalysis {
    pub fn analyze(instructions: &[Instruction]) -> Result<LifeAnalysisResult, TacError> {
        let mut this = Self {
            result: LifeAnalysisResult::default(),
            cfg: ControlFlowGraph::new(instructions)?,
        };

        this.cfg.dump();

        for (index, instruction) in instructions.iter().enumerate() {
            this.add_instruction(index, instruction);
        }

        this.extend_over_loops();

        Ok(this.result)
    }

    fn add_instruction(&mut self, index: ProgramPoint, instruction: &Instruction) {
        let is_call = instruction.is_call();

        for source in instruction.sources() {
            let lifetime = self.add_lifetime(source, index);

            if is_call {
                lifetime.did_use_for_argument();
            }
        }

        if let Some(destination) = instruction.destination() {
            self.add_lifetime(destination, index);
        }
    }

    fn add_lifetime(&mut self, variable: &str, index: ProgramPoint) -> &mut VariableLifetime {
        let lifetime = self.result.lifetimes.entry(variable.to_string())
            .or_insert_with(|| VariableLifetime::new(index));

        lifetime.did_use_at(index);
        lifetime
    }

    /// A variable that comes from before a loop and is still used inside it
    /// has to survive every iteration, so it lives until the back edge.
    /// Repeats until stable, since extending into one loop can make a
    /// variable reach into an enclosing one.
    fn extend_over_loops(&mut self) {
        let loops = self.cfg.loop_ranges().to_vec();

        loop {
            let mut changed = false;

            for loop_range in &loops {
                for lifetime in self.result.lifetimes.values_mut() {
                    if lifetime.first_use() >= *loop_range.start() {
                        continue;
                    }

                    if !loop_range.contains(&lifetime.last_use()) || lifetime.last_use() == *loop_range.end() {
                        continue;
                    }

                    lifetime.did_use_during_loop(loop_range.clone());
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct LifeAnalysisResult {
    lifetimes: BTreeMap<String, VariableLifetime>,
}

impl LifeAnalysisResult {
    #[must_use]
    pub fn lifetimes(&self) -> &BTreeMap<String, VariableLifetime> {
        &self.lifetimes
    }

    #[must_use]
    pub fn lifetime_of(&self, variable: &str) -> Option<&VariableLifetime> {
        self.lifetimes.get(variable)
    }

    /// The lifetimes as allocator input, ordered by `(start, id)`.
    pub fn into_intervals(self) -> Result<Vec<Interval>, TacError> {
        let mut intervals = self.lifetimes.into_iter()
            .map(|(variable, lifetime)| Interval::new(variable, lifetime.first_use(), lifetime.last_use()))
            .collect::<Result<Vec<Interval>, _>>()?;

        intervals.sort_by(|a, b| a.start_key().cmp(&b.start_key()));
        Ok(intervals)
    }

    pub fn dump_result(&self) {
        for (variable, lifetime) in self.lifetimes() {
            debug!(
                "Variable {variable} has a lifetime of {} instructions and occurs {}x. start={} end={}",
                lifetime.length(),
                lifetime.times_used(),
                lifetime.first_use(),
                lifetime.last_use(),
            );
            if lifetime.times_used_as_argument() != 0 {
                debug!("    and was used {}x as an argument to a function", lifetime.times_used_as_argument());
            }
            if let Some(range) = lifetime.last_loop() {
                debug!("    and was kept alive through the loop {}..={}", range.start(), range.end());
            }
        }
    }
}
