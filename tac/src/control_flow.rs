// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::{collections::HashMap, ops::RangeInclusive};

use linscan::ProgramPoint;
use log::debug;

use crate::{Instruction, Label, TacError};

/// The jumps of a listing, resolved to instruction indices.
#[derive(Debug, Clone)]
pub struct ControlFlowGraph {
    label_positions: HashMap<Label, ProgramPoint>,
    edges: Vec<(ProgramPoint, ProgramPoint)>,
    loops: Vec<RangeInclusive<ProgramPoint>>,
}

impl ControlFlowGraph {
    pub fn new(instructions: &[Instruction]) -> Result<Self, TacError> {
        let mut this = Self {
            label_positions: HashMap::new(),
            edges: Vec::new(),
            loops: Vec::new(),
        };

        this.collect_labels(instructions)?;
        this.visit_function(instructions)?;
        this.analyze_loops();

        Ok(this)
    }

    /// Every backward jump forms a loop from the label it targets up to and
    /// including the jump itself.
    #[must_use]
    pub fn loop_ranges(&self) -> &[RangeInclusive<ProgramPoint>] {
        &self.loops
    }

    #[must_use]
    pub fn position_of_label(&self, label: &Label) -> Option<ProgramPoint> {
        self.label_positions.get(label).copied()
    }

    pub fn dump(&self) {
        debug!("Loops of ControlFlowGraph:");
        for loop_range in &self.loops {
            debug!("    From {} to {}", loop_range.start(), loop_range.end());
        }
    }
}

// private methods
impl ControlFlowGraph {
    fn collect_labels(&mut self, instructions: &[Instruction]) -> Result<(), TacError> {
        for (index, instruction) in instructions.iter().enumerate() {
            let Instruction::Label(label) = instruction else { continue };

            if self.label_positions.insert(label.clone(), index).is_some() {
                return Err(TacError::DuplicateLabel {
                    instruction: index,
                    label: label.name().to_string(),
                });
            }
        }

        Ok(())
    }

    fn visit_function(&mut self, instructions: &[Instruction]) -> Result<(), TacError> {
        for (index, instruction) in instructions.iter().enumerate() {
            let Some(label) = instruction.jump_target() else { continue };

            let Some(position) = self.position_of_label(label) else {
                return Err(TacError::UndefinedLabel {
                    instruction: index,
                    label: label.name().to_string(),
                });
            };

            self.edges.push((index, position));
        }

        Ok(())
    }

    fn analyze_loops(&mut self) {
        for (from, to) in &self.edges {
            if to <= from {
                self.loops.push(*to..=*from);
            }
        }

        self.loops.sort_by_key(|range| (*range.start(), *range.end()));
    }
}
