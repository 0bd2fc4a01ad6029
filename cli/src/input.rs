// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::path::{Path, PathBuf};

use linscan::{Interval, IntervalError, ProgramPoint};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("could not read \"{}\": {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("line {line}: expected `<id> <start> <end>`, got `{text}`")]
    Malformed { line: usize, text: String },

    #[error("line {line}: `{text}` is not a program point")]
    InvalidNumber { line: usize, text: String },

    #[error("line {line}: {source}")]
    Interval { line: usize, source: IntervalError },
}

pub fn read_intervals(path: &Path) -> Result<Vec<Interval>, InputError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|source| InputError::Io { path: path.to_path_buf(), source })?;

    parse_intervals(&contents)
}

/// One interval per line as `<id> <start> <end>`. Blank lines and `#`
/// comments are ignored.
pub fn parse_intervals(contents: &str) -> Result<Vec<Interval>, InputError> {
    let mut intervals = Vec::new();

    for (index, line) in contents.lines().enumerate() {
        let line_number = index + 1;
        let text = match line.find('#') {
            Some(comment) => &line[..comment],
            None => line,
        }.trim();

        if text.is_empty() {
            continue;
        }

        let fields: Vec<&str> = text.split_whitespace().collect();
        let [id, start, end] = fields.as_slice() else {
            return Err(InputError::Malformed { line: line_number, text: text.to_string() });
        };

        let start = program_point(start, line_number)?;
        let end = program_point(end, line_number)?;

        let interval = Interval::new(*id, start, end)
            .map_err(|source| InputError::Interval { line: line_number, source })?;

        intervals.push(interval);
    }

    Ok(intervals)
}

fn program_point(text: &str, line: usize) -> Result<ProgramPoint, InputError> {
    text.parse()
        .map_err(|_| InputError::InvalidNumber { line, text: text.to_string() })
}
