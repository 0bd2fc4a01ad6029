// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use linscan::IntervalError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TacError {
    #[error("line {line}: {kind}")]
    Syntax { line: usize, kind: TacErrorKind },

    #[error("instruction {instruction} jumps to undefined label `{label}`")]
    UndefinedLabel { instruction: usize, label: String },

    #[error("label `{label}` is defined more than once (again at instruction {instruction})")]
    DuplicateLabel { instruction: usize, label: String },

    #[error(transparent)]
    Interval(#[from] IntervalError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TacErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("unrecognized instruction `{text}`")]
    UnknownInstruction { text: String },

    #[error("`{text}` is neither a variable nor an integer")]
    InvalidOperand { text: String },

    #[error("unknown operator `{text}`")]
    UnknownOperator { text: String },

    #[error("`{text}` is not a valid label")]
    InvalidLabel { text: String },
}
