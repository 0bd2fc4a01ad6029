// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::fmt::{Display, Write};

use strum::{Display as StrumDisplay, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay)]
pub enum BinaryOperator {
    #[strum(to_string = "+")]
    Add,
    #[strum(to_string = "-")]
    Subtract,
    #[strum(to_string = "*")]
    Multiply,
    #[strum(to_string = "/")]
    Divide,
    #[strum(to_string = "%")]
    Modulo,
    #[strum(to_string = "<")]
    Less,
    #[strum(to_string = "<=")]
    LessOrEqual,
    #[strum(to_string = ">")]
    Greater,
    #[strum(to_string = ">=")]
    GreaterOrEqual,
    #[strum(to_string = "==")]
    Equal,
    #[strum(to_string = "!=")]
    NotEqual,
    #[strum(to_string = "and", serialize = "&&")]
    And,
    #[strum(to_string = "or", serialize = "||")]
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay)]
pub enum UnaryOperator {
    #[strum(to_string = "-")]
    Negate,
    #[strum(to_string = "not", serialize = "!")]
    Not,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    Variable(String),
    Integer(i64),
}

impl Operand {
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    #[must_use]
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Self::Variable(name) => Some(name.as_str()),
            Self::Integer(..) => None,
        }
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Variable(name) => f.write_str(name),
            Self::Integer(value) => value.fmt(f),
        }
    }
}

/// A single three-address-code instruction. Every instruction occupies one
/// program point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Copy {
        destination: String,
        source: Operand,
    },

    Unary {
        destination: String,
        operator: UnaryOperator,
        operand: Operand,
    },

    Binary {
        destination: String,
        lhs: Operand,
        operator: BinaryOperator,
        rhs: Operand,
    },

    Call {
        destination: Option<String>,
        function: String,
        arguments: Vec<Operand>,
    },

    /// `if x goto L`, or `if x == 0 goto L` with a comparison.
    JumpConditional {
        condition: Operand,
        comparison: Option<(BinaryOperator, Operand)>,
        location: Label,
    },

    Jump {
        location: Label,
    },

    Label(Label),

    Return {
        value: Option<Operand>,
    },
}

impl Instruction {
    #[must_use]
    pub fn destination(&self) -> Option<&str> {
        match self {
            Self::Copy { destination, .. } => Some(destination.as_str()),
            Self::Unary { destination, .. } => Some(destination.as_str()),
            Self::Binary { destination, .. } => Some(destination.as_str()),
            Self::Call { destination, .. } => destination.as_deref(),
            _ => None,
        }
    }

    /// The variables read by this instruction, in operand order.
    #[must_use]
    pub fn sources(&self) -> Vec<&str> {
        let operands: Vec<&Operand> = match self {
            Self::Copy { source, .. } => vec![source],
            Self::Unary { operand, .. } => vec![operand],
            Self::Binary { lhs, rhs, .. } => vec![lhs, rhs],
            Self::Call { arguments, .. } => arguments.iter().collect(),
            Self::JumpConditional { condition, comparison, .. } => {
                let mut operands = vec![condition];
                operands.extend(comparison.as_ref().map(|(_, rhs)| rhs));
                operands
            }
            Self::Return { value } => value.iter().collect(),
            Self::Jump { .. } | Self::Label(..) => Vec::new(),
        };

        operands.into_iter()
            .filter_map(Operand::as_variable)
            .collect()
    }

    #[must_use]
    pub fn jump_target(&self) -> Option<&Label> {
        match self {
            Self::Jump { location } | Self::JumpConditional { location, .. } => Some(location),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_call(&self) -> bool {
        matches!(self, Self::Call { .. })
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copy { destination, source } => write!(f, "{destination} = {source}"),
            Self::Unary { destination, operator, operand } => write!(f, "{destination} = {operator} {operand}"),
            Self::Binary { destination, lhs, operator, rhs } => write!(f, "{destination} = {lhs} {operator} {rhs}"),

            Self::Call { destination, function, arguments } => {
                if let Some(destination) = destination {
                    write!(f, "{destination} = ")?;
                }

                write!(f, "call {function}(")?;
                for (index, argument) in arguments.iter().enumerate() {
                    if index != 0 {
                        f.write_str(", ")?;
                    }
                    argument.fmt(f)?;
                }
                f.write_char(')')
            }

            Self::JumpConditional { condition, comparison, location } => {
                write!(f, "if {condition} ")?;
                if let Some((operator, rhs)) = comparison {
                    write!(f, "{operator} {rhs} ")?;
                }
                write!(f, "goto {location}")
            }

            Self::Jump { location } => write!(f, "goto {location}"),
            Self::Label(label) => write!(f, "label {label}"),

            Self::Return { value: Some(value) } => write!(f, "return {value}"),
            Self::Return { value: None } => f.write_str("return"),
        }
    }
}
