// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::str::FromStr;

use log::trace;

use crate::{BinaryOperator, Instruction, Label, Operand, TacError, TacErrorKind, UnaryOperator};

const KEYWORDS: [&str; 8] = ["and", "call", "goto", "if", "label", "not", "or", "return"];

/// Longest spellings first, so `<=` is not read as `<` followed by `=`.
const OPERATORS: [&str; 15] = ["<=", ">=", "==", "!=", "&&", "||", "+", "-", "*", "/", "%", "<", ">", "=", "!"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'s> {
    Word(&'s str),
    Operator(&'s str),
    Punctuator(char),
}

/// Parses a TAC listing, one instruction per line. Empty lines and `#`
/// comments are skipped and do not count as a program point.
pub fn parse_listing(source: &str) -> Result<Vec<Instruction>, TacError> {
    let mut instructions = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let line = match line.find('#') {
            Some(comment) => &line[..comment],
            None => line,
        }.trim();

        if line.is_empty() {
            continue;
        }

        let instruction = parse_line(line)
            .map_err(|kind| TacError::Syntax { line: index + 1, kind })?;

        trace!("{:>4}: {instruction}", instructions.len());
        instructions.push(instruction);
    }

    Ok(instructions)
}

fn parse_line(line: &str) -> Result<Instruction, TacErrorKind> {
    let tokens = tokenize(line)?;

    match tokens.as_slice() {
        [Token::Word("label"), Token::Word(name)] | [Token::Word(name), Token::Punctuator(':')] => {
            Ok(Instruction::Label(label(name)?))
        }

        [Token::Word("goto"), Token::Word(name)] => {
            Ok(Instruction::Jump { location: label(name)? })
        }

        [Token::Word("if"), condition @ .., Token::Word("goto"), Token::Word(name)] => {
            parse_conditional_jump(condition, name, line)
        }

        [Token::Word("return")] => Ok(Instruction::Return { value: None }),
        [Token::Word("return"), Token::Word(value)] => Ok(Instruction::Return { value: Some(operand(value)?) }),

        [Token::Word("call"), call @ ..] => parse_call(None, call, line),

        [Token::Word(destination), Token::Operator("="), rest @ ..] => parse_assignment(destination, rest, line),

        _ => Err(unknown_instruction(line)),
    }
}

fn parse_assignment(destination: &str, tokens: &[Token<'_>], line: &str) -> Result<Instruction, TacErrorKind> {
    let destination = variable(destination)?;

    match tokens {
        [Token::Word("call"), call @ ..] => parse_call(Some(destination), call, line),

        [Token::Word(source)] | [Token::Operator("="), Token::Word(source)] => Ok(Instruction::Copy {
            destination,
            source: operand(source)?,
        }),

        // `x = =` is how a copy of the literal 0 comes out of generators that
        // spell copies as `x = = y`.
        [Token::Operator("=")] => Ok(Instruction::Copy {
            destination,
            source: Operand::Integer(0),
        }),

        [operator, Token::Word(value)] if operator_text(operator).is_some() => Ok(Instruction::Unary {
            destination,
            operator: unary_operator(operator)?,
            operand: operand(value)?,
        }),

        [Token::Word(lhs), operator, Token::Word(rhs)] if operator_text(operator).is_some() => Ok(Instruction::Binary {
            destination,
            lhs: operand(lhs)?,
            operator: binary_operator(operator)?,
            rhs: operand(rhs)?,
        }),

        _ => Err(unknown_instruction(line)),
    }
}

fn parse_conditional_jump(condition: &[Token<'_>], location: &str, line: &str) -> Result<Instruction, TacErrorKind> {
    let location = label(location)?;

    match condition {
        [Token::Word(condition)] => Ok(Instruction::JumpConditional {
            condition: operand(condition)?,
            comparison: None,
            location,
        }),

        [Token::Word(lhs), operator, Token::Word(rhs)] if operator_text(operator).is_some() => Ok(Instruction::JumpConditional {
            condition: operand(lhs)?,
            comparison: Some((binary_operator(operator)?, operand(rhs)?)),
            location,
        }),

        _ => Err(unknown_instruction(line)),
    }
}

fn parse_call(destination: Option<String>, tokens: &[Token<'_>], line: &str) -> Result<Instruction, TacErrorKind> {
    let [Token::Word(function), Token::Punctuator('('), arguments @ .., Token::Punctuator(')')] = tokens else {
        return Err(unknown_instruction(line));
    };

    let arguments = if arguments.is_empty() {
        Vec::new()
    } else {
        arguments.split(|token| *token == Token::Punctuator(','))
            .map(|argument| match argument {
                [Token::Word(text)] => operand(text),
                _ => Err(unknown_instruction(line)),
            })
            .collect::<Result<Vec<Operand>, TacErrorKind>>()?
    };

    Ok(Instruction::Call {
        destination,
        function: variable(function)?,
        arguments,
    })
}

fn tokenize(line: &str) -> Result<Vec<Token<'_>>, TacErrorKind> {
    let mut tokens = Vec::new();
    let mut rest = line;

    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            rest = &rest[c.len_utf8()..];
            continue;
        }

        if is_word_character(c) {
            let length = rest.find(|c: char| !is_word_character(c)).unwrap_or(rest.len());
            tokens.push(Token::Word(&rest[..length]));
            rest = &rest[length..];
            continue;
        }

        if matches!(c, '(' | ')' | ',' | ':') {
            tokens.push(Token::Punctuator(c));
            rest = &rest[1..];
            continue;
        }

        let Some(operator) = OPERATORS.iter().find(|operator| rest.starts_with(**operator)) else {
            return Err(TacErrorKind::UnexpectedCharacter(c));
        };

        tokens.push(Token::Operator(*operator));
        rest = &rest[operator.len()..];
    }

    Ok(tokens)
}

fn is_word_character(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_identifier(text: &str) -> bool {
    text.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && !KEYWORDS.contains(&text)
}

fn variable(text: &str) -> Result<String, TacErrorKind> {
    if is_identifier(text) {
        Ok(text.to_string())
    } else {
        Err(TacErrorKind::InvalidOperand { text: text.to_string() })
    }
}

fn label(text: &str) -> Result<Label, TacErrorKind> {
    if is_identifier(text) {
        Ok(Label::new(text))
    } else {
        Err(TacErrorKind::InvalidLabel { text: text.to_string() })
    }
}

fn operand(text: &str) -> Result<Operand, TacErrorKind> {
    if text.starts_with(|c: char| c.is_ascii_digit()) {
        return i64::from_str(text)
            .map(Operand::Integer)
            .map_err(|_| TacErrorKind::InvalidOperand { text: text.to_string() });
    }

    variable(text).map(Operand::Variable)
}

/// The spelling of a token that may act as an operator.
fn operator_text<'s>(token: &Token<'s>) -> Option<&'s str> {
    match token {
        Token::Operator("=") => None,
        Token::Operator(text) => Some(*text),
        Token::Word(text @ ("and" | "or" | "not")) => Some(*text),
        _ => None,
    }
}

fn binary_operator(token: &Token<'_>) -> Result<BinaryOperator, TacErrorKind> {
    let text = operator_text(token).unwrap_or_default();
    BinaryOperator::from_str(text).map_err(|_| TacErrorKind::UnknownOperator { text: text.to_string() })
}

fn unary_operator(token: &Token<'_>) -> Result<UnaryOperator, TacErrorKind> {
    let text = operator_text(token).unwrap_or_default();
    UnaryOperator::from_str(text).map_err(|_| TacErrorKind::UnknownOperator { text: text.to_string() })
}

fn unknown_instruction(line: &str) -> TacErrorKind {
    TacErrorKind::UnknownInstruction { text: line.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn var(name: &str) -> Operand {
        Operand::variable(name)
    }

    #[rstest]
    #[case("x = y", Instruction::Copy { destination: "x".into(), source: var("y") })]
    #[case("x = 42", Instruction::Copy { destination: "x".into(), source: Operand::Integer(42) })]
    #[case("t1 = - a", Instruction::Unary { destination: "t1".into(), operator: UnaryOperator::Negate, operand: var("a") })]
    #[case("t1 = not a", Instruction::Unary { destination: "t1".into(), operator: UnaryOperator::Not, operand: var("a") })]
    #[case("t1 = 10 / 2", Instruction::Binary { destination: "t1".into(), lhs: Operand::Integer(10), operator: BinaryOperator::Divide, rhs: Operand::Integer(2) })]
    #[case("t3 = y>=5", Instruction::Binary { destination: "t3".into(), lhs: var("y"), operator: BinaryOperator::GreaterOrEqual, rhs: Operand::Integer(5) })]
    #[case("c = a and b", Instruction::Binary { destination: "c".into(), lhs: var("a"), operator: BinaryOperator::And, rhs: var("b") })]
    #[case("if t3 goto L1", Instruction::JumpConditional { condition: var("t3"), comparison: None, location: Label::new("L1") })]
    #[case("if t3 == 0 goto L2", Instruction::JumpConditional { condition: var("t3"), comparison: Some((BinaryOperator::Equal, Operand::Integer(0))), location: Label::new("L2") })]
    #[case("goto L1", Instruction::Jump { location: Label::new("L1") })]
    #[case("label L1", Instruction::Label(Label::new("L1")))]
    #[case("L1:", Instruction::Label(Label::new("L1")))]
    #[case("call print(z)", Instruction::Call { destination: None, function: "print".into(), arguments: vec![var("z")] })]
    #[case("call tick()", Instruction::Call { destination: None, function: "tick".into(), arguments: vec![] })]
    #[case("r = call max(a, 3)", Instruction::Call { destination: Some("r".into()), function: "max".into(), arguments: vec![var("a"), Operand::Integer(3)] })]
    #[case("return", Instruction::Return { value: None })]
    #[case("return r", Instruction::Return { value: Some(var("r")) })]
    fn parses_single_instruction(#[case] input: &str, #[case] expected: Instruction) {
        assert_eq!(parse_line(input), Ok(expected));
    }

    #[rstest]
    #[case("x = y +", TacErrorKind::UnknownInstruction { text: "x = y +".into() })]
    #[case("x = y $ z", TacErrorKind::UnexpectedCharacter('$'))]
    #[case("x = 3y", TacErrorKind::InvalidOperand { text: "3y".into() })]
    #[case("goto = 1", TacErrorKind::InvalidOperand { text: "goto".into() })]
    #[case("goto 9", TacErrorKind::InvalidLabel { text: "9".into() })]
    #[case("x = a ! b", TacErrorKind::UnknownOperator { text: "!".into() })]
    #[case("call f(a b)", TacErrorKind::UnknownInstruction { text: "call f(a b)".into() })]
    fn rejects_malformed_instruction(#[case] input: &str, #[case] expected: TacErrorKind) {
        assert_eq!(parse_line(input), Err(expected));
    }

    #[test]
    fn listing_skips_comments_and_blank_lines() {
        let listing = "
            # compute x
            t1 = 10 / 2   # folded later
            x = t1

            call print(x)
        ";

        let instructions = parse_listing(listing).unwrap();
        assert_eq!(instructions.len(), 3);
        assert_eq!(instructions[1].to_string(), "x = t1");
    }

    #[test]
    fn listing_reports_line_numbers() {
        let error = parse_listing("x = 1\n\ny = = = x\n").unwrap_err();
        assert_eq!(
            error,
            TacError::Syntax { line: 3, kind: TacErrorKind::UnknownInstruction { text: "y = = = x".into() } }
        );
    }

    #[rstest]
    #[case("x = = t1", Instruction::Copy { destination: "x".into(), source: var("t1") })]
    #[case("z = = 1", Instruction::Copy { destination: "z".into(), source: Operand::Integer(1) })]
    #[case("z = =", Instruction::Copy { destination: "z".into(), source: Operand::Integer(0) })]
    fn doubled_assignment_is_a_copy(#[case] input: &str, #[case] expected: Instruction) {
        assert_eq!(parse_line(input), Ok(expected));
    }
}
