//! Workload scripts using nom
//!
//! Script format, one operation per line:
//! ```text
//! # comment
//! range 0 2
//! update 1 10
//! ```
//!
//! Keywords are case-insensitive. Blank lines and `#` comments are skipped.

use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, map, map_res, opt, recognize},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};

/// A single harness operation against the backing sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Read request: sum over `[l, r]`
    Range {
        /// Left bound (inclusive)
        l: usize,
        /// Right bound (inclusive)
        r: usize,
    },
    /// Mutation request: `sequence[index] = value`
    Update {
        /// Position to overwrite
        index: usize,
        /// New element value
        value: i64,
    },
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Range { l, r } => write!(f, "range {} {}", l, r),
            Op::Update { index, value } => write!(f, "update {} {}", index, value),
        }
    }
}

impl FromStr for Op {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (_, op) = all_consuming(parse_op)(s.trim())?;
        Ok(op)
    }
}

fn index(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(input)
}

fn value(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), str::parse::<i64>)(input)
}

fn range_op(input: &str) -> IResult<&str, Op> {
    map(
        tuple((tag_no_case("range"), preceded(space1, index), preceded(space1, index))),
        |(_, l, r)| Op::Range { l, r },
    )(input)
}

fn update_op(input: &str) -> IResult<&str, Op> {
    map(
        tuple((tag_no_case("update"), preceded(space1, index), preceded(space1, value))),
        |(_, index, value)| Op::Update { index, value },
    )(input)
}

/// Parse a single operation, allowing surrounding spaces
///
/// Returns the unparsed remainder alongside the operation
pub fn parse_op(input: &str) -> IResult<&str, Op> {
    delimited(space0, alt((range_op, update_op)), space0)(input)
}

/// Parse a whole workload script
///
/// A malformed line fails the whole script with its 1-based line number.
pub fn parse_script(input: &str) -> Result<Vec<Op>> {
    let mut ops = Vec::new();

    for (lineno, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match all_consuming(parse_op)(line) {
            Ok((_, op)) => ops.push(op),
            Err(_) => {
                return Err(Error::Parse(format!(
                    "line {}: invalid operation '{}'",
                    lineno + 1,
                    line
                )))
            }
        }
    }

    Ok(ops)
}

/// Render operations back into script form
pub fn render_script(ops: &[Op]) -> String {
    let mut out = String::with_capacity(ops.len() * 16);
    for op in ops {
        out.push_str(&op.to_string());
        out.push('\n');
    }
    out
}
