// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! ROW statement parser
//!
//! `ROW rowName siteName origX origY siteOrient [DO numX BY numY [STEP stepX stepY]] ;`

use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::{i32 as parse_i32, multispace0, space1},
    combinator::opt,
    number::complete::double,
    sequence::preceded,
    IResult, Parser,
};

use crate::def::DefRow;

fn token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && c != ';')(input)
}

fn do_by(input: &str) -> IResult<&str, (i32, i32)> {
    let (input, _) = (space1, tag("DO"), space1).parse(input)?;
    let (input, num_x) = parse_i32(input)?;
    let (input, _) = (space1, tag("BY"), space1).parse(input)?;
    let (input, num_y) = parse_i32(input)?;
    Ok((input, (num_x, num_y)))
}

fn step(input: &str) -> IResult<&str, (f64, f64)> {
    let (input, _) = (space1, tag("STEP"), space1).parse(input)?;
    let (input, step_x) = double(input)?;
    let (input, step_y) = preceded(space1, double).parse(input)?;
    Ok((input, (step_x, step_y)))
}

/// Parse one `ROW` statement. Anything after the STEP clause is left unparsed.
pub fn parse_row(input: &str) -> IResult<&str, DefRow> {
    let (input, _) = (multispace0, tag("ROW"), space1).parse(input)?;
    let (input, name) = token(input)?;
    let (input, site) = preceded(space1, token).parse(input)?;
    let (input, x) = preceded(space1, double).parse(input)?;
    let (input, y) = preceded(space1, double).parse(input)?;
    let (input, orient) = preceded(space1, token).parse(input)?;
    let (input, repeat) = opt(do_by).parse(input)?;
    let (input, pitch) = opt(step).parse(input)?;

    let (num_x, num_y) = repeat.unwrap_or((1, 1));
    let (step_x, step_y) = pitch.unwrap_or((0.0, 0.0));

    Ok((
        input,
        DefRow {
            name: name.to_string(),
            site: site.to_string(),
            x,
            y,
            orient: orient.to_string(),
            num_x,
            num_y,
            step_x,
            step_y,
        },
    ))
}
