// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use log::{debug, info, warn};
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, space0, space1},
    multi::many1,
    number::complete::double,
    sequence::{delimited, preceded, separated_pair},
    IResult, Parser,
};

use super::parser::component::DefComponentParser;
use super::parser::net::DefNetParser;
use super::parser::pin::DefPinParser;
use super::parser::row::parse_row;
use super::parser::{DefItemParser, MultiLineParser, ParseError, ParseResult};
use super::preprocessor::{preprocess, Preprocessed};
use super::Def;

/// Sections whose content does not feed placement and is skipped wholesale.
const SKIPPED_SECTIONS: &[&str] = &[
    "SPECIALNETS",
    "VIAS",
    "BLOCKAGES",
    "REGIONS",
    "GROUPS",
    "NONDEFAULTRULES",
    "FILLS",
    "SCANCHAINS",
    "STYLES",
    "PROPERTYDEFINITIONS",
    "PINPROPERTIES",
    "SLOTS",
];

fn point(input: &str) -> IResult<&str, (f64, f64)> {
    delimited(
        (multispace0, tag("("), space0),
        separated_pair(double, space1, double),
        (space0, tag(")")),
    )
    .parse(input)
}

fn parse_die_area(input: &str) -> IResult<&str, Vec<(f64, f64)>> {
    preceded((multispace0, tag("DIEAREA")), many1(point)).parse(input)
}

fn parse_distance_units(input: &str) -> IResult<&str, f64> {
    preceded(
        (
            multispace0,
            tag("UNITS"),
            space1,
            tag("DISTANCE"),
            space1,
            tag("MICRONS"),
            space1,
        ),
        double,
    )
    .parse(input)
}

/// Declared item count from a section header such as `COMPONENTS 12 ;`.
fn declared_count(header: &str) -> Option<usize> {
    header
        .split_whitespace()
        .nth(1)
        .and_then(|n| n.trim_end_matches(';').parse().ok())
}

/// Parse one `- ... ;` section starting at header `start`; returns the items
/// and the index of the `END` statement.
fn parse_items<P: DefItemParser>(
    parser: P,
    pre: &Preprocessed,
    lines: &[&str],
    start: usize,
    section: &str,
) -> ParseResult<(Vec<P::Item>, usize)> {
    let end_pattern = format!("END {section}");
    let multi_parser = MultiLineParser::new(parser).with_debug(log::log_enabled!(log::Level::Debug));

    let (items, end) = multi_parser
        .parse_section(lines, start + 1, &end_pattern)
        .map_err(|e| ParseError::InvalidFormat(pre.locate(start, &format!("{section} section: {e}"))))?;

    match declared_count(lines[start]) {
        Some(declared) if declared != items.len() => warn!(
            "{}",
            pre.locate(
                start,
                &format!("{section} declares {declared} items but {} were found", items.len())
            )
        ),
        _ => {}
    }
    info!("[INFO] {section}: {} items", items.len());
    Ok((items, end))
}

fn skip_section(lines: &[&str], start: usize, section: &str) -> ParseResult<usize> {
    let end_pattern = format!("END {section}");
    lines[start + 1..]
        .iter()
        .position(|line| line.trim() == end_pattern)
        .map(|offset| start + 1 + offset)
        .ok_or(ParseError::UnexpectedEof(end_pattern))
}

/// Parse DEF text into the in-memory [`Def`] structure.
pub fn parse_def(input: &str) -> ParseResult<Def> {
    let pre = preprocess(input);
    let lines = pre.texts();
    let mut def = Def::default();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts.as_slice() {
            ["DESIGN", name, ..] => {
                def.design = name.trim_end_matches(';').to_string();
                debug!("[DBG] DESIGN {}", def.design);
            }
            ["UNITS", ..] => match parse_distance_units(line) {
                Ok((_, microns)) => def.distance_microns = Some(microns),
                Err(_) => {
                    return Err(ParseError::InvalidFormat(
                        pre.locate(i, "malformed UNITS DISTANCE MICRONS statement"),
                    ))
                }
            },
            ["DIEAREA", ..] => match parse_die_area(line) {
                Ok((_, points)) => def.die_area_points = points,
                Err(_) => {
                    return Err(ParseError::InvalidFormat(pre.locate(i, "malformed DIEAREA")))
                }
            },
            ["ROW", ..] => match parse_row(line) {
                Ok((_, row)) => def.rows.push(row),
                Err(_) => {
                    return Err(ParseError::InvalidFormat(pre.locate(i, "malformed ROW statement")))
                }
            },
            ["COMPONENTS", ..] => {
                let (components, end) =
                    parse_items(DefComponentParser, &pre, &lines, i, "COMPONENTS")?;
                def.components = components;
                i = end;
            }
            ["PINS", ..] => {
                let (pins, end) = parse_items(DefPinParser::new(), &pre, &lines, i, "PINS")?;
                def.pins = pins;
                i = end;
            }
            ["NETS", ..] => {
                let (nets, end) = parse_items(DefNetParser::new(), &pre, &lines, i, "NETS")?;
                def.nets = nets;
                i = end;
            }
            ["END", "DESIGN", ..] => break,
            [section, ..] if SKIPPED_SECTIONS.contains(section) => {
                debug!("[DBG] Skipping {section} section");
                i = skip_section(&lines, i, section)?;
            }
            _ => {}
        }
        i += 1;
    }

    Ok(def)
}
