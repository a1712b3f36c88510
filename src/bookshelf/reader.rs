// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, error, info, warn};
use nom::{
    bytes::complete::{tag, take_till1},
    character::complete::{alphanumeric1, char, space0, space1},
    combinator::opt,
    number::complete::double,
    sequence::preceded,
    IResult, Parser,
};

use super::{BookshelfError, SiteScale, PL_HEADER};
use crate::design::Design;

/// One `.pl` line, in site units.
///
/// `orient` and `fixed` are informational: [`apply_placement`] only moves
/// components and takes fixedness from the design.
#[derive(Debug, Clone, PartialEq)]
pub struct PlEntry {
    pub x: f64,
    pub y: f64,
    pub orient: Option<String>,
    pub fixed: bool,
}

/// Parsed `.pl` content keyed by node name.
#[derive(Debug, Clone, Default)]
pub struct PlacementFile {
    pub entries: HashMap<String, PlEntry>,
}

impl PlacementFile {
    pub fn get(&self, name: &str) -> Option<&PlEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of applying a placement to a design.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateReport {
    pub updated: usize,
    pub skipped_fixed: usize,
    /// Movable components with no entry in the placement, in design order.
    pub missing: Vec<String>,
    /// Components whose entry is not a representable position (`inf`, `NaN`,
    /// out of DBU range). They keep their previous location.
    pub rejected: Vec<String>,
}

// name x y [: orient] [/FIXED]
fn pl_entry(input: &str) -> IResult<&str, (&str, PlEntry)> {
    let (input, name) = preceded(space0, take_till1(|c: char| c.is_whitespace())).parse(input)?;
    let (input, x) = preceded(space1, double).parse(input)?;
    let (input, y) = preceded(space1, double).parse(input)?;
    let (input, orient) =
        opt(preceded((space0, char(':'), space0), alphanumeric1)).parse(input)?;
    let (input, fixed) = opt(preceded(space0, tag("/FIXED"))).parse(input)?;

    Ok((
        input,
        (
            name,
            PlEntry {
                x,
                y,
                orient: orient.map(str::to_string),
                fixed: fixed.is_some(),
            },
        ),
    ))
}

/// Parse `.pl` text. The first line must be the `UCLA pl 1.0` header;
/// malformed entry lines are skipped with a warning.
pub fn parse_pl(content: &str) -> Result<PlacementFile, BookshelfError> {
    let mut lines = content.lines().enumerate();

    let found = lines.next().map(|(_, l)| l.trim()).unwrap_or_default();
    if found != PL_HEADER {
        return Err(BookshelfError::InvalidHeader {
            expected: PL_HEADER.to_string(),
            found: found.to_string(),
        });
    }

    let mut placement = PlacementFile::default();
    for (index, line) in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match pl_entry(trimmed) {
            Ok((_, (name, entry))) => {
                if placement.entries.insert(name.to_string(), entry).is_some() {
                    warn!("Line {}: {name} placed twice, keeping the later entry", index + 1);
                }
            }
            Err(_) => warn!("Line {}: cannot parse placement entry: {trimmed}", index + 1),
        }
    }
    Ok(placement)
}

pub fn read_pl<P: AsRef<Path>>(path: P) -> Result<PlacementFile, BookshelfError> {
    let path = path.as_ref();
    info!("[LOAD] Reading bookshelf pl file: {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| BookshelfError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let placement = parse_pl(&content)?;
    info!("[INFO] {} placement entries", placement.len());
    Ok(placement)
}

/// Move every non-fixed component to its entry in `placement`.
///
/// Fixed components are never touched. A movable component without an entry
/// is logged once, left as it was and listed in [`UpdateReport::missing`];
/// one whose entry cannot be converted to DBU goes to [`UpdateReport::rejected`].
pub fn apply_placement(
    design: &mut Design,
    placement: &PlacementFile,
    scale: SiteScale,
) -> UpdateReport {
    let mut report = UpdateReport::default();

    for component in design.components_mut() {
        if component.is_fixed {
            report.skipped_fixed += 1;
            continue;
        }
        match placement.get(&component.name) {
            Some(entry) => match scale.to_dbu(entry.x, entry.y) {
                Some((x, y)) => {
                    debug!(
                        "[DBG] {}: ({}, {}) -> ({x}, {y})",
                        component.name, component.x, component.y
                    );
                    component.x = x;
                    component.y = y;
                    component.is_placed = true;
                    report.updated += 1;
                }
                None => {
                    error!(
                        "{}: placement ({}, {}) is out of range, keeping ({}, {})",
                        component.name, entry.x, entry.y, component.x, component.y
                    );
                    report.rejected.push(component.name.clone());
                }
            },
            None => {
                error!("{} not found in placement", component.name);
                report.missing.push(component.name.clone());
            }
        }
    }

    info!(
        "[INFO] Placement applied: {} updated, {} fixed, {} missing, {} rejected",
        report.updated,
        report.skipped_fixed,
        report.missing.len(),
        report.rejected.len()
    );
    report
}

/// Read `path` and apply it to `design` using the design's own site pitch.
/// Nothing is modified unless the whole file was read and its header accepted.
pub fn update_design<P: AsRef<Path>>(
    design: &mut Design,
    path: P,
) -> Result<UpdateReport, BookshelfError> {
    let scale = SiteScale::from_design(design)?;
    let placement = read_pl(path)?;
    Ok(apply_placement(design, &placement, scale))
}
