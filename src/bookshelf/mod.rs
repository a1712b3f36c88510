// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Bookshelf placement exchange
//!
//! [`writer`] exports a [`Design`] as `.nodes`, `.nets`, `.wts`, `.scl`, `.pl`
//! and `.aux` files in site units; [`reader`] loads a `.pl` solution and moves
//! the design's movable components accordingly. Both directions share one
//! [`SiteScale`] so that writer output converts back exactly.

pub mod reader;
pub mod writer;

use std::path::PathBuf;

use crate::design::Design;

pub const NODES_HEADER: &str = "UCLA nodes 1.0";
pub const NETS_HEADER: &str = "UCLA nets 1.0";
pub const WTS_HEADER: &str = "UCLA wts 1.0";
pub const SCL_HEADER: &str = "UCLA scl 1.0";
pub const PL_HEADER: &str = "UCLA pl 1.0";

/// Second line of every generated file. Kept constant so output is reproducible.
pub const CREATED_BY: &str = concat!("# Created by lefdef-bookshelf ", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum BookshelfError {
    #[error("design has no site with a positive width and height")]
    MissingSiteGeometry,
    #[error("bad placement header: expected \"{expected}\", found \"{found}\"")]
    InvalidHeader { expected: String, found: String },
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {} bookshelf file(s): {}", .failures.len(), format_failures(.failures))]
    Export { failures: Vec<(PathBuf, std::io::Error)> },
}

fn format_failures(failures: &[(PathBuf, std::io::Error)]) -> String {
    failures
        .iter()
        .map(|(path, e)| format!("{}: {e}", path.display()))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Integer division rounding to nearest, halves away from zero.
pub fn div_round(value: i64, divisor: i64) -> i64 {
    let quotient = value / divisor;
    let remainder = value % divisor;
    if 2 * remainder.abs() >= divisor.abs() {
        quotient + value.signum() * divisor.signum()
    } else {
        quotient
    }
}

/// Site pitch in DBU along each axis, taken from the smallest site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteScale {
    pub x_pitch: i64,
    pub y_pitch: i64,
}

impl SiteScale {
    pub fn new(x_pitch: i64, y_pitch: i64) -> Result<Self, BookshelfError> {
        if x_pitch <= 0 || y_pitch <= 0 {
            return Err(BookshelfError::MissingSiteGeometry);
        }
        Ok(Self { x_pitch, y_pitch })
    }

    pub fn from_design(design: &Design) -> Result<Self, BookshelfError> {
        let x_pitch = design.sites().map(|s| s.width).filter(|&w| w > 0).min();
        let y_pitch = design.sites().map(|s| s.height).filter(|&h| h > 0).min();
        match (x_pitch, y_pitch) {
            (Some(x), Some(y)) => Self::new(x, y),
            _ => Err(BookshelfError::MissingSiteGeometry),
        }
    }

    pub fn x_to_sites(&self, dbu: i64) -> i64 {
        div_round(dbu, self.x_pitch)
    }

    pub fn y_to_sites(&self, dbu: i64) -> i64 {
        div_round(dbu, self.y_pitch)
    }

    /// Site coordinates back to DBU. Fractional input is rounded to the nearest site.
    ///
    /// `None` for non-finite values or positions that do not fit in `i64` DBU.
    pub fn to_dbu(&self, x_sites: f64, y_sites: f64) -> Option<(i64, i64)> {
        Some((
            sites_to_dbu(x_sites, self.x_pitch)?,
            sites_to_dbu(y_sites, self.y_pitch)?,
        ))
    }
}

fn sites_to_dbu(sites: f64, pitch: i64) -> Option<i64> {
    let sites = sites.round();
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if !sites.is_finite() || sites < i64::MIN as f64 || sites >= i64::MAX as f64 {
        return None;
    }
    (sites as i64).checked_mul(pitch)
}
