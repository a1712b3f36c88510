// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::fs;
use std::path::Path;

use log::{info, warn};

use super::{parser::parse_lef, Lef};
use crate::error::ReadError;

pub struct LefReader;

impl LefReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<Lef, ReadError> {
        let path = path.as_ref();
        info!("[LOAD] Loading LEF file: {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| ReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("[FILE] LEF file size: {} bytes", content.len());

        let lef = parse_lef(&content).map_err(|e| ReadError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let total_pins: usize = lef.macros.iter().map(|m| m.pins.len()).sum();
        info!(
            "[PASS] LEF parsed: {} sites, {} macros, {} pins",
            lef.sites.len(),
            lef.macros.len(),
            total_pins
        );
        if lef.database_microns.is_none() {
            warn!("{} declares no UNITS DATABASE MICRONS", path.display());
        }
        Ok(lef)
    }
}

impl Default for LefReader {
    fn default() -> Self {
        Self::new()
    }
}
