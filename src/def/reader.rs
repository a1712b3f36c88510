// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::fs;
use std::path::Path;

use log::{info, warn};

use super::{def_parser::parse_def, Def};
use crate::error::ReadError;

pub struct DefReader;

impl DefReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<Def, ReadError> {
        let path = path.as_ref();
        info!("[LOAD] Loading DEF file: {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| ReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("[FILE] DEF file size: {} bytes", content.len());

        let def = parse_def(&content).map_err(|e| ReadError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        info!(
            "[PASS] DEF parsed: design {}, {} rows, {} components, {} pins, {} nets",
            def.design,
            def.rows.len(),
            def.components.len(),
            def.pins.len(),
            def.nets.len()
        );
        if def.die_area_points.is_empty() {
            warn!("{} declares no DIEAREA", path.display());
        }
        Ok(def)
    }
}

impl Default for DefReader {
    fn default() -> Self {
        Self::new()
    }
}
