// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Simplified placement-row summary.

use serde::Serialize;

use crate::design::Design;

/// One placement row, in DBU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowInfo {
    pub y: i64,
    pub orig_x: i64,
    pub num_sites: i64,
    pub site_step: i64,
}

/// Summarise the design's rows, in row order.
pub fn extract_row_infos(design: &Design) -> Vec<RowInfo> {
    design
        .rows()
        .iter()
        .map(|row| RowInfo {
            y: row.y,
            orig_x: row.x,
            num_sites: row.num_x,
            site_step: row.step_x,
        })
        .collect()
}
