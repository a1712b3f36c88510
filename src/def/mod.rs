// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefPlacement {
    pub placement_type: String, // PLACED, FIXED, COVER
    pub x: f64,
    pub y: f64,
    pub orientation: String, // N, S, E, W, FN, FS, FE, FW
}

impl DefPlacement {
    pub fn is_fixed(&self) -> bool {
        self.placement_type == "FIXED" || self.placement_type == "COVER"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefComponent {
    pub name: String,
    pub macro_name: String,
    pub placement: Option<DefPlacement>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefPin {
    pub name: String,
    pub net: String,
    pub direction: String,
    pub use_type: String,
    pub placement: Option<DefPlacement>,
}

/// One `( instance pin )` entry of a net; `instance` is `PIN` for top-level pins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefConnection {
    pub instance: String,
    pub pin: String,
}

impl DefConnection {
    pub fn is_io_pin(&self) -> bool {
        self.instance == "PIN"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefNet {
    pub name: String,
    pub connections: Vec<DefConnection>,
    pub use_type: String,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefRow {
    pub name: String,
    pub site: String,
    pub x: f64,
    pub y: f64,
    pub orient: String,
    pub num_x: i32,
    pub num_y: i32,
    pub step_x: f64,
    pub step_y: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Def {
    pub design: String,
    /// `UNITS DISTANCE MICRONS` value, when the design declares one.
    pub distance_microns: Option<f64>,
    pub die_area_points: Vec<(f64, f64)>,
    pub rows: Vec<DefRow>,
    pub components: Vec<DefComponent>,
    pub pins: Vec<DefPin>,
    pub nets: Vec<DefNet>,
}

pub mod def_parser;
pub mod parser;
pub mod preprocessor;
pub mod reader;
