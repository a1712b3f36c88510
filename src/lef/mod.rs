// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LefPin {
    pub name: String,
    pub direction: String,
    pub use_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LefSite {
    pub name: String,
    pub class: String,
    pub size_x: f64,
    pub size_y: f64,
    pub symmetry: Vec<String>, // X, Y, R90
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LefMacro {
    pub name: String,
    pub class: String,
    pub site: String,
    pub size_x: f64, // microns
    pub size_y: f64,
    pub pins: Vec<LefPin>,
}

impl LefMacro {
    pub fn pin(&self, name: &str) -> Option<&LefPin> {
        self.pins.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lef {
    /// `UNITS DATABASE MICRONS` value, when the library declares one.
    pub database_microns: Option<f64>,
    pub sites: Vec<LefSite>,
    pub macros: Vec<LefMacro>,
}

pub mod parser;
pub mod reader;
