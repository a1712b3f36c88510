// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! NET parser implementation for DEF files

use log::debug;

use super::common::*;
use super::{ContinuationResult, DefItemParser, ParseResult};
use crate::def::{DefConnection, DefNet};

/// Context for parsing a single NET
#[derive(Debug)]
pub struct NetContext {
    pub name: String,
    pub connections: Vec<DefConnection>,
    pub use_type: String,
    pub weight: Option<f64>,
}

impl NetContext {
    pub fn new(name: String) -> Self {
        Self {
            name,
            connections: Vec::new(),
            use_type: String::new(),
            weight: None,
        }
    }
}

/// NET parser for DEF files
pub struct DefNetParser;

impl DefNetParser {
    pub fn new() -> Self {
        Self
    }

    /// Collect `( INSTANCE PIN )` pairs up to the first `+` attribute.
    fn parse_connections_in_line(&self, context: &mut NetContext, line: &str) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let mut i = 0;

        while i < parts.len() {
            if parts[i] == "+" || parts[i] == ";" {
                break;
            }

            match parts.get(i..i + 4) {
                Some(["(", instance, pin, ")"]) => {
                    // Coordinates in routing statements look the same; skip them.
                    let is_coordinate =
                        instance.parse::<f64>().is_ok() && pin.parse::<f64>().is_ok();
                    if *instance == "*" {
                        debug!("[DBG]   Skipping wildcard connection ( * {pin} )");
                    } else if !is_coordinate {
                        context.connections.push(DefConnection {
                            instance: instance.to_string(),
                            pin: pin.to_string(),
                        });
                    }
                    i += 4;
                }
                _ => i += 1,
            }
        }
    }

    fn parse_line_attributes(&self, context: &mut NetContext, line: &str) {
        self.parse_connections_in_line(context, line);

        if let Some(use_type) = extract_keyword_value(line, "USE") {
            context.use_type = use_type;
        }
        if let Some(weight) = extract_keyword_value(line, "WEIGHT") {
            context.weight = weight.parse::<f64>().ok();
        }
    }
}

impl Default for DefNetParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DefItemParser for DefNetParser {
    type Item = DefNet;
    type Context = NetContext;

    fn parse_header(&self, line: &str) -> Option<Self::Context> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            ["-", name, ..] => Some(NetContext::new(clean_semicolon(name).to_string())),
            _ => None,
        }
    }

    fn parse_continuation(&self, context: &mut Self::Context, line: &str) -> ContinuationResult {
        let trimmed = line.trim();

        if is_section_end(trimmed, "NETS") {
            return ContinuationResult::NextItem;
        }

        self.parse_line_attributes(context, trimmed);
        if trimmed.contains(';') {
            ContinuationResult::Complete
        } else {
            ContinuationResult::Continue
        }
    }

    fn finalize(&self, context: Self::Context) -> ParseResult<Self::Item> {
        Ok(DefNet {
            name: context.name,
            connections: context.connections,
            use_type: context.use_type,
            weight: context.weight,
        })
    }

    fn item_name() -> &'static str {
        "NET"
    }
}
