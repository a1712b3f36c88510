// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! PIN parser implementation for DEF files

use super::common::*;
use super::{ContinuationResult, DefItemParser, ParseResult};
use crate::def::{DefPin, DefPlacement};

/// Context for parsing a single PIN
#[derive(Debug)]
pub struct PinContext {
    pub name: String,
    pub net: String,
    pub direction: String,
    pub use_type: String,
    pub placement: Option<DefPlacement>,
}

impl PinContext {
    pub fn new(name: String) -> Self {
        Self {
            name,
            net: String::new(),
            direction: String::new(),
            use_type: String::new(),
            placement: None,
        }
    }
}

/// PIN parser for DEF files
pub struct DefPinParser;

impl DefPinParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_line_attributes(&self, context: &mut PinContext, line: &str) {
        if let Some(net) = extract_keyword_value(line, "NET") {
            context.net = net;
        }
        if let Some(direction) = extract_keyword_value(line, "DIRECTION") {
            context.direction = direction;
        }
        if let Some(use_type) = extract_keyword_value(line, "USE") {
            context.use_type = use_type;
        }
        // Multi-port pins keep the first placement.
        if context.placement.is_none() {
            context.placement = parse_placement(line);
        }
    }
}

impl Default for DefPinParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DefItemParser for DefPinParser {
    type Item = DefPin;
    type Context = PinContext;

    fn parse_header(&self, line: &str) -> Option<Self::Context> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            ["-", name, ..] => Some(PinContext::new(clean_semicolon(name).to_string())),
            _ => None,
        }
    }

    fn parse_continuation(&self, context: &mut Self::Context, line: &str) -> ContinuationResult {
        let trimmed = line.trim();

        if is_section_end(trimmed, "PINS") {
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
        Ok(DefPin {
            name: context.name,
            net: context.net,
            direction: context.direction,
            use_type: context.use_type,
            placement: context.placement,
        })
    }

    fn item_name() -> &'static str {
        "PIN"
    }
}
