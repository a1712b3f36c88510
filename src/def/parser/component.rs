// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! COMPONENT parser implementation for DEF files

use super::common::{clean_semicolon, is_item_header, parse_coordinate_pair};
use super::{ContinuationResult, DefItemParser, ParseResult};
use crate::def::{DefComponent, DefPlacement};

/// Context for parsing a single component
#[derive(Debug, Clone)]
pub struct ComponentContext {
    pub name: String,
    pub macro_name: String,
    pub placement: Option<DefPlacement>,
    pub source: Option<String>,
}

impl ComponentContext {
    pub fn new(name: String, macro_name: String) -> Self {
        Self {
            name,
            macro_name,
            placement: None,
            source: None,
        }
    }
}

/// Parser for DEF COMPONENTS section
pub struct DefComponentParser;

impl DefItemParser for DefComponentParser {
    type Item = DefComponent;
    type Context = ComponentContext;

    fn parse_header(&self, line: &str) -> Option<Self::Context> {
        // Component header: "- COMP_NAME MACRO_NAME"
        let trimmed = line.trim();
        if !is_item_header(trimmed) {
            return None;
        }

        let parts: Vec<&str> = trimmed[1..].split_whitespace().collect();
        if parts.len() < 2 || parts[1] == "+" {
            return None;
        }

        Some(ComponentContext::new(
            parts[0].to_string(),
            clean_semicolon(parts[1]).to_string(),
        ))
    }

    fn parse_continuation(&self, context: &mut Self::Context, line: &str) -> ContinuationResult {
        let trimmed = line.trim();
        self.parse_component_line(context, trimmed);
        if trimmed.ends_with(';') {
            ContinuationResult::Complete
        } else {
            ContinuationResult::Continue
        }
    }

    fn finalize(&self, context: Self::Context) -> ParseResult<Self::Item> {
        Ok(DefComponent {
            name: context.name,
            macro_name: context.macro_name,
            placement: context.placement,
            source: context.source,
        })
    }

    fn item_name() -> &'static str {
        "COMPONENT"
    }
}

impl DefComponentParser {
    fn parse_component_line(&self, context: &mut ComponentContext, line: &str) {
        let parts: Vec<&str> = line.trim_end_matches(';').split_whitespace().collect();

        for (i, part) in parts.iter().enumerate() {
            match *part {
                "PLACED" | "FIXED" | "COVER" => {
                    if let Some((x, y)) = parse_coordinate_pair(&parts, i + 1) {
                        let orientation = parts
                            .get(i + 5)
                            .filter(|o| **o != "+")
                            .unwrap_or(&"N")
                            .to_string();
                        context.placement = Some(DefPlacement {
                            placement_type: part.to_string(),
                            x,
                            y,
                            orientation,
                        });
                    }
                }
                "UNPLACED" => context.placement = None,
                "SOURCE" => {
                    if let Some(source) = parts.get(i + 1) {
                        context.source = Some(source.to_string());
                    }
                }
                _ => {}
            }
        }
    }
}
