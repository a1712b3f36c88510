// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Common token helpers for DEF statements

use crate::def::DefPlacement;

/// Parse coordinate pair from tokens like "(" "100" "200" ")"
pub fn parse_coordinate_pair(parts: &[&str], start_index: usize) -> Option<(f64, f64)> {
    match parts.get(start_index..start_index + 4)? {
        ["(", x, y, ")"] => Some((x.parse().ok()?, y.parse().ok()?)),
        _ => None,
    }
}

/// Extract value after a keyword (e.g., "+ DIRECTION INPUT" -> Some("INPUT"))
pub fn extract_keyword_value(line: &str, keyword: &str) -> Option<String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    parts
        .windows(2)
        .find(|w| w[0] == keyword)
        .map(|w| clean_semicolon(w[1]).to_string())
        .filter(|v| !v.is_empty())
}

pub fn clean_semicolon(s: &str) -> &str {
    s.trim_end_matches(';')
}

/// Check if a line starts a new item ("- NAME ...")
pub fn is_item_header(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('-') && trimmed.chars().nth(1).is_some_and(|c| c.is_whitespace())
}

/// Check if a line closes the named section ("END NETS")
pub fn is_section_end(line: &str, section_name: &str) -> bool {
    let mut parts = line.split_whitespace();
    parts.next() == Some("END") && parts.next() == Some(section_name)
}

/// Parse the first `PLACED|FIXED|COVER ( x y ) orient` found in `line`.
pub fn parse_placement(line: &str) -> Option<DefPlacement> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    parts.iter().enumerate().find_map(|(i, part)| {
        if !matches!(*part, "PLACED" | "FIXED" | "COVER") {
            return None;
        }
        let (x, y) = parse_coordinate_pair(&parts, i + 1)?;
        let orientation = parts
            .get(i + 5)
            .map(|o| clean_semicolon(o))
            .filter(|o| !o.is_empty() && *o != "+")
            .unwrap_or("N")
            .to_string();
        Some(DefPlacement {
            placement_type: part.to_string(),
            x,
            y,
            orientation,
        })
    })
}
