// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! DEF/LEF Preprocessor
//!
//! Turns raw LEF/DEF text into logical statements:
//! - `#` comments are dropped when the `#` starts the line or follows whitespace
//! - physical lines are merged until a `;` or a standalone `END`/`END name` line
//! - each logical statement remembers the physical lines it came from

/// A single logical statement and the 0-based physical line range it spans.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalLine {
    pub text: String,
    pub first_line: usize,
    pub last_line: usize,
}

/// Logical statements of one LEF/DEF file.
#[derive(Debug, Default)]
pub struct Preprocessed {
    pub lines: Vec<LogicalLine>,
}

impl Preprocessed {
    /// Statement texts, in file order.
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    /// Prefix `message` with the physical line range of statement `index`.
    pub fn locate(&self, index: usize, message: &str) -> String {
        match self.lines.get(index) {
            Some(l) if l.first_line == l.last_line => {
                format!("Line {}: {}", l.first_line + 1, message)
            }
            Some(l) => format!("Lines {}-{}: {}", l.first_line + 1, l.last_line + 1, message),
            None => format!("Statement {}: {}", index + 1, message),
        }
    }
}

pub fn preprocess(content: &str) -> Preprocessed {
    let mut result = Preprocessed::default();
    let mut pending = String::new();
    let mut first_line = 0;
    let mut last_line = 0;

    for (index, raw) in content.lines().enumerate() {
        let stripped = strip_comment(raw).trim();

        if stripped.is_empty() {
            // A blank line closes statements that never see a semicolon (e.g. `END`).
            flush(&mut result, &mut pending, first_line, last_line);
            continue;
        }

        if pending.is_empty() {
            first_line = index;
        } else {
            pending.push(' ');
        }
        pending.push_str(stripped);
        last_line = index;

        if stripped.contains(';') || closes_block(stripped) {
            flush(&mut result, &mut pending, first_line, last_line);
        }
    }

    flush(&mut result, &mut pending, first_line, last_line);
    result
}

fn flush(result: &mut Preprocessed, pending: &mut String, first_line: usize, last_line: usize) {
    if pending.trim().is_empty() {
        pending.clear();
        return;
    }
    result.lines.push(LogicalLine {
        text: std::mem::take(pending),
        first_line,
        last_line,
    });
}

fn closes_block(line: &str) -> bool {
    line == "END" || line.starts_with("END ") || line.starts_with("DESIGN ")
}

fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let start = (0..bytes.len())
        .find(|&i| bytes[i] == b'#' && (i == 0 || bytes[i - 1] == b' ' || bytes[i - 1] == b'\t'));
    match start {
        Some(pos) => &line[..pos],
        None => line,
    }
}
