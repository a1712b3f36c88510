// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Unified parsing framework for DEF sections
//!
//! Every `- NAME ... ;` item in COMPONENTS, PINS and NETS is parsed by a
//! [`DefItemParser`] driven by [`MultiLineParser`] over preprocessed
//! logical lines, so each item arrives as one complete statement.

pub mod common;
pub mod component;
pub mod net;
pub mod pin;
pub mod row;

use log::debug;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Error types that can occur during parsing
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Unexpected end of file while looking for {0}")]
    UnexpectedEof(String),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Result of handling a continuation line
#[derive(Debug, PartialEq)]
pub enum ContinuationResult {
    /// Continue processing more lines
    Continue,
    /// Current item is complete, move to next
    Complete,
    /// Hit the start of next item
    NextItem,
    /// Error occurred
    Error(String),
}

/// Generic trait for parsing specific item types in DEF files
pub trait DefItemParser {
    /// The type of item this parser produces
    type Item;
    /// The context type used during parsing
    type Context;

    /// Parse the header of an item (e.g., "- PINNAME + NET ...")
    fn parse_header(&self, line: &str) -> Option<Self::Context>;

    /// Process a line belonging to the current item
    fn parse_continuation(&self, context: &mut Self::Context, line: &str) -> ContinuationResult;

    /// Finalize the item from the accumulated context
    fn finalize(&self, context: Self::Context) -> ParseResult<Self::Item>;

    /// Get the name of this item type for debugging
    fn item_name() -> &'static str;
}

pub struct MultiLineParser<P: DefItemParser> {
    parser: P,
    debug_mode: bool,
}

impl<P: DefItemParser> MultiLineParser<P> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            debug_mode: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug_mode = debug;
        self
    }

    /// Parse items from `start_index` until the line matching `end_pattern`.
    ///
    /// Returns the items and the index of the end line. Running out of lines
    /// before `end_pattern` is an error.
    pub fn parse_section(
        &self,
        lines: &[&str],
        start_index: usize,
        end_pattern: &str,
    ) -> ParseResult<(Vec<P::Item>, usize)> {
        let mut items = Vec::new();
        let mut i = start_index;

        if self.debug_mode {
            debug!(
                "[DBG] Starting {} section parsing at line {}",
                P::item_name(),
                start_index
            );
        }

        while i < lines.len() {
            let line = lines[i].trim();

            if line.starts_with(end_pattern) {
                if self.debug_mode {
                    debug!(
                        "[DBG] Completed {} section: {} items parsed",
                        P::item_name(),
                        items.len()
                    );
                }
                return Ok((items, i));
            }

            if line.is_empty() {
                i += 1;
                continue;
            }

            match self.parser.parse_header(line) {
                Some(mut context) => {
                    if self.debug_mode {
                        debug!(
                            "[DBG] Parsing {} #{}: {}",
                            P::item_name(),
                            items.len() + 1,
                            line
                        );
                    }
                    // Preprocessed lines hold the whole item, header included.
                    match self.parser.parse_continuation(&mut context, line) {
                        ContinuationResult::Error(msg) => {
                            return Err(ParseError::InvalidFormat(msg));
                        }
                        ContinuationResult::Continue
                        | ContinuationResult::Complete
                        | ContinuationResult::NextItem => {
                            items.push(self.parser.finalize(context)?);
                        }
                    }
                }
                None => {
                    if self.debug_mode {
                        debug!("[DBG] Skipping non-item line: {line}");
                    }
                }
            }
            i += 1;
        }

        Err(ParseError::UnexpectedEof(end_pattern.to_string()))
    }
}
