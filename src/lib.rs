// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! LEF/DEF to Bookshelf bridge
//!
//! Loads LEF libraries and a DEF design, classifies flip-flops and multi-bit
//! flip-flop groups from macro pin names, exports the design in the Bookshelf
//! placement format and applies a Bookshelf placement back onto the design.

pub mod bookshelf;
pub mod def;
pub mod design;
pub mod error;
pub mod export;
pub mod flipflop;
pub mod lef;
pub mod rows;
pub mod session;

// Re-export commonly used types
pub use bookshelf::{BookshelfError, SiteScale};
pub use design::{Design, DesignError, Macro, PinDirection, Placement};
pub use flipflop::{extract_group_name, FlipFlop, FlipFlopClassifier, FlipFlopRules, MultiBitFlipFlop};
pub use rows::{extract_row_infos, RowInfo};
pub use session::{LefDefSession, SessionError};
