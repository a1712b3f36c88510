// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! One LEF/DEF run: loaded libraries, the design built from them, and the
//! latest flip-flop classification.

use std::path::{Path, PathBuf};

use log::info;

use crate::bookshelf::reader::{update_design, UpdateReport};
use crate::bookshelf::writer::BookshelfWriter;
use crate::bookshelf::BookshelfError;
use crate::def::reader::DefReader;
use crate::design::{Design, DesignError};
use crate::error::ReadError;
use crate::flipflop::{Classification, FlipFlop, FlipFlopClassifier, MultiBitFlipFlop};
use crate::lef::reader::LefReader;
use crate::lef::Lef;
use crate::rows::{extract_row_infos, RowInfo};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Design(#[from] DesignError),
    #[error(transparent)]
    Bookshelf(#[from] BookshelfError),
    #[error("no design loaded; read a DEF file first")]
    NoDesign,
}

#[derive(Debug, Default)]
pub struct LefDefSession {
    libraries: Vec<Lef>,
    design: Option<Design>,
    classifier: FlipFlopClassifier,
    classification: Classification,
}

impl LefDefSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classifier(classifier: FlipFlopClassifier) -> Self {
        Self {
            classifier,
            ..Self::default()
        }
    }

    /// Add a LEF library. Must happen before [`read_def`](Self::read_def).
    pub fn read_lef<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SessionError> {
        let lef = LefReader::new().read(path)?;
        self.libraries.push(lef);
        Ok(())
    }

    /// Read a DEF, build the design against the loaded libraries and classify it.
    pub fn read_def<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SessionError> {
        let def = DefReader::new().read(path)?;
        self.load(Design::from_lef_def(&self.libraries, &def)?);
        Ok(())
    }

    /// Replace the current design and classify it.
    pub fn load(&mut self, design: Design) {
        self.design = Some(design);
        self.extract_flip_flops();
    }

    /// Recompute the flip-flop classification from the current design.
    pub fn extract_flip_flops(&mut self) {
        self.classification = match &self.design {
            Some(design) => self.classifier.classify(design),
            None => Classification::default(),
        };
        info!(
            "[INFO] {} flip-flops, {} multi-bit groups ({} bits)",
            self.classification.ffs.len(),
            self.classification.mbffs.len(),
            self.classification.mbff_bit_count()
        );
    }

    pub fn ffs(&self) -> &[FlipFlop] {
        &self.classification.ffs
    }

    pub fn mbffs(&self) -> &[MultiBitFlipFlop] {
        &self.classification.mbffs
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn design(&self) -> Option<&Design> {
        self.design.as_ref()
    }

    fn loaded(&self) -> Result<&Design, SessionError> {
        self.design.as_ref().ok_or(SessionError::NoDesign)
    }

    pub fn row_infos(&self) -> Result<Vec<RowInfo>, SessionError> {
        Ok(extract_row_infos(self.loaded()?))
    }

    /// Export the design as `<prefix>.{aux,nodes,nets,wts,scl,pl}`.
    pub fn write_bookshelf<P: AsRef<Path>>(&self, prefix: P) -> Result<Vec<PathBuf>, SessionError> {
        let writer = BookshelfWriter::new(self.loaded()?)?;
        Ok(writer.write_all(prefix.as_ref())?)
    }

    /// Apply a `.pl` solution to the design. The classification keeps the
    /// positions it was computed with until the next
    /// [`extract_flip_flops`](Self::extract_flip_flops).
    pub fn update_from_pl<P: AsRef<Path>>(&mut self, path: P) -> Result<UpdateReport, SessionError> {
        let design = self.design.as_mut().ok_or(SessionError::NoDesign)?;
        Ok(update_design(design, path)?)
    }
}
