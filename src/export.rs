// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::io::Write;
use std::path::Path;

use csv::Writer;
use serde::Serialize;

use crate::design::Design;
use crate::flipflop::{Classification, FlipFlop, FlipFlopKind};

#[derive(Debug, Serialize)]
pub struct FlipFlopCsvRecord {
    #[serde(rename = "Instance")]
    pub instance: String,
    #[serde(rename = "Kind")]
    pub kind: FlipFlopKind,
    #[serde(rename = "Group")]
    pub group: String,
    #[serde(rename = "Macro")]
    pub macro_name: String,
    #[serde(rename = "X")]
    pub x: i64,
    #[serde(rename = "Y")]
    pub y: i64,
}

fn flip_flop_to_csv_record(
    design: &Design,
    flip_flop: &FlipFlop,
    kind: FlipFlopKind,
    group: &str,
) -> FlipFlopCsvRecord {
    let macro_name = design
        .component(&flip_flop.name)
        .map(|c| c.macro_name.clone())
        .unwrap_or_default();
    FlipFlopCsvRecord {
        instance: flip_flop.name.clone(),
        kind,
        group: group.to_string(),
        macro_name,
        x: flip_flop.x,
        y: flip_flop.y,
    }
}

/// Write single-bit flip-flops, then every multi-bit group's bits, as CSV.
pub fn write_flip_flops_csv<W: Write>(
    design: &Design,
    classification: &Classification,
    out: W,
) -> csv::Result<()> {
    let mut writer = Writer::from_writer(out);

    for ff in &classification.ffs {
        writer.serialize(flip_flop_to_csv_record(design, ff, FlipFlopKind::SingleBit, ""))?;
    }
    for mbff in &classification.mbffs {
        for bit in &mbff.bits {
            writer.serialize(flip_flop_to_csv_record(
                design,
                bit,
                FlipFlopKind::MultiBit,
                &mbff.group,
            ))?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Export the classification to a CSV file
pub fn export_flip_flops_to_csv<P: AsRef<Path>>(
    design: &Design,
    classification: &Classification,
    file_path: P,
) -> csv::Result<()> {
    let file = std::fs::File::create(file_path)?;
    write_flip_flops_csv(design, classification, file)
}
