// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;

use lefdef_bookshelf::export::export_flip_flops_to_csv;
use lefdef_bookshelf::{FlipFlop, LefDefSession, MultiBitFlipFlop};

/// Read LEF/DEF, report flip-flops and exchange placements in Bookshelf format
#[derive(Parser, Debug)]
#[command(version)]
struct ProgramOptions {
    /// LEF input files, comma separated or repeated
    #[arg(long, value_delimiter = ',', required = true)]
    lef: Vec<PathBuf>,
    /// DEF input file
    #[arg(long)]
    def: PathBuf,
    /// Write <PREFIX>.aux/.nodes/.nets/.wts/.scl/.pl
    #[arg(long, value_name = "PREFIX")]
    bookshelf: Option<PathBuf>,
    /// Apply a Bookshelf .pl placement to the design
    #[arg(long, value_name = "PL")]
    update_pl: Option<PathBuf>,
    /// Write the flip-flop classification as CSV
    #[arg(long, value_name = "CSV")]
    ff_csv: Option<PathBuf>,
    /// Number of rows and sample flip-flops to print
    #[arg(long, default_value_t = 10)]
    rows: usize,
    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Leading groups with their bits, holding at most `limit` bits in total.
fn mbff_sample(groups: &[MultiBitFlipFlop], limit: usize) -> Vec<(&MultiBitFlipFlop, &[FlipFlop])> {
    let mut left = limit;
    let mut sample = Vec::new();
    for group in groups {
        if left == 0 {
            break;
        }
        let take = group.bits.len().min(left);
        sample.push((group, &group.bits[..take]));
        left -= take;
    }
    sample
}

fn print_summary(session: &LefDefSession, limit: usize) -> Result<(), Box<dyn Error>> {
    let rows = session.row_infos()?;
    println!("[INFO] Rows: {}", rows.len());
    for (i, row) in rows.iter().take(limit).enumerate() {
        println!(
            "  Row {i}: y={}, orig_x={}, num_sites={}, site_step={}",
            row.y, row.orig_x, row.num_sites, row.site_step
        );
    }

    let macro_of = |name: &str| {
        session
            .design()
            .and_then(|d| d.component(name))
            .map(|c| c.macro_name.clone())
            .unwrap_or_default()
    };

    let ffs = session.ffs();
    println!("[INFO] Single-bit flip-flops: {}", ffs.len());
    for ff in ffs.iter().take(limit) {
        println!("  {} ({}) at ({}, {})", ff.name, macro_of(&ff.name), ff.x, ff.y);
    }

    let mbffs = session.mbffs();
    println!(
        "[INFO] Multi-bit flip-flop groups: {} ({} bits)",
        mbffs.len(),
        session.classification().mbff_bit_count()
    );
    for (group, bits) in mbff_sample(mbffs, limit) {
        println!("  Group {}: {} bits", group.group, group.bits.len());
        for bit in bits {
            println!("    {} ({}) at ({}, {})", bit.name, macro_of(&bit.name), bit.x, bit.y);
        }
    }
    Ok(())
}

fn run(options: &ProgramOptions) -> Result<(), Box<dyn Error>> {
    let mut session = LefDefSession::new();
    for lef in &options.lef {
        println!("[LOAD] LEF: {}", lef.display());
        session.read_lef(lef)?;
    }
    println!("[LOAD] DEF: {}", options.def.display());
    session.read_def(&options.def)?;

    if let Some(pl) = &options.update_pl {
        let report = session.update_from_pl(pl)?;
        println!(
            "[INFO] Updated {} components from {} ({} fixed skipped)",
            report.updated,
            pl.display(),
            report.skipped_fixed
        );
        if !report.rejected.is_empty() {
            println!(
                "[WARN] {} components kept their position, unusable coordinates in {}",
                report.rejected.len(),
                pl.display()
            );
        }
        if !report.missing.is_empty() {
            println!(
                "[WARN] {} movable components missing from {}",
                report.missing.len(),
                pl.display()
            );
        }
        session.extract_flip_flops();
    }

    print_summary(&session, options.rows)?;

    if let Some(prefix) = &options.bookshelf {
        let written = session.write_bookshelf(prefix)?;
        println!("[PASS] Wrote {} bookshelf files for {}", written.len(), prefix.display());
    }

    if let Some(csv_path) = &options.ff_csv {
        if let Some(design) = session.design() {
            export_flip_flops_to_csv(design, session.classification(), csv_path)?;
            println!("[PASS] Wrote flip-flop report {}", csv_path.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let options = ProgramOptions::parse();
    let default_filter = if options.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("[FAIL] {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str, bits: usize) -> MultiBitFlipFlop {
        MultiBitFlipFlop {
            group: name.to_string(),
            bits: (0..bits)
                .map(|i| FlipFlop {
                    name: format!("{name}_{i}"),
                    x: 0,
                    y: 0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_mbff_sample_caps_total_bits() {
        let groups = vec![group("a", 4), group("b", 4), group("c", 4), group("d", 4)];
        let sample = mbff_sample(&groups, 10);

        let counts: Vec<(&str, usize)> =
            sample.iter().map(|(g, bits)| (g.group.as_str(), bits.len())).collect();
        assert_eq!(counts, vec![("a", 4), ("b", 4), ("c", 2)]);
        assert!(mbff_sample(&groups, 0).is_empty());
        assert_eq!(mbff_sample(&groups[..1], 10)[0].1.len(), 4);
    }
}
