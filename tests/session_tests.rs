// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! End-to-end runs from LEF/DEF text through classification, Bookshelf
//! export and placement import.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use lefdef_bookshelf::bookshelf::writer::artifact_path;
use lefdef_bookshelf::{LefDefSession, RowInfo, SessionError};

const CELLS_LEF: &str = r#"
VERSION 5.8 ;
BUSBITCHARS "[]" ;
DIVIDERCHAR "/" ;

UNITS
  DATABASE MICRONS 2000 ;
END UNITS

SITE core
  CLASS CORE ;
  SYMMETRY Y ;
  SIZE 0.2 BY 1.6 ;
END core

MACRO INV
  CLASS CORE ;
  SIZE 0.4 BY 1.6 ;
  SITE core ;
  PIN A
    DIRECTION INPUT ;
    USE SIGNAL ;
  END A
  PIN Y
    DIRECTION OUTPUT ;
    USE SIGNAL ;
  END Y
END INV

MACRO DFF
  CLASS CORE ;
  SIZE 1.8 BY 1.6 ;
  SITE core ;
  PIN D
    DIRECTION INPUT ;
  END D
  PIN CLK
    DIRECTION INPUT ;
    USE CLOCK ;
  END CLK
  PIN Q
    DIRECTION OUTPUT ;
  END Q
END DFF

END LIBRARY
"#;

const MBFF_LEF: &str = r#"
VERSION 5.8 ;
MACRO DFF2
  CLASS CORE ;
  SIZE 3.2 BY 1.6 ;
  PIN D0
    DIRECTION INPUT ;
  END D0
  PIN D1
    DIRECTION INPUT ;
  END D1
  PIN CLK
    DIRECTION INPUT ;
  END CLK
  PIN Q0
    DIRECTION OUTPUT ;
  END Q0
  PIN Q1
    DIRECTION OUTPUT ;
  END Q1
END DFF2
END LIBRARY
"#;

const TOP_DEF: &str = r#"
VERSION 5.8 ;
DIVIDERCHAR "/" ;
BUSBITCHARS "[]" ;
DESIGN top ;
UNITS DISTANCE MICRONS 2000 ;

DIEAREA ( 0 0 ) ( 16000 6400 ) ;

ROW ROW_0 core 0 0 N DO 40 BY 1 STEP 400 0 ;
ROW ROW_1 core 0 3200 FS DO 40 BY 1 STEP 400 0 ;

COMPONENTS 5 ;
- i0 DFF + PLACED ( 0 0 ) N ;
- g_0 DFF2
  + PLACED ( 4000 0 ) N ;
- g_1 DFF2 + PLACED ( 8000 3200 ) FS ;
- u1 INV + PLACED ( 12000 3200 ) FS ;
- blk INV + FIXED ( 14000 0 ) N ;
END COMPONENTS

PINS 2 ;
- clk + NET clk + DIRECTION INPUT + USE SIGNAL
  + LAYER metal2 ( -70 0 ) ( 70 140 )
  + PLACED ( 0 3200 ) E ;
- out + NET n2 + DIRECTION OUTPUT + USE SIGNAL
  + PLACED ( 16000 3200 ) W ;
END PINS

NETS 3 ;
- clk ( PIN clk ) ( i0 CLK ) ( g_0 CLK ) ( g_1 CLK ) + USE CLOCK ;
- n1 ( i0 Q ) ( u1 A )
  + ROUTED metal2 ( 1000 400 ) ( 12000 * ) ;
- n2 ( u1 Y ) ( PIN out ) ;
END NETS

END DESIGN
"#;

struct Fixture {
    _dir: tempfile::TempDir,
    root: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        fs::write(root.join("cells.lef"), CELLS_LEF).unwrap();
        fs::write(root.join("mbff.lef"), MBFF_LEF).unwrap();
        fs::write(root.join("top.def"), TOP_DEF).unwrap();
        Self { _dir: dir, root }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn session(&self) -> LefDefSession {
        let mut session = LefDefSession::new();
        session.read_lef(self.path("cells.lef")).unwrap();
        session.read_lef(self.path("mbff.lef")).unwrap();
        session.read_def(self.path("top.def")).unwrap();
        session
    }
}

fn data_lines(path: &Path) -> Vec<Vec<String>> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .skip(1)
        .filter(|l| !l.trim().is_empty() && !l.starts_with('#'))
        .map(|l| l.split_whitespace().map(str::to_string).collect())
        .collect()
}

#[test]
fn test_classification_from_files() {
    let fixture = Fixture::new();
    let session = fixture.session();

    let ffs: BTreeSet<&str> = session.ffs().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(ffs, BTreeSet::from(["i0"]));

    assert_eq!(session.mbffs().len(), 1);
    let group = &session.mbffs()[0];
    assert_eq!(group.group, "g");
    let bits: BTreeSet<&str> = group.bits.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(bits, BTreeSet::from(["g_0", "g_1"]));
}

#[test]
fn test_row_infos() {
    let fixture = Fixture::new();
    let session = fixture.session();
    assert_eq!(
        session.row_infos().unwrap(),
        vec![
            RowInfo {
                y: 0,
                orig_x: 0,
                num_sites: 40,
                site_step: 400
            },
            RowInfo {
                y: 3200,
                orig_x: 0,
                num_sites: 40,
                site_step: 400
            },
        ]
    );
}

#[test]
fn test_bookshelf_export_from_files() {
    let fixture = Fixture::new();
    let session = fixture.session();
    let prefix = fixture.path("out");
    session.write_bookshelf(&prefix).unwrap();

    let nodes = data_lines(&artifact_path(&prefix, "nodes"));
    assert_eq!(nodes[0], vec!["NumNodes", ":", "7"]);
    assert_eq!(nodes[1], vec!["NumTerminals", ":", "3"]);
    let i0 = nodes.iter().find(|l| l[0] == "i0").unwrap();
    // 1.8um / 0.2um sites, 1.6um / 1.6um rows.
    assert_eq!(i0[1..], ["9", "1"]);
    let blk = nodes.iter().find(|l| l[0] == "blk").unwrap();
    assert_eq!(blk.last().map(String::as_str), Some("terminal"));

    let nets = data_lines(&artifact_path(&prefix, "nets"));
    assert_eq!(nets[0], vec!["NumNets", ":", "3"]);
    assert_eq!(nets[1], vec!["NumPins", ":", "8"]);
    let n2 = nets.iter().position(|l| l.last().map(String::as_str) == Some("n2")).unwrap();
    assert_eq!(nets[n2 + 1][..2], ["u1", "O"]);
    assert_eq!(nets[n2 + 2][..2], ["out", "O"]);
    // Routing coordinates are not connections.
    let n1 = nets.iter().position(|l| l.last().map(String::as_str) == Some("n1")).unwrap();
    assert_eq!(nets[n1][2], "2");

    let pl = data_lines(&artifact_path(&prefix, "pl"));
    let g_1 = pl.iter().find(|l| l[0] == "g_1").unwrap();
    assert_eq!(g_1[1..], ["20", "1", ":", "FS"]);
    let clk = pl.iter().find(|l| l[0] == "clk").unwrap();
    assert_eq!(clk[1..], ["0", "1", ":", "E"]);
}

#[test]
fn test_placement_import_from_files() {
    let fixture = Fixture::new();
    let mut session = fixture.session();

    let pl = fixture.path("placed.pl");
    fs::write(
        &pl,
        "UCLA pl 1.0\n\ni0 2 1 : N\ng_0 10 0 : N\ng_1 20 0 : N\nu1 30 1 : FS\nblk 0 0 : N\n",
    )
    .unwrap();
    let report = session.update_from_pl(&pl).unwrap();
    assert_eq!(report.updated, 4);
    assert_eq!(report.skipped_fixed, 1);

    let design = session.design().unwrap();
    let at = |name: &str| {
        let c = design.component(name).unwrap();
        (c.x, c.y)
    };
    assert_eq!(at("i0"), (800, 3200));
    assert_eq!(at("g_0"), (4000, 0));
    assert_eq!(at("g_1"), (8000, 0));
    assert_eq!(at("u1"), (12000, 3200));
    assert_eq!(at("blk"), (14000, 0));

    // Classification picks up new positions only when recomputed.
    assert_eq!(session.ffs()[0].y, 0);
    session.extract_flip_flops();
    assert_eq!(session.ffs()[0].y, 3200);
}

#[test]
fn test_def_without_lef_units_uses_def() {
    let fixture = Fixture::new();
    let mut session = LefDefSession::new();
    session.read_lef(fixture.path("mbff.lef")).unwrap();
    session.read_def(fixture.path("top.def")).unwrap();

    // DFF and INV are unknown here; only the DFF2 group survives.
    assert!(session.ffs().is_empty());
    assert_eq!(session.mbffs().len(), 1);
    // No SITE in this library, so there is no pitch to export with.
    assert!(matches!(
        session.write_bookshelf(fixture.path("out")),
        Err(SessionError::Bookshelf(_))
    ));
}

#[test]
fn test_broken_def_is_reported() {
    let fixture = Fixture::new();
    let broken = fixture.path("broken.def");
    fs::write(&broken, "DESIGN top ;\nCOMPONENTS 1 ;\n- u1 INV ;\n").unwrap();

    let mut session = LefDefSession::new();
    session.read_lef(fixture.path("cells.lef")).unwrap();
    let err = session.read_def(&broken).unwrap_err();
    assert!(err.to_string().contains("broken.def"));
    assert!(session.design().is_none());
}
