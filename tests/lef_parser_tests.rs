// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! LEF parser cases
//!
//! Tests cover:
//! - Basic MACRO parsing with PORT geometry skipped
//! - Library-level blocks that are not modelled (LAYER, VIA, SPACING)
//! - Sites with several symmetry keywords
//! - Reading from disk

use std::io::Write;

use lefdef_bookshelf::def::parser::ParseError;
use lefdef_bookshelf::error::ReadError;
use lefdef_bookshelf::lef::parser::parse_lef;
use lefdef_bookshelf::lef::reader::LefReader;

#[test]
fn test_basic_macro_parsing() {
    let lef_content = r#"
VERSION 5.8 ;
NAMESCASESENSITIVE ON ;

UNITS
   DATABASE MICRONS 2000 ;
END UNITS

LAYER M1
   TYPE ROUTING ;
   DIRECTION HORIZONTAL ;
   PITCH 0.2 ;
   WIDTH 0.07 ;
   SPACING 0.13 ;
END M1

MACRO INVERTER
   CLASS CORE ;
   ORIGIN 0 0 ;
   SIZE 1.0 BY 1.2 ;
   SITE core ;

   PIN A
      DIRECTION INPUT ;
      USE SIGNAL ;
      PORT
         LAYER M1 ;
         RECT 0.1 0.4 0.3 0.6 ;
      END
   END A

   PIN Y
      DIRECTION OUTPUT ;
      USE SIGNAL ;
      PORT
         LAYER M1 ;
         RECT 1.1 0.4 1.3 0.6 ;
      END
   END Y

END INVERTER

END LIBRARY
"#;

    let result = parse_lef(lef_content);
    assert!(result.is_ok(), "Failed to parse basic LEF: {:?}", result);

    let lef = result.unwrap();
    assert_eq!(lef.database_microns, Some(2000.0));
    assert_eq!(lef.macros.len(), 1);

    let macro_def = &lef.macros[0];
    assert_eq!(macro_def.name, "INVERTER");
    assert_eq!(macro_def.class, "CORE");
    assert_eq!(macro_def.site, "core");
    assert_eq!(macro_def.size_x, 1.0);
    assert_eq!(macro_def.size_y, 1.2);
    assert_eq!(macro_def.pins.len(), 2);

    let pin_a = &macro_def.pins[0];
    assert_eq!(pin_a.name, "A");
    assert_eq!(pin_a.direction, "INPUT");
    assert_eq!(pin_a.use_type, "SIGNAL");

    let pin_y = &macro_def.pins[1];
    assert_eq!(pin_y.name, "Y");
    assert_eq!(pin_y.direction, "OUTPUT");
}

#[test]
fn test_unmodelled_blocks_skipped() {
    let lef_content = r#"
VIA via12 DEFAULT
   LAYER M1 ;
      RECT -0.1 -0.1 0.1 0.1 ;
   LAYER M2 ;
      RECT -0.1 -0.1 0.1 0.1 ;
END via12

SPACING
   SAMENET M1 M1 0.1 ;
END SPACING

PROPERTYDEFINITIONS
   MACRO drive STRING ;
END PROPERTYDEFINITIONS

MACRO BUF
   CLASS CORE ;
   SIZE 0.6 BY 1.2 ;
   PIN A DIRECTION INPUT ; END A
   PIN Y DIRECTION OUTPUT ; END Y
   OBS
      LAYER M1 ;
         RECT 0 0 0.6 1.2 ;
   END
END BUF
"#;

    let lef = parse_lef(lef_content).unwrap();
    assert_eq!(lef.macros.len(), 1);
    assert_eq!(lef.macros[0].name, "BUF");
    assert_eq!(lef.macros[0].pins.len(), 2);
    assert!(lef.database_microns.is_none());
}

#[test]
fn test_site_symmetry_and_redefinition() {
    let lef_content = r#"
SITE core
   CLASS CORE ;
   SYMMETRY X Y ;
   SIZE 0.19 BY 1.4 ;
END core

SITE core
   CLASS CORE ;
   SYMMETRY Y ;
   SIZE 0.2 BY 1.6 ;
END core

SITE pad
   CLASS PAD ;
   SIZE 1.0 BY 100.0 ;
END pad
"#;

    let lef = parse_lef(lef_content).unwrap();
    assert_eq!(lef.sites.len(), 2);
    let core = &lef.sites[0];
    assert_eq!(core.size_x, 0.2);
    assert_eq!(core.symmetry, vec!["Y".to_string()]);
    assert_eq!(lef.sites[1].class, "PAD");
    assert!(lef.sites[1].symmetry.is_empty());
}

#[test]
fn test_multi_bit_macro_pins() {
    let lef_content = r#"
MACRO MBFF4
   CLASS CORE ;
   SIZE 4.8 BY 1.6 ;
   PIN D0 DIRECTION INPUT ; END D0
   PIN D1 DIRECTION INPUT ; END D1
   PIN CK DIRECTION INPUT ; USE CLOCK ; END CK
   PIN Q0 DIRECTION OUTPUT ; END Q0
   PIN Q1 DIRECTION OUTPUT ; END Q1
   PIN VDD DIRECTION INOUT ; USE POWER ; END VDD
END MBFF4
"#;

    let lef = parse_lef(lef_content).unwrap();
    let mbff = &lef.macros[0];
    let outputs: Vec<&str> = mbff
        .pins
        .iter()
        .filter(|p| p.direction == "OUTPUT")
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(outputs, vec!["Q0", "Q1"]);
    assert_eq!(mbff.pin("CK").unwrap().use_type, "CLOCK");
    assert_eq!(mbff.pin("VDD").unwrap().use_type, "POWER");
}

#[test]
fn test_unterminated_site_is_error() {
    let result = parse_lef("SITE core\n  SIZE 0.2 BY 1.6 ;\n");
    assert!(matches!(result, Err(ParseError::InvalidFormat(msg)) if msg.contains("core")));
}

#[test]
fn test_lef_reader_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "UNITS\n  DATABASE MICRONS 1000 ;\nEND UNITS\nMACRO TIE\n  SIZE 0.4 BY 1.6 ;\nEND TIE\n"
    )
    .unwrap();

    let lef = LefReader::new().read(file.path()).unwrap();
    assert_eq!(lef.database_microns, Some(1000.0));
    assert_eq!(lef.macros[0].name, "TIE");

    let missing = LefReader::new().read("/nonexistent/cells.lef");
    assert!(matches!(missing, Err(ReadError::Io { .. })));
}
