// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use log::{debug, warn};
use nom::{
    bytes::complete::tag,
    character::complete::space1,
    number::complete::double,
    sequence::preceded,
    IResult, Parser,
};

use super::{Lef, LefMacro, LefPin, LefSite};
use crate::def::parser::{ParseError, ParseResult};
use crate::def::preprocessor::preprocess;

fn size_by(input: &str) -> IResult<&str, (f64, f64)> {
    let (input, _) = tag("SIZE")(input)?;
    let (input, _) = space1(input)?;
    let (input, x) = double(input)?;
    let (input, _) = (space1, tag("BY"), space1).parse(input)?;
    let (input, y) = double(input)?;
    Ok((input, (x, y)))
}

fn database_microns(input: &str) -> IResult<&str, f64> {
    preceded((tag("DATABASE"), space1, tag("MICRONS"), space1), double).parse(input)
}

struct MacroState {
    lef_macro: LefMacro,
    pin: Option<LefPin>,
    in_obs: bool,
}

enum State {
    Library,
    Units,
    Site(LefSite),
    Macro(MacroState),
    /// Inside a block this reader does not model; holds the closing line.
    Skip(String),
}

struct LefBuilder {
    lef: Lef,
    state: State,
}

impl LefBuilder {
    fn new() -> Self {
        Self {
            lef: Lef::default(),
            state: State::Library,
        }
    }

    fn statement(&mut self, text: &str) {
        let parts: Vec<&str> = text.split_whitespace().collect();
        if parts.is_empty() {
            return;
        }

        match std::mem::replace(&mut self.state, State::Library) {
            State::Library => self.library_statement(&parts),
            State::Units => {
                if parts[0] == "END" {
                    return;
                }
                if let Ok((_, dbu)) = database_microns(text) {
                    self.lef.database_microns = Some(dbu);
                }
                self.state = State::Units;
            }
            State::Site(mut site) => {
                match parts[0] {
                    "END" => {
                        debug!(
                            "[DBG] Found site: {} ({:.3}x{:.3})",
                            site.name, site.size_x, site.size_y
                        );
                        self.push_site(site);
                        return;
                    }
                    "CLASS" if parts.len() > 1 => site.class = parts[1].to_string(),
                    "SIZE" => {
                        if let Ok((_, (x, y))) = size_by(text) {
                            site.size_x = x;
                            site.size_y = y;
                        }
                    }
                    "SYMMETRY" => {
                        site.symmetry = parts[1..].iter().map(|s| s.to_string()).collect();
                    }
                    _ => {}
                }
                self.state = State::Site(site);
            }
            State::Macro(state) => self.macro_statement(state, text, &parts),
            State::Skip(end) => {
                if text != end {
                    self.state = State::Skip(end);
                }
            }
        }
    }

    fn library_statement(&mut self, parts: &[&str]) {
        match parts[0] {
            "UNITS" => {
                self.state = State::Units;
                self.rest(parts, 1);
            }
            "SITE" if parts.len() > 1 => {
                self.state = State::Site(LefSite {
                    name: parts[1].to_string(),
                    ..Default::default()
                });
                self.rest(parts, 2);
            }
            "MACRO" if parts.len() > 1 => {
                debug!("[DBG] Parsing MACRO: {}", parts[1]);
                self.state = State::Macro(MacroState {
                    lef_macro: LefMacro {
                        name: parts[1].to_string(),
                        ..Default::default()
                    },
                    pin: None,
                    in_obs: false,
                });
                self.rest(parts, 2);
            }
            "LAYER" | "VIA" | "VIARULE" | "NONDEFAULTRULE" if parts.len() > 1 => {
                self.state = State::Skip(format!("END {}", parts[1]));
            }
            "PROPERTYDEFINITIONS" => {
                self.state = State::Skip("END PROPERTYDEFINITIONS".to_string());
            }
            "SPACING" => self.state = State::Skip("END SPACING".to_string()),
            _ => {}
        }
    }

    fn macro_statement(&mut self, mut state: MacroState, text: &str, parts: &[&str]) {
        if parts[0] == "END" {
            match parts.get(1) {
                None => state.in_obs = false,
                Some(&name) if state.pin.as_ref().is_some_and(|p| p.name == name) => {
                    if let Some(pin) = state.pin.take() {
                        debug!("[DBG]   Parsed PIN: {} ({})", pin.name, pin.direction);
                        state.lef_macro.pins.push(pin);
                    }
                }
                Some(&name) if name == state.lef_macro.name => {
                    if let Some(pin) = state.pin.take() {
                        warn!(
                            "PIN {} of MACRO {} is not closed",
                            pin.name, state.lef_macro.name
                        );
                        state.lef_macro.pins.push(pin);
                    }
                    self.push_macro(state.lef_macro);
                    return;
                }
                Some(_) => {}
            }
            self.state = State::Macro(state);
            return;
        }

        if state.in_obs {
            self.state = State::Macro(state);
            return;
        }

        if parts[0] == "PIN" && parts.len() > 1 {
            if let Some(open) = state.pin.take() {
                state.lef_macro.pins.push(open);
            }
            state.pin = Some(LefPin {
                name: parts[1].to_string(),
                ..Default::default()
            });
            self.state = State::Macro(state);
            self.rest(parts, 2);
            return;
        }

        if parts[0] == "OBS" {
            state.in_obs = true;
        } else if let Some(pin) = state.pin.as_mut() {
            match parts[0] {
                "DIRECTION" if parts.len() > 1 => pin.direction = parts[1].to_string(),
                "USE" if parts.len() > 1 => pin.use_type = parts[1].to_string(),
                _ => {}
            }
        } else {
            match parts[0] {
                "CLASS" if parts.len() > 1 => state.lef_macro.class = parts[1..].join(" "),
                "SITE" if parts.len() > 1 => state.lef_macro.site = parts[1].to_string(),
                "SIZE" => {
                    if let Ok((_, (x, y))) = size_by(text) {
                        state.lef_macro.size_x = x;
                        state.lef_macro.size_y = y;
                    }
                }
                _ => {}
            }
        }
        self.state = State::Macro(state);
    }

    /// Feed the tokens after a block header back in as a statement of that block.
    fn rest(&mut self, parts: &[&str], skip: usize) {
        if parts.len() > skip {
            self.statement(&parts[skip..].join(" "));
        }
    }

    fn push_site(&mut self, site: LefSite) {
        if let Some(existing) = self.lef.sites.iter_mut().find(|s| s.name == site.name) {
            warn!("SITE {} defined twice, keeping the last one", site.name);
            *existing = site;
        } else {
            self.lef.sites.push(site);
        }
    }

    fn push_macro(&mut self, lef_macro: LefMacro) {
        debug!(
            "[PASS] Found macro: {} (size: {:.3}x{:.3}, pins: {})",
            lef_macro.name,
            lef_macro.size_x,
            lef_macro.size_y,
            lef_macro.pins.len()
        );
        self.lef.macros.push(lef_macro);
    }

    fn finish(self) -> ParseResult<Lef> {
        match self.state {
            State::Macro(state) => Err(ParseError::InvalidFormat(format!(
                "MACRO {} is missing END {}",
                state.lef_macro.name, state.lef_macro.name
            ))),
            State::Site(site) => Err(ParseError::InvalidFormat(format!(
                "SITE {} is missing END {}",
                site.name, site.name
            ))),
            _ => Ok(self.lef),
        }
    }
}

/// Parse LEF text into sites, macros and database units.
pub fn parse_lef(input: &str) -> ParseResult<Lef> {
    let preprocessed = preprocess(input);
    debug!(
        "[DBG] Preprocessed: {} logical lines from {} raw lines",
        preprocessed.lines.len(),
        input.lines().count()
    );

    let mut builder = LefBuilder::new();
    for line in &preprocessed.lines {
        for statement in line.text.split(';') {
            let statement = statement.trim();
            if !statement.is_empty() {
                builder.statement(statement);
            }
        }
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DFF_LEF: &str = r#"
VERSION 5.8 ;
UNITS
  DATABASE MICRONS 2000 ;
END UNITS

LAYER metal1
  TYPE ROUTING ;
  PITCH 0.2 ;
END metal1

SITE core
  CLASS CORE ;
  SYMMETRY Y ;
  SIZE 0.2 BY 1.6 ;
END core

MACRO DFF
  CLASS CORE ;
  SIZE 1.8 BY 1.6 ;
  SITE core ;
  PIN D
    DIRECTION INPUT ;
    USE SIGNAL ;
    PORT
      LAYER metal1 ;
        RECT 0.1 0.1 0.2 0.2 ;
    END
  END D
  PIN CLK
    DIRECTION INPUT ;
  END CLK
  PIN Q
    DIRECTION OUTPUT ;
  END Q
  OBS
    LAYER metal1 ;
      RECT 0 0 1.8 1.6 ;
  END
END DFF

END LIBRARY
"#;

    #[test]
    fn test_size_by() {
        assert_eq!(size_by("SIZE 0.2 BY 1.6"), Ok(("", (0.2, 1.6))));
        assert!(size_by("SIZE 0.2 1.6").is_err());
    }

    #[test]
    fn test_units_and_site() {
        let lef = parse_lef(DFF_LEF).unwrap();
        assert_eq!(lef.database_microns, Some(2000.0));
        assert_eq!(lef.sites.len(), 1);
        assert_eq!(lef.sites[0].name, "core");
        assert_eq!(lef.sites[0].class, "CORE");
        assert_eq!(lef.sites[0].size_x, 0.2);
        assert_eq!(lef.sites[0].size_y, 1.6);
        assert_eq!(lef.sites[0].symmetry, vec!["Y".to_string()]);
    }

    #[test]
    fn test_macro_pins() {
        let lef = parse_lef(DFF_LEF).unwrap();
        assert_eq!(lef.macros.len(), 1);
        let dff = &lef.macros[0];
        assert_eq!(dff.name, "DFF");
        assert_eq!(dff.class, "CORE");
        assert_eq!(dff.site, "core");
        assert_eq!((dff.size_x, dff.size_y), (1.8, 1.6));
        let names: Vec<&str> = dff.pins.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["D", "CLK", "Q"]);
        assert_eq!(dff.pin("D").unwrap().use_type, "SIGNAL");
        assert_eq!(dff.pin("Q").unwrap().direction, "OUTPUT");
    }

    #[test]
    fn test_single_line_statements() {
        let lef = parse_lef(
            "MACRO INV\nCLASS CORE ; SIZE 0.4 BY 1.6 ;\nPIN A DIRECTION INPUT ;\nEND A\nPIN Y\nDIRECTION OUTPUT ; USE SIGNAL ;\nEND Y\nEND INV\n",
        )
        .unwrap();
        let inv = &lef.macros[0];
        assert_eq!(inv.size_x, 0.4);
        assert_eq!(inv.pin("A").unwrap().direction, "INPUT");
        assert_eq!(inv.pin("Y").unwrap().use_type, "SIGNAL");
    }

    #[test]
    fn test_unterminated_macro() {
        let result = parse_lef("MACRO BROKEN\n CLASS CORE ;\n");
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }
}
