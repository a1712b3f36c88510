// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Assembly of a [`Design`] from parsed LEF libraries and a DEF.

use log::{info, warn};

use super::{Design, DesignError, Macro, PinDirection, Placement, Row, Site, SiteSymmetry};
use crate::def::{Def, DefPlacement};
use crate::lef::{Lef, LefMacro, LefSite};

fn microns_to_dbu(value: f64, dbu_per_micron: f64) -> i64 {
    (value * dbu_per_micron).round() as i64
}

fn to_dbu(value: f64) -> i64 {
    value.round() as i64
}

fn convert_site(site: &LefSite, dbu: f64) -> Site {
    // With several symmetry keywords the last recognised one wins.
    let symmetry = site
        .symmetry
        .iter()
        .filter_map(|s| SiteSymmetry::from_keyword(s))
        .last()
        .unwrap_or_default();
    Site {
        name: site.name.clone(),
        width: microns_to_dbu(site.size_x, dbu),
        height: microns_to_dbu(site.size_y, dbu),
        symmetry,
    }
}

fn convert_macro(lef_macro: &LefMacro, dbu: f64) -> Macro {
    let mut converted = Macro::new(
        lef_macro.name.clone(),
        microns_to_dbu(lef_macro.size_x, dbu),
        microns_to_dbu(lef_macro.size_y, dbu),
    );
    for pin in &lef_macro.pins {
        let direction = PinDirection::from_keyword(&pin.direction).unwrap_or_else(|| {
            if !pin.direction.is_empty() {
                warn!(
                    "Macro {} pin {}: unknown direction {}, using input",
                    lef_macro.name, pin.name, pin.direction
                );
            }
            PinDirection::Input
        });
        converted.add_pin(&pin.name, direction);
    }
    converted
}

fn convert_placement(placement: &DefPlacement) -> Placement {
    Placement {
        x: to_dbu(placement.x),
        y: to_dbu(placement.y),
        orient: placement.orientation.clone(),
        fixed: placement.is_fixed(),
    }
}

impl Design {
    /// Build a design from LEF libraries (in load order) and one DEF.
    ///
    /// Database units come from the DEF, falling back to the first LEF that
    /// declares them. LEF micron values are converted to DBU with that value.
    pub fn from_lef_def(lefs: &[Lef], def: &Def) -> Result<Design, DesignError> {
        let dbu = def
            .distance_microns
            .or_else(|| lefs.iter().find_map(|l| l.database_microns))
            .ok_or(DesignError::MissingUnits)?;

        let mut design = Design::new(def.design.clone(), dbu);

        for lef in lefs {
            for site in &lef.sites {
                design.add_site(convert_site(site, dbu));
            }
            for lef_macro in &lef.macros {
                design.add_macro(convert_macro(lef_macro, dbu));
            }
        }

        for component in &def.components {
            design.add_component(
                &component.name,
                &component.macro_name,
                component.placement.as_ref().map(convert_placement),
            )?;
        }

        for pin in &def.pins {
            let direction = PinDirection::from_keyword(&pin.direction).unwrap_or(PinDirection::Input);
            design.add_io_pin(
                &pin.name,
                direction,
                pin.placement.as_ref().map(convert_placement),
            );
        }

        for row in &def.rows {
            design.add_row(Row {
                name: row.name.clone(),
                site: row.site.clone(),
                x: to_dbu(row.x),
                y: to_dbu(row.y),
                orient: row.orient.clone(),
                num_x: i64::from(row.num_x),
                num_y: i64::from(row.num_y),
                step_x: to_dbu(row.step_x),
                step_y: to_dbu(row.step_y),
            });
        }

        for net in &def.nets {
            let connections: Vec<(&str, &str)> = net
                .connections
                .iter()
                .map(|c| (c.instance.as_str(), c.pin.as_str()))
                .collect();
            design.add_net(&net.name, &connections);
        }

        info!(
            "[INFO] Design {}: {} macros, {} components, {} pins, {} nets, {} rows",
            design.name,
            design.macros.len(),
            design.components().len(),
            design.io_pins().len(),
            design.nets().len(),
            design.rows().len()
        );
        Ok(design)
    }
}
