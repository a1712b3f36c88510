// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Flip-flop and multi-bit flip-flop extraction
//!
//! Macros are classified purely from their pin names:
//!
//! | Kind       | Rule                                                          |
//! |------------|---------------------------------------------------------------|
//! | multi-bit  | more than one OUTPUT pin whose name contains `Q`              |
//! | single-bit | exactly one such pin, a pin named `D` and a pin `CLK` or `CK` |
//!
//! Multi-bit instances are grouped by their name without the last `_suffix`.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::design::{Design, Macro};

/// Pin-name predicates used to classify a macro.
#[derive(Debug, Clone)]
pub struct FlipFlopRules {
    /// Substring an output pin name must contain to count as a data output.
    pub q_pattern: String,
    /// Names accepted as the data input of a single-bit flip-flop.
    pub data_pins: Vec<String>,
    /// Names accepted as the clock input of a single-bit flip-flop.
    pub clock_pins: Vec<String>,
}

impl Default for FlipFlopRules {
    fn default() -> Self {
        Self {
            q_pattern: "Q".to_string(),
            data_pins: vec!["D".to_string()],
            clock_pins: vec!["CLK".to_string(), "CK".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlipFlopKind {
    None,
    SingleBit,
    MultiBit,
}

impl FlipFlopRules {
    pub fn count_q_pins(&self, lef_macro: &Macro) -> usize {
        lef_macro
            .output_pins()
            .filter(|p| p.name.contains(self.q_pattern.as_str()))
            .count()
    }

    pub fn is_multi_bit(&self, lef_macro: &Macro) -> bool {
        self.count_q_pins(lef_macro) > 1
    }

    pub fn is_single_bit(&self, lef_macro: &Macro) -> bool {
        self.count_q_pins(lef_macro) == 1
            && self.data_pins.iter().any(|p| lef_macro.has_pin(p))
            && self.clock_pins.iter().any(|p| lef_macro.has_pin(p))
    }

    /// Multi-bit is checked first, so the two kinds never overlap.
    pub fn classify(&self, lef_macro: &Macro) -> FlipFlopKind {
        if self.is_multi_bit(lef_macro) {
            FlipFlopKind::MultiBit
        } else if self.is_single_bit(lef_macro) {
            FlipFlopKind::SingleBit
        } else {
            FlipFlopKind::None
        }
    }
}

/// Group of a multi-bit instance: its name up to the last `_`, or the whole
/// name when there is no underscore.
pub fn extract_group_name(instance: &str) -> &str {
    match instance.rsplit_once('_') {
        Some((group, _)) => group,
        None => instance,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlipFlop {
    pub name: String,
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiBitFlipFlop {
    pub group: String,
    pub bits: Vec<FlipFlop>,
}

/// Result of one classification pass.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub ffs: Vec<FlipFlop>,
    pub mbffs: Vec<MultiBitFlipFlop>,
}

impl Classification {
    pub fn mbff_bit_count(&self) -> usize {
        self.mbffs.iter().map(|g| g.bits.len()).sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FlipFlopClassifier {
    rules: FlipFlopRules,
}

impl FlipFlopClassifier {
    pub fn new(rules: FlipFlopRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &FlipFlopRules {
        &self.rules
    }

    /// Classify every component that has a resolved macro. The result is
    /// rebuilt from scratch on every call.
    pub fn classify(&self, design: &Design) -> Classification {
        let mut ffs = Vec::new();
        let mut groups: BTreeMap<String, Vec<FlipFlop>> = BTreeMap::new();

        for component in design.components() {
            let Some(lef_macro) = component.lef_macro.as_deref() else {
                continue;
            };

            debug!(
                "[DBG] {} macro {} qCount={}",
                component.name,
                lef_macro.name,
                self.rules.count_q_pins(lef_macro)
            );

            let record = FlipFlop {
                name: component.name.clone(),
                x: component.x,
                y: component.y,
            };
            match self.rules.classify(lef_macro) {
                FlipFlopKind::MultiBit => groups
                    .entry(extract_group_name(&component.name).to_string())
                    .or_default()
                    .push(record),
                FlipFlopKind::SingleBit => ffs.push(record),
                FlipFlopKind::None => {}
            }
        }

        let mbffs = groups
            .into_iter()
            .map(|(group, bits)| MultiBitFlipFlop { group, bits })
            .collect();
        Classification { ffs, mbffs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{PinDirection, Placement};

    fn dff() -> Macro {
        Macro::new("DFF", 800, 1600)
            .with_pin("D", PinDirection::Input)
            .with_pin("CLK", PinDirection::Input)
            .with_pin("Q", PinDirection::Output)
    }

    fn dff2() -> Macro {
        Macro::new("DFF2", 1600, 1600)
            .with_pin("D0", PinDirection::Input)
            .with_pin("D1", PinDirection::Input)
            .with_pin("CLK", PinDirection::Input)
            .with_pin("Q0", PinDirection::Output)
            .with_pin("Q1", PinDirection::Output)
    }

    #[test]
    fn test_group_name() {
        assert_eq!(extract_group_name("U_FF_3"), "U_FF");
        assert_eq!(extract_group_name("FF_GRP_3"), "FF_GRP");
        assert_eq!(extract_group_name("NOUNDERSCORE"), "NOUNDERSCORE");
        assert_eq!(extract_group_name("_3"), "");
    }

    #[test]
    fn test_kinds_are_exclusive() {
        let rules = FlipFlopRules::default();
        for m in [dff(), dff2()] {
            assert!(!(rules.is_multi_bit(&m) && rules.is_single_bit(&m)));
        }
        assert_eq!(rules.classify(&dff()), FlipFlopKind::SingleBit);
        assert_eq!(rules.classify(&dff2()), FlipFlopKind::MultiBit);
    }

    #[test]
    fn test_ck_clock_accepted() {
        let m = Macro::new("DFFCK", 800, 1600)
            .with_pin("D", PinDirection::Input)
            .with_pin("CK", PinDirection::Input)
            .with_pin("QN", PinDirection::Output);
        assert_eq!(FlipFlopRules::default().classify(&m), FlipFlopKind::SingleBit);
    }

    #[test]
    fn test_input_q_pins_ignored() {
        // Only OUTPUT pins count towards the Q total.
        let latch = Macro::new("ODD", 800, 1600)
            .with_pin("QIN", PinDirection::Input)
            .with_pin("Q", PinDirection::Output)
            .with_pin("D", PinDirection::Input);
        let rules = FlipFlopRules::default();
        assert_eq!(rules.count_q_pins(&latch), 1);
        // No clock pin.
        assert_eq!(rules.classify(&latch), FlipFlopKind::None);
    }

    #[test]
    fn test_unresolved_macro_skipped() {
        let mut design = Design::new("top", 1000.0);
        design.add_component("ghost", "MISSING", None).unwrap();
        let result = FlipFlopClassifier::default().classify(&design);
        assert!(result.ffs.is_empty());
        assert!(result.mbffs.is_empty());
    }

    #[test]
    fn test_custom_rules() {
        let rules = FlipFlopRules {
            clock_pins: vec!["CP".to_string()],
            ..FlipFlopRules::default()
        };
        let m = Macro::new("SDFF", 800, 1600)
            .with_pin("D", PinDirection::Input)
            .with_pin("CP", PinDirection::Input)
            .with_pin("Q", PinDirection::Output);

        let mut design = Design::new("top", 1000.0);
        design.add_macro(m);
        design
            .add_component("s0", "SDFF", Some(Placement::placed(5, 6)))
            .unwrap();

        let result = FlipFlopClassifier::new(rules).classify(&design);
        assert_eq!(
            result.ffs,
            vec![FlipFlop {
                name: "s0".to_string(),
                x: 5,
                y: 6
            }]
        );
        assert_eq!(FlipFlopClassifier::default().classify(&design).ffs.len(), 0);
    }
}
