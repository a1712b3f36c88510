// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Resolved design model
//!
//! The parsed [`Lef`](crate::lef::Lef) and [`Def`](crate::def::Def) structures
//! are assembled into a [`Design`]: every length is an integer DBU value,
//! components hold a shared reference to their macro, and every net connection
//! carries a resolved pin direction.

pub mod build;

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use log::warn;

/// Errors raised while assembling a [`Design`].
#[derive(Debug, thiserror::Error)]
pub enum DesignError {
    #[error("neither the DEF nor any LEF declares database units")]
    MissingUnits,
    #[error("component {0} is defined more than once")]
    DuplicateComponent(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinDirection {
    Input,
    Output,
    Inout,
}

impl PinDirection {
    /// Map a LEF/DEF `DIRECTION` keyword. `OUTPUT TRISTATE` counts as output.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.split_whitespace().next()? {
            "INPUT" => Some(Self::Input),
            "OUTPUT" => Some(Self::Output),
            "INOUT" | "FEEDTHRU" => Some(Self::Inout),
            _ => None,
        }
    }

    /// Bookshelf `.nets` direction column: inputs are `I`, everything else `O`.
    pub fn bookshelf_code(self) -> &'static str {
        match self {
            Self::Input => "I",
            Self::Output | Self::Inout => "O",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacroPin {
    pub name: String,
    pub direction: PinDirection,
}

/// A library cell with its pins and size in DBU.
#[derive(Debug, Clone, PartialEq)]
pub struct Macro {
    pub name: String,
    pub pins: BTreeMap<String, MacroPin>,
    pub width: i64,
    pub height: i64,
}

impl Macro {
    pub fn new(name: impl Into<String>, width: i64, height: i64) -> Self {
        Self {
            name: name.into(),
            pins: BTreeMap::new(),
            width,
            height,
        }
    }

    pub fn with_pin(mut self, name: &str, direction: PinDirection) -> Self {
        self.add_pin(name, direction);
        self
    }

    pub fn add_pin(&mut self, name: &str, direction: PinDirection) {
        self.pins.insert(
            name.to_string(),
            MacroPin {
                name: name.to_string(),
                direction,
            },
        );
    }

    pub fn has_pin(&self, name: &str) -> bool {
        self.pins.contains_key(name)
    }

    pub fn output_pins(&self) -> impl Iterator<Item = &MacroPin> {
        self.pins
            .values()
            .filter(|p| p.direction == PinDirection::Output)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SiteSymmetry {
    X,
    #[default]
    Y,
    R90,
}

impl SiteSymmetry {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "X" => Some(Self::X),
            "Y" => Some(Self::Y),
            "R90" => Some(Self::R90),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::R90 => "R90",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub name: String,
    pub width: i64,
    pub height: i64,
    pub symmetry: SiteSymmetry,
}

/// Position of a component or top-level pin, in DBU.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub orient: String,
    pub fixed: bool,
}

impl Placement {
    pub fn placed(x: i64, y: i64) -> Self {
        Self {
            x,
            y,
            orient: "N".to_string(),
            fixed: false,
        }
    }

    pub fn fixed(x: i64, y: i64) -> Self {
        Self {
            fixed: true,
            ..Self::placed(x, y)
        }
    }

    pub fn with_orient(mut self, orient: &str) -> Self {
        self.orient = orient.to_string();
        self
    }
}

#[derive(Debug, Clone)]
pub struct Component {
    pub name: String,
    pub macro_name: String,
    /// `None` when the macro is not defined in any loaded LEF.
    pub lef_macro: Option<Rc<Macro>>,
    pub x: i64,
    pub y: i64,
    pub orient: String,
    pub is_fixed: bool,
    pub is_placed: bool,
}

#[derive(Debug, Clone)]
pub struct IoPin {
    pub name: String,
    pub direction: PinDirection,
    pub x: i64,
    pub y: i64,
    pub orient: String,
    pub is_placed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionTarget {
    Component { component: String, pin: String },
    IoPin { name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub target: ConnectionTarget,
    pub direction: PinDirection,
}

impl Connection {
    /// Name of the component or top-level pin this connection lands on.
    pub fn owner_name(&self) -> &str {
        match &self.target {
            ConnectionTarget::Component { component, .. } => component,
            ConnectionTarget::IoPin { name } => name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Net {
    pub name: String,
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub name: String,
    pub site: String,
    pub x: i64,
    pub y: i64,
    pub orient: String,
    pub num_x: i64,
    pub num_y: i64,
    pub step_x: i64,
    pub step_y: i64,
}

/// The design a run works on. Components, pins, nets and rows keep their
/// load order; lookups by name go through side indexes.
#[derive(Debug, Clone, Default)]
pub struct Design {
    pub name: String,
    pub dbu_per_micron: f64,
    macros: BTreeMap<String, Rc<Macro>>,
    sites: BTreeMap<String, Site>,
    components: Vec<Component>,
    component_index: HashMap<String, usize>,
    io_pins: Vec<IoPin>,
    io_pin_index: HashMap<String, usize>,
    nets: Vec<Net>,
    rows: Vec<Row>,
}

impl Design {
    pub fn new(name: impl Into<String>, dbu_per_micron: f64) -> Self {
        Self {
            name: name.into(),
            dbu_per_micron,
            ..Self::default()
        }
    }

    /// Register a macro; a macro with the same name is replaced.
    pub fn add_macro(&mut self, lef_macro: Macro) -> Rc<Macro> {
        let shared = Rc::new(lef_macro);
        if let Some(old) = self.macros.insert(shared.name.clone(), Rc::clone(&shared)) {
            warn!("Macro {} redefined, keeping the later definition", old.name);
        }
        shared
    }

    pub fn add_site(&mut self, site: Site) {
        if let Some(old) = self.sites.insert(site.name.clone(), site) {
            warn!("Site {} redefined, keeping the later definition", old.name);
        }
    }

    /// Add a component instance of `macro_name`. An unknown macro leaves the
    /// component without a macro reference.
    pub fn add_component(
        &mut self,
        name: &str,
        macro_name: &str,
        placement: Option<Placement>,
    ) -> Result<&mut Component, DesignError> {
        if self.component_index.contains_key(name) {
            return Err(DesignError::DuplicateComponent(name.to_string()));
        }

        let lef_macro = self.macros.get(macro_name).cloned();
        if lef_macro.is_none() {
            warn!("Component {name} references unknown macro {macro_name}");
        }

        let (x, y, orient, is_fixed, is_placed) = match placement {
            Some(p) => (p.x, p.y, p.orient, p.fixed, !p.fixed),
            None => (0, 0, "N".to_string(), false, false),
        };

        let index = self.components.len();
        self.components.push(Component {
            name: name.to_string(),
            macro_name: macro_name.to_string(),
            lef_macro,
            x,
            y,
            orient,
            is_fixed,
            is_placed,
        });
        self.component_index.insert(name.to_string(), index);
        Ok(&mut self.components[index])
    }

    pub fn add_io_pin(&mut self, name: &str, direction: PinDirection, placement: Option<Placement>) {
        let (x, y, orient, is_placed) = match placement {
            Some(p) => (p.x, p.y, p.orient, true),
            None => (0, 0, "N".to_string(), false),
        };
        let pin = IoPin {
            name: name.to_string(),
            direction,
            x,
            y,
            orient,
            is_placed,
        };
        match self.io_pin_index.get(name) {
            Some(&index) => {
                warn!("Pin {name} redefined, keeping the later definition");
                self.io_pins[index] = pin;
            }
            None => {
                self.io_pin_index.insert(name.to_string(), self.io_pins.len());
                self.io_pins.push(pin);
            }
        }
    }

    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Add a net from `(instance, pin)` pairs, where instance `PIN` names a
    /// top-level pin. Directions that cannot be resolved are treated as input.
    pub fn add_net(&mut self, name: &str, connections: &[(&str, &str)]) {
        let connections = connections
            .iter()
            .map(|&(instance, pin)| self.resolve_connection(name, instance, pin))
            .collect();
        self.nets.push(Net {
            name: name.to_string(),
            connections,
        });
    }

    fn resolve_connection(&self, net: &str, instance: &str, pin: &str) -> Connection {
        let (target, direction) = if instance == "PIN" {
            let direction = self.io_pin(pin).map(|p| p.direction);
            (ConnectionTarget::IoPin { name: pin.to_string() }, direction)
        } else {
            let direction = self
                .component(instance)
                .and_then(|c| c.lef_macro.as_ref())
                .and_then(|m| m.pins.get(pin))
                .map(|p| p.direction);
            (
                ConnectionTarget::Component {
                    component: instance.to_string(),
                    pin: pin.to_string(),
                },
                direction,
            )
        };

        let direction = direction.unwrap_or_else(|| {
            warn!("Net {net}: cannot resolve direction of ( {instance} {pin} ), using input");
            PinDirection::Input
        });
        Connection { target, direction }
    }

    pub fn macros(&self) -> impl Iterator<Item = &Rc<Macro>> {
        self.macros.values()
    }

    pub fn lef_macro(&self, name: &str) -> Option<&Rc<Macro>> {
        self.macros.get(name)
    }

    pub fn sites(&self) -> impl Iterator<Item = &Site> {
        self.sites.values()
    }

    pub fn site(&self, name: &str) -> Option<&Site> {
        self.sites.get(name)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [Component] {
        &mut self.components
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.component_index.get(name).map(|&i| &self.components[i])
    }

    pub fn component_mut(&mut self, name: &str) -> Option<&mut Component> {
        self.component_index
            .get(name)
            .map(|&i| &mut self.components[i])
    }

    pub fn io_pins(&self) -> &[IoPin] {
        &self.io_pins
    }

    pub fn io_pin(&self, name: &str) -> Option<&IoPin> {
        self.io_pin_index.get(name).map(|&i| &self.io_pins[i])
    }

    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}
