// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::{
    BookshelfError, SiteScale, CREATED_BY, NETS_HEADER, NODES_HEADER, PL_HEADER, SCL_HEADER,
    WTS_HEADER,
};
use crate::design::{Design, SiteSymmetry};

/// `<prefix>.<extension>`, keeping any dots already in the prefix.
pub fn artifact_path(prefix: &Path, extension: &str) -> PathBuf {
    let mut path = OsString::from(prefix.as_os_str());
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

/// Serialises a design snapshot into Bookshelf files. Never mutates the design.
pub struct BookshelfWriter<'a> {
    design: &'a Design,
    scale: SiteScale,
}

impl<'a> BookshelfWriter<'a> {
    /// Writer using the pitch of the design's smallest site.
    pub fn new(design: &'a Design) -> Result<Self, BookshelfError> {
        Ok(Self::with_scale(design, SiteScale::from_design(design)?))
    }

    pub fn with_scale(design: &'a Design, scale: SiteScale) -> Self {
        Self { design, scale }
    }

    pub fn scale(&self) -> SiteScale {
        self.scale
    }

    fn header<W: Write>(out: &mut W, header: &str) -> io::Result<()> {
        writeln!(out, "{header}")?;
        writeln!(out, "{CREATED_BY}")?;
        writeln!(out)
    }

    pub fn write_nodes<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let design = self.design;
        let io_pins = design.io_pins();
        let components = design.components();
        let fixed = components.iter().filter(|c| c.is_fixed).count();

        Self::header(out, NODES_HEADER)?;
        writeln!(out, "NumNodes : {}", components.len() + io_pins.len())?;
        writeln!(out, "NumTerminals : {}", io_pins.len() + fixed)?;
        writeln!(out)?;

        for pin in io_pins {
            writeln!(out, "\t{:<40}\t{:>8}\t{:>8}\tterminal", pin.name, 1, 1)?;
        }

        for component in components {
            let (width, height) = match &component.lef_macro {
                Some(m) => (self.scale.x_to_sites(m.width), self.scale.y_to_sites(m.height)),
                None => {
                    warn!(
                        "Component {} has no macro {}, writing a 1x1 node",
                        component.name, component.macro_name
                    );
                    (1, 1)
                }
            };
            write!(out, "\t{:<40}\t{:>8}\t{:>8}", component.name, width, height)?;
            if component.is_fixed {
                write!(out, "\tterminal")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn write_nets<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let nets = self.design.nets();
        let num_pins: usize = nets.iter().map(|n| n.connections.len()).sum();

        Self::header(out, NETS_HEADER)?;
        writeln!(out, "NumNets : {}", nets.len())?;
        writeln!(out, "NumPins : {num_pins}")?;
        writeln!(out)?;

        for net in nets {
            writeln!(out, "NetDegree : {:>8}\t{}", net.connections.len(), net.name)?;
            for connection in &net.connections {
                writeln!(
                    out,
                    "\t{:<20} {}  : 0.5 0.5",
                    connection.owner_name(),
                    connection.direction.bookshelf_code()
                )?;
            }
        }
        Ok(())
    }

    pub fn write_wts<W: Write>(&self, out: &mut W) -> io::Result<()> {
        Self::header(out, WTS_HEADER)?;
        for net in self.design.nets() {
            writeln!(out, "{:<40}\t1", net.name)?;
        }
        Ok(())
    }

    pub fn write_scl<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let rows = self.design.rows();

        Self::header(out, SCL_HEADER)?;
        writeln!(out, "NumRows : {}", rows.len())?;
        writeln!(out)?;

        for row in rows {
            let (height, width, symmetry) = match self.design.site(&row.site) {
                Some(site) => (
                    self.scale.y_to_sites(site.height),
                    self.scale.x_to_sites(site.width),
                    site.symmetry,
                ),
                None => {
                    warn!("Row {} uses unknown site {}", row.name, row.site);
                    (1, 1, SiteSymmetry::default())
                }
            };

            writeln!(out, "CoreRow Horizontal")?;
            writeln!(out, "\tCoordinate   : {}", self.scale.y_to_sites(row.y))?;
            writeln!(out, "\tHeight       : {height}")?;
            writeln!(out, "\tSitewidth    : {width}")?;
            writeln!(out, "\tSitespacing  : {}", self.scale.x_to_sites(row.step_x))?;
            writeln!(out, "\tSiteorient   : {}", row.orient)?;
            writeln!(out, "\tSitesymmetry : {}", symmetry.as_str())?;
            writeln!(
                out,
                "\tSubrowOrigin : {}\tNumSites : {}",
                self.scale.x_to_sites(row.x),
                row.num_x
            )?;
            writeln!(out, "End")?;
        }
        Ok(())
    }

    pub fn write_pl<W: Write>(&self, out: &mut W) -> io::Result<()> {
        Self::header(out, PL_HEADER)?;

        for component in self.design.components() {
            if component.is_placed || component.is_fixed {
                writeln!(
                    out,
                    "{:<40}\t{}\t{}\t: {}",
                    component.name,
                    self.scale.x_to_sites(component.x),
                    self.scale.y_to_sites(component.y),
                    component.orient
                )?;
            } else {
                writeln!(out, "{:<40}\t0\t0\t: N", component.name)?;
            }
        }
        for pin in self.design.io_pins() {
            writeln!(
                out,
                "{:<40}\t{}\t{}\t: {}",
                pin.name,
                self.scale.x_to_sites(pin.x),
                self.scale.y_to_sites(pin.y),
                pin.orient
            )?;
        }
        Ok(())
    }

    /// The `.aux` line, naming the sibling files relative to the aux file.
    pub fn write_aux<W: Write>(&self, out: &mut W, prefix: &Path) -> io::Result<()> {
        let base = prefix
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.design.name.clone());
        writeln!(
            out,
            "RowBasedPlacement : {base}.nodes {base}.nets {base}.wts {base}.pl {base}.scl"
        )
    }

    fn write_file<F>(path: &Path, write: F) -> io::Result<()>
    where
        F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
    {
        let mut out = BufWriter::new(File::create(path)?);
        write(&mut out)?;
        out.flush()
    }

    /// Write all six files next to `prefix`.
    ///
    /// Every file is attempted even when an earlier one fails; the failures
    /// are returned together as [`BookshelfError::Export`].
    pub fn write_all(&self, prefix: &Path) -> Result<Vec<PathBuf>, BookshelfError> {
        let mut written = Vec::new();
        let mut failures = Vec::new();

        for extension in ["aux", "nodes", "nets", "wts", "scl", "pl"] {
            let path = artifact_path(prefix, extension);
            info!("[SAVE] Writing bookshelf {extension} file: {}", path.display());

            let result = Self::write_file(&path, |out| match extension {
                "aux" => self.write_aux(out, prefix),
                "nodes" => self.write_nodes(out),
                "nets" => self.write_nets(out),
                "wts" => self.write_wts(out),
                "scl" => self.write_scl(out),
                _ => self.write_pl(out),
            });

            match result {
                Ok(()) => written.push(path),
                Err(e) => {
                    warn!("Cannot write {}: {e}", path.display());
                    failures.push((path, e));
                }
            }
        }

        if failures.is_empty() {
            Ok(written)
        } else {
            Err(BookshelfError::Export { failures })
        }
    }
}
