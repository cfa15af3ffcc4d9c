// src/model/molecule.rs

use super::structure::{molecule_indices, AtomRecord};
use log::{debug, warn};
use nalgebra::Vector3;
use std::collections::BTreeMap;

/// O/H positions collected for one molecule slot. Any field may be missing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoleculeGeometry {
    pub oxygen: Option<Vector3<f64>>,
    pub h0: Option<Vector3<f64>>,
    pub h1: Option<Vector3<f64>>,
    pub extra_hydrogens: usize,
}

/// A water molecule with its oxygen and at least one hydrogen known.
#[derive(Clone, Debug, PartialEq)]
pub struct Water {
    pub oxygen: Vector3<f64>,
    pub h0: Vector3<f64>,
    pub h1: Option<Vector3<f64>>,
}

impl MoleculeGeometry {
    fn add(&mut self, atom_name: &str, position: Vector3<f64>) {
        if atom_name.contains('O') {
            self.oxygen = Some(position);
        } else if atom_name.contains('H') {
            if self.h0.is_none() {
                self.h0 = Some(position);
            } else if self.h1.is_none() {
                self.h1 = Some(position);
            } else {
                self.extra_hydrogens += 1;
            }
        }
    }

    /// `None` unless both the oxygen and a first hydrogen are present.
    pub fn resolve(&self) -> Option<Water> {
        Some(Water {
            oxygen: self.oxygen?,
            h0: self.h0?,
            h1: self.h1,
        })
    }
}

/// Collects O/H geometry per molecule index, scanning atoms in order.
pub fn collect_geometry(atoms: &[AtomRecord]) -> BTreeMap<usize, MoleculeGeometry> {
    let indices = molecule_indices(atoms);
    let mut out: BTreeMap<usize, MoleculeGeometry> = BTreeMap::new();
    for (atom, idx) in atoms.iter().zip(indices) {
        out.entry(idx)
            .or_default()
            .add(&atom.atom_name, Vector3::from(atom.position));
    }
    out
}

/// Water molecules that can be drawn, keyed by molecule index.
pub fn reconstruct_waters(atoms: &[AtomRecord]) -> BTreeMap<usize, Water> {
    let mut waters = BTreeMap::new();
    for (idx, geom) in collect_geometry(atoms) {
        if geom.extra_hydrogens > 0 {
            warn!(
                "Molecule {} has {} hydrogens; only the first two are drawn",
                idx,
                geom.extra_hydrogens + 2
            );
        }
        match geom.resolve() {
            Some(w) => {
                waters.insert(idx, w);
            }
            None => debug!("Molecule {} lacks an oxygen or hydrogen; skipped", idx),
        }
    }
    waters
}
