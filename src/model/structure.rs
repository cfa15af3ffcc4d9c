// src/model/structure.rs

use crate::utils::linalg::frac_to_cart;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Repeat cell as three row vectors [a, b, c].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitCell {
    pub vectors: [[f64; 3]; 3],
}

impl UnitCell {
    pub fn new(vectors: [[f64; 3]; 3]) -> Self {
        Self { vectors }
    }

    pub fn a(&self) -> Vector3<f64> {
        Vector3::from(self.vectors[0])
    }

    pub fn b(&self) -> Vector3<f64> {
        Vector3::from(self.vectors[1])
    }

    pub fn c(&self) -> Vector3<f64> {
        Vector3::from(self.vectors[2])
    }

    /// Reduced (fractional) position -> Cartesian.
    pub fn to_cartesian(&self, reduced: [f64; 3]) -> [f64; 3] {
        frac_to_cart(reduced, self.vectors)
    }

    /// The 8 corners of the parallelepiped, origin first.
    pub fn corners(&self) -> [[f64; 3]; 8] {
        let mut out = [[0.0; 3]; 8];
        let mut n = 0;
        for x in 0..=1 {
            for y in 0..=1 {
                for z in 0..=1 {
                    out[n] = self.to_cartesian([x as f64, y as f64, z as f64]);
                    n += 1;
                }
            }
        }
        out
    }
}

/// One atom as emitted by the structure generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtomRecord {
    /// Index of the atom inside its residue; 0 opens a new molecule.
    pub residue_index: usize,
    pub residue_name: String,
    pub atom_name: String,
    pub position: [f64; 3],
    /// Molecule slot. When absent, `residue_index == 0` boundaries are counted instead.
    #[serde(default)]
    pub order: Option<usize>,
}

impl AtomRecord {
    pub fn new(
        residue_index: usize,
        residue_name: &str,
        atom_name: &str,
        position: [f64; 3],
        order: Option<usize>,
    ) -> Self {
        Self {
            residue_index,
            residue_name: residue_name.to_string(),
            atom_name: atom_name.to_string(),
            position,
            order,
        }
    }
}

/// A finished structure, as handed over by the generator.
///
/// `atoms` holds the host (water) molecules. Guest atoms are appended to them
/// by the generator after the water stage; here they are kept separately and
/// joined by [`IceStructure::all_atoms`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IceStructure {
    pub cell: UnitCell,
    pub atoms: Vec<AtomRecord>,
    #[serde(default)]
    pub guests: Vec<AtomRecord>,
    // Fractional centres of the water molecules
    #[serde(default)]
    pub reduced_positions: Vec<[f64; 3]>,
    // Directed (donor, acceptor) pairs of molecule slots
    #[serde(default)]
    pub hydrogen_bonds: Vec<(usize, usize)>,
}

impl IceStructure {
    /// Host atoms followed by guest atoms.
    pub fn all_atoms(&self) -> Cow<'_, [AtomRecord]> {
        if self.guests.is_empty() {
            Cow::Borrowed(&self.atoms)
        } else {
            let mut all = self.atoms.clone();
            all.extend(self.guests.iter().cloned());
            Cow::Owned(all)
        }
    }
}

/// Resolves the molecule index of every atom.
///
/// Explicit `order` values win. Atoms without one are numbered by counting
/// `residue_index == 0` boundaries (0, 1, 2, ...).
pub fn molecule_indices(atoms: &[AtomRecord]) -> Vec<usize> {
    let mut out = Vec::with_capacity(atoms.len());
    let mut next = 0;
    let mut current = 0;
    let mut started = false;
    for atom in atoms {
        match atom.order {
            Some(order) => out.push(order),
            None => {
                if atom.residue_index == 0 || !started {
                    current = next;
                    next += 1;
                    started = true;
                }
                out.push(current);
            }
        }
    }
    out
}
