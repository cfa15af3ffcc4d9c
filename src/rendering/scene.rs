// src/rendering/scene.rs

use super::primitives::*;
use super::session::RenderSession;
use crate::config::FormatOptions;
use crate::model::molecule::{reconstruct_waters, Water};
use crate::model::structure::{molecule_indices, AtomRecord, UnitCell};
use log::{debug, warn};
use nalgebra::Vector3;
use std::collections::HashMap;

pub const CELL_EDGE_RADIUS: f64 = 0.01;
pub const CENTER_RADIUS: f64 = 0.03;
pub const OXYGEN_RADIUS: f64 = 0.03;
pub const COVALENT_BOND_RADIUS: f64 = 0.01;
pub const HYDROGEN_BOND_RADIUS: f64 = 0.005;
pub const GUEST_RADIUS: f64 = 0.04;

/// O···H distance (nm) below which a hydrogen bond is drawn.
pub const HYDROGEN_BOND_CUTOFF: f64 = 0.245;

/// Output of the molecule pass, one list per layer.
#[derive(Clone, Debug, Default)]
pub struct MoleculeLayers {
  pub water: Vec<Primitive>,
  pub hydrogen_bonds: Vec<CylinderPrimitive>,
}

// --- 1. Cell outline ---

/// The 12 edges of the cell. For each cyclic (p, q, r) of (a, b, c) the
/// edges start at 0, p, q, p+q and run along r; each edge appears once.
pub fn render_cell(cell: &UnitCell) -> Vec<CylinderPrimitive> {
  let (a, b, c) = (cell.a(), cell.b(), cell.c());
  let mut edges = Vec::with_capacity(12);
  for (p, q, r) in [(a, b, c), (b, c, a), (c, a, b)] {
    for origin in [Vector3::zeros(), p, q, p + q] {
      edges.push(CylinderPrimitive::new(
        format!("cell{}", edges.len()),
        origin,
        r,
        CELL_EDGE_RADIUS,
        CELL_COLOR,
      ));
    }
  }
  edges
}

// --- 2. Centre-of-mass markers ---

/// One marker per molecule, or `None` when hydrogens are drawn explicitly.
pub fn render_centers(
  reduced_positions: &[[f64; 3]],
  cell: &UnitCell,
  options: &FormatOptions,
) -> Option<Vec<SpherePrimitive>> {
  if options.explicit_hydrogens() {
    return None;
  }
  Some(
    reduced_positions
      .iter()
      .enumerate()
      .map(|(i, &r)| {
        SpherePrimitive::new(
          format!("com{}", i),
          Vector3::from(cell.to_cartesian(r)),
          CENTER_RADIUS,
          CENTER_COLOR,
        )
      })
      .collect(),
  )
}

// --- 3. Water molecules and hydrogen bonds ---

/// Vector from the acceptor oxygen to the donor's closer hydrogen, if that
/// hydrogen lies strictly within the cutoff.
///
/// The closer hydrogen must be strictly closer: two equidistant hydrogens
/// give no bond.
pub fn hydrogen_bond_vector(donor: &Water, acceptor: &Water) -> Option<Vector3<f64>> {
  let d0 = donor.h0 - acceptor.oxygen;
  let closer = match donor.h1 {
    None => d0,
    Some(h1) => {
      let d1 = h1 - acceptor.oxygen;
      let (r0, r1) = (d0.norm_squared(), d1.norm_squared());
      if r0 < r1 {
        d0
      } else if r1 < r0 {
        d1
      } else {
        return None;
      }
    }
  };
  Some(closer).filter(|d| d.norm_squared() < HYDROGEN_BOND_CUTOFF * HYDROGEN_BOND_CUTOFF)
}

pub fn render_molecules(
  atoms: &[AtomRecord],
  edges: &[(usize, usize)],
  options: &FormatOptions,
  session: &mut RenderSession,
) -> MoleculeLayers {
  let waters = reconstruct_waters(atoms);
  let mut layers = MoleculeLayers::default();

  for (i, w) in &waters {
    layers.water.push(
      SpherePrimitive::new(format!("O{}", i), w.oxygen, OXYGEN_RADIUS, OXYGEN_COLOR).into(),
    );
    let hydrogens = [("A", Some(w.h0)), ("B", w.h1)];
    // zero radius: markers replace the H spheres, O-H sticks stay
    if options.explicit_hydrogens() {
      for (tag, h) in hydrogens {
        if let Some(h) = h {
          layers.water.push(
            SpherePrimitive::new(format!("H{}{}", tag, i), h, options.hydrogen_radius, HYDROGEN_COLOR)
              .into(),
          );
        }
      }
    }
    for (tag, h) in hydrogens {
      if let Some(h) = h {
        layers.water.push(
          CylinderPrimitive::new(
            format!("OH{}{}", tag, i),
            w.oxygen,
            h - w.oxygen,
            COVALENT_BOND_RADIUS,
            COVALENT_BOND_COLOR,
          )
          .into(),
        );
      }
    }
  }

  for &(i, j) in edges {
    // edge may connect to a dopant
    let (Some(donor), Some(acceptor)) = (waters.get(&i), waters.get(&j)) else {
      debug!("Hydrogen bond {}-{} touches a non-water slot; skipped", i, j);
      continue;
    };
    if let Some(d) = hydrogen_bond_vector(donor, acceptor) {
      layers.hydrogen_bonds.push(CylinderPrimitive::new(
        format!("HB{}_{}", i, j),
        acceptor.oxygen,
        d,
        HYDROGEN_BOND_RADIUS,
        HYDROGEN_BOND_COLOR,
      ));
    }
  }

  session.set_water_atom_count(atoms.len());
  layers
}

// --- 4. Guests ---

struct GuestBucket<'a> {
  residue_name: &'a str,
  order: usize,
  // atom name -> positions, in first-seen order
  groups: Vec<(&'a str, Vec<Vector3<f64>>)>,
}

/// Spheres for every atom after the host molecules, colored per atom name.
///
/// Atoms are bucketed by (residue name, molecule index), then by atom name.
/// Labels are `{resname}_{order}/{atomname}_{k}`, where `k` counts the atoms of
/// that name inside the bucket.
pub fn render_guests(atoms: &[AtomRecord], session: &mut RenderSession) -> Vec<SpherePrimitive> {
  let start = match session.water_atom_count() {
    Some(n) => n,
    None => {
      warn!("Guest pass ran before the molecule pass; treating every atom as a guest");
      0
    }
  };
  if start >= atoms.len() {
    return Vec::new();
  }
  let guests = &atoms[start..];
  let indices = molecule_indices(guests);

  let mut buckets: Vec<GuestBucket> = Vec::new();
  let mut bucket_of: HashMap<(&str, usize), usize> = HashMap::new();
  for (atom, order) in guests.iter().zip(indices) {
    // fix the color on first sight
    session.palette.color_for(&atom.atom_name);

    let key = (atom.residue_name.as_str(), order);
    let b = *bucket_of.entry(key).or_insert_with(|| {
      buckets.push(GuestBucket {
        residue_name: key.0,
        order,
        groups: Vec::new(),
      });
      buckets.len() - 1
    });
    let groups = &mut buckets[b].groups;
    let pos = Vector3::from(atom.position);
    match groups.iter_mut().find(|(name, _)| *name == atom.atom_name) {
      Some((_, list)) => list.push(pos),
      None => groups.push((atom.atom_name.as_str(), vec![pos])),
    }
  }

  let mut spheres = Vec::with_capacity(guests.len());
  for bucket in &buckets {
    for (name, positions) in &bucket.groups {
      let color = session.palette.color_for(name);
      for (k, &p) in positions.iter().enumerate() {
        spheres.push(SpherePrimitive::new(
          format!("{}_{}/{}_{}", bucket.residue_name, bucket.order, name, k),
          p,
          GUEST_RADIUS,
          color,
        ));
      }
    }
  }
  spheres
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sink::{InlineScene, SceneSink};

  fn opts(h: f64) -> FormatOptions {
    FormatOptions { hydrogen_radius: h }
  }

  fn identity() -> UnitCell {
    UnitCell::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
  }

  fn water(order: usize, o: [f64; 3], h0: [f64; 3], h1: [f64; 3]) -> Vec<AtomRecord> {
    vec![
      AtomRecord::new(0, "ICE", "OW", o, Some(order)),
      AtomRecord::new(1, "ICE", "HW1", h0, Some(order)),
      AtomRecord::new(2, "ICE", "HW2", h1, Some(order)),
    ]
  }

  fn spheres(prims: &[Primitive]) -> Vec<&SpherePrimitive> {
    prims
      .iter()
      .filter_map(|p| match p {
        Primitive::Sphere(s) => Some(s),
        _ => None,
      })
      .collect()
  }

  fn cylinders(prims: &[Primitive]) -> Vec<&CylinderPrimitive> {
    prims
      .iter()
      .filter_map(|p| match p {
        Primitive::Cylinder(c) => Some(c),
        _ => None,
      })
      .collect()
  }

  #[test]
  fn test_cell_has_twelve_edges_touching_every_corner() {
    let cell = UnitCell::new([[0.9, 0.0, 0.0], [0.3, 0.8, 0.0], [0.1, 0.2, 1.1]]);
    let edges = render_cell(&cell);
    assert_eq!(edges.len(), 12);

    for corner in cell.corners() {
      let corner = Vector3::from(corner);
      let touching = edges
        .iter()
        .filter(|e| (e.start - corner).norm() < 1e-9 || (e.end() - corner).norm() < 1e-9)
        .count();
      assert!(touching >= 3, "corner {corner:?} touched {touching} times");
    }
  }

  #[test]
  fn test_identity_cell_edges() {
    let edges = render_cell(&identity());
    let axes = [Vector3::x(), Vector3::y(), Vector3::z()];
    for e in &edges {
      assert!(axes.contains(&e.direction));
      assert_eq!(e.radius, CELL_EDGE_RADIUS);
      assert_eq!(e.color, CELL_COLOR);
    }
    // first group runs along c from {0, a, b, a+b}
    let starts: Vec<_> = edges[..4].iter().map(|e| e.start).collect();
    assert_eq!(
      starts,
      vec![
        Vector3::zeros(),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(1.0, 1.0, 0.0)
      ]
    );
    assert!(edges[..4].iter().all(|e| e.direction == Vector3::z()));
    assert_eq!(edges[11].label, "cell11");

    // no edge enumerated twice
    for (i, a) in edges.iter().enumerate() {
      for b in &edges[i + 1..] {
        assert!(!(a.start == b.start && a.direction == b.direction));
      }
    }
  }

  #[test]
  fn test_centers_skipped_with_explicit_hydrogens() {
    assert!(render_centers(&[[0.5, 0.5, 0.5]], &identity(), &opts(0.015)).is_none());
  }

  #[test]
  fn test_centers_in_cartesian() {
    let cell = UnitCell::new([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]);
    let markers = render_centers(&[[0.5, 0.25, 0.0], [0.0, 0.0, 1.0]], &cell, &opts(0.0)).unwrap();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].center, Vector3::new(1.0, 0.5, 0.0));
    assert_eq!(markers[1].center, Vector3::new(0.0, 0.0, 2.0));
    assert_eq!(markers[1].label, "com1");
    assert_eq!(markers[0].radius, CENTER_RADIUS);
  }

  #[test]
  fn test_single_water() {
    let atoms = water(0, [0.0; 3], [0.1, 0.0, 0.0], [0.0, 0.1, 0.0]);
    let mut session = RenderSession::new();
    let layers = render_molecules(&atoms, &[], &opts(0.015), &mut session);

    let s = spheres(&layers.water);
    assert_eq!(s.len(), 3);
    let oxygens: Vec<_> = s.iter().filter(|s| s.color == OXYGEN_COLOR).collect();
    assert_eq!(oxygens.len(), 1);
    assert_eq!(oxygens[0].radius, OXYGEN_RADIUS);
    let hydrogens: Vec<_> = s.iter().filter(|s| s.label.starts_with('H')).collect();
    assert_eq!(hydrogens.len(), 2);
    assert!(hydrogens.iter().all(|h| h.radius == 0.015));

    let c = cylinders(&layers.water);
    assert_eq!(c.len(), 2);
    assert!(c.iter().all(|c| (c.length() - 0.1).abs() < 1e-12));
    assert!(layers.hydrogen_bonds.is_empty());
    assert_eq!(session.water_atom_count(), Some(3));
  }

  #[test]
  fn test_zero_radius_keeps_sticks_drops_h_spheres() {
    let atoms = water(0, [0.0; 3], [0.1, 0.0, 0.0], [0.0, 0.1, 0.0]);
    let mut session = RenderSession::new();
    let layers = render_molecules(&atoms, &[], &opts(0.0), &mut session);

    let s = spheres(&layers.water);
    assert_eq!(s.len(), 1);
    assert_eq!(s[0].label, "O0");
    assert_eq!(cylinders(&layers.water).len(), 2);

    let markers = render_centers(&[[0.1, 0.2, 0.3]], &identity(), &opts(0.0)).unwrap();
    assert_eq!(markers.len(), 1);
  }

  #[test]
  fn test_hydrogen_bond_picks_closer_hydrogen() {
    // donor 0 at origin; H0 points at acceptor 1, H1 points away
    let mut atoms = water(0, [0.0; 3], [0.1, 0.0, 0.0], [-0.03, 0.09, 0.0]);
    atoms.extend(water(1, [0.28, 0.0, 0.0], [0.31, 0.09, 0.0], [0.31, -0.09, 0.0]));
    let mut session = RenderSession::new();
    let layers = render_molecules(&atoms, &[(0, 1)], &opts(0.015), &mut session);

    assert_eq!(layers.hydrogen_bonds.len(), 1);
    let hb = &layers.hydrogen_bonds[0];
    assert_eq!(hb.label, "HB0_1");
    assert_eq!(hb.start, Vector3::new(0.28, 0.0, 0.0));
    assert!((hb.end() - Vector3::new(0.1, 0.0, 0.0)).norm() < 1e-12);
    assert!((hb.length() - 0.18).abs() < 1e-12);
    assert_eq!(hb.radius, HYDROGEN_BOND_RADIUS);
    assert_eq!(hb.color, HYDROGEN_BOND_COLOR);
  }

  #[test]
  fn test_hydrogen_bond_uses_h1_when_closer() {
    let donor = Water {
      oxygen: Vector3::zeros(),
      h0: Vector3::new(-0.1, 0.0, 0.0),
      h1: Some(Vector3::new(0.0, 0.1, 0.0)),
    };
    let acceptor = Water {
      oxygen: Vector3::new(0.0, 0.28, 0.0),
      h0: Vector3::new(0.0, 0.38, 0.0),
      h1: None,
    };
    let d = hydrogen_bond_vector(&donor, &acceptor).unwrap();
    assert!((d - Vector3::new(0.0, -0.18, 0.0)).norm() < 1e-12);
  }

  #[test]
  fn test_hydrogen_bond_cutoff_is_strict() {
    let acceptor = Water {
      oxygen: Vector3::zeros(),
      h0: Vector3::new(0.0, 0.0, 0.1),
      h1: None,
    };
    let at = |x: f64| Water {
      oxygen: Vector3::new(x + 0.1, 0.0, 0.0),
      h0: Vector3::new(x, 0.0, 0.0),
      h1: Some(Vector3::new(x + 0.2, 0.0, 0.0)),
    };
    assert!(hydrogen_bond_vector(&at(HYDROGEN_BOND_CUTOFF), &acceptor).is_none());
    assert!(hydrogen_bond_vector(&at(0.2449), &acceptor).is_some());
    assert!(hydrogen_bond_vector(&at(0.3), &acceptor).is_none());
  }

  #[test]
  fn test_hydrogen_bond_tie_draws_nothing() {
    let donor = Water {
      oxygen: Vector3::zeros(),
      h0: Vector3::new(0.1, 0.05, 0.0),
      h1: Some(Vector3::new(0.1, -0.05, 0.0)),
    };
    let acceptor = Water {
      oxygen: Vector3::new(0.28, 0.0, 0.0),
      h0: Vector3::new(0.38, 0.0, 0.0),
      h1: None,
    };
    assert!(hydrogen_bond_vector(&donor, &acceptor).is_none());

    // a single hydrogen has no rival
    let lone = Water { h1: None, ..donor };
    let d = hydrogen_bond_vector(&lone, &acceptor).unwrap();
    assert!((d - Vector3::new(-0.18, 0.05, 0.0)).norm() < 1e-12);
  }

  #[test]
  fn test_edges_to_dopants_skipped() {
    let atoms = water(0, [0.0; 3], [0.1, 0.0, 0.0], [0.0, 0.1, 0.0]);
    let mut session = RenderSession::new();
    let layers = render_molecules(&atoms, &[(0, 9), (9, 0)], &opts(0.015), &mut session);
    assert!(layers.hydrogen_bonds.is_empty());
  }

  #[test]
  fn test_guests_start_after_waters() {
    let mut atoms = water(0, [0.0; 3], [0.1, 0.0, 0.0], [0.0, 0.1, 0.0]);
    atoms.extend(vec![
      AtomRecord::new(0, "ME", "C", [0.5, 0.5, 0.5], Some(10)),
      AtomRecord::new(1, "ME", "H", [0.6, 0.5, 0.5], Some(10)),
      AtomRecord::new(2, "ME", "H", [0.4, 0.5, 0.5], Some(10)),
      AtomRecord::new(0, "ME", "C", [0.5, 0.9, 0.5], Some(11)),
    ]);
    let mut session = RenderSession::new();
    render_molecules(&atoms[..3], &[], &opts(0.015), &mut session);
    let guests = render_guests(&atoms, &mut session);

    let labels: Vec<_> = guests.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["ME_10/C_0", "ME_10/H_0", "ME_10/H_1", "ME_11/C_0"]);
    assert!(guests.iter().all(|g| g.radius == GUEST_RADIUS));
    assert_eq!(guests[0].color, guests[3].color);
    assert_eq!(guests[1].color, guests[2].color);
    assert_ne!(guests[0].color, guests[1].color);
    assert_eq!(session.palette.get("C"), Some(guests[0].color));
  }

  #[test]
  fn test_guest_grouping_by_name_inside_bucket() {
    let atoms = vec![
      AtomRecord::new(0, "THF", "O", [0.0; 3], Some(0)),
      AtomRecord::new(1, "THF", "C", [0.1, 0.0, 0.0], Some(0)),
      AtomRecord::new(2, "THF", "O", [0.2, 0.0, 0.0], Some(0)),
    ];
    let mut session = RenderSession::new();
    session.set_water_atom_count(0);
    let guests = render_guests(&atoms, &mut session);
    let labels: Vec<_> = guests.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["THF_0/O_0", "THF_0/O_1", "THF_0/C_0"]);
  }

  #[test]
  fn test_guest_labels_keep_buckets_apart() {
    let atoms = vec![
      AtomRecord::new(0, "CO2", "C", [0.0; 3], Some(12)),
      AtomRecord::new(0, "CO21", "C", [0.5; 3], Some(2)),
    ];
    let mut session = RenderSession::new();
    session.set_water_atom_count(0);
    let guests = render_guests(&atoms, &mut session);
    let labels: Vec<_> = guests.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["CO2_12/C_0", "CO21_2/C_0"]);

    let mut scene = InlineScene::new();
    for g in &guests {
      let path = Layer::Guests.path(&g.label);
      scene.set_object(&path, &g.object()).unwrap();
    }
    assert_eq!(scene.layer("guest").count(), 2);
  }

  #[test]
  fn test_guest_palette_is_reproducible() {
    let atoms = vec![
      AtomRecord::new(0, "CO2", "C", [0.0; 3], Some(0)),
      AtomRecord::new(1, "CO2", "O", [0.1, 0.0, 0.0], Some(0)),
      AtomRecord::new(0, "CH4", "C", [0.5; 3], Some(1)),
      AtomRecord::new(1, "CH4", "H", [0.6, 0.5, 0.5], Some(1)),
    ];
    let run = || {
      let mut session = RenderSession::new();
      session.set_water_atom_count(0);
      render_guests(&atoms, &mut session)
        .into_iter()
        .map(|g| (g.label, g.color))
        .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
  }

  #[test]
  fn test_no_guests_past_end() {
    let atoms = water(0, [0.0; 3], [0.1, 0.0, 0.0], [0.0, 0.1, 0.0]);
    let mut session = RenderSession::new();
    render_molecules(&atoms, &[], &opts(0.015), &mut session);
    assert!(render_guests(&atoms, &mut session).is_empty());
    assert!(session.palette.is_empty());
  }
}
