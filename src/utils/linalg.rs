// src/utils/linalg.rs

use nalgebra::{Matrix3, Matrix4, Rotation3, Vector3};
use std::f64::consts::PI;

/// Convert fractional coordinates to Cartesian using lattice matrix
///
/// # Arguments
/// * `frac` - Fractional coordinates [x, y, z]
/// * `lattice` - Lattice vectors as row matrix [[ax, ay, az], [bx, by, bz], [cx, cy, cz]]
///
/// # Formula
/// ```text
/// Cartesian = Lattice^T × Fractional
/// ```
pub fn frac_to_cart(frac: [f64; 3], lattice: [[f64; 3]; 3]) -> [f64; 3] {
  let frac_vec = Vector3::from(frac);
  let lat_mat = Matrix3::from_row_slice(&[
    lattice[0][0],
    lattice[0][1],
    lattice[0][2],
    lattice[1][0],
    lattice[1][1],
    lattice[1][2],
    lattice[2][0],
    lattice[2][1],
    lattice[2][2],
  ]);

  let cart_vec = lat_mat.transpose() * frac_vec;

  [cart_vec.x, cart_vec.y, cart_vec.z]
}

/// 4x4 homogeneous translation.
pub fn translation_matrix(offset: Vector3<f64>) -> Matrix4<f64> {
  Matrix4::new_translation(&offset)
}

/// Rotation taking the canonical cylinder axis (+y) onto `direction`.
///
/// Antiparallel directions turn by π about +x; a zero vector gives identity.
pub fn align_y_axis(direction: &Vector3<f64>) -> Rotation3<f64> {
  let y = Vector3::y();
  match direction.try_normalize(1e-12) {
    None => Rotation3::identity(),
    Some(e) => Rotation3::rotation_between(&y, &e)
      .unwrap_or_else(|| Rotation3::from_axis_angle(&Vector3::x_axis(), PI)),
  }
}

/// Placement of a y-axis cylinder of length |direction| centred at the origin
/// so that it spans `start` .. `start + direction`.
pub fn cylinder_transform(start: Vector3<f64>, direction: Vector3<f64>) -> Matrix4<f64> {
  let half = direction.norm() / 2.0;
  translation_matrix(start)
    * align_y_axis(&direction).to_homogeneous()
    * translation_matrix(Vector3::new(0.0, half, 0.0))
}
