// src/rendering/primitives.rs

use crate::utils::linalg::{cylinder_transform, translation_matrix};
use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

/// 8-bit RGB. Packs as 0xRRGGBB (red high, blue low).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_packed(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    pub const fn packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// HSV in [0, 1] -> RGB, each channel truncated to 0..=255.
    pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
        let (r, g, b) = if s == 0.0 {
            (v, v, v)
        } else {
            let h6 = h.rem_euclid(1.0) * 6.0;
            let i = h6.floor();
            let f = h6 - i;
            let p = v * (1.0 - s);
            let q = v * (1.0 - s * f);
            let t = v * (1.0 - s * (1.0 - f));
            match i as u8 % 6 {
                0 => (v, t, p),
                1 => (q, v, p),
                2 => (p, v, t),
                3 => (p, q, v),
                4 => (t, p, v),
                _ => (v, p, q),
            }
        };
        let ch = |x: f64| (x.clamp(0.0, 1.0) * 255.0) as u8;
        Self::new(ch(r), ch(g), ch(b))
    }
}

// --- Fixed palette ---
pub const CELL_COLOR: Color = Color::from_packed(0x888888);
pub const CENTER_COLOR: Color = Color::from_packed(0x00ffff);
pub const OXYGEN_COLOR: Color = Color::from_packed(0xff0000);
pub const HYDROGEN_COLOR: Color = Color::from_packed(0x00ffff);
pub const COVALENT_BOND_COLOR: Color = Color::from_packed(0xffffff);
pub const HYDROGEN_BOND_COLOR: Color = Color::from_packed(0xffff00);

/// Named groups of scene nodes. The name is the first path segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Cell,
    Centers,
    Water,
    HydrogenBonds,
    Guests,
}

impl Layer {
    pub fn name(self) -> &'static str {
        match self {
            Layer::Cell => "cell",
            Layer::Centers => "com",
            Layer::Water => "water",
            Layer::HydrogenBonds => "HB",
            Layer::Guests => "guest",
        }
    }

    /// Scene path of a node in this layer, e.g. `water/O3`.
    pub fn path(self, label: &str) -> String {
        format!("{}/{}", self.name(), label)
    }
}

// --- Scene objects (what the sink receives) ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    Sphere { radius: f64 },
    /// Centred at the origin, axis along +y
    Cylinder { height: f64, radius: f64 },
}

/// Lambert material; the only property is its color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    #[serde(with = "packed_color")]
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub geometry: Geometry,
    pub material: Material,
}

mod packed_color {
    use super::Color;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(c: &Color, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u32(c.packed())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Color, D::Error> {
        u32::deserialize(d).map(Color::from_packed)
    }
}

// --- Primitives ---

#[derive(Clone, Debug, PartialEq)]
pub struct SpherePrimitive {
    pub label: String,
    pub center: Vector3<f64>,
    pub radius: f64,
    pub color: Color,
}

impl SpherePrimitive {
    pub fn new(label: String, center: Vector3<f64>, radius: f64, color: Color) -> Self {
        Self {
            label,
            center,
            radius,
            color,
        }
    }

    pub fn object(&self) -> SceneObject {
        SceneObject {
            geometry: Geometry::Sphere {
                radius: self.radius,
            },
            material: Material { color: self.color },
        }
    }

    pub fn transform(&self) -> Matrix4<f64> {
        translation_matrix(self.center)
    }
}

/// Bond from `start` to `start + direction`.
#[derive(Clone, Debug, PartialEq)]
pub struct CylinderPrimitive {
    pub label: String,
    pub start: Vector3<f64>,
    pub direction: Vector3<f64>,
    pub radius: f64,
    pub color: Color,
}

impl CylinderPrimitive {
    pub fn new(
        label: String,
        start: Vector3<f64>,
        direction: Vector3<f64>,
        radius: f64,
        color: Color,
    ) -> Self {
        Self {
            label,
            start,
            direction,
            radius,
            color,
        }
    }

    pub fn length(&self) -> f64 {
        self.direction.norm()
    }

    pub fn end(&self) -> Vector3<f64> {
        self.start + self.direction
    }

    pub fn object(&self) -> SceneObject {
        SceneObject {
            geometry: Geometry::Cylinder {
                height: self.length(),
                radius: self.radius,
            },
            material: Material { color: self.color },
        }
    }

    pub fn transform(&self) -> Matrix4<f64> {
        cylinder_transform(self.start, self.direction)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Sphere(SpherePrimitive),
    Cylinder(CylinderPrimitive),
}

impl Primitive {
    pub fn label(&self) -> &str {
        match self {
            Primitive::Sphere(s) => &s.label,
            Primitive::Cylinder(c) => &c.label,
        }
    }

    pub fn object(&self) -> SceneObject {
        match self {
            Primitive::Sphere(s) => s.object(),
            Primitive::Cylinder(c) => c.object(),
        }
    }

    pub fn transform(&self) -> Matrix4<f64> {
        match self {
            Primitive::Sphere(s) => s.transform(),
            Primitive::Cylinder(c) => c.transform(),
        }
    }
}

impl From<SpherePrimitive> for Primitive {
    fn from(s: SpherePrimitive) -> Self {
        Primitive::Sphere(s)
    }
}

impl From<CylinderPrimitive> for Primitive {
    fn from(c: CylinderPrimitive) -> Self {
        Primitive::Cylinder(c)
    }
}
