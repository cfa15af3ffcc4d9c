// src/rendering/palette.rs

use super::primitives::Color;
use std::collections::HashMap;

/// Color of the n-th distinct guest atom name (n starts at 1).
/// Hues step by 1/φ so neighbours in first-seen order stay far apart.
pub fn golden_hue_color(n: usize) -> Color {
    let phi = (1.0 + 5f64.sqrt()) / 2.0;
    let hue = (n as f64 / phi).rem_euclid(1.0);
    Color::from_hsv(hue, 1.0, 1.0)
}

/// Atom name -> color, assigned on first sight and never changed afterwards.
#[derive(Clone, Debug, Default)]
pub struct GuestPalette {
    colors: HashMap<String, Color>,
}

impl GuestPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_for(&mut self, atom_name: &str) -> Color {
        if let Some(c) = self.colors.get(atom_name) {
            return *c;
        }
        let c = golden_hue_color(self.colors.len() + 1);
        self.colors.insert(atom_name.to_string(), c);
        c
    }

    pub fn get(&self, atom_name: &str) -> Option<Color> {
        self.colors.get(atom_name).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
