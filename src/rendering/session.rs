// src/rendering/session.rs

use super::palette::GuestPalette;

/// State carried between the passes of one render run.
///
/// The molecule pass records how many atoms belong to the host lattice so the
/// guest pass knows where guests start. The guest palette lives for the whole
/// run. One session per run; not shared.
#[derive(Clone, Debug, Default)]
pub struct RenderSession {
    water_atom_count: Option<usize>,
    pub palette: GuestPalette,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn water_atom_count(&self) -> Option<usize> {
        self.water_atom_count
    }

    pub fn set_water_atom_count(&mut self, n: usize) {
        self.water_atom_count = Some(n);
    }
}
