// src/format.rs

use crate::config::FormatOptions;
use crate::error::{FormatError, Result};
use crate::model::IceStructure;
use crate::rendering::{
    render_cell, render_centers, render_guests, render_molecules, Layer, Primitive, RenderSession,
};
use crate::sink::SceneSink;
use log::{debug, info};
use std::time::Instant;

/// Plugin description shown by the host tool.
pub struct PluginDesc {
    pub reference: (&'static str, &'static str),
    pub brief: &'static str,
    pub usage: &'static str,
}

pub const DESC: PluginDesc = PluginDesc {
    reference: ("Meshcat", "https://github.com/rdeits/meshcat-python"),
    brief: "Meshcat-style 3D scene (inline or standalone viewer).",
    usage: "Options:\n    H=x   Set the radius of H to be x (0 draws centre-of-mass markers instead)",
};

/// A named stage of the host pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hook {
    pub stage: u8,
    pub description: &'static str,
}

pub const HOOKS: [Hook; 4] = [
    Hook { stage: 1, description: "Draw the cell." },
    Hook { stage: 2, description: "Output CoM of water molecules." },
    Hook { stage: 6, description: "Output water molecules." },
    Hook { stage: 7, description: "Output guest molecules." },
];

/// Drives the render passes into a scene sink.
///
/// The sink is opened by the caller and handed over here; it is cleared at
/// the start of every [`run`](Self::run). Any sink error aborts the run.
pub struct MeshcatFormat<S: SceneSink> {
    options: FormatOptions,
    sink: S,
    session: RenderSession,
}

impl<S: SceneSink> MeshcatFormat<S> {
    pub fn new(options: FormatOptions, sink: S) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            sink,
            session: RenderSession::new(),
        })
    }

    /// Parses `KEY=VALUE` style options, rejecting anything but `H`.
    pub fn from_pairs<I, K, V>(pairs: I, sink: S) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::new(FormatOptions::from_pairs(pairs)?, sink)
    }

    pub fn hooks(&self) -> &'static [Hook] {
        &HOOKS
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    pub fn session(&self) -> &RenderSession {
        &self.session
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Clears the scene and runs every hook in stage order.
    pub fn run(&mut self, ice: &IceStructure) -> Result<()> {
        self.session = RenderSession::new();
        self.sink.clear()?;
        for hook in HOOKS {
            self.run_hook(hook.stage, ice)?;
        }
        self.sink.finish()
    }

    /// Runs a single stage. Returns `false` when the stage drew nothing by choice
    /// (stage 2 with explicit hydrogens).
    pub fn run_hook(&mut self, stage: u8, ice: &IceStructure) -> Result<bool> {
        let hook = HOOKS
            .iter()
            .find(|h| h.stage == stage)
            .copied()
            .ok_or(FormatError::UnknownHook(stage))?;
        info!("Hook{}: {}", hook.stage, hook.description);
        let t0 = Instant::now();

        let drawn = match stage {
            1 => {
                let edges = render_cell(&ice.cell);
                self.draw(Layer::Cell, edges.into_iter().map(Primitive::from))?;
                true
            }
            2 => match render_centers(&ice.reduced_positions, &ice.cell, &self.options) {
                Some(markers) => {
                    self.draw(Layer::Centers, markers.into_iter().map(Primitive::from))?;
                    true
                }
                None => false,
            },
            6 => {
                info!("  Total number of atoms: {}", ice.atoms.len());
                let layers = render_molecules(
                    &ice.atoms,
                    &ice.hydrogen_bonds,
                    &self.options,
                    &mut self.session,
                );
                debug!(
                    "  {} water primitives, {} hydrogen bonds",
                    layers.water.len(),
                    layers.hydrogen_bonds.len()
                );
                self.draw(Layer::Water, layers.water)?;
                self.draw(Layer::HydrogenBonds, layers.hydrogen_bonds.into_iter().map(Primitive::from))?;
                true
            }
            7 => {
                let atoms = ice.all_atoms();
                info!("  Total number of atoms: {}", atoms.len());
                let guests = render_guests(&atoms, &mut self.session);
                debug!("  {} guest atoms", guests.len());
                self.draw(Layer::Guests, guests.into_iter().map(Primitive::from))?;
                true
            }
            _ => return Err(FormatError::UnknownHook(stage)),
        };

        debug!("Hook{} done in {:.3?}", stage, t0.elapsed());
        Ok(drawn)
    }

    fn draw<I>(&mut self, layer: Layer, primitives: I) -> Result<()>
    where
        I: IntoIterator<Item = Primitive>,
    {
        for p in primitives {
            let path = layer.path(p.label());
            self.sink.set_object(&path, &p.object())?;
            self.sink.set_transform(&path, &p.transform())?;
        }
        Ok(())
    }
}
