// src/lib.rs
//
// Scene output for generated ice / clathrate structures.
// The structure is turned into spheres and cylinders (cell, water, hydrogen
// bonds, guests) and pushed into either an inline scene or a standalone viewer.

pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod model;
pub mod rendering;
pub mod sink;
pub mod utils;

pub use config::{Config, FormatOptions, ViewerKind};
pub use error::{FormatError, Result};
pub use format::MeshcatFormat;
pub use model::{AtomRecord, IceStructure, UnitCell};
