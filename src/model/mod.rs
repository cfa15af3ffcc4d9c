//src/model/mod.rs
pub mod molecule;
pub mod structure;

// Re-exports for cleaner imports
pub use molecule::{reconstruct_waters, MoleculeGeometry, Water};
pub use structure::{molecule_indices, AtomRecord, IceStructure, UnitCell};
