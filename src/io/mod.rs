// src/io/mod.rs
pub mod json;

use crate::model::IceStructure;
use std::io;

pub fn load_structure(path: &str) -> io::Result<IceStructure> {
    let p = path.to_lowercase();

    if p.ends_with(".json") {
        json::parse(path)
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Unsupported structure file (expected .json): {}", path),
        ))
    }
}
