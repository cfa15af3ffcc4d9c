use crate::model::IceStructure;
use std::fs::File;
use std::io::{self, BufReader, Read};

pub fn parse(path: &str) -> io::Result<IceStructure> {
    let file = File::open(path)?;
    from_reader(BufReader::new(file))
}

pub fn from_reader<R: Read>(reader: R) -> io::Result<IceStructure> {
    let ice: IceStructure = serde_json::from_reader(reader)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid structure JSON: {}", e)))?;

    // Edges and centres refer to molecule slots; nothing else is checked here.
    if ice.atoms.is_empty() && ice.guests.is_empty() {
        log::warn!("Structure contains no atoms");
    }
    Ok(ice)
}
