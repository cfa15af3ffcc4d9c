// src/sink/standalone.rs
//
// Browser-rendered viewer. Commands go out as newline-delimited JSON:
//   {"type":"set_object","path":"/meshcat/water/O3","object":{...}}
//   {"type":"set_transform","path":"/meshcat/water/O3","matrix":[16 floats, column-major]}
//   {"type":"delete","path":"/meshcat"}

use super::SceneSink;
use crate::error::{FormatError, Result};
use crate::rendering::SceneObject;
use log::info;
use nalgebra::Matrix4;
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::net::TcpStream;

const ROOT: &str = "/meshcat";

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Command<'a> {
    SetObject {
        path: String,
        object: &'a SceneObject,
    },
    SetTransform {
        path: String,
        matrix: [f64; 16],
    },
    Delete {
        path: String,
    },
}

pub struct StandaloneViewer<W: Write = TcpStream> {
    writer: BufWriter<W>,
}

impl StandaloneViewer<TcpStream> {
    /// Connects to a running viewer server. Failure here is fatal for the run.
    pub fn connect(address: &str) -> Result<Self> {
        let stream = TcpStream::connect(address).map_err(|source| FormatError::SinkUnavailable {
            address: address.to_string(),
            source,
        })?;
        info!("Connected to scene viewer at {}", address);
        Ok(Self::from_writer(stream))
    }
}

impl<W: Write> StandaloneViewer<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| FormatError::Sink(e.into_error()))
    }

    fn send(&mut self, command: &Command) -> Result<()> {
        serde_json::to_writer(&mut self.writer, command).map_err(|e| FormatError::Sink(e.into()))?;
        self.writer.write_all(b"\n").map_err(FormatError::Sink)
    }
}

fn full_path(path: &str) -> String {
    format!("{}/{}", ROOT, path.trim_start_matches('/'))
}

impl<W: Write> SceneSink for StandaloneViewer<W> {
    fn set_object(&mut self, path: &str, object: &SceneObject) -> Result<()> {
        self.send(&Command::SetObject {
            path: full_path(path),
            object,
        })
    }

    fn set_transform(&mut self, path: &str, transform: &Matrix4<f64>) -> Result<()> {
        let mut matrix = [0.0; 16];
        // nalgebra storage is column-major, same as three.js
        matrix.copy_from_slice(transform.as_slice());
        self.send(&Command::SetTransform {
            path: full_path(path),
            matrix,
        })
    }

    fn clear(&mut self) -> Result<()> {
        self.send(&Command::Delete {
            path: ROOT.to_string(),
        })?;
        self.writer.flush().map_err(FormatError::Sink)
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().map_err(FormatError::Sink)
    }
}
