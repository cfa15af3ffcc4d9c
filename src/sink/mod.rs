// src/sink/mod.rs
pub mod inline;
pub mod standalone;

use crate::config::ViewerKind;
use crate::error::Result;
use crate::rendering::SceneObject;
use nalgebra::Matrix4;
use std::net::TcpStream;

pub use inline::InlineScene;
pub use standalone::StandaloneViewer;

/// A 3D scene addressed by `/`-separated labels (`water/O3`).
pub trait SceneSink {
    fn set_object(&mut self, path: &str, object: &SceneObject) -> Result<()>;

    fn set_transform(&mut self, path: &str, transform: &Matrix4<f64>) -> Result<()>;

    /// Removes every node.
    fn clear(&mut self) -> Result<()>;

    /// Pushes out anything buffered. Called once at the end of a run.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// The two sink variants, chosen once at construction.
pub enum Viewer {
    Inline(InlineScene),
    Standalone(StandaloneViewer<TcpStream>),
}

impl Viewer {
    pub fn open(kind: ViewerKind, address: &str) -> Result<Self> {
        match kind {
            ViewerKind::Inline => Ok(Viewer::Inline(InlineScene::new())),
            ViewerKind::Standalone => Ok(Viewer::Standalone(StandaloneViewer::connect(address)?)),
        }
    }
}

impl SceneSink for Viewer {
    fn set_object(&mut self, path: &str, object: &SceneObject) -> Result<()> {
        match self {
            Viewer::Inline(s) => s.set_object(path, object),
            Viewer::Standalone(s) => s.set_object(path, object),
        }
    }

    fn set_transform(&mut self, path: &str, transform: &Matrix4<f64>) -> Result<()> {
        match self {
            Viewer::Inline(s) => s.set_transform(path, transform),
            Viewer::Standalone(s) => s.set_transform(path, transform),
        }
    }

    fn clear(&mut self) -> Result<()> {
        match self {
            Viewer::Inline(s) => s.clear(),
            Viewer::Standalone(s) => s.clear(),
        }
    }

    fn finish(&mut self) -> Result<()> {
        match self {
            Viewer::Inline(s) => s.finish(),
            Viewer::Standalone(s) => s.finish(),
        }
    }
}
