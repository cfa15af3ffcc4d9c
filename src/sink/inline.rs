// src/sink/inline.rs

use super::SceneSink;
use crate::error::Result;
use crate::rendering::SceneObject;
use nalgebra::Matrix4;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SceneNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<SceneObject>,
    /// Row-major 4x4
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<[[f64; 4]; 4]>,
}

/// In-memory scene for embedded viewers. Nodes are kept sorted by path.
#[derive(Clone, Debug, Default)]
pub struct InlineScene {
    nodes: BTreeMap<String, SceneNode>,
}

#[derive(Serialize)]
struct Document<'a> {
    nodes: Vec<NodeEntry<'a>>,
}

#[derive(Serialize)]
struct NodeEntry<'a> {
    path: &'a str,
    #[serde(flatten)]
    node: &'a SceneNode,
}

impl InlineScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&SceneNode> {
        self.nodes.get(path)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes whose path starts with `layer/`.
    pub fn layer<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = (&'a str, &'a SceneNode)> + 'a {
        self.nodes
            .iter()
            .filter(move |(p, _)| p.split('/').next() == Some(layer))
            .map(|(p, n)| (p.as_str(), n))
    }

    /// JSON document `{"nodes": [{"path", "object", "transform"}, ...]}`.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.document())?)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &self.document())?;
        Ok(())
    }

    fn document(&self) -> Document<'_> {
        Document {
            nodes: self
                .nodes
                .iter()
                .map(|(path, node)| NodeEntry { path, node })
                .collect(),
        }
    }
}

impl SceneSink for InlineScene {
    fn set_object(&mut self, path: &str, object: &SceneObject) -> Result<()> {
        self.nodes.entry(path.to_string()).or_default().object = Some(object.clone());
        Ok(())
    }

    fn set_transform(&mut self, path: &str, transform: &Matrix4<f64>) -> Result<()> {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = transform[(i, j)];
            }
        }
        self.nodes.entry(path.to_string()).or_default().transform = Some(rows);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.nodes.clear();
        Ok(())
    }
}
