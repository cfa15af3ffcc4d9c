// src/config.rs

use crate::error::{FormatError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

pub const DEFAULT_HYDROGEN_RADIUS: f64 = 0.015;
pub const DEFAULT_VIEWER_ADDRESS: &str = "127.0.0.1:7000";

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewerKind {
  /// Embedded scene, dumped as a JSON document for a notebook viewer
  #[default]
  Inline,
  /// Browser-rendered viewer reached over TCP
  Standalone,
}

// --- FormatOptions ---

/// Options recognized by the format. The key set is fixed: `H` only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormatOptions {
  /// Radius of hydrogen spheres. Zero switches to centre-of-mass markers.
  pub hydrogen_radius: f64,
}

impl Default for FormatOptions {
  fn default() -> Self {
    Self {
      hydrogen_radius: DEFAULT_HYDROGEN_RADIUS,
    }
  }
}

impl FormatOptions {
  /// Builds options from `(key, value)` pairs on top of the defaults.
  pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
  where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
  {
    let mut options = Self::default();
    for (k, v) in pairs {
      options.apply(k.as_ref(), v.as_ref())?;
    }
    Ok(options)
  }

  /// Sets a single option. Unknown keys and unusable values are rejected.
  pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
    match key {
      "H" => {
        let radius: f64 = value.trim().parse().map_err(|_| FormatError::InvalidOption {
          key: key.to_string(),
          value: value.to_string(),
          reason: "expected a number".to_string(),
        })?;
        self.hydrogen_radius = radius;
        self.validate()
      }
      _ => Err(FormatError::UnknownOption(key.to_string())),
    }
  }

  pub fn validate(&self) -> Result<()> {
    let r = self.hydrogen_radius;
    if !r.is_finite() || r < 0.0 {
      return Err(FormatError::InvalidOption {
        key: "H".to_string(),
        value: r.to_string(),
        reason: "radius must be a finite, non-negative number".to_string(),
      });
    }
    Ok(())
  }

  /// Splits a `KEY=VALUE` argument.
  pub fn split_pair(arg: &str) -> Result<(&str, &str)> {
    match arg.split_once('=') {
      Some((k, v)) if !k.trim().is_empty() => Ok((k.trim(), v.trim())),
      _ => Err(FormatError::InvalidOption {
        key: arg.to_string(),
        value: String::new(),
        reason: "expected KEY=VALUE".to_string(),
      }),
    }
  }

  /// Hydrogens are drawn as spheres only with a positive radius.
  pub fn explicit_hydrogens(&self) -> bool {
    self.hydrogen_radius > 0.0
  }
}

// --- Main Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
  #[serde(default)]
  pub options: FormatOptions,

  #[serde(default)]
  pub viewer: ViewerKind,

  #[serde(default = "default_address")]
  pub viewer_address: String,
}

fn default_address() -> String {
  DEFAULT_VIEWER_ADDRESS.to_string()
}

impl Default for Config {
  fn default() -> Self {
    Self {
      options: FormatOptions::default(),
      viewer: ViewerKind::Inline,
      viewer_address: default_address(),
    }
  }
}

impl Config {
  /// Loads config from standard OS location (e.g., ~/.config/genice-meshcat/settings.json)
  pub fn load() -> (Self, String) {
    Self::load_from(&Self::get_path())
  }

  pub fn load_from(path: &Path) -> (Self, String) {
    if path.exists() {
      match File::open(path) {
        Ok(file) => {
          let reader = BufReader::new(file);
          match serde_json::from_reader::<_, Config>(reader) {
            Ok(cfg) => match cfg.options.validate() {
              Ok(()) => (cfg, format!("Config loaded from {:?}", path)),
              Err(e) => (Self::default(), format!("Ignoring config {:?}: {}", path, e)),
            },
            Err(e) => (Self::default(), format!("Error parsing config: {}", e)),
          }
        }
        Err(e) => (Self::default(), format!("Error opening config: {}", e)),
      }
    } else {
      (
        Self::default(),
        "No config found. Using defaults.".to_string(),
      )
    }
  }

  /// Saves config to standard OS location
  pub fn save(&self) -> Result<PathBuf> {
    let path = Self::get_path();
    self.save_to(&path)?;
    Ok(path)
  }

  pub fn save_to(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(FormatError::Config)?;
    }
    let file = File::create(path).map_err(FormatError::Config)?;
    serde_json::to_writer_pretty(BufWriter::new(file), self)?;
    Ok(())
  }

  fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("org", "genice", "genice-meshcat") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}
