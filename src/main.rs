use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};

use genice_meshcat::config::{Config, FormatOptions, ViewerKind};
use genice_meshcat::format::{MeshcatFormat, DESC};
use genice_meshcat::io::load_structure;
use genice_meshcat::sink::{SceneSink, Viewer};
use genice_meshcat::utils::logger;

#[derive(Parser, Debug)]
#[command(
    name = "genice-meshcat",
    about = "Render a generated ice structure into a Meshcat-style 3D scene.",
    version,
    after_help = DESC.usage
)]
struct Cli {
    /// Structure file (JSON) written by the generator.
    #[arg(value_name = "STRUCTURE")]
    structure: PathBuf,
    /// Format option, repeatable (e.g. -o H=0.02).
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    options: Vec<String>,
    /// Send the scene to a running standalone viewer instead of writing it out.
    #[arg(long)]
    standalone: bool,
    /// Address of the standalone viewer.
    #[arg(long, value_name = "HOST:PORT")]
    address: Option<String>,
    /// Where to write the inline scene document. When omitted, stdout is used.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Store the effective options and viewer settings as the new defaults.
    #[arg(long)]
    save_config: bool,
    /// Log every pass in detail.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    })
    .context("failed to install logger")?;

    let (config, msg) = Config::load();
    info!("{}", msg);

    let mut options: FormatOptions = config.options;
    for arg in &cli.options {
        let (k, v) = FormatOptions::split_pair(arg)?;
        options.apply(k, v)?;
    }

    let kind = if cli.standalone {
        ViewerKind::Standalone
    } else {
        config.viewer
    };
    let address = cli
        .address
        .clone()
        .unwrap_or_else(|| config.viewer_address.clone());

    if cli.save_config {
        let saved = Config {
            options,
            viewer: kind,
            viewer_address: address.clone(),
        };
        let path = saved.save().context("failed to save config")?;
        info!("Config saved to {:?}", path);
    }

    let path = cli.structure.to_string_lossy();
    let ice = load_structure(&path).with_context(|| format!("failed to load {}", path))?;

    let viewer = Viewer::open(kind, &address)?;
    let mut format = MeshcatFormat::new(options, viewer)?;
    format.run(&ice)?;

    match format.into_sink() {
        Viewer::Inline(scene) => {
            info!("Scene has {} nodes", scene.len());
            match &cli.output {
                Some(out) => {
                    let file = File::create(out)
                        .with_context(|| format!("could not create {}", out.display()))?;
                    scene.write_json(BufWriter::new(file))?;
                }
                None => {
                    let stdout = io::stdout();
                    let mut lock = stdout.lock();
                    scene.write_json(&mut lock)?;
                    writeln!(lock)?;
                }
            }
        }
        mut viewer @ Viewer::Standalone(_) => {
            viewer.finish()?;
            info!("Scene sent to {}", address);
        }
    }
    Ok(())
}
