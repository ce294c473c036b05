//! plane-fem - run a plane analysis from an input table

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use plane_fem::io;
use plane_fem::prelude::*;

/// Linear elastic analysis of Quad4/Quad8 plane meshes
#[derive(Debug, Parser)]
#[command(name = "plane-fem", version, about)]
struct Args {
    /// Input table (materials, nodes, elements)
    input: PathBuf,

    /// Result table path [default: <INPUT stem>_result.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a JSON report with summary and per-node results
    #[arg(long)]
    json: Option<PathBuf>,

    /// JSON file with analysis options
    #[arg(long)]
    options: Option<PathBuf>,

    /// Evaluate element stiffness on a single thread
    #[arg(long)]
    serial: bool,
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    input.with_file_name(format!("{stem}_result.csv"))
}

fn load_options(args: &Args) -> Result<AnalysisOptions> {
    let mut options = match &args.options {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read options {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid options in {}", path.display()))?
        }
        None => AnalysisOptions::default(),
    };
    if args.serial {
        options = options.serial();
    }
    Ok(options)
}

fn run(args: &Args) -> Result<()> {
    let options = load_options(args)?;

    let mesh = io::read_mesh(&args.input)
        .with_context(|| format!("Failed to read model {}", args.input.display()))?;
    info!(
        "Loaded {}: {} nodes, {} elements, {} materials",
        args.input.display(),
        mesh.node_count(),
        mesh.element_count(),
        mesh.materials().len()
    );

    let result = mesh.analyze(&options).context("Analysis failed")?;

    let output = args.output.clone().unwrap_or_else(|| default_output(&args.input));
    io::write_results_file(&output, &result.nodes)
        .with_context(|| format!("Failed to write results {}", output.display()))?;
    info!("Wrote {}", output.display());

    if let Some(path) = &args.json {
        let json = result.report().to_json()?;
        fs::write(path, json).with_context(|| format!("Failed to write report {}", path.display()))?;
        info!("Wrote {}", path.display());
    }

    let summary = &result.summary;
    info!(
        "DOFs: {} total, {} constrained, {} free",
        summary.total_dofs,
        summary.constrained_dofs,
        summary.free_dofs()
    );
    info!(
        "Reactions: FX={:.6e}, FY={:.6e} (applied FX={:.6e}, FY={:.6e})",
        summary.total_reaction[0], summary.total_reaction[1], summary.total_load[0], summary.total_load[1]
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_name() {
        assert_eq!(
            default_output(Path::new("models/plate.csv")),
            PathBuf::from("models/plate_result.csv")
        );
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["plane-fem", "in.csv", "--serial", "--json", "r.json"]);
        assert_eq!(args.input, PathBuf::from("in.csv"));
        assert!(args.serial);
        assert_eq!(args.json, Some(PathBuf::from("r.json")));
        assert!(args.output.is_none());
    }
}
