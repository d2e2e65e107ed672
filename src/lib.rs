pub mod capture;
pub mod evaluation;
pub mod export;
pub mod geometry;
pub mod metrics;
pub mod models;
pub mod recorder;
pub mod settings;
pub mod utils;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use evaluation::{evaluate_squat, sample_frame, SquatFormRules};
use export::{list_recordings, load_frames};
use settings::{RecorderSettings, SettingsStore};

#[derive(Parser, Debug)]
#[command(name = "poseperfect")]
#[command(about = "Inspect and re-evaluate recorded squat sessions")]
struct Cli {
    /// Settings file (defaults apply when absent)
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a saved frame log
    Evaluate { file: PathBuf },
    /// Print per-frame knee and torso values of a saved frame log
    Inspect { file: PathBuf },
    /// List saved recordings, newest first
    List {
        /// Recordings directory (defaults to the configured output directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

fn load_settings(path: Option<&Path>) -> Result<RecorderSettings> {
    match path {
        Some(path) => SettingsStore::new(path.to_path_buf())?.recorder(),
        None => Ok(RecorderSettings::default()),
    }
}

fn evaluate_file(file: &Path, rules: &SquatFormRules) -> Result<()> {
    let frames = load_frames(file)?;
    log::info!("Loaded {} frames from {}", frames.len(), file.display());

    match evaluate_squat(&frames, rules) {
        Ok(result) => {
            println!("{}", result.headline());
            for line in result.detail_lines() {
                println!("{line}");
            }
            println!(
                "Bottom frames: {} ({} correct)",
                result.bottom_frame_count, result.correct_frame_count
            );
        }
        Err(reason) => println!("No evaluation: {reason}"),
    }
    Ok(())
}

fn inspect_file(file: &Path, rules: &SquatFormRules) -> Result<()> {
    let frames = load_frames(file)?;

    println!("{:>10}  {:>8}  {:>8}  {:>9}", "time", "knee", "torso", "skeletons");
    let start = frames.first().map(|frame| frame.timestamp).unwrap_or_default();
    for frame in &frames {
        let sample = sample_frame(frame, rules);
        println!(
            "{:>10.3}  {:>8.2}  {:>8.2}  {:>9}",
            frame.timestamp - start,
            sample.average_knee_angle,
            sample.torso_angle,
            frame.skeleton_data.len()
        );
    }
    println!("{} frames", frames.len());
    Ok(())
}

fn list_dir(dir: &Path) -> Result<()> {
    let items = list_recordings(dir)?;
    if items.is_empty() {
        println!("No recordings in {}", dir.display());
        return Ok(());
    }

    for item in items {
        let data = if item.data_path.is_some() { "video+data" } else { "video" };
        println!("{}  {}", item.stem, data);
    }
    Ok(())
}

fn execute(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.settings.as_deref())?;

    match cli.command {
        Command::Evaluate { file } => evaluate_file(&file, &settings.rules),
        Command::Inspect { file } => inspect_file(&file, &settings.rules),
        Command::List { dir } => list_dir(dir.as_deref().unwrap_or(&settings.output_dir)),
    }
}

pub fn run() -> Result<()> {
    // Info by default; RUST_LOG overrides
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    execute(Cli::parse())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["poseperfect", "evaluate", "a.json"]).unwrap();
        assert!(matches!(cli.command, Command::Evaluate { ref file } if file == Path::new("a.json")));

        let cli = Cli::try_parse_from(["poseperfect", "list", "--dir", "out"]).unwrap();
        assert!(matches!(cli.command, Command::List { dir: Some(ref dir) } if dir == Path::new("out")));

        let cli = Cli::try_parse_from(["poseperfect", "inspect", "b.json", "--settings", "s.json"])
            .unwrap();
        assert_eq!(cli.settings.as_deref(), Some(Path::new("s.json")));
    }

    #[test]
    fn missing_settings_path_uses_defaults() {
        assert_eq!(load_settings(None).unwrap(), RecorderSettings::default());
    }
}
