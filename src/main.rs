use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use fieldkit::{init_logging, load_script, run_script, SettingsPersistence};

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay a field boundary editing script")]
struct Args {
    /// JSON script of editing steps
    script: PathBuf,

    /// Configuration file (.toml or .json); defaults to the user config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = SettingsPersistence::load(args.config.as_deref())
        .context("Failed to load settings")?;
    let config = settings.into_config();

    // Initialize logging
    init_logging(&config.logging)?;

    let script = load_script(&args.script)?;
    let report = run_script(&script, config.editor);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    Ok(())
}
