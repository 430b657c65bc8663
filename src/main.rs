//! Replays editing scripts against a headless text field.

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use visfield::{render_summary, Replay, Script};
use visfield_core::{FieldConfig, DEFAULT_MONOSPACE_ADVANCE};

#[derive(Parser)]
#[command(
    name = "visfield-replay",
    about = "Replay text-field editing scripts headlessly",
    version
)]
struct Cli {
    /// Script file; reads stdin when omitted or "-"
    script: Option<PathBuf>,

    /// Visible text width in pixels
    #[arg(short, long, default_value_t = 200.0, env = "VISFIELD_WIDTH")]
    width: f32,

    /// Horizontal advance of every glyph
    #[arg(long, default_value_t = DEFAULT_MONOSPACE_ADVANCE)]
    advance: f32,

    /// Print the final snapshot as JSON
    #[arg(short, long)]
    json: bool,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("visfield=warn,visfield_core=info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn read_source(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display())),
        _ => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read script from stdin")?;
            Ok(source)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    init_tracing();
    let source = read_source(cli.script.as_ref())?;
    let script = Script::parse(&source)?;
    let config = FieldConfig::from_env();
    info!(
        commands = script.len(),
        width = cli.width,
        "replaying script"
    );

    let mut replay = Replay::new(config, cli.advance, cli.width);
    replay.run(&script)?;

    let snapshot = replay.snapshot();
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).context("snapshot encoding failed")?
        );
    } else {
        print!("{}", render_summary(&snapshot));
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let exit_code = run_and_report(|| run(cli));
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run_and_report<F>(runner: F) -> i32
where
    F: FnOnce() -> anyhow::Result<()>,
{
    match runner() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("visfield-replay error: {:#}", err);
            1
        }
    }
}
