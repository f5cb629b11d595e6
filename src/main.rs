use anyhow::Context;
use clap::Parser;

use textcast::config::{self, EngineConfig};
use textcast::{logging, ConversionEngine, EngineBuilder};

/// Textcast - convert text into typed values
#[derive(Parser)]
#[command(name = "textcast")]
#[command(author = "Keith Bugeja <keith.bugeja@um.edu.mt>")]
#[command(version = "0.1.0")]
#[command(about = "Textcast: convert a string to a named type and print the result")]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    /// List the type names the engine knows
    #[arg(short = 'L', long)]
    list_types: bool,

    /// Target type name, e.g. "Vec<i64>" or "HashMap<String, String>"
    #[arg(short = 't', long = "type", required_unless_present = "list_types")]
    type_name: Option<String>,

    /// Text to convert
    #[arg(required_unless_present = "list_types")]
    input: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    // Load configuration before logging so its level can apply
    let loaded = match &cli.config {
        Some(path) => config::load_config(path).with_context(|| format!("failed to load config from '{path}'")),
        None => Ok(EngineConfig::default()),
    };

    let level = cli
        .log_level
        .clone()
        .or_else(|| loaded.as_ref().ok().map(|config| config.logging.level.clone()))
        .unwrap_or_else(|| "info".to_string());
    logging::init_logging(&level);

    if let Err(error) = loaded.and_then(|config| run(&cli, &config)) {
        tracing::error!("{error:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, config: &EngineConfig) -> anyhow::Result<()> {
    let engine = EngineBuilder::from_config(config)
        .context("configuration error")?
        .build()?;

    if cli.list_types {
        println!("Known types:");
        for descriptor in engine.known_types() {
            println!("  - {} ({})", descriptor, descriptor.shape_name());
        }
        return Ok(());
    }

    let (Some(type_name), Some(input)) = (&cli.type_name, &cli.input) else {
        anyhow::bail!("both --type and INPUT are required");
    };
    convert(&engine, type_name, input)
}

fn convert(engine: &ConversionEngine, type_name: &str, input: &str) -> anyhow::Result<()> {
    let descriptor = engine
        .type_named(type_name)
        .with_context(|| format!("unknown type '{type_name}'; run with --list-types to see known names"))?;

    match engine.convert_type(input, descriptor)? {
        Some(value) => println!("{value:?}"),
        None => println!("<absent>"),
    }
    Ok(())
}
