use anyhow::{Context, Result, bail};
use clap::Parser;
use markdown_catalog_config::Config;
use markdown_catalog_engine::{Catalog, Document, DocumentSource, ParseOptions, Source};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "markdown-catalog")]
#[command(about = "Turn a curated markdown list into JSON", long_about = None)]
struct Args {
    /// URL or path of the markdown document; defaults to `source` in the config file
    #[arg(value_name = "LOCATION")]
    location: Option<String>,

    /// Config file to read instead of ~/.config/markdown-catalog/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Maximum token nesting depth before parsing fails
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Settings after merging command-line arguments over the config file.
#[derive(Debug, PartialEq, Eq)]
struct Resolved {
    location: String,
    options: ParseOptions,
}

fn resolve(args: &Args, config: Option<Config>) -> Result<Resolved> {
    let location = match (&args.location, &config) {
        (Some(location), _) => location.clone(),
        (None, Some(config)) => config.source.clone(),
        (None, None) => bail!(
            "No document location given and no config file found at {}",
            args.config
                .clone()
                .unwrap_or_else(Config::config_path)
                .display()
        ),
    };

    let mut options = ParseOptions::default();
    if let Some(config) = &config {
        options.max_depth = config.max_depth;
    }
    if let Some(max_depth) = args.max_depth {
        options.max_depth = max_depth;
    }

    Ok(Resolved { location, options })
}

fn load_config(args: &Args) -> Result<Option<Config>> {
    let config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

fn render(doc: &Document, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(doc)?
    } else {
        serde_json::to_string_pretty(doc)?
    };
    Ok(json)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    let resolved = resolve(&args, config)?;

    let source = Source::from_location(&resolved.location);
    log::info!("reading catalog from {}", source.location());

    let doc = Catalog::with_options(source, resolved.options)
        .get_data()
        .with_context(|| format!("Failed to load catalog from {}", resolved.location))?;

    println!("{}", render(&doc, args.compact)?);
    Ok(())
}
