//! dreamdoc: generate markdown class reference pages from annotated
//! 3DreamEngine Lua sources.
//!
//! Pipeline: discover sources → parse `---@` annotations → merge class
//! fragments across files → render one page per class → rewrite the
//! documentation section of the index page.

mod config;
mod error;
mod hierarchy;
mod index;
mod model;
mod parser;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use parser::{AnnotationParser, LuaDocParser};
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dreamdoc",
    about = "Generate class reference pages from annotated 3DreamEngine Lua sources"
)]
struct Cli {
    /// Root directory of the annotated sources
    #[arg(short = 's', long, default_value = "../3DreamEngine")]
    source: PathBuf,

    /// Source file glob, relative to --source
    #[arg(long, default_value = "**/*.lua")]
    pattern: String,

    /// Directory receiving one markdown page per class
    #[arg(short = 'o', long, default_value = "../docu/classes")]
    output: PathBuf,

    /// Index document whose documentation section is regenerated
    #[arg(short = 'i', long, default_value = "../index.md")]
    index: PathBuf,

    /// Do not touch the index document
    #[arg(long)]
    no_index: bool,

    /// TOML file overriding the built-in lookup tables
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Fail on inheritance cycles and unknown parent classes
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match cli.config.as_deref() {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    run(&cli, &config, &LuaDocParser)
}

/// `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run(cli: &Cli, config: &Config, annotations: &dyn AnnotationParser) -> Result<()> {
    let files = parser::discover_sources(&cli.source, &cli.pattern)?;
    info!(files = files.len(), source = %cli.source.display(), "scanning sources");

    let models = annotations.parse(&files)?;
    let table = parser::merge::merge(models, config);
    if table.is_empty() {
        warn!("no annotated classes found");
    }
    info!(classes = table.len(), "merged class fragments");

    let rendered = render::render_all(&table, config);
    for problem in &rendered.problems {
        warn!("{}", problem);
    }
    if cli.strict && !rendered.problems.is_empty() {
        anyhow::bail!(
            "{} inheritance problem(s) found, first: {}",
            rendered.problems.len(),
            rendered.problems[0]
        );
    }

    write_pages(&cli.output, &rendered.pages)?;

    if !cli.no_index {
        index::rewrite_index(&cli.index, config, &rendered.listed)?;
    }

    Ok(())
}

/// Write every page into `dir`, replacing existing files.
fn write_pages(dir: &Path, pages: &[render::Page]) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory: {}", dir.display()))?;

    for page in pages {
        let path = dir.join(&page.file_name);
        fs::write(&path, &page.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!(class = %page.class, file = %path.display(), "wrote page");
    }
    info!(pages = pages.len(), output = %dir.display(), "wrote class pages");
    Ok(())
}
