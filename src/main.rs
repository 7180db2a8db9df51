//! PIG CLI - Polymer Iconset Generator
//!
//! A command-line tool for bundling directories of SVG icons into iconset
//! documents and splitting iconset documents back into SVG files.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pig::{generate, split, IconResult, Options};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Verbosity {
    /// Only log warnings and failures.
    #[default]
    Quiet,
    /// Log each processed directory or file.
    Normal,
    /// Log every icon and resolved value.
    Verbose,
}

impl Verbosity {
    /// Returns the tracing filter string for this verbosity level.
    fn as_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "pig=warn",
            Verbosity::Normal => "pig=info",
            Verbosity::Verbose => "pig=trace",
        }
    }
}

/// Polymer iconset generator
#[derive(Parser, Debug)]
#[command(name = "pig")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Icon directories, or iconset files with --split
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// File or directory path of target file
    #[arg(short, long)]
    dest: Option<PathBuf>,

    /// Import path for iron-iconset-svg element
    #[arg(short, long)]
    import_path: Option<String>,

    /// Path to bower_components directory
    #[arg(short, long)]
    bower_path: Option<PathBuf>,

    /// Iconset name, if omitted, directory name will be used
    #[arg(short, long)]
    name: Option<String>,

    /// Icon size
    #[arg(short, long)]
    size: Option<u32>,

    /// Prefix to be added to file names for icon names
    #[arg(short, long)]
    prefix: Option<String>,

    /// Common filename prefix to be omitted from icon name
    #[arg(short, long)]
    omit_prefix: Option<String>,

    /// Clean the svg code before bundling
    #[arg(short, long)]
    clean: bool,

    /// Minify the cleaned svg code (only works with --clean)
    #[arg(short, long)]
    minify: bool,

    /// Remove fill, stroke and class attributes as well as style elements (only works with --clean)
    #[arg(short = '1', long)]
    monochrome: bool,

    /// Comment to add to the generated iconset file
    #[arg(long)]
    comment: Option<String>,

    /// Split mode. Generate svg files from iconset file
    #[arg(long)]
    split: bool,

    /// Verbosity level
    #[arg(short, long, value_enum, default_value_t = Verbosity::default())]
    verbosity: Verbosity,
}

impl Args {
    /// Options given on the command line. Flags that were not passed stay
    /// unset so the config file can still provide them.
    fn options(&self) -> Options {
        Options {
            dest: self.dest.clone(),
            import_path: self.import_path.clone(),
            bower_path: self.bower_path.clone(),
            name: self.name.clone(),
            size: self.size,
            prefix: self.prefix.clone(),
            omit_prefix: self.omit_prefix.clone(),
            clean: self.clean.then_some(true),
            minify: self.minify.then_some(true),
            monochrome: self.monochrome.then_some(true),
            comment: self.comment.clone(),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing with the appropriate filter level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.verbosity.as_filter())),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let mut failed = false;
    for path in &args.paths {
        if let Err(e) = run(&args, path) {
            error!("{}: {}", path.display(), e);
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Processes a single directory, or a single iconset file in split mode.
fn run(args: &Args, path: &Path) -> IconResult<()> {
    if args.split {
        let config_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let options = args.options().with_split_overlay(config_dir);
        let written = split(path, &options)?;
        println!("Split {} into {} icons", path.display(), written.len());
    } else {
        let options = args.options().with_overlay(path);
        match generate(path, &options)? {
            Some(dest) => println!("Generated {} from {}", dest.display(), path.display()),
            None => info!("Nothing to do for {}", path.display()),
        }
    }

    Ok(())
}
