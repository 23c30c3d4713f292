//! rails-tsp: generate TypeSpec models from a Rails schema.rb
//!
//! # Usage
//!
//! ```bash
//! # Create rails.tsp next to the Rails app
//! rails-tsp
//!
//! # Replace it, or add only the models it does not have yet
//! rails-tsp --force
//! rails-tsp --append
//!
//! # Custom location, preview only
//! rails-tsp --out spec/api.tsp --dry-run
//! ```

use anyhow::Result;
use clap::Parser;
use colored::*;
use rails_tsp::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rails-tsp")]
#[command(version)]
#[command(about = "Generate TypeSpec models from a Rails schema.rb", long_about = None)]
#[command(after_help = "EXAMPLES:
    rails-tsp
    rails-tsp --force --out spec/api.tsp
    rails-tsp --append -v
    rails-tsp -C ../backend --dry-run")]
struct Cli {
    /// Overwrite the output file if it exists
    #[arg(long, conflicts_with = "append")]
    force: bool,

    /// Append models missing from the existing output file
    #[arg(long)]
    append: bool,

    /// Output file path (default: rails.tsp)
    #[arg(short, long, env = "RAILS_TSP_OUT")]
    out: Option<PathBuf>,

    /// Config file (default: rails-tsp.toml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the document instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Working directory
    #[arg(short = 'C', long = "dir", default_value = ".")]
    dir: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let reporter = ConsoleReporter::new(cli.verbose);
    let config = Config::load(&cli.dir, cli.config.as_deref())?;

    let options = GenerateOptions {
        cwd: cli.dir.clone(),
        out: cli.out.clone(),
        force: cli.force,
        append: cli.append,
        dry_run: cli.dry_run,
    };

    match generate(&options, &config, &reporter).await? {
        Outcome::Printed { document } => print!("{}", document),
        outcome => println!("{} {}", "✓".green(), outcome),
    }
    Ok(())
}
