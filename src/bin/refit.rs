//! refit CLI binary entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use refit::config::RuleSet;
use refit::pipeline;

/// One-shot, import-aware source migration for front-end trees.
#[derive(Parser)]
#[command(name = "refit")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Root directory of the source tree to migrate
    root: PathBuf,

    /// JSON rules file (default: the built-in default-image rules)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Report what would change without writing any file
    #[arg(long)]
    dry_run: bool,

    /// Emit the run report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let rules = match &cli.rules {
        Some(path) => RuleSet::load(path),
        None => Ok(RuleSet::builtin()),
    };
    let rules = match rules {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("refit: {}", e);
            return ExitCode::from(e.error_code().code());
        }
    };

    match pipeline::run(&cli.root, &rules, cli.dry_run) {
        Ok(report) => {
            if cli.json {
                println!("{}", report.render_json());
            } else {
                print!("{}", report.render_text());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("refit: {}", e);
            ExitCode::from(e.error_code().code())
        }
    }
}
