use std::path::PathBuf;

use anyhow::Context;
use ced::Pipeline;
use ced_core::{Config, Taxonomy};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ced", about = "Conflict Event Digest: clean, classify and summarize event extracts")]
struct Cli {
    /// Configuration file layered over the built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write debug logs to /tmp/ced-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest, normalize and write the canonical table, audit and report.
    Run,
    /// Ingest and write the per-source validation report only.
    Validate,
    /// Print the bucket and matching rule for each actor name.
    Classify {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Ingest and write the actor audit table only.
    Audit,
}

fn init_tracing(debug: bool) -> anyhow::Result<()> {
    if debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/ced-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("ced debug log started, tail -f /tmp/ced-debug.log");
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Command::Run => {
            let summary = Pipeline::new(config)?.run()?;
            println!("taxonomy {}", summary.taxonomy_version);
            for s in &summary.sources {
                println!(
                    "{:<12} read {:>7}  retained {:>7}  excluded {:>6}",
                    s.name,
                    s.rows_read,
                    s.retained,
                    s.excluded_total()
                );
            }
            for (reason, n) in &summary.excluded {
                println!("  excluded {reason}: {n}");
            }
            for (bucket, n) in &summary.by_bucket {
                println!("{bucket:<20} {n:>7}");
            }
            for (period, n) in &summary.by_period {
                println!("{period:<20} {n:>7}");
            }
            println!("wrote {}", summary.cleaned.display());
            println!("wrote {}", summary.audit.display());
            for path in &summary.report_files {
                println!("wrote {}", path.display());
            }
        }
        Command::Validate => {
            let (checks, path) = Pipeline::new(config)?.validate()?;
            println!("{}", serde_json::to_string_pretty(&checks)?);
            eprintln!("wrote {}", path.display());
        }
        Command::Classify { names } => {
            let taxonomy: Taxonomy = config.taxonomy().context("loading actor taxonomy")?;
            for name in &names {
                let c = taxonomy.classify(name);
                let rule = c
                    .rule
                    .map(|i| taxonomy.rules()[i].describe())
                    .unwrap_or_else(|| "fallback".to_string());
                println!("{name}\t{}\t{rule}", c.bucket);
            }
        }
        Command::Audit => {
            let pipeline = Pipeline::new(config)?;
            let entries = pipeline.audit()?;
            let unmapped = entries.iter().filter(|e| e.rule.is_none()).count();
            println!(
                "{} distinct actors, {} unmapped; wrote {}",
                entries.len(),
                unmapped,
                pipeline.config().output.audit.display()
            );
        }
    }
    Ok(())
}
