//! Symdex CLI - build a symbol index from a model manifest and query it

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use symdex::config::{self, SymdexConfig};
use symdex::progress::SpinnerProgress;
use symdex::ui::{self, theme, Icons};
use symdex::{ManifestModel, QualifiedName, RefreshStats, SymbolIndex};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "symdex")]
#[command(version)]
#[command(about = "Global symbol index for prefix-based completion")]
#[command(long_about = r#"
Symdex flattens a semantic model into a symbol index and answers
completion lookups by short-name prefix and extension receiver type.

Example usage:
  symdex query --model model.toml --prefix Fo
  symdex query --model model.toml --prefix ba --receiver pkg.Baz
  symdex stats --model model.toml
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a model and look up completion candidates
    Query {
        /// Model manifest (TOML or JSON)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Short-name prefix to complete
        #[arg(short, long, default_value = "")]
        prefix: String,

        /// Extension receiver type; omit to only match non-extensions
        #[arg(short, long)]
        receiver: Option<String>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Index a model and show statistics
    Stats {
        /// Model manifest (TOML or JSON)
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Write a default config file
    Init {
        /// Model manifest to record in the config
        #[arg(short, long)]
        model: Option<String>,

        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    match cli.command {
        Commands::Query { model, prefix, receiver, limit, json } => {
            let receiver = receiver.map(QualifiedName::new).transpose()?;
            let (index, _) = build_index(&config, model.as_deref())?;
            let results = index.query(&prefix, receiver.as_ref(), limit)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else if results.is_empty() {
                println!("{} No symbols found.", Icons::CROSS);
            } else {
                println!(
                    "{} {} results for '{}'",
                    Icons::SEARCH,
                    results.len(),
                    prefix
                );
                for symbol in &results {
                    let receiver = symbol
                        .receiver_type
                        .as_ref()
                        .map(|r| format!(" on {}", r))
                        .unwrap_or_default();
                    println!(
                        "- [{}] {} {}",
                        symbol.kind,
                        symbol.name.style(theme().symbol.clone()),
                        ui::dim(&format!("{}{}", symbol.visibility, receiver))
                    );
                }
            }
        }

        Commands::Stats { model } => {
            let (index, refresh) = build_index(&config, model.as_deref())?;
            let stats = index.stats()?;

            ui::section("Symbol Index");
            let symbols = stats.symbols.to_string();
            let names = stats.names.to_string();
            let extensions = stats.extensions.to_string();
            let mut rows = vec![
                ("Symbols", symbols.as_str()),
                ("Qualified names", names.as_str()),
                ("Extensions", extensions.as_str()),
            ];
            let (namespaces, failed) = match &refresh {
                Some(refresh) => (refresh.namespaces.to_string(), refresh.failed_namespaces.to_string()),
                None => ("-".to_string(), "-".to_string()),
            };
            rows.push(("Namespaces", namespaces.as_str()));
            rows.push(("Failed namespaces", failed.as_str()));
            println!("{}", ui::stats_table(&rows));

            if let Some(refresh) = refresh {
                ui::timing(&format!("{:?}", refresh.elapsed));
            }
        }

        Commands::Init { model, force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            let config = SymdexConfig {
                model,
                ..SymdexConfig::default()
            };
            config::write_config(&path, &config, force)?;
            ui::success(&format!("Wrote {}", path.display()));
        }
    }

    Ok(())
}

/// Load the model manifest and refresh a fresh index from it
fn build_index(
    config: &SymdexConfig,
    model: Option<&Path>,
) -> anyhow::Result<(SymbolIndex, Option<RefreshStats>)> {
    let path = match (model, config.model.as_deref()) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(path)) => PathBuf::from(path),
        (None, None) => anyhow::bail!("no model manifest given (use --model or set `model` in symdex.toml)"),
    };

    tracing::info!("Loading model from {}", path.display());
    let model = ManifestModel::load(&path)?;
    let index = SymbolIndex::new(config, Arc::new(SpinnerProgress))?;

    let refresh = index.refresh(&model);
    match &refresh {
        Some(stats) => tracing::debug!("Refresh finished: {}", stats),
        None => ui::warn("Refresh failed, the index is empty (see log for details)"),
    }

    Ok((index, refresh))
}
