use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use calluna_io::{DatasetProvider, DatasetReader, DatasetSchema, ProfileWriter, RunName};
use calluna_tree::ProfileTreeConfig;

#[derive(Parser)]
#[command(name = "calluna")]
#[command(about = "Rule-based profile segmentation over categorical outcome data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,
}

/// Shared dataset column layout.
#[derive(Args, Debug, Clone)]
struct SchemaArgs {
    /// Ordered feature columns; defines grouping order and profile
    /// condition order
    #[arg(long, value_delimiter = ',', required = true)]
    features: Vec<String>,

    /// Column holding the boolean hit indicator
    #[arg(long, default_value = "hit")]
    hit_column: String,

    /// Column holding the boolean refusal indicator
    #[arg(long, default_value = "refused")]
    refusal_column: String,

    /// Columns holding per-source boolean hit indicators
    #[arg(long, value_delimiter = ',')]
    hit_flag_columns: Vec<String>,
}

impl SchemaArgs {
    fn to_schema(&self) -> DatasetSchema {
        DatasetSchema::new(
            self.features.clone(),
            self.hit_column.clone(),
            self.refusal_column.clone(),
            self.hit_flag_columns.clone(),
        )
    }
}

#[derive(Subcommand)]
enum Command {
    /// Build the profile tree, prune and filter it, and export profiles
    Generate {
        /// Path to the input CSV file
        #[arg(long)]
        data: PathBuf,

        #[command(flatten)]
        schema: SchemaArgs,

        /// Maximum hit percentage (0-100) for a chance profile
        #[arg(long, default_value_t = 5.0)]
        chance_max_hit: f64,

        /// Maximum refusal percentage (0-100) for a chance profile
        #[arg(long, default_value_t = 10.0)]
        chance_max_refusal: f64,

        /// Minimum hit percentage (0-100) for a risk profile
        #[arg(long, default_value_t = 40.0)]
        risk_min_hit: f64,

        /// Minimum number of records per combination
        #[arg(long, default_value_t = 50)]
        min_group_size: u64,

        /// Minimum number of conditions per profile
        #[arg(long, default_value_t = 3)]
        min_depth: usize,

        /// Run name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        run: String,

        /// Output directory for the profile artifact
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Print a summary of the dataset without building anything
    Inspect {
        /// Path to the input CSV file
        #[arg(long)]
        data: PathBuf,

        #[command(flatten)]
        schema: SchemaArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct GenerateOutput {
    run: String,
    n_records: usize,
    nodes_built: usize,
    nodes_pruned: usize,
    nodes_filtered: usize,
    n_profiles: usize,
}

#[derive(Serialize)]
struct FeatureSummary {
    feature: String,
    distinct_values: usize,
}

#[derive(Serialize)]
struct InspectOutput {
    n_records: usize,
    hit_fraction: f64,
    refusal_fraction: f64,
    features: Vec<FeatureSummary>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Generate {
            data,
            schema,
            chance_max_hit,
            chance_max_refusal,
            risk_min_hit,
            min_group_size,
            min_depth,
            run,
            output_dir,
        } => {
            let run_name = RunName::new(run.clone())?;

            // Read dataset
            let dataset = DatasetReader::new(&data, schema.to_schema())
                .read()
                .context("failed to read dataset CSV")?;
            info!(n_records = dataset.n_records(), "dataset loaded");

            // Build, prune, filter, export
            let config = ProfileTreeConfig::new(schema.features.clone())?
                .with_chance_max_hit_percentage(chance_max_hit)
                .with_chance_max_refusal_percentage(chance_max_refusal)
                .with_risk_min_hit_percentage(risk_min_hit)
                .with_minimal_groupsize(min_group_size)
                .with_min_depth_required(min_depth);
            let provider = DatasetProvider::new(&dataset);
            let result = config
                .generate(&provider)
                .context("profile generation failed")?;

            // Write JSON artifact
            let writer = ProfileWriter::new(&output_dir, run_name)?;
            writer.write_profiles(result.profiles(), result.parameter_set())?;
            info!(path = %writer.profiles_path().display(), "artifact written");

            // Print stdout summary
            let metadata = result.metadata();
            let output = GenerateOutput {
                run,
                n_records: dataset.n_records(),
                nodes_built: metadata.nodes_built,
                nodes_pruned: metadata.nodes_pruned,
                nodes_filtered: metadata.nodes_filtered,
                n_profiles: metadata.n_profiles,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Inspect { data, schema } => {
            let dataset = DatasetReader::new(&data, schema.to_schema())
                .read()
                .context("failed to read dataset CSV")?;

            let output = InspectOutput {
                n_records: dataset.n_records(),
                hit_fraction: dataset.hit_fraction(),
                refusal_fraction: dataset.refusal_fraction(),
                features: dataset
                    .feature_cardinalities()
                    .into_iter()
                    .map(|(feature, distinct_values)| FeatureSummary {
                        feature,
                        distinct_values,
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
