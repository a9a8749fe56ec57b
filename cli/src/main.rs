//! aspect-model CLI: resolve, migrate and validate aspect models from the
//! command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use aspect_model::{
    apply_fixes, Graph, LoadedModel, ModelUrn, Pipeline, PipelineConfig, RdfFormat, RdfParser,
    RdfSerializer, ValidationReport,
};

#[derive(Parser)]
#[command(name = "aspect-model", version, about = "Aspect model resolution, migration and validation")]
struct Cli {
    /// Model root directory (<root>/<namespace>/<version>/<Element>.ttl), repeatable
    #[arg(long = "models-root", global = true)]
    models_root: Vec<PathBuf>,

    /// External resolver command, called with the URN as last argument
    #[arg(long, global = true)]
    command: Option<String>,

    /// YAML configuration file
    #[arg(long, global = true, env = "ASPECT_MODEL_CONFIG")]
    config: Option<PathBuf>,

    /// Resolve sibling references concurrently
    #[arg(long, global = true)]
    parallel: bool,

    #[command(subcommand)]
    action: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the closed graph of an element or model file
    Resolve {
        /// Element URN or Turtle file
        target: String,
    },
    /// Print a model file migrated to the latest meta model version
    Migrate {
        file: PathBuf,
    },
    /// Validate an element or model file
    Validate {
        /// Element URN or Turtle file
        target: String,

        /// Report format
        #[arg(long, default_value = "table")]
        format: OutputFormat,

        /// Apply all available fixes and print the fixed graph
        #[arg(long)]
        fix: bool,
    },
}

/// Exit code when the model loads but has violations
const EXIT_INVALID: u8 = 2;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;
    let pipeline = Pipeline::new(&config).context("Failed to set up the pipeline")?;

    match cli.action {
        Commands::Resolve { target } => {
            let graph = match ModelUrn::parse(&target) {
                Ok(urn) => pipeline.resolve(&urn)?,
                Err(_) => pipeline.resolve_graph(read_model(Path::new(&target))?)?,
            };
            print_turtle(&graph)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Migrate { file } => {
            let graph = pipeline.migrate(read_model(&file)?)?;
            print_turtle(&graph)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate {
            target,
            format,
            fix,
        } => {
            let loaded = load(&pipeline, &target)?;
            if fix {
                return run_fix(&pipeline, loaded);
            }
            print_report(&loaded.report, format)?;
            Ok(exit_code(&loaded.report))
        }
    }
}

/// Config file first, then command line flags on top
fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    config.model_roots.extend(cli.models_root.iter().cloned());
    if cli.command.is_some() {
        config.command = cli.command.clone();
    }
    config.parallel_resolution |= cli.parallel;
    Ok(config)
}

fn read_model(path: &Path) -> Result<Graph> {
    RdfParser::parse_file(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load(pipeline: &Pipeline, target: &str) -> Result<LoadedModel> {
    let loaded = match ModelUrn::parse(target) {
        Ok(urn) => pipeline.load(&urn),
        Err(_) => pipeline.load_file(Path::new(target)),
    };
    loaded.with_context(|| format!("Failed to load {}", target))
}

fn run_fix(pipeline: &Pipeline, loaded: LoadedModel) -> Result<ExitCode> {
    let fixed = apply_fixes(&loaded.graph, loaded.report.fixes());
    let remaining = pipeline.validate(&fixed);
    eprintln!(
        "Applied fixes: {} violations before, {} after",
        loaded.report.len(),
        remaining.len()
    );
    print_turtle(&fixed)?;
    Ok(exit_code(&remaining))
}

fn exit_code(report: &ValidationReport) -> ExitCode {
    if report.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_INVALID)
    }
}

fn print_turtle(graph: &Graph) -> Result<()> {
    let text = RdfSerializer::serialize(graph, RdfFormat::Turtle).context("Failed to write Turtle")?;
    print!("{}", text);
    Ok(())
}

fn print_report(report: &ValidationReport, format: OutputFormat) -> Result<()> {
    let entries = report.entries();
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Table => {
            if entries.is_empty() {
                println!("Model is valid");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Code", "Element", "Property", "Message", "Fixes"]);

            for entry in &entries {
                table.add_row(vec![
                    entry.error_code.to_string(),
                    entry.element.clone(),
                    entry.property.clone().unwrap_or_default(),
                    entry.message.clone(),
                    entry
                        .fixes
                        .iter()
                        .map(|f| f.description.as_str())
                        .collect::<Vec<_>>()
                        .join("\n"),
                ]);
            }

            println!("{}", table);
            println!("{} violation(s)", entries.len());
        }
    }
    Ok(())
}
