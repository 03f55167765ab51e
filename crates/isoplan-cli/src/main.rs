//! isoplan CLI - Spreadsheet project-plan importer
//!
//! Command-line interface for reconstructing and importing checklist plans.

mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use isoplan_core::{Consultant, InMemoryDirectory, InMemoryPlanStore};
use isoplan_import::{ColumnMap, ExplicitLayout, ImportConfig, PlanImporter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use output::{ImportReport, OutputFormat};

#[derive(Parser)]
#[command(name = "isoplan")]
#[command(author, version, about = "Spreadsheet project-plan importer", long_about = None)]
struct Cli {
    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct the plan of a spreadsheet and print it
    Parse {
        /// Spreadsheet file (xlsx, xls, xlsb, ods)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        options: ImportOptions,
    },

    /// Import a spreadsheet into a project
    Import {
        /// Spreadsheet file (xlsx, xls, xlsb, ods)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Project receiving the plan
        #[arg(long)]
        project_id: String,

        /// JSON array of consultants used to resolve owners
        #[arg(long, value_name = "FILE")]
        consultants: Option<PathBuf>,

        #[command(flatten)]
        options: ImportOptions,
    },
}

#[derive(Args)]
struct ImportOptions {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// TOML importer configuration
    #[arg(long, value_name = "FILE", env = "ISOPLAN_CONFIG")]
    config: Option<PathBuf>,

    /// Header row (1-based); skips header detection
    #[arg(long, requires_all = ["id_column", "name_column"])]
    header_row: Option<usize>,

    /// Header label of the hierarchy id column
    #[arg(long, value_name = "LABEL", requires = "header_row")]
    id_column: Option<String>,

    /// Header label of the task name column
    #[arg(long, value_name = "LABEL", requires = "header_row")]
    name_column: Option<String>,

    /// Header label of the status column
    #[arg(long, value_name = "LABEL", requires = "header_row")]
    status_column: Option<String>,

    /// Header label of the owner column
    #[arg(long, value_name = "LABEL", requires = "header_row")]
    owner_column: Option<String>,

    /// Header label of the description column
    #[arg(long, value_name = "LABEL", requires = "header_row")]
    description_column: Option<String>,
}

impl ImportOptions {
    fn importer(&self) -> Result<PlanImporter> {
        let mut importer = PlanImporter::new().config(load_config(self.config.as_deref())?);

        if let Some(row) = self.header_row {
            let header_row = row
                .checked_sub(1)
                .context("--header-row is 1-based and must be at least 1")?;
            let columns = ColumnMap {
                hierarchy_id: self.id_column.clone().unwrap_or_default(),
                task_name: self.name_column.clone().unwrap_or_default(),
                status: self.status_column.clone().unwrap_or_default(),
                assignee: self.owner_column.clone().unwrap_or_default(),
                description: self.description_column.clone().unwrap_or_default(),
            };
            importer = importer.layout(ExplicitLayout::new(header_row, columns));
        }

        Ok(importer)
    }
}

fn load_config(path: Option<&Path>) -> Result<ImportConfig> {
    let Some(path) = path else {
        return Ok(ImportConfig::default());
    };
    tracing::debug!(path = %path.display(), "loading importer config");
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
}

fn load_directory(path: Option<&Path>) -> Result<InMemoryDirectory> {
    let Some(path) = path else {
        return Ok(InMemoryDirectory::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read consultants {}", path.display()))?;
    let consultants: Vec<Consultant> = serde_json::from_str(&text)
        .with_context(|| format!("Invalid consultants file {}", path.display()))?;
    tracing::debug!(count = consultants.len(), "loaded consultant directory");
    Ok(InMemoryDirectory::new(consultants))
}

fn read_workbook(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match cli.command {
        Commands::Parse { file, options } => {
            let buffer = read_workbook(&file)?;
            let plan = options
                .importer()?
                .parse(&buffer)
                .with_context(|| format!("Failed to parse {}", file.display()))?;

            match options.format {
                OutputFormat::Text => print!("{}", output::render_plan(&plan)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
            }
        }
        Commands::Import {
            file,
            project_id,
            consultants,
            options,
        } => {
            let buffer = read_workbook(&file)?;
            let directory = load_directory(consultants.as_deref())?;
            let mut store = InMemoryPlanStore::new();

            let summary = options
                .importer()?
                .import(&buffer, &project_id, &directory, &mut store)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            let phases = store
                .plans(&project_id)
                .last()
                .map(|p| p.phases.as_slice())
                .unwrap_or(&[]);

            match options.format {
                OutputFormat::Text => print!("{}", output::render_summary(&summary, phases)),
                OutputFormat::Json => {
                    let report = ImportReport {
                        summary: &summary,
                        phases,
                    };
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
            }
        }
    }

    Ok(())
}
