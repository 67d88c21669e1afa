mod script;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use grid::config::GridConfig;
use grid::host::Grid;
use grid::table::{ColumnDescriptor, Row, rows_from_json};
use grid::{GridCore, GridError};
use serde::Serialize;
use serde_json::Value;

use crate::script::{Tally, open_session, parse_script, run_script};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml { path: PathBuf, source: serde_yaml::Error },
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("failed to render report: {0}")]
    Render(serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "invoicedesk", about = "Validate and replay edits against invoice line-item tables")]
struct Cli {
    /// Grid settings file (`.yaml`, `.yml` or `.json`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Rows per page; overrides the config file.
    #[arg(long, global = true, env = "INVOICEDESK_PAGE_SIZE")]
    page_size: Option<usize>,

    /// Undo snapshots to keep; overrides the config file.
    #[arg(long, global = true, env = "INVOICEDESK_HISTORY_LIMIT")]
    history_limit: Option<usize>,

    /// Log engine activity at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a table and print its validation errors.
    Validate(TableArgs),
    /// Apply a script of grid interactions and print the final table.
    Replay {
        #[command(flatten)]
        table: TableArgs,
        /// JSON array of steps.
        #[arg(long)]
        script: PathBuf,
    },
}

#[derive(Args, Debug)]
struct TableArgs {
    /// JSON array of row objects.
    #[arg(long)]
    rows: PathBuf,

    /// JSON array of column descriptors. Inferred from the first row when omitted.
    #[arg(long)]
    columns: Option<PathBuf>,
}

#[derive(Serialize)]
struct ValidationReport<'a> {
    has_errors: bool,
    error_count: usize,
    errors: &'a grid::validate::ValidationMap,
    actions: &'a Tally,
}

#[derive(Serialize)]
struct ReplayReport<'a> {
    rows: &'a [Row],
    has_errors: bool,
    has_unsaved_rows: bool,
    page: usize,
    history_index: usize,
    errors: &'a grid::validate::ValidationMap,
    actions: &'a Tally,
}

fn main() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_max_level(level).init();

    let config = load_config(&cli)?;
    match cli.command {
        Command::Validate(table) => run_validate(config, &table),
        Command::Replay { table, script } => run_replay(config, &table, &script),
    }
}

fn load_config(cli: &Cli) -> Result<GridConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = read(path)?;
            let is_yaml = path.extension().is_some_and(|ext| ext == "yaml" || ext == "yml");
            if is_yaml {
                serde_yaml::from_str(&raw).map_err(|source| CliError::Yaml { path: path.clone(), source })?
            } else {
                serde_json::from_str(&raw).map_err(|source| CliError::Json { path: path.clone(), source })?
            }
        }
        None => GridConfig::default(),
    };
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    if let Some(limit) = cli.history_limit {
        config.history_limit = Some(limit);
    }
    Ok(config.validate()?)
}

fn load_grid(config: GridConfig, table: &TableArgs) -> Result<Grid<Tally>, CliError> {
    let rows = rows_from_json(read_json(&table.rows)?)?;
    let columns = match &table.columns {
        Some(path) => {
            let columns: Vec<ColumnDescriptor> = serde_json::from_value(read_json(path)?)
                .map_err(|source| CliError::Json { path: path.clone(), source })?;
            Some(columns)
        }
        None => None,
    };

    Ok(open_session(GridCore::new(config), columns, rows))
}

fn run_validate(config: GridConfig, table: &TableArgs) -> Result<ExitCode, CliError> {
    let grid = load_grid(config, table)?;
    let report = ValidationReport {
        has_errors: grid.core.has_errors(),
        error_count: grid.core.errors().error_count(),
        errors: grid.core.errors(),
        actions: &grid.host,
    };
    print_json(&report)?;
    Ok(if report.has_errors { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn run_replay(config: GridConfig, table: &TableArgs, script: &Path) -> Result<ExitCode, CliError> {
    let mut grid = load_grid(config, table)?;
    let raw = read(script)?;
    let steps = parse_script(&raw).map_err(|source| CliError::Json { path: script.to_path_buf(), source })?;

    run_script(&mut grid, &steps);

    let report = ReplayReport {
        rows: grid.core.rows(),
        has_errors: grid.core.has_errors(),
        has_unsaved_rows: grid.core.has_unsaved_rows(),
        page: grid.core.page(),
        history_index: grid.core.history_index(),
        errors: grid.core.errors(),
        actions: &grid.host,
    };
    print_json(&report)?;
    Ok(ExitCode::SUCCESS)
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

fn read_json(path: &Path) -> Result<Value, CliError> {
    let raw = read(path)?;
    serde_json::from_str(&raw).map_err(|source| CliError::Json { path: path.to_path_buf(), source })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value).map_err(CliError::Render)?;
    println!("{rendered}");
    Ok(())
}
