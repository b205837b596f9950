mod error_presentation;

use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use dbexpect_core::{DatasetLocation, DuplicatePolicy, EffectiveCheck, ExpectationResolver};
use dbexpect_testkit::{
    LoaderConfig, TestContext, YamlFileLoader, load_dataset_with_policy, load_scopes_from_str,
};
use error_presentation::{CliError, CliResult, Stage, render_runtime_error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dbexpect", version, about = "Inspect dataset fixtures and expectation scopes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the tables, columns and row counts of a YAML fixture.
    Inspect {
        file: PathBuf,
        /// Let later tables replace earlier ones whose names differ only by case.
        #[arg(long)]
        overwrite_duplicates: bool,
    },
    /// Resolve a scope file (outermost scope first) into the checks a test runs.
    Resolve {
        file: PathBuf,
        /// Directory fixture locations are resolved against.
        #[arg(long, default_value = ".")]
        base_dir: PathBuf,
        /// Test class used to derive the conventional fixture name.
        #[arg(long, default_value = "Test")]
        class: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Inspect {
            file,
            overwrite_duplicates,
        } => inspect(file, overwrite_duplicates),
        Command::Resolve {
            file,
            base_dir,
            class,
        } => resolve(file, base_dir, class),
    };

    match outcome {
        Ok(rendered) => {
            print!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{}", render_runtime_error(error));
            ExitCode::FAILURE
        }
    }
}

fn read_input(path: PathBuf) -> CliResult<String> {
    fs::read_to_string(&path).map_err(|source| CliError::ReadFile { path, source })
}

fn inspect(file: PathBuf, overwrite_duplicates: bool) -> CliResult<String> {
    let yaml = read_input(file)?;
    let policy = if overwrite_duplicates {
        DuplicatePolicy::Overwrite
    } else {
        DuplicatePolicy::Reject
    };
    let dataset =
        load_dataset_with_policy(&yaml, policy).map_err(CliError::core(Stage::Fixture))?;

    let mut lines = Vec::with_capacity(dataset.len() * 2);
    for table in &dataset {
        lines.push(format!("{} ({} rows)", table.folded_name(), table.row_count()));
        lines.push(format!("  columns: {}", table.columns().join(", ")));
    }
    Ok(render_lines(lines))
}

fn resolve(file: PathBuf, base_dir: PathBuf, class: String) -> CliResult<String> {
    let yaml = read_input(file)?;
    let scopes = load_scopes_from_str(&yaml).map_err(CliError::core(Stage::Scopes))?;
    let checks = ExpectationResolver::new()
        .resolve(&scopes)
        .map_err(|error| CliError::core(Stage::Scopes)(error.into()))?;

    let loader = YamlFileLoader::new(LoaderConfig::with_base_dir(base_dir));
    let context = TestContext::new(class, "");

    let mut lines = Vec::new();
    for (index, check) in checks.iter().enumerate() {
        render_check(&mut lines, index, check, &loader, &context);
    }
    Ok(render_lines(lines))
}

fn render_lines(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

fn render_check(
    lines: &mut Vec<String>,
    index: usize,
    check: &EffectiveCheck,
    loader: &YamlFileLoader,
    context: &TestContext,
) {
    let spec = check.spec();
    let location = match spec.location() {
        DatasetLocation::Convention => format!(
            "{} (convention)",
            loader.resolve_path(context, spec.location()).display()
        ),
        DatasetLocation::Path(_) => loader
            .resolve_path(context, spec.location())
            .display()
            .to_string(),
    };
    let modifiers: Vec<_> = spec.modifiers().iter().map(|id| id.as_str()).collect();

    lines.push(format!("check[{index}] {}", check.scope()));
    lines.push(format!("  dataset: {location}"));
    lines.push(format!("  mode: {}", spec.assertion_mode()));
    lines.push(format!("  table: {}", spec.table().unwrap_or("*")));
    if let Some(query) = spec.query() {
        lines.push(format!("  query: {query}"));
    }
    lines.push(format!("  override: {}", spec.overrides()));
    lines.push(format!("  modifiers: [{}]", modifiers.join(", ")));
}
