//! tooljudge - evaluate LLM tool-calling runs against scenarios
//!
//! ## Commands
//!
//! - `evaluate`: Validate and score recorded action and claim logs
//! - `lint`: Check scenario files against the schema and authoring rules
//! - `tools`: Print function schemas for the standard tool set

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{info, warn, Level};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use tooljudge_core::scenario::scenario_files;
use tooljudge_core::{
    standard_tools, validate_scenario_text, EvaluationInput, Scenario, ScenarioLinter,
    ToolRegistry,
};

#[derive(Parser)]
#[command(name = "tooljudge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Judge how well a model used its tools", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and score one model response
    Evaluate {
        /// Scenario file (.yaml, .yml or .json)
        #[arg(short, long)]
        scenario: PathBuf,

        /// Action log (JSON)
        #[arg(short, long)]
        actions: PathBuf,

        /// Claim log (JSON)
        #[arg(short, long)]
        claims: PathBuf,

        /// Model name recorded in the output metadata
        #[arg(short, long)]
        model: Option<String>,

        /// Write the evaluation record here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Lint scenario files or directories
    Lint {
        /// Files or directories to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Print function schemas for the standard tools
    Tools {
        /// Only print this tool
        #[arg(short, long)]
        name: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    init_tracing(cli.log_json, level);

    let result = match cli.command {
        Commands::Evaluate {
            scenario,
            actions,
            claims,
            model,
            output,
        } => cmd_evaluate(&scenario, &actions, &claims, model, output.as_deref()),
        Commands::Lint { paths } => cmd_lint(&paths),
        Commands::Tools { name } => cmd_tools(name.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
            .ok();
    }
}

fn cmd_evaluate(
    scenario: &Path,
    actions: &Path,
    claims: &Path,
    model: Option<String>,
    output: Option<&Path>,
) -> Result<ExitCode> {
    let input = EvaluationInput::from_files(scenario, actions, claims)
        .context("Failed to load evaluation inputs")?;

    if let Some(id) = input.actions.scenario_id() {
        if id != input.scenario.id {
            warn!(
                scenario = %input.scenario.id,
                actions = %id,
                "Action log belongs to another scenario"
            );
        }
    }

    let evaluation = input.evaluate();
    let mut record = input.record(&evaluation);
    if let Some(model) = model {
        record = record.with_model(model);
    }

    match output {
        Some(path) => {
            record
                .write_to(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote evaluation record");
        }
        None => println!("{}", record.to_json_pretty()?),
    }

    eprintln!(
        "{}: {}/10 ({}) status={}",
        input.scenario.id, evaluation.score.total, evaluation.score.grade, evaluation.report.status
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_lint(paths: &[PathBuf]) -> Result<ExitCode> {
    let linter = ScenarioLinter::new();
    let mut problems = 0usize;

    for path in paths {
        if path.is_dir() {
            let files = scenario_files(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            info!(dir = %path.display(), files = files.len(), "Linting scenario directory");
            for file in &files {
                problems += lint_file(file, &linter)?;
            }
        } else {
            problems += lint_file(path, &linter)?;
        }
    }

    if problems > 0 {
        println!("{problems} problem(s) found");
        Ok(ExitCode::FAILURE)
    } else {
        println!("All scenarios valid");
        Ok(ExitCode::SUCCESS)
    }
}

/// Schema, parse and authoring checks for one file. Returns the problem count.
fn lint_file(path: &Path, linter: &ScenarioLinter) -> Result<usize> {
    let label = path.display().to_string();
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {label}"))?;

    if let Err(errors) = validate_scenario_text(&text) {
        for error in &errors {
            println!("{label}: schema: {error}");
        }
        return Ok(errors.len());
    }

    match Scenario::from_file(path) {
        Ok(scenario) => Ok(report_lint(&label, linter, &scenario)),
        Err(e) => {
            println!("{label}: {e}");
            Ok(1)
        }
    }
}

fn report_lint(label: &str, linter: &ScenarioLinter, scenario: &Scenario) -> usize {
    let issues = linter.lint(scenario);
    for issue in &issues {
        println!("{label}: {issue}");
    }
    issues.len()
}

fn cmd_tools(name: Option<&str>) -> Result<ExitCode> {
    let registry = ToolRegistry::standard();

    let schemas: Vec<Value> = match name {
        Some(name) => match registry.get(name) {
            Some(tool) => vec![tool.to_function_schema()],
            None => bail!(
                "Unknown tool '{name}'. Known tools: {}",
                standard_tools()
                    .iter()
                    .map(|t| t.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        },
        None => registry.function_schemas(),
    };

    println!("{}", serde_json::to_string_pretty(&schemas)?);
    Ok(ExitCode::SUCCESS)
}
