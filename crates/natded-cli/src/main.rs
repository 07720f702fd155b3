//! natded CLI
//!
//! Command-line driver for natural-deduction exercises.
//!
//! # Commands
//!
//! - `natded parse <formula>...` - Parse formulas and print their canonical form
//! - `natded rules` - List the inference rules of a logic system
//! - `natded run <problem> [--script <file>]` - Replay a proof script against a problem

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use natded_formula::parse;
use natded_proof::{
    Command, EngineConfig, LineKind, LogicSystem, Problem, ProofEngine, ProofEvent,
};
use natded_rules::RuleKind;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "natded")]
#[command(about = "Natural-deduction formula parser and proof checker")]
#[command(version)]
struct Cli {
    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse formulas and print their canonical form
    Parse {
        /// Formulas to parse
        #[arg(required = true)]
        formulas: Vec<String>,
        /// Print the syntax tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the inference rules of a logic system
    Rules {
        /// propositional, modal or firstOrder
        #[arg(short, long, default_value = "propositional")]
        system: String,
    },
    /// Replay a script of JSON commands against a problem
    Run {
        /// Problem definition (JSON)
        problem: PathBuf,
        /// One JSON command per line; blank lines and `#` comments are skipped
        #[arg(short, long)]
        script: Option<PathBuf>,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
        /// Leave subproofs open until an explicit discharge command
        #[arg(long)]
        no_auto_discharge: bool,
        /// Reject add_line commands
        #[arg(long)]
        no_manual_lines: bool,
        /// Fail unless the proof is complete at the end of the script
        #[arg(long)]
        check: bool,
    },
}

/// Options for [`run_proof`].
#[derive(Clone, Copy, Debug, Default)]
struct RunOptions {
    no_auto_discharge: bool,
    no_manual_lines: bool,
}

/// Outcome of replaying a script.
#[derive(Debug)]
struct RunReport {
    engine: ProofEngine,
    events: Vec<ProofEvent>,
}

impl RunReport {
    fn errors(&self) -> usize {
        self.events.iter().filter(|e| e.is_error()).count()
    }
}

fn parse_system(name: &str) -> Result<LogicSystem> {
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .with_context(|| format!("unknown logic system '{name}'"))
}

/// Canonical text (or JSON tree) of each formula.
fn parse_formulas(formulas: &[String], json: bool) -> Result<Vec<String>> {
    formulas
        .iter()
        .map(|text| {
            let formula = parse(text).with_context(|| format!("cannot parse '{text}'"))?;
            if json {
                Ok(serde_json::to_string(&formula)?)
            } else {
                Ok(formula.to_string())
            }
        })
        .collect()
}

/// One line per rule: name, tier marker and slots.
fn list_rules(system: LogicSystem) -> Vec<String> {
    system
        .rules()
        .map(|rule: RuleKind| {
            let info = rule.info();
            let slots: Vec<&str> = info.slots.iter().map(|s| s.placeholder).collect();
            let marker = if info.is_subproof { " (subproof)" } else { "" };
            format!("{:<7}{}{}", info.name, slots.join(", "), marker)
        })
        .collect()
}

fn load_problem(path: &Path) -> Result<Problem> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read problem {}", path.display()))?;
    Problem::from_json(&text).with_context(|| format!("invalid problem {}", path.display()))
}

fn load_script(path: &Path) -> Result<Vec<Command>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    let mut commands = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command: Command = serde_json::from_str(line)
            .with_context(|| format!("{}:{}: invalid command", path.display(), i + 1))?;
        commands.push(command);
    }
    Ok(commands)
}

fn run_proof(problem: &Path, script: Option<&Path>, options: RunOptions) -> Result<RunReport> {
    let problem = load_problem(problem)?;
    let config = EngineConfig {
        system: problem.system,
        auto_discharge: !options.no_auto_discharge,
        allow_manual_lines: !options.no_manual_lines,
    };
    let mut engine = ProofEngine::with_config(&problem, config)?;
    let commands = match script {
        Some(path) => load_script(path)?,
        None => Vec::new(),
    };
    info!(commands = commands.len(), system = %engine.system(), "running script");

    let mut events = Vec::new();
    for command in commands {
        debug!(?command, "dispatch");
        events.extend(engine.dispatch(command));
    }
    Ok(RunReport { engine, events })
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        for event in &report.events {
            println!("{}", serde_json::to_string(event)?);
        }
        return Ok(());
    }
    println!("Goal: {}", report.engine.goal());
    for line in report.engine.lines().iter().filter(|l| l.kind == LineKind::Premise) {
        println!("{line}");
    }
    for event in &report.events {
        println!("{event}");
    }
    if let Some(goal) = report.engine.active_subgoal() {
        println!("Open {} subproof, goal {}", goal.kind, goal.goal);
    }
    let status = if report.engine.is_complete() {
        "complete"
    } else {
        "incomplete"
    };
    println!("Proof {status} ({} rejected command(s))", report.errors());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Parse { formulas, json } => {
            for line in parse_formulas(&formulas, json)? {
                println!("{line}");
            }
        }
        Commands::Rules { system } => {
            let system = parse_system(&system)?;
            println!("Rules for {system} logic:");
            for line in list_rules(system) {
                println!("  {line}");
            }
        }
        Commands::Run {
            problem,
            script,
            json,
            no_auto_discharge,
            no_manual_lines,
            check,
        } => {
            let options = RunOptions {
                no_auto_discharge,
                no_manual_lines,
            };
            let report = run_proof(&problem, script.as_deref(), options)?;
            print_report(&report, json)?;
            if check && !report.engine.is_complete() {
                bail!("proof of {} is not complete", report.engine.goal());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
