use clap::{Parser, Subcommand};
use reagent::{
    AgentConfig, AgentLoop, CancelToken, RunOutcome, RunReport, ToolRegistry, Turn,
    standard_registry,
};
use std::num::NonZeroU32;
use std::path::PathBuf;

mod replay;

use replay::ReplayModelClient;

#[derive(Parser, Debug)]
#[command(name = "reagent", version)]
#[command(about = "Reagent CLI - run the tool-dispatch reasoning loop from scripted completions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the loop against a completion script
    Run {
        /// The user goal to solve
        goal: String,
        /// Path to a completion script ('---' separated)
        #[arg(long)]
        script: PathBuf,
        /// Maximum rounds before the run is abandoned
        #[arg(long, default_value = "16")]
        max_rounds: NonZeroU32,
        /// Maximum consecutive malformed rounds tolerated
        #[arg(long, default_value = "3")]
        malformed_limit: u32,
        /// Cap on rendered observation length, in characters
        #[arg(long, default_value = "4096")]
        max_observation_len: usize,
        /// Emit the full run report as JSON
        #[arg(long)]
        json: bool,
        /// Print every transcript turn
        #[arg(long, short)]
        verbose: bool,
    },
    /// List the standard tools
    Tools,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("could not read script: {0}")]
    Script(#[from] std::io::Error),
    #[error(transparent)]
    Registry(#[from] reagent::RegistryError),
    #[error(transparent)]
    Run(#[from] reagent::RunError),
    #[error("report serialization failed: {0}")]
    Report(#[from] serde_json::Error),
    #[error("runtime setup failed: {0}")]
    Runtime(std::io::Error),
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let env_filter = match "info".parse() {
        Ok(directive) => env_filter.add_directive(directive),
        Err(_) => env_filter,
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let exit_code = match cli.command {
        Commands::Run {
            goal,
            script,
            max_rounds,
            malformed_limit,
            max_observation_len,
            json,
            verbose,
        } => {
            let config = AgentConfig {
                max_rounds,
                malformed_limit,
                max_observation_len,
                ..AgentConfig::default()
            };
            match run_command(&goal, &script, config, json, verbose) {
                Ok(outcome) if outcome.is_success() => 0,
                Ok(_) => 2,
                Err(err) => {
                    tracing::error!(error = %err, "run failed");
                    1
                }
            }
        }
        Commands::Tools => match tools_command() {
            Ok(()) => 0,
            Err(err) => {
                tracing::error!(error = %err, "could not list tools");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

fn run_command(
    goal: &str,
    script: &PathBuf,
    config: AgentConfig,
    json: bool,
    verbose: bool,
) -> Result<RunOutcome, CliError> {
    let model = ReplayModelClient::from_path(script)?;
    let registry = standard_registry()?;
    let agent = AgentLoop::new(model, registry, config);

    let cancel = CancelToken::new();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    {
        let cancel = cancel.clone();
        runtime.spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received, stopping after the current round");
                cancel.cancel();
            }
        });
    }

    let report = agent.run_with_cancel(goal, &cancel)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, verbose);
    }
    Ok(report.outcome)
}

fn print_report(report: &RunReport, verbose: bool) {
    if verbose {
        for turn in &report.transcript {
            match turn {
                Turn::UserInput { text } => println!("Question: {text}"),
                Turn::ModelThought { text } => println!("Thought: {text}"),
                Turn::ActionRequest { tool, input } => {
                    println!("Action: {tool}\nAction Input: {input}");
                }
                Turn::Observation { content, is_error, .. } => {
                    let marker = if *is_error { " (error)" } else { "" };
                    println!("Observation{marker}: {content}");
                }
                Turn::FinalAnswer { text } => println!("Final Answer: {text}"),
            }
        }
        println!();
    }

    let elapsed = humantime::format_duration(report.elapsed);
    match &report.outcome {
        RunOutcome::FinalAnswer { text } => {
            println!("{text}");
            eprintln!("({} rounds, {elapsed})", report.rounds);
        }
        RunOutcome::BudgetExceeded => {
            eprintln!(
                "No answer: budget exhausted after {} rounds ({elapsed})",
                report.rounds
            );
        }
        RunOutcome::ToolDispatchFailure { tool } => {
            eprintln!(
                "No answer: the model kept requesting unknown tool '{tool}' ({} rounds, {elapsed})",
                report.rounds
            );
        }
        RunOutcome::Cancelled => {
            eprintln!("Cancelled after {} rounds ({elapsed})", report.rounds);
        }
    }
}

fn tools_command() -> Result<(), CliError> {
    let registry = standard_registry()?;
    for tool in registry.tools() {
        println!("{}: {}", tool.name(), tool.description());
    }
    Ok(())
}
