//! Verity daemon: deploys an oracle node from a TOML config.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use verity_node::{replay, ActionScript, NodeConfig, OracleNode};
use verity_utils::{format_duration, init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "verity-daemon", about = "Verity staking oracle daemon")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "VERITY_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "VERITY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "VERITY_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the effective configuration as TOML.
    ShowConfig,
    /// Deploy every configured engine and print its opening state.
    Status,
    /// Replay an action script and print the resulting events as JSON lines.
    Replay {
        /// TOML file with the actions to apply.
        #[arg(long)]
        actions: PathBuf,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<NodeConfig> {
    let mut config = match &cli.config {
        Some(path) => NodeConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => NodeConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format, &config.log_level)?;

    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), engines = config.engines.len(), "loaded config");
    }

    match cli.command {
        Command::ShowConfig => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Status => {
            let node = OracleNode::new(&config)?;
            println!(
                "operator {} (minimum disablement timeout {})",
                node.operator().address(),
                format_duration(config.operator.minimum_timeout_secs),
            );
            for deployment in node.deployments() {
                let engine = deployment.engine();
                let phase = engine.verification_phase_number();
                let metrics = engine.metrics_by_verification_phase_number(phase);
                println!(
                    "{}: {} criterion, phase {phase}, bounty {}, fund {}",
                    deployment.name(),
                    engine.criterion().kind(),
                    metrics.bounty_amount,
                    node.balance_of(engine.bounty_fund()),
                );
            }
        }
        Command::Replay { actions } => {
            let script = ActionScript::from_toml_file(&actions)
                .with_context(|| format!("failed to load actions from {}", actions.display()))?;
            let report = replay(&config, &script)?;
            for event in &report.events {
                println!("{}", event.to_json_line()?);
            }
            for failure in &report.failures {
                tracing::warn!(index = failure.index, error = %failure.error, "action failed");
            }
            tracing::info!(
                actions = script.actions.len(),
                events = report.events.len(),
                failures = report.failures.len(),
                "replay finished"
            );
        }
    }
    Ok(())
}
