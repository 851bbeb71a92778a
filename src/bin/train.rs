use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use q_connect_four::ai::{Agent, QConfig, QLearningAgent, RandomAgent};
use q_connect_four::checkpoint::CheckpointManager;
use q_connect_four::config::AppConfig;
use q_connect_four::game::Player;
use q_connect_four::training::Trainer;

/// Train a Q-learning Connect Four agent.
#[derive(Parser)]
#[command(name = "train", about = "Train a Q-learning Connect Four agent")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Name the learner is loaded from and stored under
    #[arg(long, default_value = "q1_red")]
    name: String,

    /// Opponent: "random", "self" (a frozen copy of the learner) or a stored agent name
    #[arg(long, default_value = "random")]
    opponent: String,

    /// Side the learner plays: red or yellow
    #[arg(long)]
    side: Option<String>,

    /// Override number of training episodes
    #[arg(long)]
    episodes: Option<usize>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Start from an empty table even if the learner is stored
    #[arg(long)]
    fresh: bool,

    /// Override the directory agents are stored in
    #[arg(long)]
    checkpoint_dir: Option<PathBuf>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml()?);
        return Ok(());
    }

    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(episodes) = cli.episodes {
        app_config.training.num_episodes = episodes;
    }
    if let Some(side) = &cli.side {
        app_config.training.learner_side = parse_side(side)?;
    }
    if let Some(dir) = &cli.checkpoint_dir {
        app_config.checkpoint.checkpoint_dir = dir.clone();
    }
    app_config.validate().context("validating configuration")?;

    let manager = CheckpointManager::new(app_config.checkpoint.clone());

    let mut learner = if !cli.fresh && manager.has_agent(&cli.name) {
        let agent = manager
            .load_agent(&cli.name, cli.seed)
            .with_context(|| format!("loading agent '{}'", cli.name))?;
        log::info!(
            "resumed '{}' at episode {} ({} states)",
            cli.name,
            agent.episode_count(),
            agent.table_size()
        );
        agent
    } else {
        log::info!("starting '{}' from an empty table", cli.name);
        new_agent(app_config.agent.clone(), cli.seed)
    };

    let mut opponent: Box<dyn Agent> = match cli.opponent.as_str() {
        "random" => Box::new(match cli.seed {
            Some(seed) => RandomAgent::with_seed(seed.wrapping_add(1)),
            None => RandomAgent::new(),
        }),
        "self" => Box::new(learner.clone()),
        name if name == cli.name => {
            bail!("opponent '{}' is the learner itself; use --opponent self", name)
        }
        name => Box::new(stored_opponent(&manager, name, &app_config, cli.seed)?),
    };

    let trainer = Trainer::new(app_config.training.clone()).with_checkpoints(
        CheckpointManager::new(app_config.checkpoint.clone()),
        cli.name.clone(),
    );
    let metrics = trainer
        .train(&mut learner, opponent.as_mut())
        .context("training")?;

    let window = app_config.training.metrics_window;
    let path = manager
        .save_agent_state(&cli.name, &learner, Some(metrics.checkpoint_metrics(window)))
        .with_context(|| format!("storing agent '{}'", cli.name))?;

    println!("Stored '{}' at {}", cli.name, path.display());
    println!(
        "Episodes: {} | win: {:.1}% | loss: {:.1}% | draw: {:.1}% | states: {} | epsilon: {:.4}",
        learner.episode_count(),
        metrics.win_rate(window) * 100.0,
        metrics.loss_rate(window) * 100.0,
        metrics.draw_rate(window) * 100.0,
        learner.table_size(),
        learner.epsilon()
    );
    Ok(())
}

fn parse_side(side: &str) -> Result<Player> {
    match side.to_ascii_lowercase().as_str() {
        "red" => Ok(Player::Red),
        "yellow" => Ok(Player::Yellow),
        other => bail!("unknown side '{}' (expected 'red' or 'yellow')", other),
    }
}

fn new_agent(config: QConfig, seed: Option<u64>) -> QLearningAgent {
    match seed {
        Some(seed) => QLearningAgent::with_seed(config, seed),
        None => QLearningAgent::new(config),
    }
}

/// Load a stored opponent, creating and storing a fresh one when absent.
fn stored_opponent(
    manager: &CheckpointManager,
    name: &str,
    app_config: &AppConfig,
    seed: Option<u64>,
) -> Result<QLearningAgent> {
    let seed = seed.map(|s| s.wrapping_add(2));
    if manager.has_agent(name) {
        let agent = manager
            .load_agent(name, seed)
            .with_context(|| format!("loading opponent '{name}'"))?;
        log::info!("opponent '{}' loaded ({} states)", name, agent.table_size());
        return Ok(agent);
    }

    let agent = new_agent(app_config.agent.clone(), seed);
    manager
        .save_agent_state(name, &agent, None)
        .with_context(|| format!("storing new opponent '{name}'"))?;
    log::info!("opponent '{}' not found, stored a fresh one", name);
    Ok(agent)
}
