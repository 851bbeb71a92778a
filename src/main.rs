use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use q_connect_four::ai::{Agent, RandomAgent};
use q_connect_four::checkpoint::{CheckpointManager, CheckpointManagerConfig};
use q_connect_four::game::{GameSession, GameStatus, Player, COLS};

/// Play Connect Four against a stored agent in the terminal.
#[derive(Parser)]
#[command(name = "q_connect_four", about = "Play Connect Four against a trained agent")]
struct Cli {
    /// Stored agent to play against, or "random"
    #[arg(long, default_value = "q1_red")]
    agent: String,

    /// Side you play: red (moves first) or yellow
    #[arg(long, default_value = "yellow")]
    human_side: String,

    /// Directory agents are stored in
    #[arg(long, default_value = "data")]
    checkpoint_dir: PathBuf,

    /// List stored agents and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let manager = CheckpointManager::new(CheckpointManagerConfig {
        checkpoint_dir: cli.checkpoint_dir.clone(),
    });

    if cli.list {
        for meta in manager.list_agents().context("listing stored agents")? {
            println!(
                "{:<20} {:>10} episodes {:>10} states  epsilon {:.4}",
                meta.name, meta.episode_count, meta.table_size, meta.epsilon
            );
        }
        return Ok(());
    }

    let human = match cli.human_side.to_ascii_lowercase().as_str() {
        "red" => Player::Red,
        "yellow" => Player::Yellow,
        other => bail!("unknown side '{}' (expected 'red' or 'yellow')", other),
    };

    let mut opponent: Box<dyn Agent> = if cli.agent == "random" {
        Box::new(RandomAgent::new())
    } else {
        let agent = manager
            .load_agent(&cli.agent, None)
            .with_context(|| format!("loading agent '{}'", cli.agent))?;
        log::info!(
            "loaded '{}' ({} episodes, {} states)",
            cli.agent,
            agent.episode_count(),
            agent.table_size()
        );
        Box::new(agent)
    };

    play(opponent.as_mut(), human)
}

fn play(opponent: &mut dyn Agent, human: Player) -> Result<()> {
    let mut session = GameSession::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!(
        "You are {} against {}. Enter a column 0-{} or q to quit.",
        human.name(),
        opponent.name(),
        COLS - 1
    );

    while !session.is_terminal() {
        println!("\n{}", session.board());

        if session.current_player() == human {
            print!("{} to move> ", human.name());
            io::stdout().flush()?;

            let Some(line) = lines.next() else {
                return Ok(());
            };
            let input = line?;
            let input = input.trim();
            if input.eq_ignore_ascii_case("q") {
                return Ok(());
            }
            let Ok(col) = input.parse::<usize>() else {
                println!("'{}' is not a column number", input);
                continue;
            };
            if let Err(e) = session.apply_move(col) {
                println!("Illegal move: {e}");
            }
        } else {
            let col = opponent
                .select_move(session.board(), false)
                .context("agent found no legal column")?;
            session.apply_move(col)?;
            println!("{} plays column {}", opponent.name(), col);
        }
    }

    println!("\n{}", session.board());
    match session.status() {
        GameStatus::Won(winner) if winner == human => println!("You win!"),
        GameStatus::Won(winner) => println!("{} wins.", winner.name()),
        _ => println!("Draw."),
    }
    Ok(())
}
