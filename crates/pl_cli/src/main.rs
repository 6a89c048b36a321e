//! Pass Logger CLI
//!
//! Operator surface for the annotation core: an interactive wizard plus
//! maintenance subcommands for the roster configuration and the draft log.

mod wizard;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use pl_core::{
    export_file_name, export_match_log_json, load_match_config, save_match_config,
    DraftEventStore, LoggerSession, ManualClock, MatchData, MatchEvent, EVENT_LOG_FILE,
    MATCH_CONFIG_FILE,
};

#[derive(Parser)]
#[command(name = "passlog")]
#[command(about = "Manual pass-event annotation for match video", long_about = None)]
struct Cli {
    /// Directory holding the match configuration and the draft log
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default match configuration, ready for editing
    Init {
        /// Overwrite an existing configuration
        #[arg(long, default_value = "false")]
        force: bool,
    },

    /// Print the configured league and squads
    Show,

    /// Print the draft event log
    Events,

    /// Run the interactive pass logger
    Log,

    /// Write the export payload (match info + events)
    Export {
        /// Output file; defaults to MATCH_PASSING_LOG_<epoch-ms>.json
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Clear the draft event log
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, default_value = "false")]
        yes: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config_path = cli.data_dir.join(MATCH_CONFIG_FILE);
    let log_path = cli.data_dir.join(EVENT_LOG_FILE);

    match cli.command {
        Commands::Init { force } => {
            if config_path.exists() && !force {
                bail!(
                    "configuration already exists at {}; pass --force to overwrite",
                    config_path.display()
                );
            }
            save_match_config(&config_path, &MatchData::default_fixture())?;
            println!("Wrote default configuration to {}", config_path.display());
        }

        Commands::Show => {
            let data = load_match_config(&config_path);
            println!("{} — {}", data.league.league_name, data.league.sub_league);
            for team in &data.teams {
                println!("\n{} ({})", team.team_name, team.team_id);
                for player in &team.squad {
                    println!("  #{:<3} {}", player.jersey_number, player.player_name);
                }
            }
        }

        Commands::Events => {
            let data = load_match_config(&config_path);
            let store = DraftEventStore::open(&log_path);
            if store.is_empty() {
                println!("No events logged yet");
            }
            for event in store.list() {
                println!("{}", describe_event(&data, event));
            }
        }

        Commands::Log => {
            let roster = load_match_config(&config_path);
            let store = DraftEventStore::open(&log_path);
            let clock = ManualClock::new();
            let mut session = LoggerSession::new(roster, store, Box::new(clock.clone()));
            wizard::run(&mut session, &clock)?;
        }

        Commands::Export { out } => {
            let data = load_match_config(&config_path);
            let store = DraftEventStore::open(&log_path);
            let json = export_match_log_json(&data, store.list())?;

            let out = out.unwrap_or_else(|| {
                cli.data_dir.join(export_file_name(chrono::Utc::now().timestamp_millis()))
            });
            std::fs::write(&out, json)?;
            println!("Exported {} event(s) to {}", store.len(), out.display());
        }

        Commands::Clear { yes } => {
            let mut store = DraftEventStore::open(&log_path);
            if store.is_empty() {
                println!("Draft log is already empty");
                return Ok(());
            }
            if !yes && !confirm(&format!("Clear all {} logged event(s)?", store.len()))? {
                println!("Aborted");
                return Ok(());
            }
            store.clear()?;
            println!("Draft log cleared");
        }
    }

    Ok(())
}

/// One-line rendering of a logged event, jersey numbers resolved through the
/// roster where possible.
pub(crate) fn describe_event(data: &MatchData, event: &MatchEvent) -> String {
    let jersey = |player_id: &str| -> String {
        data.player(&event.team_id, player_id)
            .map(|p| format!("P{}", p.jersey_number))
            .unwrap_or_else(|| player_id.to_string())
    };

    let passer = jersey(&event.from_player_id);
    let target = match &event.to_player_id {
        Some(receiver) => jersey(receiver),
        None => "FAIL".to_string(),
    };

    format!(
        "{}  {} -> {}  {:?} {:?}",
        event.time, passer, target, event.pass_length, event.pass_result
    )
}

pub(crate) fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
