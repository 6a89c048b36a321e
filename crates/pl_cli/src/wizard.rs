//! Interactive pass logger.
//!
//! Renders the current capture step as a numbered prompt, forwards one line
//! of operator input per choice, and scrubs the manual clock. All branching
//! decisions live in `pl_core`; this module only presents them.

use anyhow::Result;
use std::io::{self, BufRead, Write};

use pl_core::{
    CaptureStep, LoggerSession, ManualClock, MatchEvent, PassCategory, PassFailureType,
    PassLength, PassResult, Player, TimeSource,
};

const FAILURE_CHOICES: [(PassFailureType, &str); 7] = [
    (PassFailureType::Offside, "OFFSIDE (finish)"),
    (PassFailureType::Block, "BLOCK"),
    (PassFailureType::Interception, "INTERCEPTION"),
    (PassFailureType::BallCollection, "BALL COLLECTION"),
    (PassFailureType::UnsuccessfulCross, "UNSUCCESSFUL CROSS"),
    (PassFailureType::Tackle, "TACKLE"),
    (PassFailureType::Clearance, "CLEARANCE"),
];

const CATEGORY_CHOICES: [(PassCategory, &str); 4] = [
    (PassCategory::Normal, "NORMAL"),
    (PassCategory::Progressive, "PROGRESSIVE"),
    (PassCategory::Cross, "CROSS"),
    (PassCategory::Assist, "ASSIST"),
];

pub fn run(session: &mut LoggerSession, clock: &ManualClock) -> Result<()> {
    println!("Pass logger — `help` lists commands, `q` quits");

    let stdin = io::stdin();
    loop {
        render_prompt(session, clock);

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match handle_global(session, clock, input)? {
            Global::Quit => break,
            Global::Handled => continue,
            Global::NotGlobal => {}
        }

        match handle_step_input(session, input) {
            Ok(Some(event)) => {
                let summary = crate::describe_event(session.roster(), &event);
                println!("  logged: {}", summary);
            }
            Ok(None) => {}
            Err(err) => println!("  !! {}", err),
        }
    }

    Ok(())
}

enum Global {
    Quit,
    Handled,
    NotGlobal,
}

fn handle_global(
    session: &mut LoggerSession,
    clock: &ManualClock,
    input: &str,
) -> Result<Global> {
    let mut parts = input.split_whitespace();
    let command = parts.next().unwrap_or_default();

    match command {
        "q" | "quit" => return Ok(Global::Quit),
        "help" => {
            print_help();
        }
        "t" => match parts.next().and_then(|v| v.parse::<f64>().ok()) {
            Some(seconds) => {
                clock.set(seconds);
                println!("  clock at {}", pl_core::format_time(clock.current_time_sec()));
            }
            None => println!("  usage: t <seconds>"),
        },
        "reset" => {
            session.reset_flow();
            println!("  flow reset (team kept)");
        }
        "restart" => {
            session.reset_full();
            println!("  flow reset");
        }
        "list" => {
            if session.events().is_empty() {
                println!("  no events logged yet");
            }
            for event in session.events() {
                println!("  {}", crate::describe_event(session.roster(), event));
            }
        }
        "export" => {
            let json = session.export_json()?;
            let name = pl_core::export_file_name(chrono::Utc::now().timestamp_millis());
            std::fs::write(&name, json)?;
            println!("  exported {} event(s) to {}", session.events().len(), name);
        }
        "clear" => {
            if session.events().is_empty() {
                println!("  draft log is already empty");
            } else if crate::confirm(&format!("  clear all {} logged event(s)?", session.events().len()))? {
                session.clear_events()?;
                println!("  draft log cleared");
            }
        }
        _ => return Ok(Global::NotGlobal),
    }

    Ok(Global::Handled)
}

/// Dispatches one line of input against the current step.
fn handle_step_input(session: &mut LoggerSession, input: &str) -> pl_core::Result<Option<MatchEvent>> {
    let invalid =
        |msg: &str| -> pl_core::Result<Option<MatchEvent>> { Err(pl_core::CoreError::InvalidParameter(msg.to_string())) };

    match session.step() {
        CaptureStep::TeamSelect => {
            let team_id = match input.parse::<usize>() {
                Ok(n) if n >= 1 && n <= session.roster().teams.len() => {
                    session.roster().teams[n - 1].team_id.clone()
                }
                _ => input.to_string(),
            };
            session.select_team(&team_id)?;
            Ok(None)
        }

        CaptureStep::PasserSelect => {
            let player_id = own_player_by_jersey(session, input)?;
            session.select_passer(&player_id)?;
            Ok(None)
        }

        CaptureStep::LengthSelect => match input.to_ascii_lowercase().as_str() {
            "s" | "short" => {
                session.select_length(PassLength::Short)?;
                Ok(None)
            }
            "l" | "long" => {
                session.select_length(PassLength::Long)?;
                Ok(None)
            }
            _ => invalid("choose `s`hort or `l`ong"),
        },

        CaptureStep::ResultSelect => match input.to_ascii_lowercase().as_str() {
            "s" | "y" | "successful" => {
                session.select_result(PassResult::Successful)?;
                Ok(None)
            }
            "u" | "n" | "unsuccessful" => {
                session.select_result(PassResult::Unsuccessful)?;
                Ok(None)
            }
            _ => invalid("choose `s`uccessful or `u`nsuccessful"),
        },

        CaptureStep::ReceiverSelect => {
            let player_id = own_player_by_jersey(session, input)?;
            session.select_receiver(&player_id)?;
            Ok(None)
        }

        CaptureStep::CategorySelect => match input.parse::<usize>() {
            Ok(n) if n >= 1 && n <= CATEGORY_CHOICES.len() => {
                session.select_category(CATEGORY_CHOICES[n - 1].0)?;
                Ok(None)
            }
            _ => invalid("choose a category number"),
        },

        CaptureStep::OutplayQuery => match parse_yes_no(input) {
            Some(answer) => session.answer_outplay(answer),
            None => invalid("answer y/n"),
        },

        CaptureStep::OutplayDetails => {
            let mut parts = input.split_whitespace();
            // Malformed counts clamp to zero; they are never stored negative.
            let players = parts.next().and_then(|v| v.parse::<u32>().ok()).unwrap_or(0);
            let lines = parts.next().and_then(|v| v.parse::<u32>().ok()).unwrap_or(0);
            session.set_outplay_counts(players, lines)?;
            session.confirm_outplay()
        }

        CaptureStep::KeyPassQuery => match parse_yes_no(input) {
            Some(answer) => session.answer_key_pass(answer),
            None => invalid("answer y/n"),
        },

        CaptureStep::FailureTypeSelect => match input.parse::<usize>() {
            Ok(n) if n >= 1 && n <= FAILURE_CHOICES.len() => {
                session.select_failure_type(FAILURE_CHOICES[n - 1].0)
            }
            _ => invalid("choose a failure type number"),
        },

        CaptureStep::OpponentSelect => {
            if matches!(input.to_ascii_lowercase().as_str(), "skip" | "unknown" | "u") {
                session.skip_opponent()?;
                return Ok(None);
            }
            let player_id = opponent_player_by_jersey(session, input)?;
            session.select_opponent(&player_id)?;
            Ok(None)
        }

        CaptureStep::HighPressQuery => match parse_yes_no(input) {
            Some(answer) => {
                session.answer_high_press(answer)?;
                Ok(None)
            }
            None => invalid("answer y/n"),
        },

        CaptureStep::BallRecoveryQuery => match parse_yes_no(input) {
            Some(answer) => session.answer_ball_recovery(answer),
            None => invalid("answer y/n"),
        },
    }
}

fn render_prompt(session: &LoggerSession, clock: &ManualClock) {
    let capture = session.capture();
    let mut context = format!("[{}]", pl_core::format_time(clock.current_time_sec()));

    if let Some(team_id) = capture.team_id() {
        let name = session
            .roster()
            .team(team_id)
            .map(|t| t.team_name.clone())
            .unwrap_or_else(|| team_id.to_string());
        context.push_str(&format!(" {}", name));
    }
    if let (Some(team_id), Some(passer)) = (capture.team_id(), capture.from_player_id()) {
        if let Some(player) = session.roster().player(team_id, passer) {
            context.push_str(&format!(" / #{} {}", player.jersey_number, player.player_name));
        }
    }
    if let Some(length) = capture.pass_length() {
        context.push_str(&format!(" | {:?}", length));
    }
    if let Some(result) = capture.pass_result() {
        context.push_str(&format!(" | {:?}", result));
    }
    println!("\n{}", context);

    match session.step() {
        CaptureStep::TeamSelect => {
            println!("Select team:");
            for (i, team) in session.roster().teams.iter().enumerate() {
                println!("  {}. {}", i + 1, team.team_name);
            }
        }
        CaptureStep::PasserSelect => {
            println!("Select passer (jersey number):");
            if let Some(team) = capture.team_id().and_then(|id| session.roster().team(id)) {
                print_squad(&team.squad.iter().collect::<Vec<_>>());
            }
        }
        CaptureStep::LengthSelect => println!("Pass length? [s]hort / [l]ong"),
        CaptureStep::ResultSelect => println!("Result? [s]uccessful / [u]nsuccessful"),
        CaptureStep::ReceiverSelect => {
            println!("Select receiver (jersey number, passer excluded):");
            print_squad(&session.receiver_choices());
        }
        CaptureStep::CategorySelect => {
            println!("Pass category:");
            for (i, (_, label)) in CATEGORY_CHOICES.iter().enumerate() {
                println!("  {}. {}", i + 1, label);
            }
        }
        CaptureStep::OutplayQuery => println!("Did it outplay opponents? [y/n — n finishes]"),
        CaptureStep::OutplayDetails => println!("Outplay details: <players> <lines> (confirms)"),
        CaptureStep::KeyPassQuery => println!("Key pass? [y/n — both finish]"),
        CaptureStep::FailureTypeSelect => {
            println!("Failure outcome:");
            for (i, (_, label)) in FAILURE_CHOICES.iter().enumerate() {
                println!("  {}. {}", i + 1, label);
            }
        }
        CaptureStep::OpponentSelect => {
            println!("Opponent player (jersey number, or `skip`):");
            print_squad(&session.opponent_choices());
        }
        CaptureStep::HighPressQuery => println!("High press? [y/n]"),
        CaptureStep::BallRecoveryQuery => println!("Ball recovered? [y/n — both finish]"),
    }

    print!("> ");
    let _ = io::stdout().flush();
}

fn print_squad(players: &[&Player]) {
    for player in players {
        println!("  #{:<3} {}", player.jersey_number, player.player_name);
    }
}

fn print_help() {
    println!("  t <seconds>   scrub the clock to a video position");
    println!("  reset         discard the in-progress event, keep the team");
    println!("  restart       discard the in-progress event and the team");
    println!("  list          show logged events");
    println!("  export        write the export payload to the working directory");
    println!("  clear         empty the draft log (asks for confirmation)");
    println!("  q             quit");
}

fn parse_yes_no(input: &str) -> Option<bool> {
    match input.to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

fn own_player_by_jersey(session: &LoggerSession, input: &str) -> pl_core::Result<String> {
    let jersey: u8 = input
        .parse()
        .map_err(|_| pl_core::CoreError::InvalidParameter("enter a jersey number".to_string()))?;
    let team = session
        .capture()
        .team_id()
        .and_then(|id| session.roster().team(id))
        .ok_or_else(|| pl_core::CoreError::InvalidParameter("no team selected".to_string()))?;
    team.player_by_jersey(jersey)
        .map(|p| p.player_id.clone())
        .ok_or_else(|| pl_core::CoreError::NotFound(format!("no #{} in {}", jersey, team.team_name)))
}

fn opponent_player_by_jersey(session: &LoggerSession, input: &str) -> pl_core::Result<String> {
    let jersey: u8 = input
        .parse()
        .map_err(|_| pl_core::CoreError::InvalidParameter("enter a jersey number or `skip`".to_string()))?;
    let team = session
        .capture()
        .team_id()
        .and_then(|id| session.roster().opponent_of(id))
        .ok_or_else(|| pl_core::CoreError::NotFound("no opponent team loaded".to_string()))?;
    team.player_by_jersey(jersey)
        .map(|p| p.player_id.clone())
        .ok_or_else(|| pl_core::CoreError::NotFound(format!("no #{} in {}", jersey, team.team_name)))
}
