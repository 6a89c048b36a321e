//! Event normalizer.
//!
//! Turns the attributes accumulated by the capture flow into one canonical
//! [`MatchEvent`]. Pure apart from identifier generation: two calls with the
//! same inputs differ only in `event_id`.

use uuid::Uuid;

use crate::models::{
    CategoryTag, EventType, MatchEvent, PassCategory, PassFailureType, PassLength, PassResult,
};

/// Success-branch attributes, complete by the time the flow reaches a
/// terminal choice.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessDetails {
    pub to_player_id: String,
    pub category: PassCategory,
    pub key_pass: bool,
    pub outplay: bool,
    pub outplay_players: u32,
    pub outplay_lines: u32,
}

/// Failure-branch attributes. Offside submissions leave everything but the
/// failure type unset.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureDetails {
    pub failure_type: PassFailureType,
    pub opponent_player_id: Option<String>,
    pub high_press: Option<bool>,
    pub ball_recovery: Option<PassResult>,
}

/// Exactly one branch of attributes per pass; the record's mutual-exclusivity
/// invariant holds by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum PassOutcome {
    Successful(SuccessDetails),
    Unsuccessful(FailureDetails),
}

impl PassOutcome {
    pub fn result(&self) -> PassResult {
        match self {
            PassOutcome::Successful(_) => PassResult::Successful,
            PassOutcome::Unsuccessful(_) => PassResult::Unsuccessful,
        }
    }
}

/// Well-formed attribute bag handed over by the capture state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct PassEventArgs {
    pub pass_length: PassLength,
    pub outcome: PassOutcome,
}

/// Formats seconds into zero-padded `HH:MM:SS`. Hours are unbounded, not
/// wrapped at 24; sub-second precision is floored away.
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Builds the canonical pass record.
///
/// Validation is the state machine's job; empty base identifiers here mean
/// the submission guard was bypassed, which is a programming error.
pub fn create_pass_event(
    team_id: &str,
    from_player_id: &str,
    video_time_sec: f64,
    args: PassEventArgs,
) -> MatchEvent {
    assert!(
        !team_id.is_empty() && !from_player_id.is_empty(),
        "pass event requires team and passer identifiers"
    );

    let mut event = MatchEvent {
        event_id: Uuid::new_v4(),
        event_type: EventType::Pass,
        team_id: team_id.to_string(),
        from_player_id: from_player_id.to_string(),
        time: format_time(video_time_sec),
        video_time_sec,
        pass_length: args.pass_length,
        pass_result: args.outcome.result(),
        to_player_id: None,
        is_progressive: None,
        is_cross: None,
        is_assist: None,
        is_key_pass: None,
        outplay: None,
        outplay_players: None,
        outplay_lines: None,
        pass_failure_type: None,
        opponent_player_id: None,
        high_press: None,
        ball_recovery: None,
        pass_categories: None,
    };

    match args.outcome {
        PassOutcome::Successful(details) => {
            let is_progressive = details.category == PassCategory::Progressive;
            let is_cross = details.category == PassCategory::Cross;
            let is_assist = details.category == PassCategory::Assist;

            event.to_player_id = Some(details.to_player_id);
            event.is_progressive = Some(is_progressive);
            event.is_cross = Some(is_cross);
            event.is_assist = Some(is_assist);
            event.is_key_pass = Some(details.key_pass);
            event.outplay = Some(details.outplay);
            event.outplay_players = Some(details.outplay_players);
            event.outplay_lines = Some(details.outplay_lines);

            event.pass_categories = derive_categories(
                is_progressive,
                details.key_pass,
                is_assist,
                is_cross,
            );
        }
        PassOutcome::Unsuccessful(details) => {
            event.pass_failure_type = Some(details.failure_type);
            event.opponent_player_id = details.opponent_player_id;
            event.high_press = details.high_press;
            event.ball_recovery = details.ball_recovery;
        }
    }

    event
}

/// Legacy tag list, in fixed order: PROGRESSIVE_PASS, KEY_PASS, ASSIST,
/// CROSS. An assist counts as a key pass. `None` when no tag applies.
fn derive_categories(
    is_progressive: bool,
    is_key_pass: bool,
    is_assist: bool,
    is_cross: bool,
) -> Option<Vec<CategoryTag>> {
    let mut tags = Vec::new();
    if is_progressive {
        tags.push(CategoryTag::ProgressivePass);
    }
    if is_key_pass || is_assist {
        tags.push(CategoryTag::KeyPass);
    }
    if is_assist {
        tags.push(CategoryTag::Assist);
    }
    if is_cross {
        tags.push(CategoryTag::Cross);
    }

    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}
