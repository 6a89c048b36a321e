//! # pl_core - Pass-Event Annotation Core
//!
//! This library drives manual annotation of passing events from match video:
//! an operator walks a fixed decision tree (team, passer, length, outcome,
//! branch-specific sub-flows), and each completed walk is normalized into one
//! canonical record and appended to a persisted draft log.
//!
//! ## Features
//! - Capture state machine with derived steps and defended invariants
//! - Pure event normalizer (derived flags, category tags, HH:MM:SS times)
//! - Append-only draft store with atomic JSON persistence
//! - Roster/configuration snapshot with lookup helpers and export payload

pub mod api;
pub mod capture;
pub mod error;
pub mod factory;
pub mod models;
pub mod store;
pub mod time;

// Re-export main API types
pub use api::{build_export_payload, export_file_name, export_match_log_json, MatchLogExport};
pub use capture::{CaptureState, CaptureStep, LoggerSession, SubmitPatch};
pub use error::{CoreError, Result};
pub use factory::{
    create_pass_event, format_time, FailureDetails, PassEventArgs, PassOutcome, SuccessDetails,
};
pub use models::{
    CategoryTag, EventType, League, MatchData, MatchEvent, PassCategory, PassFailureType,
    PassLength, PassResult, Player, Team, UNKNOWN_PLAYER,
};
pub use store::{
    load_match_config, save_match_config, DraftEventStore, EVENT_LOG_FILE, MATCH_CONFIG_FILE,
};
pub use time::{ManualClock, NullTimeSource, TimeSource};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_session(clock: &ManualClock) -> (LoggerSession, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = DraftEventStore::open(dir.path().join(EVENT_LOG_FILE));
        let session =
            LoggerSession::new(MatchData::default_fixture(), store, Box::new(clock.clone()));
        (session, dir)
    }

    #[test]
    fn test_progressive_outplay_scenario() {
        let clock = ManualClock::new();
        let (mut session, _dir) = new_session(&clock);
        clock.set(125.0);

        session.select_team("home").unwrap();
        session.select_passer("H7").unwrap();
        session.select_length(PassLength::Short).unwrap();
        session.select_result(PassResult::Successful).unwrap();
        session.select_receiver("H9").unwrap();
        session.select_category(PassCategory::Progressive).unwrap();
        session.answer_outplay(true).unwrap();
        session.set_outplay_counts(2, 1).unwrap();

        let event = session.confirm_outplay().unwrap().expect("terminal choice");

        assert_eq!(event.is_progressive, Some(true));
        assert_eq!(event.outplay, Some(true));
        assert_eq!(event.outplay_players, Some(2));
        assert_eq!(event.outplay_lines, Some(1));
        assert_eq!(event.pass_categories, Some(vec![CategoryTag::ProgressivePass]));
        assert_eq!(event.time, "00:02:05");
        assert_eq!(event.video_time_sec, 125.0);
    }

    #[test]
    fn test_cross_key_pass_scenario() {
        let clock = ManualClock::new();
        let (mut session, _dir) = new_session(&clock);

        session.select_team("home").unwrap();
        session.select_passer("H7").unwrap();
        session.select_length(PassLength::Long).unwrap();
        session.select_result(PassResult::Successful).unwrap();
        session.select_receiver("H9").unwrap();
        session.select_category(PassCategory::Cross).unwrap();

        let event = session.answer_key_pass(true).unwrap().expect("terminal choice");

        assert_eq!(event.is_cross, Some(true));
        assert_eq!(event.is_key_pass, Some(true));
        assert_eq!(
            event.pass_categories,
            Some(vec![CategoryTag::KeyPass, CategoryTag::Cross])
        );
    }

    #[test]
    fn test_offside_scenario() {
        let clock = ManualClock::new();
        let (mut session, _dir) = new_session(&clock);

        session.select_team("home").unwrap();
        session.select_passer("H7").unwrap();
        session.select_length(PassLength::Long).unwrap();
        session.select_result(PassResult::Unsuccessful).unwrap();

        let event = session
            .select_failure_type(PassFailureType::Offside)
            .unwrap()
            .expect("offside is terminal");

        assert_eq!(event.pass_failure_type, Some(PassFailureType::Offside));
        assert_eq!(event.opponent_player_id, None);
        assert_eq!(event.high_press, None);
        assert_eq!(event.ball_recovery, None);
        assert_eq!(session.events().len(), 1);
    }

    #[test]
    fn test_tackle_unknown_opponent_scenario() {
        let clock = ManualClock::new();
        let (mut session, _dir) = new_session(&clock);

        session.select_team("home").unwrap();
        session.select_passer("H7").unwrap();
        session.select_length(PassLength::Short).unwrap();
        session.select_result(PassResult::Unsuccessful).unwrap();
        assert!(session.select_failure_type(PassFailureType::Tackle).unwrap().is_none());
        session.skip_opponent().unwrap();
        session.answer_high_press(true).unwrap();

        let event = session.answer_ball_recovery(false).unwrap().expect("terminal choice");

        assert_eq!(event.opponent_player_id, Some("UNKNOWN".to_string()));
        assert_eq!(event.high_press, Some(true));
        assert_eq!(event.ball_recovery, Some(PassResult::Unsuccessful));
        assert_eq!(event.pass_failure_type, Some(PassFailureType::Tackle));
    }

    #[test]
    fn test_draft_log_survives_reload_within_session_dir() {
        let clock = ManualClock::new();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(EVENT_LOG_FILE);

        {
            let store = DraftEventStore::open(&path);
            let mut session =
                LoggerSession::new(MatchData::default_fixture(), store, Box::new(clock.clone()));
            session.select_team("away").unwrap();
            session.select_passer("A3").unwrap();
            session.select_length(PassLength::Short).unwrap();
            session.select_result(PassResult::Unsuccessful).unwrap();
            session.select_failure_type(PassFailureType::Offside).unwrap().unwrap();
        }

        let store = DraftEventStore::open(&path);
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].team_id, "away");
    }

    #[test]
    fn test_every_logged_event_has_exactly_one_branch() {
        let clock = ManualClock::new();
        let (mut session, _dir) = new_session(&clock);

        // Log one event per terminal path.
        session.select_team("home").unwrap();

        // Success, normal, no outplay.
        session.select_passer("H1").unwrap();
        session.select_length(PassLength::Short).unwrap();
        session.select_result(PassResult::Successful).unwrap();
        session.select_receiver("H2").unwrap();
        session.select_category(PassCategory::Normal).unwrap();
        session.answer_outplay(false).unwrap().unwrap();

        // Success, assist, key pass no.
        session.select_passer("H3").unwrap();
        session.select_length(PassLength::Long).unwrap();
        session.select_result(PassResult::Successful).unwrap();
        session.select_receiver("H4").unwrap();
        session.select_category(PassCategory::Assist).unwrap();
        session.answer_key_pass(false).unwrap().unwrap();

        // Failure, offside.
        session.select_passer("H5").unwrap();
        session.select_length(PassLength::Long).unwrap();
        session.select_result(PassResult::Unsuccessful).unwrap();
        session.select_failure_type(PassFailureType::Offside).unwrap().unwrap();

        // Failure, block, with full sub-flow.
        session.select_passer("H6").unwrap();
        session.select_length(PassLength::Short).unwrap();
        session.select_result(PassResult::Unsuccessful).unwrap();
        session.select_failure_type(PassFailureType::Block).unwrap();
        session.select_opponent("A5").unwrap();
        session.answer_high_press(false).unwrap();
        session.answer_ball_recovery(true).unwrap().unwrap();

        assert_eq!(session.events().len(), 4);
        for event in session.events() {
            let success_populated = event.to_player_id.is_some();
            let failure_populated = event.pass_failure_type.is_some();
            assert_ne!(
                success_populated, failure_populated,
                "exactly one branch must be populated: {:?}",
                event
            );
            assert_eq!(success_populated, event.is_successful());
        }
    }
}
