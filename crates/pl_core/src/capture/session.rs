use super::patch::SubmitPatch;
use super::state::{CaptureState, CaptureStep};
use crate::error::{CoreError, Result};
use crate::factory::create_pass_event;
use crate::models::{
    MatchData, MatchEvent, PassCategory, PassFailureType, PassLength, PassResult, Player,
    UNKNOWN_PLAYER,
};
use crate::store::DraftEventStore;
use crate::time::TimeSource;

/// One annotation session: the capture state machine wired to its
/// collaborators. Owns the roster snapshot, the draft store and the time
/// source; single mutator of both the ephemeral state and the log.
pub struct LoggerSession {
    capture: CaptureState,
    store: DraftEventStore,
    roster: MatchData,
    clock: Box<dyn TimeSource>,
}

impl LoggerSession {
    pub fn new(roster: MatchData, store: DraftEventStore, clock: Box<dyn TimeSource>) -> Self {
        Self { capture: CaptureState::new(), store, roster, clock }
    }

    // ========================
    // Non-terminal choices
    // ========================

    pub fn select_team(&mut self, team_id: &str) -> Result<()> {
        if self.roster.team(team_id).is_none() {
            return Err(CoreError::NotFound(format!("team not in match: {}", team_id)));
        }
        self.capture.select_team(team_id)
    }

    pub fn select_passer(&mut self, player_id: &str) -> Result<()> {
        let team_id = self.require_team()?;
        if self.roster.player(&team_id, player_id).is_none() {
            return Err(CoreError::NotFound(format!("player not in squad: {}", player_id)));
        }
        self.capture.select_passer(player_id)
    }

    pub fn select_length(&mut self, length: PassLength) -> Result<()> {
        self.capture.select_length(length)
    }

    pub fn select_result(&mut self, result: PassResult) -> Result<()> {
        self.capture.select_result(result)
    }

    pub fn select_receiver(&mut self, player_id: &str) -> Result<()> {
        let team_id = self.require_team()?;
        if self.roster.player(&team_id, player_id).is_none() {
            return Err(CoreError::NotFound(format!("player not in squad: {}", player_id)));
        }
        self.capture.select_receiver(player_id)
    }

    pub fn select_category(&mut self, category: PassCategory) -> Result<()> {
        self.capture.select_category(category)
    }

    /// Selects the opponent involved in the failure, or records the
    /// [`UNKNOWN_PLAYER`] sentinel when the picker was skipped.
    pub fn select_opponent(&mut self, player_id: &str) -> Result<()> {
        if player_id != UNKNOWN_PLAYER {
            let team_id = self.require_team()?;
            let known = self
                .roster
                .opponent_of(&team_id)
                .map(|team| team.player(player_id).is_some())
                .unwrap_or(false);
            if !known {
                return Err(CoreError::NotFound(format!(
                    "player not in opposing squad: {}",
                    player_id
                )));
            }
        }
        self.capture.select_opponent(player_id)
    }

    pub fn skip_opponent(&mut self) -> Result<()> {
        self.capture.select_opponent(UNKNOWN_PLAYER)
    }

    pub fn answer_high_press(&mut self, high_press: bool) -> Result<()> {
        self.capture.answer_high_press(high_press)
    }

    pub fn set_outplay_counts(&mut self, players: u32, lines: u32) -> Result<()> {
        self.capture.set_outplay_counts(players, lines)
    }

    // ========================
    // Terminal choices
    // ========================

    /// "Did the pass outplay opponents?" — "no" submits immediately, "yes"
    /// continues into the details step.
    pub fn answer_outplay(&mut self, outplayed: bool) -> Result<Option<MatchEvent>> {
        if outplayed {
            self.capture.mark_outplaying()?;
            Ok(None)
        } else {
            self.expect_step(CaptureStep::OutplayQuery)?;
            self.submit(SubmitPatch::NoOutplay)
        }
    }

    /// Submits the outplay details currently stored on the capture state.
    pub fn confirm_outplay(&mut self) -> Result<Option<MatchEvent>> {
        self.expect_step(CaptureStep::OutplayDetails)?;
        let (players, lines) = self.capture.outplay_counts();
        self.submit(SubmitPatch::OutplayConfirmed { players, lines })
    }

    /// Terminal for cross/assist categories; both answers submit.
    pub fn answer_key_pass(&mut self, key_pass: bool) -> Result<Option<MatchEvent>> {
        self.expect_step(CaptureStep::KeyPassQuery)?;
        self.submit(SubmitPatch::KeyPass { key_pass })
    }

    /// Offside submits immediately; any other type continues the flow.
    pub fn select_failure_type(&mut self, failure_type: PassFailureType) -> Result<Option<MatchEvent>> {
        if failure_type.is_terminal() {
            self.expect_step(CaptureStep::FailureTypeSelect)?;
            self.submit(SubmitPatch::Offside)
        } else {
            self.capture.select_failure_type(failure_type)?;
            Ok(None)
        }
    }

    /// Terminal for non-offside failures; both answers submit.
    pub fn answer_ball_recovery(&mut self, recovered: bool) -> Result<Option<MatchEvent>> {
        self.expect_step(CaptureStep::BallRecoveryQuery)?;
        self.submit(SubmitPatch::BallRecovery { recovered })
    }

    /// Normalizes and appends one event from the accumulated state plus the
    /// terminal patch, then partially resets the flow.
    ///
    /// Without the required base fields (team, passer, length, result) this
    /// is a logged no-op: nothing is appended, nothing changes.
    pub fn submit(&mut self, patch: SubmitPatch) -> Result<Option<MatchEvent>> {
        let (team_id, from_player_id) = match self.capture.base_ids() {
            Some(ids) => ids,
            None => {
                log::warn!("submission ignored: required base fields are not all set");
                return Ok(None);
            }
        };

        let args = self.capture.build_args(patch)?;
        let video_time_sec = self.clock.current_time_sec().max(0.0);
        let event = create_pass_event(&team_id, &from_player_id, video_time_sec, args);

        self.store.append(event.clone())?;
        log::debug!(
            "logged {:?} {:?} pass by {} at {}",
            event.pass_length,
            event.pass_result,
            event.from_player_id,
            event.time
        );

        self.capture.reset_flow();
        Ok(Some(event))
    }

    // ========================
    // Reset / inspection
    // ========================

    /// Clears the in-progress event but keeps the selected team.
    pub fn reset_flow(&mut self) {
        self.capture.reset_flow();
    }

    /// Clears the in-progress event including the team.
    pub fn reset_full(&mut self) {
        self.capture.reset_full();
    }

    pub fn step(&self) -> CaptureStep {
        self.capture.step()
    }

    pub fn capture(&self) -> &CaptureState {
        &self.capture
    }

    pub fn roster(&self) -> &MatchData {
        &self.roster
    }

    pub fn events(&self) -> &[MatchEvent] {
        self.store.list()
    }

    /// Receiver choices for the current passer (passer excluded).
    pub fn receiver_choices(&self) -> Vec<&Player> {
        match (self.capture.team_id(), self.capture.from_player_id()) {
            (Some(team_id), Some(passer_id)) => self.roster.players_excluding(team_id, passer_id),
            _ => Vec::new(),
        }
    }

    /// Opposing squad for the opponent picker; empty for single-team configs.
    pub fn opponent_choices(&self) -> Vec<&Player> {
        self.capture
            .team_id()
            .and_then(|team_id| self.roster.opponent_of(team_id))
            .map(|team| team.squad.iter().collect())
            .unwrap_or_default()
    }

    /// Irreversibly empties the draft log. The caller is responsible for
    /// obtaining operator confirmation first.
    pub fn clear_events(&mut self) -> Result<()> {
        self.store.clear()
    }

    /// Indented export payload for the external download collaborator.
    pub fn export_json(&self) -> Result<String> {
        crate::api::export_match_log_json(&self.roster, self.store.list())
    }

    fn require_team(&self) -> Result<String> {
        self.capture
            .team_id()
            .map(str::to_string)
            .ok_or_else(|| CoreError::InvalidParameter("no team selected".to_string()))
    }

    fn expect_step(&self, expected: CaptureStep) -> Result<()> {
        let step = self.capture.step();
        if step == expected {
            Ok(())
        } else {
            Err(CoreError::InvalidParameter(format!(
                "input for {:?} rejected at step {:?}",
                expected, step
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualClock;
    use tempfile::TempDir;

    fn session_with_clock() -> (LoggerSession, ManualClock, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = DraftEventStore::open(dir.path().join("events.json"));
        let clock = ManualClock::new();
        let session = LoggerSession::new(
            MatchData::default_fixture(),
            store,
            Box::new(clock.clone()),
        );
        (session, clock, dir)
    }

    #[test]
    fn test_submission_guard_appends_nothing() {
        let (mut session, _clock, _dir) = session_with_clock();

        assert!(session.submit(SubmitPatch::Offside).unwrap().is_none());
        assert!(session.events().is_empty());

        // Partially filled state is still guarded.
        session.select_team("home").unwrap();
        session.select_passer("H7").unwrap();
        assert!(session.submit(SubmitPatch::Offside).unwrap().is_none());
        assert!(session.events().is_empty());
        assert_eq!(session.capture().from_player_id(), Some("H7"));
    }

    #[test]
    fn test_successful_flow_submits_and_keeps_team() {
        let (mut session, clock, _dir) = session_with_clock();
        clock.set(125.0);

        session.select_team("home").unwrap();
        session.select_passer("H7").unwrap();
        session.select_length(PassLength::Short).unwrap();
        session.select_result(PassResult::Successful).unwrap();
        session.select_receiver("H9").unwrap();
        session.select_category(PassCategory::Normal).unwrap();

        let event = session.answer_outplay(false).unwrap().expect("terminal choice");
        assert_eq!(event.outplay, Some(false));
        assert_eq!(event.time, "00:02:05");
        assert_eq!(session.events().len(), 1);

        // Partial reset: team retained, flow back at passer selection.
        assert_eq!(session.step(), CaptureStep::PasserSelect);
        assert_eq!(session.capture().team_id(), Some("home"));
    }

    #[test]
    fn test_receiver_choices_exclude_passer() {
        let (mut session, _clock, _dir) = session_with_clock();
        session.select_team("home").unwrap();
        session.select_passer("H7").unwrap();

        let choices = session.receiver_choices();
        assert_eq!(choices.len(), 10);
        assert!(choices.iter().all(|p| p.player_id != "H7"));
    }

    #[test]
    fn test_opponent_must_be_on_opposing_squad() {
        let (mut session, _clock, _dir) = session_with_clock();
        session.select_team("home").unwrap();
        session.select_passer("H7").unwrap();
        session.select_length(PassLength::Long).unwrap();
        session.select_result(PassResult::Unsuccessful).unwrap();
        session.select_failure_type(PassFailureType::Interception).unwrap();

        // Own-team player is not a valid opponent.
        assert!(session.select_opponent("H3").is_err());
        session.select_opponent("A4").unwrap();
    }

    #[test]
    fn test_unknown_roster_ids_rejected() {
        let (mut session, _clock, _dir) = session_with_clock();

        assert!(session.select_team("nonexistent").is_err());
        session.select_team("home").unwrap();
        assert!(session.select_passer("Z99").is_err());
    }

    #[test]
    fn test_clear_requires_caller_confirmation_only() {
        let (mut session, _clock, _dir) = session_with_clock();
        session.select_team("home").unwrap();
        session.select_passer("H7").unwrap();
        session.select_length(PassLength::Short).unwrap();
        session.select_result(PassResult::Unsuccessful).unwrap();
        session.select_failure_type(PassFailureType::Offside).unwrap().unwrap();

        assert_eq!(session.events().len(), 1);
        session.clear_events().unwrap();
        assert!(session.events().is_empty());
    }
}
