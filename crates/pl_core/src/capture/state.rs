use super::patch::SubmitPatch;
use crate::error::{CoreError, Result};
use crate::factory::{FailureDetails, PassEventArgs, PassOutcome, SuccessDetails};
use crate::models::{PassCategory, PassFailureType, PassLength, PassResult};

/// Position in the decision tree. Derived from the field values on demand;
/// there is no separate cursor that could drift out of sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStep {
    TeamSelect,
    PasserSelect,
    LengthSelect,
    ResultSelect,
    // Success flow
    ReceiverSelect,
    CategorySelect,
    OutplayQuery,
    OutplayDetails,
    KeyPassQuery,
    // Failure flow
    FailureTypeSelect,
    OpponentSelect,
    HighPressQuery,
    BallRecoveryQuery,
}

/// Ephemeral per-event capture state. Every field starts unset and is filled
/// by one operator choice; the whole struct is discarded on completion or
/// reset, never persisted.
#[derive(Debug, Clone, Default)]
pub struct CaptureState {
    team_id: Option<String>,
    from_player_id: Option<String>,
    pass_length: Option<PassLength>,
    pass_result: Option<PassResult>,

    // Success flow
    to_player_id: Option<String>,
    pass_category: Option<PassCategory>,
    outplaying: Option<bool>,
    outplay_players: u32,
    outplay_lines: u32,

    // Failure flow
    failure_type: Option<PassFailureType>,
    opponent_player_id: Option<String>,
    high_press: Option<bool>,
}

impl CaptureState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current step, derived from which fields have been chosen so far.
    pub fn step(&self) -> CaptureStep {
        if self.team_id.is_none() {
            return CaptureStep::TeamSelect;
        }
        if self.from_player_id.is_none() {
            return CaptureStep::PasserSelect;
        }
        if self.pass_length.is_none() {
            return CaptureStep::LengthSelect;
        }
        let result = match self.pass_result {
            Some(result) => result,
            None => return CaptureStep::ResultSelect,
        };

        match result {
            PassResult::Successful => {
                if self.to_player_id.is_none() {
                    return CaptureStep::ReceiverSelect;
                }
                match self.pass_category {
                    None => CaptureStep::CategorySelect,
                    Some(category) if category.asks_outplay() => {
                        if self.outplaying == Some(true) {
                            CaptureStep::OutplayDetails
                        } else {
                            CaptureStep::OutplayQuery
                        }
                    }
                    Some(_) => CaptureStep::KeyPassQuery,
                }
            }
            PassResult::Unsuccessful => {
                if self.failure_type.is_none() {
                    return CaptureStep::FailureTypeSelect;
                }
                if self.opponent_player_id.is_none() {
                    return CaptureStep::OpponentSelect;
                }
                if self.high_press.is_none() {
                    return CaptureStep::HighPressQuery;
                }
                CaptureStep::BallRecoveryQuery
            }
        }
    }

    fn expect_step(&self, expected: CaptureStep) -> Result<()> {
        let step = self.step();
        if step == expected {
            Ok(())
        } else {
            Err(CoreError::InvalidParameter(format!(
                "input for {:?} rejected at step {:?}",
                expected, step
            )))
        }
    }

    // ========================
    // Choice setters
    // ========================

    pub fn select_team(&mut self, team_id: &str) -> Result<()> {
        self.expect_step(CaptureStep::TeamSelect)?;
        if team_id.is_empty() {
            return Err(CoreError::InvalidParameter("empty team id".to_string()));
        }
        self.team_id = Some(team_id.to_string());
        Ok(())
    }

    pub fn select_passer(&mut self, player_id: &str) -> Result<()> {
        self.expect_step(CaptureStep::PasserSelect)?;
        if player_id.is_empty() {
            return Err(CoreError::InvalidParameter("empty passer id".to_string()));
        }
        self.from_player_id = Some(player_id.to_string());
        Ok(())
    }

    pub fn select_length(&mut self, length: PassLength) -> Result<()> {
        self.expect_step(CaptureStep::LengthSelect)?;
        self.pass_length = Some(length);
        Ok(())
    }

    pub fn select_result(&mut self, result: PassResult) -> Result<()> {
        self.expect_step(CaptureStep::ResultSelect)?;
        self.pass_result = Some(result);
        Ok(())
    }

    /// The receiver must differ from the passer. The picker already excludes
    /// the passer; this guards direct calls.
    pub fn select_receiver(&mut self, player_id: &str) -> Result<()> {
        self.expect_step(CaptureStep::ReceiverSelect)?;
        if self.from_player_id.as_deref() == Some(player_id) {
            return Err(CoreError::InvalidParameter(
                "receiver must differ from passer".to_string(),
            ));
        }
        if player_id.is_empty() {
            return Err(CoreError::InvalidParameter("empty receiver id".to_string()));
        }
        self.to_player_id = Some(player_id.to_string());
        Ok(())
    }

    pub fn select_category(&mut self, category: PassCategory) -> Result<()> {
        self.expect_step(CaptureStep::CategorySelect)?;
        self.pass_category = Some(category);
        Ok(())
    }

    /// Outplay question answered "yes"; continue into the details step.
    /// ("No" is terminal and goes through submission instead.)
    pub fn mark_outplaying(&mut self) -> Result<()> {
        self.expect_step(CaptureStep::OutplayQuery)?;
        self.outplaying = Some(true);
        Ok(())
    }

    pub fn set_outplay_counts(&mut self, players: u32, lines: u32) -> Result<()> {
        self.expect_step(CaptureStep::OutplayDetails)?;
        self.outplay_players = players;
        self.outplay_lines = lines;
        Ok(())
    }

    /// Non-terminal failure types only; offside never reaches the state, it
    /// is submitted directly at selection.
    pub fn select_failure_type(&mut self, failure_type: PassFailureType) -> Result<()> {
        self.expect_step(CaptureStep::FailureTypeSelect)?;
        if failure_type.is_terminal() {
            return Err(CoreError::InvalidParameter(
                "offside terminates the flow; submit it instead of storing it".to_string(),
            ));
        }
        self.failure_type = Some(failure_type);
        Ok(())
    }

    pub fn select_opponent(&mut self, player_id: &str) -> Result<()> {
        self.expect_step(CaptureStep::OpponentSelect)?;
        if player_id.is_empty() {
            return Err(CoreError::InvalidParameter("empty opponent id".to_string()));
        }
        self.opponent_player_id = Some(player_id.to_string());
        Ok(())
    }

    pub fn answer_high_press(&mut self, high_press: bool) -> Result<()> {
        self.expect_step(CaptureStep::HighPressQuery)?;
        self.high_press = Some(high_press);
        Ok(())
    }

    // ========================
    // Reset
    // ========================

    /// Clears every per-event field but keeps the team: the operator
    /// typically logs several consecutive events for the same side.
    pub fn reset_flow(&mut self) {
        let team_id = self.team_id.take();
        *self = Self::default();
        self.team_id = team_id;
    }

    /// Clears everything including the team.
    pub fn reset_full(&mut self) {
        *self = Self::default();
    }

    // ========================
    // Submission support
    // ========================

    /// Minimum-viable-event invariant: nothing may be submitted before team,
    /// passer, length and result are all chosen.
    pub fn has_required_base(&self) -> bool {
        self.team_id.is_some()
            && self.from_player_id.is_some()
            && self.pass_length.is_some()
            && self.pass_result.is_some()
    }

    pub(crate) fn base_ids(&self) -> Option<(String, String)> {
        if !self.has_required_base() {
            return None;
        }
        Some((self.team_id.clone()?, self.from_player_id.clone()?))
    }

    /// Assembles the normalizer input from the accumulated state plus the
    /// terminal patch. Rejects patches that contradict the chosen result.
    pub(crate) fn build_args(&self, patch: SubmitPatch) -> Result<PassEventArgs> {
        let pass_length = self
            .pass_length
            .ok_or_else(|| CoreError::InvalidParameter("pass length not chosen".to_string()))?;
        let pass_result = self
            .pass_result
            .ok_or_else(|| CoreError::InvalidParameter("pass result not chosen".to_string()))?;

        let outcome = match patch {
            SubmitPatch::NoOutplay
            | SubmitPatch::OutplayConfirmed { .. }
            | SubmitPatch::KeyPass { .. } => {
                if pass_result != PassResult::Successful {
                    return Err(CoreError::InvalidParameter(
                        "success patch on an unsuccessful pass".to_string(),
                    ));
                }
                let to_player_id = self
                    .to_player_id
                    .clone()
                    .ok_or_else(|| CoreError::InvalidParameter("receiver not chosen".to_string()))?;
                let category = self.pass_category.unwrap_or(PassCategory::Normal);

                let details = match patch {
                    SubmitPatch::NoOutplay => SuccessDetails {
                        to_player_id,
                        category,
                        key_pass: false,
                        outplay: false,
                        outplay_players: 0,
                        outplay_lines: 0,
                    },
                    SubmitPatch::OutplayConfirmed { players, lines } => SuccessDetails {
                        to_player_id,
                        category,
                        key_pass: false,
                        outplay: true,
                        outplay_players: players,
                        outplay_lines: lines,
                    },
                    SubmitPatch::KeyPass { key_pass } => SuccessDetails {
                        to_player_id,
                        category,
                        key_pass,
                        outplay: false,
                        outplay_players: 0,
                        outplay_lines: 0,
                    },
                    _ => unreachable!(),
                };
                PassOutcome::Successful(details)
            }
            SubmitPatch::Offside => {
                if pass_result != PassResult::Unsuccessful {
                    return Err(CoreError::InvalidParameter(
                        "failure patch on a successful pass".to_string(),
                    ));
                }
                PassOutcome::Unsuccessful(FailureDetails {
                    failure_type: PassFailureType::Offside,
                    opponent_player_id: None,
                    high_press: None,
                    ball_recovery: None,
                })
            }
            SubmitPatch::BallRecovery { recovered } => {
                if pass_result != PassResult::Unsuccessful {
                    return Err(CoreError::InvalidParameter(
                        "failure patch on a successful pass".to_string(),
                    ));
                }
                let failure_type = self.failure_type.ok_or_else(|| {
                    CoreError::InvalidParameter("failure type not chosen".to_string())
                })?;
                PassOutcome::Unsuccessful(FailureDetails {
                    failure_type,
                    opponent_player_id: self.opponent_player_id.clone(),
                    high_press: Some(self.high_press.unwrap_or(false)),
                    ball_recovery: Some(if recovered {
                        PassResult::Successful
                    } else {
                        PassResult::Unsuccessful
                    }),
                })
            }
        };

        Ok(PassEventArgs { pass_length, outcome })
    }

    // ========================
    // Accessors (context display)
    // ========================

    pub fn team_id(&self) -> Option<&str> {
        self.team_id.as_deref()
    }

    pub fn from_player_id(&self) -> Option<&str> {
        self.from_player_id.as_deref()
    }

    pub fn to_player_id(&self) -> Option<&str> {
        self.to_player_id.as_deref()
    }

    pub fn pass_length(&self) -> Option<PassLength> {
        self.pass_length
    }

    pub fn pass_result(&self) -> Option<PassResult> {
        self.pass_result
    }

    pub fn pass_category(&self) -> Option<PassCategory> {
        self.pass_category
    }

    pub fn failure_type(&self) -> Option<PassFailureType> {
        self.failure_type
    }

    pub fn outplay_counts(&self) -> (u32, u32) {
        (self.outplay_players, self.outplay_lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advance_to_result(state: &mut CaptureState, result: PassResult) {
        state.select_team("home").unwrap();
        state.select_passer("H7").unwrap();
        state.select_length(PassLength::Short).unwrap();
        state.select_result(result).unwrap();
    }

    #[test]
    fn test_steps_follow_the_canonical_order() {
        let mut state = CaptureState::new();
        assert_eq!(state.step(), CaptureStep::TeamSelect);

        state.select_team("home").unwrap();
        assert_eq!(state.step(), CaptureStep::PasserSelect);

        state.select_passer("H7").unwrap();
        assert_eq!(state.step(), CaptureStep::LengthSelect);

        state.select_length(PassLength::Long).unwrap();
        assert_eq!(state.step(), CaptureStep::ResultSelect);

        state.select_result(PassResult::Successful).unwrap();
        assert_eq!(state.step(), CaptureStep::ReceiverSelect);

        state.select_receiver("H9").unwrap();
        assert_eq!(state.step(), CaptureStep::CategorySelect);
    }

    #[test]
    fn test_out_of_order_input_is_rejected() {
        let mut state = CaptureState::new();

        assert!(state.select_receiver("H9").is_err());
        assert!(state.select_length(PassLength::Long).is_err());
        assert!(state.answer_high_press(true).is_err());

        // Nothing was stored.
        assert_eq!(state.step(), CaptureStep::TeamSelect);
    }

    #[test]
    fn test_receiver_must_differ_from_passer() {
        let mut state = CaptureState::new();
        advance_to_result(&mut state, PassResult::Successful);

        assert!(state.select_receiver("H7").is_err());
        assert_eq!(state.step(), CaptureStep::ReceiverSelect);

        state.select_receiver("H9").unwrap();
    }

    #[test]
    fn test_category_routes_to_outplay_or_key_pass() {
        let mut state = CaptureState::new();
        advance_to_result(&mut state, PassResult::Successful);
        state.select_receiver("H9").unwrap();
        state.select_category(PassCategory::Progressive).unwrap();
        assert_eq!(state.step(), CaptureStep::OutplayQuery);

        state.mark_outplaying().unwrap();
        assert_eq!(state.step(), CaptureStep::OutplayDetails);

        let mut state = CaptureState::new();
        advance_to_result(&mut state, PassResult::Successful);
        state.select_receiver("H9").unwrap();
        state.select_category(PassCategory::Cross).unwrap();
        assert_eq!(state.step(), CaptureStep::KeyPassQuery);
    }

    #[test]
    fn test_failure_flow_steps() {
        let mut state = CaptureState::new();
        advance_to_result(&mut state, PassResult::Unsuccessful);
        assert_eq!(state.step(), CaptureStep::FailureTypeSelect);

        state.select_failure_type(PassFailureType::Tackle).unwrap();
        assert_eq!(state.step(), CaptureStep::OpponentSelect);

        state.select_opponent("UNKNOWN").unwrap();
        assert_eq!(state.step(), CaptureStep::HighPressQuery);

        state.answer_high_press(true).unwrap();
        assert_eq!(state.step(), CaptureStep::BallRecoveryQuery);
    }

    #[test]
    fn test_offside_is_not_storable() {
        let mut state = CaptureState::new();
        advance_to_result(&mut state, PassResult::Unsuccessful);

        assert!(state.select_failure_type(PassFailureType::Offside).is_err());
        assert_eq!(state.step(), CaptureStep::FailureTypeSelect);
    }

    #[test]
    fn test_partial_reset_keeps_team() {
        let mut state = CaptureState::new();
        advance_to_result(&mut state, PassResult::Successful);
        state.select_receiver("H9").unwrap();

        state.reset_flow();

        assert_eq!(state.team_id(), Some("home"));
        assert_eq!(state.from_player_id(), None);
        assert_eq!(state.pass_length(), None);
        assert_eq!(state.pass_result(), None);
        assert_eq!(state.to_player_id(), None);
        assert_eq!(state.step(), CaptureStep::PasserSelect);
    }

    #[test]
    fn test_full_reset_clears_team() {
        let mut state = CaptureState::new();
        advance_to_result(&mut state, PassResult::Unsuccessful);

        state.reset_full();

        assert_eq!(state.team_id(), None);
        assert_eq!(state.step(), CaptureStep::TeamSelect);
    }

    #[test]
    fn test_build_args_rejects_mismatched_patch() {
        let mut state = CaptureState::new();
        advance_to_result(&mut state, PassResult::Unsuccessful);

        assert!(state.build_args(SubmitPatch::NoOutplay).is_err());

        let mut state = CaptureState::new();
        advance_to_result(&mut state, PassResult::Successful);
        state.select_receiver("H9").unwrap();

        assert!(state.build_args(SubmitPatch::Offside).is_err());
    }

    #[test]
    fn test_build_args_offside_leaves_sub_attributes_unset() {
        let mut state = CaptureState::new();
        advance_to_result(&mut state, PassResult::Unsuccessful);

        let args = state.build_args(SubmitPatch::Offside).unwrap();
        match args.outcome {
            PassOutcome::Unsuccessful(details) => {
                assert_eq!(details.failure_type, PassFailureType::Offside);
                assert_eq!(details.opponent_player_id, None);
                assert_eq!(details.high_press, None);
                assert_eq!(details.ball_recovery, None);
            }
            PassOutcome::Successful(_) => panic!("expected failure outcome"),
        }
    }
}
