use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event type discriminator. Passing is the only event type captured by this
/// tool; keeping it an enum leaves the record format open for other kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Pass,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassLength {
    Long,
    Short,
}

/// Outcome of a pass. Also reused for `ballRecovery`, which shares the same
/// wire values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassResult {
    Successful,
    Unsuccessful,
}

/// Primary branch chosen for a successful pass. Drives the flattened
/// `isProgressive` / `isCross` / `isAssist` flags on the final record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassCategory {
    Normal,
    Progressive,
    Cross,
    Assist,
}

impl PassCategory {
    /// Categories that continue into the outplay sub-flow rather than the
    /// key-pass question.
    pub fn asks_outplay(&self) -> bool {
        matches!(self, PassCategory::Normal | PassCategory::Progressive)
    }
}

/// How an unsuccessful pass ended. Absence of the field on a record means the
/// failure was never sub-typed (the legacy "NONE").
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassFailureType {
    Offside,
    Block,
    Interception,
    BallCollection,
    UnsuccessfulCross,
    Tackle,
    Clearance,
}

impl PassFailureType {
    /// Offside terminates the flow immediately; every other failure type
    /// continues into opponent / high-press / ball-recovery questions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PassFailureType::Offside)
    }
}

/// Legacy category tags derived from the flattened flags at normalization
/// time. Downstream reporting still keys off this list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryTag {
    ProgressivePass,
    KeyPass,
    Assist,
    Cross,
}

/// Canonical annotation record, immutable once built by the normalizer.
///
/// Exactly one of the success-branch and failure-branch field groups is
/// populated, determined by `pass_result`; the other group's keys are omitted
/// from the serialized form entirely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchEvent {
    pub event_id: Uuid,
    pub event_type: EventType,
    pub team_id: String,
    pub from_player_id: String,

    /// HH:MM:SS formatted video time, derived from `video_time_sec`.
    pub time: String,
    /// Raw video timestamp in seconds, source of truth for `time`.
    pub video_time_sec: f64,

    pub pass_length: PassLength,
    pub pass_result: PassResult,

    // Success branch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_player_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_progressive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_cross: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_assist: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_key_pass: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outplay: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outplay_players: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outplay_lines: Option<u32>,

    // Failure branch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_failure_type: Option<PassFailureType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_player_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_press: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ball_recovery: Option<PassResult>,

    /// Derived tag list; omitted when no tags apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_categories: Option<Vec<CategoryTag>>,
}

impl MatchEvent {
    /// True when the success-branch field group is the populated one.
    pub fn is_successful(&self) -> bool {
        self.pass_result == PassResult::Successful
    }
}

/// Sentinel for an unidentified opponent (the operator skipped the picker).
pub const UNKNOWN_PLAYER: &str = "UNKNOWN";
