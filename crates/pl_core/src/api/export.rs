//! Export payload for the external download collaborator.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{MatchData, MatchEvent};

/// Final payload handed to the download/packaging layer: the configuration
/// snapshot plus the full draft log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchLogExport {
    pub match_info: MatchData,
    pub events: Vec<MatchEvent>,
}

pub fn build_export_payload(match_info: &MatchData, events: &[MatchEvent]) -> MatchLogExport {
    MatchLogExport { match_info: match_info.clone(), events: events.to_vec() }
}

/// Serializes the payload as indented JSON.
pub fn export_match_log_json(match_info: &MatchData, events: &[MatchEvent]) -> Result<String> {
    let payload = build_export_payload(match_info, events);
    Ok(serde_json::to_string_pretty(&payload)?)
}

/// Conventional export file name, stamped with a millisecond epoch.
pub fn export_file_name(epoch_ms: i64) -> String {
    format!("MATCH_PASSING_LOG_{}.json", epoch_ms)
}
