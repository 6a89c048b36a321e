use serde::{Deserialize, Serialize};

/// Read-only reference data for the current match. The capture flow looks
/// players and teams up here; it never mutates the roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub player_id: String,
    pub player_name: String,
    pub jersey_number: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub team_id: String,
    pub team_name: String,
    pub squad: Vec<Player>,
}

impl Team {
    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.squad.iter().find(|p| p.player_id == player_id)
    }

    pub fn player_by_jersey(&self, jersey_number: u8) -> Option<&Player> {
        self.squad.iter().find(|p| p.jersey_number == jersey_number)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct League {
    pub league_id: String,
    pub league_name: String,
    pub sub_league: String,
}

/// Match configuration: league details plus the two squads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchData {
    pub league: League,
    pub teams: Vec<Team>,
}

impl MatchData {
    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.team_id == team_id)
    }

    pub fn player(&self, team_id: &str, player_id: &str) -> Option<&Player> {
        self.team(team_id)?.player(player_id)
    }

    /// First team that is not `team_id`. `None` for a single-team config.
    pub fn opponent_of(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.team_id != team_id)
    }

    /// Squad of `team_id` with one player left out, for receiver pickers
    /// where the passer must not be selectable.
    pub fn players_excluding(&self, team_id: &str, exclude_player_id: &str) -> Vec<&Player> {
        match self.team(team_id) {
            Some(team) => {
                team.squad.iter().filter(|p| p.player_id != exclude_player_id).collect()
            }
            None => Vec::new(),
        }
    }

    /// Built-in two-squad fixture used when no configuration has been saved
    /// yet. Jersey numbers 1..=11 on both sides.
    pub fn default_fixture() -> Self {
        fn squad(prefix: &str, team_label: &str) -> Vec<Player> {
            (1..=11)
                .map(|n| Player {
                    player_id: format!("{}{}", prefix, n),
                    player_name: format!("{} Player {}", team_label, n),
                    jersey_number: n,
                })
                .collect()
        }

        Self {
            league: League {
                league_id: "L1".to_string(),
                league_name: "Premier Division".to_string(),
                sub_league: "2025/26".to_string(),
            },
            teams: vec![
                Team {
                    team_id: "home".to_string(),
                    team_name: "Home FC".to_string(),
                    squad: squad("H", "Home"),
                },
                Team {
                    team_id: "away".to_string(),
                    team_name: "Away United".to_string(),
                    squad: squad("A", "Away"),
                },
            ],
        }
    }
}

impl Default for MatchData {
    fn default() -> Self {
        Self::default_fixture()
    }
}
