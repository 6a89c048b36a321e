pub mod event;
pub mod roster;

pub use event::{
    CategoryTag, EventType, MatchEvent, PassCategory, PassFailureType, PassLength, PassResult,
    UNKNOWN_PLAYER,
};
pub use roster::{League, MatchData, Player, Team};
