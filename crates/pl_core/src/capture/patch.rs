/// Final choice of a terminal transition, passed to submission explicitly so
/// the state machine never has to write-then-read its own state.
///
/// One variant per terminal state of the decision tree; every submittable
/// field combination is statically enumerable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPatch {
    /// Outplay question answered "no"; submit with `outplay = false`.
    NoOutplay,
    /// Outplay details confirmed with counts of players and lines beaten.
    OutplayConfirmed { players: u32, lines: u32 },
    /// Key-pass question answered (cross/assist categories).
    KeyPass { key_pass: bool },
    /// Offside failure; terminal directly at failure-type selection.
    Offside,
    /// Ball-recovery question answered; terminal for non-offside failures.
    BallRecovery { recovered: bool },
}
