//! Capture decision tree.
//!
//! One pass event is built through a fixed sequence of operator choices. The
//! ephemeral state lives in [`CaptureState`], the terminal choices are the
//! [`SubmitPatch`] variants, and [`LoggerSession`] wires the tree to the
//! normalizer, the draft store and the time source.

pub mod patch;
pub mod session;
pub mod state;

pub use patch::SubmitPatch;
pub use session::LoggerSession;
pub use state::{CaptureState, CaptureStep};
