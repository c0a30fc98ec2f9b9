//! Progressive, tag-safe reveal of rendered markup into a display surface.
//!
//! [`RevealState`] is the per-character state machine, [`reveal`] drives it
//! on a timer, and [`SurfaceDriver`] keeps one writer per surface so that a
//! new reveal (or the loader) always supersedes the previous one.

pub mod driver;
pub mod loader;
pub mod state;

pub use driver::{
    reveal, RevealHandle, RevealOutcome, SharedSurface, SurfaceDriver, Timing,
    DEFAULT_LOADER_TICK, DEFAULT_REVEAL_TICK,
};
pub use loader::LoaderState;
pub use state::{Phase, RevealState, Tick};
