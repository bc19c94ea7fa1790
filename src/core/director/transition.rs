//=========================================================================
// Transition Contract
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::scene::SceneHandle;

//=== TransitionError =====================================================

/// Reasons a transition is refused before it ever runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransitionError {
    #[error("transition duration must be a positive number of milliseconds, got {0}")]
    InvalidDuration(f64),

    #[error("property window delay {delay} / duration {duration} must lie within [0, 1]")]
    InvalidWindow { delay: f64, duration: f64 },

    #[error("property path must not be empty")]
    EmptyPath,

    #[error("property '{path}' has a non-finite range")]
    InvalidRange { path: String },

    #[error("{0}")]
    Custom(String),
}

//=== Transition Trait ====================================================

/// Strategy animating the handoff between the current and next scene.
///
/// The director owns a transition exclusively for one scene change:
/// `validate` → `setup` → `start` → `update`* → (`stop`) → dropped.
pub trait Transition {
    /// Checks the configuration. Invalid transitions are never started.
    fn validate(&self) -> Result<(), TransitionError> {
        Ok(())
    }

    /// Whether the next scene should render beneath the current one.
    fn swap_scenes(&self) -> bool {
        false
    }

    fn setup(&mut self, current: SceneHandle, next: SceneHandle);

    fn start(&mut self);

    /// Advances the transition by `delta` milliseconds.
    fn update(&mut self, delta: f64);

    /// Jumps straight to the final state.
    fn stop(&mut self);

    fn has_finished(&self) -> bool;
}
