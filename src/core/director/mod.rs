//=========================================================================
// Director
//=========================================================================
//
// Scene orchestration and the transitions animating scene changes.
//
// Architecture:
//   Director<Stage, EventDispatch>
//     ├─ scenes:      id → SceneSource
//     ├─ transitions: (from, to) → TransitionFactory
//     └─ current / next / active Box<dyn Transition>
//
//   InterpolationTransition ── PropertyRange × 2 ── Easing
//
//=========================================================================

//=== Module Declarations =================================================

#[allow(clippy::module_inception)]
mod director;
mod easing;
mod interpolation;
mod transition;

//=== Public API ==========================================================

pub use director::{
    Director, DirectorError, DirectorState, SceneFactory, SceneSource, SceneTarget, TransitionFactory,
};
pub use easing::Easing;
pub use interpolation::{InterpolationTransition, PropertyRange};
pub use transition::{Transition, TransitionError};
