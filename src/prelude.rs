//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use proscenium::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::config::{ConfigError, EngineConfig};
pub use crate::engine::{Engine, EngineBuilder, EngineError};

// Declarations
pub use crate::core::declare::{
    DeclarationError, DeclarationKind, DeclarationSpec, DeclaredType, HookName, Instance,
};
pub use crate::core::registry::Registry;

// Scene system
pub use crate::core::scene::{
    scene_handle, ChannelDispatcher, DeclaredScene, EventDispatch, Scene, SceneEvent, SceneEventKind,
    SceneHandle,
};
pub use crate::core::stage::{NodeId, SceneGraph, Stage, WorldNode};

// Director and transitions
pub use crate::core::director::{
    Director, DirectorError, DirectorState, Easing, InterpolationTransition, PropertyRange,
    SceneSource, SceneTarget, Transition, TransitionError,
};

// Event bus
pub use crate::core::event_bus::{Event, EventBus};
