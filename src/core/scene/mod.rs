//=========================================================================
// Scene System
//=========================================================================
//
// The scene capability interface the director drives, lifecycle events,
// and the runtime for scenes declared through the registry.
//
// Architecture:
//   Director
//     ├─ current / next: SceneHandle = Rc<RefCell<dyn Scene>>
//     └─ dispatcher: impl EventDispatch  ← SceneEvent
//
// Lifecycle:
//   enter → start → update* → (pause ⇄ resume) → stop → leave → destroy
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use crate::core::event_bus::Event;
use crate::core::stage::WorldNode;

//=== Module Declarations =================================================

mod declared_scene;
mod events;

//=== Public API ==========================================================

pub use declared_scene::DeclaredScene;
pub use events::{ChannelDispatcher, EventDispatch, NullDispatcher, SceneEvent, SceneEventKind};

/// Shared handle to a scene.
///
/// The engine is single-threaded and cooperative; callers that supply
/// their own scenes keep a clone of the handle and retain ownership.
pub type SceneHandle = Rc<RefCell<dyn Scene>>;

/// Wraps a scene into a [`SceneHandle`].
pub fn scene_handle<S: Scene + 'static>(scene: S) -> SceneHandle {
    Rc::new(RefCell::new(scene))
}

//=== Scene Trait =========================================================

/// Defines scene behavior with lifecycle hooks and update logic.
///
/// Only `world`, `world_mut` and `update` are required. Lifecycle hooks
/// have default empty implementations.
///
/// ```rust
/// # use proscenium::prelude::*;
/// struct Title {
///     world: WorldNode,
/// }
///
/// impl Scene for Title {
///     fn world(&self) -> &WorldNode { &self.world }
///     fn world_mut(&mut self) -> &mut WorldNode { &mut self.world }
///     fn update(&mut self, _delta: f64) {}
/// }
/// ```
pub trait Scene {
    /// Label used in logs and in lifecycle events when no id is known.
    fn name(&self) -> &str {
        "scene"
    }

    /// Root node attached to the stage while the scene is shown.
    fn world(&self) -> &WorldNode;

    fn world_mut(&mut self) -> &mut WorldNode;

    /// Called after the world node is attached to the stage.
    fn enter(&mut self) {}

    /// Called when the scene becomes the current scene.
    fn start(&mut self) {}

    fn pause(&mut self) {}

    fn resume(&mut self) {}

    /// Called every tick while the scene is current and not paused.
    ///
    /// `delta` is the elapsed time in milliseconds.
    fn update(&mut self, delta: f64);

    /// Called when another scene starts replacing this one.
    fn stop(&mut self) {}

    /// Called after the world node is detached from the stage.
    fn leave(&mut self) {}

    /// Receives game events while the scene is current.
    fn handle_event(&mut self, _event: &Event) {}

    /// Releases the scene. Only invoked for scenes the director created.
    fn destroy(&mut self) {}

    /// Access to the declared-scene runtime, for scenes backed by one.
    fn as_declared_mut(&mut self) -> Option<&mut DeclaredScene> {
        None
    }
}
