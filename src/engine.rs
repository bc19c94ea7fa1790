//=========================================================================
// Proscenium Engine
//
// Facade tying the declaration registry, the director and the game event
// bus together behind a frame tick.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──tick(delta)──>  [Frame]
//         │                          │
//         ├─ with_tps()              ├─ Registry      (declare_*)
//         ├─ with_max_frame_delta()  ├─ Director      (play, update)
//         └─ with_config()           └─ EventBus      (emit → current scene)
// ```
//
// Frame:
//   clamp delta → drain EventBus into current scene → Director::update
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use crossbeam_channel::Receiver;
use log::{info, trace};
use serde_json::Value;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::config::EngineConfig;
use crate::core::declare::{DeclarationError, DeclarationSpec, DeclaredType};
use crate::core::director::{Director, DirectorError, SceneSource, SceneTarget, Transition};
use crate::core::event_bus::EventBus;
use crate::core::registry::Registry;
use crate::core::scene::{ChannelDispatcher, SceneEvent};
use crate::core::stage::SceneGraph;
use crate::logging;

//=== EngineError =========================================================

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error(transparent)]
    Director(#[from] DirectorError),

    #[error("no entity declared as '{0}'")]
    UnknownEntity(String),

    #[error("no scene is showing")]
    NoCurrentScene,

    #[error("the current scene is not a declared scene")]
    NotDeclaredScene,
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (ticks per second for [`Engine::run_frames`])
/// - **Max frame delta**: 250 ms
/// - **Event channel capacity**: 128 events per subscriber
///
/// # Examples
///
/// ```
/// use proscenium::EngineBuilder;
///
/// let engine = EngineBuilder::new()
///     .with_tps(120.0)
///     .with_event_channel_capacity(256)
///     .build();
/// assert_eq!(engine.frame_delta(), 1000.0 / 120.0);
/// ```
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Replaces every setting with `config`.
    ///
    /// # Panics
    ///
    /// Panics if `config` holds a non-positive value.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        if let Err(e) = config.validate() {
            panic!("Invalid engine config: {}", e);
        }
        self.config = config;
        self
    }

    /// Sets the tick rate used by [`Engine::run_frames`].
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.config.tps = tps;
        self
    }

    /// Caps the delta a single [`Engine::tick`] forwards, in milliseconds.
    ///
    /// Default: 250.0
    ///
    /// # Panics
    ///
    /// Panics if `max_ms <= 0.0`.
    pub fn with_max_frame_delta(mut self, max_ms: f64) -> Self {
        assert!(max_ms > 0.0, "Max frame delta must be positive, got {}", max_ms);
        self.config.max_frame_delta_ms = max_ms;
        self
    }

    /// Sets the buffer size of each scene event subscription.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_event_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Event channel capacity must be positive");
        self.config.event_channel_capacity = capacity;
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.log_filter = Some(filter.into());
        self
    }

    /// Builds the engine instance.
    pub fn build(self) -> Engine {
        info!(
            "Building engine (TPS: {}, max delta: {} ms, event channel: {})",
            self.config.tps, self.config.max_frame_delta_ms, self.config.event_channel_capacity
        );

        Engine {
            registry: Registry::new(),
            director: Director::new(
                SceneGraph::new(),
                ChannelDispatcher::new(self.config.event_channel_capacity),
            ),
            events: EventBus::new(),
            config: self.config,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Proscenium runtime.
///
/// Owns one [`Registry`], one [`Director`] and one [`EventBus`]. Nothing is
/// global: two engines never share declarations or scenes.
///
/// # Examples
///
/// ```
/// use proscenium::prelude::*;
/// use serde_json::json;
///
/// let mut engine = EngineBuilder::new().build();
/// engine
///     .declare_scene(
///         DeclarationSpec::new("title")
///             .attr("elapsed", json!(0.0))
///             .on_update(|this, delta| {
///                 let elapsed = this.get_f64("elapsed").unwrap_or(0.0);
///                 this.set("elapsed", json!(elapsed + delta));
///             }),
///     )
///     .unwrap();
///
/// engine.play("title").unwrap();
/// engine.tick(16.0);
/// assert_eq!(engine.director().current_id(), Some("title"));
/// ```
pub struct Engine {
    registry: Registry,
    director: Director<SceneGraph, ChannelDispatcher>,
    events: EventBus,
    config: EngineConfig,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Runs `init_fn` against the engine before the first frame.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut Engine),
    {
        info!("Initializing engine");
        init_fn(&mut self);
        self
    }

    /// Installs `env_logger` using the configured filter.
    pub fn init_logging(&self) {
        match &self.config.log_filter {
            Some(filter) => logging::init_with_filter(filter),
            None => logging::init(),
        }
    }

    //--- Declarations -----------------------------------------------------

    pub fn register_display(&mut self, display: impl Into<String>) {
        self.registry.register_display(display);
    }

    pub fn declare_component(&mut self, spec: DeclarationSpec) -> Result<Rc<DeclaredType>, DeclarationError> {
        self.registry.component(spec)
    }

    pub fn declare_entity(&mut self, spec: DeclarationSpec) -> Result<Rc<DeclaredType>, DeclarationError> {
        self.registry.entity(spec)
    }

    pub fn declare_system(&mut self, spec: DeclarationSpec) -> Result<Rc<DeclaredType>, DeclarationError> {
        self.registry.system(spec)
    }

    pub fn declare_event_sheet(&mut self, spec: DeclarationSpec) -> Result<Rc<DeclaredType>, DeclarationError> {
        self.registry.event_sheet(spec)
    }

    /// Declares a scene type and registers it with the director under
    /// its name.
    pub fn declare_scene(&mut self, spec: DeclarationSpec) -> Result<Rc<DeclaredType>, EngineError> {
        let ty = self.registry.scene(spec)?;
        self.director
            .add_scene(ty.name().to_string(), SceneSource::Declared(Rc::clone(&ty)))?;
        Ok(ty)
    }

    //--- Scenes -----------------------------------------------------------

    pub fn play(&mut self, target: impl Into<SceneTarget>) -> Result<(), DirectorError> {
        self.director.play(target)
    }

    pub fn play_with<T: Transition + 'static>(
        &mut self,
        target: impl Into<SceneTarget>,
        transition: T,
    ) -> Result<(), DirectorError> {
        self.director.play_with(target, transition)
    }

    /// Spawns a declared entity into the current declared scene.
    pub fn spawn(&mut self, entity: &str) -> Result<(), EngineError> {
        let ty = self
            .registry
            .entity_type(entity)
            .cloned()
            .ok_or_else(|| EngineError::UnknownEntity(entity.to_string()))?;
        let scene = self.director.current_scene().ok_or(EngineError::NoCurrentScene)?;
        let mut scene = scene.borrow_mut();
        let declared = scene.as_declared_mut().ok_or(EngineError::NotDeclaredScene)?;
        declared.spawn(&ty)?;
        Ok(())
    }

    /// Opens a subscription to scene lifecycle events.
    pub fn subscribe(&mut self) -> Receiver<SceneEvent> {
        self.director.dispatcher_mut().subscribe()
    }

    /// Queues a game event for the current scene's event sheets.
    pub fn emit(&mut self, name: impl Into<String>, args: Vec<Value>) {
        self.events.emit(name, args);
    }

    //--- Frame ------------------------------------------------------------

    /// Advances one frame by `delta` milliseconds.
    ///
    /// Queued game events reach the current scene before it updates.
    pub fn tick(&mut self, delta: f64) {
        let delta = if delta.is_nan() {
            0.0
        } else {
            delta.clamp(0.0, self.config.max_frame_delta_ms)
        };

        let events = self.events.drain();
        if !events.is_empty() {
            match self.director.current_scene() {
                Some(scene) => {
                    let mut scene = scene.borrow_mut();
                    for event in &events {
                        scene.handle_event(event);
                    }
                }
                None => trace!("No current scene, dropping {} event(s)", events.len()),
            }
        }

        self.director.update(delta);
    }

    /// Fixed delta derived from the configured TPS.
    pub fn frame_delta(&self) -> f64 {
        1000.0 / self.config.tps
    }

    /// Runs `frames` ticks of [`Engine::frame_delta`] each.
    pub fn run_frames(&mut self, frames: usize) {
        let delta = self.frame_delta();
        for _ in 0..frames {
            self.tick(delta);
        }
    }

    /// Completes any transition, tears down the current scene and drops
    /// pending events.
    pub fn shutdown(&mut self) {
        info!("Shutting down engine");
        self.director.stop_all();
        self.events.clear_all();
    }

    //--- Accessors --------------------------------------------------------

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn director(&self) -> &Director<SceneGraph, ChannelDispatcher> {
        &self.director
    }

    pub fn director_mut(&mut self) -> &mut Director<SceneGraph, ChannelDispatcher> {
        &mut self.director
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
