//=========================================================================
// Director
//=========================================================================
//
// Scene and transition orchestration.
//
// States:
//   Idle           no current scene
//   Showing        current scene, no transition
//   Transitioning  current + next scene, active transition
//
// play() flow:
//   validate transition → resolve scene → reject self-transition
//     → force-complete active transition
//     → Idle:      attach → enter → start
//     → no transition: stop(cur) → detach → leave → destroy? → attach → enter → start
//     → transition:    attach(next) → enter → swap? → setup → start → stop(cur)
//
// Completion:
//   stop (if unfinished) → start(next) → detach(cur) → leave → destroy?
//
// Only scenes the director instantiated itself are destroyed.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::{debug, trace, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::transition::{Transition, TransitionError};
use crate::core::declare::{DeclarationError, DeclarationKind, DeclaredType};
use crate::core::scene::{scene_handle, DeclaredScene, EventDispatch, Scene, SceneEvent, SceneEventKind, SceneHandle};
use crate::core::stage::{NodeId, Stage};

//=== DirectorError =======================================================

/// Director usage errors. Raised before any state changes.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DirectorError {
    #[error("scene id must not be empty")]
    EmptySceneId,

    #[error("no scene registered under '{0}'")]
    UnknownScene(String),

    #[error("'{name}' is declared as a {kind}, not a scene")]
    NotASceneType { name: String, kind: DeclarationKind },

    #[error("scene '{0}' is already the current scene")]
    SelfTransition(String),

    #[error("invalid transition: {0}")]
    InvalidTransition(#[from] TransitionError),

    #[error(transparent)]
    Declaration(#[from] DeclarationError),
}

//=== SceneSource =========================================================

/// Builds a fresh scene each time it is played.
pub type SceneFactory = Rc<dyn Fn() -> SceneHandle>;

/// Builds a fresh transition each time a registered pair is played.
pub type TransitionFactory = Rc<dyn Fn() -> Box<dyn Transition>>;

/// What a scene id resolves to.
#[derive(Clone)]
pub enum SceneSource {
    /// A caller-owned scene. Never destroyed by the director.
    Instance(SceneHandle),

    /// Director-owned scenes built on demand.
    Factory(SceneFactory),

    /// Director-owned scenes built from a declared scene type.
    Declared(Rc<DeclaredType>),
}

impl SceneSource {
    pub fn instance<S: Scene + 'static>(scene: S) -> Self {
        SceneSource::Instance(scene_handle(scene))
    }

    pub fn factory<S, F>(factory: F) -> Self
    where
        S: Scene + 'static,
        F: Fn() -> S + 'static,
    {
        SceneSource::Factory(Rc::new(move || scene_handle(factory())))
    }

    fn same_as(&self, other: &SceneSource) -> bool {
        match (self, other) {
            (SceneSource::Instance(a), SceneSource::Instance(b)) => same_scene(a, b),
            (SceneSource::Factory(a), SceneSource::Factory(b)) => {
                Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
            }
            (SceneSource::Declared(a), SceneSource::Declared(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn owned(&self) -> bool {
        !matches!(self, SceneSource::Instance(_))
    }

    fn build(&self) -> Result<SceneHandle, DirectorError> {
        match self {
            SceneSource::Instance(scene) => Ok(scene.clone()),
            SceneSource::Factory(factory) => Ok(factory()),
            SceneSource::Declared(ty) => Ok(scene_handle(DeclaredScene::new(ty.clone())?)),
        }
    }
}

impl fmt::Debug for SceneSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneSource::Instance(scene) => write!(f, "Instance({})", scene.borrow().name()),
            SceneSource::Factory(_) => f.write_str("Factory"),
            SceneSource::Declared(ty) => write!(f, "Declared({})", ty.name()),
        }
    }
}

fn same_scene(a: &SceneHandle, b: &SceneHandle) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

//=== SceneTarget =========================================================

/// Argument to [`Director::play`]: a registered id or a scene directly.
#[derive(Clone)]
pub enum SceneTarget {
    Id(String),
    Instance(SceneHandle),
}

impl From<&str> for SceneTarget {
    fn from(id: &str) -> Self {
        SceneTarget::Id(id.to_string())
    }
}

impl From<String> for SceneTarget {
    fn from(id: String) -> Self {
        SceneTarget::Id(id)
    }
}

impl From<SceneHandle> for SceneTarget {
    fn from(scene: SceneHandle) -> Self {
        SceneTarget::Instance(scene)
    }
}

impl From<&SceneHandle> for SceneTarget {
    fn from(scene: &SceneHandle) -> Self {
        SceneTarget::Instance(scene.clone())
    }
}

//=== DirectorState =======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectorState {
    Idle,
    Showing,
    Transitioning,
}

//=== SceneSlot ===========================================================

/// A scene the director currently holds on stage.
struct SceneSlot {
    id: Option<String>,
    label: String,
    scene: SceneHandle,
    node: NodeId,
    owned: bool,
}

/// A resolved but not yet instantiated play target.
enum Resolved {
    Source { id: String, source: SceneSource },
    Instance { id: Option<String>, scene: SceneHandle },
}

//=== Director ============================================================

/// Owns the current scene, an optional next scene and the transition
/// between them.
///
/// The director is the only writer of scene world nodes on the stage.
pub struct Director<St: Stage, D: EventDispatch> {
    stage: St,
    dispatcher: D,
    scenes: HashMap<String, SceneSource>,
    transitions: HashMap<(String, String), TransitionFactory>,
    current: Option<SceneSlot>,
    next: Option<SceneSlot>,
    transition: Option<Box<dyn Transition>>,
    paused: bool,
}

impl<St: Stage, D: EventDispatch> Director<St, D> {
    //--- Construction -----------------------------------------------------

    pub fn new(stage: St, dispatcher: D) -> Self {
        Self {
            stage,
            dispatcher,
            scenes: HashMap::new(),
            transitions: HashMap::new(),
            current: None,
            next: None,
            transition: None,
            paused: false,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene under `id`.
    ///
    /// Re-registering an id with a different source replaces it with a
    /// warning; re-registering the same source does nothing.
    pub fn add_scene(&mut self, id: impl Into<String>, source: SceneSource) -> Result<(), DirectorError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DirectorError::EmptySceneId);
        }
        if let SceneSource::Declared(ty) = &source {
            if ty.kind() != DeclarationKind::Scene {
                return Err(DirectorError::NotASceneType {
                    name: ty.name().to_string(),
                    kind: ty.kind(),
                });
            }
        }

        match self.scenes.get(&id) {
            Some(existing) if existing.same_as(&source) => return Ok(()),
            Some(_) => warn!("Scene '{}' was already registered and has been replaced", id),
            None => debug!("Registered scene '{}'", id),
        }
        self.scenes.insert(id, source);
        Ok(())
    }

    /// Registers the transition used when playing `to` while `from` is
    /// current.
    ///
    /// The factory is invoked once here to validate what it builds. Scene
    /// ids do not need to be registered yet.
    pub fn add_transition<T, F>(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        factory: F,
    ) -> Result<(), DirectorError>
    where
        T: Transition + 'static,
        F: Fn() -> T + 'static,
    {
        let (from, to) = (from.into(), to.into());
        factory().validate()?;

        for id in [&from, &to] {
            if !self.scenes.contains_key(id) {
                warn!("Transition '{}' -> '{}' references unregistered scene '{}'", from, to, id);
            }
        }

        let factory: TransitionFactory = Rc::new(move || Box::new(factory()) as Box<dyn Transition>);
        if self.transitions.insert((from.clone(), to.clone()), factory).is_some() {
            warn!("Transition '{}' -> '{}' was already registered and has been replaced", from, to);
        }
        Ok(())
    }

    /// Registers a transition cloned from `template` on every use.
    pub fn add_transition_template<T>(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        template: T,
    ) -> Result<(), DirectorError>
    where
        T: Transition + Clone + 'static,
    {
        self.add_transition(from, to, move || template.clone())
    }

    pub fn has_scene(&self, id: &str) -> bool {
        self.scenes.contains_key(id)
    }

    pub fn has_transition(&self, from: &str, to: &str) -> bool {
        self.transitions.contains_key(&(from.to_string(), to.to_string()))
    }

    //--- Playback ---------------------------------------------------------

    /// Shows `target`, using the transition registered for the current
    /// and target ids if there is one.
    pub fn play(&mut self, target: impl Into<SceneTarget>) -> Result<(), DirectorError> {
        self.play_internal(target.into(), None)
    }

    /// Shows `target` through an explicit transition.
    ///
    /// With no current scene the transition is dropped and the scene is
    /// shown immediately.
    pub fn play_with<T: Transition + 'static>(
        &mut self,
        target: impl Into<SceneTarget>,
        transition: T,
    ) -> Result<(), DirectorError> {
        self.play_internal(target.into(), Some(Box::new(transition)))
    }

    fn play_internal(
        &mut self,
        target: SceneTarget,
        explicit: Option<Box<dyn Transition>>,
    ) -> Result<(), DirectorError> {
        if let Some(transition) = &explicit {
            transition.validate()?;
        }

        let resolved = self.resolve(target)?;
        if let Resolved::Instance { scene, .. } = &resolved {
            if let Some(effective) = self.effective_current() {
                if same_scene(scene, &effective.scene) {
                    return Err(DirectorError::SelfTransition(effective.label.clone()));
                }
            }
        }

        // Transition choice is made against the scene that will be current
        // once any active transition is completed.
        let from_id = self.effective_current().map(|slot| slot.id.clone());
        let transition = match (&from_id, explicit) {
            (None, Some(_)) => {
                debug!("No current scene, showing without transition");
                None
            }
            (None, None) => None,
            (Some(_), Some(transition)) => Some(transition),
            (Some(from), None) => self.registered_transition(from.as_deref(), resolved.id())?,
        };

        let mut slot = self.instantiate(resolved)?;

        // Replaying the outgoing scene takes over its slot so that completing
        // the transition does not destroy it.
        if self.transition.is_some() {
            if let Some(outgoing) = self.current.as_mut() {
                if same_scene(&outgoing.scene, &slot.scene) {
                    slot.owned = std::mem::replace(&mut outgoing.owned, false);
                    if slot.id.is_none() {
                        slot.id = outgoing.id.clone();
                        slot.label = outgoing.label.clone();
                    }
                }
            }
        }

        self.force_complete_active_transition();
        self.paused = false;

        match transition {
            None => self.replace(slot),
            Some(transition) => self.begin_transition(slot, transition),
        }
        Ok(())
    }

    /// Advances the active transition, or the current scene when there
    /// is none. `delta` is in milliseconds.
    pub fn update(&mut self, delta: f64) {
        if let Some(transition) = self.transition.as_mut() {
            transition.update(delta);
            if transition.has_finished() {
                self.complete_transition();
            }
            return;
        }

        if self.paused {
            return;
        }
        if let Some(current) = &self.current {
            current.scene.borrow_mut().update(delta);
        }
    }

    /// Finishes the active transition immediately, promoting the next
    /// scene and tearing down the previous one.
    ///
    /// Returns whether a transition was active.
    pub(crate) fn force_complete_active_transition(&mut self) -> bool {
        if self.transition.is_none() {
            return false;
        }
        debug!("Force-completing active transition");
        self.complete_transition();
        true
    }

    /// Pauses the current scene. Only possible while showing.
    pub fn pause(&mut self) -> bool {
        if self.paused || self.state() != DirectorState::Showing {
            return false;
        }
        if let Some(current) = &self.current {
            current.scene.borrow_mut().pause();
            Self::emit(&mut self.dispatcher, SceneEventKind::Pause, current);
        }
        self.paused = true;
        true
    }

    pub fn resume(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        if let Some(current) = &self.current {
            current.scene.borrow_mut().resume();
            Self::emit(&mut self.dispatcher, SceneEventKind::Resume, current);
        }
        self.paused = false;
        true
    }

    /// Completes any transition and tears down the current scene.
    pub fn stop_all(&mut self) {
        self.force_complete_active_transition();
        if let Some(current) = self.current.take() {
            debug!("Stopping scene '{}'", current.label);
            self.stop(&current);
            self.teardown(current);
        }
        self.paused = false;
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> DirectorState {
        if self.transition.is_some() {
            DirectorState::Transitioning
        } else if self.current.is_some() {
            DirectorState::Showing
        } else {
            DirectorState::Idle
        }
    }

    pub fn in_transition(&self) -> bool {
        self.transition.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn current_scene(&self) -> Option<SceneHandle> {
        self.current.as_ref().map(|slot| slot.scene.clone())
    }

    pub fn next_scene(&self) -> Option<SceneHandle> {
        self.next.as_ref().map(|slot| slot.scene.clone())
    }

    /// Registered id of the current scene, if it was played by id.
    pub fn current_id(&self) -> Option<&str> {
        self.current.as_ref().and_then(|slot| slot.id.as_deref())
    }

    pub fn stage(&self) -> &St {
        &self.stage
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatcher
    }

    //--- Resolution -------------------------------------------------------

    fn resolve(&self, target: SceneTarget) -> Result<Resolved, DirectorError> {
        match target {
            SceneTarget::Id(id) => {
                let source = self
                    .scenes
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| DirectorError::UnknownScene(id.clone()))?;
                match source {
                    SceneSource::Instance(scene) => Ok(Resolved::Instance { id: Some(id), scene }),
                    source => Ok(Resolved::Source { id, source }),
                }
            }
            SceneTarget::Instance(scene) => {
                let id = self.scenes.iter().find_map(|(id, source)| match source {
                    SceneSource::Instance(registered) if same_scene(registered, &scene) => Some(id.clone()),
                    _ => None,
                });
                Ok(Resolved::Instance { id, scene })
            }
        }
    }

    fn registered_transition(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Option<Box<dyn Transition>>, DirectorError> {
        let (Some(from), Some(to)) = (from, to) else {
            return Ok(None);
        };
        let Some(factory) = self.transitions.get(&(from.to_string(), to.to_string())) else {
            return Ok(None);
        };
        let transition = factory();
        transition.validate()?;
        Ok(Some(transition))
    }

    fn instantiate(&self, resolved: Resolved) -> Result<SceneSlot, DirectorError> {
        let (id, scene, owned) = match resolved {
            Resolved::Source { id, source } => {
                let scene = source.build()?;
                (Some(id), scene, source.owned())
            }
            Resolved::Instance { id, scene } => (id, scene, false),
        };

        let (label, node) = {
            let borrowed = scene.borrow();
            let label = id.clone().unwrap_or_else(|| borrowed.name().to_string());
            (label, borrowed.world().id())
        };

        Ok(SceneSlot {
            id,
            label,
            scene,
            node,
            owned,
        })
    }

    fn effective_current(&self) -> Option<&SceneSlot> {
        self.next.as_ref().or(self.current.as_ref())
    }

    //--- Scene Changes ----------------------------------------------------

    fn replace(&mut self, slot: SceneSlot) {
        if let Some(old) = self.current.take() {
            debug!("Replacing scene '{}' with '{}'", old.label, slot.label);
            self.stop(&old);
            self.teardown(old);
        } else {
            debug!("Showing scene '{}'", slot.label);
        }

        self.enter(&slot);
        self.start(&slot);
        self.current = Some(slot);
    }

    fn begin_transition(&mut self, slot: SceneSlot, mut transition: Box<dyn Transition>) {
        let (current_scene, current_node) = match &self.current {
            Some(current) => {
                debug!("Transitioning from '{}' to '{}'", current.label, slot.label);
                (current.scene.clone(), current.node)
            }
            None => return self.replace(slot),
        };

        self.enter(&slot);
        if transition.swap_scenes() {
            self.stage.swap_children(current_node, slot.node);
        }
        transition.setup(current_scene, slot.scene.clone());
        transition.start();

        if let Some(current) = self.current.take() {
            self.stop(&current);
            self.current = Some(current);
        }

        self.next = Some(slot);
        self.transition = Some(transition);
    }

    fn complete_transition(&mut self) {
        let Some(mut transition) = self.transition.take() else {
            return;
        };
        if !transition.has_finished() {
            transition.stop();
        }
        drop(transition);

        let old = self.current.take();
        if let Some(next) = self.next.take() {
            debug!("Transition finished, '{}' is now current", next.label);
            self.start(&next);
            self.current = Some(next);
        }
        if let Some(old) = old {
            self.teardown(old);
        }
    }

    //--- Lifecycle Steps --------------------------------------------------

    fn enter(&mut self, slot: &SceneSlot) {
        self.stage.add_child(slot.node);
        slot.scene.borrow_mut().enter();
        Self::emit(&mut self.dispatcher, SceneEventKind::Enter, slot);
    }

    fn start(&mut self, slot: &SceneSlot) {
        slot.scene.borrow_mut().start();
        Self::emit(&mut self.dispatcher, SceneEventKind::Start, slot);
    }

    fn stop(&mut self, slot: &SceneSlot) {
        slot.scene.borrow_mut().stop();
        Self::emit(&mut self.dispatcher, SceneEventKind::Stop, slot);
    }

    fn teardown(&mut self, slot: SceneSlot) {
        self.stage.remove_child(slot.node);
        slot.scene.borrow_mut().leave();
        Self::emit(&mut self.dispatcher, SceneEventKind::Leave, &slot);
        if slot.owned {
            trace!("Destroying scene '{}'", slot.label);
            slot.scene.borrow_mut().destroy();
        }
    }

    fn emit(dispatcher: &mut D, kind: SceneEventKind, slot: &SceneSlot) {
        trace!("{} '{}'", kind, slot.label);
        dispatcher.dispatch(SceneEvent {
            kind,
            scene: slot.label.clone(),
            node: slot.node,
        });
    }
}

impl Resolved {
    fn id(&self) -> Option<&str> {
        match self {
            Resolved::Source { id, .. } => Some(id),
            Resolved::Instance { id, .. } => id.as_deref(),
        }
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::director::{InterpolationTransition, PropertyRange};
    use crate::core::registry::Registry;
    use crate::core::declare::DeclarationSpec;
    use crate::core::scene::NullDispatcher;
    use crate::core::stage::{SceneGraph, WorldNode};
    use std::cell::RefCell;

    type Log = Rc<RefCell<Vec<String>>>;
    type TestDirector = Director<SceneGraph, Vec<SceneEvent>>;

    struct Recorder {
        name: &'static str,
        world: WorldNode,
        log: Log,
    }

    impl Recorder {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                world: WorldNode::new(),
                log: log.clone(),
            }
        }

        fn record(&self, what: &str) {
            self.log.borrow_mut().push(format!("{}:{}", self.name, what));
        }
    }

    impl Scene for Recorder {
        fn name(&self) -> &str {
            self.name
        }
        fn world(&self) -> &WorldNode {
            &self.world
        }
        fn world_mut(&mut self) -> &mut WorldNode {
            &mut self.world
        }
        fn update(&mut self, _delta: f64) {
            self.record("update");
        }
        fn pause(&mut self) {
            self.record("pause");
        }
        fn destroy(&mut self) {
            self.record("destroy");
        }
    }

    fn director() -> TestDirector {
        Director::new(SceneGraph::new(), Vec::new())
    }

    fn recorder(name: &'static str, log: &Log) -> SceneHandle {
        scene_handle(Recorder::new(name, log))
    }

    fn factory(name: &'static str, log: &Log) -> SceneSource {
        let log = log.clone();
        SceneSource::factory(move || Recorder::new(name, &log))
    }

    fn events(director: &TestDirector) -> Vec<String> {
        director
            .dispatcher()
            .iter()
            .map(|event| format!("{}({})", event.name(), event.scene))
            .collect()
    }

    fn node_of(scene: &SceneHandle) -> NodeId {
        scene.borrow().world().id()
    }

    //--- Basic playback ---------------------------------------------------

    #[test]
    fn first_play_shows_immediately() {
        let log = Log::default();
        let mut director = director();
        let a = recorder("a", &log);

        assert_eq!(director.state(), DirectorState::Idle);
        director.play(&a).unwrap();

        assert_eq!(director.state(), DirectorState::Showing);
        assert_eq!(events(&director), ["sceneenter(a)", "scenestart(a)"]);
        assert_eq!(director.stage().children(), [node_of(&a)]);
        assert_eq!(director.current_id(), None);
    }

    #[test]
    fn null_dispatcher_runs_headless() {
        let log = Log::default();
        let mut director = Director::new(SceneGraph::new(), NullDispatcher);
        director.add_scene("a", factory("a", &log)).unwrap();
        director.add_scene("b", factory("b", &log)).unwrap();

        director.play("a").unwrap();
        director.play_with("b", InterpolationTransition::fade(100.0)).unwrap();
        director.update(100.0);
        director.update(16.0);

        assert_eq!(director.state(), DirectorState::Showing);
        assert_eq!(director.current_id(), Some("b"));
        assert_eq!(*log.borrow(), ["a:destroy", "b:update"]);
    }

    #[test]
    fn playing_the_current_scene_is_rejected() {
        let log = Log::default();
        let mut director = director();
        let a = recorder("a", &log);

        director.play(&a).unwrap();
        let err = director.play(&a).unwrap_err();

        assert_eq!(err, DirectorError::SelfTransition("a".into()));
        assert_eq!(events(&director).len(), 2);
    }

    #[test]
    fn playing_an_unknown_id_fails() {
        let mut director = director();
        assert_eq!(
            director.play("missing").unwrap_err(),
            DirectorError::UnknownScene("missing".into())
        );
        assert_eq!(director.state(), DirectorState::Idle);
    }

    #[test]
    fn immediate_replacement_orders_events_and_destroys_owned_scene() {
        let log = Log::default();
        let mut director = director();
        director.add_scene("a", factory("a", &log)).unwrap();
        director.add_scene("b", factory("b", &log)).unwrap();

        director.play("a").unwrap();
        director.play("b").unwrap();

        assert_eq!(
            events(&director),
            [
                "sceneenter(a)",
                "scenestart(a)",
                "scenestop(a)",
                "sceneleave(a)",
                "sceneenter(b)",
                "scenestart(b)",
            ]
        );
        assert_eq!(*log.borrow(), ["a:destroy"]);
        assert_eq!(director.current_id(), Some("b"));
        assert_eq!(director.stage().len(), 1);
    }

    #[test]
    fn caller_owned_scenes_are_never_destroyed() {
        let log = Log::default();
        let mut director = director();
        let a = recorder("a", &log);
        director.add_scene("a", SceneSource::Instance(a.clone())).unwrap();

        director.play("a").unwrap();
        director.play(recorder("b", &log)).unwrap();

        assert!(log.borrow().is_empty());
        assert!(!director.stage().contains(node_of(&a)));
    }

    #[test]
    fn update_reaches_only_the_current_scene() {
        let log = Log::default();
        let mut director = director();
        director.play(recorder("a", &log)).unwrap();

        director.update(16.0);
        director.update(16.0);

        assert_eq!(*log.borrow(), ["a:update", "a:update"]);
    }

    //--- Registration -----------------------------------------------------

    #[test]
    fn add_scene_rejects_empty_id() {
        let log = Log::default();
        let mut director = director();
        assert_eq!(
            director.add_scene("", factory("a", &log)).unwrap_err(),
            DirectorError::EmptySceneId
        );
    }

    #[test]
    fn add_scene_rejects_declared_non_scene() {
        let mut registry = Registry::new();
        let entity = registry.entity(DeclarationSpec::new("Hero")).unwrap();
        let mut director = director();

        let err = director.add_scene("hero", SceneSource::Declared(entity)).unwrap_err();
        assert!(matches!(err, DirectorError::NotASceneType { kind: DeclarationKind::Entity, .. }));
    }

    #[test]
    fn duplicate_scene_id_replaces_source() {
        let log = Log::default();
        let mut director = director();
        let first = recorder("first", &log);
        let second = recorder("second", &log);

        director.add_scene("main", SceneSource::Instance(first.clone())).unwrap();
        director.add_scene("main", SceneSource::Instance(first)).unwrap();
        director.add_scene("main", SceneSource::Instance(second.clone())).unwrap();
        director.play("main").unwrap();

        let current = director.current_scene().unwrap();
        assert!(same_scene(&current, &second));
    }

    #[test]
    fn declared_scenes_are_instantiated_and_owned() {
        let mut registry = Registry::new();
        let ty = registry.scene(DeclarationSpec::new("title")).unwrap();
        let log = Log::default();
        let mut director = director();
        director.add_scene("title", SceneSource::Declared(ty)).unwrap();

        director.play("title").unwrap();
        let current = director.current_scene().unwrap();
        assert!(current.borrow_mut().as_declared_mut().is_some());
        assert_eq!(events(&director), ["sceneenter(title)", "scenestart(title)"]);

        director.play(recorder("b", &log)).unwrap();
        let mut scene = current.borrow_mut();
        assert!(scene.as_declared_mut().unwrap().instance().is_destroyed());
    }

    #[test]
    fn add_transition_validates_once() {
        let mut director = director();
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();

        director
            .add_transition("a", "b", move || {
                *counter.borrow_mut() += 1;
                InterpolationTransition::fade(100.0)
            })
            .unwrap();

        assert_eq!(*calls.borrow(), 1);
        assert!(director.has_transition("a", "b"));
        assert!(!director.has_transition("b", "a"));
    }

    #[test]
    fn add_transition_rejects_invalid_product() {
        let mut director = director();
        let err = director
            .add_transition("a", "b", || InterpolationTransition::new(-5.0))
            .unwrap_err();
        assert_eq!(err, DirectorError::InvalidTransition(TransitionError::InvalidDuration(-5.0)));
        assert!(!director.has_transition("a", "b"));
    }

    //--- Transitions ------------------------------------------------------

    #[test]
    fn registered_transition_runs_to_completion() {
        let log = Log::default();
        let mut director = director();
        director.add_scene("a", factory("a", &log)).unwrap();
        director.add_scene("b", factory("b", &log)).unwrap();
        director
            .add_transition_template("a", "b", InterpolationTransition::fade(100.0))
            .unwrap();

        director.play("a").unwrap();
        director.play("b").unwrap();

        assert_eq!(director.state(), DirectorState::Transitioning);
        assert_eq!(events(&director)[2..], ["sceneenter(b)", "scenestop(a)"]);
        assert_eq!(director.stage().len(), 2);

        director.update(50.0);
        assert!(director.in_transition());

        director.update(50.0);
        assert_eq!(director.state(), DirectorState::Showing);
        assert_eq!(events(&director)[4..], ["scenestart(b)", "sceneleave(a)"]);
        assert_eq!(director.stage().len(), 1);
        assert_eq!(*log.borrow(), ["a:destroy"]);
    }

    #[test]
    fn completion_happens_exactly_once() {
        let log = Log::default();
        let mut director = director();
        director.play(recorder("a", &log)).unwrap();
        director
            .play_with(recorder("b", &log), InterpolationTransition::fade(100.0))
            .unwrap();

        director.update(150.0);
        let after_completion = events(&director);
        director.update(16.0);
        director.update(16.0);

        assert_eq!(events(&director), after_completion);
        assert_eq!(*log.borrow(), ["b:update", "b:update"]);
    }

    #[test]
    fn scenes_do_not_update_while_transitioning() {
        let log = Log::default();
        let mut director = director();
        director.play(recorder("a", &log)).unwrap();
        director
            .play_with(recorder("b", &log), InterpolationTransition::fade(100.0))
            .unwrap();

        director.update(10.0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn replaying_during_transition_completes_it_first() {
        let log = Log::default();
        let mut director = director();
        director.add_scene("a", factory("a", &log)).unwrap();
        director.add_scene("b", factory("b", &log)).unwrap();
        director.add_scene("c", factory("c", &log)).unwrap();

        director.play("a").unwrap();
        director.play_with("b", InterpolationTransition::fade(400.0)).unwrap();
        director.update(100.0);
        director.play("c").unwrap();

        assert_eq!(
            events(&director),
            [
                "sceneenter(a)",
                "scenestart(a)",
                "sceneenter(b)",
                "scenestop(a)",
                "scenestart(b)",
                "sceneleave(a)",
                "scenestop(b)",
                "sceneleave(b)",
                "sceneenter(c)",
                "scenestart(c)",
            ]
        );
        assert_eq!(director.current_id(), Some("c"));
        assert_eq!(*log.borrow(), ["a:destroy", "b:destroy"]);
        assert_eq!(director.stage().len(), 1);
    }

    #[test]
    fn force_complete_promotes_next_scene_in_final_state() {
        let log = Log::default();
        let mut director = director();
        let a = recorder("a", &log);
        let b = recorder("b", &log);
        director.play(&a).unwrap();
        director
            .play_with(&b, InterpolationTransition::fade(400.0))
            .unwrap();
        director.update(100.0);

        assert!(director.force_complete_active_transition());

        assert_eq!(director.state(), DirectorState::Showing);
        assert!(same_scene(&director.current_scene().unwrap(), &b));
        assert!(director.next_scene().is_none());
        assert_eq!(a.borrow().world().get("alpha"), Some(0.0));
        assert_eq!(b.borrow().world().get("alpha"), Some(1.0));
        assert!(!director.force_complete_active_transition());
    }

    #[test]
    fn playing_the_incoming_scene_is_rejected() {
        let log = Log::default();
        let mut director = director();
        let b = recorder("b", &log);
        director.play(recorder("a", &log)).unwrap();
        director.play_with(&b, InterpolationTransition::fade(100.0)).unwrap();

        assert!(matches!(director.play(&b), Err(DirectorError::SelfTransition(_))));
        assert!(director.in_transition());
    }

    #[test]
    fn replaying_the_outgoing_scene_keeps_it_alive() {
        let log = Log::default();
        let mut director = director();
        director.add_scene("a", factory("a", &log)).unwrap();
        director.add_scene("b", factory("b", &log)).unwrap();
        director.play("a").unwrap();
        director.play_with("b", InterpolationTransition::fade(100.0)).unwrap();

        let a = director.current_scene().unwrap();
        director.play(&a).unwrap();
        director.update(16.0);

        assert_eq!(*log.borrow(), ["b:destroy", "a:update"]);
        assert!(same_scene(&director.current_scene().unwrap(), &a));
        assert_eq!(director.current_id(), Some("a"));
        assert_eq!(director.stage().children(), [node_of(&a)]);

        director.play("b").unwrap();
        assert_eq!(*log.borrow(), ["b:destroy", "a:update", "a:destroy"]);
    }

    #[test]
    fn invalid_explicit_transition_changes_nothing() {
        let log = Log::default();
        let mut director = director();
        director.play(recorder("a", &log)).unwrap();

        let err = director
            .play_with(recorder("b", &log), InterpolationTransition::new(0.0))
            .unwrap_err();

        assert!(matches!(err, DirectorError::InvalidTransition(_)));
        assert_eq!(events(&director).len(), 2);
        assert_eq!(director.state(), DirectorState::Showing);
    }

    #[test]
    fn transition_is_ignored_without_current_scene() {
        let log = Log::default();
        let mut director = director();
        director
            .play_with(recorder("a", &log), InterpolationTransition::fade(100.0))
            .unwrap();

        assert_eq!(director.state(), DirectorState::Showing);
        assert_eq!(events(&director), ["sceneenter(a)", "scenestart(a)"]);
    }

    #[test]
    fn swap_scenes_puts_next_scene_beneath() {
        let log = Log::default();
        let mut director = director();
        let a = recorder("a", &log);
        let b = recorder("b", &log);
        director.play(&a).unwrap();
        director
            .play_with(&b, InterpolationTransition::cross_fade(100.0))
            .unwrap();

        assert_eq!(director.stage().children(), [node_of(&b), node_of(&a)]);
    }

    #[test]
    fn registered_instance_uses_its_id_for_transition_lookup() {
        let log = Log::default();
        let mut director = director();
        let b = recorder("b", &log);
        director.add_scene("a", factory("a", &log)).unwrap();
        director.add_scene("b", SceneSource::Instance(b.clone())).unwrap();
        director
            .add_transition_template(
                "a",
                "b",
                InterpolationTransition::new(100.0)
                    .next(PropertyRange::new().property("alpha", 0.0, 1.0)),
            )
            .unwrap();

        director.play("a").unwrap();
        director.play(&b).unwrap();

        assert!(director.in_transition());
        assert_eq!(b.borrow().world().get("alpha"), Some(0.0));
    }

    //--- Pause / stop -----------------------------------------------------

    #[test]
    fn paused_scene_receives_no_updates() {
        let log = Log::default();
        let mut director = director();
        director.play(recorder("a", &log)).unwrap();

        assert!(director.pause());
        assert!(!director.pause());
        director.update(16.0);
        assert!(director.resume());
        director.update(16.0);

        assert_eq!(*log.borrow(), ["a:pause", "a:update"]);
        assert_eq!(events(&director)[2..], ["scenepause(a)", "sceneresume(a)"]);
    }

    #[test]
    fn pause_is_refused_while_transitioning() {
        let log = Log::default();
        let mut director = director();
        director.play(recorder("a", &log)).unwrap();
        director
            .play_with(recorder("b", &log), InterpolationTransition::fade(100.0))
            .unwrap();

        assert!(!director.pause());
        assert!(!director.is_paused());
    }

    #[test]
    fn stop_all_tears_everything_down() {
        let log = Log::default();
        let mut director = director();
        director.add_scene("a", factory("a", &log)).unwrap();
        director.add_scene("b", factory("b", &log)).unwrap();
        director.play("a").unwrap();
        director.play_with("b", InterpolationTransition::fade(100.0)).unwrap();

        director.stop_all();

        assert_eq!(director.state(), DirectorState::Idle);
        assert!(director.stage().is_empty());
        assert_eq!(*log.borrow(), ["a:destroy", "b:destroy"]);
        assert_eq!(
            events(&director)[4..],
            ["scenestart(b)", "sceneleave(a)", "scenestop(b)", "sceneleave(b)"]
        );
    }
}
