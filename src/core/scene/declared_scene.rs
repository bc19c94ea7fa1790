//=========================================================================
// Declared Scene
//=========================================================================
//
// Runtime for scene types declared through the registry.
//
// Architecture:
//   DeclaredScene
//     ├─ scene: Instance            (hooks: enter/start/.../leave, update)
//     ├─ systems: Vec<Instance>     (check + per-entity update)
//     ├─ sheets: Vec<Instance>      (event handlers)
//     ├─ entities: Vec<Instance>
//     └─ world: WorldNode
//
// Flow per tick:
//   update() → scene update hook → entity updates → systems over entities
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::trace;

//=== Internal Dependencies ===============================================

use super::Scene;
use crate::core::declare::{DeclarationError, DeclarationKind, DeclaredType, HookName, Instance};
use crate::core::event_bus::Event;
use crate::core::stage::WorldNode;

//=== DeclaredScene =======================================================

/// A live instance of a declared scene type.
#[derive(Debug)]
pub struct DeclaredScene {
    scene: Instance,
    systems: Vec<Instance>,
    sheets: Vec<Instance>,
    entities: Vec<Instance>,
    world: WorldNode,
}

impl DeclaredScene {
    /// Instantiates a scene type along with its systems and event sheets.
    pub fn new(ty: Rc<DeclaredType>) -> Result<Self, DeclarationError> {
        expect_kind(&ty, DeclarationKind::Scene)?;

        let systems = ty.systems().iter().map(|system| system.instantiate()).collect();
        let sheets = ty.event_sheets().iter().map(|sheet| sheet.instantiate()).collect();

        Ok(Self {
            scene: Instance::new(ty),
            systems,
            sheets,
            entities: Vec::new(),
            world: WorldNode::new(),
        })
    }

    //--- Accessors --------------------------------------------------------

    pub fn instance(&self) -> &Instance {
        &self.scene
    }

    pub fn instance_mut(&mut self) -> &mut Instance {
        &mut self.scene
    }

    pub fn systems(&self) -> &[Instance] {
        &self.systems
    }

    pub fn event_sheets(&self) -> &[Instance] {
        &self.sheets
    }

    pub fn layers(&self) -> &[String] {
        self.scene.declared_type().layers()
    }

    pub fn entities(&self) -> &[Instance] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Instance] {
        &mut self.entities
    }

    //--- Entities ---------------------------------------------------------

    /// Instantiates an entity type into the scene.
    pub fn spawn(&mut self, ty: &Rc<DeclaredType>) -> Result<&mut Instance, DeclarationError> {
        expect_kind(ty, DeclarationKind::Entity)?;
        trace!("Scene '{}' spawning '{}'", self.scene.name(), ty.name());
        self.entities.push(ty.instantiate());
        let last = self.entities.len() - 1;
        Ok(&mut self.entities[last])
    }

    /// Destroys and removes every entity matching `predicate`.
    ///
    /// Returns how many entities were removed.
    pub fn despawn_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Instance) -> bool,
    {
        let before = self.entities.len();
        self.entities.retain_mut(|entity| {
            if predicate(entity) {
                entity.destroy();
                false
            } else {
                true
            }
        });
        before - self.entities.len()
    }

    //--- Systems ----------------------------------------------------------

    fn run_systems(&mut self, delta: f64) {
        for system in &mut self.systems {
            for entity in &mut self.entities {
                if accepts(system, entity) {
                    system.update_entity(entity, delta);
                }
            }
        }
    }
}

/// A system runs on an entity that owns every accessed component and
/// passes the system's `check`.
fn accepts(system: &Instance, entity: &Instance) -> bool {
    system
        .declared_type()
        .access()
        .iter()
        .all(|component| entity.has_component(component.name()))
        && system.check(entity)
}

fn expect_kind(ty: &DeclaredType, expected: DeclarationKind) -> Result<(), DeclarationError> {
    if ty.kind() == expected {
        Ok(())
    } else {
        Err(DeclarationError::KindMismatch {
            expected,
            actual: ty.kind(),
            name: ty.name().to_string(),
        })
    }
}

//=== Scene Implementation ================================================

impl Scene for DeclaredScene {
    fn name(&self) -> &str {
        self.scene.name()
    }

    fn world(&self) -> &WorldNode {
        &self.world
    }

    fn world_mut(&mut self) -> &mut WorldNode {
        &mut self.world
    }

    fn enter(&mut self) {
        self.scene.run_hook(HookName::Enter);
    }

    fn start(&mut self) {
        self.scene.run_hook(HookName::Start);
    }

    fn pause(&mut self) {
        self.scene.run_hook(HookName::Pause);
    }

    fn resume(&mut self) {
        self.scene.run_hook(HookName::Resume);
    }

    fn update(&mut self, delta: f64) {
        self.scene.update(delta);
        for entity in &mut self.entities {
            entity.update(delta);
        }
        self.run_systems(delta);
    }

    fn stop(&mut self) {
        self.scene.run_hook(HookName::Stop);
    }

    fn leave(&mut self) {
        self.scene.run_hook(HookName::Leave);
    }

    fn handle_event(&mut self, event: &Event) {
        for sheet in &mut self.sheets {
            if let Some(handler) = sheet.declared_type().event_handler(&event.name).cloned() {
                handler(sheet, &mut self.entities, event);
            }
        }
    }

    fn destroy(&mut self) {
        for entity in &mut self.entities {
            entity.destroy();
        }
        for system in &mut self.systems {
            system.destroy();
        }
        for sheet in &mut self.sheets {
            sheet.destroy();
        }
        self.scene.destroy();
    }

    fn as_declared_mut(&mut self) -> Option<&mut DeclaredScene> {
        Some(self)
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::Registry;
    use crate::core::declare::DeclarationSpec;
    use serde_json::json;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.register_display("sprite");
        registry
            .component(DeclarationSpec::new("position").data(json!({ "x": 0.0 })))
            .unwrap();
        registry
            .component(DeclarationSpec::new("velocity").data(json!({ "dx": 1.0 })))
            .unwrap();
        registry
            .system(
                DeclarationSpec::new("movement")
                    .access(["position", "velocity"])
                    .check(|_| true)
                    .on_update_entity(|_, entity, delta| {
                        let dx = entity
                            .component("velocity")
                            .and_then(|v| v.get_f64("dx"))
                            .unwrap_or(0.0);
                        if let Some(position) = entity.component_mut("position") {
                            let x = position.get_f64("x").unwrap_or(0.0);
                            position.set("x", json!(x + dx * delta));
                        }
                    }),
            )
            .unwrap();
        registry
            .entity(
                DeclarationSpec::new("Ship")
                    .display("sprite")
                    .components(["position", "velocity"]),
            )
            .unwrap();
        registry
            .entity(DeclarationSpec::new("Rock").components(["position"]))
            .unwrap();
        registry
            .event_sheet(DeclarationSpec::new("controls").on_event("boost", |_, entities, event| {
                let factor = event.arg(0).and_then(|v| v.as_f64()).unwrap_or(1.0);
                for entity in entities.iter_mut() {
                    if let Some(velocity) = entity.component_mut("velocity") {
                        let dx = velocity.get_f64("dx").unwrap_or(0.0);
                        velocity.set("dx", json!(dx * factor));
                    }
                }
            }))
            .unwrap();
        registry
            .scene(
                DeclarationSpec::new("space")
                    .systems(["movement"])
                    .event_sheets(["controls"])
                    .layers(["stars", "ships"])
                    .attr("ticks", json!(0))
                    .on_update(|this, _| {
                        let ticks = this.get_f64("ticks").unwrap_or(0.0);
                        this.set("ticks", json!(ticks + 1.0));
                    }),
            )
            .unwrap();
        registry
    }

    fn x_of(entity: &Instance) -> f64 {
        entity.component("position").and_then(|p| p.get_f64("x")).unwrap()
    }

    #[test]
    fn systems_only_touch_matching_entities() {
        let registry = registry();
        let mut scene = DeclaredScene::new(registry.scene_type("space").unwrap().clone()).unwrap();
        scene.spawn(registry.entity_type("Ship").unwrap()).unwrap();
        scene.spawn(registry.entity_type("Rock").unwrap()).unwrap();

        scene.update(10.0);

        assert_eq!(x_of(&scene.entities()[0]), 10.0);
        assert_eq!(x_of(&scene.entities()[1]), 0.0);
        assert_eq!(scene.instance().get_f64("ticks"), Some(1.0));
        assert_eq!(scene.layers(), ["stars".to_string(), "ships".to_string()]);
    }

    #[test]
    fn event_sheets_receive_events() {
        let registry = registry();
        let mut scene = DeclaredScene::new(registry.scene_type("space").unwrap().clone()).unwrap();
        scene.spawn(registry.entity_type("Ship").unwrap()).unwrap();

        scene.handle_event(&Event::new("boost", vec![json!(3.0)]));
        scene.handle_event(&Event::new("ignored", vec![]));
        scene.update(1.0);

        assert_eq!(x_of(&scene.entities()[0]), 3.0);
    }

    #[test]
    fn spawn_rejects_non_entities() {
        let registry = registry();
        let mut scene = DeclaredScene::new(registry.scene_type("space").unwrap().clone()).unwrap();
        let err = scene.spawn(registry.component_type("position").unwrap()).unwrap_err();
        assert!(matches!(err, DeclarationError::KindMismatch { .. }));
    }

    #[test]
    fn new_rejects_non_scenes() {
        let registry = registry();
        let err = DeclaredScene::new(registry.entity_type("Ship").unwrap().clone()).unwrap_err();
        assert!(matches!(
            err,
            DeclarationError::KindMismatch {
                expected: DeclarationKind::Scene,
                ..
            }
        ));
    }

    #[test]
    fn despawn_destroys_matches() {
        let registry = registry();
        let mut scene = DeclaredScene::new(registry.scene_type("space").unwrap().clone()).unwrap();
        scene.spawn(registry.entity_type("Ship").unwrap()).unwrap();
        scene.spawn(registry.entity_type("Rock").unwrap()).unwrap();

        let removed = scene.despawn_where(|entity| entity.name() == "Rock");
        assert_eq!(removed, 1);
        assert_eq!(scene.entities().len(), 1);
        assert_eq!(scene.entities()[0].name(), "Ship");
    }

    #[test]
    fn lifecycle_hooks_reach_the_scene_instance() {
        let mut registry = registry();
        let ty = registry
            .scene(
                DeclarationSpec::new("menu")
                    .attr("log", json!([]))
                    .on_enter(|this| push(this, "enter"))
                    .on_start(|this| push(this, "start"))
                    .on_stop(|this| push(this, "stop"))
                    .on_leave(|this| push(this, "leave"))
                    .on_destroy(|this| push(this, "destroy")),
            )
            .unwrap();

        let mut scene = DeclaredScene::new(ty).unwrap();
        scene.enter();
        scene.start();
        scene.stop();
        scene.leave();
        scene.destroy();

        assert_eq!(
            scene.instance().get("log"),
            Some(&json!(["enter", "start", "stop", "leave", "destroy"]))
        );
    }

    fn push(this: &mut Instance, entry: &str) {
        if let Some(serde_json::Value::Array(log)) = this.get_mut("log") {
            log.push(json!(entry));
        }
    }
}
