//=========================================================================
// Instances
//=========================================================================
//
// Runtime values of declared types.
//
// Each instance owns a deep copy of its type's data defaults, so object
// and array defaults are never shared between instances. Entities also
// own one instance of every declared component.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

//=== Internal Dependencies ===============================================

use super::error::DeclarationError;
use super::kind::{DeclarationKind, HookName};
use super::synthesize::DeclaredType;

//=== Instance ============================================================

/// An instance of a declared component, entity, system, scene or event sheet.
pub struct Instance {
    ty: Rc<DeclaredType>,
    attributes: Map<String, Value>,
    components: Vec<Instance>,
    destroyed: bool,
}

impl Instance {
    //--- Construction -----------------------------------------------------

    /// Instantiates `ty` and runs its `initialize` hooks.
    ///
    /// Entity components are created and initialized before the entity's
    /// own `initialize` hook runs.
    pub fn new(ty: Rc<DeclaredType>) -> Self {
        let components = ty
            .components()
            .iter()
            .map(|component| Instance::new(Rc::clone(component)))
            .collect();

        let mut instance = Self {
            attributes: ty.data().clone(),
            ty,
            components,
            destroyed: false,
        };
        instance.run_hook(HookName::Initialize);
        instance
    }

    //--- Type Information -------------------------------------------------

    pub fn declared_type(&self) -> &Rc<DeclaredType> {
        &self.ty
    }

    pub fn kind(&self) -> DeclarationKind {
        self.ty.kind()
    }

    pub fn name(&self) -> &str {
        self.ty.name()
    }

    //--- Attributes -------------------------------------------------------

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.attributes.get_mut(key)
    }

    /// Numeric attribute shortcut.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.attributes.get(key).and_then(Value::as_f64)
    }

    /// Writes a declared attribute.
    ///
    /// Returns `false` and leaves the instance untouched when `key` is not
    /// one of the type's attributes.
    pub fn set(&mut self, key: &str, value: Value) -> bool {
        match self.attributes.get_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    //--- Methods ----------------------------------------------------------

    pub fn has_method(&self, method: &str) -> bool {
        self.ty.method(method).is_some()
    }

    /// Calls a declared method with `args`.
    pub fn call(&mut self, method: &str, args: &[Value]) -> Result<Value, DeclarationError> {
        let Some(body) = self.ty.method(method).cloned() else {
            return Err(DeclarationError::UnknownMethod {
                kind: self.kind(),
                name: self.name().to_string(),
                method: method.to_string(),
            });
        };
        Ok(body(self, args))
    }

    //--- Components -------------------------------------------------------

    pub fn components(&self) -> &[Instance] {
        &self.components
    }

    pub fn component(&self, name: &str) -> Option<&Instance> {
        self.components.iter().find(|component| component.name() == name)
    }

    pub fn component_mut(&mut self, name: &str) -> Option<&mut Instance> {
        self.components
            .iter_mut()
            .find(|component| component.name() == name)
    }

    pub fn has_component(&self, name: &str) -> bool {
        self.component(name).is_some()
    }

    //--- Lifecycle --------------------------------------------------------

    /// Runs a no-argument lifecycle hook if the type declares one.
    pub fn run_hook(&mut self, hook: HookName) {
        if let Some(body) = self.ty.hooks().lifecycle(hook).cloned() {
            body(self);
        }
    }

    /// Per-tick update: components first, then the instance itself.
    pub fn update(&mut self, delta: f64) {
        for component in &mut self.components {
            component.update(delta);
        }
        if let Some(body) = self.ty.hooks().update.clone() {
            body(self, delta);
        }
    }

    /// Evaluates a system's `check` hook against `entity`.
    pub fn check(&self, entity: &Instance) -> bool {
        match &self.ty.hooks().check {
            Some(check) => check(entity),
            None => false,
        }
    }

    /// Runs a system's per-entity update against `entity`.
    pub fn update_entity(&mut self, entity: &mut Instance, delta: f64) {
        if let Some(body) = self.ty.hooks().update_entity.clone() {
            body(self, entity, delta);
        }
    }

    /// Runs the `destroy` hooks once; later calls do nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.run_hook(HookName::Destroy);
        for component in &mut self.components {
            component.destroy();
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("kind", &self.kind())
            .field("name", &self.name())
            .field("attributes", &self.attributes)
            .field("components", &self.components)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

//=== Tests ===============================================================
