//=========================================================================
// Declaration Spec
//=========================================================================
//
// The declarative description handed to a registry declaration function.
//
// A spec is plain data plus closures: attribute defaults, a method table,
// lifecycle hooks and kind-specific references to other declarations.
// Nothing is checked while building; `validate` runs at declaration time.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

//=== Internal Dependencies ===============================================

use super::instance::Instance;
use super::kind::{HookName, SpecField};
use crate::core::event_bus::Event;

//=== Callable Types ======================================================

/// A declared method: receives the instance and call arguments.
pub type Method = Rc<dyn Fn(&mut Instance, &[Value]) -> Value>;

/// A lifecycle hook without arguments.
pub type Hook = Rc<dyn Fn(&mut Instance)>;

/// Per-tick hook receiving the frame delta in milliseconds.
pub type UpdateHook = Rc<dyn Fn(&mut Instance, f64)>;

/// System membership test, evaluated against an entity.
pub type CheckHook = Rc<dyn Fn(&Instance) -> bool>;

/// System update, run once per tick for every matching entity.
pub type SystemUpdateHook = Rc<dyn Fn(&mut Instance, &mut Instance, f64)>;

/// Event sheet handler: the sheet instance, the scene's entities, the event.
pub type EventHandler = Rc<dyn Fn(&mut Instance, &mut [Instance], &Event)>;

//=== Hooks ===============================================================

/// Lifecycle hooks installed on a declaration.
///
/// Absent hooks fall back to the base type's no-op behaviour.
#[derive(Clone, Default)]
pub struct Hooks {
    pub initialize: Option<Hook>,
    pub destroy: Option<Hook>,
    pub enter: Option<Hook>,
    pub start: Option<Hook>,
    pub pause: Option<Hook>,
    pub resume: Option<Hook>,
    pub stop: Option<Hook>,
    pub leave: Option<Hook>,
    pub update: Option<UpdateHook>,
    pub update_entity: Option<SystemUpdateHook>,
    pub check: Option<CheckHook>,
}

impl Hooks {
    /// Names of the hooks that are present.
    pub fn present(&self) -> Vec<HookName> {
        let mut names = Vec::new();
        let simple = [
            (HookName::Initialize, &self.initialize),
            (HookName::Destroy, &self.destroy),
            (HookName::Enter, &self.enter),
            (HookName::Start, &self.start),
            (HookName::Pause, &self.pause),
            (HookName::Resume, &self.resume),
            (HookName::Stop, &self.stop),
            (HookName::Leave, &self.leave),
        ];
        for (name, hook) in simple {
            if hook.is_some() {
                names.push(name);
            }
        }
        if self.update.is_some() {
            names.push(HookName::Update);
        }
        if self.update_entity.is_some() {
            names.push(HookName::UpdateEntity);
        }
        if self.check.is_some() {
            names.push(HookName::Check);
        }
        names
    }

    /// Returns the no-argument hook stored under `name`, if any.
    pub fn lifecycle(&self, name: HookName) -> Option<&Hook> {
        match name {
            HookName::Initialize => self.initialize.as_ref(),
            HookName::Destroy => self.destroy.as_ref(),
            HookName::Enter => self.enter.as_ref(),
            HookName::Start => self.start.as_ref(),
            HookName::Pause => self.pause.as_ref(),
            HookName::Resume => self.resume.as_ref(),
            HookName::Stop => self.stop.as_ref(),
            HookName::Leave => self.leave.as_ref(),
            HookName::Update | HookName::UpdateEntity | HookName::Check => None,
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.present()).finish()
    }
}

//=== DeclarationSpec =====================================================

/// Builder-style declarative description of a component, entity, system,
/// scene or event sheet.
///
/// ```rust
/// # use proscenium::prelude::*;
/// # use serde_json::json;
/// let spec = DeclarationSpec::new("health")
///     .data(json!({ "hp": 10 }))
///     .method("heal", |this, _args| {
///         this.set("hp", json!(10));
///         json!(null)
///     });
/// # let _ = spec;
/// ```
#[derive(Clone, Default)]
pub struct DeclarationSpec {
    pub(crate) name: String,
    pub(crate) data: Option<Value>,
    pub(crate) methods: BTreeMap<String, Method>,
    pub(crate) hooks: Hooks,
    pub(crate) display: Option<String>,
    pub(crate) components: Option<Vec<String>>,
    pub(crate) access: Option<Vec<String>>,
    pub(crate) systems: Option<Vec<String>>,
    pub(crate) event_sheets: Option<Vec<String>>,
    pub(crate) layers: Option<Vec<String>>,
    pub(crate) events: Option<BTreeMap<String, EventHandler>>,
}

impl DeclarationSpec {
    /// Starts a spec with the given declaration name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    //--- Data & Methods ---------------------------------------------------

    /// Replaces the attribute defaults. Must be a JSON object.
    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Adds a single attribute default.
    ///
    /// Has no effect when `data` was previously set to a non-object; the
    /// validator reports that case.
    pub fn attr(mut self, key: impl Into<String>, value: Value) -> Self {
        let data = self.data.get_or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = data {
            map.insert(key.into(), value);
        }
        self
    }

    pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&mut Instance, &[Value]) -> Value + 'static,
    {
        self.methods.insert(name.into(), Rc::new(method));
        self
    }

    //--- Lifecycle Hooks --------------------------------------------------

    pub fn on_initialize<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Instance) + 'static,
    {
        self.hooks.initialize = Some(Rc::new(hook));
        self
    }

    pub fn on_destroy<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Instance) + 'static,
    {
        self.hooks.destroy = Some(Rc::new(hook));
        self
    }

    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Instance) + 'static,
    {
        self.hooks.enter = Some(Rc::new(hook));
        self
    }

    pub fn on_start<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Instance) + 'static,
    {
        self.hooks.start = Some(Rc::new(hook));
        self
    }

    pub fn on_pause<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Instance) + 'static,
    {
        self.hooks.pause = Some(Rc::new(hook));
        self
    }

    pub fn on_resume<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Instance) + 'static,
    {
        self.hooks.resume = Some(Rc::new(hook));
        self
    }

    pub fn on_stop<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Instance) + 'static,
    {
        self.hooks.stop = Some(Rc::new(hook));
        self
    }

    pub fn on_leave<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Instance) + 'static,
    {
        self.hooks.leave = Some(Rc::new(hook));
        self
    }

    /// Per-tick update for components, entities and scenes.
    pub fn on_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Instance, f64) + 'static,
    {
        self.hooks.update = Some(Rc::new(hook));
        self
    }

    /// System update: `(system, entity, delta)` for every entity passing `check`.
    pub fn on_update_entity<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Instance, &mut Instance, f64) + 'static,
    {
        self.hooks.update_entity = Some(Rc::new(hook));
        self
    }

    /// System membership test. Required for systems.
    pub fn check<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Instance) -> bool + 'static,
    {
        self.hooks.check = Some(Rc::new(hook));
        self
    }

    //--- References -------------------------------------------------------

    /// Display kind of an entity (e.g. `"sprite"`).
    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn component(mut self, name: impl Into<String>) -> Self {
        self.components.get_or_insert_with(Vec::new).push(name.into());
        self
    }

    pub fn components<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        extend(&mut self.components, names);
        self
    }

    /// Components a system requires to run.
    pub fn access<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        extend(&mut self.access, names);
        self
    }

    pub fn systems<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        extend(&mut self.systems, names);
        self
    }

    pub fn event_sheets<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        extend(&mut self.event_sheets, names);
        self
    }

    pub fn layers<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        extend(&mut self.layers, names);
        self
    }

    /// Adds an event handler to an event sheet.
    pub fn on_event<F>(mut self, event: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Instance, &mut [Instance], &Event) + 'static,
    {
        self.events
            .get_or_insert_with(BTreeMap::new)
            .insert(event.into(), Rc::new(handler));
        self
    }

    //--- Introspection ----------------------------------------------------

    /// Reference fields that carry a value.
    pub(crate) fn present_fields(&self) -> Vec<SpecField> {
        let mut fields = Vec::new();
        if self.display.is_some() {
            fields.push(SpecField::Display);
        }
        let lists = [
            (SpecField::Components, &self.components),
            (SpecField::Access, &self.access),
            (SpecField::Systems, &self.systems),
            (SpecField::EventSheets, &self.event_sheets),
            (SpecField::Layers, &self.layers),
        ];
        for (field, list) in lists {
            if list.is_some() {
                fields.push(field);
            }
        }
        if self.events.is_some() {
            fields.push(SpecField::Events);
        }
        fields
    }
}

fn extend<I, N>(target: &mut Option<Vec<String>>, names: I)
where
    I: IntoIterator<Item = N>,
    N: Into<String>,
{
    target
        .get_or_insert_with(Vec::new)
        .extend(names.into_iter().map(Into::into));
}

impl fmt::Debug for DeclarationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclarationSpec")
            .field("name", &self.name)
            .field("data", &self.data)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("hooks", &self.hooks)
            .field("fields", &self.present_fields())
            .finish()
    }
}

//=== Tests ===============================================================
