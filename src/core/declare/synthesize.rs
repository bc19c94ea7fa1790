//=========================================================================
// Class Synthesizer
//=========================================================================
//
// Turns a validated spec into a concrete declared type.
//
// Architecture:
//   DeclarationSpec ─┬─> TypeMetadata  (frozen names, defaults, refs)
//                    └─> Prototype     (methods, hooks, resolved types)
//                              ↓ merge
//                        DeclaredType  ──> Instance::new()
//
// References to other declarations are resolved here, once, so that
// instantiation never consults the registry.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

//=== Internal Dependencies ===============================================

use super::error::DeclarationError;
use super::instance::Instance;
use super::kind::{DeclarationKind, SpecField};
use super::spec::{DeclarationSpec, EventHandler, Hooks, Method};
use crate::core::registry::Registry;

//=== TypeMetadata ========================================================

/// Static, comparable description of a declared type.
///
/// Synthesizing the same spec twice yields equal metadata even though
/// the resulting types are distinct values.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMetadata {
    pub kind: DeclarationKind,
    pub name: String,
    pub data: Map<String, Value>,
    pub attributes: Vec<String>,
    pub methods: Vec<String>,
    pub display: Option<String>,
    pub components: Vec<String>,
    pub access: Vec<String>,
    pub systems: Vec<String>,
    pub event_sheets: Vec<String>,
    pub layers: Vec<String>,
    pub events: Vec<String>,
}

//=== Prototype ===========================================================

/// Behaviour shared by every instance of a declared type.
#[derive(Clone, Default)]
pub struct Prototype {
    pub(crate) methods: BTreeMap<String, Method>,
    pub(crate) hooks: Hooks,
    pub(crate) components: Vec<Rc<DeclaredType>>,
    pub(crate) access: Vec<Rc<DeclaredType>>,
    pub(crate) systems: Vec<Rc<DeclaredType>>,
    pub(crate) event_sheets: Vec<Rc<DeclaredType>>,
    pub(crate) events: BTreeMap<String, EventHandler>,
}

//=== DeclaredType ========================================================

/// A type synthesized from a declaration spec.
pub struct DeclaredType {
    metadata: TypeMetadata,
    prototype: Prototype,
}

impl DeclaredType {
    pub fn kind(&self) -> DeclarationKind {
        self.metadata.kind
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn metadata(&self) -> &TypeMetadata {
        &self.metadata
    }

    /// Attribute defaults, as declared.
    pub fn data(&self) -> &Map<String, Value> {
        &self.metadata.data
    }

    pub fn attributes(&self) -> &[String] {
        &self.metadata.attributes
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.prototype.methods.get(name)
    }

    pub fn hooks(&self) -> &Hooks {
        &self.prototype.hooks
    }

    pub fn display(&self) -> Option<&str> {
        self.metadata.display.as_deref()
    }

    /// Component types of an entity, in declaration order.
    pub fn components(&self) -> &[Rc<DeclaredType>] {
        &self.prototype.components
    }

    pub fn component_type(&self, name: &str) -> Option<&Rc<DeclaredType>> {
        self.prototype.components.iter().find(|ty| ty.name() == name)
    }

    /// Component types a system requires.
    pub fn access(&self) -> &[Rc<DeclaredType>] {
        &self.prototype.access
    }

    pub fn systems(&self) -> &[Rc<DeclaredType>] {
        &self.prototype.systems
    }

    pub fn event_sheets(&self) -> &[Rc<DeclaredType>] {
        &self.prototype.event_sheets
    }

    pub fn layers(&self) -> &[String] {
        &self.metadata.layers
    }

    pub fn event_handler(&self, event: &str) -> Option<&EventHandler> {
        self.prototype.events.get(event)
    }

    pub fn event_names(&self) -> &[String] {
        &self.metadata.events
    }

    /// Creates a fresh instance of this type.
    pub fn instantiate(self: &Rc<Self>) -> Instance {
        Instance::new(Rc::clone(self))
    }
}

impl fmt::Debug for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclaredType")
            .field("metadata", &self.metadata)
            .field("hooks", &self.prototype.hooks)
            .finish()
    }
}

//=== Synthesis ===========================================================

/// Builds a declared type from an already validated spec.
///
/// Only the registry calls this, after `validate` succeeded.
pub(crate) fn synthesize(
    kind: DeclarationKind,
    spec: DeclarationSpec,
    registry: &Registry,
) -> Result<DeclaredType, DeclarationError> {
    let metadata = build_metadata(kind, &spec);
    let prototype = build_prototype(kind, spec, registry)?;
    Ok(DeclaredType {
        metadata,
        prototype,
    })
}

fn build_metadata(kind: DeclarationKind, spec: &DeclarationSpec) -> TypeMetadata {
    let data = match &spec.data {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    let attributes = data.keys().cloned().collect();
    let list = |names: &Option<Vec<String>>| names.clone().unwrap_or_default();

    TypeMetadata {
        kind,
        name: spec.name.clone(),
        data,
        attributes,
        methods: spec.methods.keys().cloned().collect(),
        display: spec.display.clone(),
        components: list(&spec.components),
        access: list(&spec.access),
        systems: list(&spec.systems),
        event_sheets: list(&spec.event_sheets),
        layers: list(&spec.layers),
        events: spec
            .events
            .as_ref()
            .map(|events| events.keys().cloned().collect())
            .unwrap_or_default(),
    }
}

fn build_prototype(
    kind: DeclarationKind,
    spec: DeclarationSpec,
    registry: &Registry,
) -> Result<Prototype, DeclarationError> {
    let name = spec.name.clone();
    let resolve = |field: SpecField, target: DeclarationKind, names: &Option<Vec<String>>| {
        names
            .iter()
            .flatten()
            .map(|reference| {
                registry.get(target, reference).cloned().ok_or_else(|| {
                    DeclarationError::UnknownReference {
                        kind,
                        name: name.clone(),
                        field,
                        reference: reference.clone(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()
    };

    let components = resolve(SpecField::Components, DeclarationKind::Component, &spec.components)?;
    let access = resolve(SpecField::Access, DeclarationKind::Component, &spec.access)?;
    let systems = resolve(SpecField::Systems, DeclarationKind::System, &spec.systems)?;
    let event_sheets = resolve(SpecField::EventSheets, DeclarationKind::EventSheet, &spec.event_sheets)?;

    Ok(Prototype {
        methods: spec.methods,
        hooks: spec.hooks,
        components,
        access,
        systems,
        event_sheets,
        events: spec.events.unwrap_or_default(),
    })
}

//=== Tests ===============================================================
