//=========================================================================
// Registry
//=========================================================================
//
// Named tables of declared types, one per declaration kind, plus the set
// of display kinds the renderer can build for entities.
//
// Architecture:
//   Registry
//     ├─ tables: HashMap<DeclarationKind, HashMap<String, Rc<DeclaredType>>>
//     └─ displays: HashSet<String>
//
// Tables are populated only by successful declaration calls and are
// never evicted. Duplicate names are hard errors, never overwrites.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use crate::core::declare::{
    synthesize, validate, DeclarationError, DeclarationKind, DeclarationSpec, DeclaredType,
};

//=== Registry ============================================================

/// Process-level table of declared components, entities, systems, scenes
/// and event sheets.
///
/// One registry is constructed per engine and passed explicitly to
/// everything that declares or looks up types.
#[derive(Debug, Default)]
pub struct Registry {
    tables: HashMap<DeclarationKind, HashMap<String, Rc<DeclaredType>>>,
    displays: HashSet<String>,
}

impl Registry {
    //--- Construction -----------------------------------------------------

    /// Creates an empty registry with no display kinds.
    pub fn new() -> Self {
        Self {
            tables: DeclarationKind::ALL
                .iter()
                .map(|kind| (*kind, HashMap::new()))
                .collect(),
            displays: HashSet::new(),
        }
    }

    //--- Display Kinds ----------------------------------------------------

    /// Makes a display kind available to entity declarations.
    pub fn register_display(&mut self, display: impl Into<String>) {
        let display = display.into();
        trace!("Display kind '{}' registered", display);
        self.displays.insert(display);
    }

    pub fn has_display(&self, display: &str) -> bool {
        self.displays.contains(display)
    }

    //--- Declarations -----------------------------------------------------

    /// Validates, synthesizes and registers a declaration of `kind`.
    ///
    /// On error the registry is left unchanged.
    pub fn declare(
        &mut self,
        kind: DeclarationKind,
        spec: DeclarationSpec,
    ) -> Result<Rc<DeclaredType>, DeclarationError> {
        validate(kind, &spec, self)?;
        let declared = Rc::new(synthesize(kind, spec, self)?);
        let name = declared.name().to_string();

        debug!("Declared {} '{}'", kind, name);
        self.tables
            .entry(kind)
            .or_default()
            .insert(name, Rc::clone(&declared));
        Ok(declared)
    }

    pub fn component(&mut self, spec: DeclarationSpec) -> Result<Rc<DeclaredType>, DeclarationError> {
        self.declare(DeclarationKind::Component, spec)
    }

    pub fn entity(&mut self, spec: DeclarationSpec) -> Result<Rc<DeclaredType>, DeclarationError> {
        self.declare(DeclarationKind::Entity, spec)
    }

    pub fn system(&mut self, spec: DeclarationSpec) -> Result<Rc<DeclaredType>, DeclarationError> {
        self.declare(DeclarationKind::System, spec)
    }

    pub fn scene(&mut self, spec: DeclarationSpec) -> Result<Rc<DeclaredType>, DeclarationError> {
        self.declare(DeclarationKind::Scene, spec)
    }

    pub fn event_sheet(&mut self, spec: DeclarationSpec) -> Result<Rc<DeclaredType>, DeclarationError> {
        self.declare(DeclarationKind::EventSheet, spec)
    }

    //--- Lookup -----------------------------------------------------------

    pub fn get(&self, kind: DeclarationKind, name: &str) -> Option<&Rc<DeclaredType>> {
        self.tables.get(&kind).and_then(|table| table.get(name))
    }

    pub fn contains(&self, kind: DeclarationKind, name: &str) -> bool {
        self.get(kind, name).is_some()
    }

    pub fn component_type(&self, name: &str) -> Option<&Rc<DeclaredType>> {
        self.get(DeclarationKind::Component, name)
    }

    pub fn entity_type(&self, name: &str) -> Option<&Rc<DeclaredType>> {
        self.get(DeclarationKind::Entity, name)
    }

    pub fn system_type(&self, name: &str) -> Option<&Rc<DeclaredType>> {
        self.get(DeclarationKind::System, name)
    }

    pub fn scene_type(&self, name: &str) -> Option<&Rc<DeclaredType>> {
        self.get(DeclarationKind::Scene, name)
    }

    pub fn event_sheet_type(&self, name: &str) -> Option<&Rc<DeclaredType>> {
        self.get(DeclarationKind::EventSheet, name)
    }

    /// Sorted names declared for `kind`.
    pub fn names(&self, kind: DeclarationKind) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .tables
            .get(&kind)
            .map(|table| table.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    pub fn len(&self, kind: DeclarationKind) -> usize {
        self.tables.get(&kind).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(HashMap::is_empty)
    }
}

//=== Tests ===============================================================
