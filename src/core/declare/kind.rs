//=========================================================================
// Declaration Kinds
//=========================================================================
//
// The five categories of spec-driven type registration and the fixed
// per-kind tables the validator consults: reserved member names,
// permitted lifecycle hooks and permitted reference fields.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== DeclarationKind =====================================================

/// Category of a declaration, selecting its registry table and rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeclarationKind {
    Component,
    Entity,
    System,
    Scene,
    EventSheet,
}

/// Names every synthesized type inherits from its base.
const COMMON_RESERVED: &[&str] = &[
    "name",
    "constructor",
    "initialize",
    "destroy",
    "get",
    "set",
    "call",
    "_$data",
    "_$methods",
    "_$attributes",
    "_$type",
];

const COMPONENT_RESERVED: &[&str] = &["update", "entity"];

const ENTITY_RESERVED: &[&str] = &[
    "update",
    "display",
    "components",
    "component",
    "hasComponent",
    "_$components",
    "_$display",
];

const SYSTEM_RESERVED: &[&str] = &["check", "update", "access", "entities", "_$access"];

const SCENE_RESERVED: &[&str] = &[
    "enter",
    "start",
    "pause",
    "resume",
    "update",
    "stop",
    "leave",
    "world",
    "entities",
    "spawn",
    "despawn",
    "systems",
    "eventSheets",
    "layers",
    "_$systems",
    "_$eventSheets",
    "_$layers",
];

const EVENT_SHEET_RESERVED: &[&str] = &["events", "handle", "_$events", "_$eventNames"];

impl DeclarationKind {
    /// All kinds, in registry order.
    pub const ALL: [DeclarationKind; 5] = [
        DeclarationKind::Component,
        DeclarationKind::Entity,
        DeclarationKind::System,
        DeclarationKind::Scene,
        DeclarationKind::EventSheet,
    ];

    /// Human readable label used in errors and logs.
    pub fn label(self) -> &'static str {
        match self {
            DeclarationKind::Component => "component",
            DeclarationKind::Entity => "entity",
            DeclarationKind::System => "system",
            DeclarationKind::Scene => "scene",
            DeclarationKind::EventSheet => "event sheet",
        }
    }

    fn kind_reserved(self) -> &'static [&'static str] {
        match self {
            DeclarationKind::Component => COMPONENT_RESERVED,
            DeclarationKind::Entity => ENTITY_RESERVED,
            DeclarationKind::System => SYSTEM_RESERVED,
            DeclarationKind::Scene => SCENE_RESERVED,
            DeclarationKind::EventSheet => EVENT_SHEET_RESERVED,
        }
    }

    /// Iterates the full reserved-name list for this kind.
    pub fn reserved_names(self) -> impl Iterator<Item = &'static str> {
        COMMON_RESERVED
            .iter()
            .chain(self.kind_reserved().iter())
            .copied()
    }

    /// Whether `key` may not be used as a data or method name.
    pub fn is_reserved(self, key: &str) -> bool {
        self.reserved_names().any(|reserved| reserved == key)
    }

    /// Whether a spec of this kind may carry the given hook.
    pub fn allows_hook(self, hook: HookName) -> bool {
        use HookName::*;
        match self {
            DeclarationKind::Component | DeclarationKind::Entity => {
                matches!(hook, Initialize | Destroy | Update)
            }
            DeclarationKind::System => matches!(hook, Initialize | Destroy | Check | UpdateEntity),
            DeclarationKind::Scene => !matches!(hook, Check | UpdateEntity),
            DeclarationKind::EventSheet => matches!(hook, Initialize | Destroy),
        }
    }

    /// Whether a spec of this kind may set the given reference field.
    pub fn allows_field(self, field: SpecField) -> bool {
        match field {
            SpecField::Display | SpecField::Components => self == DeclarationKind::Entity,
            SpecField::Access => self == DeclarationKind::System,
            SpecField::Systems | SpecField::EventSheets | SpecField::Layers => {
                self == DeclarationKind::Scene
            }
            SpecField::Events => self == DeclarationKind::EventSheet,
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//=== HookName ============================================================

/// Lifecycle hooks a declaration may install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookName {
    Initialize,
    Destroy,
    Check,
    Update,
    UpdateEntity,
    Enter,
    Start,
    Pause,
    Resume,
    Stop,
    Leave,
}

impl HookName {
    pub fn as_str(self) -> &'static str {
        match self {
            HookName::Initialize => "initialize",
            HookName::Destroy => "destroy",
            HookName::Check => "check",
            HookName::Update => "update",
            HookName::UpdateEntity => "update_entity",
            HookName::Enter => "enter",
            HookName::Start => "start",
            HookName::Pause => "pause",
            HookName::Resume => "resume",
            HookName::Stop => "stop",
            HookName::Leave => "leave",
        }
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=== SpecField ===========================================================

/// Kind-specific fields of a declaration spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecField {
    Display,
    Components,
    Access,
    Systems,
    EventSheets,
    Layers,
    Events,
}

impl SpecField {
    pub fn as_str(self) -> &'static str {
        match self {
            SpecField::Display => "display",
            SpecField::Components => "components",
            SpecField::Access => "access",
            SpecField::Systems => "systems",
            SpecField::EventSheets => "eventSheets",
            SpecField::Layers => "layers",
            SpecField::Events => "events",
        }
    }
}

impl fmt::Display for SpecField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_names_reserved_for_every_kind() {
        for kind in DeclarationKind::ALL {
            assert!(kind.is_reserved("name"));
            assert!(kind.is_reserved("initialize"));
            assert!(kind.is_reserved("_$data"));
            assert!(!kind.is_reserved("hp"));
        }
    }

    #[test]
    fn kind_specific_names() {
        assert!(DeclarationKind::Entity.is_reserved("components"));
        assert!(!DeclarationKind::Component.is_reserved("components"));
        assert!(DeclarationKind::Scene.is_reserved("leave"));
        assert!(DeclarationKind::EventSheet.is_reserved("_$eventNames"));
    }

    #[test]
    fn check_hook_is_system_only() {
        assert!(DeclarationKind::System.allows_hook(HookName::Check));
        assert!(!DeclarationKind::Scene.allows_hook(HookName::Check));
        assert!(!DeclarationKind::Component.allows_hook(HookName::Check));
    }

    #[test]
    fn systems_update_per_entity_only() {
        assert!(DeclarationKind::System.allows_hook(HookName::UpdateEntity));
        assert!(!DeclarationKind::System.allows_hook(HookName::Update));
        for kind in [DeclarationKind::Component, DeclarationKind::Entity, DeclarationKind::Scene] {
            assert!(kind.allows_hook(HookName::Update));
            assert!(!kind.allows_hook(HookName::UpdateEntity));
        }
        assert_eq!(HookName::UpdateEntity.to_string(), "update_entity");
    }

    #[test]
    fn scene_allows_full_lifecycle() {
        for hook in [HookName::Enter, HookName::Start, HookName::Pause, HookName::Leave] {
            assert!(DeclarationKind::Scene.allows_hook(hook));
            assert!(!DeclarationKind::Entity.allows_hook(hook));
        }
    }

    #[test]
    fn reference_fields_per_kind() {
        assert!(DeclarationKind::Entity.allows_field(SpecField::Display));
        assert!(!DeclarationKind::Scene.allows_field(SpecField::Display));
        assert!(DeclarationKind::System.allows_field(SpecField::Access));
        assert!(DeclarationKind::EventSheet.allows_field(SpecField::Events));
    }
}
