//=========================================================================
// Declaration Errors
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::kind::{DeclarationKind, HookName, SpecField};

//=== DeclarationError ====================================================

/// Errors raised while declaring or using spec-driven types.
///
/// Every variant raised at declaration time is a programming error: the
/// registry is left untouched and retrying with the same spec fails again.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DeclarationError {
    #[error("{kind} declaration is missing a name")]
    EmptyName { kind: DeclarationKind },

    #[error("{kind} '{name}' is already declared")]
    DuplicateName { kind: DeclarationKind, name: String },

    #[error("{kind} '{name}' does not support the '{field}' field")]
    UnsupportedField {
        kind: DeclarationKind,
        name: String,
        field: SpecField,
    },

    #[error("{kind} '{name}' does not support the '{hook}' hook")]
    UnsupportedHook {
        kind: DeclarationKind,
        name: String,
        hook: HookName,
    },

    #[error("{kind} '{name}' requires a '{hook}' hook")]
    MissingHook {
        kind: DeclarationKind,
        name: String,
        hook: HookName,
    },

    #[error("{kind} '{name}' data must be an object")]
    DataNotObject { kind: DeclarationKind, name: String },

    #[error("{kind} '{name}' uses reserved name '{key}' in {field}")]
    ReservedName {
        kind: DeclarationKind,
        name: String,
        key: String,
        field: &'static str,
    },

    #[error("{kind} '{name}' declares '{key}' both as data and as a method")]
    DataMethodCollision {
        kind: DeclarationKind,
        name: String,
        key: String,
    },

    #[error("{kind} '{name}' references unknown {field} '{reference}'")]
    UnknownReference {
        kind: DeclarationKind,
        name: String,
        field: SpecField,
        reference: String,
    },

    #[error("{kind} '{name}' lists {field} '{reference}' more than once")]
    DuplicateReference {
        kind: DeclarationKind,
        name: String,
        field: SpecField,
        reference: String,
    },

    #[error("scene '{name}' has an invalid layer name '{layer}'")]
    InvalidLayer { name: String, layer: String },

    #[error("event sheet '{name}' has an empty event name")]
    InvalidEventName { name: String },

    #[error("{kind} '{name}' has no method '{method}'")]
    UnknownMethod {
        kind: DeclarationKind,
        name: String,
        method: String,
    },

    #[error("expected a {expected} type but '{name}' is a {actual}")]
    KindMismatch {
        expected: DeclarationKind,
        actual: DeclarationKind,
        name: String,
    },
}
