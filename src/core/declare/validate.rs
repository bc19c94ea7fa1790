//=========================================================================
// Spec Validator
//=========================================================================
//
// Checks a declaration spec against the kind's rules and the current
// registry contents before anything is synthesized or registered.
//
// Flow:
//   name → duplicate → fields → hooks → data → methods → references
//
// The first violation wins. Validation never mutates the registry.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use serde_json::Value;

//=== Internal Dependencies ===============================================

use super::error::DeclarationError;
use super::kind::{DeclarationKind, HookName, SpecField};
use super::spec::DeclarationSpec;
use crate::core::registry::Registry;

//=== Public API ==========================================================

/// Validates `spec` as a declaration of `kind` against `registry`.
pub fn validate(
    kind: DeclarationKind,
    spec: &DeclarationSpec,
    registry: &Registry,
) -> Result<(), DeclarationError> {
    let name = spec.name.as_str();
    if name.is_empty() {
        return Err(DeclarationError::EmptyName { kind });
    }
    if registry.contains(kind, name) {
        return Err(DeclarationError::DuplicateName {
            kind,
            name: name.to_string(),
        });
    }

    validate_fields(kind, spec)?;
    validate_hooks(kind, spec)?;
    validate_data(kind, spec)?;
    validate_methods(kind, spec)?;
    validate_references(kind, spec, registry)?;

    Ok(())
}

//--- Fields & Hooks ------------------------------------------------------

fn validate_fields(kind: DeclarationKind, spec: &DeclarationSpec) -> Result<(), DeclarationError> {
    if let Some(field) = spec
        .present_fields()
        .into_iter()
        .find(|field| !kind.allows_field(*field))
    {
        return Err(DeclarationError::UnsupportedField {
            kind,
            name: spec.name.clone(),
            field,
        });
    }
    Ok(())
}

fn validate_hooks(kind: DeclarationKind, spec: &DeclarationSpec) -> Result<(), DeclarationError> {
    let unsupported = |hook| DeclarationError::UnsupportedHook {
        kind,
        name: spec.name.clone(),
        hook,
    };

    if let Some(hook) = spec
        .hooks
        .present()
        .into_iter()
        .find(|hook| !kind.allows_hook(*hook))
    {
        return Err(unsupported(hook));
    }

    if kind == DeclarationKind::System && spec.hooks.check.is_none() {
        return Err(DeclarationError::MissingHook {
            kind,
            name: spec.name.clone(),
            hook: HookName::Check,
        });
    }
    Ok(())
}

//--- Data & Methods ------------------------------------------------------

fn validate_data(kind: DeclarationKind, spec: &DeclarationSpec) -> Result<(), DeclarationError> {
    let Some(data) = &spec.data else {
        return Ok(());
    };
    let Value::Object(map) = data else {
        return Err(DeclarationError::DataNotObject {
            kind,
            name: spec.name.clone(),
        });
    };

    if let Some(key) = map.keys().find(|key| kind.is_reserved(key)) {
        return Err(DeclarationError::ReservedName {
            kind,
            name: spec.name.clone(),
            key: key.clone(),
            field: "data",
        });
    }
    Ok(())
}

fn validate_methods(kind: DeclarationKind, spec: &DeclarationSpec) -> Result<(), DeclarationError> {
    let data_keys: HashSet<&str> = match &spec.data {
        Some(Value::Object(map)) => map.keys().map(String::as_str).collect(),
        _ => HashSet::new(),
    };

    for key in spec.methods.keys() {
        if kind.is_reserved(key) {
            return Err(DeclarationError::ReservedName {
                kind,
                name: spec.name.clone(),
                key: key.clone(),
                field: "methods",
            });
        }
        if data_keys.contains(key.as_str()) {
            return Err(DeclarationError::DataMethodCollision {
                kind,
                name: spec.name.clone(),
                key: key.clone(),
            });
        }
    }
    Ok(())
}

//--- References ----------------------------------------------------------

fn validate_references(
    kind: DeclarationKind,
    spec: &DeclarationSpec,
    registry: &Registry,
) -> Result<(), DeclarationError> {
    let unknown = |field, reference: &str| DeclarationError::UnknownReference {
        kind,
        name: spec.name.clone(),
        field,
        reference: reference.to_string(),
    };

    if let Some(display) = &spec.display {
        if !registry.has_display(display) {
            return Err(unknown(SpecField::Display, display));
        }
    }

    let lists = [
        (SpecField::Components, &spec.components, DeclarationKind::Component),
        (SpecField::Access, &spec.access, DeclarationKind::Component),
        (SpecField::Systems, &spec.systems, DeclarationKind::System),
        (SpecField::EventSheets, &spec.event_sheets, DeclarationKind::EventSheet),
    ];
    for (field, list, target) in lists {
        let Some(names) = list else { continue };
        check_unique(kind, spec, field, names)?;
        if let Some(missing) = names.iter().find(|name| !registry.contains(target, name)) {
            return Err(unknown(field, missing));
        }
    }

    if let Some(layers) = &spec.layers {
        if let Some(empty) = layers.iter().find(|layer| layer.trim().is_empty()) {
            return Err(DeclarationError::InvalidLayer {
                name: spec.name.clone(),
                layer: empty.clone(),
            });
        }
        check_unique(kind, spec, SpecField::Layers, layers)?;
    }

    if let Some(events) = &spec.events {
        if events.keys().any(|event| event.is_empty()) {
            return Err(DeclarationError::InvalidEventName {
                name: spec.name.clone(),
            });
        }
    }

    Ok(())
}

fn check_unique(
    kind: DeclarationKind,
    spec: &DeclarationSpec,
    field: SpecField,
    names: &[String],
) -> Result<(), DeclarationError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(DeclarationError::DuplicateReference {
                kind,
                name: spec.name.clone(),
                field,
                reference: name.clone(),
            });
        }
    }
    Ok(())
}

//=== Tests ===============================================================
