//=========================================================================
// Declarations
//=========================================================================
//
// Declarative entity-component-system layer.
//
// Flow:
//   DeclarationSpec → validate() → synthesize() → Registry table
//                                                    ↓
//                                   DeclaredType::instantiate() → Instance
//
//=========================================================================

//=== Module Declarations =================================================

mod error;
mod instance;
mod kind;
mod spec;
mod synthesize;
mod validate;

//=== Public API ==========================================================

pub use error::DeclarationError;
pub use instance::Instance;
pub use kind::{DeclarationKind, HookName, SpecField};
pub use spec::{
    CheckHook, DeclarationSpec, EventHandler, Hook, Hooks, Method, SystemUpdateHook, UpdateHook,
};
pub use synthesize::{DeclaredType, TypeMetadata};
pub use validate::validate;

pub(crate) use synthesize::synthesize;
