//=========================================================================
// Proscenium Library Root
//
// Scene director and declarative entity/component/system registration
// for frame-driven 2D engines.
//
// Responsibilities:
// - Expose the engine facade (`Engine`, `EngineBuilder`)
// - Expose the core subsystems for direct use (`core`)
// - Provide configuration loading and logging setup
//
// Typical usage:
// ```
// use proscenium::prelude::*;
//
// let mut engine = EngineBuilder::new().build();
// engine.declare_scene(DeclarationSpec::new("title")).unwrap();
// engine.play("title").unwrap();
// engine.run_frames(3);
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the registry, director and scene runtime. Most code only
// needs the `Engine` facade and the prelude.
//
pub mod config;
pub mod core;
pub mod logging;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
mod engine;

//--- Public Exports ------------------------------------------------------
pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, EngineBuilder, EngineError};
