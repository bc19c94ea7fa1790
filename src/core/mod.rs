//=========================================================================
// Core Systems
//
// Declarative type registration and scene orchestration.
//
// Layout:
// - `declare`   spec validation, type synthesis, instances
// - `registry`  named tables of declared types
// - `event_bus` game events queued per tick
// - `stage`     stage contract and world nodes
// - `scene`     scene capability, lifecycle events, declared scenes
// - `director`  scene/transition state machine
//
// Notes:
// Everything here runs on one thread, driven by the engine's tick. No
// state is global; each engine owns its registry and director.
//
//=========================================================================

pub mod declare;
pub mod director;
pub mod event_bus;
pub mod registry;
pub mod scene;
pub mod stage;
