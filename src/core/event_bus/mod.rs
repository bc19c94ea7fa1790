//=========================================================================
// Event Bus
//=========================================================================
//
// Named game events ("jump", "coin-collected", ...) queued during a tick
// and handed to the current scene's event sheets at the tick boundary.
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

//=== Module Declarations =================================================

mod event_bus;

//=== Public API ==========================================================

pub use event_bus::EventBus;

//=== Event ===============================================================

/// A named game event with JSON arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub args: Vec<Value>,
    #[serde(skip)]
    pub(crate) sequence: u64,
}

impl Event {
    pub fn new(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            args,
            sequence: 0,
        }
    }

    /// Argument at `index`, if any.
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }
}
