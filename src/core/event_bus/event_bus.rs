//=========================================================================
// Event Bus
//=========================================================================
//
// Name-keyed queue of game events routed to event sheets.
//
// Architecture:
//   Game code → emit()/push() → HashMap<String, Vec<Event>>
//                                      ↓
//   Multiple consumers ← read(name) (shared)
//                                      ↓
//   Engine ─────────→ drain() at tick boundary (FIFO across names)
//
// Pattern: push → read (N consumers) → clear/drain → repeat
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use serde_json::Value;

//=== Internal Dependencies ===============================================

use super::Event;

//=========================================================================

/// Queue of named events for batched, per-tick processing.
///
/// Maintains one queue per event name so consumers can read just the
/// events they care about; `drain` restores global emission order.
#[derive(Debug, Default)]
pub struct EventBus {
    queues: HashMap<String, Vec<Event>>,
    next_sequence: u64,
}

impl EventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self {
            queues: HashMap::new(),
            next_sequence: 0,
        }
    }

    //--- Event Operations -------------------------------------------------

    /// Queues an event under its name.
    pub fn push(&mut self, mut event: Event) {
        event.sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queues
            .entry(event.name.clone())
            .or_default()
            .push(event);
    }

    /// Builds and queues an event.
    pub fn emit(&mut self, name: impl Into<String>, args: Vec<Value>) {
        self.push(Event::new(name, args));
    }

    /// Returns all queued events with the given name.
    ///
    /// Supports multiple readers per frame; events stay queued until
    /// cleared or drained.
    pub fn read(&self, name: &str) -> &[Event] {
        self.queues.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Removes and returns every queued event in emission order.
    ///
    /// Per-name queues keep their allocations for the next frame.
    pub fn drain(&mut self) -> Vec<Event> {
        let mut events: Vec<Event> = self
            .queues
            .values_mut()
            .flat_map(|queue| queue.drain(..))
            .collect();
        events.sort_by_key(|event| event.sequence);
        events
    }

    //--- Query API --------------------------------------------------------

    pub fn has_events(&self, name: &str) -> bool {
        self.count(name) > 0
    }

    pub fn count(&self, name: &str) -> usize {
        self.queues.get(name).map_or(0, Vec::len)
    }

    /// Total number of queued events across all names.
    pub fn len(&self) -> usize {
        self.queues.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears events with the given name, preserving capacity.
    pub fn clear(&mut self, name: &str) {
        if let Some(queue) = self.queues.get_mut(name) {
            queue.clear();
        }
    }

    /// Clears every queue, preserving entries and capacity.
    pub fn clear_all(&mut self) {
        for queue in self.queues.values_mut() {
            queue.clear();
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_bus_is_empty() {
        let bus = EventBus::new();
        assert!(bus.is_empty());
        assert!(!bus.has_events("jump"));
        assert!(bus.read("jump").is_empty());
    }

    #[test]
    fn emit_and_read_by_name() {
        let mut bus = EventBus::new();
        bus.emit("jump", vec![json!(2)]);
        bus.emit("fire", vec![]);
        bus.emit("jump", vec![json!(3)]);

        assert_eq!(bus.count("jump"), 2);
        assert_eq!(bus.count("fire"), 1);
        let jumps = bus.read("jump");
        assert_eq!(jumps[0].args, vec![json!(2)]);
        assert_eq!(jumps[1].args, vec![json!(3)]);

        // Reading does not consume
        assert_eq!(bus.read("jump").len(), 2);
    }

    #[test]
    fn drain_restores_emission_order() {
        let mut bus = EventBus::new();
        bus.emit("a", vec![]);
        bus.emit("b", vec![]);
        bus.emit("a", vec![]);
        bus.emit("c", vec![]);

        let names: Vec<String> = bus.drain().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["a", "b", "a", "c"]);
        assert!(bus.is_empty());
    }

    #[test]
    fn clear_removes_one_name() {
        let mut bus = EventBus::new();
        bus.emit("a", vec![]);
        bus.emit("b", vec![]);
        bus.clear("a");
        assert_eq!(bus.count("a"), 0);
        assert_eq!(bus.count("b"), 1);
    }

    #[test]
    fn clear_all_then_reuse() {
        let mut bus = EventBus::new();
        for i in 0..50 {
            bus.emit("tick", vec![json!(i)]);
        }
        bus.clear_all();
        assert!(bus.is_empty());

        bus.emit("tick", vec![json!(1)]);
        assert_eq!(bus.count("tick"), 1);
    }

    #[test]
    fn events_serialize_without_queue_order() {
        let mut bus = EventBus::new();
        bus.emit("fire", vec![]);
        bus.emit("jump", vec![json!(2), json!({"high": true})]);
        let jump = bus.drain().pop().unwrap();

        let value = serde_json::to_value(&jump).unwrap();
        assert_eq!(value, json!({"name": "jump", "args": [2, {"high": true}]}));

        let mut replayed = EventBus::new();
        replayed.push(serde_json::from_value(value).unwrap());
        assert_eq!(replayed.read("jump")[0].arg(1), Some(&json!({"high": true})));
    }
}
