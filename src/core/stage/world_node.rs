//=========================================================================
// World Node
//=========================================================================
//
// A scene's root visual node as seen by the director: an identity the
// stage can attach, plus a property tree transitions can animate through
// dotted paths ("position.x", "scale.y", "filters.blur.strength").
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{json, Map, Value};

//=== Internal Dependencies ===============================================

use super::NodeId;

//=========================================================================

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Root node of a scene, attached to and detached from the stage.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldNode {
    id: NodeId,
    properties: Value,
}

impl WorldNode {
    /// Creates a node with a fresh id and default transform properties.
    pub fn new() -> Self {
        Self {
            id: NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)),
            properties: Self::default_properties(),
        }
    }

    fn default_properties() -> Value {
        json!({
            "position": { "x": 0.0, "y": 0.0 },
            "scale": { "x": 1.0, "y": 1.0 },
            "alpha": 1.0,
            "rotation": 0.0,
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn properties(&self) -> &Value {
        &self.properties
    }

    /// Reads a numeric property by dotted path.
    pub fn get(&self, path: &str) -> Option<f64> {
        path.split('.')
            .try_fold(&self.properties, |node, segment| node.get(segment))
            .and_then(Value::as_f64)
    }

    /// Writes a numeric property by dotted path, creating missing objects
    /// along the way.
    ///
    /// Returns `false`, leaving the node untouched, when the path has an
    /// empty segment or runs through a value that is not an object.
    pub fn set(&mut self, path: &str, value: f64) -> bool {
        if path.split('.').any(str::is_empty) || !self.writable(path) {
            return false;
        }

        let mut segments = path.split('.').peekable();
        let mut node = &mut self.properties;

        while let Some(segment) = segments.next() {
            let Value::Object(map) = node else {
                return false;
            };
            if segments.peek().is_none() {
                map.insert(segment.to_string(), Value::from(value));
                return true;
            }
            node = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        false
    }

    /// Whether every existing value along `path`, except the leaf, is an
    /// object.
    fn writable(&self, path: &str) -> bool {
        let mut node = &self.properties;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            let Value::Object(map) = node else {
                return false;
            };
            if segments.peek().is_none() {
                return true;
            }
            match map.get(segment) {
                Some(child) => node = child,
                None => return true,
            }
        }
        true
    }

    /// Restores the default transform properties.
    pub fn reset(&mut self) {
        self.properties = Self::default_properties();
    }
}

impl Default for WorldNode {
    fn default() -> Self {
        Self::new()
    }
}

//=== Tests ===============================================================
