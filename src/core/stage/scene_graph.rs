//=========================================================================
// Scene Graph
//=========================================================================
//
// Minimal ordered child list implementing `Stage`.
//
// Used by the engine facade when no renderer is attached, and by tests
// to observe what the director did to the stage.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::warn;

//=== Internal Dependencies ===============================================

use super::{NodeId, Stage};

//=========================================================================

/// Ordered list of stage children, bottom first.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SceneGraph {
    children: Vec<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
        }
    }

    /// Children in render order (last is topmost).
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.children.contains(&node)
    }

    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.children.iter().position(|&child| child == node)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Stage for SceneGraph {
    fn add_child(&mut self, node: NodeId) {
        // Re-adding moves the node to the top
        self.children.retain(|&child| child != node);
        self.children.push(node);
    }

    fn remove_child(&mut self, node: NodeId) {
        self.children.retain(|&child| child != node);
    }

    fn swap_children(&mut self, a: NodeId, b: NodeId) {
        match (self.index_of(a), self.index_of(b)) {
            (Some(i), Some(j)) => self.children.swap(i, j),
            _ => warn!("Cannot swap {} and {}: not both on stage", a, b),
        }
    }
}

//=== Tests ===============================================================
