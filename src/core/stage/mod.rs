//=========================================================================
// Stage
//=========================================================================
//
// The narrow contract the director needs from the renderer's scene graph.
//
// Architecture:
//   Director ──add_child / remove_child / swap_children──> dyn Stage
//                                                             │
//                                            renderer scene graph (external)
//                                            SceneGraph (in-crate, ordered ids)
//
// The director never reads back from the stage beyond these calls.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Module Declarations =================================================

mod scene_graph;
mod world_node;

//=== Public API ==========================================================

pub use scene_graph::SceneGraph;
pub use world_node::WorldNode;

//=== NodeId ==============================================================

/// Identity of a world node on the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

//=== Stage Trait =========================================================

/// Root of the renderer's display tree.
///
/// Children later in the list render on top of earlier ones.
pub trait Stage {
    /// Appends `node` as the topmost child.
    fn add_child(&mut self, node: NodeId);

    /// Removes `node` if it is a child; otherwise does nothing.
    fn remove_child(&mut self, node: NodeId);

    /// Exchanges the render order of two children.
    fn swap_children(&mut self, a: NodeId, b: NodeId);
}
