//=========================================================================
// Display Collaborator
//=========================================================================
//
// The boundary between the animation/scene layer and whatever owns the
// render tree.
//
// Tweens and scenes never own display objects. They hold `NodeId`
// handles and reach the objects through the `DisplayTree` trait, which
// exposes exactly what they consume:
// - six mutable scalar attributes per node
// - a root for attaching screens, node creation and destruction,
//   parent/child edits
// - an optional "press" signal on some nodes
//
// `Stage` is the in-memory implementation used by the engine runtime
// and by tests.
//
//=========================================================================

//=== Module Declarations =================================================

mod stage;

//=== Public API ==========================================================

pub use stage::Stage;

use log::warn;

use crate::core::error::StageError;

//=== NodeId ==============================================================

/// Generational handle to a display node.
///
/// The generation changes every time a slot is reused, so a handle to a
/// destroyed node never aliases a node created later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub(crate) fn index(self) -> usize {
        self.index as usize
    }

    pub(crate) fn generation(self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

//=== Attribute ===========================================================

/// The closed set of scalar attributes a tween can drive.
///
/// Declaration order is the update order used by
/// [`ObjectTween`](crate::core::tween::ObjectTween): position, scale,
/// rotation, opacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    X,
    Y,
    ScaleX,
    ScaleY,
    Rotation,
    Alpha,
}

impl Attribute {
    /// Number of attributes.
    pub const COUNT: usize = 6;

    /// Every attribute, in update order.
    pub const ALL: [Attribute; Attribute::COUNT] = [
        Attribute::X,
        Attribute::Y,
        Attribute::ScaleX,
        Attribute::ScaleY,
        Attribute::Rotation,
        Attribute::Alpha,
    ];

    /// Slot of this attribute in fixed-size per-attribute arrays.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Value a freshly created node starts with.
    pub const fn default_value(self) -> f32 {
        match self {
            Attribute::ScaleX | Attribute::ScaleY | Attribute::Alpha => 1.0,
            Attribute::X | Attribute::Y | Attribute::Rotation => 0.0,
        }
    }
}

//=== Press Signal ========================================================

/// Callback fired when a pressable node is released under the pointer.
pub type PressHandler = Box<dyn FnMut(NodeId) + Send>;

//=== DisplayTree Trait ===================================================

/// Capabilities consumed from the render tree.
///
/// All queries on an unknown node answer "absent" (`None`, `false`,
/// empty) rather than failing.
pub trait DisplayTree {
    /// Node every visible screen is attached under.
    fn root(&self) -> NodeId;

    /// Dimensions of the drawable area, `(width, height)`.
    fn size(&self) -> (f32, f32);

    /// Whether the handle refers to a live node.
    fn contains(&self, node: NodeId) -> bool;

    /// Creates a detached node with default attributes.
    fn create_node(&mut self) -> NodeId;

    /// Creates a detached node that emits a press signal when released
    /// inside a `width` x `height` area centered on its position.
    fn create_pressable(&mut self, width: f32, height: f32) -> NodeId;

    /// Destroys a node, its whole subtree and their press handlers. The
    /// root cannot be destroyed.
    fn destroy(&mut self, node: NodeId) -> Result<(), StageError>;

    /// Current value of one attribute.
    fn attribute(&self, node: NodeId, attr: Attribute) -> Option<f32>;

    /// Writes one attribute. Returns `false` if the node is gone.
    fn set_attribute(&mut self, node: NodeId, attr: Attribute, value: f32) -> bool;

    /// Attaches `child` as the last child of `parent`, detaching it from
    /// any previous parent. Attaching a node to its current parent is a
    /// no-op.
    fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), StageError>;

    /// Detaches a node from its parent. No-op for detached or unknown nodes.
    fn remove_from_parent(&mut self, node: NodeId);

    /// Parent of a node, if attached.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Children of a node in draw order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Whether the node can emit a press signal.
    fn is_pressable(&self, node: NodeId) -> bool;

    /// Subscribes to the node's press signal. Returns `false` when the
    /// node does not support it.
    fn subscribe_press(&mut self, node: NodeId, handler: PressHandler) -> bool;
}

//=== Helpers =============================================================

/// Recursively detaches every descendant of `node`, deepest first.
///
/// The nodes stay alive; only the parent/child links are cut.
pub fn clear_children(tree: &mut dyn DisplayTree, node: NodeId) {
    for child in tree.children(node) {
        clear_children(tree, child);
        tree.remove_from_parent(child);
    }
}

/// Destroys every descendant of `node`. The node itself survives.
pub fn destroy_children(tree: &mut dyn DisplayTree, node: NodeId) {
    for child in tree.children(node) {
        if let Err(e) = tree.destroy(child) {
            warn!(target: "stage", "Content node could not be destroyed: {}", e);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
