//=========================================================================
// Stage
//=========================================================================
//
// In-memory display tree.
//
// Architecture:
//   slots: Vec<Slot>      (generation + optional node)
//   free:  Vec<u32>       (reusable slot indices)
//   root:  slot 0         (never destroyed)
//
// Pointer releases are routed here by the engine (`release_at`), which
// hit-tests attached pressable nodes and fires their press handlers.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::{Attribute, DisplayTree, NodeId, PressHandler};
use crate::core::error::StageError;

//=== Node ================================================================

struct Node {
    attributes: [f32; Attribute::COUNT],
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Width and height of the pressable area, centered on the node.
    hit_area: Option<(f32, f32)>,
    press_handlers: Vec<PressHandler>,
}

impl Node {
    fn new(hit_area: Option<(f32, f32)>) -> Self {
        Self {
            attributes: Attribute::ALL.map(Attribute::default_value),
            parent: None,
            children: Vec::new(),
            hit_area,
            press_handlers: Vec::new(),
        }
    }
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

//=== Stage ===============================================================

/// Arena-backed display tree with a fixed root.
pub struct Stage {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    width: f32,
    height: f32,
}

impl Stage {
    //--- Construction -----------------------------------------------------

    /// Creates a stage with an empty root of the given dimensions.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            slots: vec![Slot { generation: 0, node: Some(Node::new(None)) }],
            free: Vec::new(),
            root: NodeId::new(0, 0),
            width,
            height,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    //--- Node Lifetime ----------------------------------------------------

    /// Creates a detached node with default attributes.
    pub fn create_node(&mut self) -> NodeId {
        self.allocate(Node::new(None))
    }

    /// Creates a detached node that emits a press signal when released
    /// inside a `width` x `height` area centered on its position.
    pub fn create_pressable(&mut self, width: f32, height: f32) -> NodeId {
        self.allocate(Node::new(Some((width, height))))
    }

    /// Destroys a node and its whole subtree. The root cannot be destroyed.
    pub fn destroy(&mut self, node: NodeId) -> Result<(), StageError> {
        if node == self.root {
            warn!(target: "stage", "Refusing to destroy the stage root");
            return Ok(());
        }
        if !self.contains(node) {
            return Err(StageError::UnknownNode(node));
        }

        self.remove_from_parent(node);
        self.release_subtree(node);
        Ok(())
    }

    //--- Queries ----------------------------------------------------------

    /// Whether the node is reachable from the root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Position of a node in root space.
    ///
    /// Parent scale applies to child offsets; rotation is ignored.
    pub fn world_position(&self, node: NodeId) -> Option<(f32, f32)> {
        let n = self.get(node)?;
        let local = (n.attributes[Attribute::X.index()], n.attributes[Attribute::Y.index()]);

        match n.parent {
            None => Some(local),
            Some(parent) => {
                let (px, py) = self.world_position(parent)?;
                let (sx, sy) = self.world_scale(parent)?;
                Some((px + local.0 * sx, py + local.1 * sy))
            }
        }
    }

    /// Accumulated scale of a node in root space.
    pub fn world_scale(&self, node: NodeId) -> Option<(f32, f32)> {
        let n = self.get(node)?;
        let local = (
            n.attributes[Attribute::ScaleX.index()],
            n.attributes[Attribute::ScaleY.index()],
        );

        match n.parent {
            None => Some(local),
            Some(parent) => {
                let (px, py) = self.world_scale(parent)?;
                Some((px * local.0, py * local.1))
            }
        }
    }

    //--- Press Signal -----------------------------------------------------

    /// Fires the press signal of the topmost attached pressable node
    /// containing the point. Returns the node that was pressed.
    pub fn release_at(&mut self, x: f32, y: f32) -> Option<NodeId> {
        let mut draw_order = Vec::new();
        self.collect_draw_order(self.root, &mut draw_order);

        let hit = draw_order.into_iter().rev().find(|&id| self.hit_test(id, x, y))?;
        trace!(target: "stage", "Pointer released over {} at ({}, {})", hit, x, y);

        if let Some(node) = self.get_mut(hit) {
            for handler in node.press_handlers.iter_mut() {
                handler(hit);
            }
        }
        Some(hit)
    }

    //--- Internal Helpers -------------------------------------------------

    fn allocate(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId::new(index, slot.generation)
            }
            None => {
                self.slots.push(Slot { generation: 0, node: Some(node) });
                NodeId::new((self.slots.len() - 1) as u32, 0)
            }
        }
    }

    fn release_subtree(&mut self, node: NodeId) {
        let children = self.get(node).map(|n| n.children.clone()).unwrap_or_default();
        for child in children {
            self.release_subtree(child);
        }

        let slot = &mut self.slots[node.index()];
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(node.index() as u32);
    }

    fn get(&self, node: NodeId) -> Option<&Node> {
        self.slots
            .get(node.index())
            .filter(|slot| slot.generation == node.generation())
            .and_then(|slot| slot.node.as_ref())
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(node.index())
            .filter(|slot| slot.generation == node.generation())
            .and_then(|slot| slot.node.as_mut())
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|n| n.parent);
        }
        false
    }

    fn collect_draw_order(&self, node: NodeId, out: &mut Vec<NodeId>) {
        if let Some(n) = self.get(node) {
            out.push(node);
            for &child in &n.children {
                self.collect_draw_order(child, out);
            }
        }
    }

    fn hit_test(&self, node: NodeId, x: f32, y: f32) -> bool {
        let Some((width, height)) = self.get(node).and_then(|n| n.hit_area) else {
            return false;
        };
        let (Some((wx, wy)), Some((sx, sy))) = (self.world_position(node), self.world_scale(node))
        else {
            return false;
        };

        (x - wx).abs() <= (width * sx).abs() / 2.0 && (y - wy).abs() <= (height * sy).abs() / 2.0
    }
}

//=== DisplayTree Implementation ==========================================

impl DisplayTree for Stage {
    fn root(&self) -> NodeId {
        self.root
    }

    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn contains(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    fn create_node(&mut self) -> NodeId {
        Stage::create_node(self)
    }

    fn create_pressable(&mut self, width: f32, height: f32) -> NodeId {
        Stage::create_pressable(self, width, height)
    }

    fn destroy(&mut self, node: NodeId) -> Result<(), StageError> {
        Stage::destroy(self, node)
    }

    fn attribute(&self, node: NodeId, attr: Attribute) -> Option<f32> {
        self.get(node).map(|n| n.attributes[attr.index()])
    }

    fn set_attribute(&mut self, node: NodeId, attr: Attribute, value: f32) -> bool {
        match self.get_mut(node) {
            Some(n) => {
                n.attributes[attr.index()] = value;
                true
            }
            None => false,
        }
    }

    fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), StageError> {
        if !self.contains(parent) {
            return Err(StageError::UnknownNode(parent));
        }
        if !self.contains(child) {
            return Err(StageError::UnknownNode(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(StageError::CyclicAttachment { parent, child });
        }
        if self.parent(child) == Some(parent) {
            return Ok(());
        }

        self.remove_from_parent(child);
        if let Some(n) = self.get_mut(child) {
            n.parent = Some(parent);
        }
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
        Ok(())
    }

    fn remove_from_parent(&mut self, node: NodeId) {
        let Some(parent) = self.get_mut(node).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|&c| c != node);
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.get(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn is_pressable(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(|n| n.hit_area.is_some())
    }

    fn subscribe_press(&mut self, node: NodeId, handler: PressHandler) -> bool {
        match self.get_mut(node) {
            Some(n) if n.hit_area.is_some() => {
                n.press_handlers.push(handler);
                true
            }
            _ => false,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
