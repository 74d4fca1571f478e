//=========================================================================
// Tween Set
//=========================================================================
//
// Owns a group of object tweens and reports when the group is done.
//
// Pattern:
//   add() ──► primes tween with a zero-time advance (no visual jump)
//   advance(dt) ──► every member, no short-circuit ──► finished flag
//
// Membership is by `TweenId`; insertion order is kept so iteration (and
// last-writer-wins on shared attributes) is deterministic.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::object::{ObjectTween, TweenId};
use crate::core::display::{DisplayTree, NodeId};

//=== TweenSet ============================================================

/// Ordered collection of [`ObjectTween`]s advanced together.
#[derive(Debug, Clone)]
pub struct TweenSet {
    tweens: Vec<ObjectTween>,
    finished: bool,
}

impl Default for TweenSet {
    fn default() -> Self {
        Self::new()
    }
}

impl TweenSet {
    /// Creates an empty, finished set.
    pub fn new() -> Self {
        Self {
            tweens: Vec::new(),
            finished: true,
        }
    }

    //--- Membership -------------------------------------------------------

    /// Adds a tween and immediately applies its starting values.
    ///
    /// Adding a tween whose identity is already a member is a no-op.
    pub fn add(&mut self, mut tween: ObjectTween, display: &mut dyn DisplayTree) -> TweenId {
        let id = tween.id();
        if self.contains(id) {
            return id;
        }

        if !tween.advance(0.0, display) {
            self.finished = false;
        }
        debug!(target: "tween", "Added tween {:?} for node {}", id, tween.target());
        self.tweens.push(tween);
        id
    }

    /// Removes a tween, returning it. No-op if absent.
    pub fn remove(&mut self, id: TweenId) -> Option<ObjectTween> {
        let pos = self.tweens.iter().position(|t| t.id() == id)?;
        debug!(target: "tween", "Removed tween {:?}", id);
        Some(self.tweens.remove(pos))
    }

    pub fn contains(&self, id: TweenId) -> bool {
        self.tweens.iter().any(|t| t.id() == id)
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
        self.finished = true;
    }

    //--- Lookup -----------------------------------------------------------

    pub fn get(&self, id: TweenId) -> Option<&ObjectTween> {
        self.tweens.iter().find(|t| t.id() == id)
    }

    pub fn get_mut(&mut self, id: TweenId) -> Option<&mut ObjectTween> {
        self.tweens.iter_mut().find(|t| t.id() == id)
    }

    /// First tween driving `target`.
    pub fn find_by_target(&self, target: NodeId) -> Option<&ObjectTween> {
        self.tweens.iter().find(|t| t.target() == target)
    }

    pub fn find_by_target_mut(&mut self, target: NodeId) -> Option<&mut ObjectTween> {
        self.tweens.iter_mut().find(|t| t.target() == target)
    }

    /// First tween carrying `tag`.
    pub fn find_by_tag(&self, tag: &str) -> Option<&ObjectTween> {
        self.tweens.iter().find(|t| t.tag() == Some(tag))
    }

    pub fn find_by_tag_mut(&mut self, tag: &str) -> Option<&mut ObjectTween> {
        self.tweens.iter_mut().find(|t| t.tag() == Some(tag))
    }

    //--- Update -----------------------------------------------------------

    /// Advances every member and returns whether all of them finished.
    pub fn advance(&mut self, dt: f32, display: &mut dyn DisplayTree) -> bool {
        let mut finished = true;
        for tween in self.tweens.iter_mut() {
            if !tween.advance(dt, display) {
                finished = false;
            }
        }
        self.finished = finished;
        finished
    }

    /// Aggregate result of the last advance (or add).
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    //--- Accessors --------------------------------------------------------

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectTween> {
        self.tweens.iter()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
