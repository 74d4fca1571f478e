//=========================================================================
// Scene System
//=========================================================================
//
// Full-screen UI units with animated entry/exit transitions.
//
// Architecture:
//   SceneStack
//     ├─ active:  Vec<Box<dyn Scene>>   (bottom .. top)
//     └─ pending: Vec<Box<dyn Scene>>   (popped, exit transition running)
//
//   Scene (trait, hooks) ──► SceneCore (state every scene owns)
//                              ├─ TweenSet   (transition + content tweens)
//                              └─ root: NodeId
//
// Phases (driven by the stack):
// ```text
//   Inactive ─activate─► Activating ─finished─► Active
//       ▲                     │                   │
//       │                deactivate          deactivate
//       │                     ▼                   ▼
//     Hidden ◄─finished─ Deactivating ◄──────────-┘
//                             │ pop
//                             ▼
//                      PendingTeardown ─finished─► Destroyed
// ```
//
// Completion is polled once per tick, never signalled from inside a
// tween, so stack mutation cannot re-enter an animation update.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::display::{destroy_children, Attribute, DisplayTree, NodeId};
use crate::core::error::StageError;
use crate::core::tween::{ObjectTween, TweenId, TweenSet};

//=== Module Declarations =================================================

mod scene_stack;
mod transition_queue;

//=== Public API ==========================================================

pub use scene_stack::{SceneStack, StackId};
pub use transition_queue::{CommandSender, StackCommand, TransitionQueue};

/// Duration of the default slide transitions, in seconds.
pub const DEFAULT_TRANSITION_SECS: f32 = 0.5;

//=== ScenePhase ==========================================================

/// Lifecycle position of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScenePhase {
    /// Constructed, never activated.
    #[default]
    Inactive,

    /// Entry transition running.
    Activating,

    /// Topmost and steady.
    Active,

    /// Exit transition running while still on the stack.
    Deactivating,

    /// Covered by another scene; exit transition done and content cleared.
    Hidden,

    /// Popped; kept alive until its exit transition finishes.
    PendingTeardown,

    /// Final hooks ran; the stack no longer holds it.
    Destroyed,
}

//=== SceneCore ===========================================================

/// State shared by every scene: tweens, timing, flags and the root node
/// all of the scene's content hangs from.
#[derive(Debug)]
pub struct SceneCore {
    root: NodeId,
    tweens: TweenSet,
    time: f32,
    active: bool,
    in_transition: bool,
    phase: ScenePhase,
    stack: Option<StackId>,
    transition: Option<TweenId>,
}

impl SceneCore {
    //--- Construction -----------------------------------------------------

    /// Creates the core for a scene drawn under `root`.
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            tweens: TweenSet::new(),
            time: 0.0,
            active: false,
            in_transition: false,
            phase: ScenePhase::Inactive,
            stack: None,
            transition: None,
        }
    }

    //--- Content Helpers --------------------------------------------------

    /// Places `node` at `(x, y)` under the scene root and registers a tween
    /// for it, configured by `configure`.
    ///
    /// # Errors
    ///
    /// Returns [`StageError`] if `node` or the scene root is not a live node.
    pub fn new_tweener<F>(
        &mut self,
        display: &mut dyn DisplayTree,
        node: NodeId,
        x: f32,
        y: f32,
        configure: F,
    ) -> Result<TweenId, StageError>
    where
        F: FnOnce(ObjectTween) -> ObjectTween,
    {
        display.add_child(self.root, node)?;
        display.set_attribute(node, Attribute::X, x);
        display.set_attribute(node, Attribute::Y, y);

        let tween = configure(ObjectTween::bind(display, node)?);
        Ok(self.tweens.add(tween, display))
    }

    /// Registers an already configured tween.
    pub fn add_tween(&mut self, tween: ObjectTween, display: &mut dyn DisplayTree) -> TweenId {
        self.tweens.add(tween, display)
    }

    pub fn find(&self, tag: &str) -> Option<&ObjectTween> {
        self.tweens.find_by_tag(tag)
    }

    pub fn find_mut(&mut self, tag: &str) -> Option<&mut ObjectTween> {
        self.tweens.find_by_tag_mut(tag)
    }

    //--- Transition Control -----------------------------------------------

    /// Marks a transition as started and swaps in its tween.
    ///
    /// A still-running previous transition tween is dropped; the new one
    /// was bound to the in-flight values, so it continues from there.
    pub fn start_transition(&mut self, tween: Option<ObjectTween>, display: &mut dyn DisplayTree) {
        if let Some(previous) = self.transition.take() {
            self.tweens.remove(previous);
        }
        self.in_transition = true;
        self.transition = tween.map(|t| self.tweens.add(t, display));
    }

    /// Whether the last started transition (and every other tween of the
    /// scene) has finished. True when no transition was ever started.
    pub fn transition_finished(&self) -> bool {
        !self.in_transition || self.tweens.is_finished()
    }

    //--- Accessors --------------------------------------------------------

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn tweens(&self) -> &TweenSet {
        &self.tweens
    }

    pub fn tweens_mut(&mut self) -> &mut TweenSet {
        &mut self.tweens
    }

    /// Seconds of `update` time received since construction.
    pub fn elapsed(&self) -> f32 {
        self.time
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn in_transition(&self) -> bool {
        self.in_transition
    }

    pub fn phase(&self) -> ScenePhase {
        self.phase
    }

    /// Stack the scene currently belongs to.
    pub fn stack(&self) -> Option<StackId> {
        self.stack
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    //--- Stack Bookkeeping ------------------------------------------------

    pub(crate) fn set_phase(&mut self, phase: ScenePhase) {
        self.phase = phase;
    }

    pub(crate) fn join_stack(&mut self, stack: StackId) {
        self.stack = Some(stack);
    }

    /// Drops the back-reference to the owning stack.
    pub fn release_stack(&mut self) {
        self.stack = None;
    }

    fn advance(&mut self, dt: f32, display: &mut dyn DisplayTree) {
        self.time += dt;
        self.tweens.advance(dt, display);
    }

    fn drop_content_tweens(&mut self) {
        self.tweens.clear();
        self.transition = None;
    }
}

//=== Scene Trait =========================================================

/// A full-screen unit managed by a [`SceneStack`].
///
/// Only [`core`](Scene::core) and [`core_mut`](Scene::core_mut) are
/// required. Every other hook has a default implementing the base
/// behavior: slide in from the left on activation, slide out to the left
/// on deactivation, clear content once the exit transition finishes.
///
/// # Minimal Implementation
///
/// ```
/// use aetheric_stage::prelude::*;
///
/// struct Title {
///     core: SceneCore,
/// }
///
/// impl Scene for Title {
///     fn core(&self) -> &SceneCore {
///         &self.core
///     }
///
///     fn core_mut(&mut self) -> &mut SceneCore {
///         &mut self.core
///     }
/// }
///
/// let mut stage = Stage::new(800.0, 600.0);
/// let root = stage.create_node();
/// let mut stack = SceneStack::new();
///
/// stack.push(Box::new(Title { core: SceneCore::new(root) }), &mut stage);
/// stack.update(0.5, &mut stage);
///
/// assert_eq!(stage.attribute(root, Attribute::X), Some(0.0));
/// ```
pub trait Scene: Send {
    fn core(&self) -> &SceneCore;

    fn core_mut(&mut self) -> &mut SceneCore;

    //--- Lifecycle Hooks --------------------------------------------------

    /// Called once when the scene joins a stack. The place to set up scene
    /// state, not visual controls.
    ///
    /// Default attaches the scene root to the display root.
    fn init(&mut self, display: &mut dyn DisplayTree) {
        let (parent, root) = (display.root(), self.core().root());
        if let Err(e) = display.add_child(parent, root) {
            warn!(target: "scene", "Scene root could not be attached: {}", e);
        }
    }

    /// Called when the scene becomes the topmost scene.
    fn activate(&mut self, display: &mut dyn DisplayTree) {
        self.core_mut().set_active(true);
        let transition = self.entry_transition(display);
        self.core_mut().start_transition(transition, display);
        self.on_activate(display);
    }

    /// Called when the scene stops being the topmost scene.
    fn deactivate(&mut self, display: &mut dyn DisplayTree) {
        self.core_mut().set_active(false);
        let transition = self.exit_transition(display);
        self.core_mut().start_transition(transition, display);
    }

    /// The place to create controls and their tweens.
    ///
    /// Default (re)attaches the scene root to the display root.
    fn on_activate(&mut self, display: &mut dyn DisplayTree) {
        let (parent, root) = (display.root(), self.core().root());
        if let Err(e) = display.add_child(parent, root) {
            warn!(target: "scene", "Scene root could not be attached: {}", e);
        }
    }

    /// Called once the entry transition has finished.
    fn on_activated(&mut self, _display: &mut dyn DisplayTree) {}

    /// Called once the exit transition has finished. The place to destroy
    /// controls.
    ///
    /// Default destroys all content (press handlers included), detaches
    /// the root and drops the tweens that drove the content.
    fn on_deactivated(&mut self, display: &mut dyn DisplayTree) {
        let root = self.core().root();
        destroy_children(display, root);
        display.remove_from_parent(root);
        self.core_mut().drop_content_tweens();
    }

    /// Called once when the scene leaves the stack for good, after
    /// [`on_deactivated`](Scene::on_deactivated).
    fn end(&mut self) {
        self.core_mut().release_stack();
    }

    /// Called every tick while the scene is on the stack or pending
    /// teardown.
    fn update(&mut self, dt: f32, display: &mut dyn DisplayTree) {
        self.core_mut().advance(dt, display);
    }

    //--- Transitions ------------------------------------------------------

    /// Tween started by [`activate`](Scene::activate). `None` starts no
    /// scene-level animation.
    ///
    /// Default slides the root from one stage width left of the origin to
    /// the origin.
    fn entry_transition(&self, display: &dyn DisplayTree) -> Option<ObjectTween> {
        let (width, _) = display.size();
        bind_root(self.core(), display).map(|tween| {
            tween
                .x(0.0, DEFAULT_TRANSITION_SECS)
                .source(Attribute::X, -width)
        })
    }

    /// Tween started by [`deactivate`](Scene::deactivate).
    ///
    /// Default slides the root one stage width to the left, starting from
    /// wherever it currently is.
    fn exit_transition(&self, display: &dyn DisplayTree) -> Option<ObjectTween> {
        let (width, _) = display.size();
        bind_root(self.core(), display).map(|tween| tween.x(-width, DEFAULT_TRANSITION_SECS))
    }

    /// Whether the current transition has finished.
    fn transition_finished(&self) -> bool {
        self.core().transition_finished()
    }
}

fn bind_root(core: &SceneCore, display: &dyn DisplayTree) -> Option<ObjectTween> {
    match ObjectTween::bind(display, core.root()) {
        Ok(tween) => Some(tween),
        Err(e) => {
            warn!(target: "scene", "No transition: {}", e);
            None
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
