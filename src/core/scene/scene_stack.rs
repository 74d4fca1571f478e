//=========================================================================
// Scene Stack
//=========================================================================
//
// Ordered stack of scenes plus a pending-teardown list for scenes that
// were popped while their exit transition was still running.
//
// Per tick:
//   1. every active scene updates (bottom to top), then its phase settles
//   2. every pending scene updates; finished ones are finalized and dropped
//
// All finalization happens inside `update` or the mutating call itself,
// so a removed scene is never advanced again.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::transition_queue::{StackCommand, TransitionQueue};
use super::{Scene, ScenePhase};
use crate::core::display::DisplayTree;

//=== StackId =============================================================

/// Identity of a [`SceneStack`], held by member scenes as their
/// back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StackId(u64);

impl StackId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

//=== SceneStack ==========================================================

/// Stack of scenes with transition-aware push and pop.
pub struct SceneStack {
    id: StackId,
    active: Vec<Box<dyn Scene>>,
    pending: Vec<Box<dyn Scene>>,
}

impl Default for SceneStack {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SceneStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneStack")
            .field("id", &self.id)
            .field("active", &self.active.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl SceneStack {
    pub fn new() -> Self {
        Self {
            id: StackId::next(),
            active: Vec::new(),
            pending: Vec::new(),
        }
    }

    //=== Stack Operations ================================================

    /// Covers the current top with `scene`.
    ///
    /// The old top starts its exit transition but stays on the stack, so
    /// both scenes animate while the new one slides in.
    pub fn push(&mut self, scene: Box<dyn Scene>, display: &mut dyn DisplayTree) {
        if let Some(top) = self.active.last_mut() {
            Self::deactivate_scene(top.as_mut(), display, ScenePhase::Deactivating);
        }
        self.add_to_top(scene, display);
    }

    /// Removes the top scene and reactivates the one beneath it.
    ///
    /// Popping an empty stack is a no-op.
    pub fn pop(&mut self, display: &mut dyn DisplayTree) {
        if !self.remove_top(display) {
            warn!(target: "scene", "Pop requested on an empty scene stack");
            return;
        }

        if let Some(top) = self.active.last_mut() {
            Self::activate_scene(top.as_mut(), display);
        }
    }

    /// Removes the top scene and pushes `scene` without reactivating the
    /// scene beneath.
    pub fn replace(&mut self, scene: Box<dyn Scene>, display: &mut dyn DisplayTree) {
        self.remove_top(display);
        self.add_to_top(scene, display);
    }

    /// Removes the top `count - 1` scenes, then pushes `scene` on what
    /// remains. A `count` of 0 behaves like 1.
    ///
    /// No intermediate scene is reactivated. The remaining top is only
    /// deactivated if it is still active.
    pub fn replace_pop(&mut self, scene: Box<dyn Scene>, count: usize, display: &mut dyn DisplayTree) {
        for _ in 1..count {
            if !self.remove_top(display) {
                break;
            }
        }

        if let Some(top) = self.active.last_mut() {
            if top.core().is_active() {
                Self::deactivate_scene(top.as_mut(), display, ScenePhase::Deactivating);
            }
        }
        self.add_to_top(scene, display);
    }

    /// Applies one queued command.
    pub fn apply(&mut self, command: StackCommand, display: &mut dyn DisplayTree) {
        debug!(target: "scene", "Applying {:?}", command);
        match command {
            StackCommand::Push(scene) => self.push(scene, display),
            StackCommand::Pop => self.pop(display),
            StackCommand::Replace(scene) => self.replace(scene, display),
            StackCommand::ReplacePop(scene, count) => self.replace_pop(scene, count, display),
        }
    }

    /// Applies every command queued so far, in order.
    pub fn process_commands(&mut self, queue: &TransitionQueue, display: &mut dyn DisplayTree) {
        for command in queue.take() {
            self.apply(command, display);
        }
    }

    //=== Update ==========================================================

    /// Advances every scene by `dt` seconds.
    pub fn update(&mut self, dt: f32, display: &mut dyn DisplayTree) {
        for scene in self.active.iter_mut() {
            scene.update(dt, display);
            Self::settle(scene.as_mut(), display);
        }

        let mut i = 0;
        while i < self.pending.len() {
            self.pending[i].update(dt, display);
            if self.pending[i].transition_finished() {
                let scene = self.pending.remove(i);
                Self::finalize(scene, display);
            } else {
                i += 1;
            }
        }
    }

    /// Tears down every scene immediately, without waiting for transitions.
    pub fn clear(&mut self, display: &mut dyn DisplayTree) {
        let pending = std::mem::take(&mut self.pending);
        for scene in pending {
            Self::finalize(scene, display);
        }
        while let Some(scene) = self.active.pop() {
            Self::finalize(scene, display);
        }
    }

    //=== Accessors =======================================================

    pub fn id(&self) -> StackId {
        self.id
    }

    /// Number of scenes on the stack, excluding pending teardown.
    pub fn count(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Number of popped scenes whose exit transition is still running.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn top(&self) -> Option<&dyn Scene> {
        self.active.last().map(|s| s.as_ref())
    }

    pub fn top_mut(&mut self) -> Option<&mut (dyn Scene + 'static)> {
        self.active.last_mut().map(|s| s.as_mut())
    }

    /// Active scenes, bottom to top.
    pub fn scenes(&self) -> impl Iterator<Item = &dyn Scene> {
        self.active.iter().map(|s| s.as_ref())
    }

    /// Scenes waiting for their exit transition to finish.
    pub fn pending(&self) -> impl Iterator<Item = &dyn Scene> {
        self.pending.iter().map(|s| s.as_ref())
    }

    //=== Internal Helpers ================================================

    fn add_to_top(&mut self, mut scene: Box<dyn Scene>, display: &mut dyn DisplayTree) {
        scene.core_mut().join_stack(self.id);
        scene.init(display);
        Self::activate_scene(scene.as_mut(), display);
        self.active.push(scene);
        debug!(target: "scene", "Scene pushed, stack depth {}", self.active.len());
    }

    /// Pops the top scene into teardown. Returns `false` on an empty stack.
    fn remove_top(&mut self, display: &mut dyn DisplayTree) -> bool {
        let Some(mut scene) = self.active.pop() else {
            return false;
        };

        // Covered scenes already ran their exit and teardown hooks.
        if scene.core().phase() == ScenePhase::Hidden {
            Self::finalize(scene, display);
            return true;
        }

        Self::deactivate_scene(scene.as_mut(), display, ScenePhase::PendingTeardown);
        if scene.transition_finished() {
            Self::finalize(scene, display);
        } else {
            debug!(target: "scene", "Scene pending teardown");
            self.pending.push(scene);
        }
        true
    }

    fn activate_scene(scene: &mut dyn Scene, display: &mut dyn DisplayTree) {
        scene.activate(display);
        scene.core_mut().set_phase(ScenePhase::Activating);
    }

    fn deactivate_scene(scene: &mut dyn Scene, display: &mut dyn DisplayTree, phase: ScenePhase) {
        scene.deactivate(display);
        scene.core_mut().set_phase(phase);
    }

    /// Moves a stack member to its next phase once its transition is done.
    fn settle(scene: &mut dyn Scene, display: &mut dyn DisplayTree) {
        if !scene.transition_finished() {
            return;
        }

        match scene.core().phase() {
            ScenePhase::Activating => {
                scene.core_mut().set_phase(ScenePhase::Active);
                scene.on_activated(display);
            }
            ScenePhase::Deactivating => {
                scene.on_deactivated(display);
                scene.core_mut().set_phase(ScenePhase::Hidden);
            }
            _ => {}
        }
    }

    fn finalize(mut scene: Box<dyn Scene>, display: &mut dyn DisplayTree) {
        if scene.core().phase() != ScenePhase::Hidden {
            scene.on_deactivated(display);
        }
        scene.end();

        let core = scene.core_mut();
        core.release_stack();
        core.set_phase(ScenePhase::Destroyed);
        debug!(target: "scene", "Scene destroyed");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::core::display::{Attribute, NodeId, Stage};
    use crate::core::scene::SceneCore;
    use crate::core::tween::ObjectTween;

    type Journal = Arc<Mutex<Vec<String>>>;

    /// Scene that records every hook it receives.
    struct Recorder {
        name: &'static str,
        core: SceneCore,
        journal: Journal,
    }

    impl Recorder {
        fn new(name: &'static str, stage: &mut Stage, journal: &Journal) -> Box<Self> {
            Box::new(Self {
                name,
                core: SceneCore::new(stage.create_node()),
                journal: Arc::clone(journal),
            })
        }

        fn log(&self, hook: &str) {
            self.journal.lock().unwrap().push(format!("{}.{}", self.name, hook));
        }
    }

    impl Scene for Recorder {
        fn core(&self) -> &SceneCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut SceneCore {
            &mut self.core
        }

        fn init(&mut self, display: &mut dyn DisplayTree) {
            self.log("init");
            let parent = display.root();
            display.add_child(parent, self.core.root()).unwrap();
        }

        fn on_activated(&mut self, _display: &mut dyn DisplayTree) {
            self.log("on_activated");
        }

        fn on_deactivated(&mut self, display: &mut dyn DisplayTree) {
            self.log("on_deactivated");
            display.remove_from_parent(self.core.root());
        }

        fn end(&mut self) {
            self.log("end");
            self.core.release_stack();
        }
    }

    /// Scene without any transition tween.
    struct Instant {
        core: SceneCore,
    }

    impl Scene for Instant {
        fn core(&self) -> &SceneCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut SceneCore {
            &mut self.core
        }

        fn entry_transition(&self, _display: &dyn DisplayTree) -> Option<ObjectTween> {
            None
        }

        fn exit_transition(&self, _display: &dyn DisplayTree) -> Option<ObjectTween> {
            None
        }
    }

    fn setup() -> (Stage, SceneStack, Journal) {
        (Stage::new(200.0, 100.0), SceneStack::new(), Arc::new(Mutex::new(Vec::new())))
    }

    fn entries(journal: &Journal) -> Vec<String> {
        journal.lock().unwrap().clone()
    }

    fn root_of(stack: &SceneStack) -> NodeId {
        stack.top().unwrap().core().root()
    }

    //=====================================================================
    // Push
    //=====================================================================

    #[test]
    fn push_slides_scene_in() {
        let (mut stage, mut stack, journal) = setup();
        stack.push(Recorder::new("a", &mut stage, &journal), &mut stage);
        let root = root_of(&stack);

        assert_eq!(stack.count(), 1);
        assert_eq!(stage.attribute(root, Attribute::X), Some(-200.0));
        assert_eq!(stack.top().unwrap().core().phase(), ScenePhase::Activating);

        stack.update(0.25, &mut stage);
        stack.update(0.25, &mut stage);

        let top = stack.top().unwrap();
        assert_eq!(stage.attribute(root, Attribute::X), Some(0.0));
        assert!(top.transition_finished());
        assert_eq!(top.core().phase(), ScenePhase::Active);
        assert_eq!(top.core().stack(), Some(stack.id()));
        assert_eq!(entries(&journal), vec!["a.init", "a.on_activated"]);
    }

    #[test]
    fn push_covers_previous_top() {
        let (mut stage, mut stack, journal) = setup();
        stack.push(Recorder::new("a", &mut stage, &journal), &mut stage);
        stack.update(0.5, &mut stage);

        stack.push(Recorder::new("b", &mut stage, &journal), &mut stage);

        let covered: Vec<_> = stack.scenes().map(|s| s.core().phase()).collect();
        assert_eq!(covered, vec![ScenePhase::Deactivating, ScenePhase::Activating]);
        assert!(!stack.scenes().next().unwrap().core().is_active());

        stack.update(0.5, &mut stage);

        let settled: Vec<_> = stack.scenes().map(|s| s.core().phase()).collect();
        assert_eq!(settled, vec![ScenePhase::Hidden, ScenePhase::Active]);
        assert!(entries(&journal).contains(&"a.on_deactivated".to_string()));
        assert_eq!(stack.count(), 2, "Covered scenes stay on the stack");
    }

    //=====================================================================
    // Pop
    //=====================================================================

    #[test]
    fn pop_during_exit_transition_defers_teardown() {
        let (mut stage, mut stack, journal) = setup();
        stack.push(Recorder::new("a", &mut stage, &journal), &mut stage);
        stack.push(Recorder::new("b", &mut stage, &journal), &mut stage);

        stack.pop(&mut stage);

        assert_eq!(stack.count(), 1);
        assert_eq!(stack.pending_count(), 1);
        assert_eq!(stack.top().unwrap().core().phase(), ScenePhase::Activating);
        assert_eq!(
            stack.pending().next().unwrap().core().phase(),
            ScenePhase::PendingTeardown
        );
        assert!(!entries(&journal).contains(&"b.end".to_string()));

        stack.update(0.25, &mut stage);
        assert_eq!(stack.pending_count(), 1, "Exit transition still running");

        stack.update(0.25, &mut stage);
        assert_eq!(stack.pending_count(), 0);

        let log = entries(&journal);
        let deactivated = log.iter().position(|e| e == "b.on_deactivated").unwrap();
        let ended = log.iter().position(|e| e == "b.end").unwrap();
        assert!(deactivated < ended, "on_deactivated must run before end");
        assert_eq!(log.iter().filter(|e| *e == "b.end").count(), 1);
    }

    #[test]
    fn pop_with_finished_transition_destroys_immediately() {
        let (mut stage, mut stack, _journal) = setup();
        stack.push(
            Box::new(Instant { core: SceneCore::new(stage.create_node()) }),
            &mut stage,
        );
        stack.push(
            Box::new(Instant { core: SceneCore::new(stage.create_node()) }),
            &mut stage,
        );

        stack.pop(&mut stage);

        assert_eq!(stack.count(), 1);
        assert_eq!(stack.pending_count(), 0, "Nothing to wait for");
    }

    #[test]
    fn pop_reactivates_scene_beneath() {
        let (mut stage, mut stack, journal) = setup();
        stack.push(Recorder::new("a", &mut stage, &journal), &mut stage);
        stack.update(0.5, &mut stage);
        stack.push(Recorder::new("b", &mut stage, &journal), &mut stage);
        stack.update(0.5, &mut stage);

        stack.pop(&mut stage);
        let root = root_of(&stack);

        assert!(stack.top().unwrap().core().is_active());
        assert!(stage.is_attached(root), "Reactivation reattaches the root");
        assert_eq!(stage.attribute(root, Attribute::X), Some(-200.0));

        stack.update(0.5, &mut stage);
        assert_eq!(stage.attribute(root, Attribute::X), Some(0.0));
        assert_eq!(stack.top().unwrap().core().phase(), ScenePhase::Active);
    }

    #[test]
    fn pop_last_scene_leaves_empty_stack() {
        let (mut stage, mut stack, journal) = setup();
        stack.push(Recorder::new("a", &mut stage, &journal), &mut stage);

        stack.pop(&mut stage);
        assert!(stack.is_empty());

        stack.update(0.5, &mut stage);
        assert_eq!(stack.pending_count(), 0);
        assert!(entries(&journal).contains(&"a.end".to_string()));
    }

    #[test]
    fn pop_empty_is_noop() {
        let (mut stage, mut stack, _journal) = setup();
        stack.pop(&mut stage);

        assert_eq!(stack.count(), 0);
        assert_eq!(stack.pending_count(), 0);
    }

    //=====================================================================
    // Replace
    //=====================================================================

    #[test]
    fn replace_swaps_top_without_reactivation() {
        let (mut stage, mut stack, journal) = setup();
        stack.push(Recorder::new("a", &mut stage, &journal), &mut stage);
        stack.push(Recorder::new("b", &mut stage, &journal), &mut stage);
        stack.update(0.5, &mut stage);

        stack.replace(Recorder::new("c", &mut stage, &journal), &mut stage);

        assert_eq!(stack.count(), 2);
        let phases: Vec<_> = stack.scenes().map(|s| s.core().phase()).collect();
        assert_eq!(phases, vec![ScenePhase::Hidden, ScenePhase::Activating]);
    }

    #[test]
    fn replace_pop_removes_several() {
        let (mut stage, mut stack, journal) = setup();
        for name in ["a", "b", "c"] {
            stack.push(Recorder::new(name, &mut stage, &journal), &mut stage);
            stack.update(0.5, &mut stage);
        }

        stack.replace_pop(Recorder::new("d", &mut stage, &journal), 3, &mut stage);

        assert_eq!(stack.count(), 2, "c and b removed, d pushed onto a");
        assert_eq!(stack.pending_count(), 1, "Only c still has an exit to run");
        assert!(entries(&journal).contains(&"b.end".to_string()), "Hidden b ends at once");
        let phases: Vec<_> = stack.scenes().map(|s| s.core().phase()).collect();
        assert_eq!(phases, vec![ScenePhase::Hidden, ScenePhase::Activating]);

        stack.update(0.5, &mut stage);
        assert_eq!(stack.pending_count(), 0);
        let log = entries(&journal);
        let count = |entry: &str| log.iter().filter(|e| *e == entry).count();
        assert_eq!(count("b.on_deactivated"), 1);
        assert_eq!(count("c.on_deactivated"), 1);
        assert_eq!(count("b.end"), 1);
        assert_eq!(count("c.end"), 1);
        assert_eq!(count("a.end"), 0);
    }

    #[test]
    fn replace_pop_deactivates_active_remainder() {
        let (mut stage, mut stack, journal) = setup();
        stack.push(Recorder::new("a", &mut stage, &journal), &mut stage);
        stack.update(0.5, &mut stage);

        stack.replace_pop(Recorder::new("b", &mut stage, &journal), 1, &mut stage);

        assert_eq!(stack.count(), 2);
        let below = stack.scenes().next().unwrap();
        assert!(!below.core().is_active());
        assert_eq!(below.core().phase(), ScenePhase::Deactivating);
    }

    //=====================================================================
    // Commands and Teardown
    //=====================================================================

    #[test]
    fn queued_commands_apply_in_order() {
        let (mut stage, mut stack, journal) = setup();
        let queue = TransitionQueue::new();
        let sender = queue.sender();

        sender.push(Recorder::new("a", &mut stage, &journal));
        sender.push(Recorder::new("b", &mut stage, &journal));
        sender.pop();

        stack.process_commands(&queue, &mut stage);

        assert_eq!(stack.count(), 1);
        assert_eq!(stack.pending_count(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn clear_finalizes_everything() {
        let (mut stage, mut stack, journal) = setup();
        stack.push(Recorder::new("a", &mut stage, &journal), &mut stage);
        stack.push(Recorder::new("b", &mut stage, &journal), &mut stage);
        stack.pop(&mut stage);

        stack.clear(&mut stage);

        assert!(stack.is_empty());
        assert_eq!(stack.pending_count(), 0);
        let log = entries(&journal);
        assert_eq!(log.iter().filter(|e| e.ends_with(".end")).count(), 2);
    }
}
