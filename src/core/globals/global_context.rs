//=========================================================================
// Global Context
//=========================================================================
//
// Shared data container for scenes.
//
// Contains state data that scenes read/write:
// - stage: the display tree every scene draws into
// - transitions: command queue for scene stack changes
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::display::Stage;
use crate::core::platform_bridge::PointerEvent;
use crate::core::scene::{CommandSender, TransitionQueue};

//=== GlobalContext =======================================================

/// Shared data the scene stack operates on.
pub struct GlobalContext {
    /// Display tree. Its size is the window's logical size.
    pub stage: Stage,

    /// Stack commands queued during a tick, applied after the scenes
    /// updated.
    pub transitions: TransitionQueue,

    /// Pointer releases received this frame. Cleared after routing.
    pub(crate) frame_pointer: Vec<PointerEvent>,
}

impl GlobalContext {
    /// Creates a context around an empty stage.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            stage: Stage::new(width, height),
            transitions: TransitionQueue::new(),
            frame_pointer: Vec::new(),
        }
    }

    /// Handle for queueing stack commands from scenes or press handlers.
    pub fn commands(&self) -> CommandSender {
        self.transitions.sender()
    }
}
