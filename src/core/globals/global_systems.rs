//=========================================================================
// Global Systems
//=========================================================================
//
// Container for engine-level systems with logic.
//
// Systems operate on GlobalContext data once per tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::GlobalContext;
use crate::core::platform_bridge::PointerEvent;
use crate::core::scene::SceneStack;

//=== GlobalSystems =======================================================

/// Container for engine-level logic systems.
#[derive(Debug, Default)]
pub struct GlobalSystems {
    /// Stack of scenes driven every tick.
    pub scene_stack: SceneStack,
}

impl GlobalSystems {
    pub fn new() -> Self {
        Self {
            scene_stack: SceneStack::new(),
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one tick of `dt` seconds.
    ///
    /// # Processing Pipeline
    ///
    /// 1. **Pointer Routing**: releases fire press handlers on the stage
    /// 2. **Scene Update**: every scene advances its tweens
    /// 3. **Command Processing**: queued stack commands are applied
    pub fn update(&mut self, dt: f32, context: &mut GlobalContext) {
        // 1. Route pointer releases (handlers may queue commands)
        for event in context.frame_pointer.drain(..) {
            match event {
                PointerEvent::Released { x, y } => {
                    if context.stage.release_at(x, y).is_none() {
                        trace!(target: "scene", "Release at ({}, {}) hit nothing", x, y);
                    }
                }
            }
        }

        // 2. Update scenes
        self.scene_stack.update(dt, &mut context.stage);

        // 3. Apply stack commands at the tick boundary
        self.scene_stack
            .process_commands(&context.transitions, &mut context.stage);
    }

    /// Tears every scene down without waiting for transitions.
    pub fn shutdown(&mut self, context: &mut GlobalContext) {
        self.scene_stack.clear(&mut context.stage);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
