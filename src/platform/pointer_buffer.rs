//=========================================================================
// Pointer Buffer
//
// Collects pointer releases between two frame boundaries.
//
// Responsibilities:
// - Store releases in arrival order, repeats included
// - Hand the whole frame over via `drain()`
//
// Notes:
// The buffer only lives for the current frame and is emptied each time
// the platform flushes it to the core thread.
//=========================================================================

//=== Internal Modules ====================================================
use crate::core::platform_bridge::PointerEvent;

//=== PointerBuffer =======================================================

pub(crate) struct PointerBuffer {
    events: Vec<PointerEvent>,
}

impl PointerBuffer {
    //--- Construction -----------------------------------------------------
    //
    // Preallocates enough room for a burst of clicks in one frame.
    //
    pub fn new() -> Self {
        const BASE_CAPACITY: usize = 16;

        Self {
            events: Vec::with_capacity(BASE_CAPACITY),
        }
    }

    //--- Event Handling ---------------------------------------------------
    //
    // Two releases at the same spot are two clicks; both are kept.
    //
    pub fn push(&mut self, event: PointerEvent) {
        self.events.push(event);
    }

    //--- Drain ------------------------------------------------------------
    //
    // Returns this frame's events, or `None` when nothing was buffered.
    //
    pub fn drain(&mut self) -> Option<Vec<PointerEvent>> {
        if self.events.is_empty() {
            return None;
        }
        Some(self.events.drain(..).collect())
    }

    //--- Utilities --------------------------------------------------------
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
