//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-core interface types (events and errors).
//
// Defines the contract for communication between platform and core threads.
//
//=========================================================================

//=== PointerEvent ========================================================

/// Pointer input in stage coordinates (logical pixels, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PointerEvent {
    /// Primary button released.
    Released { x: f32, y: f32 },
}

//=== PlatformEvent =======================================================

/// Events sent from platform to core over the channel.
#[derive(Debug, Clone)]
pub(crate) enum PlatformEvent {
    /// Pointer events buffered during one frame.
    Pointer(Vec<PointerEvent>),

    /// Window close requested.
    WindowClosed,
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
#[derive(Debug)]
pub(crate) enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    EventLoopCreation(String),

    /// Event loop execution error.
    EventLoopExecution(String),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {}

//=========================================================================
// Unit Tests
//=========================================================================
