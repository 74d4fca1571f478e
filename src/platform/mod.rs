//=========================================================================
// Platform Subsystem
//
// Bridges winit (OS-level events) with the core thread via the channel.
//
// Architecture:
// ```text
//  Main Thread:                     Logic Thread:
//  ┌──────────────────────────┐    ┌──────────────────┐
//  │  Winit Event Loop        │    │  Core Systems    │
//  │   ↓                      │    │                  │
//  │  CursorMoved → cursor    │    │  Stage           │
//  │  MouseInput (left up)    │    │   release_at()   │
//  │   ↓                      │    │  ↓               │
//  │  PointerBuffer           │    │  SceneStack      │
//  │   ↓                      │    │   update(dt)     │
//  │  RedrawRequested         │    └──────────────────┘
//  │   ↓ (flush)              │             ↑
//  │  Channel ────────────────┼─────────────┘
//  └──────────────────────────┘    PlatformEvent
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: releases are sent once per frame
// - **Logical coordinates**: the cursor is tracked in logical pixels so
//   stage coordinates do not depend on the monitor's scale factor
// - **Graceful channel disconnect**: if the core thread dies, the platform
//   logs a warning but keeps running so the window can be closed
// - **Main thread requirement**: winit mandates the main thread on
//   macOS/iOS, so this runs on the thread that called `Engine::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod pointer_buffer;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition},
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{PlatformError, PlatformEvent, PointerEvent};
use pointer_buffer::PointerBuffer;

//=== WindowConfig ========================================================

/// Window parameters taken from the engine builder.
#[derive(Debug, Clone)]
pub(crate) struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

//=== Platform ============================================================

/// Window manager and pointer event aggregator.
///
/// Runs on the main thread and sends batched events to the core thread.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(sender, config)`
/// 2. **Execution**: `platform.run()` - starts the event loop
/// 3. **Event processing**: winit calls `ApplicationHandler` methods
/// 4. **Shutdown**: user closes the window → `WindowClosed` → exit
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    config: WindowConfig,

    /// Last cursor position, logical pixels.
    cursor: (f32, f32),

    buffer: PointerBuffer,

    event_sender: Sender<PlatformEvent>,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet; that happens lazily in `resumed()`.
    pub fn new(event_sender: Sender<PlatformEvent>, config: WindowConfig) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            config,
            cursor: (0.0, 0.0),
            buffer: PointerBuffer::new(),
            event_sender,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the winit event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    //--- Internal Helpers -------------------------------------------------

    fn track_cursor(&mut self, position: PhysicalPosition<f64>) {
        let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
        let logical = position.to_logical::<f64>(scale);
        self.cursor = (logical.x as f32, logical.y as f32);
    }

    fn record_release(&mut self) {
        let (x, y) = self.cursor;
        trace!(target: "platform::input", "Pointer released at ({}, {})", x, y);
        self.buffer.push(PointerEvent::Released { x, y });
    }

    /// Flushes buffered pointer events to the core thread.
    ///
    /// If the channel is disconnected, logs a warning and drops the
    /// events so the window can still be closed normally.
    fn flush_pointer_buffer(&mut self) {
        if let Some(events) = self.buffer.drain() {
            let count = events.len();
            trace!(target: "platform::input", "Flushing {} pointer events", count);

            if self.event_sender.send(PlatformEvent::Pointer(events)).is_err() {
                warn!(
                    target: "platform::input",
                    "Channel disconnected, dropping {} pointer events",
                    count
                );
            }
        }
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window if it doesn't exist yet. On mobile, this may be
    /// called multiple times (suspend/resume cycle).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
            .with_resizable(false);

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                let _ = self.event_sender.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                let _ = self.event_sender.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::CursorMoved { position, .. } => self.track_cursor(position),

            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => self.record_release(),

            WindowEvent::RedrawRequested => {
                // Frame boundary
                self.flush_pointer_buffer();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn config() -> WindowConfig {
        WindowConfig {
            title: "Test".into(),
            width: 800.0,
            height: 600.0,
        }
    }

    #[test]
    fn platform_creation() {
        let (tx, _rx) = unbounded();
        let platform = Platform::new(tx, config());
        assert!(platform.window().is_none(), "Window should be created lazily");
    }

    #[test]
    fn flush_empty_buffer_is_noop() {
        let (tx, rx) = unbounded();
        let mut platform = Platform::new(tx, config());

        platform.flush_pointer_buffer();

        assert!(rx.try_recv().is_err(), "No events should be sent for empty buffer");
    }

    #[test]
    fn release_uses_last_cursor_position() {
        let (tx, rx) = unbounded();
        let mut platform = Platform::new(tx, config());

        platform.track_cursor(PhysicalPosition::new(120.0, 45.0));
        platform.record_release();
        platform.flush_pointer_buffer();

        match rx.try_recv() {
            Ok(PlatformEvent::Pointer(events)) => {
                assert_eq!(events, vec![PointerEvent::Released { x: 120.0, y: 45.0 }]);
            }
            other => panic!("Expected Pointer event, got {:?}", other),
        }
    }

    #[test]
    fn flush_handles_disconnected_channel() {
        let (tx, rx) = unbounded();
        let mut platform = Platform::new(tx, config());
        platform.record_release();

        drop(rx);

        // Should not panic, just log warning
        platform.flush_pointer_buffer();
    }

    #[test]
    fn multiple_flushes_clear_buffer() {
        let (tx, rx) = unbounded();
        let mut platform = Platform::new(tx, config());
        platform.record_release();

        platform.flush_pointer_buffer();
        platform.flush_pointer_buffer();

        assert!(rx.try_recv().is_ok(), "First flush should send");
        assert!(rx.try_recv().is_err(), "Second flush should not send");
    }
}
