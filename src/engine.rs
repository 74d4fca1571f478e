//=========================================================================
// Aetheric Stage Engine
//
// Main entry point: configures the stage, runs the logic thread and the
// window.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_tps()              ├─ init(|systems, context| ...)
//         ├─ with_channel_capacity() └─ run(): spawns logic thread,
//         ├─ with_stage_size()                runs window,
//         └─ with_title()                     blocks until exit
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::globals::{GlobalContext, GlobalSystems};
use crate::core::platform_bridge::PlatformEvent;
use crate::core::CoreSystemsOrchestrator;
use crate::platform::{Platform, WindowConfig};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (scene updates per second, `dt = 1 / TPS`)
/// - **Channel capacity**: 128 events
/// - **Stage size**: 800 x 600 logical pixels
/// - **Title**: "Aetheric Stage"
///
/// # Examples
///
/// ```no_run
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
/// EngineBuilder::new()
///     .with_tps(120.0)
///     .with_stage_size(1024.0, 768.0)
///     .with_title("Menu Demo")
///     .build()
///     .init(|systems, context| {
///         let root = context.stage.create_node();
///         let title = Box::new(Title { core: SceneCore::new(root) });
///         systems.scene_stack.push(title, &mut context.stage);
///     })
///     .run();
/// ```
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    stage_width: f32,
    stage_height: f32,
    title: String,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            stage_width: 800.0,
            stage_height: 600.0,
            title: "Aetheric Stage".to_string(),
        }
    }

    /// Sets the target ticks per second for the logic thread.
    ///
    /// Every tick advances the scene stack by `1 / tps` seconds.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the stage size, which is also the window's inner size and the
    /// distance of the default slide transitions.
    ///
    /// # Panics
    ///
    /// Panics unless both dimensions are positive.
    pub fn with_stage_size(mut self, width: f32, height: f32) -> Self {
        assert!(
            width > 0.0 && height > 0.0,
            "Stage size must be positive, got {}x{}",
            width,
            height
        );
        self.stage_width = width;
        self.stage_height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builds the engine instance.
    pub fn build(self) -> Engine {
        info!(
            "Building engine (TPS: {}, channel: {}, stage: {}x{})",
            self.tps, self.channel_capacity, self.stage_width, self.stage_height
        );

        Engine {
            orchestrator: CoreSystemsOrchestrator::new(self.stage_width, self.stage_height),
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            window: WindowConfig {
                title: self.title,
                width: self.stage_width,
                height: self.stage_height,
            },
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Runtime facade. Create via [`EngineBuilder`].
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Logic Thread @ TPS)
///   │     └─► Stage, SceneStack
///   │
///   └─► Platform (Event Loop)
///         └─► Window, pointer releases
///
/// Communication: crossbeam channel (PlatformEvent)
/// ```
pub struct Engine {
    orchestrator: CoreSystemsOrchestrator,
    tps: f64,
    channel_capacity: usize,
    window: WindowConfig,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Gives mutable access to the scene stack and the stage before the
    /// engine starts running.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut GlobalSystems, &mut GlobalContext),
    {
        info!("Initializing engine systems");

        self.orchestrator.init_systems(init_fn);

        info!("Engine initialization complete");
        self
    }

    //--- Execution --------------------------------------------------------

    /// Starts the engine runtime and blocks until the application exits.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the channel for platform → core communication
    /// 2. Spawns the logic thread running at the configured TPS
    /// 3. Runs the platform event loop (blocks here)
    /// 4. On window close: the logic thread tears the scene stack down
    ///    and terminates
    pub fn run(self) {
        info!("Starting engine runtime (TPS: {})", self.tps);

        //--- 1. Create communication channel -----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        info!("Channel created (capacity: {})", self.channel_capacity);

        //--- 2. Spawn the core logic thread -------------------------------
        let core_handle = self.orchestrator.spawn_core_thread(rx, self.tps);
        info!("Core logic thread spawned");

        //--- 3. Launch the platform subsystem -----------------------------
        let platform = Platform::new(tx, self.window);
        info!("Platform initialized, entering event loop");

        if let Err(e) = platform.run() {
            error!("Platform error: {}", e);
        }

        info!("Platform event loop exited");

        //--- 4. Cleanup: Wait for logic thread to terminate --------------
        match core_handle.join() {
            Ok(()) => {
                info!("Core thread terminated cleanly");
            }
            Err(e) => {
                error!("Core thread panicked: {:?}", e);
            }
        }

        info!("Engine shutdown complete");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
