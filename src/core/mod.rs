//=========================================================================
// Core Systems Orchestrator
//
// Central coordinator for the systems running on the logic (non-platform)
// thread.
//
// Responsibilities:
// - Own the scene stack (GlobalSystems) and the stage it draws into
//   (GlobalContext)
// - Receive platform events via the crossbeam channel
// - Tick every system at a fixed rate (TPS) with a fixed `dt`
// - Tear the scene stack down when the platform shuts down
//
// Notes:
// The orchestrator runs independently from the platform layer.
// Communication with the platform occurs only through message passing,
// so nothing here touches the window.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::thread;
use std::time::{Duration, Instant};

//=== External Crates =====================================================
use crossbeam_channel::Receiver;
use log::info;

//=== Public Modules ======================================================
pub mod display;
pub mod error;
pub mod globals;
pub mod scene;
pub mod tween;

pub(crate) mod platform_bridge;

//=== Internal Modules ====================================================
use globals::{GlobalContext, GlobalSystems};
use platform_bridge::{EventCollector, PlatformEvent, TickControl};

//=== CoreSystemsOrchestrator =============================================
//
// Owns the systems and their shared context until the logic thread is
// spawned, then moves both into it.
//
pub(crate) struct CoreSystemsOrchestrator {
    systems: GlobalSystems,
    context: GlobalContext,
}

impl CoreSystemsOrchestrator {
    //--- Construction -----------------------------------------------------
    //
    // Initializes all core systems but does not yet start the logic thread.
    //
    pub fn new(stage_width: f32, stage_height: f32) -> Self {
        Self {
            systems: GlobalSystems::new(),
            context: GlobalContext::new(stage_width, stage_height),
        }
    }

    //--- init_systems() ---------------------------------------------------
    //
    // Gives the host one chance to push its first scenes and build
    // display content before the logic thread takes ownership.
    //
    pub fn init_systems<F>(&mut self, init_fn: F)
    where
        F: FnOnce(&mut GlobalSystems, &mut GlobalContext),
    {
        init_fn(&mut self.systems, &mut self.context);
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Spawns the logic thread ticking all core systems at a fixed update
    // frequency (TPS - ticks per second).
    //
    // Each tick:
    //  1. Collects platform events
    //  2. Updates the scene stack with dt = 1 / TPS
    //  3. Sleeps to maintain fixed pacing
    //  4. Exits (tearing scenes down) when a shutdown signal is received
    //
    pub fn spawn_core_thread(
        self,
        receiver: Receiver<PlatformEvent>,
        tps: f64,
    ) -> thread::JoinHandle<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);
        let dt = frame_duration.as_secs_f32();

        thread::spawn(move || {
            let mut systems = self.systems;
            let mut context = self.context;
            let mut collector = EventCollector::new(receiver);

            info!("Core thread started ({} TPS)", tps);

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather platform events ------------------------
                if collector.collect_frame() == TickControl::Exit {
                    info!("Core thread exiting.");
                    break;
                }
                context
                    .frame_pointer
                    .extend(collector.take_pointer_events());

                //--- Step 2: Update systems --------------------------------
                systems.update(dt, &mut context);

                //--- Step 3: Maintain deterministic pacing ----------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }

            systems.shutdown(&mut context);
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::display::{Attribute, DisplayTree};
    use crate::core::scene::{Scene, SceneCore};
    use crossbeam_channel::unbounded;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct Watched {
        core: SceneCore,
        ended: Arc<AtomicBool>,
    }

    impl Scene for Watched {
        fn core(&self) -> &SceneCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut SceneCore {
            &mut self.core
        }

        fn end(&mut self) {
            self.core.release_stack();
            self.ended.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn init_systems_sees_stage_size() {
        let mut orchestrator = CoreSystemsOrchestrator::new(320.0, 240.0);

        orchestrator.init_systems(|systems, context| {
            assert_eq!(context.stage.size(), (320.0, 240.0));
            assert!(systems.scene_stack.is_empty());
        });
    }

    #[test]
    fn init_push_is_primed_before_thread_starts() {
        let mut orchestrator = CoreSystemsOrchestrator::new(320.0, 240.0);
        let mut root = None;

        orchestrator.init_systems(|systems, context| {
            let node = context.stage.create_node();
            root = Some(node);
            let scene = Box::new(Watched {
                core: SceneCore::new(node),
                ended: Arc::new(AtomicBool::new(false)),
            });
            systems.scene_stack.push(scene, &mut context.stage);
        });

        let root = root.unwrap();
        assert_eq!(orchestrator.context.stage.attribute(root, Attribute::X), Some(-320.0));
    }

    #[test]
    fn window_closed_stops_thread_and_tears_down() {
        let mut orchestrator = CoreSystemsOrchestrator::new(320.0, 240.0);
        let ended = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ended);

        orchestrator.init_systems(move |systems, context| {
            let scene = Box::new(Watched {
                core: SceneCore::new(context.stage.create_node()),
                ended: flag,
            });
            systems.scene_stack.push(scene, &mut context.stage);
        });

        let (tx, rx) = unbounded();
        let handle = orchestrator.spawn_core_thread(rx, 240.0);
        tx.send(PlatformEvent::WindowClosed).unwrap();

        handle.join().unwrap();
        assert!(ended.load(Ordering::SeqCst), "Scenes are ended on shutdown");
    }
}
