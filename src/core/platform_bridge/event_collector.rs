//=========================================================================
// Event Collector
//=========================================================================
//
// Platform event collector with bounded polling and shutdown detection.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → pointer events → TickControl
//
// Bounded polling prevents starvation. Idle sleep reduces CPU usage.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::{PlatformEvent, PointerEvent};

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Collects platform events with bounded polling.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    pointer: Vec<PointerEvent>,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            pointer: Vec::with_capacity(8),
        }
    }

    /// Collects pending platform events (bounded to prevent starvation).
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        const MAX_EVENTS_PER_FRAME: usize = 100;
        const IDLE_SLEEP_MS: u64 = 10;

        self.pointer.clear();
        let mut had_event = false;
        let mut drained = 0;

        while drained < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    had_event = true;
                    if self.handle_event(event) == TickControl::Exit {
                        return TickControl::Exit;
                    }
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= MAX_EVENTS_PER_FRAME {
            warn!("Event queue backlog: drained {} events this frame", drained);
        }

        if !had_event {
            thread::sleep(Duration::from_millis(IDLE_SLEEP_MS));
        }

        TickControl::Continue
    }

    /// Pointer events collected this frame, in arrival order.
    #[cfg(test)]
    pub(crate) fn pointer_events(&self) -> &[PointerEvent] {
        &self.pointer
    }

    /// Takes the collected pointer events, leaving an empty vec.
    pub(crate) fn take_pointer_events(&mut self) -> Vec<PointerEvent> {
        std::mem::take(&mut self.pointer)
    }

    fn handle_event(&mut self, event: PlatformEvent) -> TickControl {
        match event {
            PlatformEvent::Pointer(events) => {
                self.pointer.extend(events);
                TickControl::Continue
            }
            PlatformEvent::WindowClosed => TickControl::Exit,
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

    fn release(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Released { x, y }
    }

    #[test]
    fn collect_handles_empty_queue() {
        let (_tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);

        let result = collector.collect_frame();

        assert_eq!(result, TickControl::Continue);
        assert!(collector.pointer_events().is_empty());
    }

    #[test]
    fn collect_aggregates_multiple_batches() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::Pointer(vec![release(1.0, 2.0)])).unwrap();
        tx.send(PlatformEvent::Pointer(vec![release(3.0, 4.0), release(5.0, 6.0)]))
            .unwrap();

        let result = collector.collect_frame();

        assert_eq!(result, TickControl::Continue);
        assert_eq!(
            collector.pointer_events(),
            &[release(1.0, 2.0), release(3.0, 4.0), release(5.0, 6.0)]
        );
    }

    #[test]
    fn collect_returns_exit_on_window_closed() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::WindowClosed).unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }

    #[test]
    fn collect_clears_previous_frame() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::Pointer(vec![release(1.0, 1.0)])).unwrap();
        collector.collect_frame();
        assert_eq!(collector.pointer_events().len(), 1);

        tx.send(PlatformEvent::Pointer(Vec::new())).unwrap();
        collector.collect_frame();
        assert!(collector.pointer_events().is_empty());
    }

    #[test]
    fn take_leaves_collector_empty() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::Pointer(vec![release(1.0, 1.0)])).unwrap();
        collector.collect_frame();

        assert_eq!(collector.take_pointer_events().len(), 1);
        assert!(collector.pointer_events().is_empty());
    }

    #[test]
    fn collect_returns_exit_on_disconnect() {
        let (tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);

        drop(tx);

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }
}
