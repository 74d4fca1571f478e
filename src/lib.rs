//=========================================================================
// Aetheric Stage: Library Root
//
// Per-object property tweening and a transition-aware scene stack for
// tick-driven 2D applications.
//
// Responsibilities:
// - Expose the tween engine, the scene stack and the display tree they
//   animate (`core`)
// - Expose the runtime facade (`EngineBuilder` / `Engine`) that ticks the
//   scene stack on a logic thread and feeds it pointer input from a window
// - Keep the winit integration (`platform`) private
//
// Typical usage:
// ```no_run
// use aetheric_stage::prelude::*;
//
// fn main() {
//     EngineBuilder::new().build().run();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds everything that runs on the logic thread and can be driven
// directly by a host that brings its own loop: display tree, tweens,
// scenes.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the winit window and event loop and is not part of
// the public API surface.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------
pub use engine::{Engine, EngineBuilder};
