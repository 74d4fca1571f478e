//=========================================================================
// Tween System
//=========================================================================
//
// Time-driven interpolation of display node attributes.
//
// Architecture:
//   TweenSet
//     └─ ObjectTween (one per target node)
//          └─ AttributeTween × 6 (X, Y, ScaleX, ScaleY, Rotation, Alpha)
//               └─ Interpolator (fn pointer)
//
// Flow:
//   TweenSet::advance(dt) → ObjectTween::advance(dt) → AttributeTween::advance(dt)
//                                     ↓
//                       DisplayTree::set_attribute(target, ...)
//
// Completion: only `Linear` tracks can keep a set unfinished. `Saw` and
// `PingPong` repeat forever and never block.
//
//=========================================================================

//=== Module Declarations =================================================

mod attribute;
pub mod easing;
mod object;
mod set;

//=== Public API ==========================================================

pub use attribute::{AttributeTween, RepeatStyle};
pub use easing::Interpolator;
pub use object::{ObjectTween, TweenId};
pub use set::TweenSet;
