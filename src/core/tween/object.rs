//=========================================================================
// Object Tween
//=========================================================================
//
// Drives the six animatable attributes of one display node.
//
// Architecture:
//   ObjectTween
//     ├─ target: NodeId                     (non-owning)
//     ├─ snapshot: [f32; 6]                 (attribute values at bind time)
//     └─ tracks: [AttributeTween; 6]        (indexed by Attribute)
//
// Configuration comes in two flavors sharing the same semantics:
// consuming builder methods for construction chains, and `&mut self`
// setters for tweens already owned by a TweenSet. Later calls on the
// same attribute override earlier ones.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicU64, Ordering};

use log::trace;

//=== Internal Dependencies ===============================================

use super::attribute::{AttributeTween, RepeatStyle};
use super::easing::Interpolator;
use crate::core::display::{Attribute, DisplayTree, NodeId};
use crate::core::error::TweenError;

//=== TweenId =============================================================

/// Process-unique identity of an [`ObjectTween`].
///
/// Clones of a tween share its identity, so a [`TweenSet`](super::TweenSet)
/// accepts at most one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(u64);

impl TweenId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

//=== ObjectTween =========================================================

/// Per-node tween over position, scale, rotation and opacity.
///
/// # Examples
///
/// ```
/// use aetheric_stage::prelude::*;
///
/// let mut stage = Stage::new(800.0, 600.0);
/// let label = stage.create_node();
///
/// let mut tween = ObjectTween::bind(&stage, label)
///     .unwrap()
///     .ease_all(easing::linear)
///     .x(0.0, 0.5)
///     .source(Attribute::X, -200.0)
///     .pong(Attribute::Rotation, 45.0, 1.0)
///     .tagged("title");
///
/// tween.advance(0.25, &mut stage);
/// assert_eq!(stage.attribute(label, Attribute::X), Some(-100.0));
/// ```
#[derive(Debug, Clone)]
pub struct ObjectTween {
    id: TweenId,
    target: NodeId,
    tag: Option<String>,
    snapshot: [f32; Attribute::COUNT],
    tracks: [AttributeTween; Attribute::COUNT],
}

impl ObjectTween {
    //--- Construction -----------------------------------------------------

    /// Binds a new, fully inactive tween to `target`.
    ///
    /// The target's current attribute values become the sources of every
    /// attribute configured later.
    ///
    /// # Errors
    ///
    /// Returns [`TweenError::UnknownNode`] if `target` is not a live node.
    pub fn bind(display: &dyn DisplayTree, target: NodeId) -> Result<Self, TweenError> {
        let mut snapshot = [0.0; Attribute::COUNT];
        for attr in Attribute::ALL {
            snapshot[attr.index()] = display
                .attribute(target, attr)
                .ok_or(TweenError::UnknownNode(target))?;
        }

        Ok(Self {
            id: TweenId::next(),
            target,
            tag: None,
            snapshot,
            tracks: [AttributeTween::new(); Attribute::COUNT],
        })
    }

    //--- Builder: Single Attribute ----------------------------------------

    /// Animates `attr` from its bound value to `destination`.
    pub fn tween(mut self, attr: Attribute, destination: f32, duration: f32, style: RepeatStyle) -> Self {
        self.configure_attribute(attr, destination, duration, style);
        self
    }

    pub fn x(self, destination: f32, duration: f32) -> Self {
        self.tween(Attribute::X, destination, duration, RepeatStyle::Linear)
    }

    pub fn y(self, destination: f32, duration: f32) -> Self {
        self.tween(Attribute::Y, destination, duration, RepeatStyle::Linear)
    }

    pub fn scale_x(self, destination: f32, duration: f32) -> Self {
        self.tween(Attribute::ScaleX, destination, duration, RepeatStyle::Linear)
    }

    pub fn scale_y(self, destination: f32, duration: f32) -> Self {
        self.tween(Attribute::ScaleY, destination, duration, RepeatStyle::Linear)
    }

    pub fn rotation(self, destination: f32, duration: f32) -> Self {
        self.tween(Attribute::Rotation, destination, duration, RepeatStyle::Linear)
    }

    pub fn alpha(self, destination: f32, duration: f32) -> Self {
        self.tween(Attribute::Alpha, destination, duration, RepeatStyle::Linear)
    }

    /// Repeats `attr` forward forever, one cycle per `duration`.
    pub fn saw(self, attr: Attribute, destination: f32, duration: f32) -> Self {
        self.tween(attr, destination, duration, RepeatStyle::Saw)
    }

    /// Swings `attr` out and back forever, one round trip per `duration`.
    pub fn pong(self, attr: Attribute, destination: f32, duration: f32) -> Self {
        self.tween(attr, destination, duration, RepeatStyle::PingPong)
    }

    pub fn ease(mut self, attr: Attribute, interpolator: Interpolator) -> Self {
        self.set_interpolator(attr, interpolator);
        self
    }

    pub fn offset(mut self, attr: Attribute, seconds: f32) -> Self {
        self.set_initial_offset(attr, seconds);
        self
    }

    /// Starts `attr` from `value` instead of the bound value, keeping its
    /// destination.
    pub fn source(mut self, attr: Attribute, value: f32) -> Self {
        self.rebase_source(attr, value);
        self
    }

    //--- Builder: Compositions --------------------------------------------

    pub fn position(self, x: f32, y: f32, duration: f32) -> Self {
        self.x(x, duration).y(y, duration)
    }

    /// Uniform scale on both axes.
    pub fn scale(self, scale: f32, duration: f32) -> Self {
        self.scale_xy(scale, scale, duration)
    }

    pub fn scale_xy(self, x: f32, y: f32, duration: f32) -> Self {
        self.scale_x(x, duration).scale_y(y, duration)
    }

    pub fn source_position(self, x: f32, y: f32) -> Self {
        self.source(Attribute::X, x).source(Attribute::Y, y)
    }

    pub fn source_scale(self, scale: f32) -> Self {
        self.source(Attribute::ScaleX, scale).source(Attribute::ScaleY, scale)
    }

    /// Sets the interpolator of every attribute, active or not.
    pub fn ease_all(mut self, interpolator: Interpolator) -> Self {
        self.set_all_interpolators(interpolator);
        self
    }

    /// Sets the initial offset of every attribute, active or not.
    pub fn offset_all(mut self, seconds: f32) -> Self {
        self.set_all_initial_offsets(seconds);
        self
    }

    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.set_tag(tag);
        self
    }

    //--- In-Place Configuration -------------------------------------------

    /// # Panics
    ///
    /// Panics if `duration <= 0.0`.
    pub fn configure_attribute(
        &mut self,
        attr: Attribute,
        destination: f32,
        duration: f32,
        style: RepeatStyle,
    ) {
        let source = self.snapshot[attr.index()];
        self.tracks[attr.index()].configure(source, destination, 0.0, duration, style);
    }

    pub fn set_interpolator(&mut self, attr: Attribute, interpolator: Interpolator) {
        self.tracks[attr.index()].set_interpolator(interpolator);
    }

    pub fn set_initial_offset(&mut self, attr: Attribute, seconds: f32) {
        self.tracks[attr.index()].set_initial_offset(seconds);
    }

    /// Also used as the source if `attr` is configured afterwards.
    pub fn rebase_source(&mut self, attr: Attribute, value: f32) {
        self.snapshot[attr.index()] = value;
        self.tracks[attr.index()].rebase_source(value);
    }

    pub fn set_all_interpolators(&mut self, interpolator: Interpolator) {
        for track in self.tracks.iter_mut() {
            track.set_interpolator(interpolator);
        }
    }

    pub fn set_all_initial_offsets(&mut self, seconds: f32) {
        for track in self.tracks.iter_mut() {
            track.set_initial_offset(seconds);
        }
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = Some(tag.into());
    }

    //--- Press Signal -----------------------------------------------------

    /// Subscribes `handler` to the target's press signal.
    ///
    /// Returns `false` (and drops the handler) when the target cannot be
    /// pressed.
    pub fn attach_press_handler<F>(&self, display: &mut dyn DisplayTree, handler: F) -> bool
    where
        F: FnMut(NodeId) + Send + 'static,
    {
        display.subscribe_press(self.target, Box::new(handler))
    }

    //--- Update -----------------------------------------------------------

    /// Advances every active attribute by `dt` and writes the results to
    /// the target.
    ///
    /// Returns `true` once no linear attribute is still running.
    pub fn advance(&mut self, dt: f32, display: &mut dyn DisplayTree) -> bool {
        let mut finished = true;
        for track in self.tracks.iter_mut() {
            if !track.advance(dt) {
                finished = false;
            }
        }

        for attr in Attribute::ALL {
            let track = &self.tracks[attr.index()];
            if track.is_active() && !display.set_attribute(self.target, attr, track.evaluate()) {
                trace!(target: "tween", "Target {} of tween {:?} is gone", self.target, self.id);
            }
        }

        finished
    }

    //--- Accessors --------------------------------------------------------

    pub fn id(&self) -> TweenId {
        self.id
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn track(&self, attr: Attribute) -> &AttributeTween {
        &self.tracks[attr.index()]
    }

    /// Value the tween currently assigns to `attr`, if it drives it.
    pub fn value(&self, attr: Attribute) -> Option<f32> {
        let track = &self.tracks[attr.index()];
        track.is_active().then(|| track.evaluate())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
