//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_stage::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder};

// Global systems and context
pub use crate::core::globals::{GlobalContext, GlobalSystems};

// Display tree
pub use crate::core::display::{
    clear_children, destroy_children, Attribute, DisplayTree, NodeId, Stage,
};

// Tweens
pub use crate::core::tween::{easing, ObjectTween, RepeatStyle, TweenId, TweenSet};

// Scene system
pub use crate::core::scene::{CommandSender, Scene, SceneCore, ScenePhase, SceneStack};

// Errors
pub use crate::core::error::{StageError, TweenError};
