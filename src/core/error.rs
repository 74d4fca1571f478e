//=========================================================================
// Error Types
//=========================================================================
//
// Recoverable failures raised by the display and tween subsystems.
//
// Precondition violations on configuration values (non-positive
// durations, zero capacities) are not represented here: they panic at
// the call site with a descriptive message. Absent lookups return
// `Option` and redundant operations are no-ops.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::display::NodeId;

//=== StageError ==========================================================

/// Errors raised by [`DisplayTree`](crate::core::display::DisplayTree)
/// structural operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageError {
    /// The handle does not refer to a live node (never created or destroyed).
    UnknownNode(NodeId),

    /// Attaching `child` under `parent` would make a node its own ancestor.
    CyclicAttachment { parent: NodeId, child: NodeId },
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownNode(node) => write!(f, "Unknown display node {}", node),
            Self::CyclicAttachment { parent, child } => {
                write!(f, "Cannot attach {} under its own descendant {}", child, parent)
            }
        }
    }
}

impl std::error::Error for StageError {}

//=== TweenError ==========================================================

/// Errors raised while binding a tween to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenError {
    /// The tween target does not exist in the display tree.
    UnknownNode(NodeId),
}

impl std::fmt::Display for TweenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownNode(node) => write!(f, "Cannot tween unknown display node {}", node),
        }
    }
}

impl std::error::Error for TweenError {}

impl From<TweenError> for StageError {
    fn from(e: TweenError) -> Self {
        match e {
            TweenError::UnknownNode(node) => StageError::UnknownNode(node),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_implement_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<StageError>();
        assert_error::<TweenError>();
    }

    #[test]
    fn display_mentions_node() {
        let node = NodeId::new(3, 1);
        let msg = StageError::UnknownNode(node).to_string();
        assert!(msg.contains("#3"), "Message should name the node, got {:?}", msg);

        let msg = TweenError::UnknownNode(node).to_string();
        assert!(msg.contains("#3"));
    }
}
