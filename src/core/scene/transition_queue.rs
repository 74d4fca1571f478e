//=========================================================================
// Transition Queue
//=========================================================================
//
// Deferred stack commands.
//
// Scenes and press handlers cannot borrow the stack that is updating
// them, so they queue commands through a cloneable `CommandSender`. The
// core loop applies the queue at the tick boundary, after the update.
//
//   press handler ──► CommandSender ──► channel ──► TransitionQueue::take
//                                                        │
//                                              SceneStack::apply(...)
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::warn;

//=== Internal Dependencies ===============================================

use super::Scene;

//=== StackCommand ========================================================

/// A deferred [`SceneStack`](super::SceneStack) operation.
pub enum StackCommand {
    Push(Box<dyn Scene>),
    Pop,
    Replace(Box<dyn Scene>),
    /// Removes `count - 1` scenes, then pushes.
    ReplacePop(Box<dyn Scene>, usize),
}

impl std::fmt::Debug for StackCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Push(_) => write!(f, "Push"),
            Self::Pop => write!(f, "Pop"),
            Self::Replace(_) => write!(f, "Replace"),
            Self::ReplacePop(_, count) => write!(f, "ReplacePop({})", count),
        }
    }
}

//=== TransitionQueue =====================================================

/// Receiving end of the command channel, drained once per tick.
pub struct TransitionQueue {
    sender: Sender<StackCommand>,
    receiver: Receiver<StackCommand>,
}

impl Default for TransitionQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// New handle for queueing commands. Handles are `Send` and cloneable.
    pub fn sender(&self) -> CommandSender {
        CommandSender {
            sender: self.sender.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Takes every command queued so far, leaving the queue empty.
    pub fn take(&self) -> Vec<StackCommand> {
        self.receiver.try_iter().collect()
    }
}

//=== CommandSender =======================================================

/// Cloneable handle for queueing [`StackCommand`]s.
#[derive(Clone)]
pub struct CommandSender {
    sender: Sender<StackCommand>,
}

impl std::fmt::Debug for CommandSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSender").finish_non_exhaustive()
    }
}

impl CommandSender {
    /// Queues `command`. Returns `false` if the queue no longer exists.
    pub fn send(&self, command: StackCommand) -> bool {
        match self.sender.send(command) {
            Ok(()) => true,
            Err(e) => {
                warn!(target: "scene", "Dropped {:?}: transition queue is gone", e.0);
                false
            }
        }
    }

    pub fn push(&self, scene: Box<dyn Scene>) -> bool {
        self.send(StackCommand::Push(scene))
    }

    pub fn pop(&self) -> bool {
        self.send(StackCommand::Pop)
    }

    pub fn replace(&self, scene: Box<dyn Scene>) -> bool {
        self.send(StackCommand::Replace(scene))
    }

    pub fn replace_pop(&self, scene: Box<dyn Scene>, count: usize) -> bool {
        self.send(StackCommand::ReplacePop(scene, count))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
