/// Phases a row goes through between the delete gesture and its removal
/// from the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePhase {
    Idle,
    Sliding,
    Fading,
    Collapsing,
    Committed,
}

impl DeletePhase {
    fn next(self) -> Self {
        match self {
            DeletePhase::Idle => DeletePhase::Idle,
            DeletePhase::Sliding => DeletePhase::Fading,
            DeletePhase::Fading => DeletePhase::Collapsing,
            DeletePhase::Collapsing | DeletePhase::Committed => DeletePhase::Committed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStep {
    /// Nothing to do: not started, or already committed.
    Ignored,
    /// Run the animation for this phase, then call `advance` again.
    Animate(DeletePhase),
    /// Remove the row now. Reported once per sequence.
    Commit,
}

/// Per-row delete sequence. `start` latches so a second tap on a row that
/// is already leaving does nothing.
#[derive(Debug, Clone)]
pub struct DeleteSequence {
    task_id: String,
    phase: DeletePhase,
    latched: bool,
}

impl DeleteSequence {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            phase: DeletePhase::Idle,
            latched: false,
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn phase(&self) -> DeletePhase {
        self.phase
    }

    pub fn is_committed(&self) -> bool {
        self.phase == DeletePhase::Committed
    }

    pub fn start(&mut self) -> DeleteStep {
        if self.latched {
            return DeleteStep::Ignored;
        }
        self.latched = true;
        self.phase = DeletePhase::Sliding;
        DeleteStep::Animate(self.phase)
    }

    /// Call when the current phase's animation has finished.
    pub fn advance(&mut self) -> DeleteStep {
        match self.phase {
            DeletePhase::Idle | DeletePhase::Committed => DeleteStep::Ignored,
            phase => {
                self.phase = phase.next();
                if self.phase == DeletePhase::Committed {
                    DeleteStep::Commit
                } else {
                    DeleteStep::Animate(self.phase)
                }
            }
        }
    }
}
