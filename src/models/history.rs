//! Snapshot-based undo history.
//!
//! A step stores the state before and after a group of operations. Groups
//! nest; only the outermost one takes a snapshot and records a step.

use crate::error::HostError;

/// Maximum number of undo levels
pub const MAX_UNDO_LEVELS: usize = 50;

#[derive(Debug, Clone)]
struct Step<S> {
    label: String,
    before: S,
    after: S,
}

#[derive(Debug, Clone)]
struct OpenGroup<S> {
    label: String,
    before: S,
    depth: usize,
}

#[derive(Debug, Clone)]
pub struct History<S> {
    undo_stack: Vec<Step<S>>,
    redo_stack: Vec<Step<S>>,
    open: Option<OpenGroup<S>>,
    max_levels: usize,
}

impl<S: Clone> History<S> {
    pub fn new() -> Self {
        Self::with_max_levels(MAX_UNDO_LEVELS)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            open: None,
            max_levels,
        }
    }

    /// Open a group; `current` is snapshotted when no group is open yet.
    pub fn begin(&mut self, label: &str, current: &S) {
        match &mut self.open {
            Some(group) => group.depth += 1,
            None => {
                self.open = Some(OpenGroup {
                    label: label.to_string(),
                    before: current.clone(),
                    depth: 1,
                })
            }
        }
    }

    /// Close the innermost group. Closing the outermost one records a step
    /// and clears the redo stack.
    pub fn end(&mut self, current: &S) -> Result<(), HostError> {
        let group = self.open.as_mut().ok_or(HostError::NoOpenUndoGroup)?;
        group.depth -= 1;
        if group.depth > 0 {
            return Ok(());
        }

        if let Some(group) = self.open.take() {
            self.undo_stack.push(Step {
                label: group.label,
                before: group.before,
                after: current.clone(),
            });
            self.redo_stack.clear();

            while self.undo_stack.len() > self.max_levels {
                self.undo_stack.remove(0);
            }
        }
        Ok(())
    }

    /// Discard the open group at every nesting level and return the state it
    /// started from.
    pub fn abort(&mut self) -> Result<S, HostError> {
        self.open
            .take()
            .map(|group| group.before)
            .ok_or(HostError::NoOpenUndoGroup)
    }

    /// State to restore for undo, or `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<Option<S>, HostError> {
        self.ensure_closed()?;
        Ok(self.undo_stack.pop().map(|step| {
            let before = step.before.clone();
            self.redo_stack.push(step);
            before
        }))
    }

    /// State to restore for redo, or `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Result<Option<S>, HostError> {
        self.ensure_closed()?;
        Ok(self.redo_stack.pop().map(|step| {
            let after = step.after.clone();
            self.undo_stack.push(step);
            after
        }))
    }

    fn ensure_closed(&self) -> Result<(), HostError> {
        match self.open {
            Some(_) => Err(HostError::Internal(
                "undo history is busy with an open group".to_string(),
            )),
            None => Ok(()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Labels of undoable steps, oldest first.
    pub fn labels(&self) -> Vec<&str> {
        self.undo_stack.iter().map(|s| s.label.as_str()).collect()
    }
}

impl<S: Clone> Default for History<S> {
    fn default() -> Self {
        Self::new()
    }
}
