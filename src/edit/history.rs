//! The descriptive change ledger.
//!
//! [`ChangeHistory`] keeps undo/redo stacks of human-readable operation
//! descriptors plus an append-only log of everything that happened,
//! including "Undo:"/"Redo:" narration. Recording a new operation clears
//! the redo stack (standard editor behavior).
//!
//! The ledger is descriptive, not transactional: it never stores the field
//! values needed to reconstruct state. [`undo`](ChangeHistory::undo) and
//! [`redo`](ChangeHistory::redo) only tell the caller that the host's own
//! undo engine should now be asked to step once. If the host engine's
//! position desynchronizes from this ledger's stack depth (an operation
//! outside this core changed host undo state), the two stay inconsistent —
//! there is no automatic reconciliation.

use std::fmt;

/// Undo/redo stacks of operation descriptors plus an append-only history
/// log.
///
/// # Example
///
/// ```
/// use scene_workbench::ChangeHistory;
///
/// let mut history = ChangeHistory::new();
/// history.record("Applied transform to 3 entities");
///
/// let undone = history.undo().unwrap();
/// assert_eq!(undone, "Applied transform to 3 entities");
/// assert!(history.can_redo());
/// ```
#[derive(Default)]
pub struct ChangeHistory {
    undo_stack: Vec<String>,
    redo_stack: Vec<String>,
    log: Vec<String>,
}

impl ChangeHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a committed operation: pushes its descriptor onto the undo
    /// stack, clears the redo stack entirely, and appends the descriptor
    /// verbatim to the log.
    pub fn record(&mut self, description: impl Into<String>) {
        let description = description.into();
        self.undo_stack.push(description.clone());
        self.redo_stack.clear();
        self.log.push(description);
    }

    /// Appends an entry to the log only, with no effect on either stack.
    ///
    /// Used for state-transition events that are not themselves tracked as
    /// undoable operations.
    pub fn add_note(&mut self, note: impl Into<String>) {
        self.log.push(note.into());
    }

    /// Pops the most recent operation onto the redo stack and returns its
    /// descriptor so the caller can ask the host engine for one physical
    /// undo step. Returns `None` (and logs nothing) when there is nothing
    /// to undo.
    pub fn undo(&mut self) -> Option<String> {
        let description = self.undo_stack.pop()?;
        self.redo_stack.push(description.clone());
        self.log.push(format!("Undo: {description}"));
        Some(description)
    }

    /// Symmetric to [`undo`](Self::undo): moves the top redo entry back to
    /// the undo stack and returns its descriptor. Returns `None` when there
    /// is nothing to redo.
    pub fn redo(&mut self) -> Option<String> {
        let description = self.redo_stack.pop()?;
        self.undo_stack.push(description.clone());
        self.log.push(format!("Redo: {description}"));
        Some(description)
    }

    /// Returns `true` if there are operations that can be undone.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns `true` if there are operations that can be redone.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Returns the number of operations on the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Returns the number of operations on the redo stack.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// The full append-only log, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.log
    }

    /// Iterates over undo descriptors, most recent first.
    pub fn undo_descriptions(&self) -> impl Iterator<Item = &str> {
        self.undo_stack.iter().rev().map(String::as_str)
    }

    /// Iterates over redo descriptors, most recent first.
    pub fn redo_descriptions(&self) -> impl Iterator<Item = &str> {
        self.redo_stack.iter().rev().map(String::as_str)
    }

    /// Clears both stacks and the log.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.log.clear();
    }
}

impl fmt::Debug for ChangeHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeHistory")
            .field("undo_count", &self.undo_stack.len())
            .field("redo_count", &self.redo_stack.len())
            .field("log_len", &self.log.len())
            .finish()
    }
}
