//! Depth bounded undo/redo stack for build operations

use std::num::NonZeroUsize;

use crate::Result;

use super::Operation;

/// Models an operation stack that can be used for undo/redo.
///
/// Every mutation of a build goes through [`push_and_apply`]: the incoming
/// operation may first absorb the most recent history entries (merging), is
/// then applied, and only on success is recorded. The stack keeps at most
/// `depth` entries; pushing beyond that evicts the oldest entry without
/// undoing it, so its mutation stays in effect but can no longer be
/// reverted.
///
/// The stack performs no locking of its own. Callers that share a stack
/// across threads must serialize `push_and_apply`/`undo`/`redo` behind a
/// single mutual exclusion boundary per stack.
///
/// [`push_and_apply`]: OperationStack::push_and_apply
pub struct OperationStack<S> {
    actions: Vec<Box<dyn Operation<S>>>,
    /// Index of the last applied entry; `None` when empty or fully undone.
    current_op: Option<usize>,
    depth: usize,
}

impl<S: 'static> OperationStack<S> {
    /// Creates a new stack retaining at most `depth` undo steps.
    pub fn new(depth: NonZeroUsize) -> Self {
        Self {
            actions: Vec::new(),
            current_op: None,
            depth: depth.get(),
        }
    }

    /// Applies `op` and records it as the newest history entry.
    ///
    /// While the entry at the cursor reports [`Operation::can_merge`] for
    /// `op`, it is quietly undone first; this may walk back across several
    /// consecutive entries. If `op` then fails to apply, the walked-back
    /// entries are replayed so history and cursor end up exactly as before
    /// the call, and the fault is re-raised. On success every redo-reachable
    /// entry is discarded, `op` becomes the newest entry, and the oldest
    /// entries are evicted while the depth bound is exceeded.
    ///
    /// # Errors
    ///
    /// Re-raises whatever fault `op.apply` (or a merge-phase undo) raises;
    /// the operation is not recorded in that case.
    pub fn push_and_apply(&mut self, mut op: Box<dyn Operation<S>>, state: &mut S) -> Result<()> {
        // Perform automatic merging.
        let op_before_merge = self.current_op;
        while self.next_undo().is_some_and(|prev| prev.can_merge(op.as_ref())) {
            self.undo(state)?;
        }

        if let Err(err) = op.apply(state) {
            // Undo the merging if the new operation failed.
            while self.current_op != op_before_merge && self.next_redo().is_some() {
                if let Err(redo_err) = self.redo(state) {
                    log::warn!("Failed to replay '{}' after a failed apply: {}", self.redo_description().unwrap_or_default(), redo_err);
                    break;
                }
            }
            return Err(err);
        }

        // Previously undone entries in the list, including anything left
        // dangling by the merge walk, are no longer reachable.
        let keep = self.current_op.map_or(0, |index| index + 1);
        self.actions.truncate(keep);
        self.actions.push(op);
        self.current_op = Some(self.actions.len() - 1);

        while self.actions.len() > self.depth {
            self.actions.remove(0);
            self.current_op = self.current_op.and_then(|index| index.checked_sub(1));
        }
        Ok(())
    }

    /// Undoes the entry at the cursor; does nothing when there is none.
    ///
    /// # Errors
    ///
    /// Re-raises a fault from the entry's own `undo`; the cursor is left
    /// unmoved in that case.
    pub fn undo(&mut self, state: &mut S) -> Result<()> {
        let Some(index) = self.current_op else {
            return Ok(());
        };
        self.actions[index].undo(state)?;
        self.current_op = index.checked_sub(1);
        Ok(())
    }

    /// Re-applies the entry just above the cursor; does nothing when there
    /// is none.
    ///
    /// # Errors
    ///
    /// Re-raises a fault from the entry's `apply`; the cursor is left
    /// unmoved in that case.
    pub fn redo(&mut self, state: &mut S) -> Result<()> {
        let next = self.current_op.map_or(0, |index| index + 1);
        if next >= self.actions.len() {
            return Ok(());
        }
        self.actions[next].apply(state)?;
        self.current_op = Some(next);
        Ok(())
    }

    /// The entry the next call to [`undo`](OperationStack::undo) would act on.
    pub fn next_undo(&self) -> Option<&dyn Operation<S>> {
        self.current_op.map(|index| self.actions[index].as_ref())
    }

    /// The entry the next call to [`redo`](OperationStack::redo) would act on.
    pub fn next_redo(&self) -> Option<&dyn Operation<S>> {
        let next = self.current_op.map_or(0, |index| index + 1);
        self.actions.get(next).map(Box::as_ref)
    }

    pub fn can_undo(&self) -> bool {
        self.next_undo().is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.next_redo().is_some()
    }

    /// Description of the next undo step, for menus.
    pub fn undo_description(&self) -> Option<String> {
        self.next_undo().map(|op| op.describe())
    }

    /// Description of the next redo step, for menus.
    pub fn redo_description(&self) -> Option<String> {
        self.next_redo().map(|op| op.describe())
    }

    /// Number of retained history entries.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The configured retention bound.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Drops the whole history, e.g. when a new garage is loaded. The
    /// underlying build is left as it is.
    pub fn clear(&mut self) {
        self.actions.clear();
        self.current_op = None;
    }
}
