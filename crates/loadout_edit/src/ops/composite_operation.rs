//! Composite operation - many sub-operations performed as one transaction

use std::sync::Arc;

use crate::message::{MessageBuffer, MessageSink};
use crate::{EditError, Result};

use super::Operation;

type BuildFn<S, M> = Box<dyn FnMut(&S, &mut TransactionBuilder<S, M>) -> Result<()> + Send + Sync>;

/// Deferred build state of a composite.
enum BuildState<S, M> {
    /// The build step has not run yet, or its last attempt failed.
    Pending(BuildFn<S, M>),
    /// The sub-operation list is in place.
    Built,
}

/// Handle the build step uses to assemble a transaction.
pub struct TransactionBuilder<S, M> {
    operations: Vec<Box<dyn Operation<S>>>,
    buffer: MessageBuffer<M>,
}

impl<S, M> TransactionBuilder<S, M> {
    /// Append a sub-operation. Insertion order is apply order; undo runs in
    /// exactly the reverse order.
    pub fn add_op(&mut self, op: impl Operation<S> + 'static) {
        self.operations.push(Box::new(op));
    }

    /// The transaction scoped message buffer. Sub-operations keep a clone
    /// and post notifications into it; nothing reaches the sink until the
    /// whole transaction has finished.
    pub fn message_buffer(&self) -> MessageBuffer<M> {
        self.buffer.clone()
    }
}

/// An operation that should be considered as one but actually consists of
/// many smaller operations, all performed in order as a single transaction.
///
/// The sub-operation list is populated exactly once, by the build step, the
/// first time the composite is applied (or by [`prepare`]). If a
/// sub-operation fails to apply, everything applied before it is undone in
/// reverse order and the fault is re-raised, so observers never see a
/// partially applied transaction. Messages posted by sub-operations are
/// buffered and handed to the sink once the transaction reaches a terminal
/// state.
///
/// [`prepare`]: CompositeOperation::prepare
pub struct CompositeOperation<S, M> {
    description: String,
    operations: Vec<Box<dyn Operation<S>>>,
    buffer: MessageBuffer<M>,
    sink: Option<Arc<dyn MessageSink<M>>>,
    build: BuildState<S, M>,
}

impl<S, M> CompositeOperation<S, M> {
    /// Creates a composite with the given description and build step.
    ///
    /// The build step runs once, immediately before the first apply. It may
    /// inspect the state to validate preconditions; a returned fault
    /// propagates out of `apply` with the composite left untouched, and the
    /// build is retried on the next apply. `sink` receives the buffered
    /// messages of every completed transaction; `None` discards them.
    pub fn new<F>(description: impl Into<String>, sink: Option<Arc<dyn MessageSink<M>>>, build: F) -> Self
    where
        F: FnMut(&S, &mut TransactionBuilder<S, M>) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            operations: Vec::new(),
            buffer: MessageBuffer::new(),
            sink,
            build: BuildState::Pending(Box::new(build)),
        }
    }

    /// Run the build step ahead of the first apply, e.g. to surface
    /// precondition faults early. Does nothing if already built.
    ///
    /// # Errors
    ///
    /// Whatever the build step returns.
    pub fn prepare(&mut self, state: &S) -> Result<()> {
        self.build_once(state)
    }

    pub fn is_prepared(&self) -> bool {
        matches!(self.build, BuildState::Built)
    }

    fn build_once(&mut self, state: &S) -> Result<()> {
        let BuildState::Pending(build) = &mut self.build else {
            return Ok(());
        };
        let mut tx = TransactionBuilder {
            operations: Vec::new(),
            buffer: self.buffer.clone(),
        };
        match build(state, &mut tx) {
            Ok(()) => {
                self.operations = tx.operations;
                self.build = BuildState::Built;
                Ok(())
            }
            Err(err) => {
                // The half-assembled transaction is dropped; the next apply
                // retries the build.
                self.buffer.clear();
                Err(err)
            }
        }
    }
}

impl<S: 'static, M: Send + 'static> Operation<S> for CompositeOperation<S, M> {
    fn describe(&self) -> String {
        self.description.clone()
    }

    fn apply(&mut self, state: &mut S) -> Result<()> {
        self.build_once(state)?;

        for index in 0..self.operations.len() {
            if let Err(err) = self.operations[index].apply(state) {
                // Rollback the transaction: undo what already applied, in
                // reverse order, then re-raise the original fault.
                for applied in self.operations[..index].iter_mut().rev() {
                    if let Err(undo_err) = applied.undo(state) {
                        log::warn!("Failed to roll back '{}': {}", applied.describe(), undo_err);
                    }
                }
                self.buffer.clear();
                return Err(err);
            }
        }

        self.buffer.deliver_to(self.sink.as_deref());
        Ok(())
    }

    fn undo(&mut self, state: &mut S) -> Result<()> {
        if !self.is_prepared() {
            return Err(EditError::UndoBeforeApply);
        }

        // Do it in the "right", i.e. backwards, order.
        for op in self.operations.iter_mut().rev() {
            op.undo(state)?;
        }

        self.buffer.deliver_to(self.sink.as_deref());
        Ok(())
    }
}

impl<S: 'static, M> PartialEq for CompositeOperation<S, M> {
    /// Structural equivalence: same description and the same built
    /// sub-operation sequence, compared by description.
    fn eq(&self, other: &Self) -> bool {
        self.description == other.description
            && self.operations.len() == other.operations.len()
            && self
                .operations
                .iter()
                .zip(&other.operations)
                .all(|(a, b)| a.describe() == b.describe())
    }
}
