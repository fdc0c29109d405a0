use std::any::Any;

use crate::Result;

/// A single reversible mutation of a build.
///
/// Applying an operation performs the forward mutation; undoing it restores
/// the state of the affected build to what it was before the operation was
/// applied. Operations receive the edited state as an argument rather than
/// capturing it, so the history stack can own boxed operations without
/// aliasing the build they act on.
pub trait Operation<S>: Any + Send + Sync {
    /// A short human readable description of this operation.
    fn describe(&self) -> String;

    /// Perform the forward mutation.
    ///
    /// # Errors
    ///
    /// Any domain fault the mutation runs into; the operation must leave the
    /// state untouched when it fails.
    fn apply(&mut self, state: &mut S) -> Result<()>;

    /// Restore the state to what it was before `apply`.
    ///
    /// # Errors
    ///
    /// Any domain fault the inverse mutation runs into.
    fn undo(&mut self, state: &mut S) -> Result<()>;

    /// Checks if this (already applied) operation can be merged with a newer
    /// incoming operation. If this returns `true` the stack quietly undoes
    /// this entry and lets `other` replace it, so the premises `other` was
    /// constructed under may have changed by the time it is applied. An
    /// operation never merges with itself by identity.
    ///
    /// `Any` is a supertrait, so implementations can downcast `other` to
    /// decide compatibility by type.
    fn can_merge(&self, _other: &dyn Operation<S>) -> bool {
        false
    }
}
