//! Operation primitives: the reversible operation contract, the
//! transactional composite, and the history stack.

mod operation;
pub use operation::Operation;

mod composite_operation;
pub use composite_operation::{CompositeOperation, TransactionBuilder};

mod operation_stack;
pub use operation_stack::OperationStack;
