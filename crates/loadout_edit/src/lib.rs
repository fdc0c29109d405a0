//! Transactional operation stack for build editing.
//!
//! Every mutation of a build goes through an [`OperationStack`]: it is
//! applied, recorded for undo/redo, optionally merged with its predecessor,
//! and rolled back as a unit when part of it fails. Concrete mutations
//! implement [`Operation`]; multi-step mutations are assembled as a
//! [`CompositeOperation`], which applies its parts all-or-nothing and
//! buffers outgoing notifications until the transaction is done.

mod error;
pub use error::{EditError, Result};

pub mod message;
pub use message::{MessageBuffer, MessageBus, MessageListener, MessageSink};

pub mod ops;
pub use ops::{CompositeOperation, Operation, OperationStack, TransactionBuilder};
