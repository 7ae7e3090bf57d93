//! Role-based approval workflow engine for a cafe chain.
//!
//! Products and five request kinds each carry an ordered chain of approver
//! roles; the engine advances an entity through its chain one decision at a
//! time and records an immutable audit trail of every step.

pub mod catalog;
pub mod directory;
pub mod entity;
pub mod error;
pub mod ids;
pub mod machine;
pub mod request;
pub mod role;
pub mod service;
pub mod store;
pub mod visibility;

pub use catalog::Catalog;
pub use entity::{Action, ApprovalStep, Entity, Status, TimeStamp};
pub use error::{ValidationError, WorkflowError};
pub use machine::Decision;
pub use request::{Category, Payload};
pub use role::{Actor, Role};
pub use service::WorkflowService;
pub use store::{EntityStore, MemoryStore, SledStore};
