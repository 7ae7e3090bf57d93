//! Error taxonomy for the approval workflow engine
use crate::entity::Status;
use crate::request::Category;
use crate::role::Role;

/// Failures surfaced by the workflow engine. All of these are returned as
/// typed results; nothing is retried or silently swallowed inside the core.
#[derive(thiserror::Error, Debug)]
pub enum WorkflowError {
    #[error("{role} is not the current approver for entity {id}")]
    NotAuthorizedApprover { id: String, role: Role },
    #[error("entity {id} is already {status} and accepts no further decisions")]
    AlreadyTerminal { id: String, status: Status },
    #[error("no workflow chain registered for category {0}")]
    UnknownCategory(Category),
    #[error("workflow chain for category {0} is empty")]
    EmptyChain(Category),
    #[error("no entity found with id {id}")]
    NotFound { id: String },
    #[error("entity {id} is a {category}, only products may be deleted")]
    NotDeletable { id: String, category: Category },
    #[error("replacement payload is a {got}, entity {id} is a {expected}")]
    CategoryMismatch {
        id: String,
        expected: Category,
        got: Category,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("storage failure")]
    Storage(#[from] sled::Error),
    #[error("failed to encode entity record")]
    Encode(#[from] minicbor::encode::Error<std::convert::Infallible>),
    #[error("failed to decode entity record")]
    Decode(#[from] minicbor::decode::Error),
    #[error("failed to generate entity id")]
    IdEncoding(#[from] bech32::EncodeError),
    #[error("entity store lock was poisoned")]
    LockPoisoned,
}

/// Payload validation failures. Checked before an entity is initialized so
/// the engine never performs a partial creation.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("required field '{0}' is missing or empty")]
    MissingField(&'static str),
    #[error("'{0}' must be greater than zero")]
    ZeroQuantity(&'static str),
    #[error("request must contain at least one item")]
    EmptyItems,
    #[error("logistics origin and destination must differ")]
    SameLocations,
}
