//! Workflow-governed entity records and their approval ledger
use chrono::{DateTime, TimeZone, Utc};

use crate::error::WorkflowError;
use crate::ids::new_entity_id;
use crate::request::{Category, Payload, Product};
use crate::role::Role;

/// Lifecycle status of an entity. `Approved` and `Rejected` are terminal.
///
/// Requests use the full four-value set; products use the three-value subset
/// and never enter `InProgress` (they stay `Pending` mid-chain).
#[derive(Debug, Clone, Copy, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub enum Status {
    #[n(0)]
    Pending,
    #[n(1)]
    InProgress,
    #[n(2)]
    Approved,
    #[n(3)]
    Rejected,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Approved | Status::Rejected)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Status::Pending => "pending",
            Status::InProgress => "in progress",
            Status::Approved => "approved",
            Status::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// What a ledger step recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub enum Action {
    #[n(0)]
    Approved,
    #[n(1)]
    Rejected,
    #[n(2)]
    Pending,
}

/// One entry of the append-only audit trail. Insertion order is
/// chronological order; entries are never reordered, truncated or edited.
#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct ApprovalStep {
    #[n(0)]
    pub role: Role,
    #[n(1)]
    pub actor_id: String,
    #[n(2)]
    pub action: Action,
    #[n(3)]
    pub timestamp: TimeStamp<Utc>,
    #[n(4)]
    pub notes: Option<String>,
}

impl ApprovalStep {
    pub fn new(role: Role, actor_id: String, action: Action, notes: Option<String>) -> Self {
        Self {
            role,
            actor_id,
            action,
            timestamp: TimeStamp::new(),
            notes,
        }
    }
}

/// A workflow-governed record: a product or one of the five request kinds.
///
/// Only the state machine mutates `status`, `current_approver` and the
/// approval history; everything else reads through the accessors.
#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct Entity {
    #[n(0)]
    pub(crate) id: String,
    #[n(1)]
    pub(crate) status: Status,
    #[n(2)]
    pub(crate) current_approver: Option<Role>,
    // Raw index of current_approver in the catalog chain. Chains repeat
    // roles, so advancement must go by position, not role identity.
    #[n(3)]
    pub(crate) chain_position: u32,
    #[n(4)]
    pub(crate) approval_history: Vec<ApprovalStep>,
    #[n(5)]
    pub(crate) created_at: TimeStamp<Utc>,
    #[n(6)]
    pub(crate) updated_at: TimeStamp<Utc>,
    #[n(7)]
    pub(crate) requested_by: String,
    #[n(8)]
    pub(crate) payload: Payload,
}

impl Entity {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn current_approver(&self) -> Option<Role> {
        self.current_approver
    }

    pub fn chain_position(&self) -> usize {
        self.chain_position as usize
    }

    /// The audit trail, oldest entry first.
    pub fn history(&self) -> &[ApprovalStep] {
        &self.approval_history
    }

    pub fn created_at(&self) -> &TimeStamp<Utc> {
        &self.created_at
    }

    pub fn updated_at(&self) -> &TimeStamp<Utc> {
        &self.updated_at
    }

    pub fn requested_by(&self) -> &str {
        &self.requested_by
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn category(&self) -> Category {
        self.payload.category()
    }

    pub fn branch_id(&self) -> Option<&str> {
        self.payload.branch_id()
    }

    /// Whether `role` has ever acted on (or seeded) this entity.
    pub fn history_contains(&self, role: Role) -> bool {
        self.approval_history.iter().any(|step| step.role == role)
    }

    /// Content fingerprint of the audit trail: sha256 over the CBOR-encoded
    /// step sequence. Two entities with the same digest carry byte-identical
    /// histories.
    pub fn history_digest(&self) -> Result<String, WorkflowError> {
        let cbor = minicbor::to_vec(&self.approval_history)?;
        Ok(sha256::digest(&cbor))
    }

    /// Adopt a legacy product record that predates the approval workflow.
    /// The original data set treated a missing status as approved; this
    /// makes that explicit with a pre-approved ledger entry so every stored
    /// record carries a status and a non-empty history.
    pub fn preapproved_product(product: Product, adopted_by: &str) -> Result<Self, WorkflowError> {
        let payload = Payload::Product(product);
        payload.validate()?;

        let now = TimeStamp::new();
        Ok(Self {
            id: new_entity_id(Category::Product)?,
            status: Status::Approved,
            current_approver: None,
            chain_position: 0,
            approval_history: vec![ApprovalStep::new(
                Role::MainManager,
                adopted_by.to_string(),
                Action::Approved,
                Some("Initial product - pre-approved".to_string()),
            )],
            created_at: now.clone(),
            updated_at: now,
            requested_by: adopted_by.to_string(),
            payload,
        })
    }
}

/// Wall-clock timestamp carried by entities and ledger steps, encoded to
/// CBOR as UTC nanoseconds.
#[derive(Debug, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl<T: TimeZone> PartialEq for TimeStamp<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: TimeZone> Eq for TimeStamp<T> {}

impl<T: TimeZone> PartialOrd for TimeStamp<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: TimeZone> Ord for TimeStamp<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }

    pub fn new_with(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .unwrap()
            .into()
    }

    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}
