//! Entity state machine
//!
//! The only place `status`, `current_approver` and the approval history are
//! ever mutated. Transitions are pure: they take an entity by value and
//! return the advanced version, leaving the caller to swap it into the
//! store as a whole-record replacement.
use crate::catalog::Catalog;
use crate::entity::{Action, ApprovalStep, Entity, Status, TimeStamp};
use crate::error::WorkflowError;
use crate::ids::new_entity_id;
use crate::request::{Category, Payload};
use crate::role::{Actor, Role};

/// A decision rendered by the current approver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

/// Build a freshly submitted entity: status pending, first chain role as
/// approver, one seed ledger entry attributed to the submitter.
///
/// Products have two legitimate creation paths; the seed role records
/// whether the product originated at a branch or centrally. All other
/// categories seed with the creator's own role.
pub fn initialize(
    catalog: &Catalog,
    payload: Payload,
    creator: &Actor,
) -> Result<Entity, WorkflowError> {
    payload.validate()?;

    let category = payload.category();
    let chain = catalog.sequence_for(category)?;
    let first = *chain.first().ok_or(WorkflowError::EmptyChain(category))?;

    let seed_role = match category {
        Category::Product if payload.branch_id().is_some() => Role::BranchManager,
        Category::Product => Role::MainManager,
        _ => creator.role,
    };

    let now = TimeStamp::new();
    Ok(Entity {
        id: new_entity_id(category)?,
        status: Status::Pending,
        current_approver: Some(first),
        chain_position: 0,
        approval_history: vec![ApprovalStep::new(
            seed_role,
            creator.id.clone(),
            Action::Approved,
            Some(format!("{category} submitted")),
        )],
        created_at: now.clone(),
        updated_at: now,
        requested_by: creator.id.clone(),
        payload,
    })
}

/// Apply one approval or rejection to an entity.
///
/// Preconditions: the entity is not terminal and `acting_role` equals the
/// current approver. A violation returns the matching error and the entity
/// the caller holds is untouched, since we only mutate the moved-in copy
/// after both checks pass.
///
/// Approval advances by raw chain index. Chains repeat roles at different
/// positions, so looking the role up again would loop the workflow back to
/// its first occurrence.
pub fn decide(
    catalog: &Catalog,
    mut entity: Entity,
    acting_role: Role,
    actor_id: &str,
    decision: Decision,
    notes: Option<String>,
) -> Result<Entity, WorkflowError> {
    if entity.status.is_terminal() {
        return Err(WorkflowError::AlreadyTerminal {
            id: entity.id,
            status: entity.status,
        });
    }
    if entity.current_approver != Some(acting_role) {
        return Err(WorkflowError::NotAuthorizedApprover {
            id: entity.id,
            role: acting_role,
        });
    }

    match decision {
        Decision::Reject => {
            entity.approval_history.push(ApprovalStep::new(
                acting_role,
                actor_id.to_string(),
                Action::Rejected,
                notes,
            ));
            entity.status = Status::Rejected;
            entity.current_approver = None;
        }
        Decision::Approve => {
            entity.approval_history.push(ApprovalStep::new(
                acting_role,
                actor_id.to_string(),
                Action::Approved,
                notes,
            ));

            let chain = catalog.sequence_for(entity.category())?;
            let next = entity.chain_position as usize + 1;
            match chain.get(next) {
                Some(role) => {
                    entity.current_approver = Some(*role);
                    entity.chain_position = next as u32;
                    // Products keep the three-value status set.
                    entity.status = match entity.category() {
                        Category::Product => Status::Pending,
                        _ => Status::InProgress,
                    };
                }
                None => {
                    entity.current_approver = None;
                    entity.status = Status::Approved;
                }
            }
        }
    }

    entity.updated_at = TimeStamp::new();
    Ok(entity)
}
