//! Read-side visibility and authorization projection
//!
//! Pure functions over entity snapshots; nothing here mutates state, so the
//! filter can be recomputed on every query.
use crate::entity::Entity;
use crate::request::Category;
use crate::role::{Actor, Role};

/// Whether `role` may act on this entity right now: it must be the
/// designated current approver and the entity must not be terminal.
pub fn can_act(role: Role, entity: &Entity) -> bool {
    entity.current_approver() == Some(role) && !entity.status().is_terminal()
}

/// Which entities the actor may see. Branch managers are scoped to their
/// branch; the main manager sees everything; each specialist sees their own
/// category plus anything they are currently assigned to or have already
/// acted on.
pub fn visible_to(actor: &Actor, entities: &[Entity]) -> Vec<Entity> {
    let mut visible: Vec<Entity> = entities
        .iter()
        .filter(|entity| is_visible(actor, entity))
        .cloned()
        .collect();

    // Most recently touched first, matching the dashboard ordering.
    visible.sort_by(|a, b| b.updated_at().cmp(a.updated_at()));
    visible
}

fn is_visible(actor: &Actor, entity: &Entity) -> bool {
    match actor.role {
        Role::MainManager => true,
        Role::BranchManager => branch_scoped(actor, entity),
        Role::CentralKitchenManager => {
            specialist_view(entity, Role::CentralKitchenManager, &[Category::InventoryRequest])
        }
        Role::InventoryManager => specialist_view(
            entity,
            Role::InventoryManager,
            &[
                Category::InventoryRequest,
                Category::SupplyRequest,
                Category::DirectInventoryRequest,
                Category::LogisticsRequest,
            ],
        ),
        Role::SupplierManager => {
            specialist_view(entity, Role::SupplierManager, &[Category::SupplyRequest])
        }
        Role::LogisticsManager => {
            specialist_view(entity, Role::LogisticsManager, &[Category::LogisticsRequest])
        }
    }
}

fn branch_scoped(actor: &Actor, entity: &Entity) -> bool {
    match entity.category() {
        // Products without a branch are centrally owned and visible to all
        // branches.
        Category::Product => match entity.branch_id() {
            Some(branch) => actor.branch_id.as_deref() == Some(branch),
            None => true,
        },
        Category::ProductRequest | Category::DirectInventoryRequest => {
            entity.branch_id().is_some() && entity.branch_id() == actor.branch_id.as_deref()
        }
        _ => false,
    }
}

fn specialist_view(entity: &Entity, role: Role, own_categories: &[Category]) -> bool {
    own_categories.contains(&entity.category())
        || entity.current_approver() == Some(role)
        || entity.history_contains(role)
}
