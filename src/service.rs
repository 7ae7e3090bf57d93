//! Service layer API for workflow operations
//!
//! The surface the UI layer calls: submit, decide, query. Every mutation
//! runs read-validate-write under the store's write lock, which is the
//! serialization point that keeps two approvers at the same chain position
//! from both committing.
use std::sync::RwLock;

use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::entity::Entity;
use crate::error::WorkflowError;
use crate::machine::{self, Decision};
use crate::request::{Category, Payload, Product};
use crate::role::{Actor, Role};
use crate::store::EntityStore;
use crate::visibility;

pub struct WorkflowService<S: EntityStore> {
    store: RwLock<S>,
    catalog: Catalog,
}

impl<S: EntityStore> WorkflowService<S> {
    /// Build a service over the default catalog. The catalog is validated
    /// here; a misconfigured chain aborts startup rather than surfacing
    /// mid-operation.
    pub fn new(store: S) -> Result<Self, WorkflowError> {
        Self::with_catalog(store, Catalog::builtin())
    }

    pub fn with_catalog(mut store: S, catalog: Catalog) -> Result<Self, WorkflowError> {
        catalog.validate()?;
        store.load()?;
        Ok(Self {
            store: RwLock::new(store),
            catalog,
        })
    }

    /// Submit a new entity into its approval workflow.
    pub fn create_entity(&self, payload: Payload, creator: &Actor) -> Result<Entity, WorkflowError> {
        let entity = machine::initialize(&self.catalog, payload, creator)?;

        let mut store = self.store.write().map_err(|_| WorkflowError::LockPoisoned)?;
        store.insert(&entity)?;
        store.flush()?;

        info!(
            id = %entity.id(),
            category = %entity.category(),
            approver = %entity.current_approver().map(|r| r.display_name()).unwrap_or("none"),
            "entity submitted for approval"
        );
        Ok(entity)
    }

    /// Record one approval or rejection against an entity.
    ///
    /// The read, the precondition checks inside the state machine, and the
    /// whole-record replace all happen under a single write lock, so a
    /// concurrent decision for the same entity re-reads post-commit state
    /// and fails its precondition.
    pub fn decide(
        &self,
        entity_id: &str,
        actor: &Actor,
        decision: Decision,
        notes: Option<String>,
    ) -> Result<Entity, WorkflowError> {
        let mut store = self.store.write().map_err(|_| WorkflowError::LockPoisoned)?;

        let entity = store.get(entity_id)?;
        let entity = match machine::decide(
            &self.catalog,
            entity,
            actor.role,
            &actor.id,
            decision,
            notes,
        ) {
            Ok(entity) => entity,
            Err(err) => {
                warn!(id = %entity_id, actor = %actor.id, role = %actor.role, %err, "decision refused");
                return Err(err);
            }
        };

        store.replace(&entity)?;
        store.flush()?;

        info!(
            id = %entity.id(),
            actor = %actor.id,
            role = %actor.role,
            status = %entity.status(),
            "decision recorded"
        );
        Ok(entity)
    }

    pub fn get(&self, entity_id: &str) -> Result<Entity, WorkflowError> {
        let store = self.store.read().map_err(|_| WorkflowError::LockPoisoned)?;
        store.get(entity_id)
    }

    /// All requests the actor may see, most recently updated first.
    pub fn list_visible_requests(&self, actor: &Actor) -> Result<Vec<Entity>, WorkflowError> {
        let store = self.store.read().map_err(|_| WorkflowError::LockPoisoned)?;
        Ok(visibility::visible_to(actor, &store.list_requests()?))
    }

    /// All products the actor may see, most recently updated first.
    pub fn list_visible_products(&self, actor: &Actor) -> Result<Vec<Entity>, WorkflowError> {
        let store = self.store.read().map_err(|_| WorkflowError::LockPoisoned)?;
        Ok(visibility::visible_to(actor, &store.list_products()?))
    }

    /// Whether the actor's role may act on the entity right now.
    pub fn can_act(&self, actor: &Actor, entity_id: &str) -> Result<bool, WorkflowError> {
        let store = self.store.read().map_err(|_| WorkflowError::LockPoisoned)?;
        Ok(visibility::can_act(actor.role, &store.get(entity_id)?))
    }

    /// Ordered approver chain for a category, for progress display.
    pub fn workflow_sequence(&self, category: Category) -> Result<Vec<Role>, WorkflowError> {
        Ok(self.catalog.sequence_for(category)?.to_vec())
    }

    /// Administrative payload edit. The workflow fields are untouched; the
    /// record is replaced wholesale and its clock refreshed.
    pub fn update_payload(&self, entity_id: &str, payload: Payload) -> Result<Entity, WorkflowError> {
        payload.validate()?;

        let mut store = self.store.write().map_err(|_| WorkflowError::LockPoisoned)?;
        let mut entity = store.get(entity_id)?;

        if entity.category() != payload.category() {
            return Err(WorkflowError::CategoryMismatch {
                id: entity_id.to_string(),
                expected: entity.category(),
                got: payload.category(),
            });
        }

        entity.payload = payload;
        entity.updated_at = crate::entity::TimeStamp::new();
        store.replace(&entity)?;
        store.flush()?;

        info!(id = %entity.id(), "payload updated");
        Ok(entity)
    }

    /// Administrative product delete. Requests are never deleted; they only
    /// reach a terminal status.
    pub fn delete_product(&self, entity_id: &str) -> Result<Entity, WorkflowError> {
        let mut store = self.store.write().map_err(|_| WorkflowError::LockPoisoned)?;

        let entity = store.get(entity_id)?;
        if entity.category() != Category::Product {
            return Err(WorkflowError::NotDeletable {
                id: entity_id.to_string(),
                category: entity.category(),
            });
        }

        let removed = store.remove(entity_id)?;
        store.flush()?;

        info!(id = %entity_id, "product deleted");
        Ok(removed)
    }

    /// One-time migration for legacy product records that predate the
    /// workflow and carry no status. Each is adopted as pre-approved with a
    /// seed ledger entry, then written in one batch.
    pub fn adopt_legacy_products(
        &self,
        products: Vec<Product>,
        adopted_by: &str,
    ) -> Result<Vec<Entity>, WorkflowError> {
        let entities = products
            .into_iter()
            .map(|product| Entity::preapproved_product(product, adopted_by))
            .collect::<Result<Vec<_>, _>>()?;

        let mut store = self.store.write().map_err(|_| WorkflowError::LockPoisoned)?;
        store.insert_many(&entities)?;
        store.flush()?;

        info!(count = entities.len(), "legacy products adopted");
        Ok(entities)
    }

    /// Persist any buffered writes in the backing store.
    pub fn flush(&self) -> Result<(), WorkflowError> {
        let store = self.store.read().map_err(|_| WorkflowError::LockPoisoned)?;
        store.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> WorkflowService<MemoryStore> {
        WorkflowService::new(MemoryStore::new()).unwrap()
    }

    fn product_payload() -> Payload {
        Payload::Product(Product {
            name: "Matcha Latte".into(),
            category: "Beverages".into(),
            description: "Ceremonial grade matcha".into(),
            base_price: 2_200,
            supplier: None,
            supplier_phone: None,
            branch_id: None,
            product_type: None,
        })
    }

    #[test]
    fn startup_rejects_invalid_catalog() {
        let result = WorkflowService::with_catalog(MemoryStore::new(), Catalog::empty());
        assert!(matches!(result, Err(WorkflowError::UnknownCategory(_))));
    }

    #[test]
    fn create_then_get() {
        let service = service();
        let creator = Actor::new("u1", Role::MainManager);

        let entity = service.create_entity(product_payload(), &creator).unwrap();
        let fetched = service.get(entity.id()).unwrap();

        assert_eq!(entity, fetched);
    }

    #[test]
    fn decide_against_missing_entity_is_not_found() {
        let service = service();
        let actor = Actor::new("u1", Role::MainManager);

        assert!(matches!(
            service.decide("prod_1missing", &actor, Decision::Approve, None),
            Err(WorkflowError::NotFound { .. })
        ));
    }

    #[test]
    fn stale_decision_fails_after_commit() {
        let service = service();
        let creator = Actor::new("u1", Role::MainManager);
        let entity = service.create_entity(product_payload(), &creator).unwrap();

        // Two main managers race on the same position; the second decision
        // observes the advanced record and is refused.
        let main = Actor::new("u1", Role::MainManager);
        service
            .decide(entity.id(), &main, Decision::Approve, None)
            .unwrap();

        let err = service
            .decide(entity.id(), &main, Decision::Approve, None)
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotAuthorizedApprover { .. }));

        // History length is untouched by the refused attempt.
        assert_eq!(service.get(entity.id()).unwrap().history().len(), 2);
    }

    #[test]
    fn delete_is_products_only() {
        let service = service();
        let creator = Actor::with_branch("u2", Role::BranchManager, "branch-1");
        let request = service
            .create_entity(
                Payload::DirectInventoryRequest(crate::request::DirectInventoryRequest {
                    branch_id: "branch-1".into(),
                    item_name: "Lids".into(),
                    quantity: 300,
                    justification: "stock out".into(),
                }),
                &creator,
            )
            .unwrap();

        assert!(matches!(
            service.delete_product(request.id()),
            Err(WorkflowError::NotDeletable { .. })
        ));

        let product = service
            .create_entity(product_payload(), &Actor::new("u1", Role::MainManager))
            .unwrap();
        service.delete_product(product.id()).unwrap();
        assert!(matches!(
            service.get(product.id()),
            Err(WorkflowError::NotFound { .. })
        ));
    }

    #[test]
    fn update_payload_keeps_workflow_fields() {
        let service = service();
        let creator = Actor::new("u1", Role::MainManager);
        let entity = service.create_entity(product_payload(), &creator).unwrap();

        let updated = service
            .update_payload(
                entity.id(),
                Payload::Product(Product {
                    name: "Matcha Latte".into(),
                    category: "Beverages".into(),
                    description: "Now with oat milk".into(),
                    base_price: 2_400,
                    supplier: None,
                    supplier_phone: None,
                    branch_id: None,
                    product_type: None,
                }),
            )
            .unwrap();

        assert_eq!(updated.status(), entity.status());
        assert_eq!(updated.current_approver(), entity.current_approver());
        assert_eq!(updated.history(), entity.history());
    }

    #[test]
    fn update_payload_rejects_category_swap() {
        let service = service();
        let creator = Actor::new("u1", Role::MainManager);
        let entity = service.create_entity(product_payload(), &creator).unwrap();

        let err = service
            .update_payload(
                entity.id(),
                Payload::DirectInventoryRequest(crate::request::DirectInventoryRequest {
                    branch_id: "branch-1".into(),
                    item_name: "Lids".into(),
                    quantity: 300,
                    justification: "stock out".into(),
                }),
            )
            .unwrap_err();

        assert!(matches!(err, WorkflowError::CategoryMismatch { .. }));
    }
}
