//! Entity store: authoritative collections behind a swappable interface
//!
//! The state machine never talks to storage directly; the service injects a
//! store so the same workflow logic runs against an in-memory map in tests
//! and a sled database in the application. Products and requests live in
//! separate collections that never contend with each other.
use std::collections::HashMap;
use std::sync::Arc;

use crate::entity::Entity;
use crate::error::WorkflowError;
use crate::request::Category;

pub trait EntityStore {
    /// Prepare the store for use, e.g. open or verify backing collections.
    fn load(&mut self) -> Result<(), WorkflowError>;

    /// Persist any buffered writes. A no-op for purely in-memory stores.
    fn flush(&self) -> Result<(), WorkflowError>;

    fn insert(&mut self, entity: &Entity) -> Result<(), WorkflowError>;

    fn get(&self, id: &str) -> Result<Entity, WorkflowError>;

    /// Whole-record replace of an existing entity. Field-level patches are
    /// deliberately unsupported; partial updates would race with decisions.
    fn replace(&mut self, entity: &Entity) -> Result<(), WorkflowError>;

    fn remove(&mut self, id: &str) -> Result<Entity, WorkflowError>;

    fn list_products(&self) -> Result<Vec<Entity>, WorkflowError>;

    fn list_requests(&self) -> Result<Vec<Entity>, WorkflowError>;

    /// Bulk insert, used by legacy adoption. Backends may override this to
    /// write atomically.
    fn insert_many(&mut self, entities: &[Entity]) -> Result<(), WorkflowError> {
        for entity in entities {
            self.insert(entity)?;
        }
        Ok(())
    }
}

/// HashMap-backed store, the default for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: HashMap<String, Entity>,
    requests: HashMap<String, Entity>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn collection_mut(&mut self, category: Category) -> &mut HashMap<String, Entity> {
        match category {
            Category::Product => &mut self.products,
            _ => &mut self.requests,
        }
    }
}

impl EntityStore for MemoryStore {
    fn load(&mut self) -> Result<(), WorkflowError> {
        Ok(())
    }

    fn flush(&self) -> Result<(), WorkflowError> {
        Ok(())
    }

    fn insert(&mut self, entity: &Entity) -> Result<(), WorkflowError> {
        self.collection_mut(entity.category())
            .insert(entity.id().to_string(), entity.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Entity, WorkflowError> {
        self.products
            .get(id)
            .or_else(|| self.requests.get(id))
            .cloned()
            .ok_or_else(|| WorkflowError::NotFound { id: id.to_string() })
    }

    fn replace(&mut self, entity: &Entity) -> Result<(), WorkflowError> {
        let collection = self.collection_mut(entity.category());
        match collection.get_mut(entity.id()) {
            Some(existing) => {
                *existing = entity.clone();
                Ok(())
            }
            None => Err(WorkflowError::NotFound {
                id: entity.id().to_string(),
            }),
        }
    }

    fn remove(&mut self, id: &str) -> Result<Entity, WorkflowError> {
        self.products
            .remove(id)
            .or_else(|| self.requests.remove(id))
            .ok_or_else(|| WorkflowError::NotFound { id: id.to_string() })
    }

    fn list_products(&self) -> Result<Vec<Entity>, WorkflowError> {
        Ok(self.products.values().cloned().collect())
    }

    fn list_requests(&self) -> Result<Vec<Entity>, WorkflowError> {
        Ok(self.requests.values().cloned().collect())
    }
}

const PRODUCTS_TREE: &str = "products";
const REQUESTS_TREE: &str = "requests";

/// Durable store on a sled database. Entities are CBOR-encoded snapshots
/// keyed by id, split across a products tree and a requests tree.
pub struct SledStore {
    db: Arc<sled::Db>,
    products: sled::Tree,
    requests: sled::Tree,
}

impl SledStore {
    pub fn new(db: Arc<sled::Db>) -> Result<Self, WorkflowError> {
        let products = db.open_tree(PRODUCTS_TREE)?;
        let requests = db.open_tree(REQUESTS_TREE)?;
        Ok(Self {
            db,
            products,
            requests,
        })
    }

    fn tree_for(&self, category: Category) -> &sled::Tree {
        match category {
            Category::Product => &self.products,
            _ => &self.requests,
        }
    }

    fn decode_all(tree: &sled::Tree) -> Result<Vec<Entity>, WorkflowError> {
        let mut entities = Vec::new();
        for record in tree.iter() {
            let (_, value) = record?;
            entities.push(minicbor::decode(&value)?);
        }
        Ok(entities)
    }
}

impl EntityStore for SledStore {
    fn load(&mut self) -> Result<(), WorkflowError> {
        // Trees are opened in the constructor; decoding everything once
        // surfaces schema drift at startup instead of mid-operation.
        Self::decode_all(&self.products)?;
        Self::decode_all(&self.requests)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), WorkflowError> {
        self.db.flush()?;
        Ok(())
    }

    fn insert(&mut self, entity: &Entity) -> Result<(), WorkflowError> {
        let encoded = minicbor::to_vec(entity)?;
        self.tree_for(entity.category())
            .insert(entity.id().as_bytes(), encoded)?;
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Entity, WorkflowError> {
        let record = self
            .products
            .get(id.as_bytes())?
            .map_or_else(|| self.requests.get(id.as_bytes()), |v| Ok(Some(v)))?;

        match record {
            Some(value) => Ok(minicbor::decode(&value)?),
            None => Err(WorkflowError::NotFound { id: id.to_string() }),
        }
    }

    fn replace(&mut self, entity: &Entity) -> Result<(), WorkflowError> {
        let tree = self.tree_for(entity.category());
        if tree.get(entity.id().as_bytes())?.is_none() {
            return Err(WorkflowError::NotFound {
                id: entity.id().to_string(),
            });
        }
        let encoded = minicbor::to_vec(entity)?;
        tree.insert(entity.id().as_bytes(), encoded)?;
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<Entity, WorkflowError> {
        for tree in [&self.products, &self.requests] {
            if let Some(value) = tree.remove(id.as_bytes())? {
                return Ok(minicbor::decode(&value)?);
            }
        }
        Err(WorkflowError::NotFound { id: id.to_string() })
    }

    fn list_products(&self) -> Result<Vec<Entity>, WorkflowError> {
        Self::decode_all(&self.products)
    }

    fn list_requests(&self) -> Result<Vec<Entity>, WorkflowError> {
        Self::decode_all(&self.requests)
    }

    fn insert_many(&mut self, entities: &[Entity]) -> Result<(), WorkflowError> {
        let mut products = sled::Batch::default();
        let mut requests = sled::Batch::default();

        for entity in entities {
            let encoded = minicbor::to_vec(entity)?;
            match entity.category() {
                Category::Product => products.insert(entity.id().as_bytes(), encoded),
                _ => requests.insert(entity.id().as_bytes(), encoded),
            }
        }

        self.products.apply_batch(products)?;
        self.requests.apply_batch(requests)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::machine;
    use crate::request::{Payload, Product};
    use crate::role::{Actor, Role};

    fn sample_entity() -> Entity {
        let payload = Payload::Product(Product {
            name: "Flat White".into(),
            category: "Beverages".into(),
            description: "Double shot, steamed milk".into(),
            base_price: 1_600,
            supplier: None,
            supplier_phone: None,
            branch_id: None,
            product_type: None,
        });
        machine::initialize(&Catalog::builtin(), payload, &Actor::new("u1", Role::MainManager))
            .unwrap()
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        let entity = sample_entity();

        store.insert(&entity).unwrap();
        assert_eq!(store.get(entity.id()).unwrap(), entity);
        assert_eq!(store.list_products().unwrap().len(), 1);
        assert!(store.list_requests().unwrap().is_empty());
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get("prod_1nope"),
            Err(WorkflowError::NotFound { .. })
        ));
    }

    #[test]
    fn replace_requires_existing_record() {
        let mut store = MemoryStore::new();
        let entity = sample_entity();

        assert!(matches!(
            store.replace(&entity),
            Err(WorkflowError::NotFound { .. })
        ));

        store.insert(&entity).unwrap();
        assert!(store.replace(&entity).is_ok());
    }

    #[test]
    fn remove_returns_the_record() {
        let mut store = MemoryStore::new();
        let entity = sample_entity();
        store.insert(&entity).unwrap();

        let removed = store.remove(entity.id()).unwrap();
        assert_eq!(removed, entity);
        assert!(matches!(
            store.get(entity.id()),
            Err(WorkflowError::NotFound { .. })
        ));
    }
}
