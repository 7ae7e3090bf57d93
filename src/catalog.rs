//! Workflow catalog: which roles approve which category, in which order
use std::collections::HashMap;

use crate::error::WorkflowError;
use crate::request::Category;
use crate::role::Role;

use Role::*;

/// Lookup table mapping an entity category to its ordered approver chain.
///
/// Chains may legitimately repeat a role at non-adjacent positions (the
/// product request chain interleaves the main manager between every
/// specialist), so consumers must advance by list index, never by searching
/// for a role. The catalog is immutable once handed to a service.
#[derive(Debug, Clone)]
pub struct Catalog {
    chains: HashMap<Category, Vec<Role>>,
}

impl Catalog {
    /// Empty catalog. Only useful when registering custom chains; most
    /// callers want [`Catalog::builtin`].
    pub fn empty() -> Self {
        Self {
            chains: HashMap::new(),
        }
    }

    /// The approval chains the cafe chain operates with.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        catalog.chains.insert(
            Category::Product,
            vec![MainManager, CentralKitchenManager, InventoryManager],
        );
        // The coordinating main manager signs off between every specialist.
        catalog.chains.insert(
            Category::ProductRequest,
            vec![
                MainManager,
                CentralKitchenManager,
                MainManager,
                InventoryManager,
                MainManager,
                SupplierManager,
                MainManager,
            ],
        );
        catalog
            .chains
            .insert(Category::InventoryRequest, vec![InventoryManager]);
        catalog.chains.insert(
            Category::SupplyRequest,
            vec![SupplierManager, InventoryManager],
        );
        catalog.chains.insert(
            Category::DirectInventoryRequest,
            vec![InventoryManager, MainManager],
        );
        catalog
            .chains
            .insert(Category::LogisticsRequest, vec![InventoryManager]);
        catalog
    }

    /// Register or replace the chain for a category. Empty chains are
    /// configuration errors and rejected outright.
    pub fn register(&mut self, category: Category, chain: Vec<Role>) -> Result<(), WorkflowError> {
        if chain.is_empty() {
            return Err(WorkflowError::EmptyChain(category));
        }
        self.chains.insert(category, chain);
        Ok(())
    }

    /// Ordered approver chain for a category, never empty.
    pub fn sequence_for(&self, category: Category) -> Result<&[Role], WorkflowError> {
        self.chains
            .get(&category)
            .map(Vec::as_slice)
            .ok_or(WorkflowError::UnknownCategory(category))
    }

    /// Startup check: every known category has a non-empty chain. A failure
    /// here is a configuration error and should abort service construction.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        for category in Category::ALL {
            let chain = self.sequence_for(category)?;
            if chain.is_empty() {
                return Err(WorkflowError::EmptyChain(category));
            }
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_validates() {
        assert!(Catalog::builtin().validate().is_ok());
    }

    #[test]
    fn every_builtin_chain_is_nonempty() {
        let catalog = Catalog::builtin();
        for category in Category::ALL {
            assert!(!catalog.sequence_for(category).unwrap().is_empty());
        }
    }

    #[test]
    fn supply_chain_matches_operating_order() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.sequence_for(Category::SupplyRequest).unwrap(),
            &[SupplierManager, InventoryManager]
        );
    }

    #[test]
    fn product_request_chain_interleaves_main_manager() {
        let catalog = Catalog::builtin();
        let chain = catalog.sequence_for(Category::ProductRequest).unwrap();

        assert_eq!(chain.len(), 7);
        assert_eq!(chain[0], MainManager);
        assert_eq!(chain[2], MainManager);
        assert_eq!(chain[4], MainManager);
        assert_eq!(chain[6], MainManager);
    }

    #[test]
    fn unregistered_category_fails_lookup() {
        let catalog = Catalog::empty();
        assert!(matches!(
            catalog.sequence_for(Category::Product),
            Err(WorkflowError::UnknownCategory(Category::Product))
        ));
    }

    #[test]
    fn empty_chain_is_rejected_at_registration() {
        let mut catalog = Catalog::empty();
        assert!(matches!(
            catalog.register(Category::Product, vec![]),
            Err(WorkflowError::EmptyChain(Category::Product))
        ));
    }

    #[test]
    fn partial_catalog_fails_startup_validation() {
        let mut catalog = Catalog::empty();
        catalog
            .register(Category::Product, vec![MainManager])
            .unwrap();

        assert!(catalog.validate().is_err());
    }
}
