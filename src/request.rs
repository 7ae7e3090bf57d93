//! Entity categories and their type-specific payloads
//!
//! The state machine never inspects these fields for transition logic; it
//! only needs the category to look up the workflow chain. Payloads exist for
//! display and creation-time validation.
use crate::error::ValidationError;

/// The six workflow-governed record kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, minicbor::Encode, minicbor::Decode,
)]
pub enum Category {
    #[n(0)]
    Product,
    #[n(1)]
    ProductRequest,
    #[n(2)]
    InventoryRequest,
    #[n(3)]
    SupplyRequest,
    #[n(4)]
    DirectInventoryRequest,
    #[n(5)]
    LogisticsRequest,
}

impl Category {
    /// Bech32 human readable prefix used when minting ids for this category.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Category::Product => "prod_",
            Category::ProductRequest => "req_",
            Category::InventoryRequest => "inv_",
            Category::SupplyRequest => "sup_",
            Category::DirectInventoryRequest => "dir_",
            Category::LogisticsRequest => "log_",
        }
    }

    pub const ALL: [Category; 6] = [
        Category::Product,
        Category::ProductRequest,
        Category::InventoryRequest,
        Category::SupplyRequest,
        Category::DirectInventoryRequest,
        Category::LogisticsRequest,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Product => "product",
            Category::ProductRequest => "product request",
            Category::InventoryRequest => "inventory request",
            Category::SupplyRequest => "supply request",
            Category::DirectInventoryRequest => "direct inventory request",
            Category::LogisticsRequest => "logistics request",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub enum ProductType {
    #[n(0)]
    BranchItem,
    #[n(1)]
    KitchenIngredient,
    #[n(2)]
    SupplierItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub enum InventoryCategory {
    #[n(0)]
    Ingredients,
    #[n(1)]
    Supplies,
    #[n(2)]
    Equipment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub enum Urgency {
    #[n(0)]
    Low,
    #[n(1)]
    Medium,
    #[n(2)]
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub enum SupplyPriority {
    #[n(0)]
    Normal,
    #[n(1)]
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub enum LogisticsKind {
    #[n(0)]
    Delivery,
    #[n(1)]
    Transfer,
    #[n(2)]
    Pickup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub enum LogisticsPriority {
    #[n(0)]
    Low,
    #[n(1)]
    Medium,
    #[n(2)]
    High,
    #[n(3)]
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub enum VehicleType {
    #[n(0)]
    Van,
    #[n(1)]
    Truck,
    #[n(2)]
    Refrigerated,
}

// Amounts are integer halalas, never floats.
#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct Product {
    #[n(0)]
    pub name: String,
    #[n(1)]
    pub category: String,
    #[n(2)]
    pub description: String,
    #[n(3)]
    pub base_price: u64,
    #[n(4)]
    pub supplier: Option<String>,
    #[n(5)]
    pub supplier_phone: Option<String>,
    #[n(6)]
    pub branch_id: Option<String>,
    #[n(7)]
    pub product_type: Option<ProductType>,
}

#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct ProductRequest {
    #[n(0)]
    pub product_id: String,
    #[n(1)]
    pub branch_id: String,
    #[n(2)]
    pub order_quantity: u32,
    #[n(3)]
    pub balance_quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct InventoryRequest {
    #[n(0)]
    pub item_name: String,
    #[n(1)]
    pub category: InventoryCategory,
    #[n(2)]
    pub quantity: u32,
    #[n(3)]
    pub current_stock: u32,
    #[n(4)]
    pub urgency: Urgency,
    #[n(5)]
    pub estimated_cost: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct SupplyItem {
    #[n(0)]
    pub item_name: String,
    #[n(1)]
    pub quantity: u32,
    #[n(2)]
    pub unit_price: Option<u64>,
    #[n(3)]
    pub total_price: Option<u64>,
    #[n(4)]
    pub specifications: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct SupplyRequest {
    #[n(0)]
    pub supplier_id: String,
    #[n(1)]
    pub items: Vec<SupplyItem>,
    #[n(2)]
    pub total_estimated_cost: u64,
    #[n(3)]
    pub delivery_date: Option<String>,
    #[n(4)]
    pub priority: SupplyPriority,
}

#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct DirectInventoryRequest {
    #[n(0)]
    pub branch_id: String,
    #[n(1)]
    pub item_name: String,
    #[n(2)]
    pub quantity: u32,
    #[n(3)]
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct LogisticsItem {
    #[n(0)]
    pub item_name: String,
    #[n(1)]
    pub quantity: u32,
    #[n(2)]
    pub weight: Option<u64>,
    #[n(3)]
    pub dimensions: Option<String>,
    #[n(4)]
    pub handling_instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct LogisticsRequest {
    #[n(0)]
    pub request_type: LogisticsKind,
    #[n(1)]
    pub from_location: String,
    #[n(2)]
    pub to_location: String,
    #[n(3)]
    pub items: Vec<LogisticsItem>,
    #[n(4)]
    pub scheduled_date: Option<String>,
    #[n(5)]
    pub priority: LogisticsPriority,
    #[n(6)]
    pub vehicle_type: Option<VehicleType>,
    #[n(7)]
    pub special_instructions: Option<String>,
}

/// Tagged union of the type-specific payload carried by every entity.
#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub enum Payload {
    #[n(0)]
    Product(#[n(0)] Product),
    #[n(1)]
    ProductRequest(#[n(0)] ProductRequest),
    #[n(2)]
    InventoryRequest(#[n(0)] InventoryRequest),
    #[n(3)]
    SupplyRequest(#[n(0)] SupplyRequest),
    #[n(4)]
    DirectInventoryRequest(#[n(0)] DirectInventoryRequest),
    #[n(5)]
    LogisticsRequest(#[n(0)] LogisticsRequest),
}

impl Payload {
    pub fn category(&self) -> Category {
        match self {
            Payload::Product(_) => Category::Product,
            Payload::ProductRequest(_) => Category::ProductRequest,
            Payload::InventoryRequest(_) => Category::InventoryRequest,
            Payload::SupplyRequest(_) => Category::SupplyRequest,
            Payload::DirectInventoryRequest(_) => Category::DirectInventoryRequest,
            Payload::LogisticsRequest(_) => Category::LogisticsRequest,
        }
    }

    /// Branch affiliation, if this record is tied to one. Used by the
    /// visibility filter and the product seeding rule, never by transitions.
    pub fn branch_id(&self) -> Option<&str> {
        match self {
            Payload::Product(p) => p.branch_id.as_deref(),
            Payload::ProductRequest(r) => Some(&r.branch_id),
            Payload::DirectInventoryRequest(r) => Some(&r.branch_id),
            _ => None,
        }
    }

    /// Creation-time field checks. Runs before an entity is initialized so
    /// a bad payload never reaches the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Payload::Product(p) => {
                if p.name.trim().is_empty() {
                    return Err(ValidationError::MissingField("name"));
                }
                if p.category.trim().is_empty() {
                    return Err(ValidationError::MissingField("category"));
                }
                Ok(())
            }
            Payload::ProductRequest(r) => {
                if r.product_id.trim().is_empty() {
                    return Err(ValidationError::MissingField("product_id"));
                }
                if r.branch_id.trim().is_empty() {
                    return Err(ValidationError::MissingField("branch_id"));
                }
                if r.order_quantity == 0 {
                    return Err(ValidationError::ZeroQuantity("order_quantity"));
                }
                Ok(())
            }
            Payload::InventoryRequest(r) => {
                if r.item_name.trim().is_empty() {
                    return Err(ValidationError::MissingField("item_name"));
                }
                if r.quantity == 0 {
                    return Err(ValidationError::ZeroQuantity("quantity"));
                }
                Ok(())
            }
            Payload::SupplyRequest(r) => {
                if r.supplier_id.trim().is_empty() {
                    return Err(ValidationError::MissingField("supplier_id"));
                }
                if r.items.is_empty() {
                    return Err(ValidationError::EmptyItems);
                }
                for item in &r.items {
                    if item.item_name.trim().is_empty() {
                        return Err(ValidationError::MissingField("item_name"));
                    }
                    if item.quantity == 0 {
                        return Err(ValidationError::ZeroQuantity("quantity"));
                    }
                }
                Ok(())
            }
            Payload::DirectInventoryRequest(r) => {
                if r.branch_id.trim().is_empty() {
                    return Err(ValidationError::MissingField("branch_id"));
                }
                if r.item_name.trim().is_empty() {
                    return Err(ValidationError::MissingField("item_name"));
                }
                if r.quantity == 0 {
                    return Err(ValidationError::ZeroQuantity("quantity"));
                }
                if r.justification.trim().is_empty() {
                    return Err(ValidationError::MissingField("justification"));
                }
                Ok(())
            }
            Payload::LogisticsRequest(r) => {
                if r.from_location.trim().is_empty() {
                    return Err(ValidationError::MissingField("from_location"));
                }
                if r.to_location.trim().is_empty() {
                    return Err(ValidationError::MissingField("to_location"));
                }
                if r.from_location == r.to_location {
                    return Err(ValidationError::SameLocations);
                }
                if r.items.is_empty() {
                    return Err(ValidationError::EmptyItems);
                }
                for item in &r.items {
                    if item.quantity == 0 {
                        return Err(ValidationError::ZeroQuantity("quantity"));
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_supply_request() -> SupplyRequest {
        SupplyRequest {
            supplier_id: "supplier-1".into(),
            items: vec![SupplyItem {
                item_name: "Whole Milk".into(),
                quantity: 40,
                unit_price: Some(550),
                total_price: Some(22_000),
                specifications: None,
            }],
            total_estimated_cost: 22_000,
            delivery_date: None,
            priority: SupplyPriority::Normal,
        }
    }

    #[test]
    fn valid_supply_request_passes() {
        assert!(Payload::SupplyRequest(sample_supply_request()).validate().is_ok());
    }

    #[test]
    fn supply_request_without_items_is_rejected() {
        let mut request = sample_supply_request();
        request.items.clear();

        assert_eq!(
            Payload::SupplyRequest(request).validate(),
            Err(ValidationError::EmptyItems)
        );
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let payload = Payload::DirectInventoryRequest(DirectInventoryRequest {
            branch_id: "branch-1".into(),
            item_name: "Paper Cups".into(),
            quantity: 0,
            justification: "running low".into(),
        });

        assert_eq!(
            payload.validate(),
            Err(ValidationError::ZeroQuantity("quantity"))
        );
    }

    #[test]
    fn logistics_locations_must_differ() {
        let payload = Payload::LogisticsRequest(LogisticsRequest {
            request_type: LogisticsKind::Transfer,
            from_location: "central-kitchen".into(),
            to_location: "central-kitchen".into(),
            items: vec![LogisticsItem {
                item_name: "Croissant Trays".into(),
                quantity: 12,
                weight: None,
                dimensions: None,
                handling_instructions: None,
            }],
            scheduled_date: None,
            priority: LogisticsPriority::Medium,
            vehicle_type: Some(VehicleType::Van),
            special_instructions: None,
        });

        assert_eq!(payload.validate(), Err(ValidationError::SameLocations));
    }

    #[test]
    fn branch_affiliation_is_exposed() {
        let payload = Payload::ProductRequest(ProductRequest {
            product_id: "prod_1abc".into(),
            branch_id: "branch-2".into(),
            order_quantity: 10,
            balance_quantity: 2,
        });

        assert_eq!(payload.branch_id(), Some("branch-2"));
        assert_eq!(payload.category(), Category::ProductRequest);
    }
}
