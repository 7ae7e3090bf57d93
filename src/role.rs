//! Approver roles and the authenticated actor identity

/// The management roles of the chain. Every workflow chain is an ordered
/// list of these.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, minicbor::Encode, minicbor::Decode,
)]
pub enum Role {
    #[n(0)]
    MainManager,
    #[n(1)]
    BranchManager,
    #[n(2)]
    CentralKitchenManager,
    #[n(3)]
    InventoryManager,
    #[n(4)]
    SupplierManager,
    #[n(5)]
    LogisticsManager,
}

impl Role {
    /// Human readable name, used for display and log output.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::MainManager => "Main Manager",
            Role::BranchManager => "Branch Manager",
            Role::CentralKitchenManager => "Central Kitchen Manager",
            Role::InventoryManager => "Inventory Manager",
            Role::SupplierManager => "Supplier Manager",
            Role::LogisticsManager => "Logistics Manager",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// An already-authenticated principal. Authentication and session handling
/// happen outside the engine; the engine only consumes this triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub role: Role,
    pub branch_id: Option<String>,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            branch_id: None,
        }
    }

    pub fn with_branch(id: impl Into<String>, role: Role, branch_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            branch_id: Some(branch_id.into()),
        }
    }
}
