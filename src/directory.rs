//! Static directory of branches and suppliers
//!
//! Display-join data only: the workflow never branches on any of it. Loaded
//! once for the process lifetime.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub id: &'static str,
    pub name: &'static str,
    pub location: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supplier {
    pub id: &'static str,
    pub name: &'static str,
    pub contact_person: &'static str,
    pub phone: &'static str,
    pub categories: &'static [&'static str],
}

pub const BRANCHES: &[Branch] = &[
    Branch {
        id: "branch-1",
        name: "Blumen Downtown",
        location: "123 Main Street",
    },
    Branch {
        id: "branch-2",
        name: "Blumen Uptown",
        location: "456 Oak Avenue",
    },
    Branch {
        id: "central-kitchen",
        name: "Central Kitchen",
        location: "789 Industrial District",
    },
    Branch {
        id: "main-warehouse",
        name: "Main Warehouse",
        location: "321 Storage Complex",
    },
];

pub const SUPPLIERS: &[Supplier] = &[
    Supplier {
        id: "supplier-1",
        name: "RUKN AL MOUWAREDEN",
        contact_person: "Ahmed Al-Rashid",
        phone: "+966-11-123-4567",
        categories: &["Dairy", "Condiments", "Baking Supplies", "Spices"],
    },
    Supplier {
        id: "supplier-2",
        name: "WAHEJ AL KHAYAL",
        contact_person: "Fatima Al-Zahra",
        phone: "+966-11-234-5678",
        categories: &["Fresh Produce", "Fruits", "Vegetables"],
    },
    Supplier {
        id: "supplier-3",
        name: "CDC",
        contact_person: "Omar Hassan",
        phone: "+966-11-345-6789",
        categories: &["Food Coloring", "Additives"],
    },
    Supplier {
        id: "supplier-4",
        name: "MAWADUNA",
        contact_person: "Aisha Mohammed",
        phone: "+966-11-456-7890",
        categories: &["Glucose", "Stabilizers"],
    },
];

pub fn branch(id: &str) -> Option<&'static Branch> {
    BRANCHES.iter().find(|b| b.id == id)
}

pub fn supplier(id: &str) -> Option<&'static Supplier> {
    SUPPLIERS.iter().find(|s| s.id == id)
}
