//! Entity id minting
//!
//! Ids are uuid7 values bech32m-encoded under a per-category prefix, so a
//! raw id is enough to tell a product ("prod_1...") from, say, a supply
//! request ("sup_1...").
use bech32::Bech32m;
use uuid7::uuid7;

use crate::error::WorkflowError;
use crate::request::Category;

/// Mint a fresh unique id for an entity of the given category.
pub fn new_entity_id(category: Category) -> Result<String, WorkflowError> {
    let hrp = bech32::Hrp::parse_unchecked(category.id_prefix());
    let encoded = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encoded)
}
