//! Product records and the wire-facing product view.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::identity::{owner_to_wire, Identity};
use crate::serial::Serial;

/// The authoritative product record held by the registry.
///
/// Claim state is derived from `current_owner`: a product is claimed
/// exactly when it has an owner, so the pair cannot drift apart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Unique product key.
    pub serial: Serial,
    /// Product name.
    pub name: String,
    /// Manufacturer name.
    pub manufacturer: String,
    /// Opaque content-addressed image handle; possibly empty.
    pub image_handle: String,
    /// Unix timestamp of registration.
    pub registered_at: u64,
    /// The identity that registered the product.
    pub registrar: Identity,
    /// Current owner, if claimed.
    pub current_owner: Option<Identity>,
    /// Unix timestamp of the claim, if claimed.
    pub claimed_at: Option<u64>,
}

impl ProductRecord {
    /// Whether the product has been claimed.
    pub fn is_claimed(&self) -> bool {
        self.current_owner.is_some()
    }

    /// Build the read-model view for this record.
    pub fn view(&self) -> ProductView {
        ProductView {
            serial: self.serial.as_str().to_string(),
            name: self.name.clone(),
            manufacturer: self.manufacturer.clone(),
            image_handle: self.image_handle.clone(),
            registered_at: self.registered_at,
            registrar: self.registrar.as_str().to_string(),
            is_claimed: self.is_claimed(),
            current_owner: owner_to_wire(self.current_owner.as_ref()),
            claimed_at: self.claimed_at,
            registered: true,
        }
    }
}

/// The read model returned by `verify` and `get_product_details`.
///
/// Stable wire shape: an unknown serial yields `registered: false` with
/// the echoed serial and empty remaining fields. An empty `currentOwner`
/// means the product is unclaimed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductView {
    pub serial: String,
    pub name: String,
    pub manufacturer: String,
    pub image_handle: String,
    pub registered_at: u64,
    pub registrar: String,
    pub is_claimed: bool,
    pub current_owner: String,
    pub claimed_at: Option<u64>,
    pub registered: bool,
}

impl ProductView {
    /// The view for a serial that is not in the registry.
    pub fn absent(serial: &str) -> Self {
        Self {
            serial: serial.to_string(),
            name: String::new(),
            manufacturer: String::new(),
            image_handle: String::new(),
            registered_at: 0,
            registrar: String::new(),
            is_claimed: false,
            current_owner: String::new(),
            claimed_at: None,
            registered: false,
        }
    }
}
