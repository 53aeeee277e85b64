//! Accounts, locations and the people who work at them.

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// A customer organisation that owns one or more locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: EntityId,
    pub name: String,
}

/// Postal address of a location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}

/// A physical site being onboarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: EntityId,
    pub account_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub address: Address,
    /// The customer user who owns this location, if one has been linked.
    #[serde(default)]
    pub customer_id: Option<EntityId>,
}

/// A person who will receive a phone or extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    #[serde(default)]
    pub location_id: Option<EntityId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}
