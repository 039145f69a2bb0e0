//! User profile storage (consumed, not designed here).

use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vouch_types::UserId;

/// A user's identity profile: canonical attribute name -> value.
///
/// Attribute names are the canonical forms (`fullName`, `idNumber`,
/// `address`, `dob`) that field extraction maps onto.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub attributes: BTreeMap<String, String>,
}

impl UserProfile {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// The attribute value, or `None` when absent or empty.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Trait for reading user profiles.
pub trait ProfileStore: Send + Sync {
    fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError>;

    fn put_profile(&self, profile: &UserProfile) -> Result<(), StoreError>;
}
