//! Connected user, as persisted in the client key-value store

use crate::core::error::SessionError;
use crate::storage::local_storage::LocalStorage;
use serde::{Deserialize, Serialize};

/// Key under which the connected user is stored
pub const USER_KEY: &str = "user";

/// Kind of account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Employee,
    Admin,
}

/// The `user` record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "type")]
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn employee(email: impl Into<String>) -> Self {
        Self {
            user_type: UserType::Employee,
            email: Some(email.into()),
        }
    }

    /// Read the connected user, `None` when nobody is stored
    pub fn load(storage: &dyn LocalStorage) -> Result<Option<Self>, SessionError> {
        let Some(raw) = storage.get_item(USER_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| SessionError::InvalidUser {
                message: e.to_string(),
            })
    }

    /// Persist this user as the connected one
    pub fn save(&self, storage: &dyn LocalStorage) -> Result<(), SessionError> {
        let raw = serde_json::to_string(self).map_err(|e| SessionError::InvalidUser {
            message: e.to_string(),
        })?;
        storage.set_item(USER_KEY, &raw)
    }
}
