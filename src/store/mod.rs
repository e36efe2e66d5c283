pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{Asset, User};

/// Flat dot-path update document produced by [`crate::flatten::flatten`].
/// Every key names a field to set; absent fields are left untouched.
pub type UpdateDoc = Map<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("username '{0}' already exists")]
    UsernameConflict(String),
    #[error("store connection error: {0}")]
    Connection(String),
    #[error("store query error: {0}")]
    Query(String),
    #[error("stored document failed to decode: {0}")]
    Corrupt(String),
}

/// Narrow access contract for the asset collection. Lookup is exact-match on
/// the opaque id; each call is individually atomic.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Asset>, StoreError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Asset>, StoreError>;
    async fn insert(&self, asset: &Asset) -> Result<(), StoreError>;
    /// Apply exactly the flattened fields of `update` to the record with the
    /// given id. Fails with [`StoreError::NotFound`] when the id is unknown.
    async fn update_by_id(&self, id: &str, update: &UpdateDoc) -> Result<(), StoreError>;
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;
    /// Cheap reachability probe for the health endpoint.
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Narrow access contract for registered users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::UsernameConflict`] when the username is taken.
    async fn create(&self, user: &User) -> Result<(), StoreError>;
    async fn by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn by_id(&self, id: &str) -> Result<Option<User>, StoreError>;
}
