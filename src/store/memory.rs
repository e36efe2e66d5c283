use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{AssetStore, StoreError, UpdateDoc, UserStore};
use crate::model::{Asset, User};

/// In-memory store with the same dot-path update semantics as the Postgres
/// implementation. Used by the integration tests; not wired into the binary.
#[derive(Default)]
pub struct MemoryStore {
    assets: RwLock<BTreeMap<String, Value>>,
    users: RwLock<BTreeMap<String, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct read of a stored user record, for assertions on stored state.
    pub fn stored_user(&self, username: &str) -> Option<User> {
        let users = self.users.read().unwrap();
        users.values().find(|u| u.username == username).cloned()
    }

    pub fn asset_count(&self) -> usize {
        self.assets.read().unwrap().len()
    }
}

#[async_trait]
impl AssetStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Asset>, StoreError> {
        let assets = self.assets.read().unwrap();
        let mut all: Vec<Asset> = assets
            .values()
            .map(|doc| decode(doc.clone()))
            .collect::<Result<_, _>>()?;
        all.sort_by_key(|a| a.added_at);
        Ok(all)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Asset>, StoreError> {
        let assets = self.assets.read().unwrap();
        assets.get(id).cloned().map(decode).transpose()
    }

    async fn insert(&self, asset: &Asset) -> Result<(), StoreError> {
        let doc = serde_json::to_value(asset).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let mut assets = self.assets.write().unwrap();
        assets.insert(asset.id.clone(), doc);
        Ok(())
    }

    async fn update_by_id(&self, id: &str, update: &UpdateDoc) -> Result<(), StoreError> {
        let mut assets = self.assets.write().unwrap();
        let doc = assets.get_mut(id).ok_or(StoreError::NotFound)?;
        for (path, value) in update {
            set_path(doc, path, value.clone());
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let mut assets = self.assets.write().unwrap();
        assets.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::UsernameConflict(user.username.clone()));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().unwrap();
        Ok(users.get(id).cloned())
    }
}

fn decode(doc: Value) -> Result<Asset, StoreError> {
    serde_json::from_value(doc).map_err(|e| StoreError::Corrupt(e.to_string()))
}

/// Set a single dot-path in a document, creating intermediate objects as
/// needed. Mirrors `jsonb_set(..., create_missing => true)`.
fn set_path(doc: &mut Value, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut current = doc;
    while let Some(segment) = segments.next() {
        let obj = match current {
            Value::Object(obj) => obj,
            _ => return,
        };
        if segments.peek().is_none() {
            obj.insert(segment.to_string(), value);
            return;
        }
        current = obj
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}
