use std::sync::Arc;

use crate::config::AuthConfig;
use crate::store::{AssetStore, UserStore};

/// Shared handles injected into every route handler. Constructed once in
/// `main` (or by the tests) rather than held as ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub assets: Arc<dyn AssetStore>,
    pub users: Arc<dyn UserStore>,
    pub auth: Arc<AuthConfig>,
}
