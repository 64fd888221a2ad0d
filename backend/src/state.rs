//! Shared application state.
//!
//! Built once at startup and cloned into every handler; everything inside is
//! either immutable or internally pooled.

use std::sync::Arc;

use crate::auth::errors::AuthError;
use crate::auth::service::AuthService;
use crate::config::Config;
use crate::database::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(config: &Config, db: Database) -> Result<Self, AuthError> {
        let auth = AuthService::from_config(config, Arc::new(db.clone()))?;
        Ok(Self {
            db,
            auth: Arc::new(auth),
        })
    }
}
