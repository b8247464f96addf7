use std::sync::Arc;

use recetario_common::storage::ImageStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::utils::credentials::{CredentialVerifier, StaticCredentials};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub images: Arc<dyn ImageStore>,
    pub credentials: Arc<dyn CredentialVerifier>,
}

impl AppState {
    /// Build the state with the credential check taken from `config.auth`.
    pub fn new(config: AppConfig, db: DatabaseConnection, images: Arc<dyn ImageStore>) -> Self {
        let credentials = Arc::new(StaticCredentials::from_config(&config.auth));
        Self {
            db,
            config,
            images,
            credentials,
        }
    }
}
