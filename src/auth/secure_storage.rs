use async_trait::async_trait;
use keyring::{Entry, Error as KeyringError};
use log::{debug, error};
use std::fmt::Debug;
use std::sync::RwLock;

use crate::constants::{ACCOUNT_NAME_FOR_KEYRING, SERVICE_NAME_FOR_KEYRING};
use crate::error::{AppError, AppResult};

/// Durable home for the single session token. One fixed key; the platform's
/// encrypted-at-rest store is the only persisted representation of a session.
#[async_trait]
pub trait SecureStorage: Send + Sync + Debug {
    async fn get(&self) -> AppResult<Option<String>>;
    async fn set(&self, token: &str) -> AppResult<()>;
    async fn delete(&self) -> AppResult<()>;
}

/// OS keyring backed storage (persistent across restarts).
#[derive(Debug, Default)]
pub struct KeyringStorage;

impl KeyringStorage {
    pub fn new() -> Self {
        Self
    }

    fn entry(&self) -> AppResult<Entry> {
        Entry::new(SERVICE_NAME_FOR_KEYRING, ACCOUNT_NAME_FOR_KEYRING).map_err(|e| {
            error!(
                "Failed to create keyring entry - OS: {:?}, Error: {}",
                std::env::consts::OS,
                e
            );
            AppError::StorageError(format!("Failed to create keyring entry: {}", e))
        })
    }
}

#[async_trait]
impl SecureStorage for KeyringStorage {
    async fn get(&self) -> AppResult<Option<String>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(token) => {
                debug!("Token retrieved from keyring");
                Ok(Some(token))
            }
            Err(KeyringError::NoEntry) => {
                debug!("No token entry in keyring (user not logged in)");
                Ok(None)
            }
            Err(e) => {
                error!(
                    "Keyring read error - OS: {:?}, Details: {}",
                    std::env::consts::OS,
                    e
                );
                Err(AppError::StorageError(format!(
                    "Failed to retrieve token from keyring: {}",
                    e
                )))
            }
        }
    }

    async fn set(&self, token: &str) -> AppResult<()> {
        let entry = self.entry()?;
        entry.set_password(token).map_err(|e| {
            error!(
                "Failed to store token in keyring - OS: {:?}, Error: {}",
                std::env::consts::OS,
                e
            );
            AppError::StorageError(format!("Failed to store token: {}", e))
        })?;
        debug!("Token saved to keyring");
        Ok(())
    }

    async fn delete(&self) -> AppResult<()> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) => {
                debug!("Token cleared from keyring");
                Ok(())
            }
            Err(KeyringError::NoEntry) => {
                debug!("No token to clear in keyring (already empty)");
                Ok(())
            }
            Err(e) => {
                error!(
                    "Failed to clear token from keyring - OS: {:?}, Error: {}",
                    std::env::consts::OS,
                    e
                );
                Err(AppError::StorageError(format!("Failed to clear token: {}", e)))
            }
        }
    }
}

/// In-memory storage for tests and sandboxed hosts without a keyring.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    token: RwLock<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecureStorage for MemoryStorage {
    async fn get(&self) -> AppResult<Option<String>> {
        let token = self
            .token
            .read()
            .map_err(|e| AppError::StorageError(format!("Failed to read session token: {}", e)))?;
        Ok(token.clone())
    }

    async fn set(&self, token: &str) -> AppResult<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|e| AppError::StorageError(format!("Failed to write session token: {}", e)))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    async fn delete(&self) -> AppResult<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|e| AppError::StorageError(format!("Failed to write session token: {}", e)))?;
        *guard = None;
        Ok(())
    }
}
