//! Device push-registration.
//!
//! Wraps the platform notification service behind a trait so the session
//! lifecycle can be exercised without a real device. Every failure path here
//! collapses to "no push token"; registration is never allowed to fail a
//! login or a session restore.

use async_trait::async_trait;
use log::{debug, error, info, warn};
use std::fmt::Debug;
use std::sync::Arc;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

/// Where the client is running. Sandboxed hosts (development shells, preview
/// clients) cannot receive a raw device push token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEnvironment {
    Standalone,
    Sandboxed,
}

/// Seam over the platform notification service.
#[async_trait]
pub trait PushPlatform: Send + Sync + Debug {
    async fn permission_status(&self) -> PermissionStatus;
    async fn request_permission(&self) -> PermissionStatus;
    fn host_environment(&self) -> HostEnvironment;
    async fn device_push_token(&self) -> AppResult<String>;
}

/// Platform stub for hosts with no notification service at all. Reports a
/// sandboxed environment so registration always yields `None`.
#[derive(Debug, Default)]
pub struct DisabledPushPlatform;

#[async_trait]
impl PushPlatform for DisabledPushPlatform {
    async fn permission_status(&self) -> PermissionStatus {
        PermissionStatus::Denied
    }

    async fn request_permission(&self) -> PermissionStatus {
        PermissionStatus::Denied
    }

    fn host_environment(&self) -> HostEnvironment {
        HostEnvironment::Sandboxed
    }

    async fn device_push_token(&self) -> AppResult<String> {
        Err(crate::error::AppError::InternalError(
            "Push notifications are disabled on this host".to_string(),
        ))
    }
}

/// Requests permission and fetches the device push token. Safe to call
/// repeatedly; re-fetching simply confirms or refreshes the token.
#[derive(Debug, Clone)]
pub struct PushRegistrationClient {
    platform: Arc<dyn PushPlatform>,
}

impl PushRegistrationClient {
    pub fn new(platform: Arc<dyn PushPlatform>) -> Self {
        Self { platform }
    }

    pub async fn register(&self) -> Option<String> {
        let mut status = self.platform.permission_status().await;
        if status != PermissionStatus::Granted {
            status = self.platform.request_permission().await;
        }
        if status != PermissionStatus::Granted {
            info!("Notification permission denied; skipping push registration");
            return None;
        }

        if self.platform.host_environment() == HostEnvironment::Sandboxed {
            warn!("Sandboxed host cannot receive a device push token; skipping registration");
            return None;
        }

        match self.platform.device_push_token().await {
            Ok(token) => {
                debug!("Obtained device push token");
                Some(token)
            }
            Err(e) => {
                error!("Failed to obtain device push token: {}", e);
                None
            }
        }
    }
}
