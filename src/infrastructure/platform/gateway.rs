//! Push gateway platform adapter
//!
//! Speaks HTTP to a self-hosted push gateway: permission state, token
//! issuance, channel declarations, and an inbox that is long-polled from a
//! background task. Inbox deliveries are dispatched to the registered
//! listeners; foreground alerts honor the installed presentation policy.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::application::ports::{
    AlertSeverity, Alerter, PlatformError, PushPlatform, ReceivedHandler, ResponseHandler,
    SubscriptionId,
};
use crate::domain::notification::{
    derive_body, derive_title, NotificationEvent, NotificationResponse,
};
use crate::domain::registration::{
    DeviceInfo, NotificationChannel, PermissionStatus, PresentationPolicy, ProjectId, PushToken,
};

/// Pause between inbox polls after a transport error.
const POLL_BACKOFF: Duration = Duration::from_secs(1);

// Wire types for the gateway API

#[derive(Debug, Deserialize)]
struct PermissionResponse {
    status: PermissionStatus,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    device_id: &'a str,
    project_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Default, Deserialize)]
struct InboxResponse {
    #[serde(default)]
    events: Vec<NotificationEvent>,
    #[serde(default)]
    responses: Vec<NotificationResponse>,
    cursor: u64,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    received: HashMap<SubscriptionId, ReceivedHandler>,
    response: HashMap<SubscriptionId, ResponseHandler>,
}

impl Listeners {
    fn allocate(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }
}

/// Push platform reached over a gateway HTTP API
pub struct GatewayPlatform {
    client: reqwest::Client,
    base_url: String,
    device_id: String,
    device: DeviceInfo,
    alerter: Option<Arc<dyn Alerter>>,
    policy: Arc<Mutex<Option<PresentationPolicy>>>,
    listeners: Arc<Mutex<Listeners>>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl GatewayPlatform {
    /// Create a new gateway platform adapter.
    pub fn new(
        base_url: impl Into<String>,
        device_id: impl Into<String>,
        device: DeviceInfo,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            device_id: device_id.into(),
            device,
            alerter: None,
            policy: Arc::new(Mutex::new(None)),
            listeners: Arc::new(Mutex::new(Listeners::default())),
            poller: Mutex::new(None),
        }
    }

    /// Surface foreground alerts through the given alerter.
    pub fn with_alerter(mut self, alerter: Arc<dyn Alerter>) -> Self {
        self.alerter = Some(alerter);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn permission_url(&self) -> String {
        self.url(&format!("/v1/devices/{}/permission", self.device_id))
    }

    async fn read_permission(
        response: reqwest::Response,
    ) -> Result<PermissionStatus, PlatformError> {
        let response = check_status(response).await?;
        let body: PermissionResponse = response
            .json()
            .await
            .map_err(|e| PlatformError::InvalidResponse(e.to_string()))?;
        Ok(body.status)
    }

    /// Start the inbox poll loop if it is not already running.
    fn ensure_polling(&self) {
        let mut poller = self.poller.lock().unwrap();
        if poller.is_some() {
            return;
        }

        let client = self.client.clone();
        let inbox_url = self.url(&format!("/v1/devices/{}/inbox", self.device_id));
        let listeners = Arc::clone(&self.listeners);
        let alerter = self.alerter.clone();
        let policy = Arc::clone(&self.policy);

        *poller = Some(tokio::spawn(async move {
            let mut cursor: u64 = 0;
            loop {
                let request = client
                    .get(&inbox_url)
                    .query(&[("cursor", cursor.to_string())])
                    .send()
                    .await;

                let inbox: InboxResponse = match request {
                    Ok(response) if response.status().is_success() => {
                        match response.json().await {
                            Ok(inbox) => inbox,
                            Err(_) => {
                                tokio::time::sleep(POLL_BACKOFF).await;
                                continue;
                            }
                        }
                    }
                    _ => {
                        tokio::time::sleep(POLL_BACKOFF).await;
                        continue;
                    }
                };

                cursor = inbox.cursor;

                for event in inbox.events {
                    let show_alert = policy
                        .lock()
                        .unwrap()
                        .map(|p| p.show_alert)
                        .unwrap_or(false);
                    if let Some(alerter) = alerter.as_ref().filter(|_| show_alert) {
                        // Alert only: the installed policy disables sound
                        // and badge.
                        let _ = alerter
                            .alert(
                                derive_title(Some(&event)),
                                derive_body(Some(&event)),
                                AlertSeverity::Info,
                            )
                            .await;
                    }
                    let guard = listeners.lock().unwrap();
                    for handler in guard.received.values() {
                        handler(event.clone());
                    }
                }

                for response in inbox.responses {
                    let guard = listeners.lock().unwrap();
                    for handler in guard.response.values() {
                        handler(response.clone());
                    }
                }
            }
        }));
    }
}

impl Drop for GatewayPlatform {
    fn drop(&mut self) {
        if let Some(handle) = self.poller.lock().unwrap().take() {
            handle.abort();
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, PlatformError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(PlatformError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl PushPlatform for GatewayPlatform {
    fn device(&self) -> DeviceInfo {
        self.device
    }

    async fn set_presentation_policy(
        &self,
        policy: PresentationPolicy,
    ) -> Result<(), PlatformError> {
        *self.policy.lock().unwrap() = Some(policy);
        Ok(())
    }

    async fn get_permissions(&self) -> Result<PermissionStatus, PlatformError> {
        let response = self
            .client
            .get(self.permission_url())
            .send()
            .await
            .map_err(|e| PlatformError::Request(e.to_string()))?;
        Self::read_permission(response).await
    }

    async fn request_permissions(&self) -> Result<PermissionStatus, PlatformError> {
        let response = self
            .client
            .post(format!("{}/request", self.permission_url()))
            .send()
            .await
            .map_err(|e| PlatformError::Request(e.to_string()))?;
        Self::read_permission(response).await
    }

    async fn get_token(&self, project_id: &ProjectId) -> Result<PushToken, PlatformError> {
        let body = TokenRequest {
            device_id: &self.device_id,
            project_id: project_id.as_str(),
        };

        let response = self
            .client
            .post(self.url("/v1/tokens"))
            .json(&body)
            .send()
            .await
            .map_err(|e| PlatformError::Request(e.to_string()))?;

        let response = check_status(response).await?;
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| PlatformError::InvalidResponse(e.to_string()))?;

        if body.token.is_empty() {
            return Err(PlatformError::InvalidResponse(
                "gateway issued an empty token".to_string(),
            ));
        }
        Ok(PushToken::new(body.token))
    }

    async fn set_notification_channel(
        &self,
        channel: &NotificationChannel,
    ) -> Result<(), PlatformError> {
        let url = self.url(&format!(
            "/v1/devices/{}/channels/{}",
            self.device_id, channel.name
        ));

        let response = self
            .client
            .put(url)
            .json(channel)
            .send()
            .await
            .map_err(|e| PlatformError::Request(e.to_string()))?;

        check_status(response).await?;
        Ok(())
    }

    fn add_received_listener(&self, handler: ReceivedHandler) -> SubscriptionId {
        let id = {
            let mut guard = self.listeners.lock().unwrap();
            let id = guard.allocate();
            guard.received.insert(id, handler);
            id
        };
        self.ensure_polling();
        id
    }

    fn add_response_listener(&self, handler: ResponseHandler) -> SubscriptionId {
        let id = {
            let mut guard = self.listeners.lock().unwrap();
            let id = guard.allocate();
            guard.response.insert(id, handler);
            id
        };
        self.ensure_polling();
        id
    }

    fn remove_subscription(&self, id: SubscriptionId) {
        let mut guard = self.listeners.lock().unwrap();
        guard.received.remove(&id);
        guard.response.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registration::PlatformOs;

    fn platform() -> GatewayPlatform {
        GatewayPlatform::new(
            "http://gateway.local/",
            "dev-1",
            DeviceInfo {
                is_physical: true,
                os: PlatformOs::Android,
            },
        )
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let platform = platform();
        assert_eq!(
            platform.permission_url(),
            "http://gateway.local/v1/devices/dev-1/permission"
        );
    }

    #[test]
    fn listener_ids_are_unique_across_kinds() {
        let platform = platform();
        // Avoid ensure_polling's tokio::spawn outside a runtime.
        let a = {
            let mut guard = platform.listeners.lock().unwrap();
            let id = guard.allocate();
            guard.received.insert(id, Box::new(|_| {}));
            id
        };
        let b = {
            let mut guard = platform.listeners.lock().unwrap();
            let id = guard.allocate();
            guard.response.insert(id, Box::new(|_| {}));
            id
        };
        assert_ne!(a, b);
    }

    #[test]
    fn remove_subscription_is_idempotent() {
        let platform = platform();
        let id = {
            let mut guard = platform.listeners.lock().unwrap();
            let id = guard.allocate();
            guard.received.insert(id, Box::new(|_| {}));
            id
        };
        platform.remove_subscription(id);
        platform.remove_subscription(id);
        assert!(platform.listeners.lock().unwrap().received.is_empty());
    }
}
