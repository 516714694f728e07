//! In-memory scripted push platform
//!
//! Backs the `--simulate` modes and serves as the test double for the
//! session lifecycle. Permissions and token issuance follow a fixed script;
//! deliveries are injected manually. Listener bookkeeping is exact so tests
//! can assert the acquire/release discipline.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{
    PlatformError, PushPlatform, ReceivedHandler, ResponseHandler, SubscriptionId,
};
use crate::domain::notification::{NotificationEvent, NotificationResponse};
use crate::domain::registration::{
    DeviceInfo, NotificationChannel, PermissionStatus, PlatformOs, PresentationPolicy, ProjectId,
    PushToken,
};

#[derive(Default)]
struct Listeners {
    next_id: u64,
    received: HashMap<SubscriptionId, ReceivedHandler>,
    response: HashMap<SubscriptionId, ResponseHandler>,
    released: Vec<SubscriptionId>,
}

impl Listeners {
    fn allocate(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }
}

/// Scripted in-memory push platform
pub struct SimulatedPlatform {
    device: DeviceInfo,
    permission: Mutex<PermissionStatus>,
    on_request: PermissionStatus,
    token: String,
    policy: Mutex<Option<PresentationPolicy>>,
    channels: Mutex<Vec<NotificationChannel>>,
    listeners: Mutex<Listeners>,
}

impl SimulatedPlatform {
    /// A non-physical environment: registration must skip with a diagnostic.
    pub fn emulator(os: PlatformOs) -> Self {
        Self::with_device(DeviceInfo {
            is_physical: false,
            os,
        })
    }

    /// A physical device with an undetermined permission that is granted
    /// when requested.
    pub fn device(os: PlatformOs) -> Self {
        Self::with_device(DeviceInfo {
            is_physical: true,
            os,
        })
    }

    fn with_device(device: DeviceInfo) -> Self {
        Self {
            device,
            permission: Mutex::new(PermissionStatus::Undetermined),
            on_request: PermissionStatus::Granted,
            token: "SimToken[device]".to_string(),
            policy: Mutex::new(None),
            channels: Mutex::new(Vec::new()),
            listeners: Mutex::new(Listeners::default()),
        }
    }

    /// Script the permission flow: the pre-existing status and the answer
    /// the user gives to the prompt.
    pub fn with_permissions(mut self, existing: PermissionStatus, on_request: PermissionStatus) -> Self {
        self.permission = Mutex::new(existing);
        self.on_request = on_request;
        self
    }

    /// Script the token the platform issues.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Inject a delivered notification; returns how many listeners were
    /// dispatched. Released listeners are never dispatched.
    pub fn deliver(&self, event: NotificationEvent) -> usize {
        let guard = self.listeners.lock().unwrap();
        for handler in guard.received.values() {
            handler(event.clone());
        }
        guard.received.len()
    }

    /// Inject a notification response; returns how many listeners were
    /// dispatched.
    pub fn deliver_response(&self, response: NotificationResponse) -> usize {
        let guard = self.listeners.lock().unwrap();
        for handler in guard.response.values() {
            handler(response.clone());
        }
        guard.response.len()
    }

    /// The presentation policy installed by the session, if any.
    pub fn installed_policy(&self) -> Option<PresentationPolicy> {
        *self.policy.lock().unwrap()
    }

    /// Channels declared so far.
    pub fn declared_channels(&self) -> Vec<NotificationChannel> {
        self.channels.lock().unwrap().clone()
    }

    /// Listeners currently open (both kinds).
    pub fn open_listeners(&self) -> usize {
        let guard = self.listeners.lock().unwrap();
        guard.received.len() + guard.response.len()
    }

    /// Release calls observed, in order.
    pub fn released(&self) -> Vec<SubscriptionId> {
        self.listeners.lock().unwrap().released.clone()
    }
}

#[async_trait]
impl PushPlatform for SimulatedPlatform {
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
        Ok(*self.permission.lock().unwrap())
    }

    async fn request_permissions(&self) -> Result<PermissionStatus, PlatformError> {
        let mut permission = self.permission.lock().unwrap();
        *permission = self.on_request;
        Ok(*permission)
    }

    async fn get_token(&self, _project_id: &ProjectId) -> Result<PushToken, PlatformError> {
        Ok(PushToken::new(self.token.clone()))
    }

    async fn set_notification_channel(
        &self,
        channel: &NotificationChannel,
    ) -> Result<(), PlatformError> {
        self.channels.lock().unwrap().push(channel.clone());
        Ok(())
    }

    fn add_received_listener(&self, handler: ReceivedHandler) -> SubscriptionId {
        let mut guard = self.listeners.lock().unwrap();
        let id = guard.allocate();
        guard.received.insert(id, handler);
        id
    }

    fn add_response_listener(&self, handler: ResponseHandler) -> SubscriptionId {
        let mut guard = self.listeners.lock().unwrap();
        let id = guard.allocate();
        guard.response.insert(id, handler);
        id
    }

    fn remove_subscription(&self, id: SubscriptionId) {
        let mut guard = self.listeners.lock().unwrap();
        guard.received.remove(&id);
        guard.response.remove(&id);
        guard.released.push(id);
    }
}
