//! Push-platform port interface

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::notification::{NotificationEvent, NotificationResponse};
use crate::domain::registration::{
    DeviceInfo, NotificationChannel, PermissionStatus, PresentationPolicy, ProjectId, PushToken,
};

/// Push-platform errors
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("Platform request failed: {0}")]
    Request(String),

    #[error("Platform returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("Platform rejected the call: {status} {message}")]
    Rejected { status: u16, message: String },
}

/// Handle identifying one opened listener at the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Callback invoked for each delivered notification.
pub type ReceivedHandler = Box<dyn Fn(NotificationEvent) + Send + Sync>;

/// Callback invoked for each user response to a notification.
pub type ResponseHandler = Box<dyn Fn(NotificationResponse) + Send + Sync>;

/// Port for the device push-notification capability.
///
/// This system is a consumer only; token issuance, message routing, and the
/// permission dialog all live behind this trait.
#[async_trait]
pub trait PushPlatform: Send + Sync {
    /// Hardware facts for this installation.
    fn device(&self) -> DeviceInfo;

    /// Install the foreground presentation policy.
    async fn set_presentation_policy(
        &self,
        policy: PresentationPolicy,
    ) -> Result<(), PlatformError>;

    /// Query the current notification permission without prompting.
    async fn get_permissions(&self) -> Result<PermissionStatus, PlatformError>;

    /// Prompt the user for notification permission.
    async fn request_permissions(&self) -> Result<PermissionStatus, PlatformError>;

    /// Fetch a push token scoped to the given project.
    async fn get_token(&self, project_id: &ProjectId) -> Result<PushToken, PlatformError>;

    /// Declare a notification channel (meaningful on Android only).
    async fn set_notification_channel(
        &self,
        channel: &NotificationChannel,
    ) -> Result<(), PlatformError>;

    /// Open a notification-received listener.
    fn add_received_listener(&self, handler: ReceivedHandler) -> SubscriptionId;

    /// Open a notification-response listener.
    fn add_response_listener(&self, handler: ResponseHandler) -> SubscriptionId;

    /// Release a previously opened listener. Must be idempotent; the
    /// platform must never dispatch to a released listener.
    fn remove_subscription(&self, id: SubscriptionId);
}

/// Owned handle for one opened listener.
///
/// Releases the listener exactly once: either explicitly through
/// [`Subscription::release`] or on drop, so early exit paths cannot leak it.
pub struct Subscription {
    id: SubscriptionId,
    platform: Arc<dyn PushPlatform>,
    released: bool,
}

impl Subscription {
    pub fn new(id: SubscriptionId, platform: Arc<dyn PushPlatform>) -> Self {
        Self {
            id,
            platform,
            released: false,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Release the listener now.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if !self.released {
            self.released = true;
            self.platform.remove_subscription(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_inner();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    struct CountingPlatform {
        next_id: AtomicU64,
        removals: AtomicUsize,
    }

    impl CountingPlatform {
        fn new() -> Self {
            Self {
                next_id: AtomicU64::new(1),
                removals: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PushPlatform for CountingPlatform {
        fn device(&self) -> DeviceInfo {
            DeviceInfo {
                is_physical: true,
                os: crate::domain::registration::PlatformOs::Other,
            }
        }

        async fn set_presentation_policy(
            &self,
            _policy: PresentationPolicy,
        ) -> Result<(), PlatformError> {
            Ok(())
        }

        async fn get_permissions(&self) -> Result<PermissionStatus, PlatformError> {
            Ok(PermissionStatus::Granted)
        }

        async fn request_permissions(&self) -> Result<PermissionStatus, PlatformError> {
            Ok(PermissionStatus::Granted)
        }

        async fn get_token(&self, _project_id: &ProjectId) -> Result<PushToken, PlatformError> {
            Ok(PushToken::new("tok"))
        }

        async fn set_notification_channel(
            &self,
            _channel: &NotificationChannel,
        ) -> Result<(), PlatformError> {
            Ok(())
        }

        fn add_received_listener(&self, _handler: ReceivedHandler) -> SubscriptionId {
            SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst))
        }

        fn add_response_listener(&self, _handler: ResponseHandler) -> SubscriptionId {
            SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst))
        }

        fn remove_subscription(&self, _id: SubscriptionId) {
            self.removals.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn subscription_releases_on_drop() {
        let platform = Arc::new(CountingPlatform::new());
        let dyn_platform: Arc<dyn PushPlatform> = platform.clone();

        let id = dyn_platform.add_received_listener(Box::new(|_| {}));
        {
            let _sub = Subscription::new(id, dyn_platform.clone());
        }
        assert_eq!(platform.removals.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn explicit_release_does_not_double_release() {
        let platform = Arc::new(CountingPlatform::new());
        let dyn_platform: Arc<dyn PushPlatform> = platform.clone();

        let id = dyn_platform.add_received_listener(Box::new(|_| {}));
        let sub = Subscription::new(id, dyn_platform.clone());
        sub.release();
        assert_eq!(platform.removals.load(Ordering::SeqCst), 1);
    }
}
