//! Push session use case
//!
//! Bridges the platform's push capability into two observable values: the
//! session's registration state (push token) and the most recently received
//! notification. Listener lifetimes are owned here: one acquire per
//! activation, one release per shutdown.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::notification::{NotificationEvent, NotificationResponse};
use crate::domain::registration::{
    NotificationChannel, PermissionStatus, PlatformOs, PresentationPolicy, ProjectId,
    RegistrationOutcome, RegistrationState,
};

use super::ports::{AlertSeverity, Alerter, PlatformError, PushPlatform, Subscription};

/// Errors from activating a push session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Platform setup failed: {0}")]
    Setup(#[from] PlatformError),
}

/// Diagnostic line shown when registering on a simulator or emulator.
pub const UNSUPPORTED_DEVICE_NOTE: &str = "Must use physical device for push notifications";

/// Warning shown when the user denies the permission request.
pub const PERMISSION_DENIED_WARNING: &str = "Failed to get push token for push notification!";

/// Callbacks for observing session activity
#[derive(Default)]
pub struct SessionCallbacks {
    /// Called with diagnostic lines (token issued, registration skipped, failures)
    pub on_diagnostic: Option<Box<dyn Fn(&str) + Send + Sync>>,
    /// Called for each received notification, before state is replaced
    pub on_received: Option<Box<dyn Fn(&NotificationEvent) + Send + Sync>>,
    /// Called for each notification response
    pub on_response: Option<Box<dyn Fn(&NotificationResponse) + Send + Sync>>,
}

impl SessionCallbacks {
    fn diagnostic(&self, line: &str) {
        if let Some(ref cb) = self.on_diagnostic {
            cb(line);
        }
    }
}

/// Read-only view over the session's observable state.
///
/// Cloneable; each render cycle borrows the current values. The `changed`
/// future resolves whenever either value is replaced.
#[derive(Clone)]
pub struct SessionState {
    registration: watch::Receiver<RegistrationState>,
    notification: watch::Receiver<Option<NotificationEvent>>,
}

impl SessionState {
    /// Current registration state.
    pub fn registration(&self) -> RegistrationState {
        self.registration.borrow().clone()
    }

    /// Most recently received notification, if any.
    pub fn notification(&self) -> Option<NotificationEvent> {
        self.notification.borrow().clone()
    }

    /// Wait until either observable value changes.
    ///
    /// Returns false once no further changes can arrive (all producers
    /// have gone away).
    pub async fn changed(&mut self) -> bool {
        tokio::select! {
            res = self.registration.changed() => {
                if res.is_ok() {
                    return true;
                }
                self.notification.changed().await.is_ok()
            }
            res = self.notification.changed() => {
                if res.is_ok() {
                    return true;
                }
                self.registration.changed().await.is_ok()
            }
        }
    }
}

/// The push session use case: activation wires the platform's event streams
/// and registration flow into observable state.
pub struct PushSession {
    platform: Arc<dyn PushPlatform>,
    alerter: Arc<dyn Alerter>,
    project_id: ProjectId,
}

impl PushSession {
    /// Create a new session over the given platform.
    pub fn new(
        platform: Arc<dyn PushPlatform>,
        alerter: Arc<dyn Alerter>,
        project_id: ProjectId,
    ) -> Self {
        Self {
            platform,
            alerter,
            project_id,
        }
    }

    /// Activate the session.
    ///
    /// Side effects, in order: installs the foreground presentation policy
    /// (alert visually, no sound, no badge), opens the two event listeners,
    /// and spawns the asynchronous registration task. Returns the active
    /// session handle (owning the listener subscriptions) and the
    /// observable state.
    pub async fn activate(
        self,
        callbacks: SessionCallbacks,
    ) -> Result<(ActiveSession, SessionState), SessionError> {
        self.platform
            .set_presentation_policy(PresentationPolicy::foreground())
            .await?;

        let (reg_tx, reg_rx) = watch::channel(RegistrationState::Unregistered);
        let (notif_tx, notif_rx) = watch::channel(None::<NotificationEvent>);

        let callbacks = Arc::new(callbacks);

        // Registration is triggered before the listeners open; both may
        // legally fire before it resolves.
        let registration = tokio::spawn(run_registration(
            Arc::clone(&self.platform),
            self.alerter,
            self.project_id,
            reg_tx,
            Arc::clone(&callbacks),
        ));

        // Notification received: replace the current value. Latest only,
        // no history.
        let received_cb = Arc::clone(&callbacks);
        let received_id = self.platform.add_received_listener(Box::new(move |event| {
            if let Some(ref cb) = received_cb.on_received {
                cb(&event);
            }
            let _ = notif_tx.send(Some(event));
        }));
        let received = Subscription::new(received_id, Arc::clone(&self.platform));

        // Notification response: observed only, no state mutation.
        let response_cb = Arc::clone(&callbacks);
        let response_id = self
            .platform
            .add_response_listener(Box::new(move |response| {
                if let Some(ref cb) = response_cb.on_response {
                    cb(&response);
                }
            }));
        let response = Subscription::new(response_id, Arc::clone(&self.platform));

        let active = ActiveSession {
            received: Some(received),
            response: Some(response),
            registration: Some(registration),
        };
        let state = SessionState {
            registration: reg_rx,
            notification: notif_rx,
        };
        Ok((active, state))
    }
}

/// Handle over an activated session.
///
/// Owns both listener subscriptions; dropping it releases them, and
/// [`ActiveSession::shutdown`] releases them explicitly.
pub struct ActiveSession {
    received: Option<Subscription>,
    response: Option<Subscription>,
    registration: Option<JoinHandle<Result<(), PlatformError>>>,
}

impl ActiveSession {
    /// Wait until the registration task has resolved.
    ///
    /// Propagates any platform-call failure the task ran into.
    pub async fn wait_for_registration(&mut self) -> Result<(), PlatformError> {
        match self.registration.take() {
            Some(handle) => handle.await.unwrap_or(Ok(())),
            None => Ok(()),
        }
    }

    /// Tear the session down: release both listeners and reap the
    /// registration task.
    pub async fn shutdown(mut self) -> Result<(), PlatformError> {
        if let Some(sub) = self.received.take() {
            sub.release();
        }
        if let Some(sub) = self.response.take() {
            sub.release();
        }
        match self.registration.take() {
            Some(handle) if handle.is_finished() => handle.await.unwrap_or(Ok(())),
            Some(handle) => {
                // Registration never resolved; the unbounded wait ends with
                // the session.
                handle.abort();
                Ok(())
            }
            None => Ok(()),
        }
    }
}

/// The asynchronous registration flow.
///
/// Skips on non-physical hardware, queries then requests permission, fetches
/// the token, and declares the default Android channel. Sequential, no
/// timeout, no retry.
async fn register<P>(platform: &P, project_id: &ProjectId) -> Result<RegistrationOutcome, PlatformError>
where
    P: PushPlatform + ?Sized,
{
    let device = platform.device();
    if !device.is_physical {
        return Ok(RegistrationOutcome::UnsupportedDevice);
    }

    let existing = platform.get_permissions().await?;
    let final_status = if existing == PermissionStatus::Granted {
        existing
    } else {
        platform.request_permissions().await?
    };
    if final_status != PermissionStatus::Granted {
        return Ok(RegistrationOutcome::PermissionDenied);
    }

    let token = platform.get_token(project_id).await?;

    if device.os == PlatformOs::Android {
        platform
            .set_notification_channel(&NotificationChannel::default_channel())
            .await?;
    }

    Ok(RegistrationOutcome::Registered(token))
}

async fn run_registration(
    platform: Arc<dyn PushPlatform>,
    alerter: Arc<dyn Alerter>,
    project_id: ProjectId,
    reg_tx: watch::Sender<RegistrationState>,
    callbacks: Arc<SessionCallbacks>,
) -> Result<(), PlatformError> {
    let outcome = match register(platform.as_ref(), &project_id).await {
        Ok(outcome) => outcome,
        Err(e) => {
            callbacks.diagnostic(&format!("Registration failed: {}", e));
            return Err(e);
        }
    };

    match outcome {
        RegistrationOutcome::Registered(token) => {
            callbacks.diagnostic(&format!("Push token: {}", token));
            let _ = reg_tx.send(RegistrationState::Registered(token));
        }
        RegistrationOutcome::PermissionDenied => {
            let _ = alerter
                .alert(
                    "Push notifications",
                    PERMISSION_DENIED_WARNING,
                    AlertSeverity::Warning,
                )
                .await;
            let _ = reg_tx.send(RegistrationState::PermissionDenied);
        }
        RegistrationOutcome::UnsupportedDevice => {
            // Deliberate no-op: log only, state stays unregistered.
            callbacks.diagnostic(UNSUPPORTED_DEVICE_NOTE);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        AlertError, ReceivedHandler, ResponseHandler, SubscriptionId,
    };
    use crate::domain::registration::{DeviceInfo, PushToken};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // Mock implementations for testing

    struct MockPlatform {
        device: DeviceInfo,
        existing: PermissionStatus,
        on_request: PermissionStatus,
        token: &'static str,
        channels: Mutex<Vec<NotificationChannel>>,
        requests: Mutex<u32>,
    }

    impl MockPlatform {
        fn new(device: DeviceInfo, existing: PermissionStatus, on_request: PermissionStatus) -> Self {
            Self {
                device,
                existing,
                on_request,
                token: "MockToken[abc]",
                channels: Mutex::new(Vec::new()),
                requests: Mutex::new(0),
            }
        }

        fn physical(os: PlatformOs) -> DeviceInfo {
            DeviceInfo {
                is_physical: true,
                os,
            }
        }
    }

    #[async_trait]
    impl PushPlatform for MockPlatform {
        fn device(&self) -> DeviceInfo {
            self.device
        }

        async fn set_presentation_policy(
            &self,
            _policy: PresentationPolicy,
        ) -> Result<(), PlatformError> {
            Ok(())
        }

        async fn get_permissions(&self) -> Result<PermissionStatus, PlatformError> {
            Ok(self.existing)
        }

        async fn request_permissions(&self) -> Result<PermissionStatus, PlatformError> {
            *self.requests.lock().unwrap() += 1;
            Ok(self.on_request)
        }

        async fn get_token(&self, _project_id: &ProjectId) -> Result<PushToken, PlatformError> {
            Ok(PushToken::new(self.token))
        }

        async fn set_notification_channel(
            &self,
            channel: &NotificationChannel,
        ) -> Result<(), PlatformError> {
            self.channels.lock().unwrap().push(channel.clone());
            Ok(())
        }

        fn add_received_listener(&self, _handler: ReceivedHandler) -> SubscriptionId {
            SubscriptionId(1)
        }

        fn add_response_listener(&self, _handler: ResponseHandler) -> SubscriptionId {
            SubscriptionId(2)
        }

        fn remove_subscription(&self, _id: SubscriptionId) {}
    }

    #[derive(Default)]
    struct MockAlerter {
        alerts: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Alerter for MockAlerter {
        async fn alert(
            &self,
            title: &str,
            message: &str,
            _severity: AlertSeverity,
        ) -> Result<(), AlertError> {
            self.alerts
                .lock()
                .unwrap()
                .push((title.to_string(), message.to_string()));
            Ok(())
        }
    }

    fn project() -> ProjectId {
        ProjectId::new("test-project")
    }

    #[tokio::test]
    async fn register_skips_on_simulator() {
        let platform = MockPlatform::new(
            DeviceInfo {
                is_physical: false,
                os: PlatformOs::Ios,
            },
            PermissionStatus::Granted,
            PermissionStatus::Granted,
        );
        let outcome = register(&platform, &project()).await.unwrap();
        assert_eq!(outcome, RegistrationOutcome::UnsupportedDevice);
        // Permission was never even queried interactively
        assert_eq!(*platform.requests.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn register_skips_prompt_when_already_granted() {
        let platform = MockPlatform::new(
            MockPlatform::physical(PlatformOs::Ios),
            PermissionStatus::Granted,
            PermissionStatus::Denied,
        );
        let outcome = register(&platform, &project()).await.unwrap();
        assert!(matches!(outcome, RegistrationOutcome::Registered(_)));
        assert_eq!(*platform.requests.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn register_prompts_and_proceeds_on_grant() {
        let platform = MockPlatform::new(
            MockPlatform::physical(PlatformOs::Ios),
            PermissionStatus::Undetermined,
            PermissionStatus::Granted,
        );
        let outcome = register(&platform, &project()).await.unwrap();
        assert_eq!(
            outcome,
            RegistrationOutcome::Registered(PushToken::new("MockToken[abc]"))
        );
        assert_eq!(*platform.requests.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn register_resolves_denied_after_refused_prompt() {
        let platform = MockPlatform::new(
            MockPlatform::physical(PlatformOs::Ios),
            PermissionStatus::Undetermined,
            PermissionStatus::Denied,
        );
        let outcome = register(&platform, &project()).await.unwrap();
        assert_eq!(outcome, RegistrationOutcome::PermissionDenied);
    }

    #[tokio::test]
    async fn register_declares_default_channel_on_android() {
        let platform = MockPlatform::new(
            MockPlatform::physical(PlatformOs::Android),
            PermissionStatus::Granted,
            PermissionStatus::Granted,
        );
        register(&platform, &project()).await.unwrap();

        let channels = platform.channels.lock().unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0], NotificationChannel::default_channel());
    }

    #[tokio::test]
    async fn register_skips_channel_elsewhere() {
        let platform = MockPlatform::new(
            MockPlatform::physical(PlatformOs::Ios),
            PermissionStatus::Granted,
            PermissionStatus::Granted,
        );
        register(&platform, &project()).await.unwrap();
        assert!(platform.channels.lock().unwrap().is_empty());
    }

    /// Platform that refuses permission queries until the presentation
    /// policy has been installed.
    struct PolicyGatedPlatform {
        policy: Mutex<Option<PresentationPolicy>>,
    }

    #[async_trait]
    impl PushPlatform for PolicyGatedPlatform {
        fn device(&self) -> DeviceInfo {
            MockPlatform::physical(PlatformOs::Ios)
        }

        async fn set_presentation_policy(
            &self,
            policy: PresentationPolicy,
        ) -> Result<(), PlatformError> {
            *self.policy.lock().unwrap() = Some(policy);
            Ok(())
        }

        async fn get_permissions(&self) -> Result<PermissionStatus, PlatformError> {
            if self.policy.lock().unwrap().is_none() {
                return Err(PlatformError::Request(
                    "permission query before policy install".to_string(),
                ));
            }
            Ok(PermissionStatus::Granted)
        }

        async fn request_permissions(&self) -> Result<PermissionStatus, PlatformError> {
            Ok(PermissionStatus::Granted)
        }

        async fn get_token(&self, _project_id: &ProjectId) -> Result<PushToken, PlatformError> {
            Ok(PushToken::new("GatedToken[abc]"))
        }

        async fn set_notification_channel(
            &self,
            _channel: &NotificationChannel,
        ) -> Result<(), PlatformError> {
            Ok(())
        }

        fn add_received_listener(&self, _handler: ReceivedHandler) -> SubscriptionId {
            SubscriptionId(1)
        }

        fn add_response_listener(&self, _handler: ResponseHandler) -> SubscriptionId {
            SubscriptionId(2)
        }

        fn remove_subscription(&self, _id: SubscriptionId) {}
    }

    #[tokio::test]
    async fn policy_is_installed_before_registration_runs() {
        let platform = Arc::new(PolicyGatedPlatform {
            policy: Mutex::new(None),
        });
        let alerter = Arc::new(MockAlerter::default());

        let session = PushSession::new(platform, alerter, project());
        let (mut active, state) = session
            .activate(SessionCallbacks::default())
            .await
            .unwrap();
        active.wait_for_registration().await.unwrap();

        assert_eq!(
            state.registration(),
            RegistrationState::Registered(PushToken::new("GatedToken[abc]"))
        );
        active.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn activation_ends_registered_and_alerts_nobody() {
        let platform = Arc::new(MockPlatform::new(
            MockPlatform::physical(PlatformOs::Ios),
            PermissionStatus::Undetermined,
            PermissionStatus::Granted,
        ));
        let alerter = Arc::new(MockAlerter::default());

        let session = PushSession::new(platform, Arc::clone(&alerter) as Arc<dyn Alerter>, project());
        let (mut active, state) = session
            .activate(SessionCallbacks::default())
            .await
            .unwrap();
        active.wait_for_registration().await.unwrap();

        assert_eq!(
            state.registration(),
            RegistrationState::Registered(PushToken::new("MockToken[abc]"))
        );
        assert!(alerter.alerts.lock().unwrap().is_empty());
        active.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn denied_activation_raises_warning_alert() {
        let platform = Arc::new(MockPlatform::new(
            MockPlatform::physical(PlatformOs::Ios),
            PermissionStatus::Undetermined,
            PermissionStatus::Denied,
        ));
        let alerter = Arc::new(MockAlerter::default());

        let session = PushSession::new(platform, Arc::clone(&alerter) as Arc<dyn Alerter>, project());
        let (mut active, state) = session
            .activate(SessionCallbacks::default())
            .await
            .unwrap();
        active.wait_for_registration().await.unwrap();

        assert_eq!(state.registration(), RegistrationState::PermissionDenied);
        let alerts = alerter.alerts.lock().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].1, PERMISSION_DENIED_WARNING);
        drop(alerts);
        active.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn simulator_activation_logs_and_stays_unregistered() {
        let platform = Arc::new(MockPlatform::new(
            DeviceInfo {
                is_physical: false,
                os: PlatformOs::Android,
            },
            PermissionStatus::Granted,
            PermissionStatus::Granted,
        ));
        let alerter = Arc::new(MockAlerter::default());
        let diagnostics: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&diagnostics);

        let session = PushSession::new(platform, Arc::clone(&alerter) as Arc<dyn Alerter>, project());
        let (mut active, state) = session
            .activate(SessionCallbacks {
                on_diagnostic: Some(Box::new(move |line| {
                    sink.lock().unwrap().push(line.to_string());
                })),
                ..Default::default()
            })
            .await
            .unwrap();
        active.wait_for_registration().await.unwrap();

        assert_eq!(state.registration(), RegistrationState::Unregistered);
        assert!(alerter.alerts.lock().unwrap().is_empty());
        assert!(diagnostics
            .lock()
            .unwrap()
            .iter()
            .any(|l| l == UNSUPPORTED_DEVICE_NOTE));
        active.shutdown().await.unwrap();
    }
}
