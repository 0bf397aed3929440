use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use mapgate_location::{MapDisplay, ProviderEvent, ProviderListener, ProviderMonitor, ProviderSubscription};
use mapgate_permission::{PermissionHost, PermissionRequest, PermissionResult, RequestToken};

use crate::{GateConfig, GateError, Prompt, PromptChoice, UserFeedback};

/// Stage of the permission and provider gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GateState {
    /// Nothing has been checked yet.
    #[default]
    Unknown,
    /// A permission prompt is outstanding.
    Requesting,
    /// The user refused a capability. Only a locate request retries.
    PermissionDenied,
    /// Both capabilities are granted; tracking has not started yet.
    PermissionGranted,
    /// Tracking has been started.
    TrackingActive,
}

/// What a gate check decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// The trigger did not apply (screen inactive, stale result, other provider).
    Ignored,
    /// A permission prompt was issued.
    PermissionRequested(RequestToken),
    /// A prompt was already outstanding, so no second one was issued.
    DuplicateRequestSuppressed,
    /// A capability is missing and no prompt was issued.
    PermissionDenied,
    /// Tracking was started.
    TrackingStarted {
        /// Whether the configured provider was enabled at the time.
        provider_enabled: bool,
    },
}

/// Host services the gate drives.
#[derive(Clone)]
pub struct Collaborators {
    /// OS permission state and prompt.
    pub permissions: Arc<dyn PermissionHost>,
    /// OS location provider state and broadcasts.
    pub providers: Arc<dyn ProviderMonitor>,
    /// The map view.
    pub map: Arc<dyn MapDisplay>,
    /// Modal and transient user feedback.
    pub feedback: Arc<dyn UserFeedback>,
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestPolicy {
    Issue,
    Never,
}

/// Decides when a map screen may start live location tracking.
///
/// All callbacks must be delivered from one thread, one at a time.
pub struct LocationGateController {
    config: GateConfig,
    collaborators: Collaborators,
    listener: Arc<dyn ProviderListener>,
    state: GateState,
    pending: Option<PermissionRequest>,
    subscription: Option<ProviderSubscription>,
    prompt_open: bool,
    active: bool,
}

impl fmt::Debug for LocationGateController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationGateController")
            .field("state", &self.state)
            .field("pending", &self.pending)
            .field("subscription", &self.subscription)
            .field("prompt_open", &self.prompt_open)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl LocationGateController {
    /// Create a controller. `listener` is registered for provider broadcasts
    /// when the screen becomes ready.
    #[must_use]
    pub fn new(
        config: GateConfig,
        collaborators: Collaborators,
        listener: Arc<dyn ProviderListener>,
    ) -> Self {
        Self {
            config,
            collaborators,
            listener,
            state: GateState::Unknown,
            pending: None,
            subscription: None,
            prompt_open: false,
            active: false,
        }
    }

    /// The current gate stage.
    #[must_use]
    pub const fn state(&self) -> GateState {
        self.state
    }

    /// The outstanding permission prompt, if any.
    #[must_use]
    pub const fn pending_request(&self) -> Option<&PermissionRequest> {
        self.pending.as_ref()
    }

    /// Whether the provider broadcast registration is held.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(ProviderSubscription::is_active)
    }

    /// Whether the provider-disabled prompt is on screen.
    #[must_use]
    pub const fn is_prompt_open(&self) -> bool {
        self.prompt_open
    }

    /// Whether the screen is between ready and teardown.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// The controller's configuration.
    #[must_use]
    pub const fn config(&self) -> &GateConfig {
        &self.config
    }

    /// The map surface is initialized.
    ///
    /// Centers the map on the default viewpoint, registers for provider
    /// broadcasts if not already registered, then runs the gate check.
    ///
    /// # Errors
    /// Returns an error if the permission prompt or tracking start failed.
    pub fn on_screen_ready(&mut self) -> Result<GateOutcome, GateError> {
        self.active = true;
        self.collaborators
            .map
            .set_viewpoint(self.config.default_viewpoint);

        if self.subscription.is_none() {
            match ProviderSubscription::acquire(
                self.collaborators.providers.clone(),
                self.listener.clone(),
            ) {
                Ok(subscription) => self.subscription = Some(subscription),
                // Tracking still works; only re-arming on provider toggles is lost.
                Err(e) => warn!("provider broadcast registration failed: {e}"),
            }
        }

        info!("map screen ready");
        self.run_gate_check()
    }

    /// Decide whether to prompt for permission, warn about the provider, or
    /// start tracking.
    ///
    /// After a denial no new prompt is issued; tracking starts only if the
    /// capabilities were granted outside the app. Use
    /// [`on_user_locate_request`](Self::on_user_locate_request) to ask again.
    ///
    /// Tracking starts whenever both capabilities are granted, even with the
    /// provider off; the SDK yields no fix until it is switched on.
    ///
    /// # Errors
    /// Returns an error if the permission prompt or tracking start failed.
    pub fn run_gate_check(&mut self) -> Result<GateOutcome, GateError> {
        if !self.active {
            return Ok(GateOutcome::Ignored);
        }
        self.check(self.retrigger_policy())
    }

    /// The OS answered a permission prompt.
    ///
    /// # Errors
    /// Returns an error if the follow-up gate check failed.
    pub fn on_permission_result(
        &mut self,
        result: &PermissionResult,
    ) -> Result<GateOutcome, GateError> {
        if !self.active {
            return Ok(GateOutcome::Ignored);
        }
        let Some(request) = self.pending.take_if(|request| request.matches(result)) else {
            debug!(
                "ignoring permission result for stale request {}",
                result.token.raw()
            );
            return Ok(GateOutcome::Ignored);
        };

        if result.all_granted(&request.capabilities) {
            debug!("permission request {} granted", request.token.raw());
            self.state = GateState::PermissionGranted;
            return self.check(RequestPolicy::Issue);
        }

        let denied = result.denied(&request.capabilities);
        info!("location permission denied: {denied:?}");
        self.state = GateState::PermissionDenied;
        self.collaborators
            .feedback
            .notify(&self.config.messages.permission_denied);
        Ok(GateOutcome::PermissionDenied)
    }

    /// A location provider was switched on or off.
    ///
    /// Only the configured provider being enabled re-runs the gate. After a
    /// denial no prompt is issued; tracking starts only if the capabilities
    /// were granted outside the app.
    ///
    /// # Errors
    /// Returns an error if the follow-up gate check failed.
    pub fn on_provider_availability_changed(
        &mut self,
        event: ProviderEvent,
    ) -> Result<GateOutcome, GateError> {
        if !self.active || event.provider != self.config.provider || !event.enabled {
            return Ok(GateOutcome::Ignored);
        }
        debug!("provider {} enabled", event.provider);
        self.check(self.retrigger_policy())
    }

    /// The user tapped the current-location control.
    ///
    /// # Errors
    /// Returns an error if the permission prompt or tracking start failed.
    pub fn on_user_locate_request(&mut self) -> Result<GateOutcome, GateError> {
        if !self.active {
            return Ok(GateOutcome::Ignored);
        }
        if self.state == GateState::PermissionDenied {
            self.state = GateState::Unknown;
        }
        self.check(RequestPolicy::Issue)
    }

    /// The user answered the provider-disabled prompt.
    pub fn on_prompt_answered(&mut self, choice: PromptChoice) {
        if !std::mem::take(&mut self.prompt_open) {
            return;
        }
        if choice == PromptChoice::OpenSettings {
            self.collaborators.feedback.open_location_settings();
        }
    }

    /// The screen went to the background.
    pub fn on_pause(&self) {
        if self.active {
            self.collaborators.map.pause();
        }
    }

    /// The screen came back to the foreground.
    pub fn on_resume(&self) {
        if self.active {
            self.collaborators.map.resume();
        }
    }

    /// The screen is going away.
    ///
    /// Invalidates the outstanding prompt, releases the provider
    /// registration and stops tracking. Later callbacks are ignored until
    /// the screen is ready again.
    pub fn on_screen_teardown(&mut self) {
        if let Some(request) = self.pending.take() {
            self.collaborators.permissions.cancel(request.token);
        }
        if let Some(mut subscription) = self.subscription.take() {
            subscription.release();
        }
        if self.state == GateState::TrackingActive {
            self.collaborators.map.stop_tracking();
        }
        if self.active {
            info!("map screen torn down");
        }
        self.state = GateState::Unknown;
        self.prompt_open = false;
        self.active = false;
    }

    // After a denial only a locate request may prompt again.
    fn retrigger_policy(&self) -> RequestPolicy {
        if self.state == GateState::PermissionDenied {
            RequestPolicy::Never
        } else {
            RequestPolicy::Issue
        }
    }

    fn check(&mut self, policy: RequestPolicy) -> Result<GateOutcome, GateError> {
        if let Some(request) = &self.pending {
            debug!("permission request {} still outstanding", request.token.raw());
            return Ok(GateOutcome::DuplicateRequestSuppressed);
        }

        let capabilities = &self.config.capabilities;
        if !self.collaborators.permissions.all_granted(capabilities) {
            if policy == RequestPolicy::Never {
                return Ok(GateOutcome::PermissionDenied);
            }
            let token = self.collaborators.permissions.request(capabilities)?;
            debug!("permission request {} issued for {capabilities:?}", token.raw());
            self.pending = Some(PermissionRequest {
                token,
                capabilities: capabilities.clone(),
            });
            self.state = GateState::Requesting;
            return Ok(GateOutcome::PermissionRequested(token));
        }

        self.state = GateState::PermissionGranted;
        let provider_enabled = self
            .collaborators
            .providers
            .is_enabled(self.config.provider);
        if !provider_enabled {
            self.show_provider_prompt();
        }

        self.collaborators.map.start_tracking(self.config.pan_mode)?;
        self.state = GateState::TrackingActive;
        debug!("tracking started, provider enabled: {provider_enabled}");
        Ok(GateOutcome::TrackingStarted { provider_enabled })
    }

    fn show_provider_prompt(&mut self) {
        if self.prompt_open {
            return;
        }
        let messages = &self.config.messages;
        self.collaborators.feedback.prompt(&Prompt {
            message: messages.provider_disabled.clone(),
            confirm: messages.open_settings.clone(),
            dismiss: messages.dismiss.clone(),
        });
        self.prompt_open = true;
    }
}

impl Drop for LocationGateController {
    fn drop(&mut self) {
        self.on_screen_teardown();
    }
}
