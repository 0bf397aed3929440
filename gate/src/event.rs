use std::fmt;
use std::sync::Arc;

use async_channel::{Receiver, Sender, WeakSender, unbounded};
use log::{debug, info, warn};
use mapgate_location::{ProviderEvent, ProviderListener};
use mapgate_permission::PermissionResult;

use crate::{GateError, GateOutcome, LocationGateController, PromptChoice};

/// A callback delivered to the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum GateEvent {
    /// The map surface is initialized.
    ScreenReady,
    /// The OS answered a permission prompt.
    PermissionResult(PermissionResult),
    /// A location provider was toggled.
    ProviderChanged(ProviderEvent),
    /// The user tapped the current-location control.
    LocateRequested,
    /// The user answered the provider-disabled prompt.
    PromptAnswered(PromptChoice),
    /// The screen went to the background.
    Pause,
    /// The screen came back to the foreground.
    Resume,
    /// The screen is going away; it may become ready again later.
    ScreenTeardown,
    /// Tear down and stop the event loop.
    Shutdown,
}

/// Create the serialized event queue for one controller.
#[must_use]
pub fn gate_channel() -> (GateHandle, Receiver<GateEvent>) {
    let (sender, receiver) = unbounded();
    (GateHandle { sender }, receiver)
}

/// Posts callbacks into a gate's event queue from any thread.
#[derive(Debug, Clone)]
pub struct GateHandle {
    sender: Sender<GateEvent>,
}

impl GateHandle {
    /// Queue `event`. Returns `false` if the loop has already stopped.
    pub fn post(&self, event: GateEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(err) => {
                warn!("dropping gate event: {err}");
                false
            }
        }
    }

    /// Queue [`GateEvent::ScreenReady`].
    pub fn screen_ready(&self) -> bool {
        self.post(GateEvent::ScreenReady)
    }

    /// Queue a permission result.
    pub fn permission_result(&self, result: PermissionResult) -> bool {
        self.post(GateEvent::PermissionResult(result))
    }

    /// Queue [`GateEvent::LocateRequested`].
    pub fn locate(&self) -> bool {
        self.post(GateEvent::LocateRequested)
    }

    /// Queue a prompt answer.
    pub fn prompt_answered(&self, choice: PromptChoice) -> bool {
        self.post(GateEvent::PromptAnswered(choice))
    }

    /// Queue [`GateEvent::Pause`].
    pub fn pause(&self) -> bool {
        self.post(GateEvent::Pause)
    }

    /// Queue [`GateEvent::Resume`].
    pub fn resume(&self) -> bool {
        self.post(GateEvent::Resume)
    }

    /// Queue [`GateEvent::ScreenTeardown`].
    pub fn screen_teardown(&self) -> bool {
        self.post(GateEvent::ScreenTeardown)
    }

    /// Queue [`GateEvent::Shutdown`].
    pub fn shutdown(&self) -> bool {
        self.post(GateEvent::Shutdown)
    }

    /// A provider listener that forwards broadcasts into this queue.
    ///
    /// The listener does not keep the queue open: once every handle is
    /// dropped, [`run_event_loop`] returns.
    #[must_use]
    pub fn provider_listener(&self) -> Arc<dyn ProviderListener> {
        Arc::new(ChannelProviderListener::new(&self.sender))
    }
}

/// Forwards provider broadcasts into a gate's event queue.
///
/// Holds a weak sender, so the controller owning it never keeps its own
/// queue alive.
pub struct ChannelProviderListener {
    sender: WeakSender<GateEvent>,
}

impl fmt::Debug for ChannelProviderListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelProviderListener").finish_non_exhaustive()
    }
}

impl ChannelProviderListener {
    /// Create a listener posting into `sender`'s queue.
    #[must_use]
    pub fn new(sender: &Sender<GateEvent>) -> Self {
        Self {
            sender: sender.downgrade(),
        }
    }
}

impl ProviderListener for ChannelProviderListener {
    fn on_provider_changed(&self, event: ProviderEvent) {
        let Some(sender) = self.sender.upgrade() else {
            debug!("gate queue closed, dropping provider event");
            return;
        };
        if let Err(err) = sender.try_send(GateEvent::ProviderChanged(event)) {
            warn!("dropping provider event: {err}");
        }
    }
}

impl LocationGateController {
    /// Dispatch one event. Returns `None` for events that do not run the gate.
    ///
    /// # Errors
    /// Returns the error of the gate operation the event triggered.
    pub fn handle_event(&mut self, event: GateEvent) -> Result<Option<GateOutcome>, GateError> {
        let outcome = match event {
            GateEvent::ScreenReady => self.on_screen_ready()?,
            GateEvent::PermissionResult(result) => self.on_permission_result(&result)?,
            GateEvent::ProviderChanged(event) => self.on_provider_availability_changed(event)?,
            GateEvent::LocateRequested => self.on_user_locate_request()?,
            GateEvent::PromptAnswered(choice) => {
                self.on_prompt_answered(choice);
                return Ok(None);
            }
            GateEvent::Pause => {
                self.on_pause();
                return Ok(None);
            }
            GateEvent::Resume => {
                self.on_resume();
                return Ok(None);
            }
            GateEvent::ScreenTeardown | GateEvent::Shutdown => {
                self.on_screen_teardown();
                return Ok(None);
            }
        };
        Ok(Some(outcome))
    }

    fn dispatch(&mut self, event: GateEvent) {
        match self.handle_event(event) {
            Ok(Some(outcome)) => debug!("gate outcome: {outcome:?}"),
            Ok(None) => {}
            Err(err) => warn!("gate check failed: {err}"),
        }
    }
}

/// Deliver queued events to `controller` in order until [`GateEvent::Shutdown`]
/// arrives or the queue is closed. Returns the torn-down controller.
pub async fn run_event_loop(
    mut controller: LocationGateController,
    receiver: Receiver<GateEvent>,
) -> LocationGateController {
    while let Ok(event) = receiver.recv().await {
        let shutdown = event == GateEvent::Shutdown;
        controller.dispatch(event);
        if shutdown {
            info!("gate event loop stopped");
            return controller;
        }
    }
    controller.on_screen_teardown();
    controller
}

/// Deliver every event already queued, without waiting for more.
///
/// Stops after [`GateEvent::Shutdown`]. Returns the number of events handled.
pub fn drain(controller: &mut LocationGateController, receiver: &Receiver<GateEvent>) -> usize {
    let mut handled = 0;
    while let Ok(event) = receiver.try_recv() {
        let shutdown = event == GateEvent::Shutdown;
        controller.dispatch(event);
        handled += 1;
        if shutdown {
            break;
        }
    }
    handled
}
