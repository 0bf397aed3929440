//! Permission and provider gate for starting live map tracking.
//!
//! A map screen wants to follow the device's live location, but it may only
//! start tracking once both location capabilities are granted. The
//! [`LocationGateController`] decides on every trigger whether to ask for
//! permission, warn that the location provider is off, or start tracking,
//! without ever showing two permission prompts at once.
//!
//! # Usage
//!
//! ```ignore
//! use mapgate_gate::{GateConfig, LocationGateController, gate_channel, run_event_loop};
//!
//! let (handle, events) = gate_channel();
//! let controller = LocationGateController::new(
//!     GateConfig::default(),
//!     collaborators,
//!     handle.provider_listener(),
//! );
//! handle.screen_ready();
//! // OS callbacks post into `handle` from here on.
//! let controller = run_event_loop(controller, events).await;
//! ```

#![warn(missing_docs)]

mod config;
mod controller;
mod error;
mod event;
mod feedback;

pub use config::{GateConfig, Messages};
pub use controller::{Collaborators, GateOutcome, GateState, LocationGateController};
pub use error::GateError;
pub use event::{ChannelProviderListener, GateEvent, GateHandle, drain, gate_channel, run_event_loop};
pub use feedback::{Prompt, PromptChoice, UserFeedback};

pub use mapgate_location::{
    AutoPanMode, LocationError, MapDisplay, Provider, ProviderEvent, ProviderListener,
    ProviderMonitor, SubscriptionId, Viewpoint,
};
pub use mapgate_permission::{
    Capability, PermissionError, PermissionHost, PermissionRequest, PermissionResult,
    PermissionStatus, RequestToken,
};
