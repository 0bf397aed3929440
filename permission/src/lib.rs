//! Location capability checks and permission request tracking.
//!
//! This crate describes the capabilities a map screen needs before it may
//! start live tracking, and the [`PermissionHost`] seam through which the
//! host OS reports grant status and shows its permission prompt.

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};

/// An OS-granted capability that can be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Precise (fine) location access.
    PreciseLocation,
    /// Approximate (coarse) location access.
    ApproximateLocation,
}

impl Capability {
    /// Both location capabilities, in request order.
    pub const LOCATION: [Self; 2] = [Self::PreciseLocation, Self::ApproximateLocation];

    /// The platform permission name.
    #[must_use]
    pub const fn platform_name(self) -> &'static str {
        match self {
            Self::PreciseLocation => "android.permission.ACCESS_FINE_LOCATION",
            Self::ApproximateLocation => "android.permission.ACCESS_COARSE_LOCATION",
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::PreciseLocation => "fine",
            Self::ApproximateLocation => "coarse",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

/// The current status of a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PermissionStatus {
    /// Permission has been granted by the user.
    Granted,
    /// Permission has been denied by the user.
    Denied,
    /// Permission is restricted (e.g., parental controls on iOS).
    Restricted,
    /// Permission has not been requested yet.
    #[default]
    NotDetermined,
}

impl PermissionStatus {
    /// Whether this status allows the capability to be used.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Opaque token identifying one permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Wrap a raw request code chosen by the host.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw request code.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// A permission prompt that has been issued and not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRequest {
    /// Token the host will echo back in the result.
    pub token: RequestToken,
    /// Capabilities asked for in this prompt.
    pub capabilities: Vec<Capability>,
}

impl PermissionRequest {
    /// Whether `result` resolves this request.
    #[must_use]
    pub fn matches(&self, result: &PermissionResult) -> bool {
        self.token == result.token
    }
}

/// The answer to a permission prompt, delivered asynchronously by the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionResult {
    /// Token of the prompt being answered.
    pub token: RequestToken,
    /// Status reported for each capability.
    pub grants: Vec<(Capability, PermissionStatus)>,
}

impl PermissionResult {
    /// Create a result from per-capability statuses.
    #[must_use]
    pub const fn new(token: RequestToken, grants: Vec<(Capability, PermissionStatus)>) -> Self {
        Self { token, grants }
    }

    /// Status reported for `capability`, if the OS included it.
    #[must_use]
    pub fn status_of(&self, capability: Capability) -> Option<PermissionStatus> {
        self.grants
            .iter()
            .find(|(granted, _)| *granted == capability)
            .map(|(_, status)| *status)
    }

    /// Whether every requested capability was granted.
    ///
    /// An empty result (an interrupted prompt) or a missing entry counts as
    /// a denial.
    #[must_use]
    pub fn all_granted(&self, requested: &[Capability]) -> bool {
        !self.grants.is_empty()
            && requested
                .iter()
                .all(|c| self.status_of(*c).is_some_and(PermissionStatus::is_granted))
    }

    /// Requested capabilities that were not granted.
    #[must_use]
    pub fn denied(&self, requested: &[Capability]) -> Vec<Capability> {
        requested
            .iter()
            .copied()
            .filter(|c| !self.status_of(*c).is_some_and(PermissionStatus::is_granted))
            .collect()
    }
}

/// Errors that can occur when requesting permissions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// The capability is not supported on this platform.
    #[error("permission not supported on this platform")]
    NotSupported,
    /// The host refused to show the prompt.
    #[error("permission request rejected: {0}")]
    RequestRejected(String),
    /// An unknown error occurred.
    #[error("unknown error: {0}")]
    Unknown(String),
}

/// Host OS permission services.
pub trait PermissionHost: Send + Sync {
    /// Check the current status of a capability without prompting.
    fn status(&self, capability: Capability) -> PermissionStatus;

    /// Show the permission prompt for `capabilities`.
    ///
    /// The answer arrives later as a [`PermissionResult`] carrying the
    /// returned token.
    ///
    /// # Errors
    /// Returns a [`PermissionError`] if the prompt could not be shown.
    fn request(&self, capabilities: &[Capability]) -> Result<RequestToken, PermissionError>;

    /// Invalidate an outstanding request so its result is never delivered.
    fn cancel(&self, token: RequestToken);

    /// Whether every capability in `capabilities` is currently granted.
    fn all_granted(&self, capabilities: &[Capability]) -> bool {
        capabilities.iter().all(|c| self.status(*c).is_granted())
    }
}
