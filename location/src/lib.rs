//! Location provider monitoring and map tracking seams.
//!
//! The map SDK and the OS location stack live outside this crate. It only
//! describes what a map screen asks of them: put the map at a
//! [`Viewpoint`], start or stop live tracking, and report when a location
//! [`Provider`] is switched on or off.

#![warn(missing_docs)]

mod subscription;

pub use subscription::{ProviderSubscription, SubscriptionId};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A map center and scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
    /// Map scale denominator.
    pub scale: f64,
}

impl Viewpoint {
    /// Create a viewpoint without validation.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, scale: f64) -> Self {
        Self {
            latitude,
            longitude,
            scale,
        }
    }

    /// Create a viewpoint, rejecting coordinates off the globe.
    ///
    /// # Errors
    /// Returns [`LocationError::InvalidViewpoint`] if the latitude or
    /// longitude is out of range or the scale is not a positive number.
    pub fn try_new(latitude: f64, longitude: f64, scale: f64) -> Result<Self, LocationError> {
        let viewpoint = Self::new(latitude, longitude, scale);
        viewpoint.validate()?;
        Ok(viewpoint)
    }

    /// Check that the coordinates are on the globe and the scale is usable.
    ///
    /// # Errors
    /// Returns [`LocationError::InvalidViewpoint`] describing the first bad field.
    pub fn validate(&self) -> Result<(), LocationError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(LocationError::InvalidViewpoint(format!(
                "latitude {} out of range",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(LocationError::InvalidViewpoint(format!(
                "longitude {} out of range",
                self.longitude
            )));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(LocationError::InvalidViewpoint(format!(
                "scale {} must be positive",
                self.scale
            )));
        }
        Ok(())
    }
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self::new(26.844_846_6, 26.384_636_9, 144_000.0)
    }
}

/// How the map follows the live location fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoPanMode {
    /// The map does not follow the fix.
    Off,
    /// Keep the fix centered on screen.
    #[default]
    Recenter,
    /// Keep the fix near the bottom, oriented to travel direction.
    Navigation,
    /// Keep the fix centered, oriented to the compass heading.
    CompassNavigation,
}

/// An OS location data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Network-based positioning.
    #[default]
    Network,
    /// Satellite positioning.
    Gps,
    /// Fused positioning from all sources.
    Fused,
    /// Fixes requested by other apps only.
    Passive,
}

impl Provider {
    /// The platform provider name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Gps => "gps",
            Self::Fused => "fused",
            Self::Passive => "passive",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A provider was switched on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderEvent {
    /// The provider whose state changed.
    pub provider: Provider,
    /// Whether it is now enabled.
    pub enabled: bool,
}

/// Errors that can occur when driving location collaborators.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    /// Location permission was not granted.
    #[error("location permission denied")]
    PermissionDenied,
    /// Location services are disabled on the device.
    #[error("location services disabled")]
    ServiceDisabled,
    /// Location is not available.
    #[error("location not available")]
    NotAvailable,
    /// A viewpoint had unusable coordinates.
    #[error("invalid viewpoint: {0}")]
    InvalidViewpoint(String),
    /// An unknown error occurred.
    #[error("unknown error: {0}")]
    Unknown(String),
}

/// Convenience alias for location results.
pub type LocationResult<T> = Result<T, LocationError>;

/// Receives provider toggle broadcasts.
pub trait ProviderListener: Send + Sync {
    /// Called whenever a provider is enabled or disabled.
    fn on_provider_changed(&self, event: ProviderEvent);
}

/// OS location provider services.
pub trait ProviderMonitor: Send + Sync {
    /// Whether `provider` is currently enabled.
    fn is_enabled(&self, provider: Provider) -> bool;

    /// Register `listener` for provider toggle broadcasts.
    ///
    /// # Errors
    /// Returns an error if the broadcast could not be registered.
    fn subscribe(&self, listener: Arc<dyn ProviderListener>) -> LocationResult<SubscriptionId>;

    /// Remove a registration made by [`ProviderMonitor::subscribe`].
    fn unsubscribe(&self, id: SubscriptionId);
}

/// The map view a screen drives.
pub trait MapDisplay: Send + Sync {
    /// Center the map at `viewpoint`.
    fn set_viewpoint(&self, viewpoint: Viewpoint);

    /// Start (or keep) the live location overlay in `mode`.
    ///
    /// Calling this while tracking is already running must be harmless.
    ///
    /// # Errors
    /// Returns an error if the SDK refused to start the data source.
    fn start_tracking(&self, mode: AutoPanMode) -> LocationResult<()>;

    /// Stop the live location overlay.
    fn stop_tracking(&self);

    /// Suspend rendering while the screen is in the background.
    fn pause(&self) {}

    /// Resume rendering.
    fn resume(&self) {}
}
