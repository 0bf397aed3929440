use mapgate_location::{AutoPanMode, Provider, Viewpoint};
use mapgate_permission::Capability;
use serde::{Deserialize, Serialize};

use crate::GateError;

/// User-facing strings shown by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Prompt shown when the location provider is off.
    pub provider_disabled: String,
    /// Label of the prompt button that opens settings.
    pub open_settings: String,
    /// Label of the prompt button that closes it.
    pub dismiss: String,
    /// Notice shown when location permission was refused.
    pub permission_denied: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            provider_disabled: "Location is turned off. Open settings to enable it?".into(),
            open_settings: "Yes".into(),
            dismiss: "No".into(),
            permission_denied: "Location permission denied".into(),
        }
    }
}

/// Configuration of a [`LocationGateController`](crate::LocationGateController).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Capabilities that must all be granted before tracking starts.
    pub capabilities: Vec<Capability>,
    /// Provider whose enabled state is checked and watched.
    pub provider: Provider,
    /// Map center shown before a live fix is available.
    pub default_viewpoint: Viewpoint,
    /// How the map follows the fix once tracking runs.
    pub pan_mode: AutoPanMode,
    /// User-facing strings.
    pub messages: Messages,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            capabilities: Capability::LOCATION.to_vec(),
            provider: Provider::Network,
            default_viewpoint: Viewpoint::default(),
            pan_mode: AutoPanMode::Recenter,
            messages: Messages::default(),
        }
    }
}

impl GateConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`GateError::ConfigParse`] for malformed JSON and
    /// [`GateError::InvalidConfig`] if the result fails [`GateConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, GateError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the config can drive a gate.
    ///
    /// # Errors
    /// Returns [`GateError::InvalidConfig`] if no capability is listed or the
    /// default viewpoint is off the globe.
    pub fn validate(&self) -> Result<(), GateError> {
        if self.capabilities.is_empty() {
            return Err(GateError::InvalidConfig(
                "at least one capability is required".into(),
            ));
        }
        self.default_viewpoint
            .validate()
            .map_err(|e| GateError::InvalidConfig(e.to_string()))
    }
}
