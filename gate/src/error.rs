use mapgate_location::LocationError;
use mapgate_permission::PermissionError;
use thiserror::Error;

/// Errors reported by the gate.
///
/// None of these end the screen; the gate stays usable and can be
/// re-triggered.
#[derive(Error, Debug)]
pub enum GateError {
    /// The OS could not show the permission prompt.
    #[error("permission request failed: {0}")]
    Permission(#[from] PermissionError),

    /// The map or location provider refused an operation.
    #[error("location error: {0}")]
    Location(#[from] LocationError),

    /// The configuration could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The configuration parsed but is unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
