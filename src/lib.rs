//! # Mapgate
//!
//! Permission and provider gating for a map screen that follows the device's
//! live location.
//!
//! The map SDK draws the map and runs the location overlay; the OS owns
//! permissions and location providers. Mapgate sits between them and decides
//! when tracking may start.
//!
//! ## Features
//!
//! - `permission`: location capabilities, grant status and request tracking.
//! - `location`: viewpoints, providers, provider subscriptions and the map seam.
//! - `gate`: the gate controller and its serialized event loop.
//!
//! Use the `full` feature to enable everything.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! mapgate = { version = "0.1", features = ["gate"] }
//! ```
//!
//! ```rust,ignore
//! use mapgate::gate::{GateConfig, LocationGateController, gate_channel};
//!
//! let (handle, events) = gate_channel();
//! let mut controller =
//!     LocationGateController::new(GateConfig::default(), host, handle.provider_listener());
//! controller.on_screen_ready()?;
//! ```

#[cfg(feature = "gate")]
pub use mapgate_gate as gate;

#[cfg(feature = "location")]
pub use mapgate_location as location;

#[cfg(feature = "permission")]
pub use mapgate_permission as permission;
