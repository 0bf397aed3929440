//! Scripted simulation of a map screen driving the location gate.
//!
//! Run with: cargo run -p mapgate-gate-sim -- [--granted] [--provider-off] [--deny]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use mapgate_gate::{
    AutoPanMode, Capability, Collaborators, GateConfig, GateEvent, GateHandle, LocationError,
    LocationGateController, MapDisplay, PermissionError, PermissionHost, PermissionResult,
    PermissionStatus, Prompt, PromptChoice, Provider, ProviderEvent, ProviderListener,
    ProviderMonitor, RequestToken, SubscriptionId, UserFeedback, Viewpoint, gate_channel,
    run_event_loop,
};
use owo_colors::OwoColorize;

#[derive(Parser)]
#[command(name = "gate-sim")]
#[command(about = "Simulate a map screen gating live location tracking", long_about = None)]
struct Cli {
    /// Location permission is already granted at start.
    #[arg(long)]
    granted: bool,
    /// The location provider is switched off at start.
    #[arg(long)]
    provider_off: bool,
    /// Refuse the permission prompt.
    #[arg(long)]
    deny: bool,
    /// Dismiss the provider prompt instead of opening settings.
    #[arg(long)]
    dismiss: bool,
    /// JSON gate configuration.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// OS and map SDK stand-in. Answers prompts by posting back into the gate queue.
struct SimHost {
    cli: Cli,
    granted: Mutex<bool>,
    provider_enabled: Mutex<bool>,
    next_id: AtomicU64,
    listeners: Mutex<HashMap<SubscriptionId, Arc<dyn ProviderListener>>>,
    handle: OnceLock<GateHandle>,
}

impl SimHost {
    fn new(cli: Cli) -> Self {
        Self {
            granted: Mutex::new(cli.granted),
            provider_enabled: Mutex::new(!cli.provider_off),
            next_id: AtomicU64::new(101),
            listeners: Mutex::new(HashMap::new()),
            handle: OnceLock::new(),
            cli,
        }
    }

    fn post(&self, event: GateEvent) {
        if let Some(handle) = self.handle.get() {
            handle.post(event);
        }
    }

    fn set_provider(&self, enabled: bool) {
        *lock(&self.provider_enabled) = enabled;
        let listeners: Vec<_> = lock(&self.listeners).values().cloned().collect();
        println!("  os: network provider {}", if enabled { "on" } else { "off" });
        for listener in listeners {
            listener.on_provider_changed(ProviderEvent {
                provider: Provider::Network,
                enabled,
            });
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl PermissionHost for SimHost {
    fn status(&self, _capability: Capability) -> PermissionStatus {
        if *lock(&self.granted) {
            PermissionStatus::Granted
        } else {
            PermissionStatus::NotDetermined
        }
    }

    fn request(&self, capabilities: &[Capability]) -> Result<RequestToken, PermissionError> {
        let token = RequestToken::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        println!("  os: permission prompt #{} for {capabilities:?}", token.raw());

        let status = if self.cli.deny {
            PermissionStatus::Denied
        } else {
            *lock(&self.granted) = true;
            PermissionStatus::Granted
        };
        let grants = capabilities.iter().map(|c| (*c, status)).collect();
        self.post(GateEvent::PermissionResult(PermissionResult::new(token, grants)));
        Ok(token)
    }

    fn cancel(&self, token: RequestToken) {
        println!("  os: prompt #{} cancelled", token.raw());
    }
}

impl ProviderMonitor for SimHost {
    fn is_enabled(&self, provider: Provider) -> bool {
        provider == Provider::Network && *lock(&self.provider_enabled)
    }

    fn subscribe(
        &self,
        listener: Arc<dyn ProviderListener>,
    ) -> Result<SubscriptionId, LocationError> {
        let id = SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.listeners).insert(id, listener);
        println!("  os: provider broadcast #{} registered", id.raw());
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        lock(&self.listeners).remove(&id);
        println!("  os: provider broadcast #{} unregistered", id.raw());
    }
}

impl MapDisplay for SimHost {
    fn set_viewpoint(&self, viewpoint: Viewpoint) {
        println!(
            "  map: centered at {:.6}, {:.6} (1:{})",
            viewpoint.latitude, viewpoint.longitude, viewpoint.scale
        );
    }

    fn start_tracking(&self, mode: AutoPanMode) -> Result<(), LocationError> {
        let enabled = *lock(&self.provider_enabled);
        println!("{}", format!("  map: tracking started ({mode:?})").green());
        if enabled {
            self.post(GateEvent::Shutdown);
        } else {
            println!("  map: waiting for a fix");
        }
        Ok(())
    }

    fn stop_tracking(&self) {
        println!("  map: tracking stopped");
    }
}

impl UserFeedback for SimHost {
    fn prompt(&self, prompt: &Prompt) {
        println!(
            "{}",
            format!("  ui: \"{}\" [{} / {}]", prompt.message, prompt.confirm, prompt.dismiss)
                .yellow()
        );
        let choice = if self.cli.dismiss {
            PromptChoice::Dismiss
        } else {
            PromptChoice::OpenSettings
        };
        self.post(GateEvent::PromptAnswered(choice));
        if self.cli.dismiss {
            self.post(GateEvent::Shutdown);
        }
    }

    fn notify(&self, message: &str) {
        println!("{}", format!("  ui: {message}").red());
        self.post(GateEvent::Shutdown);
    }

    fn open_location_settings(&self) {
        println!("  ui: opening location settings");
        self.set_provider(true);
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<GateConfig> {
    let Some(path) = path else {
        return Ok(GateConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    GateConfig::from_json(&json).with_context(|| format!("Invalid config {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    println!("{}", "=== Mapgate Location Gate Simulation ===\n".bold());

    let host = Arc::new(SimHost::new(cli));
    let (handle, events) = gate_channel();
    host.handle
        .set(handle.clone())
        .map_err(|_| anyhow::anyhow!("gate handle already set"))?;

    let collaborators = Collaborators {
        permissions: host.clone(),
        providers: host.clone(),
        map: host.clone(),
        feedback: host.clone(),
    };
    let controller = LocationGateController::new(config, collaborators, handle.provider_listener());

    handle.screen_ready();
    let controller = run_event_loop(controller, events).await;

    println!("\n{}", "Gate stopped".bold());
    drop(controller);
    Ok(())
}
