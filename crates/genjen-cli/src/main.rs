//! GenJen security controller running on a host console.
//!
//! Keys are read from standard input (`0`-`9`, `*` to clear, `#` to submit,
//! `m` to toggle motion). Display, indicator and tones are reported through
//! the log. The status page is served on the configured address. Closing
//! standard input disconnects the keypad and stops the controller.
//!
//! ```text
//! genjen [CONFIG.json]
//! ```
//!
//! The configuration path may also be given in `GENJEN_CONFIG`. Without
//! one, the defaults are used. Log output is filtered with `RUST_LOG`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use genjen_controller::{Peripherals, System, TaskName, TaskTermination};
use genjen_core::ControllerConfig;
use genjen_hardware::console::{ConsoleBuzzer, ConsoleDisplay, ConsoleIndicator, ConsoleInput};
use genjen_network::{StatusServer, StatusServerConfig};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "GENJEN_CONFIG";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct AppConfig {
    controller: ControllerConfig,
    status_server: StatusServerConfig,
}

impl AppConfig {
    fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config
            .controller
            .validate()
            .with_context(|| format!("Invalid controller settings in {}", path.display()))?;
        Ok(config)
    }

    fn load(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => {
                info!(path = %path.display(), "Loading configuration");
                Self::from_file(&path)
            }
            None => {
                info!("No configuration given, using defaults");
                Ok(Self::default())
            }
        }
    }
}

fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(CONFIG_ENV))
        .map(PathBuf::from)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load(config_path())?;

    // Bind before starting the tasks so a busy port fails fast
    let system = System::new(config.controller);
    let server = StatusServer::bind(config.status_server, system.store())
        .await
        .context("Failed to start status server")?;

    let (keypad, motion) = ConsoleInput::spawn();
    let mut handle = system.start(Peripherals {
        keypad,
        display: ConsoleDisplay::new(),
        indicator: ConsoleIndicator::new(),
        buzzer: ConsoleBuzzer::new(),
        motion,
    });
    handle.spawn(TaskName::Network, server.run(handle.cancellation_token()));

    info!("Keys: 0-9, * clears, # submits, m toggles motion. Ctrl-C stops.");

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "Failed to listen for Ctrl-C");
            }
            info!("Stopping");
        }
        ended = handle.wait_next() => match ended {
            Some((task, TaskTermination::Error(e))) => error!(%task, error = %e, "Task failed"),
            Some((task, TaskTermination::Panic)) => error!(%task, "Task panicked"),
            Some((task, termination)) => info!(%task, ?termination, "Task ended"),
            None => {}
        },
    }

    let report = handle.shutdown().await;
    if report.panics > 0 {
        anyhow::bail!("{} task(s) panicked", report.panics);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_path() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let file = write_config(
            r#"{ "controller": { "tick_ms": 20 }, "status_server": { "live_status": true } }"#,
        );

        let config = AppConfig::load(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.controller.tick_ms, 20);
        assert_eq!(config.controller.motion_threshold, 100);
        assert!(config.status_server.live_status);
        assert_eq!(config.status_server.bind_addr.port(), 80);
    }

    #[test]
    fn test_invalid_controller_settings() {
        let file = write_config(r#"{ "controller": { "motion_threshold": 0 } }"#);

        let err = AppConfig::load(Some(file.path().to_path_buf())).unwrap_err();

        assert!(format!("{err:#}").contains("motion_threshold"));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load(Some(PathBuf::from("/nonexistent/genjen.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
