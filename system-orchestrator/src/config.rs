use crate::error::OrchestratorError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Orchestrator settings.
///
/// Layered as built-in defaults, then an optional TOML file, then
/// `ORCHESTRATOR_*` environment variables (`ORCHESTRATOR_TICKERS` takes a
/// comma separated list).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SystemConfig {
    pub initial_port: u16,
    pub max_port: u16,
    pub tickers: Vec<String>,

    /// Host workers use to reach each other's publishers
    pub host: String,

    pub supervise_interval_ms: u64,
    pub terminate_grace_ms: u64,

    /// Directory holding the worker binaries. Defaults to the directory of
    /// the orchestrator executable.
    pub bin_dir: Option<String>,

    pub enable_display: bool,
    pub enable_traders: bool,
    /// Broker passed to each trader (`alpaca` or `paper`)
    pub trader_broker: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            initial_port: 13140,
            max_port: 13399,
            tickers: ["AAPL", "GOOGL", "AMZN", "MSFT", "TSLA"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            host: "127.0.0.1".to_string(),
            supervise_interval_ms: 1000,
            terminate_grace_ms: 5000,
            bin_dir: None,
            enable_display: true,
            enable_traders: true,
            trader_broker: "alpaca".to_string(),
        }
    }
}

impl SystemConfig {
    /// Loads the layered configuration. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Self, OrchestratorError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&SystemConfig::default())?)
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("ORCHESTRATOR")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("tickers"),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn supervise_interval(&self) -> Duration {
        Duration::from_millis(self.supervise_interval_ms.max(1))
    }

    pub fn terminate_grace(&self) -> Duration {
        Duration::from_millis(self.terminate_grace_ms)
    }

    pub fn resolve_bin_dir(&self) -> Result<PathBuf, OrchestratorError> {
        if let Some(dir) = &self.bin_dir {
            return Ok(PathBuf::from(dir));
        }
        let exe = std::env::current_exe()?;
        Ok(exe
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SystemConfig::load(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.initial_port, 13140);
        assert_eq!(config.max_port, 13399);
        assert_eq!(config.tickers, vec!["AAPL", "GOOGL", "AMZN", "MSFT", "TSLA"]);
        assert_eq!(config.trader_broker, "alpaca");
        assert!(config.bin_dir.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "initial_port = 15000\nmax_port = 15010\ntickers = [\"TSLA\"]\ntrader_broker = \"paper\""
        )
        .unwrap();

        let config = SystemConfig::load(file.path()).unwrap();

        assert_eq!(config.initial_port, 15000);
        assert_eq!(config.max_port, 15010);
        assert_eq!(config.tickers, vec!["TSLA"]);
        assert_eq!(config.trader_broker, "paper");
        assert_eq!(config.supervise_interval_ms, 1000);
    }
}
