//! The default pipeline layout.
//!
//! One publisher per ticker, one aggregator fanning them in, then an optional
//! display and one optional trader per ticker reading the aggregated channel.

use super::manager::ProcessManager;
use super::models::port_allocator::Port;
use super::models::role::WorkerRole;
use crate::config::SystemConfig;
use crate::error::OrchestratorError;

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Allocates and configures every worker of the default topology.
///
/// Every port is allocated here, so an exhausted range is reported before
/// any process exists.
pub fn plan_default(
    manager: &mut ProcessManager,
    config: &SystemConfig,
) -> Result<(), OrchestratorError> {
    let host = config.host.clone();

    let mut source_ports: Vec<Port> = Vec::with_capacity(config.tickers.len());
    for ticker in &config.tickers {
        let (id, port) =
            manager.allocate_with_port(format!("publisher-{}", ticker), WorkerRole::Publisher)?;
        manager.configure(
            id,
            vec![
                "--symbol".into(),
                ticker.clone(),
                "--port".into(),
                port.to_string(),
                "--host".into(),
                host.clone(),
            ],
        )?;
        source_ports.push(port);
    }

    let symbols = join(&config.tickers);
    let (id, snapshot_port) = manager.allocate_with_port("aggregator", WorkerRole::Aggregator)?;
    manager.configure(
        id,
        vec![
            "--symbols".into(),
            symbols.clone(),
            "--source-ports".into(),
            join(&source_ports),
            "--port".into(),
            snapshot_port.to_string(),
            "--host".into(),
            host.clone(),
        ],
    )?;

    if config.enable_display {
        let (id, _) = manager.allocate("display", WorkerRole::Display, false)?;
        manager.configure(
            id,
            vec![
                "--symbols".into(),
                symbols,
                "--source-port".into(),
                snapshot_port.to_string(),
                "--host".into(),
                host.clone(),
            ],
        )?;
    }

    if config.enable_traders {
        for ticker in &config.tickers {
            let (id, _) =
                manager.allocate(format!("trader-{}", ticker), WorkerRole::Trader, false)?;
            manager.configure(
                id,
                vec![
                    "--symbol".into(),
                    ticker.clone(),
                    "--source-port".into(),
                    snapshot_port.to_string(),
                    "--broker".into(),
                    config.trader_broker.clone(),
                    "--host".into(),
                    host.clone(),
                ],
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SystemConfig {
        SystemConfig {
            bin_dir: Some("bin".to_string()),
            ..SystemConfig::default()
        }
    }

    #[test]
    fn default_layout_wires_publishers_into_aggregator() {
        let config = config();
        let mut manager = ProcessManager::new(&config).unwrap();
        plan_default(&mut manager, &config).unwrap();

        let planned = manager.planned();
        // 5 publishers, aggregator, display, 5 traders
        assert_eq!(planned.len(), 12);

        let aggregator = planned
            .iter()
            .find(|p| p.role() == WorkerRole::Aggregator)
            .unwrap();
        assert_eq!(aggregator.port(), Some(13145));
        assert_eq!(
            aggregator.args()[..4],
            [
                "--symbols",
                "AAPL,GOOGL,AMZN,MSFT,TSLA",
                "--source-ports",
                "13140,13141,13142,13143,13144"
            ]
        );

        let traders: Vec<_> = planned
            .iter()
            .filter(|p| p.role() == WorkerRole::Trader)
            .collect();
        assert_eq!(traders.len(), 5);
        assert!(traders
            .iter()
            .all(|t| t.port().is_none() && t.args().contains(&"13145".to_string())));
    }

    #[test]
    fn optional_consumers_can_be_disabled() {
        let config = SystemConfig {
            enable_display: false,
            enable_traders: false,
            tickers: vec!["AAPL".into()],
            ..config()
        };
        let mut manager = ProcessManager::new(&config).unwrap();
        plan_default(&mut manager, &config).unwrap();

        let roles: Vec<_> = manager.planned().iter().map(|p| p.role()).collect();
        assert_eq!(roles, vec![WorkerRole::Publisher, WorkerRole::Aggregator]);
    }

    #[test]
    fn too_small_range_fails_during_planning() {
        let config = SystemConfig {
            initial_port: 13140,
            max_port: 13144,
            ..config()
        };
        let mut manager = ProcessManager::new(&config).unwrap();

        // Five publishers fit, the aggregator does not.
        let err = plan_default(&mut manager, &config).unwrap_err();
        assert!(matches!(err, OrchestratorError::PortExhausted { max: 13144 }));
        assert_eq!(manager.running_count(), 0);
    }
}
