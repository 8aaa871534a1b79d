use anyhow::Result;
use log::info;
use std::io::Write;
use std::time::Duration;
use trading::Snapshot;
use trading_core::comms::ReceiverSocket;

/// Writes the tracked symbols of `snapshot` as `'SYM': price (time)` lines,
/// followed by a blank line. Symbols missing from the snapshot are skipped.
///
/// Returns the number of symbols written.
pub fn write_snapshot<W: Write>(
    out: &mut W,
    symbols: &[String],
    snapshot: &Snapshot,
) -> std::io::Result<usize> {
    let mut written = 0;
    for symbol in symbols {
        if let Some(tick) = snapshot.get(symbol) {
            writeln!(
                out,
                "'{}': {} ({})",
                symbol,
                tick.get_price(),
                tick.get_timestamp()
            )?;
            written += 1;
        }
    }
    writeln!(out)?;
    Ok(written)
}

pub struct PriceDisplay {
    symbols: Vec<String>,
    receiver: ReceiverSocket<Snapshot>,
    pause: Duration,
}

impl PriceDisplay {
    pub fn new(symbols: Vec<String>, receiver: ReceiverSocket<Snapshot>, pause: Duration) -> Self {
        Self {
            symbols,
            receiver,
            pause,
        }
    }

    /// Receives one snapshot and renders it to `out`.
    pub async fn show_next<W: Write>(&mut self, out: &mut W) -> Result<usize> {
        let snapshot = self.receiver.recv().await?;
        let written = write_snapshot(out, &self.symbols, &snapshot)?;
        out.flush()?;
        Ok(written)
    }

    /// Renders to stdout forever. Returns only on a channel or output error.
    pub async fn run(mut self) -> Result<()> {
        info!("Displaying {} symbols", self.symbols.len());
        loop {
            let mut stdout = std::io::stdout();
            self.show_next(&mut stdout).await?;
            tokio::time::sleep(self.pause).await;
        }
    }
}
