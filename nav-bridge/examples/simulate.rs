use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use nav_bridge::actions;
use nav_bridge::logging::{init_logging, LoggingMode};
use nav_bridge::prelude::*;

/// Navigation bridge simulator
///
/// Runs the bridge against an in-memory loopback transport, sends test samples
/// through it and prints what a UI subscriber would receive.
#[derive(Parser, Debug)]
#[command(name = "simulate")]
#[command(about = "Send test broadcasts through the navigation bridge")]
pub struct Args {
    /// Samples to send (navigation, location, standard, error, batch)
    #[arg(short, long, default_value = "batch", value_delimiter = ',')]
    pub samples: Vec<String>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Re-emit the last event to the navigation action family afterwards
    #[arg(long)]
    pub fan_out: bool,

    /// Log mode (silent, development, debug, json)
    #[arg(long, default_value = "development")]
    pub log_mode: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mode = LoggingMode::from_name(&args.log_mode)
        .with_context(|| format!("unknown log mode {}", args.log_mode))?;
    init_logging(mode).context("failed to initialize logging")?;

    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            BridgeConfig::from_json(&json)?
        }
        None => BridgeConfig::default(),
    };

    let (transport, inbound) = LoopbackTransport::channel();
    let transport = Arc::new(transport);
    let bridge = Bridge::with_config(transport.clone(), config)?;
    bridge.start()?;
    info!(actions = ?bridge.listening_actions(), "Bridge started");

    let events = bridge.subscribe();

    for sample in &args.samples {
        let sent = bridge.send_test(sample)?;
        let processed = bridge.pump(&inbound);
        info!(sample = %sample, sent, processed, "Sample sent");

        for message in events.try_iter() {
            let body = serde_json::to_string_pretty(&message.to_map())?;
            println!("{} {}", message.method_name(), body);
        }
    }

    if args.fan_out {
        match bridge.resend_last(actions::NAVIGATION_FAMILY) {
            Some(report) => {
                let looped = bridge.pump(&inbound);
                println!("fan-out {}", serde_json::to_string_pretty(&report)?);
                let delivered = events.try_iter().count();
                info!(looped, delivered, "Fan-out broadcasts looped back");
            }
            None => println!("fan-out skipped: no event received yet"),
        }
    }

    println!("status {}", serde_json::to_string_pretty(&bridge.status())?);
    println!("dispatched {} broadcasts", transport.dispatched().len());

    bridge.stop();
    Ok(())
}
