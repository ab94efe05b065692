//! counterfeed CLI — inspect relay defaults and run a demo pipeline.
//!
//! Usage:
//! ```bash
//! counterfeed info
//! counterfeed demo
//! counterfeed version
//! ```

use std::env;
use std::process;
use std::sync::Arc;

use async_trait::async_trait;

use counterfeed_core::checkpoint::MemoryCheckpointStore;
use counterfeed_core::config::{RelayBuilder, RelayConfig};
use counterfeed_core::error::RelayError;
use counterfeed_core::types::{
    CounterAction, CounterRecord, RawEvent, Transaction, TransactionBatch, TransactionKind,
};
use counterfeed_feed::session::FeedSession;
use counterfeed_feed::snapshot::SnapshotClient;
use counterfeed_relay::publisher::ChannelBus;
use counterfeed_relay::relay::RelayLoop;
use counterfeed_relay::source::{StreamOptions, TransactionSource};

const DEMO_MODULE: &str = "0x25eeef73f1b22092fc2a57a8647f12afb1606d16ebe0c4afd675517402dd2e56";

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "info" => cmd_info(),
        "demo" => cmd_demo(),
        "version" | "--version" | "-V" => {
            println!("counterfeed {}", env!("CARGO_PKG_VERSION"));
        }
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    println!("counterfeed {}", env!("CARGO_PKG_VERSION"));
    println!("Counter event relay and live-merge feed\n");
    println!("USAGE:");
    println!("    counterfeed <COMMAND>\n");
    println!("COMMANDS:");
    println!("    info     Show Counterfeed configuration defaults");
    println!("    demo     Run the relay + feed pipeline against a simulated source");
    println!("    version  Print version");
    println!("    help     Print this help");
}

fn cmd_info() {
    let defaults = RelayConfig::default();
    println!("Counterfeed v{}", env!("CARGO_PKG_VERSION"));
    println!("  Default chain: {}", defaults.chain);
    println!("  Default channel: {}", defaults.channel);
    println!("  Default compression: gzip, receive size unlimited");
    println!("  Checkpoint backends: memory, SQLite (feature: sqlite)");
    println!("  Resume rule: checkpoint + 1");
}

fn cmd_demo() {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    if let Err(err) = runtime.block_on(run_demo()) {
        eprintln!("demo failed: {err}");
        process::exit(1);
    }
}

// ─── Demo pipeline ────────────────────────────────────────────────────────────

/// Bounded source feeding two scripted live batches.
struct DemoSource {
    batches: Vec<TransactionBatch>,
}

#[async_trait]
impl TransactionSource for DemoSource {
    async fn open(&mut self, options: StreamOptions) -> Result<(), RelayError> {
        println!("stream opened at position {}", options.starting_position);
        Ok(())
    }

    async fn next_batch(&mut self) -> Result<Option<TransactionBatch>, RelayError> {
        if self.batches.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.batches.remove(0)))
    }
}

/// Snapshot covering the three historical actions.
struct DemoSnapshot;

#[async_trait]
impl SnapshotClient for DemoSnapshot {
    async fn all_records(&self) -> Result<Vec<CounterRecord>, RelayError> {
        Ok(vec![
            demo_record(1_700_000_000_100_000, CounterAction::Increment),
            demo_record(1_700_000_000_300_000, CounterAction::Random),
            demo_record(1_700_000_000_200_000, CounterAction::Decrement),
        ])
    }

    async fn current_value(&self) -> Result<u64, RelayError> {
        Ok(3)
    }
}

fn demo_record(timestamp_us: u64, action: CounterAction) -> CounterRecord {
    CounterRecord {
        timestamp_us,
        actor: "0x94c652e656ed7d99fbd4".into(),
        action,
    }
}

fn demo_tx(position: u64, timestamp_us: u64, action: u8, value: &str) -> Transaction {
    Transaction {
        position,
        kind: TransactionKind::User,
        events: vec![RawEvent {
            type_tag: format!("{DEMO_MODULE}::counter::CounterRecordEvent"),
            payload: serde_json::json!({
                "timestamp_us": timestamp_us,
                "actor": "0x94c652e656ed7d99fbd4",
                "action": action,
                "value": value,
            }),
        }],
    }
}

async fn run_demo() -> Result<(), RelayError> {
    let config = RelayBuilder::new()
        .id("demo-relay")
        .module_address(DEMO_MODULE)
        .starting_position(986_962)
        .build();
    let channel = config.channel.clone();

    let bus = Arc::new(ChannelBus::new());
    let subscription = bus.subscribe(&channel);

    let source = DemoSource {
        batches: vec![
            TransactionBatch::new(vec![demo_tx(986_962, 1_700_000_000_400_000, 1, "4")]),
            TransactionBatch::new(vec![demo_tx(986_963, 1_700_000_000_500_000, 2, "3")]),
        ],
    };

    let mut relay = RelayLoop::new(
        config,
        source,
        bus.clone(),
        Box::new(MemoryCheckpointStore::new()),
    );
    relay.run().await?;

    let mut session = FeedSession::start(&DemoSnapshot, subscription).await?;
    for _ in 0..2 {
        session.pump_one().await;
    }

    println!("\ncurrent value: {}", session.feed().current_value().unwrap_or("?"));
    println!("timeline (newest first):");
    for record in session.feed().records() {
        println!(
            "  {}  {:?}  {}",
            record.timestamp_us, record.action, record.actor
        );
    }
    Ok(())
}
